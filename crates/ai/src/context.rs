use serde::{Deserialize, Serialize};

/// Cap on kit snapshots included in a chat prompt.
pub const KIT_SNAPSHOT_LIMIT: usize = 50;

/// One kit as the assistant sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitSnapshot {
    pub name: String,
    pub program: String,
    pub stock_count: i64,
    pub status: String,
    pub low_stock: bool,
}

/// One inventory category rollup line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummaryLine {
    pub category: String,
    pub item_count: u64,
    pub total_quantity: i64,
}

/// Snapshot of current state handed to the assistant alongside the user's
/// message. Built by callers from their stores; this crate never reads
/// domain state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub inventory: Vec<InventorySummaryLine>,
    pub kits: Vec<KitSnapshot>,
}

impl ChatContext {
    /// Build a context, truncating kits to [`KIT_SNAPSHOT_LIMIT`].
    pub fn new(inventory: Vec<InventorySummaryLine>, mut kits: Vec<KitSnapshot>) -> Self {
        kits.truncate(KIT_SNAPSHOT_LIMIT);
        Self { inventory, kits }
    }

    /// Render the snapshot into the system prompt for the provider.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You are the inventory assistant for a small kit-fulfillment \
             workshop. Answer using only the state below; say so when the \
             answer is not in it.\n\nInventory summary:\n",
        );

        if self.inventory.is_empty() {
            prompt.push_str("  (no inventory items)\n");
        }
        for line in &self.inventory {
            prompt.push_str(&format!(
                "  {}: {} items, {} units total\n",
                line.category, line.item_count, line.total_quantity
            ));
        }

        prompt.push_str("\nKits:\n");
        if self.kits.is_empty() {
            prompt.push_str("  (no kits)\n");
        }
        for kit in &self.kits {
            prompt.push_str(&format!(
                "  {} [{}]: stock {}, {}{}\n",
                kit.name,
                kit.program,
                kit.stock_count,
                kit.status,
                if kit.low_stock { ", LOW STOCK" } else { "" }
            ));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit(name: &str) -> KitSnapshot {
        KitSnapshot {
            name: name.to_string(),
            program: "sewing".to_string(),
            stock_count: 4,
            status: "in_stock".to_string(),
            low_stock: false,
        }
    }

    #[test]
    fn context_truncates_to_the_snapshot_limit() {
        let kits = (0..120).map(|i| kit(&format!("Kit {i}"))).collect();
        let ctx = ChatContext::new(vec![], kits);
        assert_eq!(ctx.kits.len(), KIT_SNAPSHOT_LIMIT);
    }

    #[test]
    fn prompt_mentions_kits_and_empty_inventory() {
        let ctx = ChatContext::new(vec![], vec![kit("Beginner Sewing Kit")]);
        let prompt = ctx.system_prompt();
        assert!(prompt.contains("Beginner Sewing Kit"));
        assert!(prompt.contains("(no inventory items)"));
    }
}
