use std::collections::BTreeMap;

use kitflow_ai::{ChatContext, InventorySummaryLine, KitSnapshot};
use kitflow_inventory::ItemCategory;

use crate::datastore::Datastore;

/// Snapshot current store state for the chat relay: inventory rollup lines
/// plus the first 50 kits (oldest first — `ChatContext` enforces the cap).
pub fn chat_context(store: &Datastore) -> ChatContext {
    let state = store.read();

    let mut by_category: BTreeMap<&'static str, (ItemCategory, u64, i64)> = BTreeMap::new();
    for item in state.inventory.values() {
        let entry = by_category
            .entry(item.category.as_str())
            .or_insert((item.category, 0, 0));
        entry.1 += 1;
        entry.2 += item.quantity;
    }

    let inventory = by_category
        .into_iter()
        .map(|(name, (_, item_count, total_quantity))| InventorySummaryLine {
            category: name.to_string(),
            item_count,
            total_quantity,
        })
        .collect();

    let mut kits: Vec<_> = state.kits.values().collect();
    kits.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });

    let kits = kits
        .into_iter()
        .map(|kit| KitSnapshot {
            name: kit.name.clone(),
            program: kit.program.clone(),
            stock_count: kit.stock_count,
            status: match kit.status {
                kitflow_kits::KitStatus::InStock => "in_stock".to_string(),
                kitflow_kits::KitStatus::Assigned => "assigned".to_string(),
            },
            low_stock: kit.is_low_stock(),
        })
        .collect();

    ChatContext::new(inventory, kits)
}
