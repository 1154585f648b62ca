use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, DomainResult, Entity, KitId};

/// Kit stock status, derived from the stock count.
///
/// `Assigned` means every unit on hand has been reserved (stock is exactly
/// zero); anything else — including a negative backlog count — reads as
/// `InStock`. The field is a cache: recompute it on every stock mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitStatus {
    InStock,
    Assigned,
}

/// Recompute the derived status for a stock count.
pub fn derive_status(stock_count: i64) -> KitStatus {
    if stock_count == 0 {
        KitStatus::Assigned
    } else {
        KitStatus::InStock
    }
}

/// One material line inside a pouch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub quantity: i64,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// A named sub-grouping of materials within a structured kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pouch {
    pub name: String,
    pub materials: Vec<Material>,
}

/// Packing requirement data.
///
/// Older kits carry a flat comma-separated material list; newer ones are
/// structured into pouches. Both shapes persist side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PackingData {
    Legacy(String),
    Structured(Vec<Pouch>),
}

impl PackingData {
    pub fn empty() -> Self {
        PackingData::Legacy(String::new())
    }

    fn validate(&self) -> DomainResult<()> {
        match self {
            PackingData::Legacy(_) => Ok(()),
            PackingData::Structured(pouches) => {
                for pouch in pouches {
                    if pouch.name.trim().is_empty() {
                        return Err(DomainError::validation("pouch name cannot be empty"));
                    }
                    for material in &pouch.materials {
                        if material.name.trim().is_empty() {
                            return Err(DomainError::validation("material name cannot be empty"));
                        }
                        if material.quantity <= 0 {
                            return Err(DomainError::validation(format!(
                                "material '{}' quantity must be positive",
                                material.name
                            )));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Record: Kit (fulfillable product bundle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    pub id: KitId,
    pub name: String,
    /// Program slug this kit belongs to (see [`crate::Program`]).
    pub program: String,
    pub variant: Option<String>,
    /// Units on hand. Negative counts are a backlog convention ("N units
    /// still to be made") reachable only through the explicit update path.
    pub stock_count: i64,
    pub low_stock_threshold: i64,
    pub packing: PackingData,
    pub status: KitStatus,
    pub remarks: Option<String>,
    /// Opaque blob-store identifier; contents are never inspected here.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Kit {
    type Id = KitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Kit {
    pub fn is_low_stock(&self) -> bool {
        self.stock_count <= self.low_stock_threshold
    }
}

/// Command: CreateKit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateKit {
    pub kit_id: KitId,
    pub name: String,
    pub program: String,
    pub variant: Option<String>,
    pub stock_count: i64,
    pub low_stock_threshold: i64,
    pub packing: PackingData,
    pub remarks: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateKit (partial patch; `None` leaves a field unchanged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateKit {
    pub name: Option<String>,
    pub program: Option<String>,
    pub variant: Option<String>,
    /// May be negative: a deficit of units still to be made. This is the
    /// one sanctioned entry point for negative stock.
    pub stock_count: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub packing: Option<PackingData>,
    pub remarks: Option<String>,
    pub image: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CopyKit — duplicate packing data under a different program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyKit {
    pub new_kit_id: KitId,
    pub new_program: String,
    pub new_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Kit {
    /// Build a new kit from a creation command.
    pub fn create(cmd: CreateKit) -> DomainResult<Kit> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if cmd.program.trim().is_empty() {
            return Err(DomainError::validation("program cannot be empty"));
        }
        if cmd.stock_count < 0 {
            return Err(DomainError::validation("stock count cannot be negative"));
        }
        if cmd.low_stock_threshold < 0 {
            return Err(DomainError::validation(
                "low stock threshold cannot be negative",
            ));
        }
        cmd.packing.validate()?;

        Ok(Kit {
            id: cmd.kit_id,
            name: cmd.name,
            program: cmd.program,
            variant: cmd.variant,
            stock_count: cmd.stock_count,
            low_stock_threshold: cmd.low_stock_threshold,
            packing: cmd.packing,
            status: derive_status(cmd.stock_count),
            remarks: cmd.remarks,
            image: cmd.image,
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    /// Apply a partial update, recomputing the derived status whenever the
    /// stock count is touched.
    pub fn apply_update(&mut self, cmd: UpdateKit) -> DomainResult<()> {
        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(program) = &cmd.program {
            if program.trim().is_empty() {
                return Err(DomainError::validation("program cannot be empty"));
            }
        }
        if let Some(threshold) = cmd.low_stock_threshold {
            if threshold < 0 {
                return Err(DomainError::validation(
                    "low stock threshold cannot be negative",
                ));
            }
        }
        if let Some(packing) = &cmd.packing {
            packing.validate()?;
        }

        if let Some(name) = cmd.name {
            self.name = name;
        }
        if let Some(program) = cmd.program {
            self.program = program;
        }
        if cmd.variant.is_some() {
            self.variant = cmd.variant;
        }
        if let Some(stock) = cmd.stock_count {
            self.stock_count = stock;
            self.status = derive_status(stock);
        }
        if let Some(threshold) = cmd.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        if let Some(packing) = cmd.packing {
            self.packing = packing;
        }
        if cmd.remarks.is_some() {
            self.remarks = cmd.remarks;
        }
        if cmd.image.is_some() {
            self.image = cmd.image;
        }
        self.updated_at = Some(cmd.occurred_at);

        Ok(())
    }

    /// Duplicate this kit's packing data into a new kit under a different
    /// program. Copies are always born empty (stock 0).
    pub fn copy(&self, cmd: CopyKit) -> DomainResult<Kit> {
        if cmd.new_program.trim().is_empty() {
            return Err(DomainError::validation("program cannot be empty"));
        }
        let name = match cmd.new_name {
            Some(name) => {
                if name.trim().is_empty() {
                    return Err(DomainError::validation("name cannot be empty"));
                }
                name
            }
            None => self.name.clone(),
        };

        Ok(Kit {
            id: cmd.new_kit_id,
            name,
            program: cmd.new_program,
            variant: self.variant.clone(),
            stock_count: 0,
            low_stock_threshold: self.low_stock_threshold,
            packing: self.packing.clone(),
            status: derive_status(0),
            remarks: self.remarks.clone(),
            image: self.image.clone(),
            created_at: cmd.occurred_at,
            updated_at: None,
        })
    }

    /// Adjust stock by a signed delta, recomputing the derived status.
    ///
    /// Callers are responsible for the reservation rules (sufficiency on
    /// assignment, restore-on-clear); this only keeps the cache coherent.
    pub fn adjust_stock(&mut self, delta: i64, occurred_at: DateTime<Utc>) {
        self.stock_count += delta;
        self.status = derive_status(self.stock_count);
        self.updated_at = Some(occurred_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn create_cmd() -> CreateKit {
        CreateKit {
            kit_id: KitId::new(),
            name: "Beginner Sewing Kit".to_string(),
            program: "sewing".to_string(),
            variant: None,
            stock_count: 10,
            low_stock_threshold: 3,
            packing: PackingData::Structured(vec![Pouch {
                name: "Thread pouch".to_string(),
                materials: vec![Material {
                    name: "Cotton thread".to_string(),
                    quantity: 2,
                    unit: Some("spools".to_string()),
                    notes: None,
                }],
            }]),
            remarks: None,
            image: None,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn create_derives_in_stock_status() {
        let kit = Kit::create(create_cmd()).unwrap();
        assert_eq!(kit.status, KitStatus::InStock);
        assert_eq!(kit.stock_count, 10);
    }

    #[test]
    fn create_with_zero_stock_reads_assigned() {
        let mut cmd = create_cmd();
        cmd.stock_count = 0;
        let kit = Kit::create(cmd).unwrap();
        assert_eq!(kit.status, KitStatus::Assigned);
    }

    #[test]
    fn create_rejects_negative_stock() {
        let mut cmd = create_cmd();
        cmd.stock_count = -1;
        let err = Kit::create(cmd).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_nonpositive_material_quantity() {
        let mut cmd = create_cmd();
        cmd.packing = PackingData::Structured(vec![Pouch {
            name: "Pouch".to_string(),
            materials: vec![Material {
                name: "Buttons".to_string(),
                quantity: 0,
                unit: None,
                notes: None,
            }],
        }]);
        assert!(Kit::create(cmd).is_err());
    }

    #[test]
    fn update_recomputes_status_when_stock_supplied() {
        let mut kit = Kit::create(create_cmd()).unwrap();
        kit.apply_update(UpdateKit {
            name: None,
            program: None,
            variant: None,
            stock_count: Some(0),
            low_stock_threshold: None,
            packing: None,
            remarks: None,
            image: None,
            occurred_at: test_time(),
        })
        .unwrap();
        assert_eq!(kit.status, KitStatus::Assigned);
    }

    #[test]
    fn update_accepts_negative_stock_as_backlog() {
        let mut kit = Kit::create(create_cmd()).unwrap();
        kit.apply_update(UpdateKit {
            name: None,
            program: None,
            variant: None,
            stock_count: Some(-4),
            low_stock_threshold: None,
            packing: None,
            remarks: None,
            image: None,
            occurred_at: test_time(),
        })
        .unwrap();
        assert_eq!(kit.stock_count, -4);
        assert_eq!(kit.status, KitStatus::InStock);
    }

    #[test]
    fn copy_is_born_empty_under_the_new_program() {
        let kit = Kit::create(create_cmd()).unwrap();
        let copy = kit
            .copy(CopyKit {
                new_kit_id: KitId::new(),
                new_program: "embroidery".to_string(),
                new_name: None,
                occurred_at: test_time(),
            })
            .unwrap();

        assert_eq!(copy.stock_count, 0);
        assert_eq!(copy.status, KitStatus::Assigned);
        assert_eq!(copy.program, "embroidery");
        assert_eq!(copy.name, kit.name);
        assert_eq!(copy.packing, kit.packing);
        assert_ne!(copy.id, kit.id);
    }

    #[test]
    fn low_stock_is_inclusive_of_the_threshold() {
        let mut kit = Kit::create(create_cmd()).unwrap();
        kit.stock_count = 3;
        assert!(kit.is_low_stock());
        kit.stock_count = 4;
        assert!(!kit.is_low_stock());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: status is `assigned` iff stock is exactly zero.
            #[test]
            fn status_derivation_matches_invariant(stock in i64::MIN..i64::MAX) {
                let status = derive_status(stock);
                if stock == 0 {
                    prop_assert_eq!(status, KitStatus::Assigned);
                } else {
                    prop_assert_eq!(status, KitStatus::InStock);
                }
            }

            /// Property: adjust_stock keeps the cached status coherent.
            #[test]
            fn adjust_stock_keeps_status_coherent(start in 0i64..10_000, delta in -10_000i64..10_000) {
                let mut cmd = create_cmd();
                cmd.stock_count = start;
                let mut kit = Kit::create(cmd).unwrap();
                kit.adjust_stock(delta, test_time());
                prop_assert_eq!(kit.stock_count, start + delta);
                prop_assert_eq!(kit.status, derive_status(start + delta));
            }
        }
    }
}
