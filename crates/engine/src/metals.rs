//! The module contains the metal registry types.
//!
//! A metal is identified by a tenant-unique code (`GOLD_18K`) and carries the
//! purity fraction used for every fine-weight computation in the engine. The
//! running average purchase cost is owned here too, updated by safe purchases.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Metals seeded for a new tenant: `(code, name, fine_percentage)`.
pub const DEFAULT_METALS: [(&str, &str, f64); 6] = [
    ("GOLD_24K", "Gold 24K", 0.999),
    ("GOLD_22K", "Gold 22K", 0.916),
    ("GOLD_18K", "Gold 18K", 0.750),
    ("GOLD_14K", "Gold 14K", 0.585),
    ("SILVER_925", "Silver 925", 0.925),
    ("PLATINUM", "Platinum", 0.950),
];

/// A metal known to the registry.
///
/// Metals are never deleted. Deactivating one keeps historic ledger rows and
/// balances readable while rejecting new movements against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metal {
    pub id: i32,
    pub code: String,
    pub name: String,
    /// Purity fraction in `[0, 1]`; grams of pure metal per gross gram.
    pub fine_percentage: f64,
    /// Quantity-weighted running average, grams purchased so far.
    pub average_cost_per_gram: Option<f64>,
    pub is_active: bool,
}

impl Metal {
    /// Checks the purity fraction is a sane `[0, 1]` value.
    pub(crate) fn validate_fine_percentage(value: f64) -> ResultEngine<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(EngineError::Validation(format!(
                "fine_percentage must be within [0, 1], got {value}"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "metals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub code: String,
    pub name: String,
    pub fine_percentage: f64,
    pub average_cost_per_gram: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ledger_entries::Entity")]
    LedgerEntries,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Metal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            fine_percentage: model.fine_percentage,
            average_cost_per_gram: model.average_cost_per_gram,
            is_active: model.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_percentage_bounds() {
        assert!(Metal::validate_fine_percentage(0.0).is_ok());
        assert!(Metal::validate_fine_percentage(0.916).is_ok());
        assert!(Metal::validate_fine_percentage(1.0).is_ok());
        assert!(Metal::validate_fine_percentage(-0.1).is_err());
        assert!(Metal::validate_fine_percentage(1.5).is_err());
    }
}
