//! Safe supply buckets: the manufacturer's own metal reserve.
//!
//! The reserve is split into fine-metal buckets (one per metal) and a single
//! alloy bucket. The storage row encodes the bucket key as a nullable
//! `metal_id` plus a `supply_type` string; the domain layer replaces that
//! convention with the [`SupplyKind`] tagged variant so a "fine metal without
//! a metal" row cannot be constructed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Key of a safe supply bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "supply_type", content = "metal_id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyKind {
    FineMetal(i32),
    Alloy,
}

impl SupplyKind {
    pub fn metal_id(self) -> Option<i32> {
        match self {
            Self::FineMetal(metal_id) => Some(metal_id),
            Self::Alloy => None,
        }
    }

    pub fn type_str(self) -> &'static str {
        match self {
            Self::FineMetal(_) => "FINE_METAL",
            Self::Alloy => "ALLOY",
        }
    }

    pub(crate) fn from_columns(metal_id: Option<i32>, supply_type: &str) -> ResultEngine<Self> {
        match (supply_type, metal_id) {
            ("FINE_METAL", Some(metal_id)) => Ok(Self::FineMetal(metal_id)),
            ("FINE_METAL", None) => Err(EngineError::Validation(
                "FINE_METAL supply row without a metal".to_string(),
            )),
            ("ALLOY", None) => Ok(Self::Alloy),
            ("ALLOY", Some(_)) => Err(EngineError::Validation(
                "ALLOY supply row must not reference a metal".to_string(),
            )),
            (other, _) => Err(EngineError::Validation(format!(
                "invalid supply type: {other}"
            ))),
        }
    }
}

/// A safe supply bucket with its current quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeSupply {
    pub kind: SupplyKind,
    pub metal_code: Option<String>,
    pub metal_name: Option<String>,
    pub quantity_grams: f64,
}

/// Result of a casting consumption run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastingConsumption {
    pub fine_metal_grams: f64,
    pub alloy_grams: f64,
    pub metal_code: String,
    pub company_id: i32,
    pub order_id: i32,
    pub company_balance_after: f64,
    pub safe_fine_metal_after: f64,
    pub safe_alloy_after: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "safe_supplies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub metal_id: Option<i32>,
    pub supply_type: String,
    pub quantity_grams: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_columns() {
        let kind = SupplyKind::FineMetal(7);
        assert_eq!(
            SupplyKind::from_columns(kind.metal_id(), kind.type_str()).unwrap(),
            kind
        );
        assert_eq!(
            SupplyKind::from_columns(None, "ALLOY").unwrap(),
            SupplyKind::Alloy
        );
    }

    #[test]
    fn rejects_null_convention_violations() {
        assert!(SupplyKind::from_columns(None, "FINE_METAL").is_err());
        assert!(SupplyKind::from_columns(Some(1), "ALLOY").is_err());
        assert!(SupplyKind::from_columns(Some(1), "SCRAP").is_err());
    }
}
