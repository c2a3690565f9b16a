//! Department ledger primitives.
//!
//! A ledger entry records one signed movement of gross metal through a
//! department. The engine derives `fine_weight` from the gross weight and the
//! metal's purity, negating it for `OUT` movements, and keeps the
//! per-department balance in sync with every insert, update and delete.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Sign applied to gross-weight balance deltas: `+1` for IN, `-1` for OUT.
    pub(crate) fn sign(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Out => -1.0,
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            other => Err(EngineError::Validation(format!(
                "invalid ledger direction: {other}"
            ))),
        }
    }
}

/// `weight × purity`, negated for OUT movements.
pub(crate) fn signed_fine_weight(weight: f64, fine_percentage: f64, direction: Direction) -> f64 {
    direction.sign() * weight * fine_percentage
}

/// Gross-weight delta an entry applies to its department balance.
pub(crate) fn signed_weight_delta(weight: f64, direction: Direction) -> f64 {
    direction.sign() * weight
}

/// A department ledger entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i32,
    pub date: NaiveDate,
    pub department_id: i32,
    pub order_id: i32,
    pub metal_id: i32,
    pub direction: Direction,
    /// Piece count, > 0.
    pub quantity: f64,
    /// Gross grams, > 0.
    pub weight: f64,
    /// Signed pure-metal grams, derived.
    pub fine_weight: f64,
    pub notes: Option<String>,
    pub is_archived: bool,
    pub created_by: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Per-metal aggregation row of [`LedgerSummary`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetalBalance {
    pub metal_id: i32,
    pub metal_code: String,
    pub metal_name: String,
    pub fine_weight_balance: f64,
}

/// Aggregated ledger view grouped by metal.
///
/// Metals whose signed fine-weight sum is exactly zero are omitted from
/// `balances` but still contribute to the quantity totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_qty_held: f64,
    pub total_qty_out: f64,
    pub balances: Vec<MetalBalance>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "department_ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub date: Date,
    pub department_id: i32,
    pub order_id: i32,
    pub metal_id: i32,
    pub direction: String,
    pub quantity: f64,
    pub weight: f64,
    pub fine_weight: f64,
    pub notes: Option<String>,
    pub is_archived: bool,
    pub created_by: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::metals::Entity",
        from = "Column::MetalId",
        to = "super::metals::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Metals,
}

impl Related<super::metals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Metals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            department_id: model.department_id,
            order_id: model.order_id,
            metal_id: model.metal_id,
            direction: Direction::try_from(model.direction.as_str())?,
            quantity: model.quantity,
            weight: model.weight,
            fine_weight: model.fine_weight,
            notes: model.notes,
            is_archived: model.is_archived,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
