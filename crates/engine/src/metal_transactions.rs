//! Metal transaction audit rows.
//!
//! Every balance mutation in the supply tracker writes one of these rows in
//! the same database transaction as the mutation itself, so the audit trail
//! can always reconstruct the balances.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    SafePurchase,
    CompanyDeposit,
    ManufacturingConsumption,
    SafeAdjustment,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SafePurchase => "SAFE_PURCHASE",
            Self::CompanyDeposit => "COMPANY_DEPOSIT",
            Self::ManufacturingConsumption => "MANUFACTURING_CONSUMPTION",
            Self::SafeAdjustment => "SAFE_ADJUSTMENT",
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SAFE_PURCHASE" => Ok(Self::SafePurchase),
            "COMPANY_DEPOSIT" => Ok(Self::CompanyDeposit),
            "MANUFACTURING_CONSUMPTION" => Ok(Self::ManufacturingConsumption),
            "SAFE_ADJUSTMENT" => Ok(Self::SafeAdjustment),
            other => Err(EngineError::Validation(format!(
                "invalid metal transaction type: {other}"
            ))),
        }
    }
}

/// An audit row. `quantity_grams` is signed: positive for deposits and
/// purchases, negative for consumption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetalTransaction {
    pub id: i32,
    pub transaction_type: TransactionType,
    pub metal_id: Option<i32>,
    pub company_id: Option<i32>,
    pub order_id: Option<i32>,
    pub quantity_grams: f64,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "metal_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub transaction_type: String,
    pub metal_id: Option<i32>,
    pub company_id: Option<i32>,
    pub order_id: Option<i32>,
    pub quantity_grams: f64,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MetalTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            transaction_type: TransactionType::try_from(model.transaction_type.as_str())?,
            metal_id: model.metal_id,
            company_id: model.company_id,
            order_id: model.order_id,
            quantity_grams: model.quantity_grams,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
