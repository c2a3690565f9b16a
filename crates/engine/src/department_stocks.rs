//! Transfer-scoped department stocks (legacy buckets).
//!
//! A second, independent running balance keyed by department *name* and metal
//! *code*, mutated only by manufacturing intake and step transfers. It is
//! intentionally not merged with the ledger-scoped
//! [`DepartmentBalance`](super::DepartmentBalance) buckets; the two systems
//! account the same physical metal from different vantage points and are kept
//! separately consistent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A department's transfer-scoped stock of a metal, in gross grams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentStock {
    pub department_name: String,
    pub metal_code: String,
    pub balance_grams: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "department_stocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub department_name: String,
    pub metal_code: String,
    pub balance_grams: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DepartmentStock {
    fn from(model: Model) -> Self {
        Self {
            department_name: model.department_name,
            metal_code: model.metal_code,
            balance_grams: model.balance_grams,
        }
    }
}
