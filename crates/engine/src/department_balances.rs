//! Ledger-scoped department balances.
//!
//! One bucket per `(department, metal)`, holding the running sum of all
//! signed gross-weight deltas ever applied by ledger operations. Archive
//! flags never touch these rows. Balances may go negative: a department can
//! owe metal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A department's running stock of a metal, in gross grams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentBalance {
    pub department_id: i32,
    pub metal_id: i32,
    pub balance_grams: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "department_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub department_id: i32,
    pub metal_id: i32,
    pub balance_grams: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DepartmentBalance {
    fn from(model: Model) -> Self {
        Self {
            department_id: model.department_id,
            metal_id: model.metal_id,
            balance_grams: model.balance_grams,
        }
    }
}
