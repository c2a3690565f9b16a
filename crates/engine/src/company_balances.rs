//! Company metal balances: customer-owned metal held in trust.
//!
//! Deposits credit these buckets, casting consumption draws them down. A
//! negative balance means the company owes metal to the house.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A company's trust balance for one metal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetalBalance {
    pub company_id: i32,
    pub metal_id: i32,
    pub metal_code: String,
    pub metal_name: String,
    pub balance_grams: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "company_metal_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub company_id: i32,
    pub metal_id: i32,
    pub balance_grams: f64,
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
