//! Read-only projection of orders, owned by the order management system.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub order_number: String,
    pub company_id: i32,
    pub metal_id: Option<i32>,
    pub quantity: Option<f64>,
    pub target_weight_per_piece: Option<f64>,
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
