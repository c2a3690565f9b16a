//! Manufacturing step tree primitives.
//!
//! Steps form a forest: root steps are created on intake, children are
//! created by transferring part of a parent's stock. The tree lives in a flat
//! table with a nullable `parent_step_id`; children are found by indexed
//! lookup, never by in-memory links.
//!
//! Two quantities are tracked side by side on every step: piece count and
//! gross weight. A parent auto-completes as soon as *either* metric is
//! depleted within [`TRANSFER_TOLERANCE`] grams/pieces.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Completion tolerance for the dual depletion check.
pub const TRANSFER_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl TryFrom<&str> for StepStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(EngineError::Validation(format!(
                "invalid step status: {other}"
            ))),
        }
    }
}

/// A manufacturing step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingStep {
    pub id: i32,
    pub order_id: i32,
    pub parent_step_id: Option<i32>,
    pub step_type: Option<String>,
    pub description: Option<String>,
    pub status: StepStatus,
    pub department: Option<String>,
    pub worker_name: Option<String>,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub received_at: Option<DateTimeUtc>,
    pub transferred_by: Option<String>,
    pub received_by: Option<String>,
    pub quantity_received: Option<f64>,
    pub quantity_returned: Option<f64>,
    pub weight_received: Option<f64>,
    pub weight_returned: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ManufacturingStep {
    /// Pieces still transferable before subtracting children: the returned
    /// amount when the step has been worked, the received amount otherwise.
    pub fn available_quantity(&self) -> f64 {
        self.quantity_returned.or(self.quantity_received).unwrap_or(0.0)
    }

    /// Grams still transferable before subtracting children.
    pub fn available_weight(&self) -> f64 {
        self.weight_returned.or(self.weight_received).unwrap_or(0.0)
    }
}

/// Transferable stock remaining at a parent step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRemaining {
    pub total_quantity: f64,
    pub total_weight: f64,
    pub transferred_quantity: f64,
    pub transferred_weight: f64,
    pub remaining_quantity: f64,
    pub remaining_weight: f64,
    pub children_count: usize,
}

impl StepRemaining {
    pub(crate) fn compute(
        available_quantity: f64,
        available_weight: f64,
        transferred_quantity: f64,
        transferred_weight: f64,
        children_count: usize,
    ) -> Self {
        Self {
            total_quantity: available_quantity,
            total_weight: available_weight,
            transferred_quantity,
            transferred_weight,
            remaining_quantity: available_quantity - transferred_quantity,
            remaining_weight: available_weight - transferred_weight,
            children_count,
        }
    }

    /// Either-metric depletion rule: a tracked metric counts as depleted when
    /// it started positive and its remainder is within the tolerance.
    pub(crate) fn is_depleted(&self) -> bool {
        let qty_depleted =
            self.total_quantity > 0.0 && self.remaining_quantity <= TRANSFER_TOLERANCE;
        let weight_depleted =
            self.total_weight > 0.0 && self.remaining_weight <= TRANSFER_TOLERANCE;
        qty_depleted || weight_depleted
    }
}

/// Outcome of a step transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub parent_step_id: i32,
    pub parent_step_status: StepStatus,
    pub child_step_id: i32,
    pub remaining_quantity: f64,
    pub remaining_weight: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "manufacturing_steps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub order_id: i32,
    pub parent_step_id: Option<i32>,
    pub step_type: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub department: Option<String>,
    pub worker_name: Option<String>,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub received_at: Option<DateTimeUtc>,
    pub transferred_by: Option<String>,
    pub received_by: Option<String>,
    pub quantity_received: Option<f64>,
    pub quantity_returned: Option<f64>,
    pub weight_received: Option<f64>,
    pub weight_returned: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ManufacturingStep {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            order_id: model.order_id,
            parent_step_id: model.parent_step_id,
            step_type: model.step_type,
            description: model.description,
            status: StepStatus::try_from(model.status.as_str())?,
            department: model.department,
            worker_name: model.worker_name,
            started_at: model.started_at,
            completed_at: model.completed_at,
            received_at: model.received_at,
            transferred_by: model.transferred_by,
            received_by: model.received_by,
            quantity_received: model.quantity_received,
            quantity_returned: model.quantity_returned,
            weight_received: model.weight_received,
            weight_returned: model.weight_returned,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_subtracts_transfers() {
        let remaining = StepRemaining::compute(10.0, 50.0, 4.0, 20.0, 2);
        assert_eq!(remaining.remaining_quantity, 6.0);
        assert_eq!(remaining.remaining_weight, 30.0);
        assert!(!remaining.is_depleted());
    }

    #[test]
    fn depletes_on_quantity_alone() {
        let remaining = StepRemaining::compute(10.0, 50.0, 10.0, 20.0, 3);
        assert!(remaining.is_depleted());
    }

    #[test]
    fn depletes_on_weight_alone() {
        let remaining = StepRemaining::compute(10.0, 50.0, 4.0, 49.995, 3);
        assert!(remaining.is_depleted());
    }

    #[test]
    fn untracked_metrics_never_deplete() {
        // A step with no received amounts reports zero availability but is
        // not considered depleted.
        let remaining = StepRemaining::compute(0.0, 0.0, 0.0, 0.0, 0);
        assert!(!remaining.is_depleted());
    }
}
