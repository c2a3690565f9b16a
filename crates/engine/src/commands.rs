//! Command structs for engine operations.
//!
//! These types group parameters for write operations (ledger entries, step
//! transfers, safe purchases, deposits), keeping call sites readable and
//! avoiding long argument lists.

use chrono::NaiveDate;

use crate::{Direction, StepStatus, SupplyKind};

/// Create a ledger entry.
#[derive(Clone, Debug)]
pub struct CreateEntryCmd {
    pub tenant_id: i32,
    pub date: NaiveDate,
    pub department_id: i32,
    pub order_id: i32,
    pub metal_id: i32,
    pub direction: Direction,
    pub quantity: f64,
    pub weight: f64,
    pub notes: Option<String>,
    pub user_id: i32,
}

impl CreateEntryCmd {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: i32,
        user_id: i32,
        date: NaiveDate,
        department_id: i32,
        order_id: i32,
        metal_id: i32,
        direction: Direction,
        quantity: f64,
        weight: f64,
    ) -> Self {
        Self {
            tenant_id,
            date,
            department_id,
            order_id,
            metal_id,
            direction,
            quantity,
            weight,
            notes: None,
            user_id,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a ledger entry. Unset fields keep their current value;
/// any change to department, metal, direction or weight migrates the balance
/// delta between the affected buckets.
#[derive(Clone, Debug, Default)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub department_id: Option<i32>,
    pub order_id: Option<i32>,
    pub metal_id: Option<i32>,
    pub direction: Option<Direction>,
    pub quantity: Option<f64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl EntryPatch {
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn department_id(mut self, department_id: i32) -> Self {
        self.department_id = Some(department_id);
        self
    }

    #[must_use]
    pub fn metal_id(mut self, metal_id: i32) -> Self {
        self.metal_id = Some(metal_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a registry metal.
#[derive(Clone, Debug, Default)]
pub struct MetalPatch {
    pub name: Option<String>,
    pub fine_percentage: Option<f64>,
    pub average_cost_per_gram: Option<f64>,
}

impl MetalPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn fine_percentage(mut self, fine_percentage: f64) -> Self {
        self.fine_percentage = Some(fine_percentage);
        self
    }

    #[must_use]
    pub fn average_cost_per_gram(mut self, cost: f64) -> Self {
        self.average_cost_per_gram = Some(cost);
        self
    }
}

/// Filters for listing ledger entries. Date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    pub department_id: Option<i32>,
    pub order_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub include_archived: bool,
}

/// Create a manufacturing step (intake or manual child).
#[derive(Clone, Debug)]
pub struct CreateStepCmd {
    pub tenant_id: i32,
    pub order_id: i32,
    pub parent_step_id: Option<i32>,
    pub step_type: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub worker_name: Option<String>,
    pub quantity_received: Option<f64>,
    pub weight_received: Option<f64>,
    pub notes: Option<String>,
}

impl CreateStepCmd {
    #[must_use]
    pub fn new(tenant_id: i32, order_id: i32) -> Self {
        Self {
            tenant_id,
            order_id,
            parent_step_id: None,
            step_type: None,
            description: None,
            department: None,
            worker_name: None,
            quantity_received: None,
            weight_received: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    #[must_use]
    pub fn worker(mut self, worker_name: impl Into<String>) -> Self {
        self.worker_name = Some(worker_name.into());
        self
    }

    #[must_use]
    pub fn step_type(mut self, step_type: impl Into<String>) -> Self {
        self.step_type = Some(step_type.into());
        self
    }

    #[must_use]
    pub fn received(mut self, quantity: f64, weight: f64) -> Self {
        self.quantity_received = Some(quantity);
        self.weight_received = Some(weight);
        self
    }
}

/// Transfer part of a parent step's stock into a new child step.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub tenant_id: i32,
    pub parent_step_id: i32,
    pub quantity: f64,
    pub weight: f64,
    pub next_step_type: Option<String>,
    pub next_description: Option<String>,
    pub department: Option<String>,
    pub received_by: Option<String>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(tenant_id: i32, parent_step_id: i32, quantity: f64, weight: f64) -> Self {
        Self {
            tenant_id,
            parent_step_id,
            quantity,
            weight,
            next_step_type: None,
            next_description: None,
            department: None,
            received_by: None,
        }
    }

    #[must_use]
    pub fn next_step_type(mut self, step_type: impl Into<String>) -> Self {
        self.next_step_type = Some(step_type.into());
        self
    }

    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    #[must_use]
    pub fn received_by(mut self, received_by: impl Into<String>) -> Self {
        self.received_by = Some(received_by.into());
        self
    }
}

/// Partial update of a manufacturing step. Status moves stamp their
/// timestamps on first entry; FAILED is only ever set through here.
#[derive(Clone, Debug, Default)]
pub struct StepPatch {
    pub status: Option<StepStatus>,
    pub department: Option<String>,
    pub worker_name: Option<String>,
    pub quantity_returned: Option<f64>,
    pub weight_returned: Option<f64>,
    pub weight_received: Option<f64>,
    pub notes: Option<String>,
}

impl StepPatch {
    #[must_use]
    pub fn status(mut self, status: StepStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn returned(mut self, quantity: f64, weight: f64) -> Self {
        self.quantity_returned = Some(quantity);
        self.weight_returned = Some(weight);
        self
    }
}

/// Record a purchase into the safe.
#[derive(Clone, Debug)]
pub struct SafePurchaseCmd {
    pub tenant_id: i32,
    pub supply: SupplyKind,
    pub quantity_grams: f64,
    pub cost_per_gram: f64,
    pub notes: Option<String>,
    pub user_id: i32,
}

impl SafePurchaseCmd {
    #[must_use]
    pub fn new(
        tenant_id: i32,
        user_id: i32,
        supply: SupplyKind,
        quantity_grams: f64,
        cost_per_gram: f64,
    ) -> Self {
        Self {
            tenant_id,
            supply,
            quantity_grams,
            cost_per_gram,
            notes: None,
            user_id,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Record a customer metal deposit.
#[derive(Clone, Debug)]
pub struct CompanyDepositCmd {
    pub tenant_id: i32,
    pub company_id: i32,
    pub metal_id: i32,
    pub quantity_grams: f64,
    pub notes: Option<String>,
    pub user_id: i32,
}

impl CompanyDepositCmd {
    #[must_use]
    pub fn new(
        tenant_id: i32,
        user_id: i32,
        company_id: i32,
        metal_id: i32,
        quantity_grams: f64,
    ) -> Self {
        Self {
            tenant_id,
            company_id,
            metal_id,
            quantity_grams,
            notes: None,
            user_id,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Filters for listing metal transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub company_id: Option<i32>,
    pub metal_id: Option<i32>,
    pub transaction_type: Option<crate::TransactionType>,
}
