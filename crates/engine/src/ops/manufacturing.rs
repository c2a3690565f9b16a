use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    CreateStepCmd, DepartmentStock, EngineError, ManufacturingStep, ResultEngine, StepPatch,
    StepRemaining, StepStatus, TransferCmd, TransferOutcome, department_stocks, departments,
    manufacturing_steps, metals, orders,
};

use super::{Engine, require_positive, with_tx};

async fn require_step<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    step_id: i32,
) -> ResultEngine<manufacturing_steps::Model> {
    manufacturing_steps::Entity::find()
        .filter(manufacturing_steps::Column::TenantId.eq(tenant_id))
        .filter(manufacturing_steps::Column::Id.eq(step_id))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Manufacturing step {step_id}")))
}

pub(super) async fn require_order<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    order_id: i32,
) -> ResultEngine<orders::Model> {
    orders::Entity::find()
        .filter(orders::Column::TenantId.eq(tenant_id))
        .filter(orders::Column::Id.eq(order_id))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Order {order_id}")))
}

async fn require_department_by_name<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    name: &str,
) -> ResultEngine<departments::Model> {
    departments::Entity::find()
        .filter(departments::Column::TenantId.eq(tenant_id))
        .filter(departments::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Department '{name}'")))
}

/// Metal code of the order's assigned metal, if any. Steps without an order
/// metal move no stock.
async fn order_metal_code<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    order_id: i32,
) -> ResultEngine<Option<String>> {
    let order = orders::Entity::find()
        .filter(orders::Column::TenantId.eq(tenant_id))
        .filter(orders::Column::Id.eq(order_id))
        .one(conn)
        .await?;
    let Some(order) = order else {
        return Ok(None);
    };
    let Some(metal_id) = order.metal_id else {
        return Ok(None);
    };
    let metal = metals::Entity::find()
        .filter(metals::Column::TenantId.eq(tenant_id))
        .filter(metals::Column::Id.eq(metal_id))
        .one(conn)
        .await?;
    Ok(metal.map(|m| m.code))
}

async fn find_stock<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    department_name: &str,
    metal_code: &str,
) -> ResultEngine<Option<department_stocks::Model>> {
    Ok(department_stocks::Entity::find()
        .filter(department_stocks::Column::TenantId.eq(tenant_id))
        .filter(department_stocks::Column::DepartmentName.eq(department_name))
        .filter(department_stocks::Column::MetalCode.eq(metal_code))
        .one(conn)
        .await?)
}

async fn credit_stock<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    department_name: &str,
    metal_code: &str,
    grams: f64,
) -> ResultEngine<()> {
    require_department_by_name(conn, tenant_id, department_name).await?;
    let now = Utc::now();
    match find_stock(conn, tenant_id, department_name, metal_code).await? {
        Some(model) => {
            department_stocks::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                balance_grams: ActiveValue::Set(model.balance_grams + grams),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .update(conn)
            .await?;
        }
        None => {
            department_stocks::ActiveModel {
                tenant_id: ActiveValue::Set(tenant_id),
                department_name: ActiveValue::Set(department_name.to_string()),
                metal_code: ActiveValue::Set(metal_code.to_string()),
                balance_grams: ActiveValue::Set(grams),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

/// Subtract from a department stock. Unlike the ledger buckets, these refuse
/// to go negative: the floor stock is physical.
async fn debit_stock<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    department_name: &str,
    metal_code: &str,
    grams: f64,
) -> ResultEngine<()> {
    require_department_by_name(conn, tenant_id, department_name).await?;
    let model = find_stock(conn, tenant_id, department_name, metal_code).await?;
    let balance = model.as_ref().map_or(0.0, |m| m.balance_grams);
    if balance < grams {
        return Err(EngineError::Validation(format!(
            "Insufficient balance in {department_name}. Available: {balance}g, Required: {grams}g"
        )));
    }
    if let Some(model) = model {
        department_stocks::ActiveModel {
            id: ActiveValue::Unchanged(model.id),
            balance_grams: ActiveValue::Set(model.balance_grams - grams),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .update(conn)
        .await?;
    }
    Ok(())
}

/// Sum of `quantity_received`/`weight_received` over a step's direct
/// children, plus the child count.
async fn transferred_totals<C: ConnectionTrait>(
    conn: &C,
    step_id: i32,
) -> ResultEngine<(f64, f64, usize)> {
    let children = manufacturing_steps::Entity::find()
        .filter(manufacturing_steps::Column::ParentStepId.eq(step_id))
        .all(conn)
        .await?;
    let quantity = children
        .iter()
        .map(|c| c.quantity_received.unwrap_or(0.0))
        .sum();
    let weight = children
        .iter()
        .map(|c| c.weight_received.unwrap_or(0.0))
        .sum();
    Ok((quantity, weight, children.len()))
}

fn step_remaining(
    step: &manufacturing_steps::Model,
    transferred_quantity: f64,
    transferred_weight: f64,
    children_count: usize,
) -> StepRemaining {
    let available_quantity = step
        .quantity_returned
        .or(step.quantity_received)
        .unwrap_or(0.0);
    let available_weight = step.weight_returned.or(step.weight_received).unwrap_or(0.0);
    StepRemaining::compute(
        available_quantity,
        available_weight,
        transferred_quantity,
        transferred_weight,
        children_count,
    )
}

impl Engine {
    /// Create a manufacturing step.
    ///
    /// Root steps with a department, a positive received weight and an order
    /// metal draw that weight from the "Inventory" department stock (when an
    /// Inventory department exists) and credit their own department stock.
    pub async fn create_step(&self, cmd: CreateStepCmd) -> ResultEngine<ManufacturingStep> {
        let cmd = &cmd;

        with_tx!(self, |db_tx| {
            require_order(&db_tx, cmd.tenant_id, cmd.order_id).await?;
            if let Some(parent_step_id) = cmd.parent_step_id {
                require_step(&db_tx, cmd.tenant_id, parent_step_id).await?;
            }

            let now = Utc::now();
            let model = manufacturing_steps::ActiveModel {
                tenant_id: ActiveValue::Set(cmd.tenant_id),
                order_id: ActiveValue::Set(cmd.order_id),
                parent_step_id: ActiveValue::Set(cmd.parent_step_id),
                step_type: ActiveValue::Set(cmd.step_type.clone()),
                description: ActiveValue::Set(cmd.description.clone()),
                status: ActiveValue::Set(StepStatus::InProgress.as_str().to_string()),
                department: ActiveValue::Set(cmd.department.clone()),
                worker_name: ActiveValue::Set(cmd.worker_name.clone()),
                received_at: ActiveValue::Set(cmd.weight_received.map(|_| now)),
                quantity_received: ActiveValue::Set(cmd.quantity_received),
                weight_received: ActiveValue::Set(cmd.weight_received),
                notes: ActiveValue::Set(cmd.notes.clone()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let weight_received = cmd.weight_received.unwrap_or(0.0);
            if weight_received > 0.0
                && let Some(department) = &cmd.department
                && cmd.parent_step_id.is_none()
                && let Some(metal_code) =
                    order_metal_code(&db_tx, cmd.tenant_id, cmd.order_id).await?
            {
                let inventory = departments::Entity::find()
                    .filter(departments::Column::TenantId.eq(cmd.tenant_id))
                    .filter(departments::Column::Name.eq("Inventory"))
                    .one(&db_tx)
                    .await?;
                if inventory.is_some() {
                    debit_stock(
                        &db_tx,
                        cmd.tenant_id,
                        "Inventory",
                        &metal_code,
                        weight_received,
                    )
                    .await?;
                }
                credit_stock(&db_tx, cmd.tenant_id, department, &metal_code, weight_received)
                    .await?;
            }

            ManufacturingStep::try_from(model)
        })
    }

    /// Return a manufacturing step by id.
    pub async fn step(&self, tenant_id: i32, step_id: i32) -> ResultEngine<ManufacturingStep> {
        let model = require_step(&self.database, tenant_id, step_id).await?;
        ManufacturingStep::try_from(model)
    }

    /// List a tenant's steps, newest first, optionally scoped to an order.
    pub async fn list_steps(
        &self,
        tenant_id: i32,
        order_id: Option<i32>,
    ) -> ResultEngine<Vec<ManufacturingStep>> {
        let mut query = manufacturing_steps::Entity::find()
            .filter(manufacturing_steps::Column::TenantId.eq(tenant_id))
            .order_by_desc(manufacturing_steps::Column::CreatedAt);
        if let Some(order_id) = order_id {
            query = query.filter(manufacturing_steps::Column::OrderId.eq(order_id));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(ManufacturingStep::try_from).collect()
    }

    /// Quantity and weight still transferable from a parent step.
    pub async fn remaining(&self, tenant_id: i32, step_id: i32) -> ResultEngine<StepRemaining> {
        let step = require_step(&self.database, tenant_id, step_id).await?;
        let (transferred_quantity, transferred_weight, children_count) =
            transferred_totals(&self.database, step.id).await?;
        Ok(step_remaining(
            &step,
            transferred_quantity,
            transferred_weight,
            children_count,
        ))
    }

    /// Transfer part of a parent step's stock into a new child step.
    ///
    /// Moves the transferred weight between the parent's and the child's
    /// department stocks, and completes the parent as soon as either piece
    /// count or weight is depleted within [`crate::TRANSFER_TOLERANCE`]. Any
    /// gap between what the parent received and what it returned stays in the
    /// parent's department stock as processing loss.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<TransferOutcome> {
        require_positive(cmd.quantity, "transfer quantity")?;
        require_positive(cmd.weight, "transfer weight")?;
        let cmd = &cmd;

        with_tx!(self, |db_tx| {
            let parent = require_step(&db_tx, cmd.tenant_id, cmd.parent_step_id).await?;

            let (transferred_quantity, transferred_weight, children_count) =
                transferred_totals(&db_tx, parent.id).await?;
            let remaining = step_remaining(
                &parent,
                transferred_quantity,
                transferred_weight,
                children_count,
            );

            if cmd.quantity > remaining.remaining_quantity {
                return Err(EngineError::Validation(format!(
                    "Cannot transfer {} pieces. Only {} remaining.",
                    cmd.quantity, remaining.remaining_quantity
                )));
            }
            if cmd.weight > remaining.remaining_weight {
                return Err(EngineError::Validation(format!(
                    "Cannot transfer {}g. Only {}g remaining.",
                    cmd.weight, remaining.remaining_weight
                )));
            }

            let now = Utc::now();
            let child = manufacturing_steps::ActiveModel {
                tenant_id: ActiveValue::Set(cmd.tenant_id),
                order_id: ActiveValue::Set(parent.order_id),
                parent_step_id: ActiveValue::Set(Some(parent.id)),
                step_type: ActiveValue::Set(cmd.next_step_type.clone()),
                description: ActiveValue::Set(cmd.next_description.clone()),
                status: ActiveValue::Set(StepStatus::InProgress.as_str().to_string()),
                department: ActiveValue::Set(cmd.department.clone()),
                worker_name: ActiveValue::Set(cmd.received_by.clone()),
                received_at: ActiveValue::Set(Some(now)),
                transferred_by: ActiveValue::Set(parent.worker_name.clone()),
                received_by: ActiveValue::Set(cmd.received_by.clone()),
                quantity_received: ActiveValue::Set(Some(cmd.quantity)),
                weight_received: ActiveValue::Set(Some(cmd.weight)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            if let (Some(parent_department), Some(child_department)) =
                (&parent.department, &cmd.department)
                && cmd.weight > 0.0
                && let Some(metal_code) =
                    order_metal_code(&db_tx, cmd.tenant_id, parent.order_id).await?
            {
                debit_stock(
                    &db_tx,
                    cmd.tenant_id,
                    parent_department,
                    &metal_code,
                    cmd.weight,
                )
                .await?;
                credit_stock(
                    &db_tx,
                    cmd.tenant_id,
                    child_department,
                    &metal_code,
                    cmd.weight,
                )
                .await?;
            }

            let after = step_remaining(
                &parent,
                transferred_quantity + cmd.quantity,
                transferred_weight + cmd.weight,
                children_count + 1,
            );

            let mut parent_active = manufacturing_steps::ActiveModel {
                id: ActiveValue::Unchanged(parent.id),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            // First transfer records the original sender.
            if parent.transferred_by.is_none() {
                parent_active.transferred_by = ActiveValue::Set(parent.worker_name.clone());
            }

            let mut parent_status = StepStatus::try_from(parent.status.as_str())?;
            if after.is_depleted() {
                parent_status = StepStatus::Completed;
                parent_active.status =
                    ActiveValue::Set(StepStatus::Completed.as_str().to_string());
                if parent.completed_at.is_none() {
                    parent_active.completed_at = ActiveValue::Set(Some(now));
                }
                // The processed amount is what went out to children.
                if parent.quantity_returned.is_none() {
                    parent_active.quantity_returned =
                        ActiveValue::Set(Some(after.transferred_quantity));
                }
                if parent.weight_returned.is_none() {
                    parent_active.weight_returned =
                        ActiveValue::Set(Some(after.transferred_weight));
                }
            }
            parent_active.update(&db_tx).await?;

            tracing::debug!(
                tenant_id = cmd.tenant_id,
                parent_step_id = parent.id,
                child_step_id = child.id,
                quantity = cmd.quantity,
                weight = cmd.weight,
                "transferred manufacturing step stock"
            );

            Ok(TransferOutcome {
                parent_step_id: parent.id,
                parent_step_status: parent_status,
                child_step_id: child.id,
                remaining_quantity: after.remaining_quantity,
                remaining_weight: after.remaining_weight,
            })
        })
    }

    /// Patch a step. Entering IN_PROGRESS stamps `started_at`, COMPLETED
    /// stamps `completed_at`, and the first received weight stamps
    /// `received_at`. FAILED is only ever set here, never by `transfer`.
    pub async fn update_step(
        &self,
        tenant_id: i32,
        step_id: i32,
        patch: StepPatch,
    ) -> ResultEngine<ManufacturingStep> {
        let patch = &patch;

        with_tx!(self, |db_tx| {
            let model = require_step(&db_tx, tenant_id, step_id).await?;
            let now = Utc::now();
            let mut active = manufacturing_steps::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };

            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
                if status == StepStatus::InProgress && model.started_at.is_none() {
                    active.started_at = ActiveValue::Set(Some(now));
                }
                if status == StepStatus::Completed && model.completed_at.is_none() {
                    active.completed_at = ActiveValue::Set(Some(now));
                }
            }
            if let Some(department) = &patch.department {
                active.department = ActiveValue::Set(Some(department.clone()));
            }
            if let Some(worker_name) = &patch.worker_name {
                active.worker_name = ActiveValue::Set(Some(worker_name.clone()));
            }
            if let Some(quantity_returned) = patch.quantity_returned {
                active.quantity_returned = ActiveValue::Set(Some(quantity_returned));
            }
            if let Some(weight_returned) = patch.weight_returned {
                active.weight_returned = ActiveValue::Set(Some(weight_returned));
            }
            if let Some(weight_received) = patch.weight_received {
                active.weight_received = ActiveValue::Set(Some(weight_received));
                if model.received_at.is_none() {
                    active.received_at = ActiveValue::Set(Some(now));
                }
            }
            if let Some(notes) = &patch.notes {
                active.notes = ActiveValue::Set(Some(notes.clone()));
            }

            let updated = active.update(&db_tx).await?;
            ManufacturingStep::try_from(updated)
        })
    }

    /// Read the transfer-scoped department stocks.
    pub async fn department_stocks(
        &self,
        tenant_id: i32,
        department_name: Option<&str>,
    ) -> ResultEngine<Vec<DepartmentStock>> {
        let mut query = department_stocks::Entity::find()
            .filter(department_stocks::Column::TenantId.eq(tenant_id))
            .order_by_asc(department_stocks::Column::DepartmentName)
            .order_by_asc(department_stocks::Column::MetalCode);
        if let Some(department_name) = department_name {
            query =
                query.filter(department_stocks::Column::DepartmentName.eq(department_name));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(DepartmentStock::from).collect())
    }
}
