use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, Value,
    sea_query::Expr, prelude::*,
};

use crate::{
    CreateEntryCmd, DepartmentBalance, EngineError, EntryFilter, EntryPatch, LedgerEntry,
    LedgerSummary, MetalBalance, ResultEngine, department_balances, departments,
    ledger_entries::{self, Direction, signed_fine_weight, signed_weight_delta},
};

use super::{Engine, metals::require_active_metal, require_positive, with_tx};

async fn require_department<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    department_id: i32,
) -> ResultEngine<departments::Model> {
    departments::Entity::find()
        .filter(departments::Column::TenantId.eq(tenant_id))
        .filter(departments::Column::Id.eq(department_id))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Department {department_id}")))
}

async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    entry_id: i32,
) -> ResultEngine<ledger_entries::Model> {
    ledger_entries::Entity::find()
        .filter(ledger_entries::Column::TenantId.eq(tenant_id))
        .filter(ledger_entries::Column::Id.eq(entry_id))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("LedgerEntry {entry_id}")))
}

/// Apply a signed gross-weight delta to the `(department, metal)` bucket,
/// creating it at zero when absent.
async fn upsert_department_balance<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    department_id: i32,
    metal_id: i32,
    weight_delta: f64,
) -> ResultEngine<()> {
    let existing = department_balances::Entity::find()
        .filter(department_balances::Column::TenantId.eq(tenant_id))
        .filter(department_balances::Column::DepartmentId.eq(department_id))
        .filter(department_balances::Column::MetalId.eq(metal_id))
        .one(conn)
        .await?;

    let now = Utc::now();
    match existing {
        Some(model) => {
            let balance = department_balances::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                balance_grams: ActiveValue::Set(model.balance_grams + weight_delta),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            balance.update(conn).await?;
        }
        None => {
            department_balances::ActiveModel {
                tenant_id: ActiveValue::Set(tenant_id),
                department_id: ActiveValue::Set(department_id),
                metal_id: ActiveValue::Set(metal_id),
                balance_grams: ActiveValue::Set(weight_delta),
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

impl Engine {
    /// Create a ledger entry, derive its fine weight and move the
    /// `(department, metal)` balance by the entry's signed gross weight.
    pub async fn create_entry(&self, cmd: CreateEntryCmd) -> ResultEngine<LedgerEntry> {
        require_positive(cmd.quantity, "quantity")?;
        require_positive(cmd.weight, "weight")?;
        let cmd = &cmd;

        with_tx!(self, |db_tx| {
            require_department(&db_tx, cmd.tenant_id, cmd.department_id).await?;
            let metal = require_active_metal(&db_tx, cmd.tenant_id, cmd.metal_id).await?;
            let fine_weight = signed_fine_weight(cmd.weight, metal.fine_percentage, cmd.direction);

            let now = Utc::now();
            let model = ledger_entries::ActiveModel {
                tenant_id: ActiveValue::Set(cmd.tenant_id),
                date: ActiveValue::Set(cmd.date),
                department_id: ActiveValue::Set(cmd.department_id),
                order_id: ActiveValue::Set(cmd.order_id),
                metal_id: ActiveValue::Set(cmd.metal_id),
                direction: ActiveValue::Set(cmd.direction.as_str().to_string()),
                quantity: ActiveValue::Set(cmd.quantity),
                weight: ActiveValue::Set(cmd.weight),
                fine_weight: ActiveValue::Set(fine_weight),
                notes: ActiveValue::Set(cmd.notes.clone()),
                is_archived: ActiveValue::Set(false),
                created_by: ActiveValue::Set(cmd.user_id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            upsert_department_balance(
                &db_tx,
                cmd.tenant_id,
                cmd.department_id,
                cmd.metal_id,
                signed_weight_delta(cmd.weight, cmd.direction),
            )
            .await?;

            tracing::debug!(
                tenant_id = cmd.tenant_id,
                entry_id = model.id,
                direction = cmd.direction.as_str(),
                weight = cmd.weight,
                "created ledger entry"
            );
            LedgerEntry::try_from(model)
        })
    }

    /// Update a ledger entry: reverse the old balance delta, apply the patch,
    /// recompute the fine weight, apply the new delta. Changing the
    /// department or metal migrates the balance between buckets.
    pub async fn update_entry(
        &self,
        tenant_id: i32,
        entry_id: i32,
        patch: EntryPatch,
    ) -> ResultEngine<LedgerEntry> {
        if let Some(quantity) = patch.quantity {
            require_positive(quantity, "quantity")?;
        }
        if let Some(weight) = patch.weight {
            require_positive(weight, "weight")?;
        }
        let patch = &patch;

        with_tx!(self, |db_tx| {
            let model = find_entry(&db_tx, tenant_id, entry_id).await?;
            let old_direction = Direction::try_from(model.direction.as_str())?;

            // Reverse the old balance impact before any field changes.
            upsert_department_balance(
                &db_tx,
                tenant_id,
                model.department_id,
                model.metal_id,
                -signed_weight_delta(model.weight, old_direction),
            )
            .await?;

            let date = patch.date.unwrap_or(model.date);
            let department_id = patch.department_id.unwrap_or(model.department_id);
            let order_id = patch.order_id.unwrap_or(model.order_id);
            let metal_id = patch.metal_id.unwrap_or(model.metal_id);
            let direction = patch.direction.unwrap_or(old_direction);
            let quantity = patch.quantity.unwrap_or(model.quantity);
            let weight = patch.weight.unwrap_or(model.weight);
            let notes = patch.notes.clone().or_else(|| model.notes.clone());

            if department_id != model.department_id {
                require_department(&db_tx, tenant_id, department_id).await?;
            }
            let metal = require_active_metal(&db_tx, tenant_id, metal_id).await?;
            let fine_weight = signed_fine_weight(weight, metal.fine_percentage, direction);

            let updated = ledger_entries::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                date: ActiveValue::Set(date),
                department_id: ActiveValue::Set(department_id),
                order_id: ActiveValue::Set(order_id),
                metal_id: ActiveValue::Set(metal_id),
                direction: ActiveValue::Set(direction.as_str().to_string()),
                quantity: ActiveValue::Set(quantity),
                weight: ActiveValue::Set(weight),
                fine_weight: ActiveValue::Set(fine_weight),
                notes: ActiveValue::Set(notes),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            upsert_department_balance(
                &db_tx,
                tenant_id,
                department_id,
                metal_id,
                signed_weight_delta(weight, direction),
            )
            .await?;

            LedgerEntry::try_from(updated)
        })
    }

    /// Delete a ledger entry and reverse its balance impact.
    pub async fn delete_entry(&self, tenant_id: i32, entry_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = find_entry(&db_tx, tenant_id, entry_id).await?;
            let direction = Direction::try_from(model.direction.as_str())?;

            upsert_department_balance(
                &db_tx,
                tenant_id,
                model.department_id,
                model.metal_id,
                -signed_weight_delta(model.weight, direction),
            )
            .await?;

            ledger_entries::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List ledger entries, newest date first. Archived rows are hidden
    /// unless requested.
    pub async fn list_entries(
        &self,
        tenant_id: i32,
        filter: EntryFilter,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::TenantId.eq(tenant_id))
            .order_by_desc(ledger_entries::Column::Date);
        if let Some(department_id) = filter.department_id {
            query = query.filter(ledger_entries::Column::DepartmentId.eq(department_id));
        }
        if let Some(order_id) = filter.order_id {
            query = query.filter(ledger_entries::Column::OrderId.eq(order_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(ledger_entries::Column::Date.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(ledger_entries::Column::Date.lte(date_to));
        }
        if !filter.include_archived {
            query = query.filter(ledger_entries::Column::IsArchived.eq(false));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(LedgerEntry::try_from).collect()
    }

    /// Aggregated ledger summary grouped by metal.
    ///
    /// Metals whose signed fine-weight sum is exactly zero are omitted from
    /// the per-metal list; their quantities still count in the totals.
    pub async fn ledger_summary(
        &self,
        tenant_id: i32,
        department_id: Option<i32>,
    ) -> ResultEngine<LedgerSummary> {
        let backend = self.database.get_database_backend();

        let mut sql = String::from(
            "SELECT e.metal_id AS metal_id, m.code AS metal_code, m.name AS metal_name, \
             CAST(COALESCE(SUM(CASE WHEN e.direction = 'IN' THEN e.quantity ELSE 0 END), 0) AS REAL) AS total_qty_in, \
             CAST(COALESCE(SUM(CASE WHEN e.direction = 'OUT' THEN e.quantity ELSE 0 END), 0) AS REAL) AS total_qty_out, \
             CAST(COALESCE(SUM(e.fine_weight), 0) AS REAL) AS fine_weight_balance \
             FROM department_ledger_entries e \
             INNER JOIN metals m ON m.id = e.metal_id \
             WHERE e.tenant_id = ?",
        );
        let mut values: Vec<Value> = vec![tenant_id.into()];
        if let Some(department_id) = department_id {
            sql.push_str(" AND e.department_id = ?");
            values.push(department_id.into());
        }
        sql.push_str(" GROUP BY e.metal_id, m.code, m.name ORDER BY m.code");

        let rows = self
            .database
            .query_all(Statement::from_sql_and_values(backend, sql, values))
            .await?;

        let mut total_qty_held = 0.0;
        let mut total_qty_out = 0.0;
        let mut balances = Vec::with_capacity(rows.len());
        for row in rows {
            let qty_in: f64 = row.try_get("", "total_qty_in")?;
            let qty_out: f64 = row.try_get("", "total_qty_out")?;
            let fine_weight_balance: f64 = row.try_get("", "fine_weight_balance")?;

            total_qty_held += qty_in - qty_out;
            total_qty_out += qty_out;

            if fine_weight_balance != 0.0 {
                balances.push(MetalBalance {
                    metal_id: row.try_get("", "metal_id")?,
                    metal_code: row.try_get("", "metal_code")?,
                    metal_name: row.try_get("", "metal_name")?,
                    fine_weight_balance,
                });
            }
        }

        Ok(LedgerSummary {
            total_qty_held,
            total_qty_out,
            balances,
        })
    }

    /// Archive all non-archived entries dated within the inclusive range.
    /// Returns the number of rows flagged. Balances are never touched.
    pub async fn archive_entries(
        &self,
        tenant_id: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let result = ledger_entries::Entity::update_many()
                .col_expr(ledger_entries::Column::IsArchived, Expr::value(true))
                .col_expr(ledger_entries::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(ledger_entries::Column::TenantId.eq(tenant_id))
                .filter(ledger_entries::Column::Date.gte(date_from))
                .filter(ledger_entries::Column::Date.lte(date_to))
                .filter(ledger_entries::Column::IsArchived.eq(false))
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected)
        })
    }

    /// Restore an archived entry. No balance effect.
    pub async fn unarchive_entry(
        &self,
        tenant_id: i32,
        entry_id: i32,
    ) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| {
            let model = find_entry(&db_tx, tenant_id, entry_id).await?;
            let updated = ledger_entries::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                is_archived: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            LedgerEntry::try_from(updated)
        })
    }

    /// Read the ledger-scoped department balance buckets.
    pub async fn department_balances(
        &self,
        tenant_id: i32,
        department_id: Option<i32>,
    ) -> ResultEngine<Vec<DepartmentBalance>> {
        let mut query = department_balances::Entity::find()
            .filter(department_balances::Column::TenantId.eq(tenant_id))
            .order_by_asc(department_balances::Column::DepartmentId)
            .order_by_asc(department_balances::Column::MetalId);
        if let Some(department_id) = department_id {
            query = query.filter(department_balances::Column::DepartmentId.eq(department_id));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(DepartmentBalance::from).collect())
    }
}
