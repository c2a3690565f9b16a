use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    CastingConsumption, CompanyDepositCmd, CompanyMetalBalance, EngineError, MetalTransaction,
    ResultEngine, SafePurchaseCmd, SafeSupply, SupplyKind, TransactionFilter, TransactionType,
    companies, company_balances, metal_transactions, metals, safe_supplies,
};

use super::{
    Engine, manufacturing::require_order, metals::require_metal, require_positive, with_tx,
};

async fn require_company<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    company_id: i32,
) -> ResultEngine<companies::Model> {
    companies::Entity::find()
        .filter(companies::Column::TenantId.eq(tenant_id))
        .filter(companies::Column::Id.eq(company_id))
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Company {company_id}")))
}

async fn get_or_create_supply<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    kind: SupplyKind,
) -> ResultEngine<safe_supplies::Model> {
    let mut query = safe_supplies::Entity::find()
        .filter(safe_supplies::Column::TenantId.eq(tenant_id))
        .filter(safe_supplies::Column::SupplyType.eq(kind.type_str()));
    query = match kind.metal_id() {
        Some(metal_id) => query.filter(safe_supplies::Column::MetalId.eq(metal_id)),
        None => query.filter(safe_supplies::Column::MetalId.is_null()),
    };
    if let Some(model) = query.one(conn).await? {
        return Ok(model);
    }

    let now = Utc::now();
    Ok(safe_supplies::ActiveModel {
        tenant_id: ActiveValue::Set(tenant_id),
        metal_id: ActiveValue::Set(kind.metal_id()),
        supply_type: ActiveValue::Set(kind.type_str().to_string()),
        quantity_grams: ActiveValue::Set(0.0),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

async fn set_supply_quantity<C: ConnectionTrait>(
    conn: &C,
    supply_id: i32,
    quantity_grams: f64,
) -> ResultEngine<()> {
    safe_supplies::ActiveModel {
        id: ActiveValue::Unchanged(supply_id),
        quantity_grams: ActiveValue::Set(quantity_grams),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(())
}

async fn get_or_create_company_balance<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    company_id: i32,
    metal_id: i32,
) -> ResultEngine<company_balances::Model> {
    let existing = company_balances::Entity::find()
        .filter(company_balances::Column::TenantId.eq(tenant_id))
        .filter(company_balances::Column::CompanyId.eq(company_id))
        .filter(company_balances::Column::MetalId.eq(metal_id))
        .one(conn)
        .await?;
    if let Some(model) = existing {
        return Ok(model);
    }

    let now = Utc::now();
    Ok(company_balances::ActiveModel {
        tenant_id: ActiveValue::Set(tenant_id),
        company_id: ActiveValue::Set(company_id),
        metal_id: ActiveValue::Set(metal_id),
        balance_grams: ActiveValue::Set(0.0),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

#[allow(clippy::too_many_arguments)]
async fn insert_transaction<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    transaction_type: TransactionType,
    metal_id: Option<i32>,
    company_id: Option<i32>,
    order_id: Option<i32>,
    quantity_grams: f64,
    notes: Option<String>,
    user_id: i32,
) -> ResultEngine<metal_transactions::Model> {
    Ok(metal_transactions::ActiveModel {
        tenant_id: ActiveValue::Set(tenant_id),
        transaction_type: ActiveValue::Set(transaction_type.as_str().to_string()),
        metal_id: ActiveValue::Set(metal_id),
        company_id: ActiveValue::Set(company_id),
        order_id: ActiveValue::Set(order_id),
        quantity_grams: ActiveValue::Set(quantity_grams),
        notes: ActiveValue::Set(notes),
        created_by: ActiveValue::Set(user_id),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

impl Engine {
    /// Record a purchase into the safe.
    ///
    /// Fine-metal purchases recompute the metal's running average cost as a
    /// quantity-weighted average over the existing safe quantity and the new
    /// purchase, falling back to the purchase cost when the combined
    /// quantity is not positive.
    pub async fn record_safe_purchase(
        &self,
        cmd: SafePurchaseCmd,
    ) -> ResultEngine<MetalTransaction> {
        require_positive(cmd.quantity_grams, "quantity_grams")?;
        let cmd = &cmd;

        with_tx!(self, |db_tx| {
            if let SupplyKind::FineMetal(metal_id) = cmd.supply {
                let metal = require_metal(&db_tx, cmd.tenant_id, metal_id).await?;
                let supply = get_or_create_supply(&db_tx, cmd.tenant_id, cmd.supply).await?;
                let old_qty = supply.quantity_grams;
                let old_cost = metal.average_cost_per_gram.unwrap_or(0.0);

                let average = if old_qty + cmd.quantity_grams > 0.0 {
                    ((old_cost * old_qty) + (cmd.cost_per_gram * cmd.quantity_grams))
                        / (old_qty + cmd.quantity_grams)
                } else {
                    cmd.cost_per_gram
                };
                metals::ActiveModel {
                    id: ActiveValue::Unchanged(metal.id),
                    average_cost_per_gram: ActiveValue::Set(Some(average)),
                    updated_at: ActiveValue::Set(Utc::now()),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }

            let supply = get_or_create_supply(&db_tx, cmd.tenant_id, cmd.supply).await?;
            set_supply_quantity(
                &db_tx,
                supply.id,
                supply.quantity_grams + cmd.quantity_grams,
            )
            .await?;

            let row = insert_transaction(
                &db_tx,
                cmd.tenant_id,
                TransactionType::SafePurchase,
                cmd.supply.metal_id(),
                None,
                None,
                cmd.quantity_grams,
                cmd.notes.clone(),
                cmd.user_id,
            )
            .await?;

            tracing::debug!(
                tenant_id = cmd.tenant_id,
                supply_type = cmd.supply.type_str(),
                quantity_grams = cmd.quantity_grams,
                "recorded safe purchase"
            );
            MetalTransaction::try_from(row)
        })
    }

    /// Record a customer metal deposit.
    ///
    /// The deposited metal physically enters the safe, so the company trust
    /// balance and the fine-metal safe bucket are credited together.
    pub async fn record_company_deposit(
        &self,
        cmd: CompanyDepositCmd,
    ) -> ResultEngine<MetalTransaction> {
        require_positive(cmd.quantity_grams, "quantity_grams")?;
        let cmd = &cmd;

        with_tx!(self, |db_tx| {
            require_company(&db_tx, cmd.tenant_id, cmd.company_id).await?;
            let metal = require_metal(&db_tx, cmd.tenant_id, cmd.metal_id).await?;
            if !metal.is_active {
                return Err(EngineError::Validation(format!(
                    "Metal with id {} is inactive",
                    metal.id
                )));
            }

            let balance =
                get_or_create_company_balance(&db_tx, cmd.tenant_id, cmd.company_id, metal.id)
                    .await?;
            company_balances::ActiveModel {
                id: ActiveValue::Unchanged(balance.id),
                balance_grams: ActiveValue::Set(balance.balance_grams + cmd.quantity_grams),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            let supply =
                get_or_create_supply(&db_tx, cmd.tenant_id, SupplyKind::FineMetal(metal.id))
                    .await?;
            set_supply_quantity(
                &db_tx,
                supply.id,
                supply.quantity_grams + cmd.quantity_grams,
            )
            .await?;

            let row = insert_transaction(
                &db_tx,
                cmd.tenant_id,
                TransactionType::CompanyDeposit,
                Some(metal.id),
                Some(cmd.company_id),
                None,
                cmd.quantity_grams,
                cmd.notes.clone(),
                cmd.user_id,
            )
            .await?;
            MetalTransaction::try_from(row)
        })
    }

    /// Consume metal for casting an order: split the gross weight into fine
    /// metal and alloy, draw the fine metal from the company trust balance
    /// (routing any deficit to the safe) and the alloy from the safe's alloy
    /// bucket.
    ///
    /// Orders without a target weight per piece or with no positive quantity
    /// are skipped: the call logs and returns `Ok(None)`.
    pub async fn process_casting_consumption(
        &self,
        tenant_id: i32,
        order_id: i32,
        user_id: i32,
    ) -> ResultEngine<Option<CastingConsumption>> {
        with_tx!(self, |db_tx| {
            let order = require_order(&db_tx, tenant_id, order_id).await?;

            let metal_id = order.metal_id.ok_or_else(|| {
                EngineError::Validation(format!("Order {order_id} has no metal assigned"))
            })?;
            let metal = metals::Entity::find()
                .filter(metals::Column::TenantId.eq(tenant_id))
                .filter(metals::Column::Id.eq(metal_id))
                .one(&db_tx)
                .await?;
            let metal = match metal {
                Some(metal) if metal.is_active => metal,
                _ => {
                    return Err(EngineError::Validation(format!(
                        "Metal with id {metal_id} is inactive"
                    )));
                }
            };

            let Some(target_weight) = order.target_weight_per_piece.filter(|w| *w > 0.0) else {
                tracing::warn!(
                    order_id,
                    "order missing target_weight_per_piece, skipping casting consumption"
                );
                return Ok(None);
            };
            let Some(quantity) = order.quantity.filter(|q| *q > 0.0) else {
                tracing::warn!(order_id, "order has zero quantity, skipping casting consumption");
                return Ok(None);
            };

            let total_weight = quantity * target_weight;
            let fine_metal_grams = total_weight * metal.fine_percentage;
            let alloy_grams = total_weight - fine_metal_grams;

            // Draw the fine metal from the company's trust balance.
            let balance =
                get_or_create_company_balance(&db_tx, tenant_id, order.company_id, metal.id)
                    .await?;
            let balance_before = balance.balance_grams;
            let balance_after = balance_before - fine_metal_grams;
            company_balances::ActiveModel {
                id: ActiveValue::Unchanged(balance.id),
                balance_grams: ActiveValue::Set(balance_after),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            // Deficit routing: a balance crossing zero charges the safe only
            // for the overshoot; a balance that was already negative has no
            // trust metal left, so the whole consumption is funded from the
            // safe.
            let safe_fine =
                get_or_create_supply(&db_tx, tenant_id, SupplyKind::FineMetal(metal.id)).await?;
            let mut safe_fine_after = safe_fine.quantity_grams;
            if balance_after < 0.0 && balance_before >= 0.0 {
                safe_fine_after += balance_after;
            } else if balance_after < 0.0 && balance_before < 0.0 {
                safe_fine_after -= fine_metal_grams;
            }
            if safe_fine_after != safe_fine.quantity_grams {
                set_supply_quantity(&db_tx, safe_fine.id, safe_fine_after).await?;
            }

            // Alloy is never customer-owned; it always comes from the safe.
            let safe_alloy = get_or_create_supply(&db_tx, tenant_id, SupplyKind::Alloy).await?;
            let safe_alloy_after = safe_alloy.quantity_grams - alloy_grams;
            set_supply_quantity(&db_tx, safe_alloy.id, safe_alloy_after).await?;

            insert_transaction(
                &db_tx,
                tenant_id,
                TransactionType::ManufacturingConsumption,
                Some(metal.id),
                Some(order.company_id),
                Some(order_id),
                -fine_metal_grams,
                Some(format!(
                    "Casting consumption: {fine_metal_grams:.4}g fine metal for order {}",
                    order.order_number
                )),
                user_id,
            )
            .await?;
            insert_transaction(
                &db_tx,
                tenant_id,
                TransactionType::ManufacturingConsumption,
                None,
                Some(order.company_id),
                Some(order_id),
                -alloy_grams,
                Some(format!(
                    "Casting consumption: {alloy_grams:.4}g alloy for order {}",
                    order.order_number
                )),
                user_id,
            )
            .await?;

            tracing::debug!(
                tenant_id,
                order_id,
                fine_metal_grams,
                alloy_grams,
                "processed casting consumption"
            );

            Ok(Some(CastingConsumption {
                fine_metal_grams,
                alloy_grams,
                metal_code: metal.code,
                company_id: order.company_id,
                order_id,
                company_balance_after: balance_after,
                safe_fine_metal_after: safe_fine_after,
                safe_alloy_after,
            }))
        })
    }

    /// Read the safe supply buckets with their metal codes resolved.
    pub async fn safe_supplies(&self, tenant_id: i32) -> ResultEngine<Vec<SafeSupply>> {
        let rows = safe_supplies::Entity::find()
            .filter(safe_supplies::Column::TenantId.eq(tenant_id))
            .order_by_asc(safe_supplies::Column::SupplyType)
            .order_by_asc(safe_supplies::Column::MetalId)
            .all(&self.database)
            .await?;
        let metals = metals::Entity::find()
            .filter(metals::Column::TenantId.eq(tenant_id))
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let kind = SupplyKind::from_columns(row.metal_id, row.supply_type.as_str())?;
            let metal = kind
                .metal_id()
                .and_then(|id| metals.iter().find(|m| m.id == id));
            out.push(SafeSupply {
                kind,
                metal_code: metal.map(|m| m.code.clone()),
                metal_name: metal.map(|m| m.name.clone()),
                quantity_grams: row.quantity_grams,
            });
        }
        Ok(out)
    }

    /// Read a company's trust balances.
    pub async fn company_balances(
        &self,
        tenant_id: i32,
        company_id: i32,
    ) -> ResultEngine<Vec<CompanyMetalBalance>> {
        require_company(&self.database, tenant_id, company_id).await?;

        let rows = company_balances::Entity::find()
            .filter(company_balances::Column::TenantId.eq(tenant_id))
            .filter(company_balances::Column::CompanyId.eq(company_id))
            .find_also_related(metals::Entity)
            .order_by_asc(company_balances::Column::MetalId)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (row, metal) in rows {
            let metal = metal
                .ok_or_else(|| EngineError::NotFound(format!("Metal {}", row.metal_id)))?;
            out.push(CompanyMetalBalance {
                company_id: row.company_id,
                metal_id: row.metal_id,
                metal_code: metal.code,
                metal_name: metal.name,
                balance_grams: row.balance_grams,
            });
        }
        Ok(out)
    }

    /// List metal transaction audit rows, newest first.
    pub async fn metal_transactions(
        &self,
        tenant_id: i32,
        filter: TransactionFilter,
    ) -> ResultEngine<Vec<MetalTransaction>> {
        let mut query = metal_transactions::Entity::find()
            .filter(metal_transactions::Column::TenantId.eq(tenant_id))
            .order_by_desc(metal_transactions::Column::CreatedAt)
            .order_by_desc(metal_transactions::Column::Id);
        if let Some(company_id) = filter.company_id {
            query = query.filter(metal_transactions::Column::CompanyId.eq(company_id));
        }
        if let Some(metal_id) = filter.metal_id {
            query = query.filter(metal_transactions::Column::MetalId.eq(metal_id));
        }
        if let Some(transaction_type) = filter.transaction_type {
            query = query
                .filter(metal_transactions::Column::TransactionType.eq(transaction_type.as_str()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(MetalTransaction::try_from).collect()
    }
}
