use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{DEFAULT_METALS, EngineError, Metal, MetalPatch, ResultEngine, metals};

use super::{Engine, with_tx};

pub(crate) async fn find_metal<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    metal_id: i32,
) -> ResultEngine<Option<metals::Model>> {
    Ok(metals::Entity::find()
        .filter(metals::Column::TenantId.eq(tenant_id))
        .filter(metals::Column::Id.eq(metal_id))
        .one(conn)
        .await?)
}

pub(crate) async fn require_metal<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    metal_id: i32,
) -> ResultEngine<metals::Model> {
    find_metal(conn, tenant_id, metal_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("Metal {metal_id}")))
}

/// Metal lookup for mutating operations: both a missing and an inactive
/// metal are caller-correctable input problems, so both surface as
/// validation errors naming the metal.
pub(crate) async fn require_active_metal<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    metal_id: i32,
) -> ResultEngine<metals::Model> {
    let metal = find_metal(conn, tenant_id, metal_id).await?.ok_or_else(|| {
        EngineError::Validation(format!(
            "Metal with id '{metal_id}' not found for this tenant"
        ))
    })?;
    if !metal.is_active {
        return Err(EngineError::Validation(format!(
            "Metal with id {metal_id} is inactive"
        )));
    }
    Ok(metal)
}

impl Engine {
    /// Register a new metal for a tenant. Codes are stored uppercased and
    /// must be unique per tenant.
    pub async fn register_metal(
        &self,
        tenant_id: i32,
        code: &str,
        name: &str,
        fine_percentage: f64,
        average_cost_per_gram: Option<f64>,
    ) -> ResultEngine<Metal> {
        Metal::validate_fine_percentage(fine_percentage)?;
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(EngineError::Validation(
                "metal code must not be empty".to_string(),
            ));
        }
        let name = name.to_string();

        with_tx!(self, |db_tx| {
            let existing = metals::Entity::find()
                .filter(metals::Column::TenantId.eq(tenant_id))
                .filter(metals::Column::Code.eq(code.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Duplicate(code.clone()));
            }

            let now = Utc::now();
            let model = metals::ActiveModel {
                tenant_id: ActiveValue::Set(tenant_id),
                code: ActiveValue::Set(code.clone()),
                name: ActiveValue::Set(name.clone()),
                fine_percentage: ActiveValue::Set(fine_percentage),
                average_cost_per_gram: ActiveValue::Set(average_cost_per_gram),
                is_active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(tenant_id, code = %model.code, "registered metal");
            Ok(Metal::from(model))
        })
    }

    /// Return a metal by id.
    pub async fn metal(&self, tenant_id: i32, metal_id: i32) -> ResultEngine<Metal> {
        let model = require_metal(&self.database, tenant_id, metal_id).await?;
        Ok(Metal::from(model))
    }

    /// Return a metal by its tenant-unique code.
    pub async fn metal_by_code(&self, tenant_id: i32, code: &str) -> ResultEngine<Metal> {
        let code = code.trim().to_uppercase();
        let model = metals::Entity::find()
            .filter(metals::Column::TenantId.eq(tenant_id))
            .filter(metals::Column::Code.eq(code.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Metal {code}")))?;
        Ok(Metal::from(model))
    }

    /// List a tenant's metals, active only by default.
    pub async fn list_metals(
        &self,
        tenant_id: i32,
        include_inactive: bool,
    ) -> ResultEngine<Vec<Metal>> {
        let mut query = metals::Entity::find()
            .filter(metals::Column::TenantId.eq(tenant_id))
            .order_by_asc(metals::Column::Code);
        if !include_inactive {
            query = query.filter(metals::Column::IsActive.eq(true));
        }
        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(Metal::from).collect())
    }

    /// Patch a metal's name, purity or average cost.
    pub async fn update_metal(
        &self,
        tenant_id: i32,
        metal_id: i32,
        patch: MetalPatch,
    ) -> ResultEngine<Metal> {
        if let Some(fine_percentage) = patch.fine_percentage {
            Metal::validate_fine_percentage(fine_percentage)?;
        }
        let patch = &patch;

        with_tx!(self, |db_tx| {
            let model = require_metal(&db_tx, tenant_id, metal_id).await?;
            let mut active = metals::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(name) = &patch.name {
                active.name = ActiveValue::Set(name.clone());
            }
            if let Some(fine_percentage) = patch.fine_percentage {
                active.fine_percentage = ActiveValue::Set(fine_percentage);
            }
            if let Some(cost) = patch.average_cost_per_gram {
                active.average_cost_per_gram = ActiveValue::Set(Some(cost));
            }
            let model = active.update(&db_tx).await?;
            Ok(Metal::from(model))
        })
    }

    /// Deactivate a metal. Historic rows stay readable; new movements
    /// against it are rejected.
    pub async fn deactivate_metal(&self, tenant_id: i32, metal_id: i32) -> ResultEngine<Metal> {
        with_tx!(self, |db_tx| {
            let model = require_metal(&db_tx, tenant_id, metal_id).await?;
            let active = metals::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                is_active: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            tracing::debug!(tenant_id, code = %model.code, "deactivated metal");
            Ok(Metal::from(model))
        })
    }

    /// Seed the stock metal registry for a tenant. Idempotent: codes already
    /// present are left untouched. Returns the number of metals created.
    pub async fn seed_default_metals(&self, tenant_id: i32) -> ResultEngine<u32> {
        with_tx!(self, |db_tx| {
            let mut created = 0;
            for (code, name, fine_percentage) in DEFAULT_METALS {
                let existing = metals::Entity::find()
                    .filter(metals::Column::TenantId.eq(tenant_id))
                    .filter(metals::Column::Code.eq(code))
                    .one(&db_tx)
                    .await?;
                if existing.is_some() {
                    continue;
                }
                let now = Utc::now();
                metals::ActiveModel {
                    tenant_id: ActiveValue::Set(tenant_id),
                    code: ActiveValue::Set(code.to_string()),
                    name: ActiveValue::Set(name.to_string()),
                    fine_percentage: ActiveValue::Set(fine_percentage),
                    average_cost_per_gram: ActiveValue::Set(None),
                    is_active: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
                created += 1;
            }
            Ok(created)
        })
    }
}
