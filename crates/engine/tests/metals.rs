use engine::{EngineError, MetalPatch};

mod common;

use common::{TENANT, engine_with_db};

#[tokio::test]
async fn seeding_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let created = engine.seed_default_metals(TENANT).await.unwrap();
    assert_eq!(created, 6);
    let created = engine.seed_default_metals(TENANT).await.unwrap();
    assert_eq!(created, 0);

    let metals = engine.list_metals(TENANT, false).await.unwrap();
    assert_eq!(metals.len(), 6);

    let gold = engine.metal_by_code(TENANT, "GOLD_22K").await.unwrap();
    assert_eq!(gold.fine_percentage, 0.916);
}

#[tokio::test]
async fn codes_are_unique_per_tenant_and_uppercased() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register_metal(TENANT, "gold_9k", "Gold 9K", 0.375, None)
        .await
        .unwrap();
    let err = engine
        .register_metal(TENANT, "GOLD_9K", "Gold 9K again", 0.375, None)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Duplicate("GOLD_9K".to_string()));

    // Another tenant can reuse the code.
    engine
        .register_metal(TENANT + 1, "GOLD_9K", "Gold 9K", 0.375, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn deactivation_hides_from_default_listing() {
    let (engine, _db) = engine_with_db().await;
    let metal = engine
        .register_metal(TENANT, "PLATINUM", "Platinum", 0.950, None)
        .await
        .unwrap();

    engine.deactivate_metal(TENANT, metal.id).await.unwrap();

    assert!(engine.list_metals(TENANT, false).await.unwrap().is_empty());
    let all = engine.list_metals(TENANT, true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].is_active);
}

#[tokio::test]
async fn patch_updates_registry_fields() {
    let (engine, _db) = engine_with_db().await;
    let metal = engine
        .register_metal(TENANT, "SILVER_925", "Silver 925", 0.925, None)
        .await
        .unwrap();

    let updated = engine
        .update_metal(
            TENANT,
            metal.id,
            MetalPatch::default()
                .name("Sterling Silver")
                .average_cost_per_gram(1.15),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Sterling Silver");
    assert_eq!(updated.average_cost_per_gram, Some(1.15));
    assert_eq!(updated.fine_percentage, 0.925);

    let err = engine
        .update_metal(TENANT, metal.id, MetalPatch::default().fine_percentage(1.5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_metal(TENANT, 999, MetalPatch::default().name("x"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("Metal 999".to_string()));
}
