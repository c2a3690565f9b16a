use engine::{CreateStepCmd, EngineError, StepPatch, StepStatus, TransferCmd};

mod common;

use common::{
    TENANT, assert_close, engine_with_db, insert_company, insert_department,
    insert_department_stock, insert_order,
};

#[tokio::test]
async fn remaining_tracks_children() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let parent = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .step_type("casting")
                .received(10.0, 50.0),
        )
        .await
        .unwrap();

    let remaining = engine.remaining(TENANT, parent.id).await.unwrap();
    assert_close(remaining.total_quantity, 10.0);
    assert_close(remaining.total_weight, 50.0);
    assert_close(remaining.remaining_quantity, 10.0);
    assert_close(remaining.remaining_weight, 50.0);
    assert_eq!(remaining.children_count, 0);

    engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 4.0, 20.0)
                .department("Polishing")
                .received_by("Paolo")
                .next_step_type("polishing"),
        )
        .await
        .unwrap();

    let remaining = engine.remaining(TENANT, parent.id).await.unwrap();
    assert_close(remaining.transferred_quantity, 4.0);
    assert_close(remaining.transferred_weight, 20.0);
    assert_close(remaining.remaining_quantity, 6.0);
    assert_close(remaining.remaining_weight, 30.0);
    assert_eq!(remaining.children_count, 1);
}

#[tokio::test]
async fn transfer_creates_child_and_moves_stock() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let parent = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(10.0, 50.0),
        )
        .await
        .unwrap();

    // Intake credited the casting floor.
    let stocks = engine.department_stocks(TENANT, Some("Casting")).await.unwrap();
    assert_close(stocks[0].balance_grams, 50.0);

    let outcome = engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 4.0, 20.0)
                .department("Polishing")
                .received_by("Paolo"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.parent_step_id, parent.id);
    assert_eq!(outcome.parent_step_status, StepStatus::InProgress);
    assert_close(outcome.remaining_quantity, 6.0);
    assert_close(outcome.remaining_weight, 30.0);

    let child = engine.step(TENANT, outcome.child_step_id).await.unwrap();
    assert_eq!(child.parent_step_id, Some(parent.id));
    assert_eq!(child.order_id, order);
    assert_eq!(child.status, StepStatus::InProgress);
    assert_eq!(child.quantity_received, Some(4.0));
    assert_eq!(child.weight_received, Some(20.0));
    assert_eq!(child.received_by.as_deref(), Some("Paolo"));
    assert_eq!(child.transferred_by.as_deref(), Some("Marco"));

    // First transfer recorded the original sender on the parent.
    let parent = engine.step(TENANT, parent.id).await.unwrap();
    assert_eq!(parent.transferred_by.as_deref(), Some("Marco"));

    let casting = engine.department_stocks(TENANT, Some("Casting")).await.unwrap();
    assert_close(casting[0].balance_grams, 30.0);
    let polishing = engine.department_stocks(TENANT, Some("Polishing")).await.unwrap();
    assert_close(polishing[0].balance_grams, 20.0);
}

#[tokio::test]
async fn over_transfer_is_rejected_without_side_effects() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let parent = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(10.0, 50.0),
        )
        .await
        .unwrap();

    let err = engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 12.0, 20.0)
                .department("Polishing")
                .received_by("Paolo"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Cannot transfer 12 pieces. Only 10 remaining.".to_string())
    );

    let err = engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 4.0, 60.0)
                .department("Polishing")
                .received_by("Paolo"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Cannot transfer 60g. Only 50g remaining.".to_string())
    );

    // No child was created, no stock moved.
    let remaining = engine.remaining(TENANT, parent.id).await.unwrap();
    assert_eq!(remaining.children_count, 0);
    assert_close(remaining.remaining_quantity, 10.0);
    let casting = engine.department_stocks(TENANT, Some("Casting")).await.unwrap();
    assert_close(casting[0].balance_grams, 50.0);
    assert!(engine
        .department_stocks(TENANT, Some("Polishing"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn transfer_rejects_non_positive_amounts() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;
    let parent = engine
        .create_step(CreateStepCmd::new(TENANT, order).received(10.0, 50.0))
        .await
        .unwrap();

    for (quantity, weight) in [(0.0, 10.0), (-1.0, 10.0), (1.0, 0.0), (1.0, -5.0)] {
        let err = engine
            .transfer(TransferCmd::new(TENANT, parent.id, quantity, weight))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn full_transfer_auto_completes_parent() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let parent = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(12.0, 60.0),
        )
        .await
        .unwrap();
    // The step was worked down to 10 pieces / 50g before handover.
    engine
        .update_step(TENANT, parent.id, StepPatch::default().returned(10.0, 50.0))
        .await
        .unwrap();

    let outcome = engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 10.0, 50.0)
                .department("Polishing")
                .received_by("Paolo"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.parent_step_status, StepStatus::Completed);
    assert_close(outcome.remaining_quantity, 0.0);
    assert_close(outcome.remaining_weight, 0.0);

    let parent = engine.step(TENANT, parent.id).await.unwrap();
    assert_eq!(parent.status, StepStatus::Completed);
    assert!(parent.completed_at.is_some());
    // Already-set returned amounts are kept.
    assert_eq!(parent.quantity_returned, Some(10.0));
    assert_eq!(parent.weight_returned, Some(50.0));
}

#[tokio::test]
async fn depleting_one_metric_completes_and_backfills() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Casting").await;
    insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let parent = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(10.0, 50.0),
        )
        .await
        .unwrap();

    // All pieces leave but 30g of weight remains notionally available: the
    // quantity depletion alone completes the parent.
    let outcome = engine
        .transfer(
            TransferCmd::new(TENANT, parent.id, 10.0, 20.0)
                .department("Polishing")
                .received_by("Paolo"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.parent_step_status, StepStatus::Completed);
    assert_close(outcome.remaining_quantity, 0.0);
    assert_close(outcome.remaining_weight, 30.0);

    // Returned amounts are backfilled with the cumulative transferred totals.
    let parent = engine.step(TENANT, parent.id).await.unwrap();
    assert_eq!(parent.quantity_returned, Some(10.0));
    assert_eq!(parent.weight_returned, Some(20.0));
}

#[tokio::test]
async fn intake_draws_from_inventory_stock() {
    let (engine, db) = engine_with_db().await;
    insert_department(&db, TENANT, "Inventory").await;
    insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;
    insert_department_stock(&db, TENANT, "Inventory", "GOLD_18K", 100.0).await;

    engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(5.0, 30.0),
        )
        .await
        .unwrap();

    let inventory = engine.department_stocks(TENANT, Some("Inventory")).await.unwrap();
    assert_close(inventory[0].balance_grams, 70.0);
    let casting = engine.department_stocks(TENANT, Some("Casting")).await.unwrap();
    assert_close(casting[0].balance_grams, 30.0);

    // Drawing more than the inventory holds fails and rolls everything back.
    let err = engine
        .create_step(
            CreateStepCmd::new(TENANT, order)
                .department("Casting")
                .worker("Marco")
                .received(5.0, 200.0),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(
            "Insufficient balance in Inventory. Available: 70g, Required: 200g".to_string()
        )
    );
    assert_eq!(engine.list_steps(TENANT, Some(order)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_parent_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .transfer(TransferCmd::new(TENANT, 999, 1.0, 1.0))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NotFound("Manufacturing step 999".to_string())
    );
}

#[tokio::test]
async fn update_step_stamps_status_timestamps() {
    let (engine, db) = engine_with_db().await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;
    let step = engine
        .create_step(CreateStepCmd::new(TENANT, order))
        .await
        .unwrap();
    assert!(step.started_at.is_none());

    let step = engine
        .update_step(TENANT, step.id, StepPatch::default().status(StepStatus::InProgress))
        .await
        .unwrap();
    assert!(step.started_at.is_some());

    let step = engine
        .update_step(TENANT, step.id, StepPatch::default().status(StepStatus::Failed))
        .await
        .unwrap();
    assert_eq!(step.status, StepStatus::Failed);
    assert!(step.completed_at.is_none());
}
