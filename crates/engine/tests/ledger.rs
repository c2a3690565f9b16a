use chrono::NaiveDate;
use engine::{CreateEntryCmd, Direction, EngineError, EntryFilter, EntryPatch};

mod common;

use common::{TENANT, USER, assert_close, engine_with_db, insert_company, insert_department, insert_order};

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

#[tokio::test]
async fn create_entry_computes_fine_weight_and_balance() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_22K", "Gold 22K", 0.916, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let entry = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            department,
            order,
            metal.id,
            Direction::In,
            5.0,
            28.9,
        ))
        .await
        .unwrap();
    assert_close(entry.fine_weight, 26.4724);

    let balances = engine.department_balances(TENANT, Some(department)).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_close(balances[0].balance_grams, 28.9);

    let out = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(3),
            department,
            order,
            metal.id,
            Direction::Out,
            5.0,
            10.0,
        ))
        .await
        .unwrap();
    assert_close(out.fine_weight, -9.16);

    let balances = engine.department_balances(TENANT, Some(department)).await.unwrap();
    assert_close(balances[0].balance_grams, 18.9);

    // Correcting the first entry's weight recomputes the balance.
    let updated = engine
        .update_entry(TENANT, entry.id, EntryPatch::default().weight(30.0))
        .await
        .unwrap();
    assert_close(updated.fine_weight, 30.0 * 0.916);

    let balances = engine.department_balances(TENANT, Some(department)).await.unwrap();
    assert_close(balances[0].balance_grams, 20.0);
}

#[tokio::test]
async fn create_then_delete_restores_balance() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "SILVER_925", "Silver 925", 0.925, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let entry = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            department,
            order,
            metal.id,
            Direction::In,
            3.0,
            12.5,
        ))
        .await
        .unwrap();

    engine.delete_entry(TENANT, entry.id).await.unwrap();

    let balances = engine.department_balances(TENANT, Some(department)).await.unwrap();
    assert_eq!(balances[0].balance_grams, 0.0);
    assert!(engine
        .list_entries(TENANT, EntryFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn update_migrates_balance_between_buckets() {
    let (engine, db) = engine_with_db().await;
    let casting = insert_department(&db, TENANT, "Casting").await;
    let polishing = insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_18K", "Gold 18K", 0.750, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let entry = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            casting,
            order,
            metal.id,
            Direction::In,
            2.0,
            40.0,
        ))
        .await
        .unwrap();

    engine
        .update_entry(TENANT, entry.id, EntryPatch::default().department_id(polishing))
        .await
        .unwrap();

    let casting_balances = engine.department_balances(TENANT, Some(casting)).await.unwrap();
    assert_close(casting_balances[0].balance_grams, 0.0);
    let polishing_balances = engine.department_balances(TENANT, Some(polishing)).await.unwrap();
    assert_close(polishing_balances[0].balance_grams, 40.0);
}

#[tokio::test]
async fn rejects_inactive_and_missing_metals() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "PLATINUM", "Platinum", 0.950, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    engine.deactivate_metal(TENANT, metal.id).await.unwrap();

    let err = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            department,
            order,
            metal.id,
            Direction::In,
            1.0,
            5.0,
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(format!("Metal with id {} is inactive", metal.id))
    );

    let err = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            department,
            order,
            9999,
            Direction::In,
            1.0,
            5.0,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // No entry or balance was written by the failed attempts.
    assert!(engine
        .list_entries(TENANT, EntryFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert!(engine
        .department_balances(TENANT, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_department_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_14K", "Gold 14K", 0.585, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    let err = engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(2),
            42,
            order,
            metal.id,
            Direction::In,
            1.0,
            5.0,
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("Department 42".to_string()));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_24K", "Gold 24K", 0.999, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    for (quantity, weight) in [(0.0, 5.0), (-1.0, 5.0), (1.0, 0.0), (1.0, -2.0)] {
        let err = engine
            .create_entry(CreateEntryCmd::new(
                TENANT,
                USER,
                day(2),
                department,
                order,
                metal.id,
                Direction::In,
                quantity,
                weight,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn archive_is_balance_neutral_and_filterable() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_22K", "Gold 22K", 0.916, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;

    for (date, weight) in [(day(1), 10.0), (day(5), 20.0), (day(20), 30.0)] {
        engine
            .create_entry(CreateEntryCmd::new(
                TENANT,
                USER,
                date,
                department,
                order,
                metal.id,
                Direction::In,
                1.0,
                weight,
            ))
            .await
            .unwrap();
    }
    let before = engine.department_balances(TENANT, None).await.unwrap();

    // Inclusive range catches the first two entries only.
    let archived = engine.archive_entries(TENANT, day(1), day(5)).await.unwrap();
    assert_eq!(archived, 2);
    // Re-archiving the same range flags nothing new.
    let archived = engine.archive_entries(TENANT, day(1), day(5)).await.unwrap();
    assert_eq!(archived, 0);

    let visible = engine.list_entries(TENANT, EntryFilter::default()).await.unwrap();
    assert_eq!(visible.len(), 1);
    let all = engine
        .list_entries(
            TENANT,
            EntryFilter {
                include_archived: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let archived_entry = all.iter().find(|e| e.is_archived).unwrap();
    engine.unarchive_entry(TENANT, archived_entry.id).await.unwrap();
    let visible = engine.list_entries(TENANT, EntryFilter::default()).await.unwrap();
    assert_eq!(visible.len(), 2);

    // Balances never moved through any of this.
    let after = engine.department_balances(TENANT, None).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn list_filters_and_sorts_by_date_desc() {
    let (engine, db) = engine_with_db().await;
    let casting = insert_department(&db, TENANT, "Casting").await;
    let polishing = insert_department(&db, TENANT, "Polishing").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let metal = engine
        .register_metal(TENANT, "GOLD_22K", "Gold 22K", 0.916, None)
        .await
        .unwrap();
    let order_a = insert_order(&db, TENANT, "ORD-001", company, Some(metal.id), None, None).await;
    let order_b = insert_order(&db, TENANT, "ORD-002", company, Some(metal.id), None, None).await;

    for (date, department, order) in [
        (day(1), casting, order_a),
        (day(10), polishing, order_b),
        (day(5), casting, order_b),
    ] {
        engine
            .create_entry(CreateEntryCmd::new(
                TENANT,
                USER,
                date,
                department,
                order,
                metal.id,
                Direction::In,
                1.0,
                5.0,
            ))
            .await
            .unwrap();
    }

    let all = engine.list_entries(TENANT, EntryFilter::default()).await.unwrap();
    let dates: Vec<_> = all.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![day(10), day(5), day(1)]);

    let casting_only = engine
        .list_entries(
            TENANT,
            EntryFilter {
                department_id: Some(casting),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(casting_only.len(), 2);

    let ranged = engine
        .list_entries(
            TENANT,
            EntryFilter {
                date_from: Some(day(2)),
                date_to: Some(day(10)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 2);
}

#[tokio::test]
async fn summary_omits_zero_balances_but_counts_quantities() {
    let (engine, db) = engine_with_db().await;
    let department = insert_department(&db, TENANT, "Casting").await;
    let company = insert_company(&db, TENANT, "Aurum Srl").await;
    let gold = engine
        .register_metal(TENANT, "GOLD_22K", "Gold 22K", 0.916, None)
        .await
        .unwrap();
    let silver = engine
        .register_metal(TENANT, "SILVER_925", "Silver 925", 0.925, None)
        .await
        .unwrap();
    let order = insert_order(&db, TENANT, "ORD-001", company, Some(gold.id), None, None).await;

    // Gold nets to zero fine weight: 10g in, 10g out.
    for direction in [Direction::In, Direction::Out] {
        engine
            .create_entry(CreateEntryCmd::new(
                TENANT,
                USER,
                day(2),
                department,
                order,
                gold.id,
                direction,
                2.0,
                10.0,
            ))
            .await
            .unwrap();
    }
    // Silver stays held.
    engine
        .create_entry(CreateEntryCmd::new(
            TENANT,
            USER,
            day(3),
            department,
            order,
            silver.id,
            Direction::In,
            5.0,
            20.0,
        ))
        .await
        .unwrap();

    let summary = engine.ledger_summary(TENANT, None).await.unwrap();
    assert_eq!(summary.balances.len(), 1);
    assert_eq!(summary.balances[0].metal_code, "SILVER_925");
    assert_close(summary.balances[0].fine_weight_balance, 18.5);
    // total held = (2 - 2) + (5 - 0); total out = 2.
    assert_close(summary.total_qty_held, 5.0);
    assert_close(summary.total_qty_out, 2.0);
}

#[tokio::test]
async fn update_missing_entry_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .update_entry(TENANT, 123, EntryPatch::default().weight(1.0))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("LedgerEntry 123".to_string()));
}
