#![allow(dead_code)]

use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

pub const TENANT: i32 = 1;
pub const USER: i32 = 10;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn insert_returning_id(db: &DatabaseConnection, sql: &str, values: Vec<sea_orm::Value>) -> i32 {
    let backend = db.get_database_backend();
    let result = db
        .execute(Statement::from_sql_and_values(backend, sql, values))
        .await
        .unwrap();
    result.last_insert_id() as i32
}

pub async fn insert_department(db: &DatabaseConnection, tenant_id: i32, name: &str) -> i32 {
    insert_returning_id(
        db,
        "INSERT INTO departments (tenant_id, name) VALUES (?, ?)",
        vec![tenant_id.into(), name.into()],
    )
    .await
}

pub async fn insert_company(db: &DatabaseConnection, tenant_id: i32, name: &str) -> i32 {
    insert_returning_id(
        db,
        "INSERT INTO companies (tenant_id, name) VALUES (?, ?)",
        vec![tenant_id.into(), name.into()],
    )
    .await
}

pub async fn insert_order(
    db: &DatabaseConnection,
    tenant_id: i32,
    order_number: &str,
    company_id: i32,
    metal_id: Option<i32>,
    quantity: Option<f64>,
    target_weight_per_piece: Option<f64>,
) -> i32 {
    insert_returning_id(
        db,
        "INSERT INTO orders (tenant_id, order_number, company_id, metal_id, quantity, target_weight_per_piece) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            tenant_id.into(),
            order_number.into(),
            company_id.into(),
            metal_id.into(),
            quantity.into(),
            target_weight_per_piece.into(),
        ],
    )
    .await
}

pub async fn insert_department_stock(
    db: &DatabaseConnection,
    tenant_id: i32,
    department_name: &str,
    metal_code: &str,
    balance_grams: f64,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO department_stocks \
         (tenant_id, department_name, metal_code, balance_grams, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            tenant_id.into(),
            department_name.into(),
            metal_code.into(),
            balance_grams.into(),
            chrono::Utc::now().into(),
            chrono::Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
