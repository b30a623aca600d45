//! Lookups against a live MySQL.
//!
//! Every test returns early unless `DATABASE_HOST_ADDRESS` is set. The
//! connecting user needs CREATE/INSERT rights; rows are written under a
//! random make so concurrent runs do not see each other. A `cars` table left
//! over from an older run must be dropped first so the typed columns exist.

use car_models_service::{
    datalayer::{CarPool, DbConfig, CRUD::cars::CarStore},
    errors::ServiceError,
};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

fn live_pool() -> Option<CarPool> {
    if std::env::var("DATABASE_HOST_ADDRESS").is_err() {
        return None;
    }
    let config = DbConfig::from_env().ok()?;
    Some(CarPool::new(&config))
}

async fn seed(pool: &CarPool, make: &str, models: &[&str]) {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cars (
            ID INT AUTO_INCREMENT PRIMARY KEY,
            MAKE VARCHAR(64),
            MODEL VARCHAR(64),
            YEAR INT,
            PRICE DECIMAL(10, 2),
            WEIGHT FLOAT,
            ECONOMY DOUBLE,
            RELEASED DATE,
            UPDATED_AT DATETIME,
            LISTED_AT TIMESTAMP NULL,
            WARRANTY TIME,
            SPECS JSON,
            BADGE BLOB
        )",
    )
    .execute(pool.pool())
    .await
    .unwrap();

    for (i, model) in models.iter().enumerate() {
        sqlx::query(
            "INSERT INTO cars
                (MAKE, MODEL, YEAR, PRICE, WEIGHT, ECONOMY, RELEASED, UPDATED_AT,
                 LISTED_AT, WARRANTY, SPECS, BADGE)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(make)
        .bind(*model)
        .bind(2020 + i as i32)
        .bind("19999.99")
        .bind(1350.5f32)
        .bind(6.25f64)
        .bind("2020-01-01")
        .bind("2020-01-02 03:04:05")
        .bind("2021-06-07 08:09:10")
        .bind("-26:30:00")
        .bind(r#"{"doors": 4}"#)
        .bind(vec![1u8, 2, 3])
        .execute(pool.pool())
        .await
        .unwrap();
    }
}

async fn cleanup(pool: &CarPool, make: &str) {
    let _ = sqlx::query("DELETE FROM cars WHERE MAKE = ?")
        .bind(make)
        .execute(pool.pool())
        .await;
}

#[tokio::test]
async fn test_lookup_returns_rows_for_make() {
    let Some(pool) = live_pool() else { return };
    let make = format!("Make-{}", Uuid::new_v4());
    seed(&pool, &make, &["Alpha", "Beta"]).await;

    let rows = pool.models_by_make(Some(make.clone())).await.unwrap();
    cleanup(&pool, &make).await;

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row["MAKE"], make.as_str());
        assert!(row["ID"].is_number());
        assert!(row["YEAR"].is_number());
        assert_eq!(row["PRICE"], "19999.99");
    }

    pool.close().await;
}

#[tokio::test]
async fn test_lookup_renders_typed_columns() {
    let Some(pool) = live_pool() else { return };
    let make = format!("Make-{}", Uuid::new_v4());
    seed(&pool, &make, &["Delta"]).await;

    let rows = pool.models_by_make(Some(make.clone())).await.unwrap();
    cleanup(&pool, &make).await;

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    println!("Row: {}", serde_json::to_string_pretty(row).unwrap());

    assert_eq!(row["MODEL"], json!("Delta"));
    assert_eq!(row["YEAR"], json!(2020));
    assert_eq!(row["PRICE"], json!("19999.99"));
    assert_eq!(row["WEIGHT"], json!(1350.5));
    assert_eq!(row["ECONOMY"], json!(6.25));
    assert_eq!(row["RELEASED"], json!("2020-01-01T00:00:00.000Z"));
    assert_eq!(row["UPDATED_AT"], json!("2020-01-02T03:04:05.000Z"));
    assert_eq!(row["LISTED_AT"], json!("2021-06-07T08:09:10.000Z"));
    assert_eq!(row["WARRANTY"], json!("-26:30:00"));
    assert_eq!(row["SPECS"], json!({ "doors": 4 }));
    assert_eq!(row["BADGE"], json!([1, 2, 3]));

    pool.close().await;
}

#[tokio::test]
async fn test_lookup_without_make_matches_nothing() {
    let Some(pool) = live_pool() else { return };
    let make = format!("Make-{}", Uuid::new_v4());
    seed(&pool, &make, &["Gamma"]).await;

    let rows = pool.models_by_make(None).await.unwrap();
    cleanup(&pool, &make).await;

    assert!(rows.is_empty());
    pool.close().await;
}

#[tokio::test]
async fn test_lookup_unknown_make_is_empty() {
    let Some(pool) = live_pool() else { return };

    let rows = pool
        .models_by_make(Some(format!("Missing-{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert!(rows.is_empty());
    pool.close().await;
}

#[tokio::test]
async fn test_lookup_against_unreachable_database() {
    let config = DbConfig::new()
        .set_host("127.0.0.1".to_string())
        .set_port(1)
        .set_acquire_timeout(Duration::from_secs(2));
    let pool = CarPool::new(&config);

    let first = pool.models_by_make(Some("Toyota".to_string())).await;
    let second = pool.models_by_make(Some("Toyota".to_string())).await;

    assert!(matches!(first, Err(ServiceError::DatabaseConnectionError)));
    assert!(matches!(second, Err(ServiceError::DatabaseConnectionError)));
}
