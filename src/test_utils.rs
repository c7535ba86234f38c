//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating
//! test entities with sensible defaults.

use crate::{
    core::orders::{self, OrderRequest, PropertyDetails, ServiceSelection},
    entities::{agent, availability_override, listing, order, staff, weekly_schedule},
    errors::Result,
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::config::logging::try_init();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database in the system temp directory,
/// for tests that exercise real cross-connection concurrency (an in-memory
/// database is private to one connection, so pooled tasks could never
/// contend on it). Callers pass the returned path to
/// [`remove_file_test_db`] when done.
pub async fn setup_file_test_db(
    tag: &str,
) -> Result<(DatabaseConnection, std::path::PathBuf)> {
    crate::config::logging::try_init();
    let path = std::env::temp_dir().join(format!(
        "shutterdesk-test-{}-{}.sqlite",
        tag,
        std::process::id()
    ));
    remove_file_test_db(&path);
    let db = sea_orm::Database::connect(format!("sqlite://{}?mode=rwc", path.display())).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((db, path))
}

/// Deletes a file-backed test database along with its journal files.
pub fn remove_file_test_db(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

/// Creates a test agent with the given starting balance and a low-balance
/// threshold of 0 (no notifications unless the balance hits zero).
pub async fn create_test_agent(
    db: &DatabaseConnection,
    name: &str,
    balance: f64,
) -> Result<agent::Model> {
    create_custom_agent(db, name, balance, 0.0).await
}

/// Creates a test agent with a custom low-balance threshold.
pub async fn create_custom_agent(
    db: &DatabaseConnection,
    name: &str,
    balance: f64,
    low_balance_threshold: f64,
) -> Result<agent::Model> {
    let model = agent::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
        credit_balance: Set(balance),
        low_balance_threshold: Set(low_balance_threshold),
        low_balance_notified_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates an active test staff member with zeroed leave counters.
pub async fn create_test_staff(
    db: &DatabaseConnection,
    name: &str,
    role: &str,
) -> Result<staff::Model> {
    let model = staff::ActiveModel {
        name: Set(name.to_string()),
        role: Set(role.to_string()),
        vacation_days_used: Set(0),
        sick_days_used: Set(0),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates an agent plus a paired order/listing through the real creation
/// path. Returns (order, listing).
pub async fn create_test_order(
    db: &DatabaseConnection,
) -> Result<(order::Model, listing::Model)> {
    let agent = create_test_agent(db, "Orderer", 0.0).await?;
    orders::create_order_and_listing(
        db,
        agent.id,
        PropertyDetails {
            address: "1 Test Street".to_string(),
            city: "Testville".to_string(),
            postal_code: None,
            property_type: "house".to_string(),
        },
        OrderRequest {
            order_number: format!("SD-{}", agent.id),
            total_amount: 199.0,
            contact_name: "Test Contact".to_string(),
            contact_email: "contact@example.com".to_string(),
            contact_phone: None,
            services: vec![ServiceSelection {
                service_code: "photos_25".to_string(),
                price: 199.0,
            }],
        },
    )
    .await
}

/// Inserts a weekly recurring schedule row for a staff member.
pub async fn create_weekly_schedule_row(
    db: &DatabaseConnection,
    staff_id: i64,
    day_of_week: i32,
    is_available: bool,
    available_from: Option<NaiveTime>,
    available_to: Option<NaiveTime>,
) -> Result<weekly_schedule::Model> {
    let model = weekly_schedule::ActiveModel {
        staff_id: Set(staff_id),
        day_of_week: Set(day_of_week),
        is_available: Set(is_available),
        available_from: Set(available_from),
        available_to: Set(available_to),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a manual date-specific availability override.
pub async fn set_availability_override(
    db: &DatabaseConnection,
    staff_id: i64,
    date: NaiveDate,
    is_available: bool,
    available_from: Option<NaiveTime>,
    available_to: Option<NaiveTime>,
) -> Result<availability_override::Model> {
    let model = availability_override::ActiveModel {
        staff_id: Set(staff_id),
        date: Set(date),
        is_available: Set(is_available),
        available_from: Set(available_from),
        available_to: Set(available_to),
        time_off_request_id: Set(None),
        note: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}
