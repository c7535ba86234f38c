//! Database configuration module.
//!
//! Handles `SQLite` database connection and table creation using `SeaORM`.
//! Table creation uses `Schema::create_table_from_entity` to generate SQL
//! from the entity definitions, so the database schema always matches the
//! Rust struct definitions without manual DDL.

use crate::entities::{
    Agent, AvailabilityOverride, CompanyAllocation, CreditPackage, CreditTransaction, Listing,
    Notification, Order, OrderService, PartnerPayout, PayoutLock, Staff, StaffPayout,
    TimeOffRequest, WeeklySchedule,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/shutterdesk.sqlite".to_string())
}

/// Establishes a connection to the database.
///
/// Loads `.env` if present (environment variables set externally win), then
/// resolves the URL via [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    dotenvy::dotenv().ok();

    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions.
///
/// Dependency order matters: referenced tables (agents, staff, listings)
/// are created before the tables whose foreign keys point at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Agent)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Staff)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(CreditPackage)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Listing)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Order)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(OrderService)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(CreditTransaction)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Notification)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PayoutLock)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(StaffPayout)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PartnerPayout)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(CompanyAllocation)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(TimeOffRequest)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(AvailabilityOverride)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(WeeklySchedule)))
        .await?;

    Ok(())
}
