//! Staff entity - An internal worker fulfilling orders.
//!
//! The used-days counters are mutated only by the time-off workflow in
//! [`crate::core::time_off`], in the same transaction as the request's
//! status change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    /// Unique identifier for the staff member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Role: `"photographer"`, `"editor"`, or `"qc"`
    pub role: String,
    /// Vacation days consumed this year
    pub vacation_days_used: i32,
    /// Sick days consumed this year
    pub sick_days_used: i32,
    /// Whether the staff member is currently employed and bookable
    pub is_active: bool,
    /// When the staff record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Staff and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One staff member has many date-specific availability overrides
    #[sea_orm(has_many = "super::availability_override::Entity")]
    AvailabilityOverrides,
    /// One staff member has many weekly schedule rows
    #[sea_orm(has_many = "super::weekly_schedule::Entity")]
    WeeklySchedules,
    /// One staff member has many time-off requests
    #[sea_orm(has_many = "super::time_off_request::Entity")]
    TimeOffRequests,
    /// One staff member has many payouts
    #[sea_orm(has_many = "super::staff_payout::Entity")]
    Payouts,
}

impl Related<super::availability_override::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AvailabilityOverrides.def()
    }
}

impl Related<super::weekly_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeeklySchedules.def()
    }
}

impl Related<super::time_off_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeOffRequests.def()
    }
}

impl Related<super::staff_payout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payouts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
