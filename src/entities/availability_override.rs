//! Availability override entity - Date-specific availability for one staff
//! member, outranking their weekly recurring schedule.
//!
//! Rows with a `time_off_request_id` were materialized by a time-off
//! approval and are deleted when that approval is reversed; rows without
//! one were entered manually and survive reversal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Availability override database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "availability_overrides")]
pub struct Model {
    /// Unique identifier for the override
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Staff member the override applies to
    pub staff_id: i64,
    /// Calendar date the override applies to
    pub date: Date,
    /// Whether the staff member is available on this date
    pub is_available: bool,
    /// Start of the bookable window, if the day is time-restricted
    pub available_from: Option<Time>,
    /// End of the bookable window, if the day is time-restricted
    pub available_to: Option<Time>,
    /// Time-off request that materialized this row, None for manual entries
    pub time_off_request_id: Option<i64>,
    /// Optional free-text note
    pub note: Option<String>,
}

/// Defines relationships between `AvailabilityOverride` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each override belongs to one staff member
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
    /// An override may have been created by a time-off approval
    #[sea_orm(
        belongs_to = "super::time_off_request::Entity",
        from = "Column::TimeOffRequestId",
        to = "super::time_off_request::Column::Id"
    )]
    TimeOffRequest,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::time_off_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeOffRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
