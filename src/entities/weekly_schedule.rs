//! Weekly schedule entity - Recurring availability pattern for one staff
//! member, consulted when no date-specific override exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weekly schedule row database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_schedules")]
pub struct Model {
    /// Unique identifier for the schedule row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Staff member the pattern applies to
    pub staff_id: i64,
    /// Day of week, 0=Sunday through 6=Saturday
    pub day_of_week: i32,
    /// Whether the staff member works this weekday
    pub is_available: bool,
    /// Start of the bookable window, if the day is time-restricted
    pub available_from: Option<Time>,
    /// End of the bookable window, if the day is time-restricted
    pub available_to: Option<Time>,
}

/// Defines relationships between `WeeklySchedule` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each schedule row belongs to one staff member
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
