//! Time-off request entity - A staff leave request with an approval workflow.
//!
//! Status moves `pending -> approved | rejected | cancelled`, and
//! `approved -> rejected | cancelled` when an approval is reversed. The
//! side effects of each transition live in [`crate::core::time_off`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Time-off request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_off_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Staff member requesting leave
    pub staff_id: i64,
    /// First day off (inclusive)
    pub start_date: Date,
    /// Last day off (inclusive)
    pub end_date: Date,
    /// Leave reason: `"vacation"` or `"sick"`
    pub reason: String,
    /// Workflow state: `"pending"`, `"approved"`, `"rejected"`, `"cancelled"`
    pub status: String,
    /// Optional free-text note from the requester
    pub note: Option<String>,
    /// When the request was submitted
    pub created_at: DateTimeUtc,
    /// When the status last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `TimeOffRequest` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request belongs to one staff member
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
    /// Approval materializes override rows tagged with this request
    #[sea_orm(has_many = "super::availability_override::Entity")]
    Overrides,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl Related<super::availability_override::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Overrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
