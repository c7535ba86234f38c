//! Staff payout entity - Earnings owed to an internal worker for one order.
//!
//! Rows are written only by [`crate::core::payouts::complete_job_payouts`],
//! under the payout idempotency lock.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff payout database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_payouts")]
pub struct Model {
    /// Unique identifier for the payout
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the payout is for
    pub order_id: i64,
    /// Staff member receiving the payout
    pub staff_id: i64,
    /// Payout amount in dollars
    pub amount: f64,
    /// Payment state, e.g. `"pending"` or `"paid"`
    pub status: String,
    /// When the payout row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `StaffPayout` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payout belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each payout belongs to one staff member
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
