//! Payout lock entity - Persisted idempotency record for payout application.
//!
//! Keyed by a caller-supplied idempotency key so the at-most-once guarantee
//! survives process restarts. The status field is a small state machine:
//! `processing` while a payout attempt holds the lock, then `completed` or
//! `failed` permanently.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payout idempotency record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payout_locks")]
pub struct Model {
    /// Caller-supplied idempotency key
    #[sea_orm(primary_key, auto_increment = false)]
    pub idempotency_key: String,
    /// Order the payout run applies to
    pub order_id: i64,
    /// Current state: `"processing"`, `"completed"`, or `"failed"`
    pub status: String,
    /// Error captured from a failed attempt, if any
    pub error_message: Option<String>,
    /// When the lock was acquired
    pub created_at: DateTimeUtc,
    /// When the status last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `PayoutLock` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each lock references one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
