//! Credit transaction entity - Append-only ledger of agent balance changes.
//!
//! Each row records a signed `amount` and a `balance_after` snapshot taken in
//! the same database transaction as the balance update, so the ledger always
//! reconstructs the balance exactly. Rows are never updated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_transactions")]
pub struct Model {
    /// Unique identifier for the ledger entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Agent whose balance this entry changed
    pub agent_id: i64,
    /// Kind of change: `"purchase"`, `"usage"`, `"refund"`, `"adjustment"`,
    /// `"bonus"`, or `"expiry"`
    pub kind: String,
    /// Signed amount (positive credits the balance, negative debits it)
    pub amount: f64,
    /// Agent balance immediately after this entry was applied
    pub balance_after: f64,
    /// Order this entry paid for, if any
    pub order_id: Option<i64>,
    /// Credit package this entry purchased, if any
    pub package_id: Option<i64>,
    /// Human-readable description of the change
    pub description: String,
    /// When the entry was committed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CreditTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ledger entry belongs to one agent
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
