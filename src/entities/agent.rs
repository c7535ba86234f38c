//! Agent entity - A real-estate professional who is a paying customer.
//!
//! Each agent carries a prepaid `credit_balance` that is drawn down when
//! ordering services. The balance is mutated only through the credit ledger
//! operations in [`crate::core::credits`], never written directly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Agent database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    /// Unique identifier for the agent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the agent
    pub name: String,
    /// Contact email address
    pub email: String,
    /// Current prepaid credit balance; never negative
    pub credit_balance: f64,
    /// Balance at or below which a low-balance notification is due
    pub low_balance_threshold: f64,
    /// When the last low-balance notification was sent, if ever
    pub low_balance_notified_at: Option<DateTimeUtc>,
    /// When the agent account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Agent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One agent has many ledger entries
    #[sea_orm(has_many = "super::credit_transaction::Entity")]
    CreditTransactions,
    /// One agent has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// One agent has many notifications
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::credit_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditTransactions.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
