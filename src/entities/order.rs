//! Order entity - A media production job placed by an agent.
//!
//! Every order references exactly one backing listing; the pair is created
//! atomically. `order_number` is the unique human-facing reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Agent who placed the order
    pub agent_id: i64,
    /// Listing the order is shot against
    pub listing_id: i64,
    /// Unique human-facing order reference
    #[sea_orm(unique)]
    pub order_number: String,
    /// Fulfillment state; starts as `"pending"`
    pub status: String,
    /// Total order price in dollars
    pub total_amount: f64,
    /// On-site contact name
    pub contact_name: String,
    /// On-site contact email
    pub contact_email: String,
    /// On-site contact phone, if given
    pub contact_phone: Option<String>,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one agent
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id"
    )]
    Agent,
    /// Each order references one listing
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id"
    )]
    Listing,
    /// One order has many selected services
    #[sea_orm(has_many = "super::order_service::Entity")]
    Services,
    /// One order has many staff payouts
    #[sea_orm(has_many = "super::staff_payout::Entity")]
    StaffPayouts,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl Related<super::order_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::staff_payout::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StaffPayouts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
