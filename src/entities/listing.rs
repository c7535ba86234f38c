//! Listing entity - A property record backing exactly one order.
//!
//! Created together with its order by
//! [`crate::core::orders::create_order_and_listing`]; never created alone.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    /// Unique identifier for the listing
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Agent who owns the listing
    pub agent_id: i64,
    /// Street address of the property
    pub address: String,
    /// City the property is in
    pub city: String,
    /// Postal code, if known
    pub postal_code: Option<String>,
    /// Property type, e.g. `"house"`, `"condo"`, `"commercial"`
    pub property_type: String,
    /// Production state; starts as `"pending"`
    pub status: String,
    /// When the listing was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Listing and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One listing backs one-or-more order rows (exactly one in practice)
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
