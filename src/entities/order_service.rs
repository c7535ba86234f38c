//! Order service entity - One selected service line on an order
//! (photos, drone, floor plan, video tour, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order service line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_services")]
pub struct Model {
    /// Unique identifier for the service line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the service belongs to
    pub order_id: i64,
    /// Service code, e.g. `"photos_25"`, `"drone"`, `"floor_plan"`
    pub service_code: String,
    /// Price of this service line in dollars
    pub price: f64,
}

/// Defines relationships between `OrderService` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each service line belongs to one order
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
