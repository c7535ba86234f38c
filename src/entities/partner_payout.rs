//! Partner payout entity - Earnings owed to an external partner for one order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner payout database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_payouts")]
pub struct Model {
    /// Unique identifier for the payout
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the payout is for
    pub order_id: i64,
    /// External partner receiving the payout
    pub partner_id: i64,
    /// Payout amount in dollars
    pub amount: f64,
    /// Payment state, e.g. `"pending"` or `"paid"`
    pub status: String,
    /// When the payout row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PartnerPayout` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payout belongs to one order
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
