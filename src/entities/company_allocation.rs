//! Company allocation entity - The company's share of one order's revenue,
//! split into named internal pools (operations, marketing, reserve, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company pool allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_allocations")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order the allocation is for
    pub order_id: i64,
    /// Name of the internal pool the amount is allocated to
    pub pool: String,
    /// Allocated amount in dollars
    pub amount: f64,
    /// When the allocation row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CompanyAllocation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation belongs to one order
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
