//! Credit package entity - Purchasable bundles of prepaid credits.
//!
//! Seeded from `packages.toml` via [`crate::config::packages`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_packages")]
pub struct Model {
    /// Unique identifier for the package
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g. "Starter", "Pro")
    pub name: String,
    /// Number of credits the package grants
    pub credits: f64,
    /// Purchase price in dollars
    pub price: f64,
    /// Whether the package is currently offered
    pub is_active: bool,
}

/// Credit packages have no outgoing relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
