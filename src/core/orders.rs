//! Order business logic - Creates an order and its backing listing as a pair.
//!
//! The listing, the order referencing it, and the selected service lines are
//! inserted in one database transaction: if any insert fails, none persist.
//! Both created records are returned fully populated so callers never need a
//! follow-up read.

use crate::{
    entities::{Agent, listing, order, order_service},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Property fields for the new listing.
#[derive(Debug, Clone)]
pub struct PropertyDetails {
    /// Street address of the property
    pub address: String,
    /// City the property is in
    pub city: String,
    /// Postal code, if known
    pub postal_code: Option<String>,
    /// Property type, e.g. `"house"`, `"condo"`, `"commercial"`
    pub property_type: String,
}

/// One selected service line.
#[derive(Debug, Clone)]
pub struct ServiceSelection {
    /// Service code, e.g. `"photos_25"`, `"drone"`
    pub service_code: String,
    /// Price of this line in dollars
    pub price: f64,
}

/// Order-level fields: reference number, pricing, and contact information.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Unique human-facing order reference
    pub order_number: String,
    /// Total order price in dollars
    pub total_amount: f64,
    /// On-site contact name
    pub contact_name: String,
    /// On-site contact email
    pub contact_email: String,
    /// On-site contact phone, if given
    pub contact_phone: Option<String>,
    /// Selected services
    pub services: Vec<ServiceSelection>,
}

/// Creates a listing and an order referencing it, atomically.
///
/// The listing is inserted first with status `"pending"`, then the order
/// pointing at its id, then one `order_service` row per selection, all in
/// one transaction. A failed order insert (say, a duplicate
/// `order_number`) therefore leaves no orphaned listing behind.
#[instrument(skip(db, property, request))]
pub async fn create_order_and_listing(
    db: &DatabaseConnection,
    agent_id: i64,
    property: PropertyDetails,
    request: OrderRequest,
) -> Result<(order::Model, listing::Model)> {
    if property.address.trim().is_empty() {
        return Err(Error::Config {
            message: "Listing address cannot be empty".to_string(),
        });
    }
    if request.order_number.trim().is_empty() {
        return Err(Error::Config {
            message: "Order number cannot be empty".to_string(),
        });
    }
    if request.total_amount < 0.0 || !request.total_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: request.total_amount,
        });
    }
    for service in &request.services {
        if service.price < 0.0 || !service.price.is_finite() {
            return Err(Error::InvalidAmount {
                amount: service.price,
            });
        }
    }

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    Agent::find_by_id(agent_id)
        .one(&txn)
        .await?
        .ok_or(Error::AgentNotFound { id: agent_id })?;

    let now = chrono::Utc::now();
    let listing = listing::ActiveModel {
        agent_id: Set(agent_id),
        address: Set(property.address.trim().to_string()),
        city: Set(property.city),
        postal_code: Set(property.postal_code),
        property_type: Set(property.property_type),
        status: Set("pending".to_string()),
        created_at: Set(now),
        ..Default::default()
    };
    let listing = listing.insert(&txn).await?;

    let order = order::ActiveModel {
        agent_id: Set(agent_id),
        listing_id: Set(listing.id),
        order_number: Set(request.order_number.trim().to_string()),
        status: Set("pending".to_string()),
        total_amount: Set(request.total_amount),
        contact_name: Set(request.contact_name),
        contact_email: Set(request.contact_email),
        contact_phone: Set(request.contact_phone),
        created_at: Set(now),
        ..Default::default()
    };
    let order = order.insert(&txn).await?;

    for service in request.services {
        order_service::ActiveModel {
            order_id: Set(order.id),
            service_code: Set(service.service_code),
            price: Set(service.price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        "Created order '{}' (id {}) with listing {} for agent {}",
        order.order_number, order.id, listing.id, agent_id
    );
    Ok((order, listing))
}
