//! Credit package configuration loading from packages.toml
//!
//! The purchasable credit packages are defined in a TOML file and seeded
//! into the database on startup. Seeding is idempotent: packages already
//! present (matched by name) are left alone.

use crate::{
    entities::{CreditPackage, credit_package},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire packages.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of credit packages to seed
    pub packages: Vec<PackageConfig>,
}

/// Configuration for a single credit package
#[derive(Debug, Deserialize, Clone)]
pub struct PackageConfig {
    /// Display name of the package
    pub name: String,
    /// Number of credits the package grants
    pub credits: f64,
    /// Purchase price in dollars
    pub price: f64,
    /// Whether the package is currently offered; defaults to true
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Loads package configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read packages file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse packages.toml: {e}"),
    })
}

/// Loads package configuration from the default location (./packages.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("packages.toml")
}

/// Seeds the configured packages into the database, skipping any whose name
/// already exists.
pub async fn seed_packages(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut seeded = 0;
    for package in &config.packages {
        let existing = CreditPackage::find()
            .filter(credit_package::Column::Name.eq(&package.name))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        credit_package::ActiveModel {
            name: Set(package.name.clone()),
            credits: Set(package.credits),
            price: Set(package.price),
            is_active: Set(package.is_active),
            ..Default::default()
        }
        .insert(db)
        .await?;
        seeded += 1;
    }

    if seeded > 0 {
        info!("Seeded {} credit packages", seeded);
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[packages]]
        name = "Starter"
        credits = 100.0
        price = 89.0

        [[packages]]
        name = "Pro"
        credits = 500.0
        price = 399.0
        is_active = false
    "#;

    #[test]
    fn test_parse_package_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.packages.len(), 2);
        assert_eq!(config.packages[0].name, "Starter");
        assert_eq!(config.packages[0].credits, 100.0);
        assert!(config.packages[0].is_active);

        assert_eq!(config.packages[1].name, "Pro");
        assert!(!config.packages[1].is_active);
    }

    #[tokio::test]
    async fn test_seed_packages_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(SAMPLE).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;

        assert_eq!(seed_packages(&db, &config).await?, 2);
        // Second run finds everything already present
        assert_eq!(seed_packages(&db, &config).await?, 0);
        assert_eq!(CreditPackage::find().all(&db).await?.len(), 2);

        Ok(())
    }
}
