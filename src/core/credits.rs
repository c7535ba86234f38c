//! Credit ledger business logic - Applies balance deltas atomically.
//!
//! The agent balance and the append-only ledger are updated as one unit: a
//! guarded in-place `UPDATE` changes the balance (refusing deductions that
//! would go negative), the ledger row snapshots the resulting balance, and
//! the low-balance notification check runs in the same database transaction.
//! No caller ever observes a balance without its ledger row or vice versa.

use crate::{
    entities::{Agent, Notification, agent, credit_transaction, notification},
    errors::{Error, Result},
};
use sea_orm::{Condition, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Minimum gap between two low-balance notifications for one agent.
const NOTIFICATION_COOLDOWN_HOURS: i64 = 24;

/// Kind of credit ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditKind {
    /// Credits bought by the agent
    Purchase,
    /// Credits spent on an order
    Usage,
    /// Credits returned for a cancelled or reworked order
    Refund,
    /// Manual correction by support staff
    Adjustment,
    /// Promotional credits granted by the platform
    Bonus,
    /// Credits removed because they expired
    Expiry,
}

impl CreditKind {
    /// String form stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Usage => "usage",
            Self::Refund => "refund",
            Self::Adjustment => "adjustment",
            Self::Bonus => "bonus",
            Self::Expiry => "expiry",
        }
    }
}

/// Optional references tying a ledger entry to the thing that caused it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditLinkage {
    /// Order the entry paid for, if any
    pub order_id: Option<i64>,
    /// Credit package the entry purchased, if any
    pub package_id: Option<i64>,
}

/// Applies a signed credit delta to an agent's balance and records it in the
/// ledger, as one atomic unit.
///
/// A negative `amount` is a deduction and is refused with
/// [`Error::InsufficientCredits`] if it would drive the balance below zero;
/// in that case nothing is mutated. The refusal is enforced by the `UPDATE`
/// itself (`credit_balance = credit_balance + ?` filtered on
/// `credit_balance >= -?`), so concurrent deductions serialize on the agent
/// row instead of interleaving into a lost update.
///
/// After a deduction that lands at or below the agent's low-balance
/// threshold, at most one notification per 24-hour window is emitted; see
/// [`maybe_notify_low_balance`].
///
/// Returns the inserted ledger entry; its `balance_after` field is the new
/// balance.
#[instrument(skip(db, description))]
pub async fn apply_credit_delta(
    db: &DatabaseConnection,
    agent_id: i64,
    amount: f64,
    kind: CreditKind,
    linkage: CreditLinkage,
    description: String,
) -> Result<credit_transaction::Model> {
    if amount == 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    let mut update = Agent::update_many()
        .col_expr(
            agent::Column::CreditBalance,
            Expr::col(agent::Column::CreditBalance).add(amount),
        )
        .filter(agent::Column::Id.eq(agent_id));

    if amount < 0.0 {
        // The balance floor: only rows where balance + amount >= 0 match
        update = update.filter(agent::Column::CreditBalance.gte(-amount));
    }

    let updated = update.exec(&txn).await?;

    if updated.rows_affected == 0 {
        // Distinguish a missing agent from a refused deduction
        let agent = Agent::find_by_id(agent_id)
            .one(&txn)
            .await?
            .ok_or(Error::AgentNotFound { id: agent_id })?;

        return Err(Error::InsufficientCredits {
            current: agent.credit_balance,
            required: -amount,
        });
    }

    // Re-read inside the transaction for the balance_after snapshot
    let agent = Agent::find_by_id(agent_id)
        .one(&txn)
        .await?
        .ok_or(Error::AgentNotFound { id: agent_id })?;

    let now = chrono::Utc::now();
    let entry = credit_transaction::ActiveModel {
        agent_id: Set(agent_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        balance_after: Set(agent.credit_balance),
        order_id: Set(linkage.order_id),
        package_id: Set(linkage.package_id),
        description: Set(description),
        created_at: Set(now),
        ..Default::default()
    };
    let entry = entry.insert(&txn).await?;

    if amount < 0.0 && agent.credit_balance <= agent.low_balance_threshold {
        maybe_notify_low_balance(&txn, &agent).await?;
    }

    txn.commit().await?;

    info!(
        "Applied {} of {} to agent {}: balance now {}",
        kind.as_str(),
        amount,
        agent_id,
        agent.credit_balance
    );
    Ok(entry)
}

/// Emits a low-balance notification for `agent` unless one was sent in the
/// trailing 24 hours.
///
/// The check-and-stamp is a single conditional `UPDATE` on
/// `low_balance_notified_at` (NULL or older than the cooldown), so two
/// concurrent deductions that both cross the threshold race for one affected
/// row and only the winner inserts a notification.
async fn maybe_notify_low_balance<C>(db: &C, agent: &agent::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let cutoff = now - chrono::Duration::hours(NOTIFICATION_COOLDOWN_HOURS);

    let stamped = Agent::update_many()
        .col_expr(agent::Column::LowBalanceNotifiedAt, Expr::value(now))
        .filter(agent::Column::Id.eq(agent.id))
        .filter(
            Condition::any()
                .add(agent::Column::LowBalanceNotifiedAt.is_null())
                .add(agent::Column::LowBalanceNotifiedAt.lte(cutoff)),
        )
        .exec(db)
        .await?;

    if stamped.rows_affected == 0 {
        return Ok(());
    }

    let body = format!(
        "Your credit balance is down to {:.2}. Top up to keep ordering shoots.",
        agent.credit_balance
    );
    let record = notification::ActiveModel {
        agent_id: Set(agent.id),
        kind: Set("low_credit_balance".to_string()),
        body: Set(body),
        created_at: Set(now),
        ..Default::default()
    };
    record.insert(db).await?;

    info!("Emitted low-balance notification for agent {}", agent.id);
    Ok(())
}

/// Returns whether `agent_id` currently holds at least `required` credits.
///
/// Advisory only: the balance may change between this read and a later
/// deduction, so callers must still handle
/// [`Error::InsufficientCredits`] from [`apply_credit_delta`]. The atomic
/// deduction is the authoritative guard.
pub async fn check_sufficient_credits(
    db: &DatabaseConnection,
    agent_id: i64,
    required: f64,
) -> Result<bool> {
    let agent = Agent::find_by_id(agent_id)
        .one(db)
        .await?
        .ok_or(Error::AgentNotFound { id: agent_id })?;

    Ok(agent.credit_balance >= required)
}

/// Returns the agent's ledger, newest entry first.
pub async fn get_ledger_for_agent(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<Vec<credit_transaction::Model>> {
    use sea_orm::QueryOrder;

    crate::entities::CreditTransaction::find()
        .filter(credit_transaction::Column::AgentId.eq(agent_id))
        .order_by_desc(credit_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Purchases a credit package for an agent: looks up the active package and
/// credits its amount to the balance with a `purchase` ledger entry linked
/// back to the package.
#[instrument(skip(db))]
pub async fn purchase_package(
    db: &DatabaseConnection,
    agent_id: i64,
    package_id: i64,
) -> Result<credit_transaction::Model> {
    use crate::entities::{CreditPackage, credit_package};

    let package = CreditPackage::find_by_id(package_id)
        .filter(credit_package::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or(Error::PackageNotFound { id: package_id })?;

    apply_credit_delta(
        db,
        agent_id,
        package.credits,
        CreditKind::Purchase,
        CreditLinkage {
            order_id: None,
            package_id: Some(package.id),
        },
        format!("Purchased package '{}'", package.name),
    )
    .await
}

/// Returns all notifications recorded for an agent, newest first.
pub async fn get_notifications_for_agent(
    db: &DatabaseConnection,
    agent_id: i64,
) -> Result<Vec<notification::Model>> {
    use sea_orm::QueryOrder;

    Notification::find()
        .filter(notification::Column::AgentId.eq(agent_id))
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_custom_agent, create_test_agent, create_test_order, remove_file_test_db,
        setup_file_test_db, setup_test_db,
    };
    use sea_orm::{ActiveModelTrait, DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_apply_credit_delta_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Zero amount
        let result = apply_credit_delta(
            &db,
            1,
            0.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "test".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));

        // NaN
        let result = apply_credit_delta(
            &db,
            1,
            f64::NAN,
            CreditKind::Usage,
            CreditLinkage::default(),
            "test".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Infinity
        let result = apply_credit_delta(
            &db,
            1,
            f64::INFINITY,
            CreditKind::Usage,
            CreditLinkage::default(),
            "test".to_string(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_credit_delta_agent_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = apply_credit_delta(
            &db,
            999,
            25.0,
            CreditKind::Purchase,
            CreditLinkage::default(),
            "test".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AgentNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_deduction_never_goes_negative() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 100.0).await?;

        // Spend 60, then try to spend 60 again
        apply_credit_delta(
            &db,
            agent.id,
            -60.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;

        let result = apply_credit_delta(
            &db,
            agent.id,
            -60.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientCredits {
                current: 40.0,
                required: 60.0
            }
        ));

        // Refused deduction mutated nothing: no ledger row, balance intact
        let ledger = get_ledger_for_agent(&db, agent.id).await?;
        assert_eq!(ledger.len(), 1);
        let agent = Agent::find_by_id(agent.id).one(&db).await?.unwrap();
        assert_eq!(agent.credit_balance, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_exact_balance_deduction_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 50.0).await?;

        let entry = apply_credit_delta(
            &db,
            agent.id,
            -50.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;
        assert_eq!(entry.balance_after, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_after_forms_running_sum() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 0.0).await?;

        let deltas = [100.0, -30.0, -20.0, 15.0, -40.0];
        for delta in deltas {
            let kind = if delta < 0.0 {
                CreditKind::Usage
            } else {
                CreditKind::Purchase
            };
            apply_credit_delta(
                &db,
                agent.id,
                delta,
                kind,
                CreditLinkage::default(),
                "step".to_string(),
            )
            .await?;
        }

        // Oldest-first, every balance_after equals the running sum
        let mut ledger = get_ledger_for_agent(&db, agent.id).await?;
        ledger.reverse();
        let mut running = 0.0;
        for entry in &ledger {
            running += entry.amount;
            assert_eq!(entry.balance_after, running);
        }
        assert_eq!(running, 25.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_records_kind_and_linkage() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 0.0).await?;
        let (order, _) = create_test_order(&db).await?;

        let entry = apply_credit_delta(
            &db,
            agent.id,
            75.0,
            CreditKind::Bonus,
            CreditLinkage {
                order_id: Some(order.id),
                package_id: None,
            },
            "Launch promo".to_string(),
        )
        .await?;

        assert_eq!(entry.kind, "bonus");
        assert_eq!(entry.order_id, Some(order.id));
        assert_eq!(entry.package_id, None);
        assert_eq!(entry.description, "Launch promo");

        Ok(())
    }

    #[tokio::test]
    async fn test_low_balance_notification_emitted_once() -> Result<()> {
        let db = setup_test_db().await?;
        // Threshold 50: both deductions below land under it
        let agent = create_custom_agent(&db, "Ada", 100.0, 50.0).await?;

        apply_credit_delta(
            &db,
            agent.id,
            -60.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;
        apply_credit_delta(
            &db,
            agent.id,
            -20.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;

        // Both crossed the threshold inside one cooldown window
        let notifications = get_notifications_for_agent(&db, agent.id).await?;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "low_credit_balance");

        let agent = Agent::find_by_id(agent.id).one(&db).await?.unwrap();
        assert!(agent.low_balance_notified_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_low_balance_notification_after_cooldown() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_custom_agent(&db, "Ada", 100.0, 50.0).await?;

        apply_credit_delta(
            &db,
            agent.id,
            -60.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;

        // Age the stamp past the cooldown
        let stale = chrono::Utc::now() - chrono::Duration::hours(25);
        let mut active: agent::ActiveModel = Agent::find_by_id(agent.id)
            .one(&db)
            .await?
            .unwrap()
            .into();
        active.low_balance_notified_at = Set(Some(stale));
        active.update(&db).await?;

        apply_credit_delta(
            &db,
            agent.id,
            -10.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;

        let notifications = get_notifications_for_agent(&db, agent.id).await?;
        assert_eq!(notifications.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_notification_above_threshold() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_custom_agent(&db, "Ada", 100.0, 20.0).await?;

        apply_credit_delta(
            &db,
            agent.id,
            -30.0,
            CreditKind::Usage,
            CreditLinkage::default(),
            "shoot".to_string(),
        )
        .await?;

        // Balance 70 is above the 20 threshold
        let notifications = get_notifications_for_agent(&db, agent.id).await?;
        assert!(notifications.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_no_notification_on_credit() -> Result<()> {
        let db = setup_test_db().await?;
        // Starting balance already below threshold
        let agent = create_custom_agent(&db, "Ada", 10.0, 50.0).await?;

        // A top-up landing below the threshold is not a deduction
        apply_credit_delta(
            &db,
            agent.id,
            5.0,
            CreditKind::Purchase,
            CreditLinkage::default(),
            "top-up".to_string(),
        )
        .await?;

        let notifications = get_notifications_for_agent(&db, agent.id).await?;
        assert!(notifications.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_check_sufficient_credits() -> Result<()> {
        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 40.0).await?;

        assert!(check_sufficient_credits(&db, agent.id, 40.0).await?);
        assert!(check_sufficient_credits(&db, agent.id, 39.5).await?);
        assert!(!check_sufficient_credits(&db, agent.id, 40.5).await?);

        let result = check_sufficient_credits(&db, 999, 1.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AgentNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_package() -> Result<()> {
        use crate::entities::credit_package;

        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 10.0).await?;

        let package = credit_package::ActiveModel {
            name: Set("Starter".to_string()),
            credits: Set(100.0),
            price: Set(89.0),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let entry = purchase_package(&db, agent.id, package.id).await?;
        assert_eq!(entry.kind, "purchase");
        assert_eq!(entry.amount, 100.0);
        assert_eq!(entry.balance_after, 110.0);
        assert_eq!(entry.package_id, Some(package.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_inactive_package_rejected() -> Result<()> {
        use crate::entities::credit_package;

        let db = setup_test_db().await?;
        let agent = create_test_agent(&db, "Ada", 0.0).await?;

        let package = credit_package::ActiveModel {
            name: Set("Retired".to_string()),
            credits: Set(500.0),
            price: Set(300.0),
            is_active: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = purchase_package(&db, agent.id, package.id).await;
        assert!(matches!(result.unwrap_err(), Error::PackageNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_deductions_never_overdraw() -> Result<()> {
        let (db, path) = setup_file_test_db("overdraw").await?;
        // DatabaseConnection is not Clone with the `mock` feature enabled;
        // share the pool handle across tasks via Arc instead.
        let db = std::sync::Arc::new(db);
        let agent = create_test_agent(&db, "Ada", 100.0).await?;

        // Ten tasks race to deduct 30 credits each; only three fit
        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            let agent_id = agent.id;
            handles.push(tokio::spawn(async move {
                apply_credit_delta(
                    &db,
                    agent_id,
                    -30.0,
                    CreditKind::Usage,
                    CreditLinkage::default(),
                    format!("shoot {i}"),
                )
                .await
            }));
        }

        let mut applied = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => applied += 1,
                Err(Error::InsufficientCredits { .. }) => refused += 1,
                Err(other) => return Err(other),
            }
        }
        assert_eq!(applied, 3);
        assert_eq!(refused, 7);

        let agent = Agent::find_by_id(agent.id).one(&*db).await?.unwrap();
        assert_eq!(agent.credit_balance, 10.0);

        // Three ledger entries whose snapshots walk the balance down
        let ledger = get_ledger_for_agent(&db, agent.id).await?;
        assert_eq!(ledger.len(), 3);
        let mut snapshots: Vec<f64> = ledger.iter().map(|e| e.balance_after).collect();
        snapshots.sort_by(f64::total_cmp);
        assert_eq!(snapshots, vec![10.0, 40.0, 70.0]);

        remove_file_test_db(&path);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_threshold_crossings_notify_once() -> Result<()> {
        let (db, path) = setup_file_test_db("notify-once").await?;
        let db = std::sync::Arc::new(db);
        let agent = create_custom_agent(&db, "Ada", 100.0, 90.0).await?;

        // Every one of the ten racing deductions lands at or below the
        // threshold, but only one may stamp the notification
        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            let agent_id = agent.id;
            handles.push(tokio::spawn(async move {
                apply_credit_delta(
                    &db,
                    agent_id,
                    -10.0,
                    CreditKind::Usage,
                    CreditLinkage::default(),
                    format!("shoot {i}"),
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap()?;
        }

        let agent = Agent::find_by_id(agent.id).one(&*db).await?.unwrap();
        assert_eq!(agent.credit_balance, 0.0);

        let notifications = get_notifications_for_agent(&db, agent.id).await?;
        assert_eq!(notifications.len(), 1);

        remove_file_test_db(&path);
        Ok(())
    }
}
