//! Payout business logic - At-most-once payout application per order.
//!
//! A payout run is guarded by a persisted idempotency record keyed by a
//! caller-supplied token, so the at-most-once guarantee survives retries and
//! process restarts. [`acquire_payout_lock`] must be called before
//! [`complete_job_payouts`]; the record's status tells a retrying caller
//! whether the run is still in flight, already applied, or permanently
//! failed. All payout rows for one run are inserted in a single database
//! transaction together with the record's `completed` flip.

use crate::{
    entities::{PayoutLock, company_allocation, partner_payout, payout_lock, staff_payout},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// Lock status while a payout attempt is in flight.
pub const STATUS_PROCESSING: &str = "processing";
/// Lock status after a successful payout run.
pub const STATUS_COMPLETED: &str = "completed";
/// Lock status after a failed payout run; retry needs a new key.
pub const STATUS_FAILED: &str = "failed";

/// Result of a lock acquisition attempt.
#[derive(Debug, Clone)]
pub struct LockAcquisition {
    /// Whether this caller created the record and may proceed
    pub acquired: bool,
    /// Current status of the record (`processing` when freshly acquired)
    pub status: String,
}

/// One staff or partner payout to insert.
#[derive(Debug, Clone)]
pub struct PayoutItem {
    /// Staff or partner receiving the payout
    pub recipient_id: i64,
    /// Payout amount in dollars
    pub amount: f64,
    /// Payment state; defaults to `"pending"` when None
    pub status: Option<String>,
}

/// One company-pool allocation to insert.
#[derive(Debug, Clone)]
pub struct PoolAllocation {
    /// Name of the internal pool
    pub pool: String,
    /// Allocated amount in dollars
    pub amount: f64,
}

/// Result of a completed (or idempotently skipped) payout run.
#[derive(Debug, Clone)]
pub struct PayoutCompletion {
    /// True when a previous run already applied the payouts and this call
    /// inserted nothing
    pub already_completed: bool,
    /// Staff payout rows inserted by this call
    pub staff_rows: usize,
    /// Partner payout rows inserted by this call
    pub partner_rows: usize,
    /// Company allocation rows inserted by this call
    pub allocation_rows: usize,
}

/// Acquires the payout idempotency lock for `key`.
///
/// If no record exists, one is created in `processing` state and
/// `acquired` is true. If a record already exists (including one created
/// concurrently, which the primary-key constraint arbitrates), `acquired`
/// is false and `status` reports its current state so the caller knows not
/// to re-run payout logic.
#[instrument(skip(db))]
pub async fn acquire_payout_lock(
    db: &DatabaseConnection,
    key: &str,
    order_id: i64,
) -> Result<LockAcquisition> {
    if key.trim().is_empty() {
        return Err(Error::Config {
            message: "Idempotency key cannot be empty".to_string(),
        });
    }

    if let Some(existing) = PayoutLock::find_by_id(key).one(db).await? {
        return Ok(LockAcquisition {
            acquired: false,
            status: existing.status,
        });
    }

    let now = chrono::Utc::now();
    let lock = payout_lock::ActiveModel {
        idempotency_key: Set(key.to_string()),
        order_id: Set(order_id),
        status: Set(STATUS_PROCESSING.to_string()),
        error_message: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match lock.insert(db).await {
        Ok(_) => {
            info!("Acquired payout lock '{}' for order {}", key, order_id);
            Ok(LockAcquisition {
                acquired: true,
                status: STATUS_PROCESSING.to_string(),
            })
        }
        // Lost an insert race: the key exists now, report its status
        Err(insert_err) => match PayoutLock::find_by_id(key).one(db).await? {
            Some(existing) => Ok(LockAcquisition {
                acquired: false,
                status: existing.status,
            }),
            None => Err(insert_err.into()),
        },
    }
}

/// Applies the payout batches for one order under the idempotency lock.
///
/// Requires a prior [`acquire_payout_lock`] for `key`
/// ([`Error::PayoutLockNotFound`] otherwise). A `completed` record makes
/// this a successful no-op; a `failed` record returns
/// [`Error::PayoutPreviouslyFailed`]. Otherwise all three batches and the
/// record's `completed` flip are one all-or-nothing transaction. The flip
/// only lands while the record is still `processing`, so a concurrent
/// attempt that finished first wins and this one rolls back without
/// inserting duplicates. Any error while inserting rolls the batches back,
/// marks the record `failed` with the captured error (that mark persists
/// outside the rollback), and propagates the original error.
#[instrument(skip(db, staff_payouts, partner_payouts, pool_allocations))]
pub async fn complete_job_payouts(
    db: &DatabaseConnection,
    key: &str,
    order_id: i64,
    staff_payouts: &[PayoutItem],
    partner_payouts: &[PayoutItem],
    pool_allocations: &[PoolAllocation],
) -> Result<PayoutCompletion> {
    let lock = PayoutLock::find_by_id(key)
        .one(db)
        .await?
        .ok_or_else(|| Error::PayoutLockNotFound {
            key: key.to_string(),
        })?;

    if lock.order_id != order_id {
        return Err(Error::Config {
            message: format!(
                "Payout lock '{}' was acquired for order {}, not order {}",
                key, lock.order_id, order_id
            ),
        });
    }

    match lock.status.as_str() {
        STATUS_COMPLETED => {
            // Idempotent retry: report success without touching anything
            info!("Payout for key '{}' already completed, skipping", key);
            return Ok(PayoutCompletion {
                already_completed: true,
                staff_rows: 0,
                partner_rows: 0,
                allocation_rows: 0,
            });
        }
        STATUS_FAILED => {
            return Err(Error::PayoutPreviouslyFailed {
                key: key.to_string(),
                message: lock.error_message.unwrap_or_default(),
            });
        }
        _ => {}
    }

    match insert_payout_batches(
        db,
        lock,
        staff_payouts,
        partner_payouts,
        pool_allocations,
    )
    .await
    {
        Ok(completion) => {
            info!(
                "Completed payouts for key '{}': {} staff, {} partner, {} allocations",
                key, completion.staff_rows, completion.partner_rows, completion.allocation_rows
            );
            Ok(completion)
        }
        // A concurrent attempt already burned this key; its failure record
        // must not be overwritten with ours
        Err(err @ Error::PayoutPreviouslyFailed { .. }) => Err(err),
        Err(err) => {
            warn!("Payout for key '{}' failed: {}", key, err);
            if let Err(mark_err) = mark_lock_failed(db, key, &err.to_string()).await {
                warn!(
                    "Could not record payout failure for key '{}': {}",
                    key, mark_err
                );
            }
            Err(err)
        }
    }
}

/// Inserts all payout rows and flips the lock to `completed` inside one
/// transaction. Dropping the transaction on any error rolls everything back.
///
/// `lock` is the state this attempt observed before starting; the flip is a
/// guarded `UPDATE` that only matches a row still in `processing`, so a
/// stale view loses cleanly to whichever attempt finished first.
async fn insert_payout_batches(
    db: &DatabaseConnection,
    lock: payout_lock::Model,
    staff_payouts: &[PayoutItem],
    partner_payouts: &[PayoutItem],
    pool_allocations: &[PoolAllocation],
) -> Result<PayoutCompletion> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let order_id = lock.order_id;

    for item in staff_payouts {
        validate_payout_amount(item.amount)?;
        staff_payout::ActiveModel {
            order_id: Set(order_id),
            staff_id: Set(item.recipient_id),
            amount: Set(item.amount),
            status: Set(item.status.clone().unwrap_or_else(|| "pending".to_string())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for item in partner_payouts {
        validate_payout_amount(item.amount)?;
        partner_payout::ActiveModel {
            order_id: Set(order_id),
            partner_id: Set(item.recipient_id),
            amount: Set(item.amount),
            status: Set(item.status.clone().unwrap_or_else(|| "pending".to_string())),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for allocation in pool_allocations {
        validate_payout_amount(allocation.amount)?;
        company_allocation::ActiveModel {
            order_id: Set(order_id),
            pool: Set(allocation.pool.clone()),
            amount: Set(allocation.amount),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let flipped = PayoutLock::update_many()
        .col_expr(
            payout_lock::Column::Status,
            Expr::value(STATUS_COMPLETED.to_string()),
        )
        .col_expr(payout_lock::Column::UpdatedAt, Expr::value(now))
        .filter(payout_lock::Column::IdempotencyKey.eq(&lock.idempotency_key))
        .filter(payout_lock::Column::Status.eq(STATUS_PROCESSING))
        .exec(&txn)
        .await?;

    if flipped.rows_affected == 0 {
        // The record left `processing` while this attempt was inserting;
        // another run finished first. Discard our batches.
        txn.rollback().await?;
        return lost_race_outcome(db, &lock.idempotency_key).await;
    }

    txn.commit().await?;

    Ok(PayoutCompletion {
        already_completed: false,
        staff_rows: staff_payouts.len(),
        partner_rows: partner_payouts.len(),
        allocation_rows: pool_allocations.len(),
    })
}

/// Resolves what a losing attempt should report after its rollback, based
/// on the state the winning attempt left behind.
async fn lost_race_outcome(db: &DatabaseConnection, key: &str) -> Result<PayoutCompletion> {
    let current = PayoutLock::find_by_id(key)
        .one(db)
        .await?
        .ok_or_else(|| Error::PayoutLockNotFound {
            key: key.to_string(),
        })?;

    if current.status == STATUS_FAILED {
        return Err(Error::PayoutPreviouslyFailed {
            key: key.to_string(),
            message: current.error_message.unwrap_or_default(),
        });
    }

    info!("Payout for key '{}' was applied by a concurrent run", key);
    Ok(PayoutCompletion {
        already_completed: true,
        staff_rows: 0,
        partner_rows: 0,
        allocation_rows: 0,
    })
}

/// Records a failed payout attempt on the lock. Runs on the plain
/// connection so the failure state outlives the rolled-back batch.
async fn mark_lock_failed(db: &DatabaseConnection, key: &str, message: &str) -> Result<()> {
    let Some(lock) = PayoutLock::find_by_id(key).one(db).await? else {
        return Ok(());
    };

    let mut active: payout_lock::ActiveModel = lock.into();
    active.status = Set(STATUS_FAILED.to_string());
    active.error_message = Set(Some(message.to_string()));
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;
    Ok(())
}

fn validate_payout_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}
