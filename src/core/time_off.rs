//! Time-off business logic - Request workflow with atomic side effects.
//!
//! Approving a request both charges the staff member's used-days counter and
//! materializes one unavailable override row per day, in the same database
//! transaction as the status change. Reversing an approval (cancel or
//! reject) undoes exactly those two effects: the counter is decremented
//! floored at zero, and only the override rows tagged with the request are
//! deleted. Manual overrides in the same range survive.

use crate::{
    entities::{
        AvailabilityOverride, Staff, TimeOffRequest, availability_override, staff,
        time_off_request,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Status of a freshly submitted request.
pub const STATUS_PENDING: &str = "pending";
/// Status of an approved request; carries side effects.
pub const STATUS_APPROVED: &str = "approved";
/// Terminal status for a denied request.
pub const STATUS_REJECTED: &str = "rejected";
/// Terminal status for a withdrawn request.
pub const STATUS_CANCELLED: &str = "cancelled";

/// Submits a new time-off request in `pending` state.
///
/// `reason` selects which used-days counter an approval will charge:
/// `"vacation"` or `"sick"`.
#[instrument(skip(db, note))]
pub async fn submit_time_off_request(
    db: &DatabaseConnection,
    staff_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
    note: Option<String>,
) -> Result<time_off_request::Model> {
    if end_date < start_date {
        return Err(Error::Config {
            message: format!("Time-off range ends ({end_date}) before it starts ({start_date})"),
        });
    }
    if reason != "vacation" && reason != "sick" {
        return Err(Error::Config {
            message: format!("Unknown time-off reason '{reason}'"),
        });
    }

    Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or(Error::StaffNotFound { id: staff_id })?;

    let now = chrono::Utc::now();
    let request = time_off_request::ActiveModel {
        staff_id: Set(staff_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        reason: Set(reason.to_string()),
        status: Set(STATUS_PENDING.to_string()),
        note: Set(note),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let request = request.insert(db).await?;

    info!(
        "Submitted time-off request {} for staff {} ({} to {})",
        request.id, staff_id, start_date, end_date
    );
    Ok(request)
}

/// Approves a pending request.
///
/// In one transaction: the staff member's used-days counter (vacation or
/// sick, selected by the request's reason) is incremented by the inclusive
/// day count, one unavailable override row tagged with the request is
/// inserted per day in range, and the status flips to `approved`. A reader
/// can never observe the approval without its side effects.
#[instrument(skip(db))]
pub async fn approve_time_off_request(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<time_off_request::Model> {
    let txn = db.begin().await?;

    let request = find_request(&txn, request_id).await?;
    if request.status != STATUS_PENDING {
        return Err(Error::InvalidTransition {
            from: request.status,
            to: STATUS_APPROVED.to_string(),
        });
    }

    let days = inclusive_day_count(request.start_date, request.end_date);
    adjust_used_days(&txn, request.staff_id, &request.reason, days).await?;

    let mut day = request.start_date;
    while day <= request.end_date {
        availability_override::ActiveModel {
            staff_id: Set(request.staff_id),
            date: Set(day),
            is_available: Set(false),
            time_off_request_id: Set(Some(request.id)),
            note: Set(Some(format!("Time off ({})", request.reason))),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        day = day.succ_opt().ok_or_else(|| Error::Config {
            message: format!("Date out of range after {day}"),
        })?;
    }

    let updated = set_status(&txn, request, STATUS_APPROVED).await?;
    txn.commit().await?;

    info!(
        "Approved time-off request {} ({} days for staff {})",
        request_id, days, updated.staff_id
    );
    Ok(updated)
}

/// Rejects a request. Rejecting an approval reverses its side effects.
pub async fn reject_time_off_request(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<time_off_request::Model> {
    close_request(db, request_id, STATUS_REJECTED).await
}

/// Cancels a request. Cancelling an approval reverses its side effects.
pub async fn cancel_time_off_request(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<time_off_request::Model> {
    close_request(db, request_id, STATUS_CANCELLED).await
}

/// Shared `pending|approved -> rejected|cancelled` transition. Reversal of
/// an approval (counter decrement floored at zero, tagged override rows
/// deleted) happens in the same transaction as the status change.
#[instrument(skip(db))]
async fn close_request(
    db: &DatabaseConnection,
    request_id: i64,
    to_status: &str,
) -> Result<time_off_request::Model> {
    let txn = db.begin().await?;

    let request = find_request(&txn, request_id).await?;
    if request.status != STATUS_PENDING && request.status != STATUS_APPROVED {
        return Err(Error::InvalidTransition {
            from: request.status,
            to: to_status.to_string(),
        });
    }

    if request.status == STATUS_APPROVED {
        let days = inclusive_day_count(request.start_date, request.end_date);
        adjust_used_days(&txn, request.staff_id, &request.reason, -days).await?;

        // Only the rows this approval materialized; manual overrides in the
        // same range are untouched
        AvailabilityOverride::delete_many()
            .filter(availability_override::Column::TimeOffRequestId.eq(request.id))
            .exec(&txn)
            .await?;
    }

    let updated = set_status(&txn, request, to_status).await?;
    txn.commit().await?;

    info!("Time-off request {} moved to '{}'", request_id, to_status);
    Ok(updated)
}

async fn find_request<C>(db: &C, request_id: i64) -> Result<time_off_request::Model>
where
    C: ConnectionTrait,
{
    TimeOffRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("Time-off request {request_id} not found"),
        })
}

/// Adds `delta` days to the counter selected by `reason`, flooring at zero.
async fn adjust_used_days<C>(db: &C, staff_id: i64, reason: &str, delta: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let staff = Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or(Error::StaffNotFound { id: staff_id })?;

    let mut active: staff::ActiveModel = staff.clone().into();
    if reason == "sick" {
        active.sick_days_used = Set((staff.sick_days_used + delta).max(0));
    } else {
        active.vacation_days_used = Set((staff.vacation_days_used + delta).max(0));
    }
    active.update(db).await?;
    Ok(())
}

async fn set_status<C>(
    db: &C,
    request: time_off_request::Model,
    status: &str,
) -> Result<time_off_request::Model>
where
    C: ConnectionTrait,
{
    let mut active: time_off_request::ActiveModel = request.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i32 {
    i32::try_from((end - start).num_days() + 1).unwrap_or(i32::MAX)
}
