//! Availability business logic - Layered staff availability resolution.
//!
//! Whether a staff member is bookable on a date is resolved by an ordered
//! chain of layers, each of which either decides or passes to the next:
//!
//! 1. approved time-off covering the date (always unavailable),
//! 2. a date-specific override row,
//! 3. the weekly recurring schedule for that weekday,
//! 4. the default: available Monday through Friday.
//!
//! Days of week use the 0=Sunday..6=Saturday convention throughout.

use crate::{
    entities::{
        AvailabilityOverride, Staff, TimeOffRequest, WeeklySchedule, availability_override,
        time_off_request, weekly_schedule,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, prelude::*};

/// Resolves whether `staff_id` is bookable on `date`, optionally at a
/// specific `time`.
///
/// Layers are consulted in order and the first one with an opinion wins.
/// Within the override and weekly layers, an unavailable row decides
/// outright; an available row with both window bounds set constrains a
/// time-specific query to `[available_from, available_to]` inclusive and
/// means available all day otherwise. Inactive staff are never bookable.
pub async fn is_staff_available(
    db: &DatabaseConnection,
    staff_id: i64,
    date: NaiveDate,
    time: Option<NaiveTime>,
) -> Result<bool> {
    let staff = Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or(Error::StaffNotFound { id: staff_id })?;

    if !staff.is_active {
        return Ok(false);
    }

    if let Some(decision) = time_off_layer(db, staff_id, date).await? {
        return Ok(decision);
    }
    if let Some(decision) = override_layer(db, staff_id, date, time).await? {
        return Ok(decision);
    }
    if let Some(decision) = weekly_layer(db, staff_id, date, time).await? {
        return Ok(decision);
    }
    Ok(default_weekday_available(date))
}

/// Layer 1: an approved time-off request covering `date` makes the staff
/// member unavailable, full stop.
async fn time_off_layer(
    db: &DatabaseConnection,
    staff_id: i64,
    date: NaiveDate,
) -> Result<Option<bool>> {
    let blocking = TimeOffRequest::find()
        .filter(time_off_request::Column::StaffId.eq(staff_id))
        .filter(time_off_request::Column::Status.eq("approved"))
        .filter(time_off_request::Column::StartDate.lte(date))
        .filter(time_off_request::Column::EndDate.gte(date))
        .one(db)
        .await?;

    Ok(blocking.map(|_| false))
}

/// Layer 2: a date-specific override row governs if present. Manual rows
/// outrank rows materialized by a time-off approval (NULL
/// `time_off_request_id` sorts first ascending in SQLite).
async fn override_layer(
    db: &DatabaseConnection,
    staff_id: i64,
    date: NaiveDate,
    time: Option<NaiveTime>,
) -> Result<Option<bool>> {
    let row = AvailabilityOverride::find()
        .filter(availability_override::Column::StaffId.eq(staff_id))
        .filter(availability_override::Column::Date.eq(date))
        .order_by_asc(availability_override::Column::TimeOffRequestId)
        .one(db)
        .await?;

    Ok(row.map(|row| {
        row.is_available && window_allows(row.available_from, row.available_to, time)
    }))
}

/// Layer 3: the weekly recurring row for `date`'s weekday, with the same
/// time-window semantics as the override layer.
async fn weekly_layer(
    db: &DatabaseConnection,
    staff_id: i64,
    date: NaiveDate,
    time: Option<NaiveTime>,
) -> Result<Option<bool>> {
    let day_of_week = i32::try_from(date.weekday().num_days_from_sunday()).unwrap_or(0);

    let row = WeeklySchedule::find()
        .filter(weekly_schedule::Column::StaffId.eq(staff_id))
        .filter(weekly_schedule::Column::DayOfWeek.eq(day_of_week))
        .one(db)
        .await?;

    Ok(row.map(|row| {
        row.is_available && window_allows(row.available_from, row.available_to, time)
    }))
}

/// Layer 4: with no rows at all, weekdays are available and weekends are not.
fn default_weekday_available(date: NaiveDate) -> bool {
    let day_of_week = date.weekday().num_days_from_sunday();
    (1..=5).contains(&day_of_week)
}

/// A row with both window bounds set constrains time-specific queries to
/// the inclusive window; a missing bound or a date-only query means the
/// whole day.
fn window_allows(from: Option<NaiveTime>, to: Option<NaiveTime>, time: Option<NaiveTime>) -> bool {
    match (from, to, time) {
        (Some(from), Some(to), Some(time)) => time >= from && time <= to,
        _ => true,
    }
}

/// Resolves a seven-day availability strip starting at `week_start`, one
/// entry per day. This is the read shape calendar screens consume.
pub async fn schedule_for_week(
    db: &DatabaseConnection,
    staff_id: i64,
    week_start: NaiveDate,
) -> Result<Vec<(NaiveDate, bool)>> {
    let mut days = Vec::with_capacity(7);
    for offset in 0..7u64 {
        let date = week_start
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Error::Config {
                message: format!("Date out of range: {week_start} + {offset} days"),
            })?;
        let available = is_staff_available(db, staff_id, date, None).await?;
        days.push((date, available));
    }
    Ok(days)
}
