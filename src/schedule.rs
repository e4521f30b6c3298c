//! Pickup scheduling: selectable dates, time-slot generation and per-item
//! availability windows.
//!
//! Everything here is a pure function of its inputs. The wall clock is
//! always injected (`today` / `now`) so the same call yields the same slots,
//! which also keeps the tests honest.

use crate::api::MenuItem;
use crate::config::RestaurantHours;
use crate::errors::{Error, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A selectable pickup day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateOption {
    pub date: NaiveDate,
    /// "Today", "Tomorrow", or a short weekday name
    pub label: String,
    /// True when the restaurant does not open that weekday at all
    pub closed: bool,
}

/// A selectable pickup time within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 24-hour "HH:MM", what the order flow submits
    pub value: String,
    /// 12-hour rendering for display, e.g. "2:30 PM"
    pub label: String,
}

/// Generate the `days_ahead` selectable pickup days starting at `today`.
///
/// Closed days are still listed (the frontend greys them out), only flagged.
pub fn generate_available_dates(
    hours: &RestaurantHours,
    days_ahead: u32,
    today: NaiveDate,
) -> Vec<DateOption> {
    (0..days_ahead)
        .filter_map(|offset| today.checked_add_days(Days::new(offset as u64)).map(|date| (offset, date)))
        .map(|(offset, date)| DateOption {
            date,
            label: match offset {
                0 => "Today".to_string(),
                1 => "Tomorrow".to_string(),
                _ => date.format("%a").to_string(),
            },
            closed: hours.is_closed_on(date.weekday()),
        })
        .collect()
}

/// Round a time-of-day up to the next multiple of `interval_minutes`,
/// zeroing seconds. A time already on the grid (with zero seconds) is
/// returned unchanged. Returns None when rounding would cross midnight.
pub fn round_up_to_interval(t: NaiveTime, interval_minutes: u32) -> Option<NaiveTime> {
    let rounded = ceil_to_interval(minute_of_day_after(t), interval_minutes);
    minute_of_day_to_time(rounded)
}

/// Generate the pickup slots for `selected_date`, stepping by
/// `interval_minutes` from the effective start up to closing time inclusive.
///
/// The effective start is the opening time, except when `selected_date` is
/// the current day: then it is "now", rounded up to the slot grid, if that
/// is later than opening. A slot exactly at closing time is offered. An
/// effective start past closing yields an empty vector, never an error.
pub fn generate_time_slots(
    hours: &RestaurantHours,
    selected_date: NaiveDate,
    interval_minutes: u32,
    now: NaiveDateTime,
) -> Vec<TimeSlot> {
    let interval = interval_minutes.max(1);
    let close = minute_of_day(hours.close);

    let mut start = minute_of_day(hours.open);
    if selected_date == now.date() {
        let rounded = ceil_to_interval(minute_of_day_after(now.time()), interval);
        if rounded > start {
            start = rounded;
        }
    }

    let mut slots = Vec::new();
    let mut minute = start;
    while minute <= close {
        slots.push(TimeSlot {
            value: format!("{:02}:{:02}", minute / 60, minute % 60),
            label: twelve_hour_label(minute),
        });
        minute += interval;
    }
    slots
}

/// Whether `item` may be ordered for pickup at `pickup_time`.
///
/// An item without an availability window is always orderable, and so is
/// any item while no pickup time has been chosen yet (the menu should not
/// be blocked before the customer picks a slot). The window is inclusive on
/// both ends. Malformed time strings propagate as `Error::MalformedTime`;
/// callers exclude the item rather than guessing.
pub fn is_item_available_at(item: &MenuItem, pickup_time: Option<&str>) -> Result<bool> {
    let (start, end) = match (&item.start_time, &item.end_time) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(true),
    };
    let pickup = match pickup_time {
        Some(pickup) => time_to_minutes(pickup)?,
        None => return Ok(true),
    };
    Ok(pickup >= time_to_minutes(start)? && pickup <= time_to_minutes(end)?)
}

/// Convert a time string to minutes since midnight.
///
/// Accepts 24-hour "HH:MM" / "HH:MM:SS" and 12-hour "H:MM AM/PM"
/// (case-insensitive). 12 AM is midnight, 12 PM is noon; no other hour
/// shifts at those boundaries. Anything else is `Error::MalformedTime`,
/// never a silent zero.
pub fn time_to_minutes(time: &str) -> Result<u32> {
    let malformed = || Error::MalformedTime(time.to_string());

    let trimmed = time.trim();
    let mut words = trimmed.split_whitespace();
    let clock = words.next().ok_or_else(malformed)?;
    let meridiem = words.next();
    if words.next().is_some() {
        return Err(malformed().into());
    }

    let mut parts = clock.split(':');
    let hour: u32 = parts
        .next()
        .and_then(|h| h.parse().ok())
        .ok_or_else(malformed)?;
    let minute: u32 = parts
        .next()
        .and_then(|m| if m.len() == 2 { m.parse().ok() } else { None })
        .ok_or_else(malformed)?;
    let second: Option<u32> = match parts.next() {
        Some(s) if s.len() == 2 => Some(s.parse().map_err(|_| malformed())?),
        Some(_) => return Err(malformed().into()),
        None => None,
    };
    if parts.next().is_some() || minute > 59 || second.is_some_and(|s| s > 59) {
        return Err(malformed().into());
    }

    let hour = match meridiem.map(str::to_ascii_uppercase).as_deref() {
        None => {
            if hour > 23 {
                return Err(malformed().into());
            }
            hour
        }
        Some(meridiem) => {
            // 12-hour form never carries seconds
            if second.is_some() || !(1..=12).contains(&hour) {
                return Err(malformed().into());
            }
            match (meridiem, hour) {
                ("AM", 12) => 0,
                ("AM", h) => h,
                ("PM", 12) => 12,
                ("PM", h) => h + 12,
                _ => return Err(malformed().into()),
            }
        }
    };

    Ok(hour * 60 + minute)
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Minute of day, bumped by one when the time has sub-minute precision, so
/// rounding up never lands on a grid point that is already in the past
fn minute_of_day_after(t: NaiveTime) -> u32 {
    let mut minute = minute_of_day(t);
    if t.second() > 0 || t.nanosecond() > 0 {
        minute += 1;
    }
    minute
}

fn ceil_to_interval(minute: u32, interval: u32) -> u32 {
    let interval = interval.max(1);
    minute.div_ceil(interval) * interval
}

fn minute_of_day_to_time(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

fn twelve_hour_label(minute: u32) -> String {
    let (hour, meridiem) = match minute / 60 {
        0 => (12, "AM"),
        12 => (12, "PM"),
        h if h < 12 => (h, "AM"),
        h => (h - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, minute % 60, meridiem)
}
