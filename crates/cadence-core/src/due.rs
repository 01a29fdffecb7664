//! Due-date and daily-goal calculations for a single reminder.
//!
//! All functions here are pure: they read a [`ReminderSnapshot`] and an
//! explicit `now`, and never touch a clock or mutate their input.
//!
//! ## Coverage
//!
//! Only the latest entry timestamp is consulted. A fixed-time slot counts as
//! covered when that timestamp is at or after the slot, so one entry logged
//! after the day's last slot covers every slot of that day, including ones
//! that were never answered individually.
//!
//! ## Clock alignment
//!
//! Aligned interval reminders fire on minutes `alignment + k * interval` of
//! the local day. `k` is unbounded in both directions: a negative `k` reaches
//! into the previous day and a large one into the next.

use chrono::Duration;

use crate::clock::{
    at_minute, at_offset, minute_of_day, start_of_day, Timestamp, FAR_FUTURE,
};
use crate::reminder::{EntryHistory, ReminderConfig, ReminderId, ReminderKind};

/// Everything the calculators need to know about one reminder at one moment.
#[derive(Debug, Clone, Copy)]
pub struct ReminderSnapshot<'a> {
    pub config: &'a ReminderConfig,
    /// Latest logged entry, skipped or not.
    pub last_entry: Option<Timestamp>,
    /// Sum of entry counts since local start of today.
    pub today_count: u32,
}

impl<'a> ReminderSnapshot<'a> {
    pub fn new(config: &'a ReminderConfig, last_entry: Option<Timestamp>, today_count: u32) -> Self {
        Self {
            config,
            last_entry,
            today_count,
        }
    }

    /// Derive the latest entry and today's count from a full history.
    pub fn from_history(config: &'a ReminderConfig, history: &EntryHistory, now: Timestamp) -> Self {
        Self {
            config,
            last_entry: history.last_entry(),
            today_count: history.count_since(start_of_day(now)),
        }
    }

    pub fn id(&self) -> ReminderId {
        self.config.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn covers(&self, slot: Timestamp) -> bool {
        self.last_entry.is_some_and(|entry| entry >= slot)
    }

    /// Whether today's goal is met.
    ///
    /// Interval reminders without a positive goal never reach it. A fixed
    /// reminder is done once no slot is left in the future and every past
    /// slot is covered; with no slots at all it is trivially done.
    pub fn goal_reached(&self, now: Timestamp) -> bool {
        match &self.config.kind {
            ReminderKind::Interval { daily_goal, .. } => match daily_goal {
                Some(goal) if *goal > 0 => self.today_count >= *goal,
                _ => false,
            },
            ReminderKind::Fixed { times } => slots_on(start_of_day(now), times)
                .into_iter()
                .all(|slot| slot <= now && self.covers(slot)),
        }
    }

    /// When the reminder next becomes due.
    ///
    /// For fixed reminders an uncovered past slot today wins over any future
    /// one, so an overdue reminder reports the moment it became overdue.
    /// `dnd_floor` only moves interval baselines forward.
    pub fn next_due_date(&self, now: Timestamp, dnd_floor: Option<Timestamp>) -> Timestamp {
        match &self.config.kind {
            ReminderKind::Fixed { times } => {
                let today = start_of_day(now);
                let slots = slots_on(today, times);
                if let Some(missed) = slots
                    .iter()
                    .copied()
                    .find(|&slot| slot <= now && !self.covers(slot))
                {
                    return missed;
                }
                if let Some(upcoming) = slots.iter().copied().find(|&slot| slot > now) {
                    return upcoming;
                }
                match times.iter().min() {
                    Some(&first) => at_offset(today + Duration::days(1), first),
                    None => FAR_FUTURE,
                }
            }
            ReminderKind::Interval {
                interval_minutes,
                align_to_clock,
                alignment_minute,
                ..
            } => {
                let mut base = self.last_entry.unwrap_or(self.config.created_at);
                if let Some(floor) = dnd_floor {
                    if floor > base {
                        base = floor;
                    }
                }
                let interval = effective_interval(*interval_minutes);
                if *align_to_clock {
                    next_aligned_after(base, interval, i64::from(*alignment_minute))
                } else {
                    base + Duration::minutes(interval)
                }
            }
        }
    }

    /// Whether the reminder should be acted on at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        if self.goal_reached(now) {
            return false;
        }
        match &self.config.kind {
            ReminderKind::Interval {
                interval_minutes,
                align_to_clock,
                alignment_minute,
                ..
            } => {
                let baseline = self.last_entry.unwrap_or(self.config.created_at);
                let interval = effective_interval(*interval_minutes);
                if *align_to_clock {
                    let slot = last_aligned_at_or_before(now, interval, i64::from(*alignment_minute));
                    slot > baseline && slot >= self.config.created_at && slot <= now
                } else {
                    now >= baseline + Duration::minutes(interval)
                }
            }
            ReminderKind::Fixed { times } => slots_on(start_of_day(now), times)
                .into_iter()
                .any(|slot| slot <= now && !self.covers(slot)),
        }
    }
}

/// The reminder with the smallest next-due date.
///
/// Archived and goal-reached reminders are ignored. Ties go to the reminder
/// seen first.
pub fn earliest_due<'r, 'a>(
    reminders: &'r [ReminderSnapshot<'a>],
    now: Timestamp,
    dnd_floor: Option<Timestamp>,
) -> Option<(&'r ReminderSnapshot<'a>, Timestamp)> {
    let mut best: Option<(&'r ReminderSnapshot<'a>, Timestamp)> = None;
    for reminder in reminders {
        if reminder.config.archived || reminder.goal_reached(now) {
            continue;
        }
        let due = reminder.next_due_date(now, dnd_floor);
        if best.map_or(true, |(_, current)| due < current) {
            best = Some((reminder, due));
        }
    }
    best
}

/// Sorted slot timestamps on `day`.
fn slots_on(day: Timestamp, times: &[u32]) -> Vec<Timestamp> {
    let mut slots: Vec<Timestamp> = times.iter().map(|&t| at_offset(day, t)).collect();
    slots.sort_unstable();
    slots
}

// validate() rejects zero; clamping keeps the division below defined.
fn effective_interval(interval_minutes: u32) -> i64 {
    i64::from(interval_minutes.max(1))
}

/// First aligned slot strictly after `base`, at minute granularity.
fn next_aligned_after(base: Timestamp, interval: i64, alignment: i64) -> Timestamp {
    let base_minute = minute_of_day(base);
    let k = div_ceil(base_minute - alignment, interval);
    let mut next = alignment + k * interval;
    if next <= base_minute {
        next += interval;
    }
    at_minute(start_of_day(base), next)
}

/// Latest aligned slot whose minute is not after the current minute.
fn last_aligned_at_or_before(now: Timestamp, interval: i64, alignment: i64) -> Timestamp {
    let k = (minute_of_day(now) - alignment).div_euclid(interval);
    at_minute(start_of_day(now), alignment + k * interval)
}

fn div_ceil(a: i64, b: i64) -> i64 {
    -((-a).div_euclid(b))
}
