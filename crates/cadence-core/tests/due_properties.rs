//! Property tests for the due calculators.

use cadence_core::clock::{at_offset, minute_of_day, start_of_day, Timestamp};
use cadence_core::{ReminderConfig, ReminderKind, ReminderSnapshot};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn day() -> Timestamp {
    NaiveDate::from_ymd_opt(2026, 6, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Any second within a three-day span centred on the test day.
fn moment() -> impl Strategy<Value = Timestamp> {
    (-86_400i64..2 * 86_400).prop_map(|secs| day() + Duration::seconds(secs))
}

proptest! {
    /// Plain interval reminders land exactly one interval after the baseline.
    #[test]
    fn prop_interval_offset_is_exact(
        minutes in 1u32..=720,
        created in moment(),
        last in prop::option::of(moment()),
        floor in prop::option::of(moment()),
        now in moment(),
    ) {
        let cfg = ReminderConfig::new("Water", ReminderKind::interval(minutes, None), created);
        let snap = ReminderSnapshot::new(&cfg, last, 0);

        let mut baseline = last.unwrap_or(created);
        if let Some(floor) = floor {
            baseline = baseline.max(floor);
        }
        let due = snap.next_due_date(now, floor);
        prop_assert_eq!(due - baseline, Duration::minutes(i64::from(minutes)));
    }

    /// Aligned reminders land on a later slot of the alignment grid.
    #[test]
    fn prop_aligned_slot_is_later_and_on_grid(
        minutes in 1u32..=720,
        alignment in 0u32..1440,
        created in moment(),
        last in prop::option::of(moment()),
        now in moment(),
    ) {
        let cfg = ReminderConfig::new(
            "Posture",
            ReminderKind::aligned(minutes, alignment, None),
            created,
        );
        let snap = ReminderSnapshot::new(&cfg, last, 0);
        let baseline = last.unwrap_or(created);

        let due = snap.next_due_date(now, None);
        let due_minute = (due - start_of_day(baseline)).num_minutes();
        prop_assert!(due > baseline);
        prop_assert!(due_minute > minute_of_day(baseline));
        prop_assert_eq!(
            (due_minute - i64::from(alignment)).rem_euclid(i64::from(minutes)),
            0
        );
    }

    /// A fixed reminder is due exactly when some past slot is uncovered, and
    /// asking twice gives the same answer.
    #[test]
    fn prop_fixed_due_iff_uncovered_slot(
        times in prop::collection::vec(0u32..86_400, 0..6),
        last in prop::option::of(moment()),
        offset in 0u32..86_400,
    ) {
        let cfg = ReminderConfig::new("Meds", ReminderKind::fixed(times), day());
        let snap = ReminderSnapshot::new(&cfg, last, 0);
        let now = at_offset(day(), offset);

        let ReminderKind::Fixed { times } = &cfg.kind else {
            unreachable!("constructed as fixed");
        };
        let expected = times
            .iter()
            .map(|&t| at_offset(day(), t))
            .any(|slot| slot <= now && last.map_or(true, |entry| entry < slot));

        prop_assert_eq!(snap.is_due(now), expected);
        prop_assert_eq!(snap.is_due(now), snap.is_due(now));
    }

    /// Logging at or after the due moment resolves the reminder.
    #[test]
    fn prop_logging_when_due_clears_due(
        minutes in 1u32..=240,
        aligned in any::<bool>(),
        alignment in 0u32..1440,
        created_offset in 0u32..12 * 3600,
        late_by in 0i64..3600,
    ) {
        // stay within one day: aligned grids restart at every midnight
        let created = at_offset(day(), created_offset);
        let kind = if aligned {
            ReminderKind::aligned(minutes, alignment, Some(1))
        } else {
            ReminderKind::interval(minutes, Some(1))
        };
        let cfg = ReminderConfig::new("Eyes", kind, created);
        let before = ReminderSnapshot::new(&cfg, None, 0);
        let logged_at = before.next_due_date(created, None) + Duration::seconds(late_by);
        prop_assert!(before.is_due(logged_at));

        let after = ReminderSnapshot::new(&cfg, Some(logged_at), 1);
        prop_assert!(!after.is_due(logged_at));
        prop_assert!(after.goal_reached(logged_at));
    }
}
