//! Available-slot generation.
//!
//! The working window of a day is partitioned into contiguous fixed-width
//! slots. A slot is offered iff it overlaps none of the vet's
//! schedule-occupying appointments and, on the current day, starts strictly
//! after `now`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Database;

use super::{add_days, SchedulingError, SchedulingResult, TimeRange};

/// Slot label format (`HH:mm`).
pub const SLOT_FORMAT: &str = "%H:%M";

/// Daily working window and slot width.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkWindow {
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: u32,
}

impl Default for WorkWindow {
    /// 09:00 to 18:00 in 30-minute slots.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_minutes: 30,
        }
    }
}

impl WorkWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, slot_minutes: u32) -> SchedulingResult<Self> {
        if end <= start {
            return Err(SchedulingError::InvalidWindow(format!(
                "end {} must be after start {}",
                end, start
            )));
        }
        if slot_minutes == 0 {
            return Err(SchedulingError::InvalidWindow(
                "slot length must be positive".into(),
            ));
        }
        Ok(Self {
            start,
            end,
            slot_minutes,
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Candidate slots for `date`. Only slots that end within the window are
    /// produced; a trailing remainder shorter than one slot is dropped.
    pub fn candidates(&self, date: NaiveDate) -> Vec<TimeRange> {
        let window_start = Utc.from_utc_datetime(&date.and_time(self.start));
        let window_end = Utc.from_utc_datetime(&date.and_time(self.end));
        let step = TimeDelta::minutes(i64::from(self.slot_minutes));

        let mut slots = Vec::new();
        let mut cursor = window_start;
        while let Some(next) = cursor.checked_add_signed(step) {
            if next > window_end {
                break;
            }
            slots.push(TimeRange::from_stored(cursor, next));
            cursor = next;
        }
        slots
    }
}

/// Free slot start times on `date`, given the vet's booked ranges.
///
/// `booked` must already exclude released (cancelled / no-show) appointments.
pub fn available_slots(
    date: NaiveDate,
    window: &WorkWindow,
    booked: &[TimeRange],
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let is_today = now.date_naive() == date;

    window
        .candidates(date)
        .into_iter()
        .filter(|slot| !booked.iter().any(|b| b.overlaps(slot)))
        .filter(|slot| !is_today || slot.start() > now)
        .map(|slot| slot.start())
        .collect()
}

/// Generates bookable slots for a vet from stored appointments.
pub struct SlotFinder<'a> {
    db: &'a Database,
    window: WorkWindow,
}

impl<'a> SlotFinder<'a> {
    /// Create a slot finder with the given working window.
    pub fn new(db: &'a Database, window: WorkWindow) -> Self {
        Self { db, window }
    }

    /// Free `HH:mm` slot labels for the vet on `date`, across all clinics.
    pub fn generate_slots(
        &self,
        vet_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Vec<String>> {
        let day_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let day_end = add_days(day_start, 1)?;

        // One fetch per call; every candidate is tested against this list
        let booked: Vec<TimeRange> = self
            .db
            .list_vet_appointments_between(vet_id, day_start, day_end)?
            .iter()
            .filter(|appt| appt.status.occupies_schedule())
            .map(|appt| appt.range())
            .collect();

        Ok(available_slots(date, &self.window, &booked, now)
            .into_iter()
            .map(|start| start.format(SLOT_FORMAT).to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, hour, minute, 0).unwrap()
    }

    fn labels(slots: &[DateTime<Utc>]) -> Vec<String> {
        slots.iter().map(|s| s.format(SLOT_FORMAT).to_string()).collect()
    }

    fn day_before() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_window_has_eighteen_slots() {
        let window = WorkWindow::default();
        let slots = available_slots(date(), &window, &[], day_before());
        assert_eq!(slots.len(), 18);
        assert_eq!(labels(&slots).first().map(String::as_str), Some("09:00"));
        assert_eq!(labels(&slots).last().map(String::as_str), Some("17:30"));
    }

    #[test]
    fn test_booked_slot_excluded() {
        let window = WorkWindow::default();
        let booked = [TimeRange::new(at(10, 0), at(10, 30)).unwrap()];
        let slots = labels(&available_slots(date(), &window, &booked, day_before()));

        assert_eq!(slots.len(), 17);
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(slots.contains(&"09:30".to_string()));
        assert!(slots.contains(&"10:30".to_string()));
    }

    #[test]
    fn test_partial_overlap_blocks_both_slots() {
        let window = WorkWindow::default();
        let booked = [TimeRange::new(at(10, 15), at(10, 45)).unwrap()];
        let slots = labels(&available_slots(date(), &window, &booked, day_before()));

        assert!(!slots.contains(&"10:00".to_string()));
        assert!(!slots.contains(&"10:30".to_string()));
        assert_eq!(slots.len(), 16);
    }

    #[test]
    fn test_today_only_future_slots() {
        let window = WorkWindow::default();
        // Exactly on a slot boundary: that slot is not strictly in the future
        let slots = labels(&available_slots(date(), &window, &[], at(12, 0)));
        assert_eq!(slots.first().map(String::as_str), Some("12:30"));

        let slots = labels(&available_slots(date(), &window, &[], at(12, 10)));
        assert_eq!(slots.first().map(String::as_str), Some("12:30"));
    }

    #[test]
    fn test_past_day_is_not_filtered_by_clock() {
        let window = WorkWindow::default();
        let next_week = Utc.with_ymd_and_hms(2024, 1, 17, 8, 0, 0).unwrap();
        assert_eq!(available_slots(date(), &window, &[], next_week).len(), 18);
    }

    #[test]
    fn test_uneven_window_drops_trailing_remainder() {
        let window = WorkWindow::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 45, 0).unwrap(),
            30,
        )
        .unwrap();
        let slots = labels(&available_slots(date(), &window, &[], day_before()));
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_invalid_window() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(WorkWindow::new(nine, nine, 30).is_err());
        assert!(WorkWindow::new(nine, NaiveTime::from_hms_opt(10, 0, 0).unwrap(), 0).is_err());
    }

    #[test]
    fn test_last_representable_day_still_has_candidates() {
        let slots = WorkWindow::default().candidates(NaiveDate::MAX);
        assert_eq!(slots.len(), 18);
    }

    fn booked_strategy() -> impl Strategy<Value = Vec<TimeRange>> {
        prop::collection::vec((0i64..1_440, 1i64..180), 0..6).prop_map(|ranges| {
            ranges
                .into_iter()
                .map(|(offset, len)| {
                    let start = at(0, 0) + TimeDelta::minutes(offset);
                    TimeRange::starting_at(start, len).unwrap()
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_offered_slots_avoid_bookings_and_past(
            booked in booked_strategy(),
            now_offset in 0i64..1_440,
        ) {
            let window = WorkWindow::default();
            let now = at(0, 0) + TimeDelta::minutes(now_offset);
            let step = TimeDelta::minutes(i64::from(window.slot_minutes()));

            let slots = available_slots(date(), &window, &booked, now);
            for start in &slots {
                let slot = TimeRange::from_stored(*start, *start + step);
                prop_assert!(booked.iter().all(|b| !b.overlaps(&slot)));
                prop_assert!(*start > now);
            }
            prop_assert!(slots.windows(2).all(|pair| pair[0] + step <= pair[1]));
        }

        #[test]
        fn prop_other_days_ignore_the_clock(
            booked in booked_strategy(),
            now_offset in 0i64..1_440,
        ) {
            let window = WorkWindow::default();
            let yesterday = at(0, 0) - TimeDelta::days(1) + TimeDelta::minutes(now_offset);

            let free = available_slots(date(), &window, &booked, yesterday);
            let candidates = window.candidates(date());
            let expected = candidates
                .iter()
                .filter(|slot| booked.iter().all(|b| !b.overlaps(slot)))
                .count();
            prop_assert_eq!(free.len(), expected);
        }
    }
}
