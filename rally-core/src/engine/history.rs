//! Per-set point log and set clocks.
//!
//! `score_history` and `time_records` always hold one entry for every set
//! from 1 to `current_set`. Entries are looked up by set number, searching
//! from the back since the current set is almost always the last entry.

use rally_sdk::objects::{PointEvent, SetLog, Side, TimeRecord};
use time::OffsetDateTime;

use super::record::MatchRecord;

/// What [`start_set`] did to the clock of the current set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetClock {
    /// No clock existed for the set; a new one was opened.
    Opened,
    /// The clock was running; its start was refreshed.
    Restarted,
    /// The clock had been closed; it was reopened with a fresh start.
    Reopened,
}

fn log_mut(record: &mut MatchRecord, set: u32) -> &mut SetLog {
    let index = match record.score_history.iter().rposition(|l| l.set == set) {
        Some(index) => index,
        None => {
            record.score_history.push(SetLog::empty(set));
            record.score_history.len() - 1
        }
    };
    &mut record.score_history[index]
}

fn clock_mut(record: &mut MatchRecord, set: u32) -> Option<&mut TimeRecord> {
    record.time_records.iter_mut().rev().find(|t| t.set == set)
}

/// Append a point event for the current set, carrying the current scores.
pub fn record_point(record: &mut MatchRecord, scored_by: Side, now: OffsetDateTime) {
    let event = PointEvent {
        scored_by,
        score_a: record.score_a,
        score_b: record.score_b,
        timestamp: now,
    };
    let set = record.current_set;
    log_mut(record, set).log.push(event);
}

/// Remove the most recent event of the current set's log.
///
/// Popping an empty log is a no-op and returns `None`.
pub fn pop_point(record: &mut MatchRecord) -> Option<PointEvent> {
    let set = record.current_set;
    log_mut(record, set).log.pop()
}

/// Open the log and clock of `set`, started at `now`.
pub fn open_set(record: &mut MatchRecord, set: u32, now: OffsetDateTime) {
    log_mut(record, set);
    match clock_mut(record, set) {
        Some(clock) => {
            clock.start = now;
            clock.end = None;
        }
        None => record.time_records.push(TimeRecord {
            set,
            start: now,
            end: None,
        }),
    }
}

/// Stamp the end of `set`. Returns `false` if it was already closed or
/// has no clock.
pub fn close_set(record: &mut MatchRecord, set: u32, now: OffsetDateTime) -> bool {
    match clock_mut(record, set) {
        Some(clock) if clock.end.is_none() => {
            clock.end = Some(now);
            true
        }
        _ => false,
    }
}

/// (Re)start the clock of the current set.
pub fn start_set(record: &mut MatchRecord, now: OffsetDateTime) -> SetClock {
    let set = record.current_set;
    log_mut(record, set);
    match clock_mut(record, set) {
        Some(clock) => {
            let reopened = clock.end.take().is_some();
            clock.start = now;
            if reopened {
                SetClock::Reopened
            } else {
                SetClock::Restarted
            }
        }
        None => {
            record.time_records.push(TimeRecord {
                set,
                start: now,
                end: None,
            });
            SetClock::Opened
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn t(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs)
    }

    #[test]
    fn test_pop_on_empty_log_is_noop() {
        let mut record = MatchRecord::zero(t(0));
        assert_eq!(pop_point(&mut record), None);
        assert_eq!(record.score_history, vec![SetLog::empty(1)]);
    }

    #[test]
    fn test_record_and_pop_point() {
        let mut record = MatchRecord::zero(t(0));
        record.score_b = 1;
        record_point(&mut record, Side::B, t(5));

        let popped = pop_point(&mut record).unwrap();
        assert_eq!(popped.scored_by, Side::B);
        assert_eq!((popped.score_a, popped.score_b), (0, 1));
        assert_eq!(popped.timestamp, t(5));
        assert!(record.score_history[0].log.is_empty());
    }

    #[test]
    fn test_start_set_reopens_closed_clock() {
        let mut record = MatchRecord::zero(t(0));
        assert!(close_set(&mut record, 1, t(10)));
        assert!(!close_set(&mut record, 1, t(20)));
        assert_eq!(record.time_records[0].end, Some(t(10)));

        assert_eq!(start_set(&mut record, t(30)), SetClock::Reopened);
        assert_eq!(record.time_records[0].start, t(30));
        assert_eq!(record.time_records[0].end, None);

        assert_eq!(start_set(&mut record, t(40)), SetClock::Restarted);
        assert_eq!(record.time_records.len(), 1);
    }

    #[test]
    fn test_start_set_opens_missing_clock() {
        let mut record = MatchRecord::zero(t(0));
        record.time_records.clear();
        assert_eq!(start_set(&mut record, t(3)), SetClock::Opened);
        assert_eq!(
            record.time_records,
            vec![TimeRecord {
                set: 1,
                start: t(3),
                end: None
            }]
        );
    }
}
