use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::class::ClassDefinition;

/// A concrete calendar-dated meeting of a class. Derived, never
/// persisted on its own.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionOccurrence {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub session_number: u32,
}

/// Walks every day from `start_date` to `end_date` inclusive and emits
/// one occurrence per day matching a slot, numbered 1..n. Inverted
/// ranges and empty slot sets yield an empty sequence.
pub fn expand_schedule(class: &ClassDefinition) -> Vec<SessionOccurrence> {
    let mut occurrences = Vec::new();
    if class.slots.is_empty() {
        return occurrences;
    }

    let mut date = class.start_date;
    while date <= class.end_date {
        if let Some(slot) = class.slot_for(date) {
            occurrences.push(SessionOccurrence {
                date,
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                session_number: occurrences.len() as u32 + 1,
            });
        }
        date += Duration::days(1);
    }

    occurrences
}

/// 1-based rank of `target` among the class's occurrences, counted with
/// the same predicate as [`expand_schedule`] so both always agree. A
/// non-matching target does not increment the count.
pub fn session_number_for(class: &ClassDefinition, target: NaiveDate) -> u32 {
    let mut count = 0;
    let mut date = class.start_date;
    while date <= target && date <= class.end_date {
        if class.slot_for(date).is_some() {
            count += 1;
        }
        date += Duration::days(1);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::RecurringSlot;
    use bson::oid::ObjectId;

    fn class(start: (i32, u32, u32), end: (i32, u32, u32), slots: Vec<RecurringSlot>) -> ClassDefinition {
        ClassDefinition::new(
            "Yoga".to_string(),
            String::new(),
            10,
            ObjectId::new(),
            "Anna".to_string(),
            ObjectId::new(),
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            slots,
            0,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_wednesday_expansion() {
        // Mon/Wed class from Monday 2024-01-01 to Monday 2024-01-15.
        let class = class(
            (2024, 1, 1),
            (2024, 1, 15),
            vec![
                RecurringSlot::new(1, "18:00", "19:00"),
                RecurringSlot::new(3, "18:00", "19:00"),
            ],
        );

        let occurrences = expand_schedule(&class);
        let expected = [
            (date(2024, 1, 1), 1),
            (date(2024, 1, 3), 2),
            (date(2024, 1, 8), 3),
            (date(2024, 1, 10), 4),
            (date(2024, 1, 15), 5),
        ];

        assert_eq!(occurrences.len(), expected.len());
        for (occurrence, (day, number)) in occurrences.iter().zip(expected) {
            assert_eq!(occurrence.date, day);
            assert_eq!(occurrence.session_number, number);
            assert_eq!(occurrence.start_time, "18:00");
        }
    }

    #[test]
    fn test_expansion_and_numbering_agree() {
        let class = class(
            (2024, 1, 1),
            (2024, 3, 31),
            vec![
                RecurringSlot::new(2, "07:00", "08:00"),
                RecurringSlot::new(5, "19:00", "20:30"),
            ],
        );

        for occurrence in expand_schedule(&class) {
            assert_eq!(
                session_number_for(&class, occurrence.date),
                occurrence.session_number
            );
        }
    }

    #[test]
    fn test_numbering_constant_between_sessions() {
        let class = class((2024, 1, 1), (2024, 1, 15), vec![RecurringSlot::new(1, "18:00", "19:00")]);

        // Tue/Wed/Sun after the first Monday still count one session.
        assert_eq!(session_number_for(&class, date(2024, 1, 1)), 1);
        assert_eq!(session_number_for(&class, date(2024, 1, 2)), 1);
        assert_eq!(session_number_for(&class, date(2024, 1, 7)), 1);
        assert_eq!(session_number_for(&class, date(2024, 1, 8)), 2);

        // Before the first session.
        let early = class.start_date - Duration::days(1);
        assert_eq!(session_number_for(&class, early), 0);
    }

    #[test]
    fn test_numbering_strictly_increasing() {
        let class = class(
            (2024, 1, 1),
            (2024, 2, 29),
            vec![
                RecurringSlot::new(1, "18:00", "19:00"),
                RecurringSlot::new(4, "18:00", "19:00"),
            ],
        );

        let mut previous = 0;
        for occurrence in expand_schedule(&class) {
            let number = session_number_for(&class, occurrence.date);
            assert!(number > previous);
            previous = number;
        }
    }

    #[test]
    fn test_first_slot_wins_on_shared_weekday() {
        let class = class(
            (2024, 1, 1),
            (2024, 1, 7),
            vec![
                RecurringSlot::new(1, "09:00", "10:00"),
                RecurringSlot::new(1, "18:00", "19:00"),
            ],
        );

        let occurrences = expand_schedule(&class);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].start_time, "09:00");
    }

    #[test]
    fn test_empty_slot_set() {
        let class = class((2024, 1, 1), (2024, 1, 31), vec![]);
        assert!(expand_schedule(&class).is_empty());
        assert_eq!(session_number_for(&class, date(2024, 1, 15)), 0);
    }

    #[test]
    fn test_inverted_range() {
        let class = class((2024, 2, 1), (2024, 1, 1), vec![RecurringSlot::new(1, "18:00", "19:00")]);
        assert!(expand_schedule(&class).is_empty());
    }

    #[test]
    fn test_single_day_range() {
        let class = class((2024, 1, 1), (2024, 1, 1), vec![RecurringSlot::new(1, "18:00", "19:00")]);
        let occurrences = expand_schedule(&class);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].session_number, 1);
    }
}
