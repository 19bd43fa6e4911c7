use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-day activity counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streak {
    pub current: i32,
    pub longest: i32,
    pub last_activity: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First recorded activity.
    Started,
    /// Activity on the day right after the last one.
    Extended,
    /// Activity already recorded today.
    Unchanged,
    /// A day (or more) was missed.
    Reset,
}

impl Streak {
    pub fn new(current: i32, longest: i32, last_activity: Option<NaiveDate>) -> Self {
        Self {
            current,
            longest,
            last_activity,
        }
    }

    /// Applies an activity on `today`.
    pub fn record(self, today: NaiveDate) -> (Self, StreakChange) {
        let (current, change) = match self.last_activity {
            None => (1, StreakChange::Started),
            Some(last) => match (today - last).num_days() {
                0 => (self.current.max(1), StreakChange::Unchanged),
                1 => (self.current.saturating_add(1), StreakChange::Extended),
                _ => (1, StreakChange::Reset),
            },
        };

        let next = Self {
            current,
            longest: self.longest.max(current),
            last_activity: Some(today),
        };
        (next, change)
    }

    /// The streak survives as long as the user was active today or yesterday.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        match self.last_activity {
            Some(last) => matches!((today - last).num_days(), 0 | 1),
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let (streak, change) = Streak::default().record(day(1));
        assert_eq!(change, StreakChange::Started);
        assert_eq!(streak, Streak::new(1, 1, Some(day(1))));
    }

    #[test]
    fn test_next_day_extends() {
        let (streak, change) = Streak::new(4, 4, Some(day(4))).record(day(5));
        assert_eq!(change, StreakChange::Extended);
        assert_eq!(streak.current, 5);
        assert_eq!(streak.longest, 5);
    }

    #[test]
    fn test_same_day_keeps_streak() {
        let (streak, change) = Streak::new(4, 6, Some(day(5))).record(day(5));
        assert_eq!(change, StreakChange::Unchanged);
        assert_eq!(streak, Streak::new(4, 6, Some(day(5))));
    }

    #[test]
    fn test_gap_resets_but_keeps_longest() {
        let (streak, change) = Streak::new(9, 9, Some(day(1))).record(day(3));
        assert_eq!(change, StreakChange::Reset);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 9);
        assert_eq!(streak.last_activity, Some(day(3)));
    }

    #[test]
    fn test_future_last_activity_resets() {
        let (streak, change) = Streak::new(3, 3, Some(day(10))).record(day(8));
        assert_eq!(change, StreakChange::Reset);
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn test_is_active() {
        let streak = Streak::new(2, 2, Some(day(10)));
        assert!(streak.is_active(day(10)));
        assert!(streak.is_active(day(11)));
        assert!(!streak.is_active(day(12)));
        assert!(!Streak::default().is_active(day(12)));
    }
}
