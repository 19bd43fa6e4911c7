use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Points,
    Streak,
    Lessons,
    Exercises,
}

impl AchievementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Streak => "streak",
            Self::Lessons => "lessons",
            Self::Exercises => "exercises",
        }
    }
}

impl TryFrom<&str> for AchievementKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "points" => Ok(Self::Points),
            "streak" => Ok(Self::Streak),
            "lessons" => Ok(Self::Lessons),
            "exercises" => Ok(Self::Exercises),
            other => Err(format!("unknown achievement kind `{other}`")),
        }
    }
}

impl TryFrom<String> for AchievementKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl std::fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the counters achievements are measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub points: i64,
    pub longest_streak: i64,
    pub lessons_completed: i64,
    pub exercises_completed: i64,
}

impl ProgressStats {
    pub fn value_for(&self, kind: AchievementKind) -> i64 {
        match kind {
            AchievementKind::Points => self.points,
            // longest, so a later reset never takes an earned badge away
            AchievementKind::Streak => self.longest_streak,
            AchievementKind::Lessons => self.lessons_completed,
            AchievementKind::Exercises => self.exercises_completed,
        }
    }
}

pub fn is_earned(kind: AchievementKind, threshold: i64, stats: &ProgressStats) -> bool {
    stats.value_for(kind) >= threshold
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AchievementKind::try_from("streak"), Ok(AchievementKind::Streak));
        assert_eq!(AchievementKind::Lessons.to_string(), "lessons");
        assert!(AchievementKind::try_from("karma").is_err());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let stats = ProgressStats {
            points: 100,
            ..Default::default()
        };
        assert!(is_earned(AchievementKind::Points, 100, &stats));
        assert!(!is_earned(AchievementKind::Points, 101, &stats));
    }

    #[test]
    fn test_each_kind_reads_its_counter() {
        let stats = ProgressStats {
            points: 5,
            longest_streak: 7,
            lessons_completed: 2,
            exercises_completed: 0,
        };
        assert!(is_earned(AchievementKind::Streak, 7, &stats));
        assert!(is_earned(AchievementKind::Lessons, 1, &stats));
        assert!(!is_earned(AchievementKind::Exercises, 1, &stats));
        assert!(!is_earned(AchievementKind::Points, 10, &stats));
    }
}
