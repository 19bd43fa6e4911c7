//! Transactional gamification flows.
//!
//! Each public flow runs one transaction. Counter rows are locked with
//! `FOR UPDATE` (points before streak, always) so concurrent requests for the
//! same user serialize instead of losing updates.

use chrono::NaiveDate;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::config::Gamification;
use crate::gamification::{self, ProgressStats, StreakChange};
use crate::model::entity::{
    Achievement, ContentRef, UserAchievement, UserPoints, UserProgress, UserProgressCreate,
    UserStreak,
};
use crate::model::{DatabaseResult, ModelManager};

#[derive(Debug)]
pub struct AwardOutcome {
    pub points: UserPoints,
    pub previous_level: i32,
    pub unlocked: Vec<Achievement>,
}

impl AwardOutcome {
    pub fn leveled_up(&self) -> bool {
        self.points.level() > self.previous_level
    }
}

#[derive(Debug)]
pub struct ActivityOutcome {
    pub streak: UserStreak,
    pub change: StreakChange,
    pub unlocked: Vec<Achievement>,
}

#[derive(Debug)]
pub struct CompletionOutcome {
    /// `None` when the content had been completed already.
    pub progress: Option<UserProgress>,
    pub points: UserPoints,
    pub previous_level: i32,
    pub streak: UserStreak,
    pub streak_change: StreakChange,
    pub unlocked: Vec<Achievement>,
}

#[tracing::instrument(skip(mm, rules))]
pub async fn award_points(
    mm: &ModelManager,
    user_id: Uuid,
    amount: i64,
    rules: &Gamification,
) -> DatabaseResult<AwardOutcome> {
    let mut tx = mm.begin().await?;

    let (points, previous_level) = add_points_in(&mut tx, user_id, amount, rules).await?;
    let unlocked = unlock_earned_in(&mut tx, user_id).await?;

    tx.commit().await?;
    Ok(AwardOutcome {
        points,
        previous_level,
        unlocked,
    })
}

#[tracing::instrument(skip(mm))]
pub async fn record_activity(
    mm: &ModelManager,
    user_id: Uuid,
    today: NaiveDate,
) -> DatabaseResult<ActivityOutcome> {
    let mut tx = mm.begin().await?;

    let (streak, change) = advance_streak_in(&mut tx, user_id, today).await?;
    let unlocked = unlock_earned_in(&mut tx, user_id).await?;

    tx.commit().await?;
    Ok(ActivityOutcome {
        streak,
        change,
        unlocked,
    })
}

/// Marks content as completed. Points are paid once per piece of content,
/// the activity always counts towards the streak.
#[tracing::instrument(skip(mm, rules))]
pub async fn complete_content(
    mm: &ModelManager,
    user_id: Uuid,
    content: ContentRef,
    reward: i32,
    rules: &Gamification,
    today: NaiveDate,
) -> DatabaseResult<CompletionOutcome> {
    let mut tx = mm.begin().await?;

    let create = UserProgressCreate::new(user_id, content, reward);
    let progress = UserProgress::insert_if_absent_in(&mut tx, &create).await?;

    let amount = if progress.is_some() { i64::from(reward) } else { 0 };
    let (points, previous_level) = add_points_in(&mut tx, user_id, amount, rules).await?;
    let (streak, streak_change) = advance_streak_in(&mut tx, user_id, today).await?;
    let unlocked = unlock_earned_in(&mut tx, user_id).await?;

    tx.commit().await?;
    Ok(CompletionOutcome {
        progress,
        points,
        previous_level,
        streak,
        streak_change,
        unlocked,
    })
}

#[tracing::instrument(skip(mm))]
pub async fn unlock_earned(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Achievement>> {
    let mut tx = mm.begin().await?;
    let unlocked = unlock_earned_in(&mut tx, user_id).await?;
    tx.commit().await?;
    Ok(unlocked)
}

async fn add_points_in(
    conn: &mut PgConnection,
    user_id: Uuid,
    amount: i64,
    rules: &Gamification,
) -> DatabaseResult<(UserPoints, i32)> {
    let current = UserPoints::lock_in(conn, user_id).await?;
    if amount == 0 {
        let level = current.level();
        return Ok((current, level));
    }

    let total = current.points().saturating_add(amount).max(0);
    let level = gamification::level_for_points(total, rules.points_per_level());
    let updated = UserPoints::store_in(conn, user_id, total, level).await?;

    if level > current.level() {
        tracing::info!(%user_id, level, "user reached a new level");
    }
    Ok((updated, current.level()))
}

async fn advance_streak_in(
    conn: &mut PgConnection,
    user_id: Uuid,
    today: NaiveDate,
) -> DatabaseResult<(UserStreak, StreakChange)> {
    let current = UserStreak::lock_in(conn, user_id).await?;
    let (next, change) = current.as_streak().record(today);

    if change == StreakChange::Unchanged {
        return Ok((current, change));
    }

    let updated = UserStreak::store_in(conn, user_id, &next).await?;
    tracing::info!(%user_id, current = next.current, ?change, "streak updated");
    Ok((updated, change))
}

async fn stats_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<ProgressStats> {
    let points = UserPoints::points_in(conn, user_id).await?;
    let longest_streak = UserStreak::longest_in(conn, user_id).await?;
    let (lessons_completed, exercises_completed) =
        UserProgress::count_completed_in(conn, user_id).await?;

    Ok(ProgressStats {
        points,
        longest_streak,
        lessons_completed,
        exercises_completed,
    })
}

async fn unlock_earned_in(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> DatabaseResult<Vec<Achievement>> {
    let stats = stats_in(conn, user_id).await?;
    let candidates = Achievement::locked_for_in(conn, user_id).await?;

    let mut unlocked = Vec::new();
    for achievement in candidates {
        if !gamification::is_earned(achievement.kind(), achievement.threshold(), &stats) {
            continue;
        }

        if UserAchievement::unlock_in(conn, user_id, achievement.id())
            .await?
            .is_some()
        {
            tracing::info!(%user_id, code = achievement.code(), "achievement unlocked");
            unlocked.push(achievement);
        }
    }

    Ok(unlocked)
}
