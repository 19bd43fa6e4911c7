use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    gamification,
    model::{
        entity::{Achievement, UserPoints},
        gamify::AwardOutcome,
    },
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PointsResponse {
    pub user_id: Uuid,
    pub points: i64,
    pub level: i32,
    pub points_to_next_level: i64,
    pub updated_at: DateTime<Utc>,
}

impl PointsResponse {
    pub fn new(points: &UserPoints, points_per_level: i64) -> Self {
        Self {
            user_id: points.user_id(),
            points: points.points(),
            level: gamification::level_for_points(points.points(), points_per_level),
            points_to_next_level: gamification::points_to_next_level(
                points.points(),
                points_per_level,
            ),
            updated_at: *points.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AwardPointsRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AwardPointsResponse {
    #[serde(flatten)]
    pub points: PointsResponse,
    pub leveled_up: bool,
    pub unlocked: Vec<Achievement>,
}

impl AwardPointsResponse {
    pub fn new(outcome: AwardOutcome, points_per_level: i64) -> Self {
        Self {
            points: PointsResponse::new(&outcome.points, points_per_level),
            leveled_up: outcome.leveled_up(),
            unlocked: outcome.unlocked,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_follows_configured_rules() {
        let row: UserPoints = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::new_v4(),
            "points": 250,
            "level": 3,
            "updated_at": "2025-01-01T00:00:00Z",
        }))
        .unwrap();

        let res = PointsResponse::new(&row, 100);
        assert_eq!(res.level, 3);
        assert_eq!(res.points_to_next_level, 50);

        // stored level is stale after a rules change, the response is not
        let res = PointsResponse::new(&row, 50);
        assert_eq!(res.level, 6);
        assert_eq!(res.points_to_next_level, 50);
    }
}
