/// Level reached with `points`. Every `points_per_level` points add one level,
/// starting at level 1.
pub fn level_for_points(points: i64, points_per_level: i64) -> i32 {
    let per_level = points_per_level.max(1);
    let level = points.max(0) / per_level + 1;
    i32::try_from(level).unwrap_or(i32::MAX)
}

/// Points still missing until the next level.
pub fn points_to_next_level(points: i64, points_per_level: i64) -> i64 {
    let per_level = points_per_level.max(1);
    per_level - points.max(0) % per_level
}
