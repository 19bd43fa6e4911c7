pub mod achievements;
pub mod lessons;
pub mod points;
pub mod progress;
pub mod streaks;
