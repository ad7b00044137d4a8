pub mod config;
pub mod leaderboard;
pub mod report;
pub mod select;
pub mod status;
pub mod streak;
pub mod study;
pub mod task;
pub mod tick;
pub mod timer;
pub mod user;
