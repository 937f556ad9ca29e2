pub mod dashboard;
pub mod leaderboard_table;
pub mod menu;
pub mod progress_bar;
pub mod quiz_card;
pub mod session_sidebar;
