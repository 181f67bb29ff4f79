pub mod clue;
pub mod dashboard;
pub mod health;
