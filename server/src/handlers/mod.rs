pub mod matches;
pub mod player;
