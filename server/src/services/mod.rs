pub mod cache;
pub mod composer;
pub mod matches;
pub mod player;
pub mod resolver;
pub mod telemetry;
