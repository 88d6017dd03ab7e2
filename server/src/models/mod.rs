pub mod match_document;
pub mod player;
pub mod summary;
pub mod telemetry;
