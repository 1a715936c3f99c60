pub mod app;
pub mod parse;
pub mod progress;
