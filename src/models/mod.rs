// Data models shared across engine, services and API

pub mod exercise;
pub mod plan;
pub mod set_log;

pub use exercise::*;
pub use plan::*;
pub use set_log::*;
