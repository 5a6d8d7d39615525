// The plan-generation core: pure, synchronous, no I/O.
//
// `load_model` is also the numeric contract reused by workout logging and
// dashboard analytics; keep it free of generator-specific assumptions.

pub mod fatigue;
pub mod load_model;
pub mod scheduler;
pub mod tables;
