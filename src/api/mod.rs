// API routes and handlers

pub mod analytics;
pub mod health;
pub mod plans;
pub mod routes;
pub mod sets;
