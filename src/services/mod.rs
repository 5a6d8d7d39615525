// Business logic services

pub mod analytics_service;
pub mod plan_generation_service;
pub mod workout_log_service;

pub use analytics_service::AnalyticsService;
pub use plan_generation_service::PlanGenerationService;
pub use workout_log_service::WorkoutLogService;
