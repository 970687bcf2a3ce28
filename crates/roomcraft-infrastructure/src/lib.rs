pub mod config_service;
pub mod in_memory_session_repository;
pub mod logging;
pub mod openai_dimension_estimator;
pub mod paths;
pub mod product_feed;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_session_repository::InMemorySessionRepository;
pub use crate::logging::init_tracing;
pub use crate::openai_dimension_estimator::OpenAiDimensionEstimator;
pub use crate::paths::RoomcraftPaths;
