//! HTTP API for PetCare scheduling.
//!
//! JSON over HTTP with bearer-token authentication. Handlers translate
//! requests into [`petcare_core::Scheduler`] calls and map workflow errors
//! onto status codes.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use router::{api_router, build_router};
pub use types::{ApiContext, AuthContext};
