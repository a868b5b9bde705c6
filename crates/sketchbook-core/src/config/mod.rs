//! Sketchbook configuration layer
//!
//! All environment reads live here; the rest of the workspace goes through the
//! structured configs instead of calling `std::env::var` directly.
//!
//! - `loader`: env_or, env_optional, env_bool, `.env` loading
//! - `schema`: SketchbookConfig, ObservabilityConfig
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv, load_dotenv_from_dir};
pub use schema::{ObservabilityConfig, SketchbookConfig};
