//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//!     → config_for(name) → GuardRegistry::register
//! ```
//!
//! # Design Decisions
//! - A guard's config is fixed at first registration; re-registering keeps it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{GuardConfig, RegistryConfig};
pub use validation::ValidationError;
