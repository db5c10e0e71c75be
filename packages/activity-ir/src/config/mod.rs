//! Configuration System
//!
//! Two tiers:
//! - Preset: one-liner (`ActivityConfig::preset(Preset::Fast)`)
//! - Override: per-phase adjustment via closures or a versioned YAML file
//!
//! # Examples
//!
//! ```rust,ignore
//! use activity_ir::config::{ActivityConfig, ClosureStrategy, Preset};
//!
//! let config = ActivityConfig::preset(Preset::Balanced)
//!     .closure(|c| c.strategy(ClosureStrategy::Fixpoint));
//! config.validate()?;
//!
//! let config = ActivityConfig::from_yaml("activity.yaml")?;
//! ```

pub mod activity_config;
pub mod error;
pub mod preset;
pub mod stage_configs;

// Re-exports
pub use activity_config::{ActivityConfig, ConfigExportV1, ConfigOverrides};
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use stage_configs::{BuilderConfig, ClosureConfig, ClosureStrategy};
