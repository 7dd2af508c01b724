//! journeypack - journey and brand aware build configuration
//!
//! Composes one bundler configuration per (environment, journey, brand)
//! from a `journeypack.toml` settings file, and dispatches CLI verbs
//! (serve, build, lint, test, report) to the external tools that do the work.

pub mod brands;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod paths;
pub mod pipeline;
pub mod plugins;
pub mod rules;
pub mod security;
pub mod version;

pub use brands::{resolve_all, resolve_brands};
pub use config::{ConfigError, ProjectSettings};
pub use dispatch::{DispatchError, DispatchReport, DispatchState, Dispatcher, ShellRunner, TaskRunner};
pub use environment::Environment;
pub use pipeline::{compose_build_config, BuildConfiguration, ComposeError};
pub use security::{SecurityError, SecuritySettings};
pub use version::{write_version_file, VersionError, VersionStamp, VersionTarget};
