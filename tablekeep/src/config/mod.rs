//! Configuration system for tablekeep.
//!
//! Sources, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`TABLEKEEP_*`)
//! 3. Private project config (`tablekeep.local.yaml`)
//! 4. Project config (`tablekeep.yaml`)
//! 5. User config (`~/.tablekeep/config.yaml`)
//! 6. Built-in defaults
//!
//! The merged [`Config`] is resolved into a [`ReservationPolicy`] before the
//! lifecycle manager or scheduler see it.
//!
//! # Examples
//!
//! ```no_run
//! use tablekeep::config::{ConfigBuilder, ReservationPolicy};
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/restaurant"))
//!     .build()
//!     .unwrap();
//! let policy = ReservationPolicy::from_config(&config).unwrap();
//! println!("pending reservations expire after {}", policy.pending_grace);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod policy;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use policy::ReservationPolicy;
pub use schema::{
    Config, NotificationSettings, OutputFormat, ReservationSettings, SchedulerSettings,
};
pub use validator::ConfigValidator;
