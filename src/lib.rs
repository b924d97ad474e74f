pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_provider, ProviderKind};
pub use app::{build_router, AppState};
pub use config::{RelayConfig, TomlConfig};
pub use core::ExcuseEngine;
pub use utils::error::{RelayError, Result};
