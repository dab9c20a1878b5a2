#[cfg(feature = "cli")]
pub mod cli;
pub mod federation;

pub use self::federation::{FederationConfig, FederationInfo, SourceConfig};
