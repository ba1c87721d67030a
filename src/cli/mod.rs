pub mod commands;
pub mod preview;
pub mod serve;
pub mod validate;

pub use commands::{Cli, Commands};

use std::path::Path;
use crate::config::{parse_config, BlackCardConfig};
use crate::errors::BlackCardError;

/// Load the config file when one was given, defaults otherwise.
pub(crate) async fn load_config(path: Option<&str>) -> Result<BlackCardConfig, BlackCardError> {
    match path {
        Some(p) => parse_config(Path::new(p)).await,
        None => Ok(BlackCardConfig::default()),
    }
}
