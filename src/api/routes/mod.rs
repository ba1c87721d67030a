pub mod blackcard;
pub mod businesses;
pub mod content;
pub mod copilot;
pub mod health;
pub mod intent_signals;
pub mod outreach;
pub mod scan;
pub mod settings;
pub mod team;

use crate::errors::BlackCardError;

pub type ApiResult<T> = Result<T, BlackCardError>;
