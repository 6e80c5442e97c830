pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use app::{ConversionJob, JobReport};
pub use config::JobConfig;
pub use domain::model::{DataUrlInfo, EmailParts, Output, Payload};
pub use engine::{execute, Request};
pub use utils::error::{ConvertError, Result};
