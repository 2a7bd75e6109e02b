pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod sink;

mod error;

pub use error::{Error, Result};
