pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod llm;
pub mod reports;
pub mod scan;
pub mod server;

pub use error::{Error, Result};
