pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod store;
pub mod substitution;
pub mod ui;

pub use error::{PepbumpError, Result};
