//! Command-line front end of the row-parallel matrix product.

pub mod config;
pub mod error;
pub mod logging;
