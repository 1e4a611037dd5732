//! Data contract shared between the indicator engine and whatever renders
//! its output.

pub mod models;
pub mod utils;
