//! Resolve cosmetics and their ingredients against an ingredient database
//! site, and aggregate ingredient frequency across a skincare routine.

pub mod cli;
pub mod emit;
pub mod error;
pub mod identity;
pub mod model;
pub mod report;
pub mod resolve;
pub mod routine;
pub mod site;
pub mod text;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
