//! Configuration loader and schema types.
//!
//! This module exposes the settings that locate the music library, name the
//! curated collections and configure the command shell, plus helpers to load
//! them from disk and the environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
