//! Persistence, rendering and services for the Doruken invoice tool.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;
pub mod render;

#[cfg(test)]
mod test;
