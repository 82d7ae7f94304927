//! Library crate for scorecast-back, exposing modules for binaries and integration tests.

pub mod config;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod sync;
