//! Dashboard Import Gateway Kernel Library
//!
//! This library exposes the router, state, and collaborator traits for
//! integration testing. The main entry point for running the server is the
//! `dashimport` binary.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
