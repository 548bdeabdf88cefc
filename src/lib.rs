//! orzu_gateway Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod gateway;
pub mod handlers;
pub mod session;
pub mod store;

pub use config::Config;
pub use domain::{DomainError, OperationContext, TrancheRequest, TrancheResult, TrancheSum};
pub use error::AppError;
