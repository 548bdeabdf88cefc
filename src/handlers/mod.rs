//! Command Handlers module
//!
//! Handlers that orchestrate the gateway, the client store and the
//! profile cache for each operation.

mod catalog_handler;
mod commands;
mod otp_handler;
mod tranche_handler;
mod user_handler;


pub use catalog_handler::CatalogHandler;
pub use commands::*;
pub use otp_handler::{ConfirmOtpHandler, SendOtpHandler};
pub use tranche_handler::CreateTrancheHandler;
pub use user_handler::LookupUserHandler;
