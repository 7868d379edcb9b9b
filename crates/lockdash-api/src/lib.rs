// lockdash-api: Async Rust client for the SmartCadenas lock backend

mod access;
mod alerts;
pub mod client;
mod code;
pub mod error;
mod logs;
pub mod models;
pub mod transport;

pub use client::LockClient;
pub use error::Error;
pub use models::{
    AccessReceipt, AccessReport, AlertRecord, AlertsPage, CodeBody, CodeRecord, LogRecord,
    LogsPage, NewAlert, Pagination,
};
pub use transport::{TlsMode, TransportConfig};
