pub mod balances;
pub mod config;
pub mod connection;
pub mod dashboard;
pub mod error;
pub mod funding;
pub mod logs;
pub mod models;
pub mod session;
pub mod settings;
pub mod setup;
pub mod tasks;
pub mod wallets;

pub use dashboard::{Dashboard, Notice, NoticeLevel};
pub use error::{Result, TraderError};
