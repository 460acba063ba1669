pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod fsutil;
pub mod vault;
