// Wallet challenge console - shared library
pub mod config;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod form;
pub mod logger;
pub mod sdk;
pub mod session;
pub mod settings;
pub mod storage;
