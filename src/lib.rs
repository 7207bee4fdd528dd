pub mod client;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod interview;
pub mod logging;
pub mod phase;
pub mod questions;
pub mod server;
pub mod session;
pub mod ui;
