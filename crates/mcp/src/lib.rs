pub mod cli;
pub mod framing;
pub mod logging;
pub mod server;
pub mod tools;
pub mod transport;
pub mod watchdog;

pub use server::{serve, McpServer, ServerOptions, SessionState};
