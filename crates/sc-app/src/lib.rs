// stridecast server: CLI, config hot reload, inference pool, TCP sessions and offline replay.

pub mod cli;
pub mod detector;
pub mod hotreload;
pub mod replay;
pub mod server;
pub mod worker;
