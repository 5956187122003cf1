pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod prompts;
pub mod rate_limit;
pub mod server;
