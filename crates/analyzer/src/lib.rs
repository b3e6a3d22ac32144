// Domain-driven module structure for the log analyzer.

// Core infrastructure
pub mod filter;
pub mod parser;
pub mod state;

// Domain modules
pub mod advisory;
pub mod analysis;
pub mod conf;
pub mod reputation;
pub mod runtime;
