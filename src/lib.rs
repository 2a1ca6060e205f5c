pub mod channel;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod message;
pub mod pipeline;
pub mod qr;
pub mod renderer;
