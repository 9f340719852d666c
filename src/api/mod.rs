//! Invocation adapter between Lambda proxy events and the application

pub mod adapter;
pub mod event;
pub mod handler;
pub mod response;

// Re-export the main entry points for convenience
pub use adapter::{adapt, is_warmup_event};
pub use handler::handler;
