//! Data models for ghlink.

mod connection;
mod link;

pub use connection::ConnectionStatus;
pub use link::{LinkEntry, LinkType, Registry};
