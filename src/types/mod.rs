//! Core type definitions.

mod port;

pub use port::{Port, PortError, PortRange};
