//! Infrastructure adapters implementing the ports.

pub mod http;
