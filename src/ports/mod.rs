//! Ports: the contracts the application layer depends on.

pub mod backend_gateway;
