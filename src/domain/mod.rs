//! Domain layer: descriptors, schema and selection, lifecycle states and errors.

pub mod descriptor;
pub mod entities;
pub mod errors;
pub mod session_state;
