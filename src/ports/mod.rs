//! Port traits at the seams between the domain and its adapters.

pub mod config_port;
pub mod script_port;
pub mod statement_port;
