//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod html_statement_adapter;
pub mod pine_script;
