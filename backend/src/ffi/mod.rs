//! Python bindings (cargo feature `pyo3`)

pub mod source;
pub mod types;
