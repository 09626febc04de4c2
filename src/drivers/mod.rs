//! Hardware initialisation and raw peripheral helpers.

pub mod hw_init;
