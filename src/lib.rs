//! Estate - command-line real-estate property manager
//!
//! This library exports the core modules for testing and potential reuse.

pub mod logging;
pub mod manager;
pub mod models;
pub mod storage;
pub mod ui;
