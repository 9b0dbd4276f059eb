//! Library side of the `tabula` command: argument types, rendering, and
//! logging setup.

pub mod commands;
pub mod logging;
pub mod query;
pub mod render;
