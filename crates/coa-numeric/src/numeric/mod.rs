//! Core numeric modules.

pub mod classify;
pub mod dilution;
pub mod format;
pub mod parse;
