//! # TapNex CLI
//!
//! Library half of the `tapnex` binary, split out so the commands can be
//! tested.

pub mod commands;
pub mod display;
pub mod interactive;
