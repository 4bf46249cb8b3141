//! Runpad CLI library.
//!
//! This crate provides the command-line interface and interactive REPL
//! for Runpad.

pub mod cli;
pub mod commands;
pub mod palette;
pub mod repl;
