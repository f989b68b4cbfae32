//! Binary subcommand tests
//!
//! Runs the built `dashcast` binary for `config`, `serve` and `watch`.

pub mod command_tests;
