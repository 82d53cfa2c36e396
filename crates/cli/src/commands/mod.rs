//! CLI subcommands.

pub mod check;
pub mod migrate;
pub mod order;
