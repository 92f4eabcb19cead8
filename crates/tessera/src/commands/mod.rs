//! CLI subcommands.

pub mod build;
pub mod init;
pub mod pull;
