//! CLI subcommands

pub mod attach;
pub mod config;
pub mod images;
pub mod list;
pub mod markers;
pub mod record;
pub mod watch;
