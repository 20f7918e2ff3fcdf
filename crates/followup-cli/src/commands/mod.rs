pub mod auth;
pub mod config;
pub mod folders;
pub mod plan;
pub mod scan;
pub mod stats;
pub mod watch;
