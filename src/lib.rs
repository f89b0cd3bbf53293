pub mod cli;
pub mod config;
pub mod contract;
pub mod duration;
pub mod error;
pub mod load_config;
pub mod metadata;
pub mod project;
pub mod publish;
pub mod resolve;
pub mod rewrite;
pub mod scan;
pub mod upload;

pub use cli::{run, Cli, Commands};
