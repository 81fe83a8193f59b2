pub mod auth;
pub mod cli;
pub mod github;

pub use cli::{run, Cli, Commands};
