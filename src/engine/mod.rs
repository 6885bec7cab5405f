//! Engine module for the command-line surface

pub mod arg_parser;
pub mod cli;

pub use arg_parser::Cli;
pub use cli::handle_run;
