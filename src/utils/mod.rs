pub mod config;
pub mod logger;
pub mod run_log;
pub(crate) mod stagerun_toml;

pub use config::*;
pub use logger::{Colors, setup_logging};
pub use run_log::{MessageSink, RunLog};
