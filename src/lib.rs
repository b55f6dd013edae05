pub mod cache;
pub mod checker;
pub mod commands;
pub mod github;
pub mod http;
pub mod log_sink;
pub mod markdown;
pub mod release;
pub mod runtime;
pub mod state;
pub mod status;
pub mod version;

pub use checker::{CheckerConfig, UpdateChecker};
pub use status::{CheckOutcome, UpdateStatus};
