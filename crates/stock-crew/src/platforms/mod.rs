//! Front-ends that feed user text to the crew

pub mod cli;
pub mod telegram;

pub use cli::run_repl;
pub use telegram::GREETING;
