//! CLI command handlers.

mod completions;
mod maps;
mod run;

pub use completions::run_completions;
pub use maps::run_maps;
pub use run::run_pipeline;
