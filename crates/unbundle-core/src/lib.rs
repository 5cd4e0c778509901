pub mod config;
pub mod logging;

pub mod collect;
pub mod dist;
pub mod fetch;
pub mod format;
pub mod paths;
pub mod pipeline;
pub mod source_map;
