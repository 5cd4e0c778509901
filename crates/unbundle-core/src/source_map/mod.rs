//! Source map handling: finding a bundle's map reference, fetching the map
//! (with a fallback URL), rewriting the reference, and reading the embedded
//! `sources` / `sourcesContent` lists.

mod locate;
mod parse;
mod rewrite;

pub use locate::{
    extract_map_reference, resolve_all, resolve_source_map, FallbackStrategy, ResolveOptions,
    ResolvedMaps, MAP_REFERENCE_MARKER,
};
pub use parse::{parse_source_map, EmbeddedSource, ParsedSourceMap, SourceSlot};
pub use rewrite::rewrite_map_reference;
