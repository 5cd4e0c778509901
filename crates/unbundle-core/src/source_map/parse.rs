//! Reading the `sources` / `sourcesContent` / `sourceRoot` fields of a map.

use serde_json::Value;

use crate::paths::posix_join;

/// The subset of a source map needed to rebuild original files.
///
/// `sources[i]` and `sources_content[i]` are paired by position; a missing,
/// `null` or empty content means that source cannot be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSourceMap {
    pub sources: Vec<SourceSlot>,
    pub sources_content: Vec<Option<String>>,
    pub source_root: Option<String>,
}

/// One entry of `sources`. Non-string, non-null entries are `Unusable` and
/// never written; they keep their slot so positions stay aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSlot {
    Path(String),
    Null,
    Unusable,
}

/// A source that can be written: non-empty content plus its logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSource<'a> {
    pub index: usize,
    /// `sourceRoot` joined with the source (posix-style), before sanitizing.
    pub logical_path: String,
    pub content: &'a str,
}

fn string_list(value: Option<&Value>) -> Vec<Option<String>> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses map JSON. Only malformed JSON is an error; missing or mistyped
/// fields just mean there is nothing to materialize.
pub fn parse_source_map(text: &str) -> Result<ParsedSourceMap, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(obj) = value else {
        return Ok(ParsedSourceMap::default());
    };

    let sources = match obj.get("sources") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => SourceSlot::Path(s.clone()),
                Value::Null => SourceSlot::Null,
                _ => SourceSlot::Unusable,
            })
            .collect(),
        _ => Vec::new(),
    };
    let source_root = obj
        .get("sourceRoot")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ParsedSourceMap {
        sources,
        sources_content: string_list(obj.get("sourcesContent")),
        source_root,
    })
}

impl ParsedSourceMap {
    /// Sources that have non-empty embedded content, in `sources` order.
    pub fn embedded_sources(&self) -> impl Iterator<Item = EmbeddedSource<'_>> + '_ {
        self.sources.iter().enumerate().filter_map(move |(i, slot)| {
            let content = self.sources_content.get(i)?.as_deref()?;
            if content.is_empty() {
                return None;
            }
            let raw = match slot {
                SourceSlot::Path(p) => p.clone(),
                SourceSlot::Null => format!("source_{}.txt", i),
                SourceSlot::Unusable => return None,
            };
            let logical_path = match &self.source_root {
                Some(root) => posix_join(root, &raw),
                None => raw,
            };
            Some(EmbeddedSource {
                index: i,
                logical_path,
                content,
            })
        })
    }
}
