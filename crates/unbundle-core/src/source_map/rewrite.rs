//! Rewriting a bundle's source map reference.

const LINE_MARKER: &str = "//#";
const BLOCK_MARKER: &str = "/*#";
const BLOCK_END: &str = "*/";
const KEYWORD: &str = "sourceMappingURL=";

/// True if `after_marker` (text following `//#` or `/*#`) is `\s*sourceMappingURL=`.
fn names_source_map(after_marker: &str) -> bool {
    after_marker.trim_start().starts_with(KEYWORD)
}

fn is_line_reference(line: &str) -> bool {
    line.trim_start()
        .strip_prefix(LINE_MARKER)
        .map_or(false, names_source_map)
}

fn opens_block_reference(line: &str) -> bool {
    line.trim_start()
        .strip_prefix(BLOCK_MARKER)
        .map_or(false, names_source_map)
}

/// Index of the line (at or after `start`) that closes a block reference: the
/// first `*/` after the opening `/*#` that is followed only by whitespace up to
/// the end of its line.
fn block_reference_end(lines: &[&str], start: usize) -> Option<usize> {
    let open = lines[start].find(BLOCK_MARKER)? + BLOCK_MARKER.len();
    for (i, line) in lines.iter().enumerate().skip(start) {
        let mut search = if i == start { open } else { 0 };
        while let Some(pos) = line[search..].find(BLOCK_END) {
            let after = search + pos + BLOCK_END.len();
            if line[after..].trim().is_empty() {
                return Some(i);
            }
            search = after;
        }
    }
    None
}

/// Drops every whole-line source map reference (`//# sourceMappingURL=...`
/// and `/*# sourceMappingURL=... */`, the latter possibly spanning lines),
/// trims trailing whitespace and appends a single
/// `//# sourceMappingURL=<map_file_name>` line.
///
/// Applying it twice with the same name gives the same text as applying it once.
pub fn rewrite_map_reference(bundle_text: &str, map_file_name: &str) -> String {
    let lines: Vec<&str> = bundle_text.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if is_line_reference(line) {
            i += 1;
            continue;
        }
        if opens_block_reference(line) {
            if let Some(end) = block_reference_end(&lines, i) {
                i = end + 1;
                continue;
            }
        }
        kept.push(line);
        i += 1;
    }

    let body = kept.join("\n");
    format!(
        "{}\n{} {}{}\n",
        body.trim_end(),
        LINE_MARKER,
        KEYWORD,
        map_file_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_line_reference() {
        let text = "var a = 1;\n//# sourceMappingURL=https://cdn/x.js.map\n";
        assert_eq!(
            rewrite_map_reference(text, "x.js.map"),
            "var a = 1;\n//# sourceMappingURL=x.js.map\n"
        );
    }

    #[test]
    fn replaces_block_reference() {
        let text = "a();\n/*# sourceMappingURL=old.map */\nb();\n";
        assert_eq!(
            rewrite_map_reference(text, "new.map"),
            "a();\nb();\n//# sourceMappingURL=new.map\n"
        );
    }

    #[test]
    fn replaces_multiline_block_reference() {
        let text = "a();\n  /*# sourceMappingURL=data:application/json;base64,\nAAAA\n*/  \n";
        assert_eq!(
            rewrite_map_reference(text, "a.map"),
            "a();\n//# sourceMappingURL=a.map\n"
        );
    }

    #[test]
    fn keeps_inline_mentions() {
        let text = "var s = \"//# sourceMappingURL=nope\";\n";
        assert_eq!(
            rewrite_map_reference(text, "a.map"),
            "var s = \"//# sourceMappingURL=nope\";\n//# sourceMappingURL=a.map\n"
        );
    }

    #[test]
    fn appends_when_missing() {
        assert_eq!(
            rewrite_map_reference("x()   \n\n", "x.map"),
            "x()\n//# sourceMappingURL=x.map\n"
        );
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "a();\n//# sourceMappingURL=foo.map",
            "a();\r\n//#sourceMappingURL=foo.map\r\n",
            "/*# sourceMappingURL=x.map */\n",
            "",
        ];
        for text in inputs {
            let once = rewrite_map_reference(text, "bundle.js.map");
            let twice = rewrite_map_reference(&once, "bundle.js.map");
            assert_eq!(once, twice, "input {:?}", text);
        }
    }
}
