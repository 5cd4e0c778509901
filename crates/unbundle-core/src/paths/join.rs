//! Posix-style path joining for `sourceRoot` + source.

/// Joins `base` and `rel` with `/` and normalizes the result the way a posix
/// path join does: repeated separators collapse, `.` segments vanish and `..`
/// pops the previous segment (or is kept at the front of a relative path).
/// An absolute `rel` does not reset `base`.
pub fn posix_join(base: &str, rel: &str) -> String {
    let joined = match (base.is_empty(), rel.is_empty()) {
        (true, true) => return ".".to_string(),
        (true, false) => rel.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rel),
    };
    normalize(&joined)
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if matches!(out.last(), Some(last) if *last != "..") {
                    out.pop();
                } else if !absolute {
                    out.push("..");
                }
            }
            s => out.push(s),
        }
    }

    let mut result = out.join("/");
    if result.is_empty() && !absolute {
        result.push('.');
    }
    if trailing && !result.is_empty() && !result.ends_with('/') {
        result.push('/');
    }
    if absolute {
        result.insert(0, '/');
    }
    result
}
