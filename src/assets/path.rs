use std::path::{Path, PathBuf};

/// Expand `~/` and `$VAR` / `${VAR}` using the process environment.
pub fn expand_path(raw: &str) -> String {
    expand_path_with(raw, |name| std::env::var(name).ok())
}

/// Expand `~/` and `$VAR` / `${VAR}` with a custom variable lookup.
///
/// `~` expands through the `HOME` variable. References to unset variables are left as written.
pub fn expand_path_with(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    if (rest == "~" || rest.starts_with("~/"))
        && let Some(home) = lookup("HOME")
    {
        out.push_str(home.trim_end_matches('/'));
        rest = &rest[1..];
    }

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

/// Locate `path`: as given first, then under each search directory in order.
///
/// Absolute paths are never searched.
pub fn find_file(path: &Path, search: &[PathBuf]) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    search
        .iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/path.rs"]
mod tests;
