//! Diff and file helpers.
//!
//! Deliberately naive: statistics come from `+`/`-` line prefixes only, with
//! no real patch parsing. That is all the review threshold and the report
//! numbers need.

/// Added/removed line counts from a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn changed(&self) -> usize {
        self.added + self.removed
    }
}

/// Counts added/removed lines by prefix, skipping `+++`/`---` file headers.
pub fn diff_stats(diff: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            continue;
        }
        if line.starts_with('+') {
            stats.added += 1;
        } else if line.starts_with('-') {
            stats.removed += 1;
        }
    }
    stats
}

/// Extracts reviewable code from a diff: added lines (prefix stripped) and
/// context lines. Removals, hunk headers, file headers, and `index` lines
/// are dropped.
pub fn extract_code_content(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len());
    for line in diff.lines() {
        if line.starts_with("+++")
            || line.starts_with("---")
            || line.starts_with("@@")
            || line.starts_with("index ")
            || line.starts_with("diff --git")
            || line.starts_with('-')
        {
            continue;
        }
        if let Some(added) = line.strip_prefix('+') {
            out.push_str(added);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "java", "kt", "py", "js", "ts", "jsx", "tsx", "go", "rb", "php", "c", "h", "cpp",
    "hpp", "cs", "swift", "scala", "sql", "sh", "vue", "dart",
];

const IGNORED_SUFFIXES: &[&str] = &[
    ".min.js", ".min.css", ".lock", ".map", ".jar", ".class", ".png", ".jpg", ".jpeg", ".gif",
    ".svg", ".ico", ".pdf", ".zip", ".tar.gz",
];

const IGNORED_SEGMENTS: &[&str] = &[
    "node_modules/", "target/", "build/", "dist/", ".git/", "vendor/", "__pycache__/",
];

/// True when the file name carries a known source-code extension.
pub fn is_code_file(name: &str) -> bool {
    match file_extension(name) {
        Some(ext) => CODE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// True for build artifacts, VCS internals, and generated/binary files.
pub fn should_ignore_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IGNORED_SUFFIXES.iter().any(|s| lower.ends_with(s))
        || IGNORED_SEGMENTS.iter().any(|s| lower.contains(s))
}

/// File extension without the dot, if any.
pub fn file_extension(name: &str) -> Option<&str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Counts non-blank lines that are not `//` or `#` comments.
pub fn count_code_lines(content: &str) -> usize {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("//") && !l.starts_with('#'))
        .count()
}

/// Human-readable size, B through GB.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        0..KB => format!("{bytes} B"),
        KB..MB => format!("{:.1} KB", bytes as f64 / KB as f64),
        MB..GB => format!("{:.1} MB", bytes as f64 / MB as f64),
        _ => format!("{:.1} GB", bytes as f64 / GB as f64),
    }
}

/// True when `content` is larger than `max_bytes`.
pub fn is_file_size_exceeded(content: &str, max_bytes: usize) -> bool {
    content.len() > max_bytes
}

const SENSITIVE_KEYS: &[&str] = &["api_key", "apikey", "api-key", "password", "secret", "token"];

/// Masks apparent credentials and URLs before text leaves the service.
///
/// Line-based: values after `key = ...` / `key: ...` assignments whose key
/// contains a sensitive word are replaced with `***`, and any `http(s)://`
/// token is cut down to its scheme plus `***`.
pub fn sanitize_code_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        out.push_str(&sanitize_line(line));
        out.push('\n');
    }
    out
}

fn sanitize_line(line: &str) -> String {
    let masked = match split_assignment(line) {
        Some((lhs, sep, _rhs)) if is_sensitive_key(lhs) => format!("{lhs}{sep}***"),
        _ => line.to_string(),
    };
    mask_urls(&masked)
}

fn split_assignment(line: &str) -> Option<(&str, char, &str)> {
    let idx = line.find(['=', ':'])?;
    let sep = line.as_bytes()[idx] as char;
    Some((&line[..idx], sep, &line[idx + 1..]))
}

fn is_sensitive_key(lhs: &str) -> bool {
    let lower = lhs.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|k| lower.contains(k))
}

fn mask_urls(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        let Some(idx) = rest.find("http://").or_else(|| rest.find("https://")) else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let scheme_len = if tail.starts_with("https://") { 8 } else { 7 };
        out.push_str(&tail[..scheme_len]);
        out.push_str("***");
        let url_end = tail
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
            .unwrap_or(tail.len());
        rest = &tail[url_end..];
    }
}

/// Truncates a diff to `max_lines` whole lines with a trailing marker.
///
/// Diffs within the budget come back unchanged.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
    let total = diff.lines().count();
    if total <= max_lines {
        return diff.to_string();
    }

    let mut out: String = diff
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&format!(
        "\n... (diff truncated: {} of {} lines shown)\n",
        max_lines, total
    ));
    out
}
