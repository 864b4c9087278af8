//! Directory index rendering.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Characters escaped when a file name becomes a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    /// HTTP-date of the last modification, when the filesystem reports one.
    pub modified: Option<String>,
}

/// Read `dir`, sorted by name. Entries whose metadata cannot be read are
/// skipped.
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let metadata = match tokio::fs::metadata(entry.path()).await {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(entry = %name, error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        entries.push(ListingEntry {
            name,
            is_dir: metadata.is_dir(),
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().ok().map(httpdate::fmt_http_date),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an HTML index for `request_path` (the raw URL path of the directory).
pub fn render_html(request_path: &str, entries: &[ListingEntry]) -> String {
    let base = if request_path.ends_with('/') {
        request_path.to_string()
    } else {
        format!("{request_path}/")
    };
    let title = escape_html(&base);

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1>\n<table>\n<tr><th>Name</th><th>Size</th><th>Last modified</th></tr>\n"
    );
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let href = format!("{base}{}{suffix}", utf8_percent_encode(&entry.name, SEGMENT));
        let size = if entry.is_dir {
            "-".to_string()
        } else {
            entry.size.to_string()
        };
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{}{suffix}</a></td><td>{size}</td><td>{}</td></tr>\n",
            escape_html(&href),
            escape_html(&entry.name),
            entry.modified.as_deref().unwrap_or("-"),
        ));
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Render the index as a JSON array.
pub fn render_json(entries: &[ListingEntry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}
