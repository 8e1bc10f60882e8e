//! # Reference rewriting
//!
//! Applies a rename table to playlist text. Only URI tokens change: a URI
//! line, or the `URI="..."` attribute of the tags that name sub-playlists.
//! Every other byte, including line endings and attribute values that
//! happen to repeat a reference, is kept as is.

use std::collections::HashMap;

/// Tags whose `URI` attribute names a sub-playlist
const URI_ATTRIBUTE_TAGS: [&str; 2] = ["#EXT-X-MEDIA:", "#EXT-X-I-FRAME-STREAM-INF:"];

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// Rewrite every reference found in `renames`, returning the new text
pub fn rewrite_references(text: &str, renames: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let (content, ending) = split_line_ending(line);
        let trimmed = content.trim();

        if trimmed.is_empty() {
            out.push_str(line);
        } else if trimmed.starts_with('#') {
            if URI_ATTRIBUTE_TAGS.iter().any(|tag| trimmed.starts_with(tag)) {
                out.push_str(&rewrite_uri_attribute(content, renames));
                out.push_str(ending);
            } else {
                out.push_str(line);
            }
        } else if let Some(new_name) = renames.get(trimmed) {
            let start = content.len() - content.trim_start().len();
            out.push_str(&content[..start]);
            out.push_str(new_name);
            out.push_str(&content[start + trimmed.len()..]);
            out.push_str(ending);
        } else {
            out.push_str(line);
        }
    }

    out
}

fn rewrite_uri_attribute(content: &str, renames: &HashMap<String, String>) -> String {
    const KEY: &str = "URI=\"";

    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(pos) = rest.find(KEY) {
        // Must be a whole attribute name, not the tail of e.g. `XURI="`
        let boundary = rest[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c == ':' || c == ',');
        let value_start = pos + KEY.len();

        let Some(value_len) = rest[value_start..].find('"') else {
            break;
        };
        let value = &rest[value_start..value_start + value_len];

        out.push_str(&rest[..value_start]);
        match renames.get(value) {
            Some(new_name) if boundary => out.push_str(new_name),
            _ => out.push_str(value),
        }
        rest = &rest[value_start + value_len..];
    }

    out.push_str(rest);
    out
}
