//! Markdown report formatters.
//!
//! Formatters are pure functions from a payload `data` value (plus the
//! decoded call arguments) to a Markdown string. They are total: missing
//! or oddly-typed fields degrade to placeholders or omitted lines, never
//! to a panic or an error.

pub mod education;
pub mod public_stats;
pub mod student;

use hemis_api::Doc;
use serde_json::Value;

/// Human-readable file size with KB/MB thresholds at 1024.
pub(crate) fn file_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = 1024 * 1024;
    if bytes > MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

/// `start-end` from a lesson pair, or the given fallback when either
/// bound is missing.
pub(crate) fn time_range(pair: Doc, fallback: &str) -> String {
    let start = pair.get("start_time").str_or("");
    let end = pair.get("end_time").str_or("");
    if start.is_empty() || end.is_empty() {
        fallback.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// `room, building` when the building is known, otherwise just the room.
pub(crate) fn location(auditorium: Doc) -> String {
    let room = auditorium.get("name").str_or("Not specified");
    let building = auditorium.path(&["building", "name"]).str_or("");
    if building.is_empty() {
        room.to_string()
    } else {
        format!("{room}, {building}")
    }
}

/// Bullet lines for attached files, linked when a URL is present.
pub(crate) fn push_file_lines(out: &mut Vec<String>, files: &[Value]) {
    for file in files {
        let file = Doc(file);
        let name = file.get("name").str_or("Unnamed file");
        let size = file_size(file.get("size").i64().unwrap_or(0));
        let url = file.get("url").str_or("");
        if url.is_empty() {
            out.push(format!("- {name} ({size})"));
        } else {
            out.push(format!("- [{name}]({url}) ({size})"));
        }
    }
}

/// Scalar rendered for a report line, `N/A` when absent or non-scalar.
pub(crate) fn value_or_na(doc: Doc) -> String {
    let text = doc.display();
    if text.is_empty() {
        "N/A".to_string()
    } else {
        text
    }
}

/// Render a numeric sum without a trailing `.0` when it is whole.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Capitalize the letter after every non-alphabetic boundary, for
/// document types with no fixed label.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_size_thresholds() {
        assert_eq!(file_size(512), "512 bytes");
        assert_eq!(file_size(2048), "2.00 KB");
        assert_eq!(file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_time_range_fallback() {
        let pair = json!({ "start_time": "09:00", "end_time": "10:20" });
        assert_eq!(time_range(Doc(&pair), "Unknown time"), "09:00-10:20");
        let pair = json!({ "start_time": "09:00" });
        assert_eq!(time_range(Doc(&pair), "Unknown time"), "Unknown time");
    }

    #[test]
    fn test_location_with_and_without_building() {
        let full = json!({ "name": "Room 101", "building": { "name": "Main Building" } });
        assert_eq!(location(Doc(&full)), "Room 101, Main Building");
        let bare = json!({ "name": "Room 101" });
        assert_eq!(location(Doc(&bare)), "Room 101");
        assert_eq!(location(Doc(&json!(null))), "Not specified");
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(12.0), "12");
        assert_eq!(fmt_number(12.5), "12.5");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("transcript"), "Transcript");
        assert_eq!(title_case("grade_book"), "Grade_Book");
    }
}
