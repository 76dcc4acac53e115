//! Transcript text formatting.
//!
//! Renders caption entries as one `[MM:SS] text` line each, the shape
//! language models read most easily.

use crate::youtube::CaptionEntry;

/// Format caption entries as newline-joined `[MM:SS] text` lines.
///
/// Entry order is kept. Minutes are not wrapped into hours and both fields
/// are truncated, never rounded. An empty slice gives an empty string.
pub fn format_transcript(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} {}", format_timestamp(entry.start), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an offset in seconds as `[MM:SS]`.
pub fn format_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("[{:02}:{:02}]", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn entries(items: &[(f64, &str)]) -> Vec<CaptionEntry> {
        items
            .iter()
            .map(|(start, text)| CaptionEntry::new(*start, *text))
            .collect()
    }

    #[test]
    fn test_format_transcript() {
        let output = format_transcript(&entries(&[(0.0, "Hello"), (65.0, "world")]));
        assert_eq!(output, "[00:00] Hello\n[01:05] world");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn test_timestamp_boundaries() {
        assert_eq!(format_timestamp(0.0), "[00:00]");
        assert_eq!(format_timestamp(59.999), "[00:59]");
        assert_eq!(format_timestamp(125.9), "[02:05]");
        assert_eq!(format_timestamp(3600.0), "[60:00]");
        assert_eq!(format_timestamp(4503.0), "[75:03]");
        assert_eq!(format_timestamp(6000.5), "[100:00]");
    }

    #[test]
    fn test_one_line_per_entry() {
        let line = Regex::new(r"^\[\d{2,}:\d{2}\] .*$").unwrap();
        let input: Vec<CaptionEntry> = (0..50)
            .map(|i| CaptionEntry::new(i as f64 * 37.3, format!("line {}", i)))
            .collect();

        let output = format_transcript(&input);
        let lines: Vec<&str> = output.split('\n').collect();

        assert_eq!(lines.len(), input.len());
        assert!(!output.ends_with('\n'));
        for l in lines {
            assert!(line.is_match(l), "{}", l);
        }
    }

    #[test]
    fn test_preserves_order_and_text() {
        let output = format_transcript(&entries(&[(10.0, "b"), (5.0, "a"), (7.0, "")]));
        assert_eq!(output, "[00:10] b\n[00:05] a\n[00:07] ");
    }
}
