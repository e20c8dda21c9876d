//! The single JSON object every invocation prints.
//!
//! `success` is always the first key. Output uses `", "` and `": "`
//! separators, e.g. `{"success": true, "content": "foo\nbar"}`, and is pure
//! ASCII: other characters are written as `\uXXXX` escapes.

use serde::Serialize;
use std::io;

/// Fallback line used if serialization itself fails.
const SERIALIZE_FAILURE_LINE: &str =
    r#"{"success": false, "error": "failed to serialize result"}"#;

/// Result of one command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// Success with no payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            content: None,
            tty: None,
            processing: None,
            error: None,
        }
    }

    pub fn content(content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::ok()
        }
    }

    pub fn tty(tty: String) -> Self {
        Self {
            tty: Some(tty),
            ..Self::ok()
        }
    }

    pub fn processing(processing: bool) -> Self {
        Self {
            processing: Some(processing),
            ..Self::ok()
        }
    }

    /// Failure carrying exactly one error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::ok()
        }
    }

    /// Serialize to one JSON line (without the trailing newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Serialize, falling back to a fixed failure line.
    pub fn render(&self) -> String {
        self.to_json().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize result");
            SERIALIZE_FAILURE_LINE.to_string()
        })
    }
}

/// Compact JSON with a space after `,` and `:`; non-ASCII is `\u`-escaped.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            // Characters above U+FFFF become a surrogate pair.
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_renders_only_success() {
        assert_eq!(Outcome::ok().render(), r#"{"success": true}"#);
    }

    #[test]
    fn content_is_escaped_and_follows_success() {
        assert_eq!(
            Outcome::content("foo\nbar".into()).render(),
            r#"{"success": true, "content": "foo\nbar"}"#
        );
    }

    #[test]
    fn empty_content_is_kept() {
        assert_eq!(
            Outcome::content(String::new()).render(),
            r#"{"success": true, "content": ""}"#
        );
    }

    #[test]
    fn tty_and_processing_payloads() {
        assert_eq!(
            Outcome::tty("/dev/ttys000".into()).render(),
            r#"{"success": true, "tty": "/dev/ttys000"}"#
        );
        assert_eq!(
            Outcome::processing(false).render(),
            r#"{"success": true, "processing": false}"#
        );
    }

    #[test]
    fn failure_carries_exactly_one_error() {
        let value: serde_json::Value =
            serde_json::from_str(&Outcome::failure("No active session found").render())
                .expect("parse");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 2);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "No active session found");
    }

    #[test]
    fn non_ascii_is_escaped() {
        let rendered = Outcome::content("caf\u{e9} \u{1f600}".into()).render();
        assert_eq!(
            rendered,
            r#"{"success": true, "content": "caf\u00e9 \ud83d\ude00"}"#
        );
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("parse");
        assert_eq!(value["content"], "caf\u{e9} \u{1f600}");
    }

    #[test]
    fn control_bytes_in_content_stay_valid_json() {
        let rendered = Outcome::content("a\u{1b}[0mb".into()).render();
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("parse");
        assert_eq!(value["content"], "a\u{1b}[0mb");
    }
}
