//! Building outgoing message parts from UI input

use crate::agent::MessagePart;
use base64::Engine;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// MIME type used when a data URL header carries none
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

fn mime_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"data:(.*?);base64").ok())
        .as_ref()
}

/// Split a `data:<mime>;base64,<payload>` URL into an inline-data part.
///
/// The URL is split at the first comma. Without a comma the whole string is
/// taken as the payload.
pub fn parse_data_url(data_url: &str) -> MessagePart {
    let (header, payload) = match data_url.split_once(',') {
        Some((header, payload)) => (header, payload),
        None => ("", data_url),
    };

    let mime_type = mime_pattern()
        .and_then(|re| re.captures(header))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_MIME_TYPE);

    MessagePart::inline_data(mime_type, payload)
}

/// Ordered parts for one user turn: trimmed text first, then the image.
pub fn build_parts(text: &str, image: Option<&str>) -> Vec<MessagePart> {
    let mut parts = Vec::with_capacity(2);

    let text = text.trim();
    if !text.is_empty() {
        parts.push(MessagePart::text(text));
    }

    if let Some(image) = image {
        let part = parse_data_url(image);
        if let MessagePart::InlineData(data) = &part {
            tracing::debug!(mime_type = %data.mime_type, size = data.data.len(), "Adding image part");
        }
        parts.push(part);
    }

    parts
}

/// Encode raw bytes as a base64 data URL
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Guess an image MIME type from a file extension
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => DEFAULT_MIME_TYPE,
    }
}
