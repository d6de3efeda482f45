//! `Content-Disposition` file name extraction.

use percent_encoding::percent_decode_str;

/// File name carried by a `Content-Disposition` value, if any.
///
/// An RFC 5987 `filename*` parameter takes priority over a plain `filename`.
/// Its percent-decoded bytes are read as UTF-8, or mapped byte-to-char when
/// the charset is ISO-8859-1; other charsets are ignored. A plain value may
/// be quoted, in which case backslash escapes are dropped.
pub fn filename_from_header(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in header_value.split(';') {
        let Some((name, value)) = param.trim().split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        match name.as_str() {
            "filename*" => {
                if let Some(decoded) = decode_extended(value).filter(|v| !v.is_empty()) {
                    return Some(decoded);
                }
            }
            "filename" => {
                let unquoted = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
                    Some(inner) => unescape_quoted(inner),
                    None => value.to_string(),
                };
                if !unquoted.is_empty() {
                    plain = Some(unquoted);
                }
            }
            _ => {}
        }
    }

    plain
}

/// Decode an RFC 5987 `charset'lang'value` string.
fn decode_extended(value: &str) -> Option<String> {
    let value = value.trim_matches('"');
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?.to_ascii_lowercase();
    let _lang = parts.next()?;
    let encoded = parts.next()?;

    let bytes: Vec<u8> = percent_decode_str(encoded).collect();
    match charset.as_str() {
        "utf-8" => Some(String::from_utf8_lossy(&bytes).into_owned()),
        "iso-8859-1" => Some(bytes.iter().map(|&b| b as char).collect()),
        _ => None,
    }
}

fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
