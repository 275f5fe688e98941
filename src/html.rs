use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};

/// Read a saved page from disk, honouring its declared charset.
pub fn read_html_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
    Ok(decode_html(&bytes))
}

/// How far into the page the meta charset is looked for.
const SNIFF_LEN: usize = 4096;

/// Decode raw page bytes. The charset comes from the markup itself since the
/// history site has served both UTF-8 and GBK over the years.
pub fn decode_html(bytes: &[u8]) -> String {
    // Meta tags are ASCII so a lossy peek is enough to find them
    let peek = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    let encoding = detect_encoding(&peek);

    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Decode with a transport-declared charset (e.g. from `Content-Type`),
/// falling back to the markup's own declaration when it is missing or unknown.
pub fn decode_with_charset(bytes: &[u8], charset: Option<&str>) -> String {
    match charset.and_then(|label| Encoding::for_label(label.trim().as_bytes())) {
        Some(encoding) => {
            let (decoded, _, _) = encoding.decode(bytes);
            decoded.into_owned()
        }
        None => decode_html(bytes),
    }
}

/// `charset` parameter of a `Content-Type` value, if any.
pub fn content_type_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

pub fn detect_encoding(html: &str) -> &'static Encoding {
    // Attribute names are case-insensitive in HTML
    let html = html.to_ascii_lowercase();

    // Look for charset in meta tag
    if let Some(charset_start) = html.find("charset=") {
        let charset_value = html[charset_start + 8..].trim_start_matches(['"', '\'']);
        let charset_end = charset_value
            .find(|c: char| c == '"' || c == '\'' || c == '>' || c == ' ' || c == ';' || c == '/')
            .unwrap_or(charset_value.len());
        let charset = charset_value[..charset_end].trim();

        return match charset {
            "utf-8" | "utf8" => UTF_8,
            "gbk" | "gb2312" | "gb18030" => GBK,
            "windows-1252" | "iso-8859-1" | "latin1" => WINDOWS_1252,
            // Anything else we don't know about is treated as UTF-8
            _ => UTF_8,
        };
    }

    UTF_8
}
