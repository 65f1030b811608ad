//! Text decoding and string helpers.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use memchr::memmem;

use crate::error::Result;

/// Named entity the XML parser does not know about.
const NBSP_ENTITY: &str = "&nbsp;";
/// Numeric replacement for [`NBSP_ENTITY`].
const NBSP_NUMERIC: &str = "&#160;";

/// Read a markup file from disk and decode it to a string.
///
/// Decoding follows [`decode_text`], using the XML declaration's
/// `encoding="..."` as a hint when the bytes are not valid UTF-8.
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let bytes = strip_bom(&bytes);
    let hint_encoding = extract_xml_encoding(bytes);
    Ok(decode_text(bytes, hint_encoding).into_owned())
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252 (common for hand-authored pages)
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Strip UTF-8 BOM if present.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Extract encoding from XML declaration.
///
/// Only the first 100 bytes are checked for `<?xml ... encoding="..." ?>`.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = memmem::find(prefix, b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

/// Replace `&nbsp;` with `&#160;` so a strict XML parser accepts the text.
///
/// Returns `Cow::Borrowed` when nothing needed replacing.
pub fn repair_entities(text: &str) -> Cow<'_, str> {
    if memmem::find(text.as_bytes(), NBSP_ENTITY.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace(NBSP_ENTITY, NBSP_NUMERIC))
}

/// Case-insensitive string equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive ASCII prefix test.
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && eq_ignore_case(&s[..prefix.len()], prefix)
}

/// Case-insensitive ASCII suffix test.
pub fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && eq_ignore_case(&s[s.len() - suffix.len()..], suffix)
}
