//! Charset handling for result pages.
//!
//! The operator serves some pages as EUC-KR without declaring it, and HTTP
//! stacks fill the gap with ISO-8859-1. A declared charset is trusted only
//! when it is present and not a Latin-1 alias; otherwise the charset is
//! guessed from the markup and the bytes themselves.

use std::borrow::Cow;
use std::sync::LazyLock;

use encoding_rs::{Encoding, EUC_KR, UTF_8, WINDOWS_1252};
use regex::Regex;

/// How many leading bytes are scanned for a `<meta>` charset declaration.
const META_SNIFF_LEN: usize = 2048;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#)
        .expect("valid meta charset regex")
});

/// Decodes a response body to text.
///
/// Order of preference:
/// 1. charset from the `Content-Type` header, unless missing or Latin-1;
/// 2. charset from a `<meta>` tag near the top of the document, unless the
///    body is valid UTF-8 that the declared charset cannot decode cleanly;
/// 3. strict UTF-8;
/// 4. EUC-KR, if it decodes without replacement characters;
/// 5. lossy UTF-8.
#[must_use]
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(charset_from_content_type)
        .and_then(usable_encoding)
    {
        let (text, had_errors) = decode_with(encoding, bytes);
        if had_errors {
            tracing::debug!(
                encoding = encoding.name(),
                "body contained sequences invalid for the declared charset"
            );
        }
        return text.into_owned();
    }

    let utf8 = std::str::from_utf8(bytes).ok();

    // A stale `<meta>` declaration loses to bytes that are valid UTF-8.
    if let Some(encoding) = sniff_meta_charset(bytes).and_then(usable_encoding) {
        let (text, had_errors) = decode_with(encoding, bytes);
        match utf8 {
            Some(utf8) if had_errors => {
                tracing::debug!(
                    declared = encoding.name(),
                    "meta charset does not fit the body, using UTF-8"
                );
                return utf8.to_owned();
            }
            _ => return text.into_owned(),
        }
    }

    if let Some(text) = utf8 {
        return text.to_owned();
    }

    let (text, _, had_errors) = EUC_KR.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Decoded text plus whether any replacement characters were emitted.
fn decode_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> (Cow<'a, str>, bool) {
    let (text, _, had_errors) = encoding.decode(bytes);
    (text, had_errors)
}

fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
    })
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static str> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_LEN)]);
    let label = META_CHARSET.captures(&head)?.get(1)?.as_str().to_owned();
    Encoding::for_label(label.as_bytes()).map(Encoding::name)
}

/// Resolves a charset label, rejecting the Latin-1 family that servers
/// report when they do not actually know the charset.
fn usable_encoding(label: &str) -> Option<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())?;
    if encoding == WINDOWS_1252 {
        return None;
    }
    // UTF-16 labels in a Content-Type are almost always wrong for HTML.
    if encoding.output_encoding() == UTF_8 && encoding != UTF_8 {
        return None;
    }
    Some(encoding)
}
