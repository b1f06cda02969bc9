//! Best-effort text recovery for the administration tool's output.
//!
//! The tool's output encoding depends on the operating system, the console
//! code page and the code path inside the tool that produced the text, so a
//! single static mapping is never right. Decoding runs as a scored
//! multi-candidate pass with one special case: output that was already
//! decoded with the wrong codec once upstream ("double-misencoded" text) is
//! detected by a fixed table of corruption artifacts and re-decoded from the
//! original bytes.

use encoding_rs::{Encoding, IBM866, KOI8_R, UTF_8, WINDOWS_1251};
use tracing::debug;

/// Candidate encodings for one platform, produced from settings.
#[derive(Debug, Clone)]
pub struct EncodingPrefs {
    pub primary: &'static Encoding,
    pub fallbacks: Vec<&'static Encoding>,
    /// A clean primary decode is authoritative on its own. False when the
    /// primary is a single-byte code page that decodes any byte sequence,
    /// in which case Cyrillic evidence is required as well.
    pub trust_primary: bool,
}

impl EncodingPrefs {
    pub fn utf8_trusted() -> Self {
        Self {
            primary: UTF_8,
            fallbacks: vec![UTF_8, WINDOWS_1251, KOI8_R, IBM866],
            trust_primary: true,
        }
    }
}

/// A decode result together with the encoding that produced it. Resolution
/// never fails: the worst case is a lossy UTF-8 decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

/// Observed corruption artifacts. Replacement-character pairs appear when
/// Windows-1251/CP866 bytes are read as UTF-8; the `Ð`/`Ñ`-lead pairs when
/// UTF-8 Cyrillic bytes are read through a Latin code page. A fixed sample,
/// not an exhaustive list: extending it is tuning, not a contract change.
const BROKEN_FRAGMENTS: &[&str] = &[
    "\u{FFFD}\u{FFFD}",
    "Ð°",
    "Ð¾",
    "Ðµ",
    "Ð¸",
    "Ð½",
    "Ð¿",
    "Ð²",
    "Ñ‚",
    "Ñ€",
    "Ñƒ",
    "â€",
];

pub fn cyrillic_count(text: &str) -> usize {
    text.chars()
        .filter(|c| ('\u{0400}'..='\u{04FF}').contains(c))
        .count()
}

fn has_broken_fragment(text: &str) -> bool {
    BROKEN_FRAGMENTS.iter().any(|f| text.contains(f))
}

fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Resolve raw tool output into text.
///
/// Order of attempts:
/// 1. the configured primary, accepted when it decodes cleanly and is either
///    trusted for the platform or shows Cyrillic evidence (CP866 decodes any
///    byte sequence, so a clean decode alone proves nothing there);
/// 2. the double-misencoding repair: when the UTF-8 trial carries known
///    artifacts and not a single Cyrillic code point, the original bytes are
///    re-read as Windows-1251 and then KOI8-R, first Cyrillic-bearing
///    candidate wins;
/// 3. the fallback list in configured order, scored by Cyrillic count, with
///    the first successful decode kept when nothing scores;
/// 4. lossy UTF-8.
pub fn resolve_bytes(bytes: &[u8], prefs: &EncodingPrefs) -> DecodedText {
    if bytes.is_empty() {
        return DecodedText {
            text: String::new(),
            encoding: UTF_8.name(),
        };
    }

    if let Some(text) = decode_strict(bytes, prefs.primary) {
        if prefs.trust_primary || cyrillic_count(&text) > 0 {
            return DecodedText {
                text,
                encoding: prefs.primary.name(),
            };
        }
    }

    let trial = String::from_utf8_lossy(bytes);
    if has_broken_fragment(&trial) && cyrillic_count(&trial) == 0 {
        for encoding in [WINDOWS_1251, KOI8_R] {
            let (candidate, _, _) = encoding.decode(bytes);
            if cyrillic_count(&candidate) > 0 {
                debug!(encoding = encoding.name(), "repaired double-misencoded output");
                return DecodedText {
                    text: candidate.into_owned(),
                    encoding: encoding.name(),
                };
            }
        }
    }

    let mut first_ok: Option<DecodedText> = None;
    let mut best: Option<(usize, DecodedText)> = None;
    for &encoding in &prefs.fallbacks {
        let Some(text) = decode_strict(bytes, encoding) else {
            continue;
        };
        let score = cyrillic_count(&text);
        let decoded = DecodedText {
            text,
            encoding: encoding.name(),
        };
        if first_ok.is_none() {
            first_ok = Some(decoded.clone());
        }
        if score > 0 && best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, decoded));
        }
    }
    if let Some((_, decoded)) = best {
        return decoded;
    }
    if let Some(decoded) = first_ok {
        return decoded;
    }

    debug!("no candidate encoding decoded cleanly, falling back to lossy utf-8");
    DecodedText {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding: UTF_8.name(),
    }
}

/// Second-chance repair for strings that arrive already decoded, typically
/// on the error-message path where an upstream layer applied the wrong codec
/// once. The same artifact signature applies; the string's UTF-8 bytes are
/// re-read as Windows-1251 and then KOI8-R under the same acceptance rule.
/// Anything without the signature passes through untouched.
pub fn repair_decoded(text: &str) -> String {
    if cyrillic_count(text) > 0 || !has_broken_fragment(text) {
        return text.to_string();
    }
    for encoding in [WINDOWS_1251, KOI8_R] {
        let (candidate, _, _) = encoding.decode(text.as_bytes());
        if cyrillic_count(&candidate) > 0 {
            debug!(encoding = encoding.name(), "repaired double-misencoded message");
            return candidate.into_owned();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::IBM866;

    fn posix_prefs() -> EncodingPrefs {
        EncodingPrefs::utf8_trusted()
    }

    fn windows_prefs() -> EncodingPrefs {
        EncodingPrefs {
            primary: IBM866,
            fallbacks: vec![UTF_8, WINDOWS_1251, KOI8_R, IBM866],
            trust_primary: false,
        }
    }

    #[test]
    fn clean_utf8_cyrillic_is_returned_unchanged() {
        let text = "Недостаточно прав пользователя на информационную базу";
        let decoded = resolve_bytes(text.as_bytes(), &posix_prefs());
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn plain_ascii_is_accepted_by_trusted_primary() {
        let decoded = resolve_bytes(b"server address already in use", &posix_prefs());
        assert_eq!(decoded.text, "server address already in use");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn misencoded_windows_1251_bytes_are_repaired() {
        let original = "Недостаточно прав";
        let (bytes, _, _) = WINDOWS_1251.encode(original);
        let decoded = resolve_bytes(&bytes, &posix_prefs());
        assert_eq!(decoded.text, original);
        assert_eq!(decoded.encoding, "windows-1251");
    }

    #[test]
    fn genuine_cp866_output_wins_on_windows() {
        let original = "Сеанс завершен администратором";
        let (bytes, _, _) = IBM866.encode(original);
        let decoded = resolve_bytes(&bytes, &windows_prefs());
        assert_eq!(decoded.text, original);
        assert_eq!(decoded.encoding, "IBM866");
    }

    #[test]
    fn ascii_on_windows_keeps_first_successful_fallback() {
        // CP866 decodes ASCII cleanly but carries no Cyrillic evidence, so
        // scoring runs and every candidate ties at zero.
        let decoded = resolve_bytes(b"administration server not found", &windows_prefs());
        assert_eq!(decoded.text, "administration server not found");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn repair_prefers_windows_1251_over_koi8_r() {
        // Heuristic behavior: both code pages decode these bytes, 1251 is
        // tried first and already yields Cyrillic, so it wins.
        let original = "нет соединения с сервером";
        let (bytes, _, _) = WINDOWS_1251.encode(original);
        let decoded = resolve_bytes(&bytes, &posix_prefs());
        assert_eq!(decoded.text, original);
        assert_eq!(decoded.encoding, "windows-1251");
    }

    #[test]
    fn empty_input_resolves_to_empty_text() {
        let decoded = resolve_bytes(b"", &posix_prefs());
        assert_eq!(decoded.text, "");
    }

    #[test]
    fn repair_decoded_leaves_clean_text_alone() {
        assert_eq!(repair_decoded("Сеанс не найден"), "Сеанс не найден");
        assert_eq!(repair_decoded("session not found"), "session not found");
    }

    #[test]
    fn repair_decoded_requires_zero_cyrillic() {
        // Mixed text keeps its Cyrillic and is therefore never rewritten,
        // even when an artifact fragment is present.
        let mixed = "ошибка: Ð¾Ñ‚ÐºÐ°Ð·";
        assert_eq!(repair_decoded(mixed), mixed);
    }

    #[test]
    fn repair_decoded_rewrites_artifact_only_strings() {
        // Deterministic heuristic outcome: the artifact string's UTF-8 bytes
        // re-read as Windows-1251 yield Cyrillic, so the rewrite is taken.
        let broken = "Ð½ÐµÑ‚ Ð¿Ñ€Ð°Ð²";
        let repaired = repair_decoded(broken);
        assert_ne!(repaired, broken);
        assert!(cyrillic_count(&repaired) > 0);
    }
}
