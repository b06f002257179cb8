//! Best-effort cleanup of backend formatting artifacts.
//!
//! The stringified Gemini result has historically leaked structural noise
//! (`&`, braces, brackets, and the literal word `model`) into reply text.
//! [`clean_reply`] strips those artifacts. This is NOT a content filter and
//! it is brittle by nature: it depends on the backend's response formatting,
//! so it is documented as a cleanup layer only. The typed extraction path in
//! [`crate::gemini`] is the real defense.

use regex::Regex;

/// Pattern matching runs of structural artifact characters (`& { } [ ]`)
/// and every literal occurrence of the word `model`.
const ARTIFACT_PATTERN: &str = r"[&{}\[\]]+|model";

/// Strips backend formatting artifacts and trims surrounding whitespace.
///
/// Idempotent: the stripped characters and the word `model` cannot be
/// regenerated by removal, so applying this twice equals applying it once.
#[must_use]
pub fn clean_reply(raw: &str) -> String {
    // Regex::new only fails on an invalid pattern; for a fixed valid pattern
    // fall back to a plain trim rather than panic.
    let Ok(re) = Regex::new(ARTIFACT_PATTERN) else {
        return raw.trim().to_string();
    };

    re.replace_all(raw, "").trim().to_string()
}
