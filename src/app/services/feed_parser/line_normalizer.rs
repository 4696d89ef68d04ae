//! Line normalization for whitespace-delimited supplier feeds.
//!
//! Several Polish feeds are printed rather than exported: columns are
//! separated by runs of spaces, quantities above a threshold appear as
//! `> 5`, and occasional product names are split by a stray space. The
//! normalizer rewrites one line of such a feed into a `;`-delimited row.

use regex::Regex;
use std::sync::OnceLock;

fn threshold_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s*5").expect("threshold pattern"))
}

fn split_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w\s\w*\s\w").expect("split-name pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s").expect("whitespace pattern"))
}

/// Normalize one `spaces`-mode line into a `;`-delimited row.
///
/// Three passes, in feed order:
/// 1. `> 5` ("more than the printed threshold") becomes `substitute`, the
///    configured abundant-stock stand-in;
/// 2. when a three-token `word word word` run is present the first embedded
///    space is removed, re-joining a name that was wrongly space-split;
/// 3. every remaining whitespace character becomes the field delimiter.
pub fn normalize_spaces_line(line: &str, substitute: u32) -> String {
    let replacement = substitute.to_string();
    let line = threshold_pattern().replace_all(line, replacement.as_str());

    let line = if split_name_pattern().is_match(&line) {
        whitespace_pattern().replace(&line, "").into_owned()
    } else {
        line.into_owned()
    };

    whitespace_pattern().replace_all(&line, ";").into_owned()
}
