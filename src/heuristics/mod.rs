use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Upper bound on the plain-text summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 500;

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img\s.*?\bsrc\s*=\s*["'](.*?)["'].*?>"#).expect("invalid img regex")
});

static VIDEO_POSTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<video\s.*?\bposter\s*=\s*["'](.*?)["'].*?>"#).expect("invalid video regex")
});

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("invalid tag regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Scans a markup fragment for a representative image URL.
///
/// Tries an `<img src=...>` match first, then `<video poster=...>`. A match
/// only counts if the captured value is a well-formed absolute URL; no
/// network validation happens here.
pub fn find_image_url(fragment: &str) -> Option<String> {
    for pattern in [&*IMG_SRC_RE, &*VIDEO_POSTER_RE] {
        if let Some(caps) = pattern.captures(fragment) {
            let candidate = &caps[1];
            if is_absolute_url(candidate) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

fn is_absolute_url(candidate: &str) -> bool {
    // Url::parse rejects relative references, which is exactly the bar here
    Url::parse(candidate).is_ok()
}

/// Reduces arbitrary HTML or text to a plain-text summary: tags stripped,
/// whitespace runs collapsed to single spaces, trimmed, capped at
/// [`SUMMARY_MAX_CHARS`] characters.
pub fn summarize(content: &str) -> String {
    let stripped = HTML_TAG_RE.replace_all(content, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    let trimmed = collapsed.trim();
    if trimmed.chars().count() > SUMMARY_MAX_CHARS {
        trimmed.chars().take(SUMMARY_MAX_CHARS).collect()
    } else {
        trimmed.to_string()
    }
}
