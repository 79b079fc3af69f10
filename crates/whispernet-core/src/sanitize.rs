//! Link extraction for untrusted message text.
//!
//! [`extract_spans`] turns raw message text into a sequence of [`Span`]s that
//! presentation code can render without ever interpreting the text as markup.
//!
//! # Algorithm
//!
//! Scan left to right for tokens that start with `http://`, `https://` or a
//! bare `www.` at a word boundary and run to the next whitespace. Matching is
//! leftmost-first and non-overlapping; scanning resumes right after each
//! consumed token. Trailing sentence punctuation and unbalanced closing
//! brackets are handed back to the surrounding text.
//!
//! Each token is resolved with [`url::Url`]. `www.` tokens get an assumed
//! `https://` scheme for resolution only.
//!
//! # Security
//!
//! Only tokens that resolve to an absolute `http` or `https` URL with a host
//! and no userinfo become [`Span::Link`]. Prefixes match ASCII letters only,
//! so look-alike characters never form a candidate. Anything else, including schemes like `javascript:`
//! or `data:`, is emitted as [`Span::Text`] holding the original token.
//!
//! # Invariants
//!
//! Concatenating [`Span::display_text`] over the output reproduces the input
//! exactly. No empty `Text` spans are emitted.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// A fragment of rendered message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Plain text, rendered verbatim.
    Text(String),
    /// Validated hyperlink.
    Link {
        /// Text as it appeared in the message.
        display: String,
        /// Absolute `http`/`https` target.
        href: String,
    },
}

impl Span {
    /// Text shown for this span.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(value) => value,
            Self::Link { display, .. } => display,
        }
    }

    /// Link target, if this span is a link.
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Link { href, .. } => Some(href),
        }
    }

    /// Whether this span is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }
}

const ASSUMED_SCHEME: &str = "https://";

#[allow(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static LINK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?i-u:https?://|www\.)\S+").unwrap());

/// Split `text` into plain and link spans.
pub fn extract_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(found) = LINK_TOKEN.find_at(text, cursor) {
        let token = trim_token(found.as_str());
        let token_end = found.start() + token.len();

        push_text(&mut spans, &text[plain_start..found.start()]);

        match resolve(token) {
            Some(href) => spans.push(Span::Link { display: token.to_owned(), href }),
            None => {
                tracing::debug!(token, "link token rejected, keeping as text");
                spans.push(Span::Text(token.to_owned()));
            },
        }

        plain_start = token_end;
        cursor = token_end;
    }

    push_text(&mut spans, &text[plain_start..]);
    spans
}

fn push_text(spans: &mut Vec<Span>, value: &str) {
    if !value.is_empty() {
        spans.push(Span::Text(value.to_owned()));
    }
}

/// Drop trailing characters that belong to the sentence rather than the URL.
///
/// Never trims into the scheme or `www.` prefix, so the result still matches
/// the token pattern's prefix.
fn trim_token(token: &str) -> &str {
    let floor = prefix_len(token);
    let mut end = token.len();

    while end > floor {
        let Some(last) = token[..end].chars().next_back() else {
            break;
        };
        let head = &token[..end - last.len_utf8()];
        let trailing = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '>' => true,
            ')' => head.matches('(').count() < head.matches(')').count() + 1,
            ']' => head.matches('[').count() < head.matches(']').count() + 1,
            '}' => head.matches('{').count() < head.matches('}').count() + 1,
            _ => false,
        };
        if !trailing {
            break;
        }
        end -= last.len_utf8();
    }

    &token[..end]
}

/// Length of the scheme or `www.` prefix that made this a candidate.
fn prefix_len(token: &str) -> usize {
    ["https://", "http://", "www."]
        .iter()
        .find(|prefix| starts_with_ignore_case(token, prefix))
        .map_or(0, |prefix| prefix.len())
}

fn starts_with_ignore_case(token: &str, prefix: &str) -> bool {
    token.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Resolve a token to a safe `href`, or `None` if it must stay plain text.
fn resolve(token: &str) -> Option<String> {
    let prefix = prefix_len(token);
    if prefix == 0 || token.len() <= prefix {
        return None;
    }

    let has_scheme =
        starts_with_ignore_case(token, "http://") || starts_with_ignore_case(token, "https://");
    let normalized =
        if has_scheme { token.to_owned() } else { format!("{ASSUMED_SCHEME}{token}") };

    let url = Url::parse(&normalized).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if url.host_str().is_none_or(str::is_empty) {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }

    // Keep the author's spelling when it is already canonical (modulo the
    // root path slash); otherwise use the parser's escaped serialization.
    let canonical = url.as_str();
    if canonical == normalized || canonical.strip_suffix('/') == Some(normalized.as_str()) {
        Some(normalized)
    } else {
        Some(canonical.to_owned())
    }
}
