//! Case-insensitive containment in either direction.
use std::borrow::Cow;

/// Checks if `query` occurs in `candidate` or `candidate` occurs in `query`,
/// ignoring case.
///
/// A blank query never qualifies. A blank candidate occurs in every other query.
pub fn contains_either(query: &str, candidate: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    let query = lowered(query);
    let candidate = lowered(candidate);
    candidate.contains(query.as_ref()) || query.contains(candidate.as_ref())
}

fn lowered(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_uppercase) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}
