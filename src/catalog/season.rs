use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

/// Number formed by every digit in the label ("Season 12" -> 12).
/// Labels without digits, or with more digits than fit, have none.
pub fn label_number(label: &str) -> Option<u128> {
    let digits = NON_DIGITS.replace_all(label, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Display order for season labels.
///
/// Numbered labels come first, ordered by their number; the rest follow
/// alphabetically. Ties fall back to the label so the order stays total.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (label_number(a), label_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_labels(labels: &mut [&str]) {
    labels.sort_by(|a, b| compare_labels(a, b));
}
