//! Social card text cleanup
//!
//! Mailchimp's social card renderer mangles pictographic code points, so the
//! description is stripped of them before a campaign is created.

use std::sync::LazyLock;

use regex::Regex;

// Keycaps, then single symbols and whole pictographic blocks. A symbol takes
// its variation selector and a zero-width joiner linking it to the next
// pictograph with it, so ZWJ sequences leave nothing behind.
static PICTOGRAPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[0-9#]\x{20E3}",
        r"|(?:",
        r"[\x{00A9}\x{00AE}\x{203C}\x{2047}-\x{2049}\x{2122}\x{2139}\x{3030}\x{303D}\x{3297}\x{3299}]",
        r"|[\x{2190}-\x{21FF}\x{2300}-\x{23FF}\x{2460}-\x{24FF}\x{25A0}-\x{25FF}\x{2600}-\x{27BF}\x{2900}-\x{297F}\x{2B00}-\x{2BF0}]",
        r"|[\x{1F000}-\x{1F6FF}\x{1F780}-\x{1F7FF}\x{1F900}-\x{1FAFF}]",
        r")[\x{FE00}-\x{FEFF}]?\x{200D}?",
    ))
    .expect("pictograph pattern is valid")
});

/// Remove emoji and pictographic symbols, leaving all other text as is.
///
/// Removal can make a digit and a keycap mark adjacent, so the pattern is
/// reapplied until nothing changes; the result is stable under reapplication.
pub fn strip_pictographs(description: &str) -> String {
    let mut current = description.to_string();
    loop {
        let next = PICTOGRAPHS.replace_all(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
