//! Unread badge rendering.

/// Text for the unread badge: empty at zero, the count up to `cap`, and
/// `"{cap}+"` beyond it.
pub fn badge_label(unread: usize, cap: usize) -> String {
    match unread {
        0 => String::new(),
        n if n > cap => format!("{cap}+"),
        n => n.to_string(),
    }
}
