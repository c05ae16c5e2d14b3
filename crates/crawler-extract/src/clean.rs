//! Text cleaning applied to extracted main content: collapse whitespace,
//! then mask email-like tokens before the content ever reaches storage.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static email regex is valid")
});

pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    EMAIL_PATTERN.replace_all(&collapsed, "[EMAIL]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(clean_text("hello   \n\t world"), "hello world");
    }

    #[test]
    fn masks_email_addresses() {
        assert_eq!(
            clean_text("contact us at info@example.com today"),
            "contact us at [EMAIL] today"
        );
    }

    #[test]
    fn leaves_text_without_emails_untouched_besides_whitespace() {
        assert_eq!(clean_text("no emails here"), "no emails here");
    }
}
