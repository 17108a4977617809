use once_cell::sync::Lazy;
use regex::Regex;

// Local part, '@', then at least one dot-separated domain label followed by a TLD of two or more letters.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$")
        .expect("email regex is valid")
});

/// Checks that `email` looks like a deliverable e-mail address.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Escapes text for safe inclusion in an HTML document.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+rings@mail.example.co.il"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("<b>Tom & \"Jerry\"</b>"), "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
