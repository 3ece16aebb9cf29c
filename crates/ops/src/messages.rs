//! Requester-facing message templates
//!
//! Only two messages ever reach the requester. Error detail stays in the
//! local logs.

/// Escape text for the messaging API's HTML parse mode
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[must_use]
pub fn success_message(title: &str, link: &str) -> String {
    format!(
        "<b>{}</b>\n\n🔗 <a href=\"{}\">Download</a>",
        escape_html(title),
        escape_html(link)
    )
}

#[must_use]
pub fn failure_message(title: &str) -> String {
    format!(
        "<b>{}</b>\n\n⚠️ Build failed, try again or contact admin.",
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message_carries_link() {
        let message = success_message("Build", "https://x/abc");
        assert_eq!(
            message,
            "<b>Build</b>\n\n🔗 <a href=\"https://x/abc\">Download</a>"
        );
    }

    #[test]
    fn test_interpolated_values_are_escaped() {
        let message = success_message("A & <B>", "https://x/?a=1&b=\"2\"");
        assert!(message.starts_with("<b>A &amp; &lt;B&gt;</b>"));
        assert!(message.contains("href=\"https://x/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_failure_message_has_no_detail() {
        assert_eq!(
            failure_message("Build"),
            "<b>Build</b>\n\n⚠️ Build failed, try again or contact admin."
        );
    }
}
