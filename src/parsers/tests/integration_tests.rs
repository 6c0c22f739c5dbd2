use crate::parsers::{self, html};

#[cfg(test)]
mod tests {
    use super::*;

    const REVIEW_PAGE: &str = "<html><head><title>Acme Phone review</title>\
        <script>window.ads = [];</script></head><body>\
        <h1>Acme Phone</h1>\
        <p>The Acme Phone is a <a href=\"https://acme.example/phone\">mid-range phone</a>.</p>\
        <h2>Pros</h2><ul><li>Fast charging</li><li>Bright screen</li></ul>\
        <h2>Verdict</h2><ol><li>Buy it</li><li>Skip the case</li></ol>\
        <img src=\"/phone.jpg\" alt=\"Acme Phone\">\
        </body></html>";

    #[test]
    fn test_full_document() {
        let result = html::normalize(REVIEW_PAGE);
        assert_eq!(result.title, "Acme Phone review");
        assert_eq!(
            result.body,
            "# Acme Phone review\n\n\
             # Acme Phone\n\
             The Acme Phone is a [mid-range phone](https://acme.example/phone).\n\
             ## Pros\n\
             * Fast charging\n\
             * Bright screen\n\
             ## Verdict\n\
             1. Buy it\n\
             2. Skip the case\n\
             ![Acme Phone](/phone.jpg)"
        );
    }

    #[test]
    fn test_second_pass_keeps_markers() {
        let first = html::normalize(REVIEW_PAGE);
        let second = html::normalize(&first.body);

        // The rendered text has no markup left, so it comes back whole
        assert!(second.body.ends_with(first.body.as_str()));
        for marker in [
            "# Acme Phone",
            "## Pros",
            "* Fast charging",
            "1. Buy it",
            "[mid-range phone](https://acme.example/phone)",
            "![Acme Phone](/phone.jpg)",
        ] {
            assert!(second.body.contains(marker), "lost marker {:?}", marker);
        }
    }

    #[test]
    fn test_second_pass_keeps_table_rows() {
        let markup = "<title>T</title><table><tr><th>Model</th><th>Score</th></tr>\
                      <tr><td>X</td><td>9</td></tr></table>";
        let first = html::normalize(markup);
        assert_eq!(first.body, "# T\n\n<TABLE>\nModel | Score\nX | 9\n</TABLE>");

        let second = html::normalize(&first.body);
        assert!(second.body.contains("Model | Score"));
        assert!(second.body.contains("X | 9"));

        // The literal <TABLE> text parses as a real table again; html5ever
        // moves the row text in front of it and the markers come back empty
        assert_eq!(
            second.body,
            "# No title\n\n# T\n\nModel | Score\nX | 9\n<TABLE>\n</TABLE>"
        );
    }

    #[test]
    fn test_long_title_is_blank_before_bounding() {
        let title = "T".repeat(3100);
        let markup = format!("<title>{}</title><body> </body>", title);

        let normalized = html::normalize(&markup);
        assert!(normalized.is_blank());

        // Once cut, the header is no longer whole
        let bounded = parsers::bound(normalized, 3000);
        assert_eq!(bounded.body.chars().count(), 3000);
        assert!(!bounded.body.ends_with("\n\n"));
    }

    #[test]
    fn test_bounded_body_never_exceeds_limit() {
        let paragraph = "<p>Battery life is excellent and the screen is sharp.</p>";
        let markup = format!("<title>Long</title>{}", paragraph.repeat(200));

        let unbounded = html::normalize(&markup);
        assert!(unbounded.body.chars().count() > 3000);

        let bounded = parsers::normalize_bounded(&markup, 3000);
        assert_eq!(bounded.body.chars().count(), 3000);
        assert!(unbounded.body.starts_with(bounded.body.as_str()));
        assert!(bounded.body.starts_with("# Long\n\n"));
    }

    #[test]
    fn test_bounded_short_body_is_untouched() {
        let bounded = parsers::normalize_bounded("<p>short</p>", 3000);
        assert_eq!(bounded.body, "# No title\n\nshort");
    }
}
