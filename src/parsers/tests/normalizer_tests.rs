use crate::parsers::html;

/// Body text after the title header
fn content(markup: &str) -> String {
    let normalized = html::normalize(markup);
    let header = format!("# {}\n\n", normalized.title);
    normalized
        .body
        .strip_prefix(header.as_str())
        .expect("body starts with the title header")
        .to_string()
}

#[cfg(test)]
mod title_tests {
    use super::*;

    #[test]
    fn test_title_becomes_header() {
        let markup = "<html><head><title>Phone X Review</title></head><body><p>Hello, world!</p></body></html>";
        let result = html::normalize(markup);
        assert_eq!(result.title, "Phone X Review");
        assert_eq!(result.body, "# Phone X Review\n\nHello, world!");
    }

    #[test]
    fn test_missing_title_falls_back() {
        let result = html::normalize("<p>Text</p>");
        assert_eq!(result.title, "No title");
        assert_eq!(result.body, "# No title\n\nText");
    }

    #[test]
    fn test_blank_title_falls_back() {
        let result = html::normalize("<title>   </title><p>Text</p>");
        assert_eq!(result.title, "No title");
    }

    #[test]
    fn test_title_whitespace_is_collapsed() {
        let result = html::normalize("<title>\n  Best   Phone \n</title>");
        assert_eq!(result.title, "Best Phone");
    }

    #[test]
    fn test_svg_title_is_not_the_document_title() {
        let markup = "<body><svg><title>icon</title></svg><p>Text</p></body>";
        let result = html::normalize(markup);
        assert_eq!(result.title, "No title");
        assert_eq!(result.body, "# No title\n\nText");
    }

    #[test]
    fn test_head_text_is_not_repeated_in_body() {
        let markup = "<html><head><title>Only Once</title></head><body><p>Body</p></body></html>";
        assert_eq!(content(markup), "Body");
    }
}

#[cfg(test)]
mod removal_tests {
    use super::*;

    #[test]
    fn test_scripts_and_styles_are_dropped() {
        let markup = "<body><script>var x = 1;</script><style>p { color: red; }</style>\
                      <p>Visible</p><noscript>Enable JS</noscript>\
                      <iframe src=\"https://ads.example\">frame</iframe></body>";
        assert_eq!(content(markup), "Visible");
    }

    #[test]
    fn test_graphics_are_dropped() {
        let markup = "<body><svg><text>chart label</text></svg><canvas>fallback</canvas><p>Kept</p></body>";
        assert_eq!(content(markup), "Kept");
    }

    #[test]
    fn test_scripts_inside_paragraphs_are_dropped() {
        let markup = "<p>Before <script>track()</script>after</p>";
        assert_eq!(content(markup), "Before after");
    }
}

#[cfg(test)]
mod structure_tests {
    use super::*;

    #[test]
    fn test_headings() {
        let markup = "<h1>Main</h1><h3>  Sub   heading </h3><h6>Deep</h6>";
        assert_eq!(content(markup), "# Main\n### Sub heading\n###### Deep");
    }

    #[test]
    fn test_empty_heading_is_skipped() {
        assert_eq!(content("<h2>  </h2><p>Text</p>"), "Text");
    }

    #[test]
    fn test_paragraph_text_is_trimmed() {
        let markup = "<p>   Great   battery <b>life</b>  </p>";
        assert_eq!(content(markup), "Great battery life");
    }

    #[test]
    fn test_line_breaks_and_rules() {
        let markup = "<p>Line one<br>Line two</p><hr><p>After</p>";
        assert_eq!(content(markup), "Line one\nLine two\n---\nAfter");
    }

    #[test]
    fn test_unordered_and_ordered_lists() {
        let markup = "<ul><li>Fast</li><li>Light</li></ul><ol><li>First</li><li>Second</li></ol>";
        assert_eq!(content(markup), "* Fast\n* Light\n1. First\n2. Second");
    }

    #[test]
    fn test_nested_list_is_not_flattened_into_parent() {
        let markup = "<ul><li>Parent<ul><li>Child</li></ul></li><li>Next</li></ul>";
        let text = content(markup);
        assert_eq!(text, "* Parent\n* Child\n* Next");
        assert!(!text.contains("Parent Child"));
        assert!(!text.contains("ParentChild"));
    }

    #[test]
    fn test_nested_ordered_list_restarts_numbering() {
        let markup = "<ol><li>One<ol><li>Inner</li></ol></li><li>Two</li></ol>";
        assert_eq!(content(markup), "1. One\n1. Inner\n2. Two");
    }

    #[test]
    fn test_table() {
        let markup = "<table><tr><th>Model</th><th>Score</th></tr>\
                      <tr><td>X</td><td> 9 </td></tr></table>";
        assert_eq!(content(markup), "<TABLE>\nModel | Score\nX | 9\n</TABLE>");
    }

    #[test]
    fn test_anchor_with_text_and_target() {
        let markup = "<body><a href=\"https://reviews.example/x\">Full review</a></body>";
        assert_eq!(content(markup), "[Full review](https://reviews.example/x)");
    }

    #[test]
    fn test_anchor_inside_paragraph_keeps_marker() {
        let markup = "<p>Read <a href=\"https://r.example/x\">the review</a> now</p>";
        assert_eq!(content(markup), "Read [the review](https://r.example/x) now");
    }

    #[test]
    fn test_anchor_without_target_or_text() {
        let markup = "<body><a>plain text</a><a href=\"/empty\">  </a></body>";
        assert_eq!(content(markup), "plain text");
    }

    #[test]
    fn test_images() {
        let markup = "<body><img src=\"/front.png\" alt=\"Front view\"><img></body>";
        assert_eq!(content(markup), "![Front view](/front.png)\n![image]()");
    }

    #[test]
    fn test_list_item_with_link() {
        let markup = "<ul><li><a href=\"https://shop.example\">Buy</a> now</li></ul>";
        assert_eq!(content(markup), "* [Buy](https://shop.example) now");
    }
}

#[cfg(test)]
mod whitespace_tests {
    use super::*;

    #[test]
    fn test_space_runs_collapse() {
        assert_eq!(content("<pre>a    b</pre>"), "a b");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        assert_eq!(content("<div>x\n\n\n\ny</div>"), "x\n\ny");
    }

    #[test]
    fn test_text_nodes_are_newline_separated() {
        let markup = "<div>first</div><div>second</div>";
        assert_eq!(content(markup), "first\nsecond");
    }
}

#[cfg(test)]
mod degraded_input_tests {
    use super::*;

    #[test]
    fn test_empty_markup() {
        let result = html::normalize("");
        assert_eq!(result.body, "# No title\n\n");
        assert!(result.is_blank());
    }

    #[test]
    fn test_unclosed_tags() {
        let result = html::normalize("<div><p>unclosed <b>bold");
        assert!(result.body.starts_with("# No title"));
        assert!(result.body.contains("unclosed bold"));
    }

    #[test]
    fn test_plain_text_input() {
        let result = html::normalize("just some words");
        assert_eq!(result.body, "# No title\n\njust some words");
    }

    #[test]
    fn test_garbage_never_fails() {
        let inputs = ["<<<>>>", "</p></div>", "<a href=", "\u{0}\u{1}", "<table><td>x"];
        for input in inputs {
            let result = html::normalize(input);
            assert!(
                result.body.starts_with(&format!("# {}", result.title)),
                "input {:?} produced {:?}",
                input,
                result.body
            );
        }
    }
}
