use crate::parsers::text;
use crate::results::NormalizedText;
use scraper::{ElementRef, Html, Node};

/// Elements whose whole subtree never contributes text
const SKIPPED: &[&str] = &[
    "script", "style", "iframe", "noscript", "svg", "canvas", "head", "template",
];

/// Elements that break inline text into separate words
const BLOCKS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "li",
    "main",
    "nav",
    "p",
    "pre",
    "section",
    "td",
    "th",
    "tr",
];

const FALLBACK_TITLE: &str = "No title";

/// Converts an HTML document into its normalized text rendering
///
/// The tree is only read; output is written to a fresh buffer. Headings,
/// paragraphs, lists, tables, links and images are kept as lightweight
/// markdown-style markers. Never fails: html5ever recovers from any input.
pub fn normalize(markup: &str) -> NormalizedText {
    let doc = Html::parse_document(markup);
    let title = extract_title(&doc);

    let mut pieces = Vec::new();
    render_block(doc.root_element(), &mut pieces);
    let text = text::collapse(&pieces.join("\n"));

    ::log::trace!(
        "Normalized document '{}' into {} pieces ({} chars)",
        title,
        pieces.len(),
        text.len()
    );

    let body = format!("{}{}", NormalizedText::header(&title), text);
    NormalizedText { title, body }
}

/// First document title outside of inline graphics, or the fallback
fn extract_title(doc: &Html) -> String {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "title")
        .find(|el| {
            !el.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().name() == "svg")
        })
        .map(|el| text::normalize_whitespace_in_segment(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Renders the children of a block container, one piece per visible unit
fn render_block(el: ElementRef<'_>, out: &mut Vec<String>) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                let trimmed = t.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(el: ElementRef<'_>, out: &mut Vec<String>) {
    let name = el.value().name();
    if SKIPPED.contains(&name) {
        return;
    }

    if let Some(level) = heading_level(name) {
        let (heading, _) = single_line(el);
        if !heading.is_empty() {
            out.push(format!("{} {}", "#".repeat(level), heading));
        }
        return;
    }

    match name {
        // Pieces are newline separated already
        "br" => {}
        "hr" => out.push("---".to_string()),
        "p" => {
            let (paragraph, nested) = multi_line(el);
            if !paragraph.is_empty() {
                out.push(paragraph);
            }
            for list in nested {
                render_list(list, out);
            }
        }
        "ul" | "ol" => render_list(el, out),
        "table" => render_table(el, out),
        "a" => match render_anchor(el) {
            Some(link) => out.push(link),
            None => render_block(el, out),
        },
        "img" => out.push(render_image(el)),
        _ => render_block(el, out),
    }
}

fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Writes the inline text of `el` into `buf`
///
/// Lists met on the way are not flattened; they are collected into `nested`
/// so the caller can render them as their own block.
fn render_inline<'a>(el: ElementRef<'a>, buf: &mut String, nested: &mut Vec<ElementRef<'a>>) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => buf.push_str(t),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_el.value().name();
                match name {
                    n if SKIPPED.contains(&n) => {}
                    "br" => buf.push('\n'),
                    "hr" => buf.push_str("\n---\n"),
                    "ul" | "ol" => nested.push(child_el),
                    "img" => buf.push_str(&render_image(child_el)),
                    "a" => match render_anchor(child_el) {
                        Some(link) => buf.push_str(&link),
                        None => render_inline(child_el, buf, nested),
                    },
                    n if BLOCKS.contains(&n) => {
                        buf.push(' ');
                        render_inline(child_el, buf, nested);
                        buf.push(' ');
                    }
                    _ => render_inline(child_el, buf, nested),
                }
            }
            _ => {}
        }
    }
}

/// Inline text collapsed onto one line
fn single_line(el: ElementRef<'_>) -> (String, Vec<ElementRef<'_>>) {
    let mut buf = String::new();
    let mut nested = Vec::new();
    render_inline(el, &mut buf, &mut nested);
    (text::normalize_whitespace_in_segment(&buf), nested)
}

/// Inline text keeping explicit line breaks
fn multi_line(el: ElementRef<'_>) -> (String, Vec<ElementRef<'_>>) {
    let mut buf = String::new();
    let mut nested = Vec::new();
    render_inline(el, &mut buf, &mut nested);
    (text::normalize_lines(&buf), nested)
}

/// Renders the direct items of a `ul`/`ol`, followed by any list nested in each item
fn render_list(list: ElementRef<'_>, out: &mut Vec<String>) {
    let ordered = list.value().name() == "ol";
    let mut lines = Vec::new();
    let mut sublists = Vec::new();

    let items = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li");

    for (index, item) in items.enumerate() {
        let (text, nested) = single_line(item);
        let line = if ordered {
            format!("{}. {}", index + 1, text)
        } else {
            format!("* {}", text)
        };
        lines.push(line.trim_end().to_string());

        for sublist in nested {
            render_list(sublist, &mut sublists);
            lines.append(&mut sublists);
        }
    }

    if !lines.is_empty() {
        out.push(lines.join("\n"));
    }
}

fn render_table(table: ElementRef<'_>, out: &mut Vec<String>) {
    let mut lines = vec!["<TABLE>".to_string()];

    let rows = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr");

    for row in rows {
        let cells = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "th" | "td"))
            .map(|cell| single_line(cell).0)
            .collect::<Vec<_>>();
        lines.push(cells.join(" | "));
    }

    lines.push("</TABLE>".to_string());
    out.push(lines.join("\n"));
}

/// `[text](href)` for anchors with both a target and visible text
fn render_anchor(anchor: ElementRef<'_>) -> Option<String> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let (label, _) = single_line(anchor);
    if label.is_empty() {
        return None;
    }

    Some(format!("[{}]({})", label, href))
}

fn render_image(img: ElementRef<'_>) -> String {
    let alt = img
        .value()
        .attr("alt")
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .unwrap_or("image");
    let src = img.value().attr("src").map(str::trim).unwrap_or("");
    format!("![{}]({})", alt, src)
}
