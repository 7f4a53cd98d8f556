//! Booth description source format and the HTML pages generated from it.
//!
//! Organizers write every booth's long-form description into one text file:
//!
//! ```text
//! <start>
//! id: "b12"
//! name: "Paper Lanterns"
//! description: Make your own lantern.
//! <line>Activities</line>
//! Details at www.example.org
//! <end>
//! ```
//!
//! Each block becomes `<id>.html`, the file an item's `description_file` points at.

use std::sync::OnceLock;

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothSource {
    pub id: String,
    pub name: String,
    /// Trimmed, non-empty description lines.
    pub lines: Vec<String>,
}

impl BoothSource {
    pub fn file_name(&self) -> String {
        format!("{}.html", self.id)
    }
}

fn block_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<start>\s*id: "(.*?)"\s*name: "(.*?)"\s*description: (.*?)<end>"#)
            .expect("valid booth block regex")
    })
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).expect("valid url regex")
    })
}

fn line_tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<line>(.*?)</line>").expect("valid line tag regex"))
}

/// Extracts every `<start> … <end>` block, in file order.
pub fn parse_booth_source(text: &str) -> Vec<BoothSource> {
    block_pattern()
        .captures_iter(text)
        .map(|caps| BoothSource {
            id: caps[1].to_string(),
            name: caps[2].to_string(),
            lines: caps[3]
                .trim()
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Wraps bare URLs in links that open in a new tab. `www.` URLs get an `https://` scheme.
pub fn linkify(text: &str) -> String {
    url_pattern()
        .replace_all(text, |caps: &Captures| {
            let raw = &caps[0];
            let url = if raw.starts_with("www.") {
                format!("https://{raw}")
            } else {
                raw.to_string()
            };
            format!(r#"<a href="{url}" target="_blank">{url}</a>"#)
        })
        .into_owned()
}

/// Renders one description line. `<line>text</line>` is a paragraph followed by a rule.
pub fn render_line(line: &str) -> String {
    if let Some(caps) = line_tag_pattern().captures(line.trim()) {
        let inner = caps[1].trim();
        if inner.is_empty() {
            return "<hr>".to_string();
        }
        return format!("<p>{}</p>\n<hr>", linkify(inner));
    }
    format!("<p>{}</p>", linkify(line))
}

const PAGE_STYLE: &str = "\
        body { font-family: 'Arial', sans-serif; color: #333; line-height: 1.6; max-width: 600px; margin: 0 auto; }
        h1 { color: #007bff; border-bottom: 2px solid #eee; padding-bottom: 10px; margin-top: 0; }
        .description { background: #edf4f7; border-radius: 8px; padding: 1.5rem; margin-top: 20px; }
        .content-section p { margin: 0.5rem 0; }
        .activity-header { font-weight: bold; color: #28a745; margin-top: 1rem; }
        .tip { margin-top: 1rem; padding: 0.5rem 1rem; border-left: 4px solid #ffc107; background-color: #fff9e6; }";

pub fn render_booth_page(booth: &BoothSource) -> String {
    let content = booth
        .lines
        .iter()
        .map(|l| render_line(l))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>

<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{id} - {name}</title>
    <style>
{style}
    </style>
</head>
<body>
    <div class="description">
        <div class="content-section">
            {content}
        </div>
    </div>
</body>
</html>
"#,
        id = booth.id,
        name = booth.name,
        style = PAGE_STYLE,
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
intro text that is not part of any block
<start>
id: "b12"
name: "Paper Lanterns"
description: Make your own lantern.

<line>Activities</line>
Details at www.example.org today
<line></line>
<end>
<start> id: "b13" name: "Tea" description: Visit https://tea.example.com/menu <end>
"#;

    #[test]
    fn parses_blocks_in_order() {
        let booths = parse_booth_source(SOURCE);
        assert_eq!(booths.len(), 2);
        assert_eq!(booths[0].id, "b12");
        assert_eq!(booths[0].name, "Paper Lanterns");
        assert_eq!(
            booths[0].lines,
            vec![
                "Make your own lantern.".to_string(),
                "<line>Activities</line>".to_string(),
                "Details at www.example.org today".to_string(),
                "<line></line>".to_string(),
            ]
        );
        assert_eq!(booths[1].file_name(), "b13.html");
        assert_eq!(booths[1].lines, vec!["Visit https://tea.example.com/menu".to_string()]);
    }

    #[test]
    fn no_blocks_yields_nothing() {
        assert!(parse_booth_source("just prose").is_empty());
    }

    #[test]
    fn www_links_get_a_scheme() {
        assert_eq!(
            linkify("see www.example.org now"),
            r#"see <a href="https://www.example.org" target="_blank">https://www.example.org</a> now"#
        );
        assert_eq!(
            linkify("http://a.b/c"),
            r#"<a href="http://a.b/c" target="_blank">http://a.b/c</a>"#
        );
    }

    #[test]
    fn line_tags_render_rules() {
        assert_eq!(render_line("<line>Activities</line>"), "<p>Activities</p>\n<hr>");
        assert_eq!(render_line("<line>  </line>"), "<hr>");
        assert_eq!(render_line("plain"), "<p>plain</p>");
    }

    #[test]
    fn page_contains_title_and_rendered_lines() {
        let booths = parse_booth_source(SOURCE);
        let page = render_booth_page(&booths[0]);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>b12 - Paper Lanterns</title>"));
        assert!(page.contains("<p>Make your own lantern.</p>\n<p>Activities</p>\n<hr>"));
        assert!(page.contains(r#"href="https://www.example.org""#));
        assert!(page.contains("body { font-family"));
    }
}
