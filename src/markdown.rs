use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Render an article body to HTML.
///
/// Bodies are Markdown. Raw HTML in a body is rendered as escaped text.
/// Headings are shifted down one level; the page title is the only `h1`.
pub fn render_body(body: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(body, opts).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level: demote(level),
            id,
            classes,
            attrs,
        }),
        Event::End(TagEnd::Heading(level)) => Event::End(TagEnd::Heading(demote(level))),
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html = String::with_capacity(body.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    html
}

fn demote(level: HeadingLevel) -> HeadingLevel {
    match level {
        HeadingLevel::H1 => HeadingLevel::H2,
        HeadingLevel::H2 => HeadingLevel::H3,
        HeadingLevel::H3 => HeadingLevel::H4,
        HeadingLevel::H4 => HeadingLevel::H5,
        HeadingLevel::H5 | HeadingLevel::H6 => HeadingLevel::H6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_body_basic() {
        let out = render_body("# Setup\n\nSome *text*.\n");
        assert_eq!(out, "<h2>Setup</h2>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_render_body_escapes_raw_html() {
        let out = render_body("<p><b>bold</b></p>");
        assert!(!out.contains("<b>"));
        assert!(out.contains("&lt;b&gt;bold&lt;/b&gt;"));

        let out = render_body("Hi <img src=x onerror=alert(1)> there");
        assert_eq!(out, "<p>Hi &lt;img src=x onerror=alert(1)&gt; there</p>\n");
    }

    #[test]
    fn test_render_body_tables() {
        let out = render_body("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.contains("<table>"));
    }
}
