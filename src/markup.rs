//! Conversion between Mendeley's HTML note fragments and Markdown.
//!
//! The two directions use unrelated converters and are not inverses of each
//! other. What holds in practice is that plain-paragraph Markdown settles after
//! one trip through the stored HTML dialect.

use pulldown_cmark::{CowStr, Event, Parser, Tag, TagEnd, html};
use pulldown_cmark_escape::escape_html;

/// Render a stored HTML note as Markdown. Empty input gives an empty string.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    html2md::parse_html(html)
}

/// Render Markdown into the single-line HTML fragment Mendeley stores.
///
/// Quotes are escaped before rendering, `<br />` is normalised to `<br/>`,
/// newlines are removed and the `<p>...</p>` wrapper around a single
/// paragraph is stripped. Multi-paragraph input only loses the outermost
/// opening and closing tags.
pub fn markdown_to_html(markdown: &str) -> String {
    let escaped = markdown.replace('"', "&quot;");

    let mut rendered = String::with_capacity(escaped.len() * 3 / 2);
    html::push_html(&mut rendered, quote_escaped_text(Parser::new(&escaped)));

    let single_line = rendered.replace("<br />", "<br/>").replace('\n', "");
    strip_paragraph_wrapper(&single_line).to_string()
}

/// The renderer's body-text escaper leaves `"` alone and the parser has
/// already decoded `&quot;`, so text is escaped here and handed on as raw
/// HTML. Image alt text is escaped by the renderer itself and passes through.
fn quote_escaped_text<'a>(
    events: impl Iterator<Item = Event<'a>>,
) -> impl Iterator<Item = Event<'a>> {
    let mut image_depth = 0usize;
    events.map(move |event| match event {
        Event::Start(Tag::Image { .. }) => {
            image_depth += 1;
            event
        }
        Event::End(TagEnd::Image) => {
            image_depth = image_depth.saturating_sub(1);
            event
        }
        Event::Text(text) if image_depth == 0 => {
            let mut out = String::with_capacity(text.len());
            match escape_html(&mut out, &text) {
                Ok(()) => Event::InlineHtml(CowStr::from(out)),
                Err(_) => Event::Text(text),
            }
        }
        other => other,
    })
}

fn strip_paragraph_wrapper(fragment: &str) -> &str {
    fragment
        .strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
        .unwrap_or(fragment)
}
