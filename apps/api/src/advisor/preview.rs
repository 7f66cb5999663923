//! Renders the optimized markdown to HTML for the page's preview pane.

use pulldown_cmark::{html, Event, Options, Parser};

/// Converts markdown to HTML. Raw HTML blocks in the source are emitted as
/// escaped text, so model output can never inject markup into the page.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}
