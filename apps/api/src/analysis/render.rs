//! Converts the model's Markdown reply into display-ready HTML.

use pulldown_cmark::{html, Event, Options, Parser};

/// Strips a single outer ```markdown / ```md / ``` fence if the model wrapped
/// its whole answer in one.
pub fn strip_markdown_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.trim_end().strip_suffix("```") else {
        return text;
    };

    // Only the info string may sit on the opening fence line.
    let (info, body) = body.split_once('\n').unwrap_or(("", body));
    if !matches!(info.trim(), "" | "markdown" | "md") {
        return text;
    }

    // A fence line inside means the reply opens and closes with separate blocks.
    if body.lines().any(|line| line.trim_start().starts_with("```")) {
        return text;
    }
    body.trim()
}

/// Renders Markdown to HTML. Raw HTML in the reply is escaped, not passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}
