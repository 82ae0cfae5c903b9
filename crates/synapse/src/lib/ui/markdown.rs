use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Relative urls and the schemes in [`SAFE_SCHEMES`] pass, anything else
/// (`javascript:`, `data:`, `vbscript:` ...) does not.
fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let scheme_end = url.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));

    match scheme_end {
        Some(i) if url[i..].starts_with(':') => SAFE_SCHEMES
            .iter()
            .any(|scheme| url[..i].eq_ignore_ascii_case(scheme)),
        _ => true,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        tracing::warn!(url = %url, "Dropped unsafe url from markdown");
        CowStr::Borrowed("")
    }
}

/// Renders model output markdown to html.
///
/// Headings, emphasis, links, lists, tables and fenced code blocks (tagged
/// `language-*`) are kept. Raw html in the markdown is shown as text rather
/// than passed through to the page, and link or image urls with a scheme
/// other than http(s) or mailto are blanked.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::Start(Tag::Link(kind, url, title)) => {
            Event::Start(Tag::Link(kind, sanitize_url(url), title))
        }
        Event::Start(Tag::Image(kind, url, title)) => {
            Event::Start(Tag::Image(kind, sanitize_url(url), title))
        }
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
