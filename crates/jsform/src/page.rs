//! Standalone HTML page around a rendered form.

use ironhtml::typed::Document;
use ironhtml_elements::{Body, Div, Head, Html, Meta, Style, Title, H1, P};

const CSS: &str = "\
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }\n\
form > div { margin-bottom: 1rem; }\n\
p.error { color: #b00020; }";

/// Renders a complete HTML5 document with `title` as page title and
/// heading, an optional intro paragraph, and `form_html` as body content.
pub fn render_page(title: &str, intro: Option<&str>, form_html: &str) -> String {
    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport")
                                .attr("content", "width=device-width, initial-scale=1.0")
                        })
                        .child::<Title, _>(|t| t.text(title))
                        .child::<Style, _>(|s| s.raw(CSS))
                })
                .child::<Body, _>(|body| {
                    let body = body.child::<H1, _>(|h| h.text(title));
                    let body = match intro {
                        Some(text) => body.child::<P, _>(|p| p.text(text)),
                        None => body,
                    };
                    body.child::<Div, _>(|d| d.raw(form_html))
                })
        })
        .build()
}
