//! Markdown to HTML rendering.
//!
//! Bodies go through the custom-link pre-pass, then `pulldown-cmark`, and the
//! event stream is rewritten before HTML output:
//!
//! - `[nav:]` links become `<button data-action="nav">` controls
//! - `[drawer:]`/`[sidebar:]` links become `<button data-action="drawer">`
//!   controls, or a `role="alert"` notice when the note does not exist
//! - level-two headings get `id` attributes from the shared anchor function
//! - `http(s)://` links are marked external and open in a new tab
//! - malformed custom links are shown as the literal text that was written
//! - custom-link syntax inside code spans, code blocks and raw HTML is left
//!   as written

use handbook_content::markdown::{events, heading_text, AnnotatedMarkdown, Heading, Piece, Segment};
use handbook_content::{CustomLink, LinkKind};
use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use crate::drawer::DrawerLookup;
use crate::escape::escape_html;

/// A control the rendered page can dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Action {
    /// Go to a section or subsection by id.
    Navigate(String),
    /// Open a drawer note of the current subsection.
    OpenDrawer(String),
}

/// The output of rendering one markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// HTML fragment
    pub html: String,
    /// Text of the first level-one heading
    pub title: Option<String>,
    /// Level-two headings, in document order, with the ids assigned to them
    pub headings: Vec<Heading>,
    /// Controls in document order
    pub actions: Vec<Action>,
    /// Drawer targets that did not resolve, in document order, deduplicated
    pub missing_drawers: Vec<String>,
}

impl RenderedPage {
    /// Whether `anchor` is the id of one of the rendered headings.
    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.headings.iter().any(|h| h.anchor == anchor)
    }
}

/// Render a markdown body to HTML.
///
/// ```rust
/// use handbook_render::{render_markdown, Action, NoDrawers};
///
/// let page = render_markdown("## Next Steps\n\nGo to [nav:Privacy](privacy).", &NoDrawers);
/// assert!(page.html.contains(r#"<h2 id="next-steps">"#));
/// assert!(page.html.contains(r#"data-action="nav" data-target="privacy""#));
/// assert_eq!(page.actions, vec![Action::Navigate("privacy".to_string())]);
/// ```
pub fn render_markdown(body: &str, drawers: &dyn DrawerLookup) -> RenderedPage {
    let annotated = AnnotatedMarkdown::new(body);
    let source: Vec<Event<'_>> = events(&annotated).collect();

    let mut page = RenderedPage::default();
    let mut output: Vec<Event<'_>> = Vec::with_capacity(source.len());
    let mut code_depth = 0usize;
    let mut external_links: Vec<bool> = Vec::new();

    for (i, event) in source.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let inner = source[i + 1..]
                    .iter()
                    .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))));
                let text = heading_text(inner, &annotated);

                let mut id = id.clone();
                if *level == HeadingLevel::H1 && page.title.is_none() && !text.is_empty() {
                    page.title = Some(text.clone());
                }
                if *level == HeadingLevel::H2 && !text.is_empty() {
                    let heading = Heading::new(2, text);
                    id = Some(CowStr::from(heading.anchor.clone()));
                    page.headings.push(heading);
                }

                output.push(Event::Start(Tag::Heading {
                    level: *level,
                    id,
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                code_depth += 1;
                output.push(Event::Start(Tag::CodeBlock(kind.clone())));
            }
            Event::End(TagEnd::CodeBlock) => {
                code_depth = code_depth.saturating_sub(1);
                output.push(Event::End(TagEnd::CodeBlock));
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let dest = annotated.restore(dest_url).into_owned();
                let title = annotated.restore(title).into_owned();
                if is_external(&dest) {
                    external_links.push(true);
                    output.push(Event::InlineHtml(CowStr::from(external_open_tag(&dest, &title))));
                } else {
                    external_links.push(false);
                    output.push(Event::Start(Tag::Link {
                        link_type: *link_type,
                        dest_url: CowStr::from(dest),
                        title: CowStr::from(title),
                        id: id.clone(),
                    }));
                }
            }
            Event::End(TagEnd::Link) => {
                if external_links.pop().unwrap_or(false) {
                    output.push(Event::InlineHtml(CowStr::from("</a>")));
                } else {
                    output.push(Event::End(TagEnd::Link));
                }
            }

            Event::Text(text) if code_depth > 0 => {
                output.push(Event::Text(restored(&annotated, text)));
            }
            Event::Text(text) => {
                render_text(&annotated, text, drawers, &mut page, &mut output);
            }
            Event::Code(text) => output.push(Event::Code(restored(&annotated, text))),
            Event::Html(html) => output.push(Event::Html(restored(&annotated, html))),
            Event::InlineHtml(html) => output.push(Event::InlineHtml(restored(&annotated, html))),

            other => output.push(other.clone()),
        }
    }

    pulldown_cmark::html::push_html(&mut page.html, output.into_iter());

    if !page.missing_drawers.is_empty() {
        log::warn!("Unresolved drawer targets: {}", page.missing_drawers.join(", "));
    }

    page
}

fn restored<'e>(annotated: &AnnotatedMarkdown<'_>, text: &CowStr<'e>) -> CowStr<'e> {
    CowStr::from(annotated.restore(text).into_owned())
}

fn render_text<'e>(
    annotated: &AnnotatedMarkdown<'_>,
    text: &CowStr<'e>,
    drawers: &dyn DrawerLookup,
    page: &mut RenderedPage,
    output: &mut Vec<Event<'e>>,
) {
    for piece in annotated.split(text) {
        match piece {
            Piece::Text(s) => output.push(Event::Text(CowStr::from(s.to_string()))),
            Piece::Segment(Segment::Malformed(source)) => {
                output.push(Event::Text(CowStr::from(source.to_string())));
            }
            Piece::Segment(Segment::Text(s)) => {
                output.push(Event::Text(CowStr::from(s.to_string())));
            }
            Piece::Segment(Segment::Link(link)) => {
                output.push(Event::InlineHtml(CowStr::from(control(link, drawers, page))));
            }
        }
    }
}

fn control(link: &CustomLink<'_>, drawers: &dyn DrawerLookup, page: &mut RenderedPage) -> String {
    let label = escape_html(link.label);
    let target = escape_html(link.target);

    match link.kind {
        LinkKind::Nav => {
            page.actions.push(Action::Navigate(link.target.to_string()));
            format!(
                r#"<button type="button" class="nav-link" data-action="nav" data-target="{target}">{label}</button>"#
            )
        }
        LinkKind::Drawer if drawers.has_drawer(link.target) => {
            page.actions.push(Action::OpenDrawer(link.target.to_string()));
            format!(
                r#"<button type="button" class="drawer-link" data-action="drawer" data-target="{target}">{label}</button>"#
            )
        }
        LinkKind::Drawer => {
            if !page.missing_drawers.iter().any(|t| t == link.target) {
                page.missing_drawers.push(link.target.to_string());
            }
            format!(
                r#"<span class="drawer-link drawer-missing" role="alert" data-target="{target}">{label} <em>(note &quot;{target}&quot; is unavailable)</em></span>"#
            )
        }
    }
}

fn is_external(dest: &str) -> bool {
    let lower = dest.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn external_open_tag(dest: &str, title: &str) -> String {
    let mut tag = format!(r#"<a href="{}""#, escape_html(dest));
    if !title.is_empty() {
        tag.push_str(&format!(r#" title="{}""#, escape_html(title)));
    }
    tag.push_str(r#" class="external" target="_blank" rel="noopener noreferrer">"#);
    tag
}

// ============================================================================
// Tests
// ============================================================================
