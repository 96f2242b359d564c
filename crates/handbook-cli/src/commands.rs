//! `build`, `nav`, `show` and `check`.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use handbook_core::{Error, Result};
use handbook_index::{BuildStats, ContentIndex, NavTree, Page};
use handbook_render::{escape_html, render_markdown, Action, NoDrawers};
use handbook_site::{
    AuxiliaryContent, DisplayedPage, IndexSource, NavigationOutcome, Notice, PageController,
};
use serde::Serialize;

use crate::config::HandbookConfig;

/// Resolved configuration plus content root.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: HandbookConfig,
    pub content_root: PathBuf,
}

impl Context {
    pub fn new(config: HandbookConfig, content_override: Option<&Path>) -> Result<Self> {
        let content_root = config.content_root(content_override)?;
        log::debug!("Content root: {}", content_root.display());
        Ok(Self {
            config,
            content_root,
        })
    }

    /// Build the index for the content root.
    pub async fn load_index(&self) -> Result<(ContentIndex, BuildStats)> {
        self.config
            .index_builder(&self.content_root)
            .build()
            .await
    }
}

fn drawer_ids(index: &ContentIndex, page: &Page) -> BTreeSet<String> {
    match &page.section_id {
        Some(section) => index
            .drawer_notes_of(section, &page.id)
            .iter()
            .map(|n| n.id.clone())
            .collect(),
        None => BTreeSet::new(),
    }
}

// ============================================================================
// build
// ============================================================================

/// What `build` wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub out_dir: PathBuf,
    pub pages: usize,
    pub notes: usize,
    pub missing_drawers: usize,
}

/// Render every page and drawer note into `out` (or the configured
/// `output_dir`).
pub async fn cmd_build(ctx: &Context, out: Option<&Path>) -> Result<BuildReport> {
    let (index, stats) = ctx.load_index().await?;
    if !stats.is_clean() {
        log::warn!("{} file(s) could not be read", stats.errors.len());
    }

    let out_dir = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&ctx.config.output_dir));
    let mut report = BuildReport {
        out_dir: out_dir.clone(),
        ..BuildReport::default()
    };

    for page in index.pages() {
        let rendered = render_markdown(&page.body, &drawer_ids(&index, page));
        report.missing_drawers += rendered.missing_drawers.len();

        let route = page.route();
        let path = out_dir.join(route.trim_start_matches('/')).join("index.html");
        write_file(&path, &page_document(&page.title, &route, &rendered.html)).await?;
        report.pages += 1;
    }

    for note in index.drawer_notes() {
        let rendered = render_markdown(&note.body, &NoDrawers);
        let path = out_dir
            .join(&note.section_id)
            .join(&note.subsection_id)
            .join("drawer")
            .join(format!("{}.html", note.id));
        let route = format!("/{}/{}", note.section_id, note.subsection_id);
        write_file(&path, &page_document(&note.title, &route, &rendered.html)).await?;
        report.notes += 1;
    }

    if let Some(home) = index.default_section() {
        write_file(&out_dir.join("index.html"), &redirect_document(&home.route())).await?;
    }

    let nav = serde_json::to_string_pretty(&NavDocument::new(&index))?;
    write_file(&out_dir.join("nav.json"), &nav).await?;

    log::info!(
        "Wrote {} pages and {} drawer notes to {}",
        report.pages,
        report.notes,
        out_dir.display()
    );
    Ok(report)
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(e, parent))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

fn page_document(title: &str, route: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main data-route=\"{}\">\n{body}</main>\n</body>\n</html>\n",
        escape_html(title),
        escape_html(route),
    )
}

fn redirect_document(route: &str) -> String {
    let href = format!("{}/", route.trim_end_matches('/'));
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta http-equiv=\"refresh\" content=\"0; url=.{0}\">\n</head>\n<body><a href=\".{0}\">Continue</a></body>\n</html>\n",
        escape_html(&href)
    )
}

/// `nav.json` contents.
#[derive(Debug, Serialize)]
struct NavDocument {
    default_section: Option<String>,
    groups: Vec<handbook_index::NavGroup>,
}

impl NavDocument {
    fn new(index: &ContentIndex) -> Self {
        Self {
            default_section: index.default_section().map(|p| p.id.clone()),
            groups: index.nav_tree().grouped(index.categories()),
        }
    }
}

// ============================================================================
// nav
// ============================================================================

/// The navigation tree as JSON or as an indented outline.
pub async fn cmd_nav(ctx: &Context, json: bool, filter: Option<&str>) -> Result<String> {
    let (index, _) = ctx.load_index().await?;
    let tree = index.nav_tree().filter(filter.unwrap_or_default());
    if json {
        return Ok(serde_json::to_string_pretty(&tree)?);
    }
    Ok(nav_outline(&index, &tree))
}

fn nav_outline(index: &ContentIndex, tree: &NavTree) -> String {
    let mut out = String::new();
    for group in tree.grouped(index.categories()) {
        out.push_str(&format!("{}\n", group.category.name));
        for section in &group.sections {
            out.push_str(&format!(
                "  {}{}  {}\n",
                section.title,
                beta_marker(section.beta),
                section.route
            ));
            for anchor in &section.anchors {
                out.push_str(&format!("      #{}\n", anchor.anchor));
            }
            for sub in &section.subsections {
                out.push_str(&format!("    - {}{}  {}\n", sub.title, beta_marker(sub.beta), sub.route));
                for anchor in &sub.anchors {
                    out.push_str(&format!("        #{}\n", anchor.anchor));
                }
            }
        }
    }
    out
}

fn beta_marker(beta: bool) -> &'static str {
    if beta {
        " [beta]"
    } else {
        ""
    }
}

// ============================================================================
// show
// ============================================================================

/// What the reader would see after navigating to a route.
#[derive(Debug, Clone)]
pub struct ShowReport {
    pub outcome: NavigationOutcome,
    pub page: Option<DisplayedPage>,
    pub drawer: Option<AuxiliaryContent>,
    pub notices: Vec<Notice>,
}

/// Run the page controller for `route`, optionally opening a drawer note.
pub async fn cmd_show(ctx: &Context, route: &str, drawer: Option<&str>) -> Result<ShowReport> {
    let (index, _) = ctx.load_index().await?;
    let builder = ctx.config.index_builder(&ctx.content_root);
    let source = IndexSource::with_index(builder, index);

    let mut controller =
        PageController::new(Arc::new(source)).with_preferences(ctx.config.display.clone());

    let outcome = controller.navigate_to(route).await;
    if let (NavigationOutcome::Displayed, Some(note)) = (outcome, drawer) {
        controller.open_drawer(note).await;
    }

    Ok(ShowReport {
        outcome,
        page: controller.current_page().cloned(),
        drawer: controller.ui_state().auxiliary_content.clone(),
        notices: controller.take_notices(),
    })
}

// ============================================================================
// check
// ============================================================================

/// A content problem found by `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A file that could not be read and was replaced by a placeholder.
    Unreadable { file: PathBuf, message: String },
    /// A `[nav:]` target that names no section or subsection.
    DanglingNav { page: String, target: String },
    /// A `[drawer:]` target that names no note of the page's subsection.
    MissingDrawer { page: String, target: String },
    /// A subsection whose section has no page, so no navigation reaches it.
    OrphanSubsection { page: String },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { file, message } => {
                write!(f, "unreadable: {} ({message})", file.display())
            }
            Self::DanglingNav { page, target } => {
                write!(f, "{page}: nav target '{target}' does not exist")
            }
            Self::MissingDrawer { page, target } => {
                write!(f, "{page}: drawer note '{target}' does not exist")
            }
            Self::OrphanSubsection { page } => {
                write!(f, "{page}: section has no page of its own")
            }
        }
    }
}

/// Result of `check`.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub pages_checked: usize,
    pub notes_checked: usize,
    pub problems: Vec<Problem>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check every page and drawer note for broken references.
pub async fn cmd_check(ctx: &Context) -> Result<CheckReport> {
    let (index, stats) = ctx.load_index().await?;
    let mut report = CheckReport::default();

    report
        .problems
        .extend(stats.errors.iter().map(|e| Problem::Unreadable {
            file: e.file.clone(),
            message: e.message.clone(),
        }));

    for page in index.pages() {
        let rendered = render_markdown(&page.body, &drawer_ids(&index, page));
        let route = page.route();
        check_nav_targets(&index, &route, &rendered.actions, &mut report.problems);
        report
            .problems
            .extend(rendered.missing_drawers.into_iter().map(|target| Problem::MissingDrawer {
                page: route.clone(),
                target,
            }));
        report.pages_checked += 1;
    }

    report
        .problems
        .extend(index.orphaned_subsections().map(|page| Problem::OrphanSubsection {
            page: page.route(),
        }));

    for note in index.drawer_notes() {
        let rendered = render_markdown(&note.body, &NoDrawers);
        let route = format!("/{}/{}/drawer/{}", note.section_id, note.subsection_id, note.id);
        check_nav_targets(&index, &route, &rendered.actions, &mut report.problems);
        report.notes_checked += 1;
    }

    Ok(report)
}

fn check_nav_targets(index: &ContentIndex, route: &str, actions: &[Action], problems: &mut Vec<Problem>) {
    for action in actions {
        if let Action::Navigate(target) = action {
            if index.find_page(target).is_none() {
                problems.push(Problem::DanglingNav {
                    page: route.to_string(),
                    target: target.clone(),
                });
            }
        }
    }
}
