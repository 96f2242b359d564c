//! The page controller.
//!
//! Drives what the reader sees from location changes:
//!
//! ```text
//! Idle ──navigate──▶ Loading ──found──────▶ Displayed
//!                       │
//!                       ├──not found──▶ NotFound ──revert──▶ Displayed (last known good)
//!                       │
//!                       └──load error─▶ Failed ──retry──▶ Loading
//! ```
//!
//! Every navigation takes a ticket. A result is only committed if its ticket
//! is still the newest one, so when loads overlap the last request wins
//! regardless of completion order.
//!
//! Nothing here fails loudly: problems are reported through the state and
//! the notice queue.

use std::sync::Arc;

use handbook_core::{Error, Result};
use handbook_render::{render_markdown, NoDrawers, RenderedPage};
use serde::Serialize;

use crate::location::Location;
use crate::notice::{Notice, NoticeQueue};
use crate::prefs::{DisplayPreferences, PreferencesUpdate};
use crate::source::{ContentSource, PageContent};
use crate::state::{AuxiliaryContent, UiState};

/// Sequence number of a navigation request.
pub type Ticket = u64;

/// Whether the displayed page is a section or a subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Section,
    Subsection,
}

/// Where to scroll after a page is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "to", content = "anchor")]
pub enum ScrollTarget {
    Top,
    Anchor(String),
}

/// A page on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedPage {
    /// Canonical location, including the requested anchor
    pub location: Location,
    pub kind: PageKind,
    pub title: String,
    pub category: String,
    pub beta: bool,
    pub rendered: RenderedPage,
    pub scroll: ScrollTarget,
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    /// Nothing requested yet.
    Idle,
    /// A navigation is in flight.
    Loading { location: Location, ticket: Ticket },
    /// A page is shown.
    Displayed { page: Box<DisplayedPage> },
    /// The request named no page and there is nothing to fall back to.
    NotFound { requested: String },
    /// The content set could not be loaded. `retryable` says whether
    /// `retry` can help without changing configuration.
    Failed { message: String, retryable: bool },
}

/// What a navigation request ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested page is shown.
    Displayed,
    /// Nothing at that location; the previous page (if any) is shown again.
    NotFound,
    /// A newer request was made before this one finished.
    Superseded,
    /// The content set failed to load.
    Failed,
}

/// Outcome of fetching a location, ready to be committed.
pub type FetchResult = Result<Option<PageContent>>;

/// The page controller.
pub struct PageController {
    source: Arc<dyn ContentSource>,
    state: PageState,
    ui: UiState,
    last_good: Option<Box<DisplayedPage>>,
    latest_ticket: Ticket,
    last_request: Location,
    notices: NoticeQueue,
}

impl PageController {
    /// A controller in the `Idle` state.
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            state: PageState::Idle,
            ui: UiState::default(),
            last_good: None,
            latest_ticket: 0,
            last_request: Location::root(),
            notices: NoticeQueue::new(),
        }
    }

    /// Start with the given display preferences.
    pub fn with_preferences(mut self, preferences: DisplayPreferences) -> Self {
        self.ui.display_preferences = preferences.clamped();
        self
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    /// The page on screen, if any.
    ///
    /// While a load is in flight this is still the previous page.
    pub fn current_page(&self) -> Option<&DisplayedPage> {
        match &self.state {
            PageState::Displayed { page } => Some(page.as_ref()),
            PageState::Loading { .. } => self.last_good.as_deref(),
            _ => None,
        }
    }

    /// Pending notices, oldest first, without removing them.
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Take every pending notice.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Update display preferences; widths are clamped.
    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        self.ui.display_preferences.apply(update);
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Navigate to a route string such as `/privacy/consent#terms`.
    pub async fn navigate_to(&mut self, route: &str) -> NavigationOutcome {
        match Location::parse(route) {
            Some(location) => self.navigate(location).await,
            None => {
                self.latest_ticket += 1;
                self.not_found(route.to_string());
                NavigationOutcome::NotFound
            }
        }
    }

    /// Navigate to a location and commit the result.
    pub async fn navigate(&mut self, location: Location) -> NavigationOutcome {
        let ticket = self.begin(location.clone());
        let source = Arc::clone(&self.source);
        let result = Self::fetch(source.as_ref(), &location).await;
        self.commit(ticket, &location, result)
    }

    /// Follow a `[nav:]` target: a section id, or failing that a subsection
    /// id, in navigation order.
    pub async fn follow_nav_target(&mut self, target: &str) -> NavigationOutcome {
        match self.source.resolve_target(target).await {
            Ok(Some(location)) => self.navigate(location).await,
            Ok(None) => {
                self.latest_ticket += 1;
                self.not_found(target.to_string());
                NavigationOutcome::NotFound
            }
            Err(e) => {
                self.latest_ticket += 1;
                self.fail(&e);
                NavigationOutcome::Failed
            }
        }
    }

    /// Start a navigation: enter `Loading` and hand out its ticket.
    ///
    /// The previous page stays available through
    /// [`current_page`](Self::current_page) until the result is committed.
    pub fn begin(&mut self, location: Location) -> Ticket {
        self.latest_ticket += 1;
        let ticket = self.latest_ticket;
        log::debug!("Navigation #{ticket} to {location}");

        self.last_request = location.clone();
        self.ui.current_location = location.clone();
        self.state = PageState::Loading { location, ticket };
        ticket
    }

    /// Fetch the content for a location without touching controller state.
    pub async fn fetch(source: &dyn ContentSource, location: &Location) -> FetchResult {
        source.page(location).await
    }

    /// Commit a fetch result. Results for anything but the newest ticket are
    /// dropped.
    pub fn commit(
        &mut self,
        ticket: Ticket,
        requested: &Location,
        result: FetchResult,
    ) -> NavigationOutcome {
        if ticket != self.latest_ticket {
            log::debug!(
                "Dropping result of navigation #{ticket}; #{} is newer",
                self.latest_ticket
            );
            return NavigationOutcome::Superseded;
        }

        match result {
            Ok(Some(content)) => {
                self.display(content, requested.anchor.clone());
                NavigationOutcome::Displayed
            }
            Ok(None) => {
                self.not_found(requested.to_string());
                NavigationOutcome::NotFound
            }
            Err(e) => {
                self.fail(&e);
                NavigationOutcome::Failed
            }
        }
    }

    /// Try the last requested location again, typically after `Failed`.
    pub async fn retry(&mut self) -> NavigationOutcome {
        let location = self.last_request.clone();
        log::info!("Retrying {location}");
        self.navigate(location).await
    }

    /// Reload the whole content set and show the current location again.
    pub async fn refresh(&mut self) -> NavigationOutcome {
        match self.source.reload().await {
            Ok(summary) => {
                let detail = if summary.changed {
                    "All content has been reloaded."
                } else {
                    "All content has been reloaded; nothing changed."
                };
                self.notices.push(Notice::success("Content refreshed", detail));
                let location = self.ui.current_location.clone();
                self.navigate(location).await
            }
            Err(e) => {
                self.latest_ticket += 1;
                self.fail(&e);
                NavigationOutcome::Failed
            }
        }
    }

    fn display(&mut self, content: PageContent, anchor: Option<String>) {
        let PageContent {
            location,
            page,
            drawer_ids,
        } = content;

        let kind = if page.is_section() {
            PageKind::Section
        } else {
            PageKind::Subsection
        };
        let rendered = match kind {
            PageKind::Subsection => render_markdown(&page.body, &drawer_ids),
            PageKind::Section => render_markdown(&page.body, &NoDrawers),
        };

        let scroll = match anchor.as_deref() {
            Some(a) if rendered.has_anchor(a) => ScrollTarget::Anchor(a.to_string()),
            Some(a) => {
                log::debug!("Anchor #{a} not on {}; scrolling to top", page.id);
                ScrollTarget::Top
            }
            None => ScrollTarget::Top,
        };

        let location = match anchor {
            Some(a) => location.with_anchor(a),
            None => location,
        };

        let displayed = Box::new(DisplayedPage {
            location: location.clone(),
            kind,
            title: page.title,
            category: page.category,
            beta: !page.is_final,
            rendered,
            scroll,
        });

        let same_page = self
            .last_good
            .as_ref()
            .is_some_and(|prev| prev.location.without_anchor() == location.without_anchor());
        if !same_page {
            self.ui.auxiliary_content = None;
        }

        self.ui.current_location = location;
        self.last_good = Some(displayed.clone());
        self.state = PageState::Displayed { page: displayed };
    }

    fn not_found(&mut self, requested: String) {
        log::warn!("No page at {requested}");
        self.notices.push(Notice::error(
            "Page not found",
            format!("The page \"{requested}\" could not be found."),
        ));

        match &self.last_good {
            Some(previous) => {
                self.ui.current_location = previous.location.clone();
                self.state = PageState::Displayed {
                    page: previous.clone(),
                };
            }
            None => {
                self.state = PageState::NotFound { requested };
            }
        }
    }

    fn fail(&mut self, error: &Error) {
        log::error!("Content unavailable: {error}");
        let retryable = error.is_retryable();
        let detail = if retryable {
            "Failed to load content. Try again."
        } else {
            "Failed to load content. Check the handbook configuration."
        };
        self.notices.push(Notice::error("Error loading content", detail));
        self.state = PageState::Failed {
            message: error.to_string(),
            retryable,
        };
    }

    // ------------------------------------------------------------------------
    // Drawer
    // ------------------------------------------------------------------------

    /// Open a drawer note of the subsection on screen.
    ///
    /// Returns whether the drawer opened. Failures leave state untouched and
    /// queue a notice.
    pub async fn open_drawer(&mut self, note_id: &str) -> bool {
        let (section, subsection) = match &self.state {
            PageState::Displayed { page } if page.kind == PageKind::Subsection => {
                match (&page.location.section, &page.location.subsection) {
                    (Some(s), Some(b)) => (s.clone(), b.clone()),
                    _ => return false,
                }
            }
            _ => {
                self.notices.push(Notice::warning(
                    "Drawer unavailable",
                    "Notes can only be opened from a subsection page.",
                ));
                return false;
            }
        };

        match self.source.drawer_note(&section, &subsection, note_id).await {
            Ok(Some(note)) if note.body.trim().is_empty() => {
                log::warn!("Drawer note {section}/{subsection}/{note_id} is empty");
                self.notices.push(Notice::warning(
                    "Warning",
                    "Attempted to open drawer with empty content.",
                ));
                false
            }
            Ok(Some(note)) => {
                let rendered = render_markdown(&note.body, &NoDrawers);
                self.ui.auxiliary_content = Some(AuxiliaryContent {
                    note_id: note.id,
                    title: note.title,
                    html: rendered.html,
                });
                true
            }
            Ok(None) => {
                log::warn!("Drawer note not found: {section}/{subsection}/{note_id}");
                self.notices.push(Notice::error(
                    "Error loading drawer",
                    format!("The note \"{note_id}\" could not be found."),
                ));
                false
            }
            Err(e) => {
                log::error!("Drawer note {note_id} failed to load: {e}");
                self.notices.push(Notice::error(
                    "Error loading drawer",
                    format!("The note \"{note_id}\" could not be loaded."),
                ));
                false
            }
        }
    }

    /// Close the drawer, if open.
    pub fn close_drawer(&mut self) {
        self.ui.auxiliary_content = None;
    }
}

impl std::fmt::Debug for PageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageController")
            .field("source", &self.source.name())
            .field("state", &self.state)
            .field("location", &self.ui.current_location)
            .field("latest_ticket", &self.latest_ticket)
            .finish()
    }
}
