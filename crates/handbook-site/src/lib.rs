//! Page controller and UI state for a handbook site.
//!
//! - [`location`]: route parsing (`/`, `/:section`, `/:section/:subsection`, `#anchor`)
//! - [`source`]: the [`ContentSource`] seam and the index-backed [`IndexSource`]
//! - [`controller`]: the [`PageController`] state machine
//! - [`state`]: serializable [`UiState`]
//! - [`prefs`]: [`DisplayPreferences`] with clamped widths
//! - [`notice`]: transient notices for the reader
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use handbook_index::IndexBuilder;
//! use handbook_site::{IndexSource, NavigationOutcome, PageController};
//!
//! # async fn example() {
//! let source = IndexSource::new(IndexBuilder::new().with_content_path("markdown"));
//! let mut controller = PageController::new(Arc::new(source));
//!
//! if controller.navigate_to("/privacy#key-terms").await == NavigationOutcome::Displayed {
//!     let page = controller.current_page().unwrap();
//!     println!("{}", page.rendered.html);
//! }
//! for notice in controller.take_notices() {
//!     eprintln!("{notice}");
//! }
//! # }
//! ```

pub mod controller;
pub mod location;
pub mod notice;
pub mod prefs;
pub mod source;
pub mod state;

pub use controller::{
    DisplayedPage, FetchResult, NavigationOutcome, PageController, PageKind, PageState,
    ScrollTarget, Ticket,
};
pub use location::Location;
pub use notice::{Notice, NoticeLevel, NoticeQueue};
pub use prefs::{ColorMode, DisplayPreferences, FontFamily, FontSize, PreferencesUpdate};
pub use source::{resolve_page, ContentSource, IndexSource, PageContent, ReloadSummary};
pub use state::{AuxiliaryContent, UiState};
