//! Load status of the content set.
//!
//! A content set starts `Empty`, goes `Loading` on every (re)load, and
//! settles on `Ready`, `Degraded` or `Failed`. A reload passes through
//! `Loading` again while the previous snapshot keeps serving.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;

/// Where the content set is in its load lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryStatus {
    /// Nothing loaded yet.
    Empty,
    /// A load or reload is in progress.
    Loading,
    /// Every file was read.
    Ready,
    /// Loaded, but with no sections or with unreadable files.
    Degraded(String),
    /// The content root could not be enumerated.
    Failed(String),
}

impl LibraryStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Pages can be served in this state.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Ready | Self::Degraded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// A load has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.is_available() || self.is_failed()
    }
}

impl fmt::Display for LibraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Degraded(reason) => write!(f, "degraded ({reason})"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Owner of the content status, observable through [`watch`] receivers.
#[derive(Debug)]
pub struct StatusHandle {
    tx: watch::Sender<LibraryStatus>,
}

impl Default for StatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusHandle {
    /// A handle in the `Empty` state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LibraryStatus::Empty);
        Self { tx }
    }

    pub fn status(&self) -> LibraryStatus {
        self.tx.borrow().clone()
    }

    /// Move to `status`, logging the transition.
    pub fn set_status(&self, status: LibraryStatus) {
        let previous = self.tx.send_replace(status.clone());
        if previous != status {
            log::info!("Content {previous} -> {status}");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LibraryStatus> {
        self.tx.subscribe()
    }

    /// Wait for the current load to settle.
    ///
    /// Returns `Err` with the observed status when the load failed or did
    /// not settle within `timeout`.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<(), LibraryStatus> {
        let mut rx = self.subscribe();
        let settled = tokio::time::timeout(timeout, rx.wait_for(LibraryStatus::is_settled)).await;

        match settled {
            Ok(Ok(status)) if status.is_available() => Ok(()),
            Ok(Ok(status)) => Err(status.clone()),
            _ => Err(self.status()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // LibraryStatus
    // ------------------------------------------------------------------------

    #[test]
    fn test_settled_states() {
        assert!(!LibraryStatus::Empty.is_settled());
        assert!(!LibraryStatus::Loading.is_settled());
        assert!(LibraryStatus::Ready.is_settled());
        assert!(LibraryStatus::Degraded("no sections found".into()).is_settled());
        assert!(LibraryStatus::Failed("missing root".into()).is_settled());

        assert!(LibraryStatus::Degraded("x".into()).is_available());
        assert!(!LibraryStatus::Degraded("x".into()).is_ready());
        assert!(!LibraryStatus::Failed("x".into()).is_available());
    }

    #[test]
    fn test_display_includes_reason() {
        assert_eq!(LibraryStatus::Loading.to_string(), "loading");
        assert_eq!(
            LibraryStatus::Degraded("2 file(s) could not be read".into()).to_string(),
            "degraded (2 file(s) could not be read)"
        );
    }

    // ------------------------------------------------------------------------
    // StatusHandle
    // ------------------------------------------------------------------------

    #[test]
    fn test_reload_passes_through_loading() {
        let handle = StatusHandle::new();
        let mut rx = handle.subscribe();
        assert_eq!(*rx.borrow_and_update(), LibraryStatus::Empty);

        handle.set_status(LibraryStatus::Loading);
        handle.set_status(LibraryStatus::Ready);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), LibraryStatus::Ready);

        handle.set_status(LibraryStatus::Loading);
        assert_eq!(*rx.borrow_and_update(), LibraryStatus::Loading);
        handle.set_status(LibraryStatus::Degraded("no sections found".into()));
        assert!(rx.borrow_and_update().is_available());
    }

    #[tokio::test]
    async fn test_wait_ready_sees_degraded_as_loaded() {
        let handle = StatusHandle::new();
        handle.set_status(LibraryStatus::Degraded("no sections found".into()));
        assert_eq!(handle.wait_ready(Duration::from_millis(50)).await, Ok(()));
    }

    #[tokio::test]
    async fn test_wait_ready_reports_failure() {
        let handle = StatusHandle::new();
        handle.set_status(LibraryStatus::Failed("missing root".into()));
        assert_eq!(
            handle.wait_ready(Duration::from_millis(50)).await,
            Err(LibraryStatus::Failed("missing root".into()))
        );
    }

    #[tokio::test]
    async fn test_wait_ready_times_out_while_loading() {
        let handle = StatusHandle::new();
        handle.set_status(LibraryStatus::Loading);
        assert_eq!(
            handle.wait_ready(Duration::from_millis(20)).await,
            Err(LibraryStatus::Loading)
        );
    }

    #[tokio::test]
    async fn test_wait_ready_wakes_on_transition() {
        let handle = std::sync::Arc::new(StatusHandle::new());
        handle.set_status(LibraryStatus::Loading);

        let loader = std::sync::Arc::clone(&handle);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.set_status(LibraryStatus::Ready);
        });

        assert_eq!(handle.wait_ready(Duration::from_secs(1)).await, Ok(()));
    }
}
