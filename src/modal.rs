//! Single-slot modal host.
//!
//! At most one modal is visible at a time. Opening a modal replaces the
//! current one outright: the replaced modal's close action is dropped, never
//! run. Closing runs the close action of the modal being closed.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::api::Post;

/// Deferred work to run when a modal is dismissed.
pub type CloseAction = Box<dyn FnOnce() + Send>;

/// Content of a modal panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Login attempted with a blank name.
    ProvideName,
    /// Login accepted; the session is written when this modal closes.
    LoggedIn { name: String },
    Error {
        message: String,
        button: String,
    },
    Success {
        title: Option<String>,
        message: String,
        button: String,
    },
    ConfirmDelete { post_id: i64 },
    EditPost { post: Post },
}

impl Modal {
    /// Error shown when create is submitted with a blank field.
    #[must_use]
    pub fn missing_post_fields() -> Self {
        Self::Error {
            message: "You need to provide the post title and content!".to_string(),
            button: "Ok, I'll provide it".to_string(),
        }
    }

    /// Error shown when the API rejected a create, with its message.
    #[must_use]
    pub fn create_rejected(detail: &str) -> Self {
        Self::Error {
            message: detail.to_string(),
            button: "Ok, I'll fix it".to_string(),
        }
    }

    /// Error shown when the cause of a failure is unknown.
    #[must_use]
    pub fn unknown_error() -> Self {
        Self::Error {
            message: "An unknown error happened. We don't know what it is.".to_string(),
            button: "Ok, let's try again".to_string(),
        }
    }

    #[must_use]
    pub fn post_created() -> Self {
        Self::Success {
            title: None,
            message: "Post successfully created!".to_string(),
            button: "Check it now!".to_string(),
        }
    }

    #[must_use]
    pub fn post_deleted() -> Self {
        Self::Success {
            title: Some("Deleted!".to_string()),
            message: "Post successfully deleted".to_string(),
            button: "Great to know!".to_string(),
        }
    }

    #[must_use]
    pub fn post_updated() -> Self {
        Self::Success {
            title: Some("Updated".to_string()),
            message: "Post successfully updated!".to_string(),
            button: "Great to know!".to_string(),
        }
    }
}

struct Showing {
    modal: Modal,
    on_close: Option<CloseAction>,
}

/// Shared handle to the modal slot.
#[derive(Clone, Default)]
pub struct ModalHost {
    slot: Arc<Mutex<Option<Showing>>>,
}

impl ModalHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `modal`, replacing whatever is showing.
    pub fn open(&self, modal: Modal, on_close: Option<CloseAction>) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.as_ref() {
            debug!(previous = ?previous.modal, next = ?modal, "Replacing modal");
        }
        *slot = Some(Showing { modal, on_close });
    }

    /// Dismiss the current modal and run its close action.
    ///
    /// Returns `false` if nothing was showing.
    pub fn close(&self) -> bool {
        let showing = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match showing {
            Some(Showing { modal, on_close }) => {
                debug!(modal = ?modal, "Closing modal");
                // Run after the lock is released; the action may open another modal.
                if let Some(action) = on_close {
                    action();
                }
                true
            }
            None => false,
        }
    }

    /// The modal currently showing, if any.
    #[must_use]
    pub fn current(&self) -> Option<Modal> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.modal.clone())
    }

    /// Whether the page behind the modal should stop scrolling.
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for ModalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHost")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter_action(counter: &Arc<AtomicUsize>) -> Option<CloseAction> {
        let counter = Arc::clone(counter);
        Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_open_then_close_runs_action() {
        let host = ModalHost::new();
        let closed = Arc::new(AtomicUsize::new(0));

        host.open(Modal::ProvideName, counter_action(&closed));
        assert_eq!(host.current(), Some(Modal::ProvideName));
        assert!(host.scroll_locked());

        assert!(host.close());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert_eq!(host.current(), None);
        assert!(!host.scroll_locked());
    }

    #[test]
    fn test_replacing_drops_previous_action() {
        let host = ModalHost::new();
        let a_closed = Arc::new(AtomicUsize::new(0));
        let b_closed = Arc::new(AtomicUsize::new(0));

        host.open(Modal::ProvideName, counter_action(&a_closed));
        host.open(Modal::unknown_error(), counter_action(&b_closed));
        assert_eq!(host.current(), Some(Modal::unknown_error()));

        host.close();
        assert_eq!(a_closed.load(Ordering::SeqCst), 0);
        assert_eq!(b_closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_when_idle_is_noop() {
        let host = ModalHost::new();
        assert!(!host.close());
        assert!(!host.scroll_locked());
    }

    #[test]
    fn test_close_action_may_open_next_modal() {
        let host = ModalHost::new();
        let inner = host.clone();
        host.open(
            Modal::ProvideName,
            Some(Box::new(move || inner.open(Modal::post_created(), None))),
        );

        host.close();
        assert_eq!(host.current(), Some(Modal::post_created()));
    }

    #[test]
    fn test_clones_share_slot() {
        let host = ModalHost::new();
        let other = host.clone();
        other.open(Modal::ConfirmDelete { post_id: 3 }, None);
        assert_eq!(host.current(), Some(Modal::ConfirmDelete { post_id: 3 }));
    }
}
