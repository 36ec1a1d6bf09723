//! Feed view-model.
//!
//! Holds the local post list, seeded by the first successful fetch and then
//! mutated in place after each confirmed create, edit, delete or like. All
//! user feedback goes through the [`ModalHost`]; the blocking alert used for
//! failed edits is kept here until the next render takes it.
//!
//! No lock is held across a request, so mutations of different kinds may
//! interleave. The list reflects whichever response lands last.

mod filter;

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, NewPost, Post, PostChanges, PostsApi};
use crate::modal::{Modal, ModalHost};
use crate::session::SessionStore;

pub use filter::{Filter, SortOrder};

/// Alert raised when an edit is submitted with a blank field.
pub const MISSING_FIELDS_ALERT: &str = "You need to provide the post title and content!";

/// Alert raised when the API refuses an edit.
pub const UPDATE_FAILED_ALERT: &str = "An unknown error has happened. Please, try again!";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("title and content are required")]
    Validation,
    #[error("a {0} is already in progress")]
    Busy(&'static str),
    #[error("post {0} is not in the feed")]
    NotFound(i64),
    #[error("deleting post {0} was not confirmed")]
    Unconfirmed(i64),
    #[error("no user is logged in")]
    LoggedOut,
    #[error("feed was reset while the request was in flight")]
    Stale,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Progress of the initial fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Current contents of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

impl Draft {
    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        submit_disabled(&[&self.title, &self.content])
    }
}

/// Whether a form with these required values must keep its submit disabled.
#[must_use]
pub fn submit_disabled(required: &[&str]) -> bool {
    required.iter().any(|value| value.trim().is_empty())
}

/// Everything the feed page needs to render.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    pub load: LoadState,
    pub posts: Vec<Post>,
    pub filter: Filter,
    pub draft: Draft,
    pub creating: bool,
    pub updating: bool,
    pub deleting: HashSet<i64>,
}

#[derive(Debug, Default)]
struct FeedState {
    load: LoadState,
    posts: Vec<Post>,
    filter: Filter,
    draft: Draft,
    creating: bool,
    updating: bool,
    deleting: HashSet<i64>,
    alert: Option<String>,
    /// Bumped on reset so responses to requests made before it are dropped.
    generation: u64,
}

/// Shared handle to the feed view-model.
#[derive(Clone)]
pub struct Feed {
    state: Arc<Mutex<FeedState>>,
    api: Arc<dyn PostsApi>,
    modal: ModalHost,
    session: SessionStore,
}

impl Feed {
    #[must_use]
    pub fn new(api: Arc<dyn PostsApi>, modal: ModalHost, session: SessionStore) -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedState::default())),
            api,
            modal,
            session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.lock().load.clone()
    }

    /// Fetch the post list once.
    ///
    /// Does nothing unless the feed is idle. The response seeds the local
    /// list only if it is still empty, so local edits are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns the API error if the fetch failed; the feed moves to
    /// [`LoadState::Failed`].
    pub async fn load(&self) -> Result<(), FeedError> {
        match self.start_load() {
            Some(generation) => self.finish_load(generation).await,
            None => Ok(()),
        }
    }

    /// Start [`Feed::load`] on a background task if the feed is idle.
    ///
    /// The feed is in [`LoadState::Loading`] when this returns.
    pub fn spawn_load(&self) {
        if let Some(generation) = self.start_load() {
            let feed = self.clone();
            tokio::spawn(async move {
                // Failure is recorded in the load state.
                let _ = feed.finish_load(generation).await;
            });
        }
    }

    fn start_load(&self) -> Option<u64> {
        let mut state = self.lock();
        if state.load != LoadState::Idle {
            return None;
        }
        state.load = LoadState::Loading;
        Some(state.generation)
    }

    async fn finish_load(&self, generation: u64) -> Result<(), FeedError> {
        info!("Loading posts");
        let result = self.api.list().await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Dropping posts fetched before the feed was reset");
            return Err(FeedError::Stale);
        }

        match result {
            Ok(posts) => {
                if state.posts.is_empty() {
                    state.posts = unique_by_id(posts);
                    info!(count = state.posts.len(), "Posts loaded");
                } else {
                    debug!("Local list already populated, keeping local edits");
                }
                state.load = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load posts: {e}");
                state.load = LoadState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Return a failed feed to idle so the next render fetches again.
    pub fn retry_load(&self) {
        let mut state = self.lock();
        if matches!(state.load, LoadState::Failed(_)) {
            state.load = LoadState::Idle;
        }
    }

    /// Create a post authored by the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank, a create is already running,
    /// nobody is logged in, or the API refused the post. Each failure has
    /// already been shown to the user.
    pub async fn create(&self, title: &str, content: &str) -> Result<Post, FeedError> {
        let generation = {
            let mut state = self.lock();
            // A refused submit must not clobber the draft of the create in flight.
            if state.creating {
                return Err(FeedError::Busy("create"));
            }
            state.draft = Draft {
                title: title.to_string(),
                content: content.to_string(),
            };
            if submit_disabled(&[title, content]) {
                drop(state);
                self.modal.open(Modal::missing_post_fields(), None);
                return Err(FeedError::Validation);
            }
            state.creating = true;
            state.generation
        };

        let Some(username) = self.session.logged_name() else {
            self.lock().creating = false;
            return Err(FeedError::LoggedOut);
        };

        let request = NewPost {
            username,
            title: title.to_string(),
            content: content.to_string(),
        };
        let result = self.api.create(&request).await;

        let mut state = self.lock();
        if state.generation != generation {
            return Err(FeedError::Stale);
        }
        state.creating = false;

        match result {
            Ok(post) => {
                state.posts.retain(|p| p.id != post.id);
                state.posts.insert(0, post.clone());
                state.draft = Draft::default();
                drop(state);

                info!(post_id = post.id, "Post created");
                self.modal.open(Modal::post_created(), None);
                Ok(post)
            }
            Err(e) => {
                drop(state);

                warn!("Failed to create post: {e}");
                let modal = e
                    .detail()
                    .map_or_else(Modal::unknown_error, Modal::create_rejected);
                self.modal.open(modal, None);
                Err(e.into())
            }
        }
    }

    /// Ask the user to confirm deleting a post.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotFound`] if the post is not listed.
    pub fn confirm_delete(&self, id: i64) -> Result<(), FeedError> {
        if !self.lock().posts.iter().any(|p| p.id == id) {
            return Err(FeedError::NotFound(id));
        }
        self.modal.open(Modal::ConfirmDelete { post_id: id }, None);
        Ok(())
    }

    /// Delete a post whose deletion is being confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation modal for `id` is not showing, a
    /// delete of the same post is running, or the API refused it.
    pub async fn delete(&self, id: i64) -> Result<(), FeedError> {
        if self.modal.current() != Some(Modal::ConfirmDelete { post_id: id }) {
            return Err(FeedError::Unconfirmed(id));
        }

        let generation = {
            let mut state = self.lock();
            if !state.deleting.insert(id) {
                return Err(FeedError::Busy("delete"));
            }
            state.generation
        };
        self.modal.close();

        let result = self.api.delete(id).await;

        let mut state = self.lock();
        if state.generation != generation {
            return Err(FeedError::Stale);
        }
        state.deleting.remove(&id);

        match result {
            Ok(()) => {
                state.posts.retain(|p| p.id != id);
                drop(state);

                info!(post_id = id, "Post deleted");
                self.modal.open(Modal::post_deleted(), None);
                Ok(())
            }
            Err(e) => {
                drop(state);

                warn!(post_id = id, "Failed to delete post: {e}");
                self.modal.open(Modal::unknown_error(), None);
                Err(e.into())
            }
        }
    }

    /// Open the edit modal for a post.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotFound`] if the post is not listed.
    pub fn begin_edit(&self, id: i64) -> Result<(), FeedError> {
        let post = self
            .lock()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(FeedError::NotFound(id))?;
        self.modal.open(Modal::EditPost { post }, None);
        Ok(())
    }

    /// Save new title and content for a post.
    ///
    /// Failures raise the blocking alert and leave the edit modal open with
    /// the submitted values.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank, an edit is already running, or
    /// the API refused it.
    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<(), FeedError> {
        let generation = {
            let mut state = self.lock();
            if submit_disabled(&[title, content]) {
                state.alert = Some(MISSING_FIELDS_ALERT.to_string());
                return Err(FeedError::Validation);
            }
            if state.updating {
                return Err(FeedError::Busy("update"));
            }
            state.updating = true;
            state.generation
        };

        let changes = PostChanges {
            title: title.to_string(),
            content: content.to_string(),
        };
        let result = self.api.update(id, &changes).await;

        let mut state = self.lock();
        if state.generation != generation {
            return Err(FeedError::Stale);
        }
        state.updating = false;

        match result {
            Ok(()) => {
                if let Some(post) = state.posts.iter_mut().find(|p| p.id == id) {
                    post.title = changes.title;
                    post.content = changes.content;
                }
                drop(state);

                info!(post_id = id, "Post updated");
                self.modal.open(Modal::post_updated(), None);
                Ok(())
            }
            Err(e) => {
                state.alert = Some(UPDATE_FAILED_ALERT.to_string());
                drop(state);

                warn!(post_id = id, "Failed to update post: {e}");
                if let Some(Modal::EditPost { mut post }) = self.modal.current() {
                    if post.id == id {
                        post.title = changes.title;
                        post.content = changes.content;
                        self.modal.open(Modal::EditPost { post }, None);
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Toggle the local like flag. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotFound`] if the post is not listed.
    pub fn like(&self, id: i64) -> Result<bool, FeedError> {
        let mut state = self.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(FeedError::NotFound(id))?;
        post.liked = !post.liked;
        Ok(post.liked)
    }

    /// Replace the active filter.
    pub fn filter(&self, query: Option<&str>, sort: Option<SortOrder>) {
        let filter = Filter::new(query, sort);
        debug!(query = ?filter.query, sort = ?filter.sort, "Filter changed");
        self.lock().filter = filter;
    }

    #[must_use]
    pub fn current_filter(&self) -> Filter {
        self.lock().filter.clone()
    }

    /// Username of the author of a listed post.
    #[must_use]
    pub fn author(&self, id: i64) -> Option<String> {
        self.lock()
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.username.clone())
    }

    /// The local list projected through the active filter.
    #[must_use]
    pub fn displayed(&self) -> Vec<Post> {
        let state = self.lock();
        state.filter.apply(&state.posts)
    }

    /// The local list, unfiltered.
    #[must_use]
    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    #[must_use]
    pub fn draft(&self) -> Draft {
        self.lock().draft.clone()
    }

    /// Take the pending blocking alert, if any.
    #[must_use]
    pub fn take_alert(&self) -> Option<String> {
        self.lock().alert.take()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> FeedView {
        let state = self.lock();
        FeedView {
            load: state.load.clone(),
            posts: state.filter.apply(&state.posts),
            filter: state.filter.clone(),
            draft: state.draft.clone(),
            creating: state.creating,
            updating: state.updating,
            deleting: state.deleting.clone(),
        }
    }

    /// Forget all feed state, as when the feed page is left.
    pub fn reset(&self) {
        let mut state = self.lock();
        let generation = state.generation.wrapping_add(1);
        *state = FeedState {
            generation,
            ..FeedState::default()
        };
    }
}

impl fmt::Debug for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Feed")
            .field("load", &state.load)
            .field("posts", &state.posts.len())
            .field("filter", &state.filter)
            .finish_non_exhaustive()
    }
}

/// Drop later duplicates of an id, keeping first occurrences in order.
fn unique_by_id(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts.into_iter().filter(|p| seen.insert(p.id)).collect()
}
