use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Form;
use axum::Router;
use serde::Deserialize;
use tracing::{debug, warn};

use super::pages::{render_feed_page, render_login_page, FeedPageParams};
use super::AppState;
use crate::feed::SortOrder;
use crate::session::submit_login;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/modal/close", post(close_modal))
        .route("/posts", post(create_post))
        .route("/posts/:id/like", post(like_post))
        .route("/posts/:id/delete", post(request_delete))
        .route("/posts/:id/delete/confirm", post(confirm_delete))
        .route("/posts/:id/edit", post(edit_post))
        .route("/posts/:id/update", post(update_post))
        .route("/reload", post(reload))
        .route("/healthz", get(health))
}

fn back_to_index() -> Redirect {
    Redirect::to("/")
}

/// Whether the logged-in user wrote post `id`.
fn owned_by_user(state: &AppState, id: i64) -> bool {
    let Some(name) = state.session.logged_name() else {
        return false;
    };
    state.feed.author(id).is_some_and(|author| author == name)
}

// ========== HTML Routes ==========

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    q: Option<String>,
    sort: Option<String>,
}

async fn index(State(state): State<AppState>, Query(params): Query<FilterParams>) -> Response {
    let modal = state.modal.current();

    let Some(name) = state.session.logged_name() else {
        let html = render_login_page(modal.as_ref()).into_string();
        return Html(html).into_response();
    };

    if params.q.is_some() || params.sort.is_some() {
        let current = state.feed.current_filter().sort;
        // Blank means unsorted; an unrecognised value keeps the current order.
        let sort = match params.sort.as_deref().map(str::trim) {
            Some("") => None,
            Some(value) => SortOrder::parse(value).or(current),
            None => current,
        };
        state.feed.filter(params.q.as_deref(), sort);
    }

    state.feed.spawn_load();

    let view = state.feed.view();
    let alert = state.feed.take_alert();
    let page = FeedPageParams::new(&name, &view)
        .modal(modal.as_ref())
        .alert(alert.as_deref())
        .refresh_secs(state.config.load_refresh.as_secs());

    Html(render_feed_page(&page).into_string()).into_response()
}

// ========== Session ==========

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    name: String,
}

async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    if !submit_login(&state.session, &state.modal, &form.name) {
        debug!("Login submitted without a name");
    }
    back_to_index()
}

async fn logout(State(state): State<AppState>) -> Redirect {
    state.session.logout();
    state.feed.reset();
    back_to_index()
}

async fn close_modal(State(state): State<AppState>) -> Redirect {
    if !state.modal.close() {
        debug!("Close requested with no modal showing");
    }
    back_to_index()
}

// ========== Posts ==========

#[derive(Debug, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

async fn create_post(State(state): State<AppState>, Form(form): Form<PostForm>) -> Redirect {
    if state.session.logged_name().is_none() {
        warn!("Create requested while logged out");
        return back_to_index();
    }

    if let Err(e) = state.feed.create(&form.title, &form.content).await {
        debug!("Create not completed: {e}");
    }
    back_to_index()
}

async fn like_post(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    match state.feed.like(id) {
        Ok(liked) => debug!(post_id = id, liked, "Like toggled"),
        Err(e) => warn!(post_id = id, "Like ignored: {e}"),
    }
    back_to_index()
}

async fn request_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    if !owned_by_user(&state, id) {
        warn!(post_id = id, "Delete requested for a post the user does not own");
        return back_to_index();
    }

    if let Err(e) = state.feed.confirm_delete(id) {
        warn!(post_id = id, "Delete confirmation not opened: {e}");
    }
    back_to_index()
}

async fn confirm_delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    if !owned_by_user(&state, id) {
        warn!(post_id = id, "Delete confirmed for a post the user does not own");
        return back_to_index();
    }

    if let Err(e) = state.feed.delete(id).await {
        debug!(post_id = id, "Delete not completed: {e}");
    }
    back_to_index()
}

async fn edit_post(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    if !owned_by_user(&state, id) {
        warn!(post_id = id, "Edit requested for a post the user does not own");
        return back_to_index();
    }

    if let Err(e) = state.feed.begin_edit(id) {
        warn!(post_id = id, "Edit not opened: {e}");
    }
    back_to_index()
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Redirect {
    if !owned_by_user(&state, id) {
        warn!(post_id = id, "Update submitted for a post the user does not own");
        return back_to_index();
    }

    if let Err(e) = state.feed.update(id, &form.title, &form.content).await {
        debug!(post_id = id, "Update not completed: {e}");
    }
    back_to_index()
}

async fn reload(State(state): State<AppState>) -> Redirect {
    state.feed.retry_load();
    back_to_index()
}

async fn health() -> &'static str {
    "OK"
}
