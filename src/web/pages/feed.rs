//! Feed page: header, create form, filters and the post list.

use chrono::{DateTime, Utc};
use maud::{html, Markup, Render};

use crate::components::{
    BaseLayout, Button, EmptyState, Form, FormGroup, Input, ModalOverlay, ModalPanel, PostCard,
    PostSkeleton, Select, TextArea,
};
use crate::feed::{FeedView, LoadState, SortOrder};
use crate::modal::Modal;

/// Number of placeholder cards shown while loading.
const SKELETON_COUNT: usize = 2;
const UNSORTED_LABEL: &str = "Unsorted";

/// Parameters for rendering the feed page.
#[derive(Debug)]
pub struct FeedPageParams<'a> {
    /// Logged-in user name
    pub name: &'a str,
    /// Snapshot of the feed view-model
    pub view: &'a FeedView,
    /// Modal currently showing, if any
    pub modal: Option<&'a Modal>,
    /// Blocking alert to raise once, if any
    pub alert: Option<&'a str>,
    /// Seconds between reloads while posts are loading
    pub refresh_secs: u64,
    /// Reference time for relative timestamps; defaults to now
    pub now: Option<DateTime<Utc>>,
}

impl<'a> FeedPageParams<'a> {
    /// Create new feed page parameters.
    #[must_use]
    pub const fn new(name: &'a str, view: &'a FeedView) -> Self {
        Self {
            name,
            view,
            modal: None,
            alert: None,
            refresh_secs: 1,
            now: None,
        }
    }

    #[must_use]
    pub const fn modal(mut self, modal: Option<&'a Modal>) -> Self {
        self.modal = modal;
        self
    }

    #[must_use]
    pub const fn alert(mut self, alert: Option<&'a str>) -> Self {
        self.alert = alert;
        self
    }

    #[must_use]
    pub const fn refresh_secs(mut self, secs: u64) -> Self {
        self.refresh_secs = secs;
        self
    }

    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// Render the feed page.
#[must_use]
pub fn render_feed_page(params: &FeedPageParams<'_>) -> Markup {
    let view = params.view;
    let loading = matches!(view.load, LoadState::Idle | LoadState::Loading);

    let content = html! {
        div class="feed" {
            (render_header(params.name))
            div class="feed-body" {
                (render_create_form(view))
                (render_filters(view))
                (render_posts(params))
            }
        }
        @if let Some(modal) = params.modal {
            (ModalOverlay::new(ModalPanel::new(modal).updating(view.updating)))
        }
    };

    let mut layout = BaseLayout::new("Feed")
        .scroll_locked(params.modal.is_some())
        .alert(params.alert);
    if loading {
        layout = layout.refresh_after(params.refresh_secs);
    }
    layout.render(content)
}

fn render_header(name: &str) -> Markup {
    html! {
        header class="feed-header" {
            h1 { "CodeLeap Network" }
            div class="feed-user" {
                p { "Logged as " (name) }
                (Button::link("Logout").action("/logout").class("logout"))
            }
        }
    }
}

fn render_create_form(view: &FeedView) -> Markup {
    let draft = &view.draft;
    let label = if view.creating { "Creating..." } else { "Create" };

    let fields = html! {
        h2 { "What's on your mind?" }
        (FormGroup::new(
            "Title",
            "title",
            Input::text("title")
                .id("title")
                .placeholder("Hello World")
                .value(&draft.title)
                .required()
                .render(),
        ))
        (FormGroup::new(
            "Content",
            "content",
            TextArea::new("content")
                .id("content")
                .placeholder("Content here")
                .rows(4)
                .value(&draft.content)
                .required()
                .render(),
        ))
        div class="form-actions" {
            (Button::primary(label)
                .r#type("submit")
                .disabled_if(draft.submit_disabled() || view.creating))
        }
    };

    html! {
        section class="panel create-post" {
            (Form::post("/posts", fields).id("create-form").require_filled())
        }
    }
}

fn render_filters(view: &FeedView) -> Markup {
    let mut sort = Select::new("sort").id("filter").option("", UNSORTED_LABEL);
    for order in SortOrder::ALL {
        sort = sort.option(order.as_str(), order.label());
    }
    let sort = sort.selected_opt(Some(view.filter.sort.map_or("", SortOrder::as_str)));

    let fields = html! {
        div class="filter-row" {
            (FormGroup::new(
                "Search by post title or content",
                "query",
                Input::search("q")
                    .id("query")
                    .placeholder("Beautiful")
                    .value_opt(view.filter.query.as_deref())
                    .render(),
            ))
            (FormGroup::new("Filter by:", "filter", sort.render()))
            div class="form-actions" {
                (Button::outline("Apply").r#type("submit"))
            }
        }
    };

    html! {
        section class="panel filters" {
            h2 { "What about some filters?" }
            (Form::get("/", fields).id("filter-form"))
        }
    }
}

fn render_posts(params: &FeedPageParams<'_>) -> Markup {
    let view = params.view;
    match &view.load {
        LoadState::Idle | LoadState::Loading => html! {
            div class="post-list loading" {
                @for _ in 0..SKELETON_COUNT {
                    (PostSkeleton)
                }
            }
        },
        LoadState::Failed(message) => html! {
            div class="load-failed" {
                p { "Could not load posts: " (message) }
                (Button::primary("Try again").action("/reload"))
            }
        },
        LoadState::Loaded if view.posts.is_empty() => html! {
            (EmptyState::no_posts())
        },
        LoadState::Loaded => html! {
            div class="post-list" {
                @for post in &view.posts {
                    @let card = PostCard::new(post)
                        .owned(post.username == params.name)
                        .deleting(view.deleting.contains(&post.id));
                    @if let Some(now) = params.now {
                        (card.at(now))
                    } @else {
                        (card)
                    }
                }
            }
        },
    }
}
