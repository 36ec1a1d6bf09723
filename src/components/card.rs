//! Card components for displaying posts.

use chrono::{DateTime, Utc};
use maud::{html, Markup, Render};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::Post;
use crate::components::button::Button;
use crate::time_utils::{relative_time, relative_to_now};

/// `@` followed by letters, digits, `.` or `/`.
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)@[a-z0-9./]+").unwrap());

/// Render one line of post content with `@mentions` highlighted.
#[must_use]
pub fn highlight_mentions(line: &str) -> Markup {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in MENTION.find_iter(line) {
        segments.push((&line[last..m.start()], m.as_str()));
        last = m.end();
    }
    let rest = &line[last..];

    html! {
        @for &(text, mention) in &segments {
            (text)
            span class="mention" { (mention) }
        }
        (rest)
    }
}

/// A post card.
///
/// Edit and delete controls are shown only to the post's author.
///
/// # Example
///
/// ```ignore
/// use crate::components::card::PostCard;
///
/// let card = PostCard::new(&post).owned(post.username == name);
/// ```
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub owned: bool,
    /// A delete of this post is in flight
    pub deleting: bool,
    /// Reference time for the relative timestamp
    pub now: Option<DateTime<Utc>>,
}

impl<'a> PostCard<'a> {
    /// Create a new post card.
    #[must_use]
    pub const fn new(post: &'a Post) -> Self {
        Self {
            post,
            owned: false,
            deleting: false,
            now: None,
        }
    }

    #[must_use]
    pub const fn owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    #[must_use]
    pub const fn deleting(mut self, deleting: bool) -> Self {
        self.deleting = deleting;
        self
    }

    /// Render timestamps relative to `now` instead of the current time.
    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn render_controls(&self) -> Markup {
        let id = self.post.id;
        let delete = format!("/posts/{id}/delete");
        let edit = format!("/posts/{id}/edit");
        html! {
            div class="post-actions" {
                @if !self.deleting {
                    (Button::link("Delete")
                        .action(&delete)
                        .class("post-delete")
                        .aria_label("Delete post"))
                }
                (Button::link("Edit")
                    .action(&edit)
                    .class("post-edit")
                    .aria_label("Edit post"))
            }
        }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let when = self.now.map_or_else(
            || relative_to_now(post.created_datetime),
            |now| relative_time(now, post.created_datetime),
        );
        let like = format!("/posts/{}/like", post.id);
        let (like_label, like_class) = if post.liked {
            ("Liked", "like liked")
        } else {
            ("Like", "like")
        };

        html! {
            article class="post-card" id=(format!("post-{}", post.id)) {
                header class="post-header" {
                    h2 { (post.title) }
                    @if self.owned {
                        (self.render_controls())
                    }
                }
                div class="post-body" {
                    p class="post-meta" {
                        span class="post-author" { "@" (post.username) }
                        time class="post-time" datetime=(post.created_datetime.to_rfc3339()) {
                            (when)
                        }
                    }
                    div class="post-content" {
                        @for line in post.content.lines() {
                            p { (highlight_mentions(line)) }
                        }
                    }
                    footer class="post-footer" {
                        (Button::link(like_label).action(&like).class(like_class))
                    }
                }
            }
        }
    }
}

/// Placeholder card shown while posts load.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostSkeleton;

impl Render for PostSkeleton {
    fn render(&self) -> Markup {
        html! {
            article class="post-card skeleton" aria-busy="true" {
                header class="post-header" {
                    div class="skeleton-bar skeleton-title" {}
                }
                div class="post-body" {
                    div class="skeleton-bar skeleton-meta" {}
                    div class="skeleton-bar" {}
                    div class="skeleton-bar" {}
                    div class="skeleton-bar skeleton-short" {}
                }
            }
        }
    }
}

/// An empty state component for when there are no posts.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    /// Create a new empty state.
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Create a default "no posts" empty state.
    #[must_use]
    pub const fn no_posts() -> Self {
        Self {
            message: "There's no posts created yet =(",
        }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn post() -> Post {
        Post {
            id: 5,
            username: "ana".to_string(),
            title: "My title".to_string(),
            content: "first line\nhi @bob.smith and @x/y".to_string(),
            created_datetime: "2024-06-12T12:00:00Z".parse().unwrap(),
            liked: false,
        }
    }

    #[test]
    fn test_highlight_mentions() {
        let html = highlight_mentions("hi @bob.smith, meet @Ann").into_string();
        assert_eq!(
            html,
            r#"hi <span class="mention">@bob.smith</span>, meet <span class="mention">@Ann</span>"#
        );
    }

    #[test]
    fn test_highlight_mentions_escapes_text() {
        let html = highlight_mentions("<b>@x</b>").into_string();
        assert!(html.starts_with("&lt;b&gt;"));
        assert!(html.contains(r#"<span class="mention">@x</span>"#));
    }

    #[test]
    fn test_post_card_defaults_to_current_time() {
        let post = Post {
            created_datetime: Utc::now() - Duration::days(2),
            ..post()
        };
        let html = PostCard::new(&post).render().into_string();
        assert!(html.contains("2 days ago"));
    }

    #[test]
    fn test_post_card_renders_content_by_line() {
        let post = post();
        let now = post.created_datetime + Duration::days(3);
        let html = PostCard::new(&post).at(now).render().into_string();

        assert!(html.contains("<h2>My title</h2>"));
        assert!(html.contains("@ana"));
        assert!(html.contains("3 days ago"));
        assert!(html.contains("<p>first line</p>"));
        assert!(html.contains(r#"<span class="mention">@x/y</span>"#));
        assert!(html.contains(r#"action="/posts/5/like""#));
    }

    #[test]
    fn test_controls_only_for_owner() {
        let post = post();
        let html = PostCard::new(&post).render().into_string();
        assert!(!html.contains("/posts/5/delete"));
        assert!(!html.contains("/posts/5/edit"));

        let html = PostCard::new(&post).owned(true).render().into_string();
        assert!(html.contains(r#"action="/posts/5/delete""#));
        assert!(html.contains(r#"action="/posts/5/edit""#));
    }

    #[test]
    fn test_delete_hidden_while_deleting() {
        let post = post();
        let html = PostCard::new(&post)
            .owned(true)
            .deleting(true)
            .render()
            .into_string();
        assert!(!html.contains(r#"action="/posts/5/delete""#));
        assert!(html.contains(r#"action="/posts/5/edit""#));
    }

    #[test]
    fn test_liked_class() {
        let mut post = post();
        post.liked = true;
        let html = PostCard::new(&post).render().into_string();
        assert!(html.contains("like liked"));
        assert!(html.contains(">Liked</button>"));
    }

    #[test]
    fn test_empty_state() {
        let html = EmptyState::no_posts().render().into_string();
        assert!(html.contains("There's no posts created yet =("));
    }

    #[test]
    fn test_skeleton() {
        let html = PostSkeleton.render().into_string();
        assert!(html.contains("skeleton"));
        assert!(html.contains(r#"aria-busy="true""#));
    }
}
