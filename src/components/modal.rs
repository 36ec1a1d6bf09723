//! Modal panel and overlay components.
//!
//! Every dismiss control posts to `/modal/close`, so close actions run on
//! the server. The overlay script adds the Escape key and backdrop click.

use maud::{html, Markup, PreEscaped, Render};

use super::button::Button;
use super::form::{Form, FormGroup, Input, TextArea};
use crate::api::Post;
use crate::feed::submit_disabled;
use crate::modal::Modal;

const CLOSE_PATH: &str = "/modal/close";

/// Submits the close form on Escape, or on a click that lands on the
/// backdrop itself rather than inside the panel.
const DISMISS_SCRIPT: &str = r#"(function() {
    var overlay = document.getElementById('modal-overlay');
    var form = document.getElementById('modal-close-form');
    if (!overlay || !form) return;
    overlay.addEventListener('click', function(e) {
        if (e.target === e.currentTarget) form.submit();
    });
    document.addEventListener('keyup', function(e) {
        if (e.key === 'Escape') form.submit();
    });
})();"#;

/// The content box of a modal.
#[derive(Debug, Clone)]
pub struct ModalPanel<'a> {
    pub modal: &'a Modal,
    /// An edit is in flight
    pub updating: bool,
}

impl<'a> ModalPanel<'a> {
    #[must_use]
    pub const fn new(modal: &'a Modal) -> Self {
        Self {
            modal,
            updating: false,
        }
    }

    #[must_use]
    pub const fn updating(mut self, updating: bool) -> Self {
        self.updating = updating;
        self
    }

    fn render_notice(class: &str, title: Option<&str>, message: &str, button: &str) -> Markup {
        html! {
            div class=(format!("modal-panel {class}")) {
                @if let Some(title) = title {
                    h2 class="modal-title" { (title) }
                }
                p class="modal-message" { (message) }
                div class="modal-actions" {
                    (Button::primary(button).action(CLOSE_PATH))
                }
            }
        }
    }

    fn render_confirm_delete(post_id: i64) -> Markup {
        let confirm = format!("/posts/{post_id}/delete/confirm");
        html! {
            div class="modal-panel confirm" {
                p class="modal-message" { "Are you sure you want to delete this item?" }
                div class="modal-actions" {
                    (Button::outline("Cancel").action(CLOSE_PATH))
                    (Button::danger("Delete").action(&confirm))
                }
            }
        }
    }

    fn render_edit(&self, post: &Post) -> Markup {
        let action = format!("/posts/{}/update", post.id);
        let blank = submit_disabled(&[&post.title, &post.content]);
        let save_label = if self.updating { "Updating..." } else { "Save" };

        let fields = html! {
            (FormGroup::new(
                "Title",
                "edit-title",
                Input::text("title")
                    .id("edit-title")
                    .placeholder("Hello World")
                    .value(&post.title)
                    .required()
                    .render(),
            ))
            (FormGroup::new(
                "Content",
                "edit-content",
                TextArea::new("content")
                    .id("edit-content")
                    .placeholder("Content here")
                    .rows(4)
                    .value(&post.content)
                    .required()
                    .render(),
            ))
            div class="modal-actions" {
                (Button::outline("Cancel").form_action(CLOSE_PATH))
                (Button::success(save_label)
                    .r#type("submit")
                    .disabled_if(blank || self.updating))
            }
        };

        html! {
            div class="modal-panel edit" {
                h2 class="modal-title" { "Edit item" }
                (Form::post(&action, fields).id("edit-form").require_filled())
            }
        }
    }
}

impl Render for ModalPanel<'_> {
    fn render(&self) -> Markup {
        match self.modal {
            Modal::ProvideName => Self::render_notice(
                "error",
                None,
                "You need to provide a username before continue!",
                "Ok, I'll provide",
            ),
            Modal::LoggedIn { name } => Self::render_notice(
                "success",
                Some("Logged in!"),
                &format!("Welcome, {name}!"),
                "Let's go!",
            ),
            Modal::Error { message, button } => {
                Self::render_notice("error", None, message, button)
            }
            Modal::Success {
                title,
                message,
                button,
            } => Self::render_notice("success", title.as_deref(), message, button),
            Modal::ConfirmDelete { post_id } => Self::render_confirm_delete(*post_id),
            Modal::EditPost { post } => self.render_edit(post),
        }
    }
}

/// Backdrop, panel and dismiss handling for the current modal.
#[derive(Debug, Clone)]
pub struct ModalOverlay<'a> {
    pub panel: ModalPanel<'a>,
}

impl<'a> ModalOverlay<'a> {
    #[must_use]
    pub const fn new(panel: ModalPanel<'a>) -> Self {
        Self { panel }
    }
}

impl Render for ModalOverlay<'_> {
    fn render(&self) -> Markup {
        html! {
            div id="modal-overlay" class="modal-overlay" role="dialog" aria-modal="true" {
                form id="modal-close-form" method="post" action=(CLOSE_PATH) {}
                (self.panel)
            }
            script { (PreEscaped(DISMISS_SCRIPT)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: 9,
            username: "ana".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            created_datetime: "2024-01-01T00:00:00Z".parse().unwrap(),
            liked: false,
        }
    }

    #[test]
    fn test_provide_name_panel() {
        let html = ModalPanel::new(&Modal::ProvideName).render().into_string();
        assert!(html.contains("You need to provide a username before continue!"));
        assert!(html.contains("Ok, I&#39;ll provide") || html.contains("Ok, I'll provide"));
        assert!(html.contains(r#"action="/modal/close""#));
    }

    #[test]
    fn test_logged_in_panel_greets_user() {
        let modal = Modal::LoggedIn {
            name: "Ana".to_string(),
        };
        let html = ModalPanel::new(&modal).render().into_string();
        assert!(html.contains("Logged in!"));
        assert!(html.contains("Welcome, Ana!"));
        assert!(html.contains("Let&#39;s go!") || html.contains("Let's go!"));
    }

    #[test]
    fn test_success_panel_title_is_optional() {
        let html = ModalPanel::new(&Modal::post_created()).render().into_string();
        assert!(!html.contains("modal-title"));
        assert!(html.contains("Post successfully created!"));

        let html = ModalPanel::new(&Modal::post_deleted()).render().into_string();
        assert!(html.contains("Deleted!"));
    }

    #[test]
    fn test_confirm_delete_panel() {
        let html = ModalPanel::new(&Modal::ConfirmDelete { post_id: 3 })
            .render()
            .into_string();
        assert!(html.contains("Are you sure you want to delete this item?"));
        assert!(html.contains(r#"action="/posts/3/delete/confirm""#));
        assert!(html.contains("Cancel"));
    }

    #[test]
    fn test_edit_panel_prefills_post() {
        let modal = Modal::EditPost { post: post() };
        let html = ModalPanel::new(&modal).render().into_string();
        assert!(html.contains("Edit item"));
        assert!(html.contains(r#"action="/posts/9/update""#));
        assert!(html.contains(r#"value="Hello""#));
        assert!(html.contains("World</textarea>"));
        assert!(html.contains(">Save</button>"));
    }

    #[test]
    fn test_edit_panel_while_updating() {
        let modal = Modal::EditPost { post: post() };
        let html = ModalPanel::new(&modal).updating(true).render().into_string();
        assert!(html.contains("Updating..."));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_overlay_has_close_form_and_script() {
        let modal = Modal::unknown_error();
        let html = ModalOverlay::new(ModalPanel::new(&modal))
            .render()
            .into_string();
        assert!(html.contains(r#"id="modal-close-form""#));
        assert!(html.contains("e.target === e.currentTarget"));
        assert!(html.contains("'Escape'"));
    }
}
