//! Login page.

use maud::{html, Markup, Render};

use crate::components::{BaseLayout, Button, Form, FormGroup, Input, ModalOverlay, ModalPanel};
use crate::modal::Modal;

/// Render the login page, with `modal` on top if one is showing.
///
/// # Example
///
/// ```ignore
/// let page = render_login_page(state.modal.current().as_ref());
/// ```
#[must_use]
pub fn render_login_page(modal: Option<&Modal>) -> Markup {
    let fields = html! {
        (FormGroup::new(
            "Please enter your username",
            "login-name",
            Input::text("name")
                .id("login-name")
                .placeholder("John Doe")
                .autocomplete("username")
                .required()
                .render(),
        ))
        div class="form-actions" {
            (Button::primary("ENTER").r#type("submit").disabled())
        }
    };

    let content = html! {
        section class="login-card" {
            h1 { "Welcome to CodeLeap network!" }
            (Form::post("/login", fields).id("login-form").require_filled())
        }
        @if let Some(modal) = modal {
            (ModalOverlay::new(ModalPanel::new(modal)))
        }
    };

    BaseLayout::new("Login")
        .scroll_locked(modal.is_some())
        .render(content)
}
