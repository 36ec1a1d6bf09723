//! Maud HTML template components for the web UI.
//!
//! Components are organized into submodules by functionality:
//!
//! - `layout`: Base page layout
//! - `button`: Buttons, including self-contained POST action buttons
//! - `form`: Form elements and input components
//! - `card`: Post cards, loading skeletons and the empty state
//! - `modal`: Modal panels and the overlay that hosts them
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{BaseLayout, Button, Input};
//!
//! fn my_page() -> Markup {
//!     let content = html! {
//!         h1 { "Hello World" }
//!         (Input::text("name").placeholder("John Doe"))
//!         (Button::primary("ENTER").r#type("submit"))
//!     };
//!     BaseLayout::new("My Page").render(content)
//! }
//! ```

pub mod button;
pub mod card;
pub mod form;
pub mod layout;
pub mod modal;

// Re-export layout components
pub use layout::BaseLayout;

// Re-export button components
pub use button::{Button, ButtonVariant};

// Re-export card components
pub use card::{highlight_mentions, EmptyState, PostCard, PostSkeleton};

// Re-export form components
pub use form::{Form, FormGroup, Input, Select, SelectOption, TextArea};

// Re-export modal components
pub use modal::{ModalOverlay, ModalPanel};
