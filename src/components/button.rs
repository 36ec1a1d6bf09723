//! Button component for the web UI.
//!
//! Renders a plain `<button>`, or, when given an action path, a
//! `<button>` wrapped in its own POST form so it can trigger a state change
//! without JavaScript.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary button (default) - `.btn-primary`
    #[default]
    Primary,
    /// Outline button, used for "Cancel" - `.btn.outline`
    Outline,
    /// Danger button - `.btn-danger`
    Danger,
    /// Success button - `.btn-success`
    Success,
    /// Borderless text button, used in the header
    Link,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn outline",
            Self::Danger => "btn btn-danger",
            Self::Success => "btn btn-success",
            Self::Link => "btn btn-link",
        }
    }
}

/// A configurable button component.
///
/// # Example
///
/// ```ignore
/// use crate::components::button::Button;
///
/// // Submit button for an enclosing form
/// let save = Button::primary("Save").r#type("submit");
///
/// // Self-contained action button
/// let like = Button::link("Like").action("/posts/5/like");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    /// Button label text
    pub label: &'a str,
    /// Button style variant
    pub variant: ButtonVariant,
    /// POST target; renders the button inside its own form when set
    pub action: Option<&'a str>,
    /// Disabled state
    pub disabled: bool,
    /// Button type attribute
    pub r#type: Option<&'a str>,
    /// Additional CSS classes
    pub class: Option<&'a str>,
    /// Element ID
    pub id: Option<&'a str>,
    /// Accessible label, for icon-only buttons
    pub aria_label: Option<&'a str>,
    /// Submits the enclosing form to this path instead of its own action
    pub form_action: Option<&'a str>,
}

impl<'a> Button<'a> {
    /// Creates a new button with the given label and variant.
    #[must_use]
    pub fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            action: None,
            disabled: false,
            r#type: None,
            class: None,
            id: None,
            aria_label: None,
            form_action: None,
        }
    }

    /// Creates a primary button.
    #[must_use]
    pub fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    /// Creates an outline button.
    #[must_use]
    pub fn outline(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Outline)
    }

    /// Creates a danger button.
    #[must_use]
    pub fn danger(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Danger)
    }

    /// Creates a success button.
    #[must_use]
    pub fn success(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Success)
    }

    /// Creates a borderless text button.
    #[must_use]
    pub fn link(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Link)
    }

    /// Posts to `action` when clicked.
    #[must_use]
    pub fn action(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the disabled state.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sets the disabled state from a flag.
    #[must_use]
    pub fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the button type attribute.
    #[must_use]
    pub fn r#type(mut self, r#type: &'a str) -> Self {
        self.r#type = Some(r#type);
        self
    }

    /// Adds additional CSS classes.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Sets the element ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the accessible label.
    #[must_use]
    pub fn aria_label(mut self, label: &'a str) -> Self {
        self.aria_label = Some(label);
        self
    }

    /// Submits the enclosing form to `path`, skipping field validation.
    #[must_use]
    pub fn form_action(mut self, path: &'a str) -> Self {
        self.form_action = Some(path);
        self.r#type = Some("submit");
        self
    }

    /// Builds the full CSS class string.
    fn build_class(&self) -> String {
        let mut classes = self.variant.class().to_string();
        if let Some(extra) = self.class {
            classes.push(' ');
            classes.push_str(extra);
        }
        classes
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let classes = self.build_class();

        if let Some(action) = self.action {
            html! {
                form class="inline-form" method="post" action=(action) {
                    button
                        class=(classes)
                        type="submit"
                        id=[self.id]
                        aria-label=[self.aria_label]
                        disabled[self.disabled]
                    {
                        (self.label)
                    }
                }
            }
        } else {
            html! {
                button
                    class=(classes)
                    type=(self.r#type.unwrap_or("button"))
                    id=[self.id]
                    aria-label=[self.aria_label]
                    formaction=[self.form_action]
                    formnovalidate[self.form_action.is_some()]
                    disabled[self.disabled]
                {
                    (self.label)
                }
            }
        }
    }
}
