//! Form components for maud templates.
//!
//! Thin wrappers over the native form elements, matching the styles in
//! `static/css/style.css`. A [`Form`] marked with
//! [`Form::require_filled`] keeps its submit button disabled while any
//! `required` field is blank; the toggle runs in the layout script.

use maud::{html, Markup, Render};

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    /// Form content (inputs, buttons, etc.)
    pub content: Markup,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Optional form ID
    pub id: Option<&'a str>,
    /// Disable submit while a required field is blank
    pub require_filled: bool,
}

impl<'a> Form<'a> {
    /// Create a new form with the given action and method.
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
            id: None,
            require_filled: false,
        }
    }

    /// Create a POST form.
    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    /// Create a GET form.
    #[must_use]
    pub fn get(action: &'a str, content: Markup) -> Self {
        Self::new(action, "get", content)
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the form ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Keep the submit button disabled while a required field is blank.
    #[must_use]
    pub fn require_filled(mut self) -> Self {
        self.require_filled = true;
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form
                action=(self.action)
                method=(self.method)
                class=[self.class]
                id=[self.id]
                data-require-filled=[self.require_filled.then_some("true")]
            {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    /// Input name attribute
    pub name: &'a str,
    /// Input type ("text", "search", ...)
    pub r#type: &'a str,
    /// Current value
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Whether the field is required
    pub required: bool,
    /// Whether the field is disabled
    pub disabled: bool,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Autocomplete attribute
    pub autocomplete: Option<&'a str>,
}

impl<'a> Input<'a> {
    /// Create a new input with the given name and type.
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            required: false,
            disabled: false,
            id: None,
            class: None,
            autocomplete: None,
        }
    }

    /// Create a text input.
    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    /// Create a search input.
    #[must_use]
    pub fn search(name: &'a str) -> Self {
        Self::new(name, "search")
    }

    /// Set the value.
    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the value if Some.
    #[must_use]
    pub fn value_opt(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the autocomplete attribute.
    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'a str) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                required[self.required]
                disabled[self.disabled]
                id=[self.id]
                class=[self.class]
                autocomplete=[self.autocomplete];
        }
    }
}

/// A textarea element.
#[derive(Debug)]
pub struct TextArea<'a> {
    /// Textarea name attribute
    pub name: &'a str,
    /// Current value/content
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Number of visible rows
    pub rows: Option<u32>,
    /// Whether the field is required
    pub required: bool,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    /// Create a new textarea with the given name.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            placeholder: None,
            rows: None,
            required: false,
            id: None,
            class: None,
        }
    }

    /// Set the value/content.
    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the number of rows.
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                placeholder=[self.placeholder]
                rows=[self.rows]
                required[self.required]
                id=[self.id]
                class=[self.class]
            {
                @if let Some(value) = self.value {
                    (value)
                }
            }
        }
    }
}

/// A select dropdown element.
#[derive(Debug)]
pub struct Select<'a> {
    /// Select name attribute
    pub name: &'a str,
    /// Available options
    pub options: Vec<SelectOption<'a>>,
    /// Currently selected value
    pub selected: Option<&'a str>,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> Select<'a> {
    /// Create a new select with the given name.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            options: Vec::new(),
            selected: None,
            id: None,
            class: None,
        }
    }

    /// Add a single option.
    #[must_use]
    pub fn option(mut self, value: &'a str, label: &'a str) -> Self {
        self.options.push(SelectOption { value, label });
        self
    }

    /// Set the selected value if Some.
    #[must_use]
    pub fn selected_opt(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Select<'_> {
    fn render(&self) -> Markup {
        html! {
            select
                name=(self.name)
                id=[self.id]
                class=[self.class]
            {
                @for opt in &self.options {
                    option
                        value=(opt.value)
                        selected[self.selected == Some(opt.value)]
                    {
                        (opt.label)
                    }
                }
            }
        }
    }
}

/// An option for a select element.
#[derive(Debug, Clone)]
pub struct SelectOption<'a> {
    /// Option value
    pub value: &'a str,
    /// Option display label
    pub label: &'a str,
}

/// A form group container for label + input.
#[derive(Debug)]
pub struct FormGroup<'a> {
    /// Label text
    pub label: &'a str,
    /// Input ID (also used for label's `for` attribute)
    pub id: &'a str,
    /// The input element
    pub input: Markup,
    /// Optional CSS class for the container
    pub class: Option<&'a str>,
}

impl<'a> FormGroup<'a> {
    /// Create a new form group.
    #[must_use]
    pub fn new(label: &'a str, id: &'a str, input: Markup) -> Self {
        Self {
            label,
            id,
            input,
            class: None,
        }
    }

    /// Set the container CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class=(self.class.unwrap_or("form-group")) {
                label for=(self.id) { (self.label) }
                (self.input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_render() {
        let content = html! { input type="text" name="title"; };
        let html = Form::post("/posts", content).render().into_string();

        assert!(html.contains(r#"action="/posts""#));
        assert!(html.contains(r#"method="post""#));
        assert!(html.contains(r#"name="title""#));
        assert!(!html.contains("data-require-filled"));
    }

    #[test]
    fn test_form_require_filled() {
        let html = Form::post("/login", html! {})
            .require_filled()
            .id("login-form")
            .render()
            .into_string();

        assert!(html.contains(r#"data-require-filled="true""#));
        assert!(html.contains(r#"id="login-form""#));
    }

    #[test]
    fn test_input_text() {
        let html = Input::text("name")
            .id("name")
            .placeholder("John Doe")
            .required()
            .render()
            .into_string();

        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"name="name""#));
        assert!(html.contains(r#"placeholder="John Doe""#));
        assert!(html.contains("required"));
    }

    #[test]
    fn test_input_value_opt() {
        let html = Input::search("q").value_opt(Some("hello")).render().into_string();
        assert!(html.contains(r#"value="hello""#));

        let html = Input::search("q").value_opt(None).render().into_string();
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_input_escapes_value() {
        let html = Input::text("title")
            .value(r#"<b>"quoted"</b>"#)
            .render()
            .into_string();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_textarea_render() {
        let html = TextArea::new("content")
            .placeholder("Content here")
            .rows(4)
            .value("Hello world")
            .required()
            .render()
            .into_string();

        assert!(html.contains(r#"name="content""#));
        assert!(html.contains(r#"rows="4""#));
        assert!(html.contains("Hello world"));
        assert!(html.contains("required"));
    }

    #[test]
    fn test_select_render() {
        let html = Select::new("sort")
            .option("date_asc", "Date (Newest first)")
            .option("date_desc", "Date (Oldest first)")
            .selected_opt(Some("date_desc"))
            .render()
            .into_string();

        assert!(html.contains(r#"name="sort""#));
        assert!(html.contains(r#"value="date_asc""#));
        assert!(html.contains(r#"value="date_desc" selected"#));
    }

    #[test]
    fn test_form_group_render() {
        let input = Input::text("title").id("title").render();
        let html = FormGroup::new("Title", "title", input).render().into_string();

        assert!(html.contains(r#"class="form-group""#));
        assert!(html.contains(r#"for="title""#));
        assert!(html.contains(r#"id="title""#));
    }
}
