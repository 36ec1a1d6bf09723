//! Base layout component for the web UI.
//!
//! Provides the HTML skeleton shared by the login and feed pages.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Keeps each `form[data-require-filled]` submit button disabled while any
/// required field is blank. Buttons with a `formaction` are left alone.
const REQUIRE_FILLED_SCRIPT: &str = r#"(function() {
    document.querySelectorAll('form[data-require-filled]').forEach(function(form) {
        var fields = form.querySelectorAll('[required]');
        var buttons = form.querySelectorAll('button[type="submit"]:not([formaction])');
        function sync() {
            var blank = Array.prototype.some.call(fields, function(field) {
                return field.value.trim() === '';
            });
            buttons.forEach(function(button) { button.disabled = blank; });
        }
        form.addEventListener('input', sync);
        sync();
    });
})();"#;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("Feed")
///     .scroll_locked(modal.scroll_locked())
///     .render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    scroll_locked: bool,
    alert: Option<&'a str>,
    refresh_secs: Option<u64>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub const fn new(title: &'a str) -> Self {
        Self {
            title,
            scroll_locked: false,
            alert: None,
            refresh_secs: None,
        }
    }

    /// Stop the page from scrolling behind an open modal.
    #[must_use]
    pub const fn scroll_locked(mut self, locked: bool) -> Self {
        self.scroll_locked = locked;
        self
    }

    /// Show a blocking browser alert once the page has loaded.
    #[must_use]
    pub const fn alert(mut self, message: Option<&'a str>) -> Self {
        self.alert = message;
        self
    }

    /// Reload the page after `secs` seconds.
    #[must_use]
    pub const fn refresh_after(mut self, secs: u64) -> Self {
        self.refresh_secs = Some(secs);
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    @if let Some(secs) = self.refresh_secs {
                        meta http-equiv="refresh" content=(secs);
                    }
                    title { (self.title) " - CodeLeap Network" }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body class=[self.scroll_locked.then_some("scroll-locked")] {
                    main class="container" {
                        (content)
                    }
                    script { (PreEscaped(REQUIRE_FILLED_SCRIPT)) }
                    @if let Some(message) = self.alert {
                        script { (PreEscaped(alert_script(message))) }
                    }
                }
            }
        }
    }
}

/// Script raising `message` in a browser alert after load.
fn alert_script(message: &str) -> String {
    // A JSON string is a valid JS string literal; `</` must not end the script.
    let literal = serde_json::to_string(message)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    format!("window.addEventListener('load', function() {{ window.alert({literal}); }});")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page").render(content).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains("<title>Test Page - CodeLeap Network</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/css/style.css">"#));
        assert!(html.contains(r#"<main class="container"><h1>Test Content</h1></main>"#));
        assert!(html.contains("form[data-require-filled]"));

        assert!(html.contains("<body>"));
        assert!(!html.contains("http-equiv"));
        assert!(!html.contains("window.alert"));
    }

    #[test]
    fn test_scroll_locked_body() {
        let html = BaseLayout::new("Locked")
            .scroll_locked(true)
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"<body class="scroll-locked">"#));
    }

    #[test]
    fn test_refresh_meta() {
        let html = BaseLayout::new("Loading")
            .refresh_after(2)
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="2">"#));
    }

    #[test]
    fn test_alert_script_is_escaped() {
        let html = BaseLayout::new("Alert")
            .alert(Some(r#"Oops "quoted" </script><b>"#))
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"window.alert("Oops \"quoted\" <\/script><b>")"#));
        assert!(!html.contains("</script><b>"));
    }
}
