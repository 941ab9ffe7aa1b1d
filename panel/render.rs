/// Page renderer for the panel.
///
/// The page is a single template (`panel/assets/panel.html`) with `{{TOKEN}}`
/// placeholders, loaded at compile time.

const TEMPLATE: &str = include_str!("assets/panel.html");

/// What the page should show when it loads.
pub struct PageView<'a> {
    /// Show the start button (nothing has run yet).
    pub show_button: bool,
    /// Attach to the event stream immediately (a run is in progress).
    pub autoconnect: bool,
    /// Show the "run again" form (a run has finished or failed).
    pub show_reset: bool,
    /// Transcript so far, rendered into the panel as-is.
    pub transcript: &'a str,
    pub status: &'a str,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let hide = |show: bool| if show { "" } else { "hidden" };

    let html = TEMPLATE
        .replace("{{BUTTON_HIDE}}", hide(view.show_button))
        .replace("{{RESET_HIDE}}", hide(view.show_reset))
        .replace("{{AUTOCONNECT}}", if view.autoconnect { "true" } else { "false" })
        .replace("{{STATUS}}", &html_escape(view.status))
        .replace("{{TRANSCRIPT}}", &html_escape(view.transcript));

    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` left unsubstituted with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        match html[start..].find("}}") {
            Some(end) => html.replace_range(start..start + end + 2, ""),
            None => break,
        }
    }
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
