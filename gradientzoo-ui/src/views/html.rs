//! Static HTML rendering of view trees.
//!
//! Emits the Bootstrap markup the client bundle styles: a right-aligned
//! `nav-pills` list followed by the masthead.

use std::fmt::Write;

use super::header::{LinkTarget, NavHeader, NavLink, NavSlot};

impl NavHeader {
    pub fn render_html(&self) -> String {
        let mut out = String::with_capacity(512);
        out.push_str(r#"<div class="header clearfix"><nav><ul class="nav nav-pills pull-right">"#);
        for slot in &self.slots {
            render_slot(&mut out, slot);
        }
        out.push_str("</ul></nav>");
        let _ = write!(
            out,
            r#"<h3 class="text-muted">{}</h3></div>"#,
            escape(&self.title)
        );
        out
    }
}

fn render_slot(out: &mut String, slot: &NavSlot) {
    let class = if slot.active { "active" } else { "" };
    let _ = write!(out, r#"<li class="{class}" role="presentation">"#);
    if let Some(link) = &slot.link {
        render_link(out, link);
    }
    out.push_str("</li>");
}

fn render_link(out: &mut String, link: &NavLink) {
    let label = escape(&link.label);
    match &link.target {
        LinkTarget::Route(path) => {
            let _ = write!(out, r#"<a href="{}">{label}</a>"#, escape(path));
        }
        LinkTarget::Message(message) => {
            let _ = write!(
                out,
                r##"<a href="#" data-action="{}">{label}</a>"##,
                message.name()
            );
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use gradientzoo_model::{ApplicationState, Tab, User};

    use super::*;
    use crate::views::header::{NavHeaderProps, view_nav_header};

    #[test]
    fn renders_anonymous_header() {
        let props = NavHeaderProps::from_state(
            &ApplicationState::anonymous(),
            Some(Tab::Login),
        );
        let html = view_nav_header(&props).render_html();

        assert_eq!(
            html,
            concat!(
                r#"<div class="header clearfix"><nav><ul class="nav nav-pills pull-right">"#,
                r#"<li class="" role="presentation"><a href="/">Home</a></li>"#,
                r#"<li class="active" role="presentation"><a href="/login">Login</a></li>"#,
                r#"<li class="" role="presentation"><a href="/register">Sign Up</a></li>"#,
                r#"</ul></nav><h3 class="text-muted">Gradientzoo</h3></div>"#,
            )
        );
    }

    #[test]
    fn renders_logout_as_action_anchor() {
        let state = ApplicationState::logged_in_as(User::new("u1", "alice"));
        let html =
            view_nav_header(&NavHeaderProps::from_state(&state, None)).render_html();

        assert!(html.contains(r##"<a href="#" data-action="logout">Logout</a>"##));
        assert!(html.contains(r#"<a href="/alice">alice</a>"#));
        assert!(html.contains(r#"<li class="" role="presentation"></li>"#));
    }

    #[test]
    fn escapes_usernames() {
        let state =
            ApplicationState::logged_in_as(User::new("u1", r#"<b>"bob"&co</b>"#));
        let html =
            view_nav_header(&NavHeaderProps::from_state(&state, None)).render_html();

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;&quot;bob&quot;&amp;co&lt;/b&gt;"));
    }
}
