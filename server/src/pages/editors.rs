use common::models::Definition;
use leptos::prelude::*;
use templates::{Breadcrumb, Page, Toast};

use crate::pages::display_name;

/// Focused editor for one definition's headers JSON.
pub fn render_headers_editor(def: &Definition, content: &str, toasts: Vec<Toast>) -> String {
    editor_page(
        def,
        "Headers",
        "headers",
        "Response headers as a JSON object of name/value strings.",
        content,
        toasts,
    )
}

/// Focused editor for one definition's raw response body.
pub fn render_body_editor(def: &Definition, content: &str, toasts: Vec<Toast>) -> String {
    editor_page(
        def,
        "Response body",
        "body",
        "Raw response text. Format only applies when the content is valid JSON.",
        content,
        toasts,
    )
}

fn editor_page(
    def: &Definition,
    field: &str,
    slug: &str,
    hint: &str,
    content: &str,
    toasts: Vec<Toast>,
) -> String {
    let name = display_name(def);
    let format_action = format!("/definitions/{}/{}/format", def.id, slug);
    let save_action = format!("/definitions/{}/{}/save", def.id, slug);
    let hint = hint.to_string();
    let content = content.to_string();

    let body = view! {
        <p class="editor-hint">{hint}</p>
        <form method="POST" action={save_action}>
            <textarea name="content" class="editor-textarea">{content}</textarea>
            <div class="toolbar">
                <button type="submit" formaction={format_action}>"Format"</button>
                <button type="submit">"Save"</button>
                <a href="/definitions">"Cancel"</a>
            </div>
        </form>
    };

    Page {
        title: format!("Mock Admin - {} - {}", name, field),
        breadcrumbs: vec![
            Breadcrumb::link("Definitions", "/definitions"),
            Breadcrumb::current(format!("{} · {}", name, field)),
        ],
        toasts,
        content: body,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn def() -> Definition {
        Definition {
            id: "a1".to_string(),
            name: "Users".to_string(),
            method: "GET".to_string(),
            url: "/users".to_string(),
            headers: HashMap::new(),
            response_body: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn headers_editor_targets_headers_routes() {
        let html = render_headers_editor(&def(), "{\n  \"Accept\": \"application/json\"\n}", vec![]);
        assert!(html.contains(r#"action="/definitions/a1/headers/save""#));
        assert!(html.contains(r#"formaction="/definitions/a1/headers/format""#));
        assert!(html.contains("Accept"));
        assert!(html.contains("Users"));
    }

    #[test]
    fn body_editor_targets_body_routes() {
        let html = render_body_editor(&def(), r#"{"ok":true}"#, vec![]);
        assert!(html.contains(r#"action="/definitions/a1/body/save""#));
        assert!(html.contains(r#"formaction="/definitions/a1/body/format""#));
    }

    #[test]
    fn editor_escapes_content() {
        let html = render_body_editor(&def(), "<script>alert(1)</script>", vec![]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn editor_shows_toasts() {
        let html =
            render_headers_editor(&def(), "{", vec![Toast::error("Cannot format invalid JSON")]);
        assert!(html.contains("Cannot format invalid JSON"));
        assert!(html.contains("toast-error"));
    }
}
