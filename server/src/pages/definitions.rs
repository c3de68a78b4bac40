use common::models::{Definition, METHODS};
use leptos::{either::Either, prelude::*};
use templates::{
    autosubmit_checkbox, confirm_form, method_badge, pagination_nav, Breadcrumb, Page, Pagination,
    Toast,
};

use crate::pages::display_name;
use crate::state::{ListState, PAGE_SIZES};

/// The whole list page, derived from the session state. Pure: rendering
/// never mutates state, so every render of the same state is identical.
pub fn render_list(state: &ListState, toasts: Vec<Toast>) -> String {
    let view = state.page_view();
    let total = view.total;
    let all_selected = state.all_page_selected();
    let selected_count = state.selected.len();
    let pagination = Pagination::new(view.page, total, state.page_size, "/definitions");

    let rows: Vec<AnyView> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, def)| {
            render_row(
                def,
                view.start_index + i + 1,
                state.expanded.contains(&def.id),
                state.editing.contains(&def.id),
                state.selected.contains(&def.id),
            )
        })
        .collect();

    let batch_label = if selected_count > 0 {
        format!("Delete selected ({})", selected_count)
    } else {
        "Delete selected".to_string()
    };
    let search_value = state.search.clone();
    let method_filter = state.method_filter.clone();
    let page_size = state.page_size;

    let content = view! {
        <div class="toolbar">
            <form method="POST" action="/definitions/new">
                <button type="submit">"New Definition"</button>
            </form>
            {confirm_form(
                "/definitions/batch-delete",
                &batch_label,
                "Delete the selected definitions?",
                selected_count == 0,
            )}
            {confirm_form(
                "/definitions/refresh",
                "Refresh",
                "Reload from the store? Unsaved rows are discarded.",
                false,
            )}
            <form method="GET" action="/definitions">
                <input type="text" name="search" value={search_value} placeholder="Search name or URL"/>
                <select name="method" data-autosubmit="1">
                    <option value="" selected={method_filter.is_empty()}>"All methods"</option>
                    {METHODS.iter().map(|m| {
                        let m = m.to_string();
                        let chosen = m == method_filter;
                        view! { <option value={m.clone()} selected={chosen}>{m.clone()}</option> }
                    }).collect::<Vec<_>>()}
                </select>
                <button type="submit">"Filter"</button>
            </form>
        </div>
        <form id="reorder-form" method="POST" action="/definitions/reorder">
            <input type="hidden" name="dragged" value=""/>
            <input type="hidden" name="target" value=""/>
        </form>
        {if total == 0 {
            Either::Left(view! {
                <div class="empty-state">
                    "No definitions match. Create one with \"New Definition\"."
                </div>
            })
        } else {
            Either::Right(view! {
                <div class="def-header">
                    <div>{autosubmit_checkbox("/definitions/select-page", !all_selected, all_selected)}</div>
                    <div>"#"</div>
                    <div></div>
                    <div></div>
                    <div>"Name"</div>
                    <div>"Method"</div>
                    <div>"URL"</div>
                    <div>"Headers"</div>
                    <div>"Response"</div>
                    <div>"Updated"</div>
                    <div>"Actions"</div>
                </div>
                {rows}
            })
        }}
        <div class="pagination">
            {pagination_nav(&pagination)}
            <form method="GET" action="/definitions">
                <label>"Per page "</label>
                <select name="page_size" data-autosubmit="1">
                    {PAGE_SIZES.iter().map(|&n| {
                        view! { <option value={n.to_string()} selected={n == page_size}>{n}</option> }
                    }).collect::<Vec<_>>()}
                </select>
            </form>
        </div>
    };

    Page {
        title: "Mock Admin - Definitions".to_string(),
        breadcrumbs: vec![Breadcrumb::current("Definitions")],
        toasts,
        content,
    }
    .render()
}

fn render_row(
    def: &Definition,
    index: usize,
    expanded: bool,
    editing: bool,
    selected: bool,
) -> AnyView {
    let id = def.id.clone();
    let name = display_name(def);
    let url = if def.url.is_empty() {
        "/".to_string()
    } else {
        def.url.clone()
    };
    let headers_preview = format!("{} headers", def.headers.len());
    let response_preview = format!("{} chars", def.response_body.chars().count());
    let updated = if def.updated_at.is_empty() {
        "-".to_string()
    } else {
        def.updated_at.clone()
    };
    let headers_href = format!("/definitions/{}/headers", id);
    let body_href = format!("/definitions/{}/body", id);
    let logs_href = format!("/definitions/{}/logs", id);
    let toggle_action = format!("/definitions/{}/toggle", id);
    let edit_action = format!("/definitions/{}/edit", id);
    let select_action = format!("/definitions/{}/select", id);
    let delete_action = format!("/definitions/{}/delete", id);
    let save_form_id = format!("edit-{}", id);
    let expand_label = if expanded { "▼" } else { "▶" };
    let detail_class = if expanded {
        "detail-panel show"
    } else {
        "detail-panel"
    };

    // the save button submits the detail form even while the panel is shown
    // elsewhere in the row
    let edit_button = if editing {
        Either::Left(view! {
            <button type="submit" form={save_form_id}>"Save"</button>
        })
    } else {
        Either::Right(view! {
            <form method="POST" action={edit_action}>
                <button type="submit">"Edit"</button>
            </form>
        })
    };

    view! {
        <div class="def-item" data-id={id.clone()}>
            <div class="def-row">
                <div>{autosubmit_checkbox(&select_action, !selected, selected)}</div>
                <span class="row-index">{index}</span>
                <span class="drag-handle" draggable="true" data-id={id.clone()} title="Drag to reorder">"⋮⋮"</span>
                <form method="POST" action={toggle_action}>
                    <button type="submit" class="expand-btn">{expand_label}</button>
                </form>
                <div class="def-name" title={def.name.clone()}>{name}</div>
                {method_badge(&def.method)}
                <div class="def-url" title={def.url.clone()}>{url}</div>
                <a class="preview-link" href={headers_href}>{headers_preview}</a>
                <a class="preview-link" href={body_href}>{response_preview}</a>
                <div class="def-updated">{updated}</div>
                <div class="actions">
                    {edit_button}
                    " "
                    <a href={logs_href}>"Logs"</a>
                    " "
                    {confirm_form(&delete_action, "Delete", "Delete this definition?", false)}
                </div>
            </div>
            <div class={detail_class}>{render_detail(def, editing)}</div>
        </div>
    }
    .into_any()
}

fn render_detail(def: &Definition, editing: bool) -> AnyView {
    let form_id = format!("edit-{}", def.id);
    let action = format!("/definitions/{}/save", def.id);
    let disabled = !editing;
    // a freshly created draft gets the cursor
    let autofocus = editing && def.is_provisional();
    let headers_json =
        serde_json::to_string_pretty(&def.headers).unwrap_or_else(|_| "{}".to_string());
    let name = def.name.clone();
    let url = def.url.clone();
    let method = def.method.clone();
    let response_body = def.response_body.clone();

    view! {
        <form id={form_id} method="POST" action={action} class="detail-grid">
            <div class="detail-group">
                <label>"Name"</label>
                <input type="text" name="name" value={name} disabled={disabled}
                    autofocus={autofocus} placeholder="Service name"/>
            </div>
            <div class="detail-group">
                <label>"Method"</label>
                <select name="method" disabled={disabled}>
                    {METHODS.iter().map(|m| {
                        let m = m.to_string();
                        let chosen = m == method;
                        view! { <option value={m.clone()} selected={chosen}>{m.clone()}</option> }
                    }).collect::<Vec<_>>()}
                </select>
            </div>
            <div class="detail-group full">
                <label>"URL"</label>
                <input type="text" name="url" value={url} disabled={disabled} placeholder="/api/example"/>
            </div>
            <div class="detail-group full">
                <label>"Headers (JSON)"</label>
                <textarea name="headers" disabled={disabled}>{headers_json}</textarea>
            </div>
            <div class="detail-group full">
                <label>"Response body"</label>
                <textarea name="response_body" disabled={disabled}>{response_body}</textarea>
            </div>
        </form>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn def(id: &str, name: &str, method: &str, url: &str) -> Definition {
        Definition {
            id: id.to_string(),
            name: name.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            headers: HashMap::from([("Accept".to_string(), "application/json".to_string())]),
            response_body: r#"{"ok":true}"#.to_string(),
            updated_at: "2025-03-01 09:30:00".to_string(),
        }
    }

    fn state_with(defs: Vec<Definition>) -> ListState {
        let mut state = ListState::new(10, "{}".to_string());
        state.replace_all(defs);
        state
    }

    #[test]
    fn list_renders_rows_with_previews() {
        let state = state_with(vec![def("a", "Users", "POST", "/users")]);
        let html = render_list(&state, vec![]);
        assert!(html.contains("Users"));
        assert!(html.contains("method-badge method-POST"));
        assert!(html.contains("/users"));
        assert!(html.contains("1 headers"));
        assert!(html.contains("11 chars"));
        assert!(html.contains("2025-03-01 09:30:00"));
        assert!(html.contains(r#"href="/definitions/a/logs""#));
    }

    #[test]
    fn list_empty_state() {
        let state = state_with(vec![]);
        let html = render_list(&state, vec![]);
        assert!(html.contains("No definitions match"));
        assert!(!html.contains("def-header"));
    }

    #[test]
    fn unnamed_row_renders_placeholders() {
        let state = state_with(vec![def("a", "", "GET", "")]);
        let html = render_list(&state, vec![]);
        assert!(html.contains("(unnamed)"));
        assert!(html.contains(r#"class="def-url""#));
    }

    #[test]
    fn collapsed_row_hides_detail_panel() {
        let state = state_with(vec![def("a", "Users", "GET", "/users")]);
        let html = render_list(&state, vec![]);
        assert!(html.contains(r#"class="detail-panel""#));
        assert!(!html.contains("detail-panel show"));
    }

    #[test]
    fn expanded_row_shows_detail_panel() {
        let mut state = state_with(vec![def("a", "Users", "GET", "/users")]);
        state.toggle_expanded("a");
        let html = render_list(&state, vec![]);
        assert!(html.contains("detail-panel show"));
    }

    #[test]
    fn readonly_row_disables_inputs_and_offers_edit() {
        let mut state = state_with(vec![def("a", "Users", "GET", "/users")]);
        state.toggle_expanded("a");
        let html = render_list(&state, vec![]);
        assert!(html.contains("disabled"));
        assert!(html.contains(r#"action="/definitions/a/edit""#));
        assert!(!html.contains(">Save<"));
    }

    #[test]
    fn editing_row_enables_inputs_and_offers_save() {
        let mut state = state_with(vec![def("a", "Users", "GET", "/users")]);
        state.start_editing("a");
        let html = render_list(&state, vec![]);
        assert!(html.contains(r#"form="edit-a""#));
        assert!(html.contains(">Save<"));
        assert!(html.contains(r#"action="/definitions/a/save""#));
    }

    #[test]
    fn fresh_draft_name_input_autofocuses() {
        let mut state = state_with(vec![]);
        state.create_draft();
        let html = render_list(&state, vec![]);
        assert!(html.contains("autofocus"));
    }

    #[test]
    fn saved_row_in_edit_mode_does_not_autofocus() {
        let mut state = state_with(vec![def("a", "Users", "GET", "/users")]);
        state.start_editing("a");
        let html = render_list(&state, vec![]);
        assert!(!html.contains("autofocus"));
    }

    #[test]
    fn select_all_checkbox_reflects_page_selection() {
        let mut state = state_with(vec![def("a", "A", "GET", "/a"), def("b", "B", "GET", "/b")]);
        let html = render_list(&state, vec![]);
        // unchecked: the next state posted is "select"
        assert!(html.contains(r#"action="/definitions/select-page""#));
        assert!(html.contains(r#"value="1""#));

        state.set_page_selection(true);
        let html = render_list(&state, vec![]);
        assert!(html.contains(r#"value="0""#));
    }

    #[test]
    fn batch_delete_disabled_until_selection() {
        let mut state = state_with(vec![def("a", "A", "GET", "/a")]);
        let html = render_list(&state, vec![]);
        assert!(html.contains("Delete selected"));
        assert!(!html.contains("Delete selected (1)"));

        state.toggle_selected("a", true);
        let html = render_list(&state, vec![]);
        assert!(html.contains("Delete selected (1)"));
    }

    #[test]
    fn method_filter_select_marks_current_choice() {
        let mut state = state_with(vec![def("a", "A", "GET", "/a")]);
        state.set_method_filter("PUT");
        let html = render_list(&state, vec![]);
        assert!(html.contains(r#"value="PUT" selected"#));
    }

    #[test]
    fn second_page_rows_keep_global_indexes() {
        let defs: Vec<Definition> = (1..=12)
            .map(|i| def(&format!("d{i}"), &format!("Def {i}"), "GET", &format!("/d{i}")))
            .collect();
        let mut state = state_with(defs);
        state.goto_page(2);
        let html = render_list(&state, vec![]);
        assert!(html.contains(r#"<span class="row-index">11</span>"#));
        assert!(!html.contains(r#"<span class="row-index">1</span>"#));
    }

    #[test]
    fn toasts_appear_on_the_page() {
        let state = state_with(vec![]);
        let html = render_list(&state, vec![Toast::error("Save failed: boom")]);
        assert!(html.contains("Save failed: boom"));
        assert!(html.contains("toast-error"));
    }
}
