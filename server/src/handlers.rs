use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use actix_web::{web, HttpResponse};

use common::models::{Definition, METHODS};

use crate::pages;
use crate::state::ListState;

/// Where the definition store lives.
pub struct StoreTarget {
    pub base_url: String,
}

type State = web::Data<Mutex<ListState>>;
type Client = web::Data<reqwest::Client>;
type Target = web::Data<StoreTarget>;
type Form = web::Form<HashMap<String, String>>;

// A panic while holding the guard must not wedge the session for good.
fn locked(state: &State) -> MutexGuard<'_, ListState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.into()))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(body)
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body("Definition not found")
}

/// Replace the local collection with the store's, or queue an error toast
/// and keep what we have.
async fn reload(state: &State, client: &reqwest::Client, base: &str) -> bool {
    match store::list_definitions(client, base).await {
        Ok(defs) => {
            locked(state).replace_all(defs);
            true
        }
        Err(e) => {
            log::error!("loading definitions failed: {:#}", e);
            locked(state).toast_error(format!("Load failed: {:#}", e));
            false
        }
    }
}

/// Upsert one definition and fold the store's representation back into the
/// session state.
async fn push_save(
    state: &State,
    client: &reqwest::Client,
    base: &str,
    pre_save_id: &str,
    def: &Definition,
) -> anyhow::Result<()> {
    let saved = store::save_definition(client, base, def).await?;
    let mut s = locked(state);
    s.apply_saved(pre_save_id, saved);
    s.toast_success("Saved");
    Ok(())
}

pub async fn index() -> HttpResponse {
    redirect("/definitions")
}

/// The list page. Query parameters are the filter/pagination events: a
/// `search` submit resets to page one, `page_size` resets to page one, and
/// `page` only navigates.
pub async fn definitions_page(
    state: State,
    query: web::Query<HashMap<String, String>>,
    client: Client,
    target: Target,
) -> HttpResponse {
    let needs_load = !locked(&state).loaded;
    if needs_load {
        reload(&state, &client, &target.base_url).await;
    }

    let mut s = locked(&state);
    if let Some(search) = query.get("search") {
        s.set_search(search);
        s.set_method_filter(query.get("method").map(String::as_str).unwrap_or(""));
    }
    if let Some(size) = query.get("page_size").and_then(|v| v.parse().ok()) {
        s.set_page_size(size);
    }
    if let Some(page) = query.get("page").and_then(|v| v.parse().ok()) {
        s.goto_page(page);
    }
    let toasts = s.take_toasts();
    html(pages::definitions::render_list(&s, toasts))
}

pub async fn refresh(state: State, client: Client, target: Target) -> HttpResponse {
    if reload(&state, &client, &target.base_url).await {
        let mut s = locked(&state);
        let count = s.definitions.len();
        s.toast_info(format!("Reloaded {} definitions", count));
    }
    redirect("/definitions")
}

pub async fn create_definition(state: State) -> HttpResponse {
    let id = locked(&state).create_draft();
    log::debug!("created draft {}", id);
    redirect("/definitions")
}

pub async fn toggle_row(state: State, path: web::Path<String>) -> HttpResponse {
    locked(&state).toggle_expanded(&path.into_inner());
    redirect("/definitions")
}

pub async fn edit_row(state: State, path: web::Path<String>) -> HttpResponse {
    locked(&state).start_editing(&path.into_inner());
    redirect("/definitions")
}

/// Decode an inline save form. Headers must parse as a JSON object before
/// anything else is checked; a definition with no name or no url is never
/// sent to the store. Unknown methods fall back to GET.
fn definition_from_form(
    id: &str,
    form: &HashMap<String, String>,
    updated_at: String,
) -> Result<Definition, String> {
    let headers_raw = form.get("headers").map(String::as_str).unwrap_or("{}");
    let headers: HashMap<String, String> = serde_json::from_str(headers_raw)
        .map_err(|e| format!("Headers are not a valid JSON object: {}", e))?;

    let name = form.get("name").cloned().unwrap_or_default();
    let url = form.get("url").cloned().unwrap_or_default();
    if name.is_empty() || url.is_empty() {
        return Err("Name and URL are required".to_string());
    }

    let method = form.get("method").map(String::as_str).unwrap_or("");
    let method = if METHODS.contains(&method) {
        method.to_string()
    } else {
        "GET".to_string()
    };

    Ok(Definition {
        id: id.to_string(),
        name,
        method,
        url,
        headers,
        response_body: form.get("response_body").cloned().unwrap_or_default(),
        updated_at,
    })
}

/// Save a row from its inline form.
pub async fn save_row(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
    form: Form,
) -> HttpResponse {
    let id = path.into_inner();
    let updated_at = locked(&state)
        .find(&id)
        .map(|d| d.updated_at.clone())
        .unwrap_or_default();
    let def = match definition_from_form(&id, &form, updated_at) {
        Ok(def) => def,
        Err(msg) => {
            locked(&state).toast_error(msg);
            return redirect("/definitions");
        }
    };
    if let Err(e) = push_save(&state, &client, &target.base_url, &id, &def).await {
        log::error!("saving {} failed: {:#}", id, e);
        locked(&state).toast_error(format!("Save failed: {:#}", e));
    }
    redirect("/definitions")
}

pub async fn select_row(state: State, path: web::Path<String>, form: Form) -> HttpResponse {
    let checked = form.get("checked").map(String::as_str) == Some("1");
    locked(&state).toggle_selected(&path.into_inner(), checked);
    redirect("/definitions")
}

pub async fn select_page(state: State, form: Form) -> HttpResponse {
    let checked = form.get("checked").map(String::as_str) == Some("1");
    locked(&state).set_page_selection(checked);
    redirect("/definitions")
}

pub async fn delete_row(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match store::delete_definition(&client, &target.base_url, &id).await {
        Ok(()) => {
            let mut s = locked(&state);
            s.forget(&id);
            s.toast_success("Deleted");
        }
        Err(e) => {
            log::error!("deleting {} failed: {:#}", id, e);
            locked(&state).toast_error(format!("Delete failed: {:#}", e));
            return redirect("/definitions");
        }
    }
    reload(&state, &client, &target.base_url).await;
    redirect("/definitions")
}

/// Delete every selected definition, one store call at a time. Failures do
/// not stop the batch; they are reported together at the end.
pub async fn batch_delete(state: State, client: Client, target: Target) -> HttpResponse {
    let ids: Vec<String> = locked(&state).selected.iter().cloned().collect();
    if ids.is_empty() {
        return redirect("/definitions");
    }

    let mut deleted: Vec<String> = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    for id in &ids {
        match store::delete_definition(&client, &target.base_url, id).await {
            Ok(()) => deleted.push(id.clone()),
            Err(e) => {
                log::error!("batch delete of {} failed: {:#}", id, e);
                failed.push(id.clone());
            }
        }
    }

    {
        let mut s = locked(&state);
        s.apply_batch_deleted(&deleted);
        if failed.is_empty() {
            s.toast_success(format!("Deleted {} definitions", ids.len()));
        } else {
            s.toast_error(format!(
                "Failed to delete {} of {}: {}",
                failed.len(),
                ids.len(),
                failed.join(", ")
            ));
        }
    }
    reload(&state, &client, &target.base_url).await;
    redirect("/definitions")
}

/// Apply a drop: move the dragged row to the target's position, then persist
/// the whole order. The local order is kept even if persisting fails.
pub async fn reorder_rows(state: State, client: Client, target: Target, form: Form) -> HttpResponse {
    let dragged_id = form.get("dragged").cloned().unwrap_or_default();
    let target_id = form.get("target").cloned().unwrap_or_default();
    let order = locked(&state).reorder(&dragged_id, &target_id);
    if let Some(ids) = order {
        if let Err(e) = store::reorder(&client, &target.base_url, &ids).await {
            log::error!("persisting order failed: {:#}", e);
            locked(&state).toast_error(format!("Reorder not persisted: {:#}", e));
        }
    }
    redirect("/definitions")
}

pub async fn headers_editor(state: State, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut s = locked(&state);
    let Some(def) = s.find(&id).cloned() else {
        return not_found();
    };
    let content =
        serde_json::to_string_pretty(&def.headers).unwrap_or_else(|_| "{}".to_string());
    let toasts = s.take_toasts();
    html(pages::editors::render_headers_editor(&def, &content, toasts))
}

/// Pretty-print the editor content if it is valid JSON; otherwise complain
/// and leave the content untouched.
pub async fn headers_format(state: State, path: web::Path<String>, form: Form) -> HttpResponse {
    let id = path.into_inner();
    let content = form.get("content").cloned().unwrap_or_default();
    let mut s = locked(&state);
    let Some(def) = s.find(&id).cloned() else {
        return not_found();
    };
    let content = match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(content),
        Err(e) => {
            s.toast_error(format!("Cannot format invalid JSON: {}", e));
            content
        }
    };
    let toasts = s.take_toasts();
    html(pages::editors::render_headers_editor(&def, &content, toasts))
}

pub async fn headers_save(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
    form: Form,
) -> HttpResponse {
    let id = path.into_inner();
    let content = form.get("content").cloned().unwrap_or_default();

    let headers: HashMap<String, String> = match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            let mut s = locked(&state);
            let Some(def) = s.find(&id).cloned() else {
                return not_found();
            };
            s.toast_error(format!("Headers are not a valid JSON object: {}", e));
            let toasts = s.take_toasts();
            return html(pages::editors::render_headers_editor(&def, &content, toasts));
        }
    };

    let def = {
        let mut s = locked(&state);
        let Some(entry) = s.find_mut(&id) else {
            return not_found();
        };
        entry.headers = headers;
        entry.clone()
    };
    if def.name.is_empty() || def.url.is_empty() {
        let mut s = locked(&state);
        s.toast_error("Set the name and URL before saving");
        let toasts = s.take_toasts();
        return html(pages::editors::render_headers_editor(&def, &content, toasts));
    }

    match push_save(&state, &client, &target.base_url, &id, &def).await {
        Ok(()) => redirect("/definitions"),
        Err(e) => {
            log::error!("saving headers of {} failed: {:#}", id, e);
            let mut s = locked(&state);
            s.toast_error(format!("Save failed: {:#}", e));
            let toasts = s.take_toasts();
            html(pages::editors::render_headers_editor(&def, &content, toasts))
        }
    }
}

pub async fn body_editor(state: State, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut s = locked(&state);
    let Some(def) = s.find(&id).cloned() else {
        return not_found();
    };
    let content = def.response_body.clone();
    let toasts = s.take_toasts();
    html(pages::editors::render_body_editor(&def, &content, toasts))
}

pub async fn body_format(state: State, path: web::Path<String>, form: Form) -> HttpResponse {
    let id = path.into_inner();
    let content = form.get("content").cloned().unwrap_or_default();
    let mut s = locked(&state);
    let Some(def) = s.find(&id).cloned() else {
        return not_found();
    };
    let content = match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(content),
        Err(e) => {
            s.toast_error(format!("Cannot format invalid JSON: {}", e));
            content
        }
    };
    let toasts = s.take_toasts();
    html(pages::editors::render_body_editor(&def, &content, toasts))
}

/// The body is opaque text: no JSON requirement on save, only the shared
/// name/url precondition.
pub async fn body_save(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
    form: Form,
) -> HttpResponse {
    let id = path.into_inner();
    let content = form.get("content").cloned().unwrap_or_default();

    let def = {
        let mut s = locked(&state);
        let Some(entry) = s.find_mut(&id) else {
            return not_found();
        };
        entry.response_body = content.clone();
        entry.clone()
    };
    if def.name.is_empty() || def.url.is_empty() {
        let mut s = locked(&state);
        s.toast_error("Set the name and URL before saving");
        let toasts = s.take_toasts();
        return html(pages::editors::render_body_editor(&def, &content, toasts));
    }

    match push_save(&state, &client, &target.base_url, &id, &def).await {
        Ok(()) => redirect("/definitions"),
        Err(e) => {
            log::error!("saving body of {} failed: {:#}", id, e);
            let mut s = locked(&state);
            s.toast_error(format!("Save failed: {:#}", e));
            let toasts = s.take_toasts();
            html(pages::editors::render_body_editor(&def, &content, toasts))
        }
    }
}

pub async fn logs_page(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let Some(def) = locked(&state).find(&id).cloned() else {
        return not_found();
    };
    match store::fetch_logs(&client, &target.base_url, &id).await {
        Ok(entries) => {
            let toasts = locked(&state).take_toasts();
            html(pages::logs::render_logs(&def, &entries, toasts))
        }
        Err(e) => {
            log::error!("loading logs of {} failed: {:#}", id, e);
            locked(&state).toast_error(format!("Loading logs failed: {:#}", e));
            redirect("/definitions")
        }
    }
}

/// Clear on the store, then show the empty log locally without re-fetching.
pub async fn logs_clear(
    state: State,
    client: Client,
    target: Target,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    let Some(def) = locked(&state).find(&id).cloned() else {
        return not_found();
    };
    match store::clear_logs(&client, &target.base_url, &id).await {
        Ok(()) => {
            let mut s = locked(&state);
            s.toast_success("Logs cleared");
            let toasts = s.take_toasts();
            html(pages::logs::render_logs(&def, &[], toasts))
        }
        Err(e) => {
            log::error!("clearing logs of {} failed: {:#}", id, e);
            locked(&state).toast_error(format!("Clearing logs failed: {:#}", e));
            redirect(format!("/definitions/{}/logs", id))
        }
    }
}
