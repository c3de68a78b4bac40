use common::models::{Definition, LogEntry};
use leptos::{either::Either, prelude::*};
use templates::{confirm_form, Breadcrumb, Page, Toast};

use crate::pages::display_name;

/// Request log for one definition, most recent entry first. `entries` is the
/// store's order (oldest first).
pub fn render_logs(def: &Definition, entries: &[LogEntry], toasts: Vec<Toast>) -> String {
    let name = display_name(def);
    let clear_action = format!("/definitions/{}/logs/clear", def.id);
    let entries: Vec<LogEntry> = entries.iter().rev().cloned().collect();
    let count = entries.len();

    let content = view! {
        <div class="toolbar">
            {confirm_form(&clear_action, "Clear logs", "Clear all logs for this definition?", false)}
            <span>{format!("{} entries", count)}</span>
        </div>
        {if entries.is_empty() {
            Either::Left(view! { <div class="empty-state">"No request logs yet."</div> })
        } else {
            Either::Right(view! {
                {entries.into_iter().map(|entry| {
                    let dot = if entry.is_success() {
                        "status-dot status-success"
                    } else {
                        "status-dot status-error"
                    };
                    view! {
                        <div class="log-item">
                            <div class="log-header">
                                <span>
                                    <span class={dot}></span>
                                    <strong>{entry.method}</strong>
                                    " "
                                    {entry.url}
                                </span>
                                <span>{entry.timestamp}</span>
                            </div>
                            {entry.request_body.map(|body| view! { <div class="log-body">{body}</div> })}
                            {entry.error.map(|err| view! { <div class="log-error">{err}</div> })}
                        </div>
                    }
                }).collect::<Vec<_>>()}
            })
        }}
    };

    Page {
        title: format!("Mock Admin - {} - Logs", name),
        breadcrumbs: vec![
            Breadcrumb::link("Definitions", "/definitions"),
            Breadcrumb::current(format!("{} · Logs", name)),
        ],
        toasts,
        content,
    }
    .render()
}
