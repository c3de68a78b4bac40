use leptos::{either::Either, prelude::*};

/// Transient status message shown at the top of the next rendered page and
/// removed by the shim after three seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn css_class(&self) -> &'static str {
        match self {
            ToastLevel::Info => "toast toast-info",
            ToastLevel::Success => "toast toast-success",
            ToastLevel::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl ToString) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.to_string(),
        }
    }

    pub fn success(message: impl ToString) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.to_string(),
        }
    }
}

pub fn toast_stack(toasts: &[Toast]) -> AnyView {
    if toasts.is_empty() {
        return ().into_any();
    }
    let toasts = toasts.to_vec();
    view! {
        <div class="toast-stack">
            {toasts.into_iter().map(|t| {
                let class = t.level.css_class();
                view! { <div class={class}>{t.message}</div> }
            }).collect::<Vec<_>>()}
        </div>
    }
    .into_any()
}

/// Colored badge for an HTTP method.
pub fn method_badge(method: &str) -> AnyView {
    let class = format!("method-badge method-{}", method);
    let method = method.to_string();
    view! { <span class={class}>{method}</span> }.into_any()
}

/// A POST form guarded by a browser confirm prompt. Declining the prompt
/// cancels the submit, so no request is made.
pub fn confirm_form(action: &str, label: &str, prompt: &str, disabled: bool) -> AnyView {
    let action = action.to_string();
    let label = label.to_string();
    let prompt = prompt.to_string();
    view! {
        <form method="POST" action={action} data-confirm={prompt}>
            <button type="submit" disabled={disabled}>{label}</button>
        </form>
    }
    .into_any()
}

/// A checkbox that posts its form as soon as it is toggled. The hidden
/// `checked` field carries the state the server should move to.
pub fn autosubmit_checkbox(action: &str, next_checked: bool, checked: bool) -> AnyView {
    let action = action.to_string();
    let next = if next_checked { "1" } else { "0" };
    view! {
        <form method="POST" action={action}>
            <input type="hidden" name="checked" value={next}/>
            <input type="checkbox" checked={checked} data-autosubmit="1"/>
        </form>
    }
    .into_any()
}

pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

impl Breadcrumb {
    pub fn link(label: impl ToString, href: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            href: Some(href.to_string()),
        }
    }

    pub fn current(label: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            href: None,
        }
    }
}

pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub base_url: String,
}

impl Pagination {
    pub fn new(
        current_page: usize,
        total_items: usize,
        per_page: usize,
        base_url: impl ToString,
    ) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            (total_items + per_page - 1) / per_page
        };
        Self {
            current_page,
            total_pages,
            total_items,
            base_url: base_url.to_string(),
        }
    }
}

/// First / previous / next / last links around the current page marker.
/// Links at the edge of the range are rendered as inert text.
pub fn pagination_nav(p: &Pagination) -> AnyView {
    let info = format!(
        "{} definitions, page {} of {}",
        p.total_items, p.current_page, p.total_pages
    );
    let jump = |page: usize, label: &str, active: bool| {
        let label = label.to_string();
        if active {
            let href = format!("{}?page={}", p.base_url, page);
            Either::Left(view! { <a class="page-link" href={href}>{label}</a> })
        } else {
            Either::Right(view! { <span class="page-link inert">{label}</span> })
        }
    };
    let at_first = p.current_page <= 1;
    let at_last = p.current_page >= p.total_pages;
    let first = jump(1, "First", !at_first);
    let prev = jump(p.current_page.saturating_sub(1), "Prev", !at_first);
    let next = jump(p.current_page + 1, "Next", !at_last);
    let last = jump(p.total_pages, "Last", !at_last);

    view! {
        <span class="pagination-nav">
            <span class="pagination-info">{info}</span>
            " "{first}" "{prev}
            " "<span class="page-current">{p.current_page}</span>
            " "{next}" "{last}
        </span>
    }
    .into_any()
}

pub struct Page<C: IntoView = ()> {
    pub title: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub toasts: Vec<Toast>,
    pub content: C,
}

impl<C: IntoView> Page<C> {
    pub fn render(self) -> String {
        let Page {
            title,
            breadcrumbs,
            toasts,
            content,
        } = self;

        let toast_view = toast_stack(&toasts);
        let body = view! {
            {toast_view}
            {if !breadcrumbs.is_empty() {
                Either::Left(view! {
                    <h1>
                        {breadcrumbs.into_iter().enumerate().map(|(i, crumb)| {
                            let sep = if i > 0 { " / " } else { "" };
                            match crumb.href {
                                Some(href) => Either::Left(view! {
                                    {sep}<a href={href}>{crumb.label}</a>
                                }),
                                None => Either::Right(view! {
                                    {sep}{crumb.label}
                                }),
                            }
                        }).collect::<Vec<_>>()}
                    </h1>
                })
            } else {
                Either::Right(())
            }}
            {content}
        };

        page_layout(&title, body.to_html())
    }
}

pub fn page_layout(title: &str, body_html: String) -> String {
    let title = title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: monospace; padding: 16px; max-width: 1100px; margin: 0 auto; }}
h1 {{ font-size: 1.3em; }}
form {{ display: inline; }}
button {{ cursor: pointer; }}
button:disabled {{ cursor: default; opacity: 0.5; }}
a {{ color: #1565c0; }}
.toolbar {{ margin: 12px 0; display: flex; gap: 8px; align-items: center; flex-wrap: wrap; }}
.toast-stack {{ position: fixed; top: 12px; right: 12px; display: flex; flex-direction: column; gap: 6px; z-index: 10; }}
.toast {{ padding: 8px 12px; border-radius: 4px; background: #455a64; color: #fff; }}
.toast-success {{ background: #2e7d32; }}
.toast-error {{ background: #c62828; }}
.def-header, .def-row {{ display: grid; grid-template-columns: 28px 36px 28px 28px 1.2fr 70px 1.6fr 90px 90px 150px 180px; gap: 4px; align-items: center; padding: 6px 4px; }}
.def-header {{ font-weight: bold; border-bottom: 1px solid #ccc; }}
.def-item {{ border-bottom: 1px solid #eee; }}
.def-item.dragging {{ opacity: 0.4; }}
.def-item.drag-over {{ border-top: 2px solid #1565c0; }}
.drag-handle {{ cursor: grab; color: #888; text-align: center; }}
.method-badge {{ padding: 2px 6px; border-radius: 3px; color: #fff; font-size: 0.85em; text-align: center; }}
.method-GET {{ background: #2e7d32; }}
.method-POST {{ background: #1565c0; }}
.method-PUT {{ background: #ef6c00; }}
.method-DELETE {{ background: #c62828; }}
.def-url, .def-name {{ overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }}
.preview-link {{ color: #1565c0; cursor: pointer; }}
.detail-panel {{ display: none; padding: 10px 40px; background: #fafafa; }}
.detail-panel.show {{ display: block; }}
.detail-grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }}
.detail-group.full {{ grid-column: 1 / -1; }}
.detail-group label {{ display: block; font-size: 0.85em; color: #555; margin-bottom: 2px; }}
.detail-group input, .detail-group select, .detail-group textarea {{ width: 100%; box-sizing: border-box; font-family: inherit; }}
.detail-group textarea {{ min-height: 90px; }}
.editor-textarea {{ width: 100%; min-height: 320px; box-sizing: border-box; font-family: inherit; }}
.empty-state {{ padding: 32px; text-align: center; color: #888; }}
.pagination {{ margin: 12px 0; display: flex; gap: 12px; align-items: center; flex-wrap: wrap; }}
.page-link.inert {{ color: #aaa; }}
.page-current {{ font-weight: bold; }}
.log-item {{ border-bottom: 1px solid #eee; padding: 8px 4px; }}
.log-header {{ display: flex; justify-content: space-between; }}
.log-body {{ margin-top: 4px; white-space: pre-wrap; color: #555; }}
.log-error {{ margin-top: 4px; white-space: pre-wrap; color: #c62828; }}
.status-dot {{ display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 6px; }}
.status-success {{ background: #2e7d32; }}
.status-error {{ background: #c62828; }}
</style>
</head>
<body>
{body_html}
<script>
(function () {{
  setTimeout(function () {{
    document.querySelectorAll('.toast').forEach(function (t) {{ t.remove(); }});
  }}, 3000);

  document.querySelectorAll('form[data-confirm]').forEach(function (form) {{
    form.addEventListener('submit', function (e) {{
      if (!window.confirm(form.dataset.confirm)) {{ e.preventDefault(); }}
    }});
  }});

  document.querySelectorAll('[data-autosubmit]').forEach(function (el) {{
    el.addEventListener('change', function () {{ el.form.submit(); }});
  }});

  var draggedId = null;
  document.querySelectorAll('.drag-handle').forEach(function (handle) {{
    handle.addEventListener('dragstart', function (e) {{
      draggedId = handle.dataset.id;
      var row = handle.closest('.def-item');
      if (row) {{ row.classList.add('dragging'); }}
      e.dataTransfer.effectAllowed = 'move';
      e.dataTransfer.setData('text/plain', draggedId);
    }});
    handle.addEventListener('dragend', function () {{
      draggedId = null;
      document.querySelectorAll('.def-item').forEach(function (row) {{
        row.classList.remove('dragging');
        row.classList.remove('drag-over');
      }});
    }});
  }});
  document.querySelectorAll('.def-item').forEach(function (row) {{
    row.addEventListener('dragover', function (e) {{
      e.preventDefault();
      e.dataTransfer.dropEffect = 'move';
    }});
    row.addEventListener('dragenter', function (e) {{
      e.preventDefault();
      if (row.dataset.id !== draggedId) {{ row.classList.add('drag-over'); }}
    }});
    row.addEventListener('dragleave', function () {{
      row.classList.remove('drag-over');
    }});
    row.addEventListener('drop', function (e) {{
      e.preventDefault();
      row.classList.remove('drag-over');
      if (!draggedId || row.dataset.id === draggedId) {{ return; }}
      var form = document.getElementById('reorder-form');
      if (!form) {{ return; }}
      form.querySelector('input[name="dragged"]').value = draggedId;
      form.querySelector('input[name="target"]').value = row.dataset.id;
      form.submit();
    }});
  }});
}})();
</script>
</body>
</html>"#,
        title = title,
        body_html = body_html
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_layout_wraps_body() {
        let result = page_layout("Mock Admin", "<p>body</p>".to_string());
        assert!(result.starts_with("<!DOCTYPE html>"));
        assert!(result.contains("<title>Mock Admin</title>"));
        assert!(result.contains("<p>body</p>"));
    }

    #[test]
    fn page_layout_escapes_title() {
        let result = page_layout("<script>", "".to_string());
        assert!(result.contains("<title>&lt;script&gt;</title>"));
    }

    #[test]
    fn page_layout_includes_shim() {
        let result = page_layout("t", String::new());
        assert!(result.contains("form[data-confirm]"));
        assert!(result.contains("reorder-form"));
        assert!(result.contains("data-autosubmit"));
    }

    #[test]
    fn toast_stack_levels() {
        let html = toast_stack(&[
            Toast::info("loaded"),
            Toast::success("saved"),
            Toast::error("boom"),
        ])
        .to_html();
        assert!(html.contains("toast-info"));
        assert!(html.contains("toast-success"));
        assert!(html.contains("toast-error"));
        assert!(html.contains("saved"));
    }

    #[test]
    fn toast_stack_empty_renders_nothing() {
        assert_eq!(toast_stack(&[]).to_html(), "");
    }

    #[test]
    fn method_badge_class() {
        let html = method_badge("POST").to_html();
        assert!(html.contains("method-badge method-POST"));
        assert!(html.contains("POST"));
    }

    #[test]
    fn confirm_form_carries_prompt() {
        let html = confirm_form("/x/delete", "Delete", "Really?", false).to_html();
        assert!(html.contains(r#"action="/x/delete""#));
        assert!(html.contains(r#"data-confirm="Really?""#));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn confirm_form_disabled() {
        let html = confirm_form("/x", "Delete", "?", true).to_html();
        assert!(html.contains("disabled"));
    }

    #[test]
    fn autosubmit_checkbox_state() {
        let unchecked = autosubmit_checkbox("/sel", true, false).to_html();
        assert!(unchecked.contains(r#"value="1""#));
        assert!(unchecked.contains(r#"action="/sel""#));

        let checked = autosubmit_checkbox("/sel", false, true).to_html();
        assert!(checked.contains(r#"value="0""#));
        assert!(checked.contains("checked"));
    }

    #[test]
    fn pagination_total_pages() {
        assert_eq!(Pagination::new(1, 0, 10, "/d").total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10, "/d").total_pages, 1);
        assert_eq!(Pagination::new(1, 11, 10, "/d").total_pages, 2);
        assert_eq!(Pagination::new(1, 15, 10, "/d").total_pages, 2);
    }

    #[test]
    fn pagination_nav_middle_page() {
        let p = Pagination::new(2, 25, 10, "/definitions");
        let html = pagination_nav(&p).to_html();
        assert!(html.contains(r#"href="/definitions?page=1""#));
        assert!(html.contains(r#"href="/definitions?page=3""#));
        assert!(html.contains("25 definitions, page 2 of 3"));
    }

    #[test]
    fn pagination_nav_edges_inert() {
        let p = Pagination::new(1, 5, 10, "/definitions");
        let html = pagination_nav(&p).to_html();
        // single page: every jump is inert text, no links
        assert!(!html.contains("href"));
        assert!(html.contains("inert"));
    }

    #[test]
    fn page_render_breadcrumbs_and_toasts() {
        let html = Page {
            title: "Mock Admin".to_string(),
            breadcrumbs: vec![
                Breadcrumb::link("Definitions", "/definitions"),
                Breadcrumb::current("Logs"),
            ],
            toasts: vec![Toast::error("load failed")],
            content: view! { <p>"content"</p> },
        }
        .render();
        assert!(html.contains(r#"<a href="/definitions">"#));
        assert!(html.contains(" / "));
        assert!(html.contains("Logs"));
        assert!(html.contains("load failed"));
        assert!(html.contains("content"));
    }

    #[test]
    fn page_render_without_breadcrumbs_has_no_heading() {
        let html = Page {
            title: "t".to_string(),
            breadcrumbs: vec![],
            toasts: vec![],
            content: (),
        }
        .render();
        assert!(!html.contains("<h1>"));
    }
}
