use std::collections::HashSet;

use common::models::Definition;
use templates::Toast;

/// Page sizes the UI offers.
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// One page of the filtered collection, ready to render.
pub struct PageView<'a> {
    pub items: Vec<&'a Definition>,
    /// Filtered count, not the collection size.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    /// Zero-based offset of the first item within the filtered list.
    pub start_index: usize,
}

fn total_pages(count: usize, per_page: usize) -> usize {
    if count == 0 {
        1
    } else {
        (count + per_page - 1) / per_page
    }
}

/// UI session state. Mirrors the store's collection after every mutation and
/// holds everything the list page is derived from; discarded when the
/// process stops. Transitions are synchronous and pure with respect to the
/// store, so they are testable without a server.
pub struct ListState {
    pub definitions: Vec<Definition>,
    pub current_page: usize,
    pub page_size: usize,
    pub search: String,
    pub method_filter: String,
    pub expanded: HashSet<String>,
    pub editing: HashSet<String>,
    pub selected: HashSet<String>,
    /// False until the first successful load from the store.
    pub loaded: bool,
    default_response_body: String,
    toasts: Vec<Toast>,
}

impl ListState {
    pub fn new(page_size: usize, default_response_body: String) -> Self {
        let page_size = if PAGE_SIZES.contains(&page_size) {
            page_size
        } else {
            PAGE_SIZES[0]
        };
        Self {
            definitions: Vec::new(),
            current_page: 1,
            page_size,
            search: String::new(),
            method_filter: String::new(),
            expanded: HashSet::new(),
            editing: HashSet::new(),
            selected: HashSet::new(),
            loaded: false,
            default_response_body,
            toasts: Vec::new(),
        }
    }

    /// Replace the collection wholesale with the store's current state.
    pub fn replace_all(&mut self, definitions: Vec<Definition>) {
        self.definitions = definitions;
        self.loaded = true;
    }

    pub fn find(&self, id: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Definition> {
        self.definitions.iter_mut().find(|d| d.id == id)
    }

    /// The subsequence matching the search text (case-insensitive substring
    /// on name or url) and the method filter (exact, when set).
    pub fn filtered(&self) -> Vec<&Definition> {
        let search = self.search.to_lowercase();
        self.definitions
            .iter()
            .filter(|d| {
                let match_search = search.is_empty()
                    || d.name.to_lowercase().contains(&search)
                    || d.url.to_lowercase().contains(&search);
                let match_method =
                    self.method_filter.is_empty() || d.method == self.method_filter;
                match_search && match_method
            })
            .collect()
    }

    /// Clamp the current page into range and slice the filtered list.
    pub fn page_view(&self) -> PageView<'_> {
        let filtered = self.filtered();
        let total = filtered.len();
        let pages = total_pages(total, self.page_size);
        let page = self.current_page.clamp(1, pages);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total);
        PageView {
            items: filtered[start..end].to_vec(),
            total,
            page,
            total_pages: pages,
            start_index: start,
        }
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.current_page = 1;
    }

    pub fn set_method_filter(&mut self, method: &str) {
        self.method_filter = method.to_string();
        self.current_page = 1;
    }

    /// Unknown sizes are ignored; known sizes reset to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        if PAGE_SIZES.contains(&size) {
            self.page_size = size;
            self.current_page = 1;
        }
    }

    /// Navigation without re-filtering; the target is clamped into range.
    pub fn goto_page(&mut self, page: usize) {
        let pages = total_pages(self.filtered().len(), self.page_size);
        self.current_page = page.clamp(1, pages);
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Entering edit mode expands a collapsed row.
    pub fn start_editing(&mut self, id: &str) {
        self.editing.insert(id.to_string());
        self.expanded.insert(id.to_string());
    }

    pub fn toggle_selected(&mut self, id: &str, checked: bool) {
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    pub fn page_ids(&self) -> Vec<String> {
        self.page_view()
            .items
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }

    /// True iff every id on the current page is selected.
    pub fn all_page_selected(&self) -> bool {
        let ids = self.page_ids();
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }

    /// Add or remove exactly the current page's ids; other pages keep their
    /// selection.
    pub fn set_page_selection(&mut self, checked: bool) {
        for id in self.page_ids() {
            if checked {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    /// Prepend an unsaved draft, open it for editing, and jump to page one.
    /// Returns the provisional id.
    pub fn create_draft(&mut self) -> String {
        let draft = Definition::draft(&self.default_response_body);
        let id = draft.id.clone();
        self.definitions.insert(0, draft);
        self.expanded.insert(id.clone());
        self.editing.insert(id.clone());
        self.current_page = 1;
        id
    }

    /// Replace the entry matched by its pre-save id with the store's
    /// authoritative representation. Disclosure and selection follow the row
    /// to its persistent id; edit mode ends.
    pub fn apply_saved(&mut self, pre_save_id: &str, saved: Definition) {
        let new_id = saved.id.clone();
        if let Some(idx) = self.definitions.iter().position(|d| d.id == pre_save_id) {
            self.definitions[idx] = saved;
        }
        self.editing.remove(pre_save_id);
        if pre_save_id != new_id {
            if self.expanded.remove(pre_save_id) {
                self.expanded.insert(new_id.clone());
            }
            if self.selected.remove(pre_save_id) {
                self.selected.insert(new_id);
            }
        }
    }

    /// Drop an id from all three identity sets after a deletion.
    pub fn forget(&mut self, id: &str) {
        self.expanded.remove(id);
        self.editing.remove(id);
        self.selected.remove(id);
    }

    /// Fold a finished batch delete back in: deleted rows lose their
    /// disclosure and edit state, and the selection is cleared whether or
    /// not every deletion went through.
    pub fn apply_batch_deleted(&mut self, deleted: &[String]) {
        for id in deleted {
            self.expanded.remove(id.as_str());
            self.editing.remove(id.as_str());
        }
        self.selected.clear();
    }

    /// Move the dragged definition to the target's position and return the
    /// full id order to persist. Dropping onto itself or an unknown row is a
    /// no-op.
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Option<Vec<String>> {
        if dragged_id == target_id {
            return None;
        }
        let from = self.definitions.iter().position(|d| d.id == dragged_id)?;
        let to = self.definitions.iter().position(|d| d.id == target_id)?;
        let moved = self.definitions.remove(from);
        self.definitions.insert(to, moved);
        Some(self.definitions.iter().map(|d| d.id.clone()).collect())
    }

    pub fn toast_info(&mut self, message: impl ToString) {
        self.toasts.push(Toast::info(message));
    }

    pub fn toast_success(&mut self, message: impl ToString) {
        self.toasts.push(Toast::success(message));
    }

    pub fn toast_error(&mut self, message: impl ToString) {
        self.toasts.push(Toast::error(message));
    }

    /// Drain the queued toasts into the page being rendered.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}
