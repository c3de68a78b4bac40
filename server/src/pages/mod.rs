pub mod definitions;
pub mod editors;
pub mod logs;

use common::models::Definition;

/// Rows without a name render a placeholder, matching the list view.
pub(crate) fn display_name(def: &Definition) -> String {
    if def.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        def.name.clone()
    }
}
