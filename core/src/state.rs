//! Per-table interactive state.
//!
//! One [`GridState`] instance is owned exclusively by the table it is bound
//! to; no other component mutates it. Independent machines live here:
//! per-column search (`Idle → Searching → Idle`), column sort cycling
//! (ascending → descending → off), and selection/bulk-delete
//! (`NoSelection → Selected → BulkConfirm → NoSelection`). All transitions
//! are synchronous; the only async boundary is the bulk-delete batch in
//! [`crate::bulk`], guarded against re-entrant submission by
//! `bulk_in_flight`.

use std::collections::BTreeSet;
use std::rc::Rc;

use serde_json::Value;

use crate::config::{COMPACT_BREAKPOINT_PX, CREATED_BY_FIELD, SYSTEM_CREATOR};
use crate::fields::ColumnDescriptor;
use crate::permissions::PermissionMatrix;

// =============================================================================
// Row Keys
// =============================================================================

/// Unique row identifier, stringified from the configured key field.
pub type RowKey = String;

/// Extract the row key from a row object.
///
/// Numbers and strings are accepted; anything else yields `None` and the
/// row cannot participate in selection.
pub fn row_key(row: &Value, key_field: &str) -> Option<RowKey> {
    match row.get(key_field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Row Selection Eligibility
// =============================================================================

/// How rows qualify for selection (and therefore bulk operations).
#[derive(Clone)]
pub enum RowSelection {
    /// No selection column at all.
    Disabled,
    /// Default rule: every row except system-seeded ones
    /// (`created_by == "SYSTEM"`).
    Default,
    /// Rows selectable only when the caller holds `permission` on `module`.
    Gated { module: String, permission: String },
    /// Caller-supplied predicate.
    Custom(Rc<dyn Fn(&Value) -> bool>),
}

impl RowSelection {
    /// Whether selection is enabled at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RowSelection::Disabled)
    }

    /// Whether one row may be selected.
    pub fn row_selectable(&self, row: &Value, matrix: &PermissionMatrix) -> bool {
        match self {
            RowSelection::Disabled => false,
            RowSelection::Custom(predicate) => predicate(row),
            RowSelection::Gated { module, permission } => matrix.grant(module, permission),
            RowSelection::Default => {
                row.get(CREATED_BY_FIELD).and_then(Value::as_str) != Some(SYSTEM_CREATOR)
            }
        }
    }
}

impl From<bool> for RowSelection {
    fn from(enabled: bool) -> Self {
        if enabled {
            RowSelection::Default
        } else {
            RowSelection::Disabled
        }
    }
}

impl std::fmt::Debug for RowSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSelection::Disabled => write!(f, "Disabled"),
            RowSelection::Default => write!(f, "Default"),
            RowSelection::Gated { module, permission } => {
                write!(f, "Gated({module}.{permission})")
            }
            RowSelection::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

// =============================================================================
// Grid State
// =============================================================================

/// Direction of an active column sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Interactive state of one table instance.
#[derive(Clone, Debug, Default)]
pub struct GridState {
    search_text: String,
    searched_column: Option<String>,
    sort: Option<(String, SortDirection)>,
    selected_row_keys: BTreeSet<RowKey>,
    bulk_actions_visible: bool,
    has_delete_permission: bool,
    compact_viewport: bool,
    bulk_in_flight: bool,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- per-column search -------------------------------------------------

    /// Apply a search term to one column.
    pub fn apply_search(&mut self, column: &str, term: &str) {
        self.search_text = term.to_string();
        self.searched_column = Some(column.to_string());
    }

    /// Clear the search if it is active on this column.
    pub fn reset_search(&mut self, column: &str) {
        if self.searched_column.as_deref() == Some(column) {
            self.search_text.clear();
            self.searched_column = None;
        }
    }

    /// Active filtered value for one column: `[term]` only for the column
    /// the search is bound to, `None` for every other column.
    pub fn filtered_value(&self, column: &str) -> Option<Vec<String>> {
        if self.searched_column.as_deref() == Some(column) && !self.search_text.is_empty() {
            Some(vec![self.search_text.clone()])
        } else {
            None
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn searched_column(&self) -> Option<&str> {
        self.searched_column.as_deref()
    }

    /// Rows of the current page visible under the active search and sort.
    ///
    /// Purely client-side; clearing the search restores the full page
    /// without a refetch. Sorting a column without a comparator is a no-op.
    pub fn visible_rows(&self, columns: &[ColumnDescriptor], rows: &[Value]) -> Vec<Value> {
        let searched = self
            .searched_column
            .as_deref()
            .filter(|_| !self.search_text.is_empty())
            .and_then(|key| columns.iter().find(|c| c.key == key));
        let mut visible: Vec<Value> = match searched {
            Some(column) => rows
                .iter()
                .filter(|row| column.matches_search(&self.search_text, row))
                .cloned()
                .collect(),
            None => rows.to_vec(),
        };
        if let Some((sort_key, direction)) = &self.sort {
            let sorter = columns
                .iter()
                .find(|c| &c.key == sort_key)
                .and_then(|c| c.sorter.clone());
            if let Some(sorter) = sorter {
                visible.sort_by(|a, b| match direction {
                    SortDirection::Ascending => sorter(a, b),
                    SortDirection::Descending => sorter(a, b).reverse(),
                });
            }
        }
        visible
    }

    // --- sorting -----------------------------------------------------------

    /// Cycle the sort on one column: ascending, descending, off. Sorting a
    /// different column restarts at ascending. The sort is a view
    /// preference and survives row replacement.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((key, SortDirection::Ascending)) if key == column => {
                Some((key, SortDirection::Descending))
            }
            Some((key, SortDirection::Descending)) if key == column => None,
            _ => Some((column.to_string(), SortDirection::Ascending)),
        };
    }

    /// Active sort direction for one column, `None` when unsorted.
    pub fn sort_direction(&self, column: &str) -> Option<SortDirection> {
        match &self.sort {
            Some((key, direction)) if key == column => Some(*direction),
            _ => None,
        }
    }

    // --- selection / bulk --------------------------------------------------

    /// Replace the selection; bulk affordances track non-emptiness.
    pub fn set_selection(&mut self, keys: Vec<RowKey>) {
        self.selected_row_keys = keys.into_iter().collect();
        self.bulk_actions_visible = !self.selected_row_keys.is_empty();
    }

    /// Toggle a single row in or out of the selection.
    pub fn toggle_selected(&mut self, key: RowKey) {
        if !self.selected_row_keys.remove(&key) {
            self.selected_row_keys.insert(key);
        }
        self.bulk_actions_visible = !self.selected_row_keys.is_empty();
    }

    /// The underlying row set was replaced (page change or refetch).
    pub fn rows_replaced(&mut self) {
        self.selected_row_keys.clear();
        self.bulk_actions_visible = false;
    }

    pub fn selected_row_keys(&self) -> Vec<RowKey> {
        self.selected_row_keys.iter().cloned().collect()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_row_keys.contains(key)
    }

    pub fn bulk_actions_visible(&self) -> bool {
        self.bulk_actions_visible
    }

    /// Record the caller's delete permission for the bound module. A
    /// granted → denied transition clears the selection.
    pub fn set_delete_permission(&mut self, granted: bool) {
        if self.has_delete_permission && !granted {
            self.rows_replaced();
        }
        self.has_delete_permission = granted;
    }

    pub fn has_delete_permission(&self) -> bool {
        self.has_delete_permission
    }

    /// Whether a bulk delete may be submitted right now.
    pub fn can_submit_bulk(&self) -> bool {
        self.bulk_actions_visible && self.has_delete_permission && !self.bulk_in_flight
    }

    /// Mark the batch started. Returns `false` (and does nothing) when a
    /// batch is already running or submission is not allowed.
    pub fn begin_bulk(&mut self) -> bool {
        if !self.can_submit_bulk() {
            return false;
        }
        self.bulk_in_flight = true;
        true
    }

    /// The batch settled: clear the selection and the in-flight guard.
    pub fn finish_bulk(&mut self) {
        self.bulk_in_flight = false;
        self.rows_replaced();
    }

    pub fn bulk_in_flight(&self) -> bool {
        self.bulk_in_flight
    }

    // --- viewport ----------------------------------------------------------

    /// Recompute the compact flag from the viewport width.
    pub fn set_viewport_width(&mut self, px: u32) {
        self.compact_viewport = px <= COMPACT_BREAKPOINT_PX;
    }

    pub fn is_compact_viewport(&self) -> bool {
        self.compact_viewport
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Server-side pagination descriptor. The engine is render-only for page
/// data: page changes are forwarded to the host, never fetched here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, 1-based.
    pub current: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Total row count across all pages.
    pub total: usize,
}

impl Pagination {
    pub fn new(current: usize, page_size: usize, total: usize) -> Self {
        Self {
            current: current.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    /// Number of pages (at least 1).
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Localized total-count caption: `"Total {n} {item_name}"`.
    pub fn caption(&self, item_name: &str) -> String {
        format!("Total {} {}", self.total, item_name)
    }

    /// Bounded window of page numbers centered on the current page.
    pub fn window(&self, max_buttons: usize) -> Vec<usize> {
        let count = self.page_count();
        let max_buttons = max_buttons.max(1);
        if count <= max_buttons {
            return (1..=count).collect();
        }
        let half = max_buttons / 2;
        let start = self
            .current
            .saturating_sub(half)
            .clamp(1, count - max_buttons + 1);
        (start..start + max_buttons).collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::config::DEFAULT_PAGE_SIZE, 0)
    }
}

/// Module-aware empty-state message.
pub fn empty_message(item_name: &str) -> String {
    format!("No {item_name} found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::fields::{compile, FieldDescriptor};
    use crate::permissions::Role;
    use serde_json::json;

    fn member_matrix(raw: Value) -> PermissionMatrix {
        PermissionMatrix::new(Role::Member, &raw, BTreeSet::new())
    }

    #[test]
    fn test_row_key_extraction() {
        assert_eq!(row_key(&json!({"id": 7}), "id"), Some("7".to_string()));
        assert_eq!(row_key(&json!({"id": "a1"}), "id"), Some("a1".to_string()));
        assert_eq!(row_key(&json!({"id": null}), "id"), None);
        assert_eq!(row_key(&json!({}), "id"), None);
    }

    #[test]
    fn test_search_is_per_column() {
        let mut state = GridState::new();
        state.apply_search("name", "acme");
        assert_eq!(state.filtered_value("name"), Some(vec!["acme".to_string()]));
        assert_eq!(state.filtered_value("status"), None);

        // Resetting a different column is a no-op.
        state.reset_search("status");
        assert_eq!(state.searched_column(), Some("name"));

        state.reset_search("name");
        assert_eq!(state.filtered_value("name"), None);
        assert_eq!(state.search_text(), "");
    }

    #[test]
    fn test_visible_rows_filter_and_restore() {
        let config = EngineConfig::new().searchable_columns(["name"]);
        let columns = compile(&[FieldDescriptor::new("name")], &config);
        let rows = vec![
            json!({"id": 1, "name": "Acme Corp"}),
            json!({"id": 2, "name": "Globex"}),
            json!({"id": 3, "name": "ACME Labs"}),
        ];

        let mut state = GridState::new();
        state.apply_search("name", "acme");
        let visible = state.visible_rows(&columns, &rows);
        assert_eq!(visible.len(), 2);

        // Clearing restores the full page without any refetch.
        state.reset_search("name");
        assert_eq!(state.visible_rows(&columns, &rows).len(), 3);
    }

    #[test]
    fn test_sort_toggle_cycles() {
        let mut state = GridState::new();
        assert_eq!(state.sort_direction("name"), None);

        state.toggle_sort("name");
        assert_eq!(state.sort_direction("name"), Some(SortDirection::Ascending));
        state.toggle_sort("name");
        assert_eq!(state.sort_direction("name"), Some(SortDirection::Descending));
        state.toggle_sort("name");
        assert_eq!(state.sort_direction("name"), None);

        // Switching columns restarts at ascending.
        state.toggle_sort("name");
        state.toggle_sort("amount");
        assert_eq!(state.sort_direction("amount"), Some(SortDirection::Ascending));
        assert_eq!(state.sort_direction("name"), None);
    }

    #[test]
    fn test_visible_rows_sorted_by_comparator() {
        let config = EngineConfig::new();
        let fields = vec![FieldDescriptor::new("amount").sorter(|a, b| {
            let left = a.get("amount").and_then(Value::as_i64).unwrap_or(0);
            let right = b.get("amount").and_then(Value::as_i64).unwrap_or(0);
            left.cmp(&right)
        })];
        let columns = compile(&fields, &config);
        let rows = vec![
            json!({"amount": 30}),
            json!({"amount": 10}),
            json!({"amount": 20}),
        ];

        let mut state = GridState::new();
        state.toggle_sort("amount");
        let ascending: Vec<i64> = state
            .visible_rows(&columns, &rows)
            .iter()
            .map(|row| row["amount"].as_i64().unwrap())
            .collect();
        assert_eq!(ascending, [10, 20, 30]);

        state.toggle_sort("amount");
        let descending: Vec<i64> = state
            .visible_rows(&columns, &rows)
            .iter()
            .map(|row| row["amount"].as_i64().unwrap())
            .collect();
        assert_eq!(descending, [30, 20, 10]);

        // Third toggle turns the sort off; page order is restored.
        state.toggle_sort("amount");
        let original: Vec<i64> = state
            .visible_rows(&columns, &rows)
            .iter()
            .map(|row| row["amount"].as_i64().unwrap())
            .collect();
        assert_eq!(original, [30, 10, 20]);
    }

    #[test]
    fn test_sort_without_comparator_is_noop() {
        let columns = compile(&[FieldDescriptor::new("name")], &EngineConfig::new());
        let rows = vec![json!({"name": "b"}), json!({"name": "a"})];
        let mut state = GridState::new();
        state.toggle_sort("name");
        let names: Vec<String> = state
            .visible_rows(&columns, &rows)
            .iter()
            .map(|row| row["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_selection_drives_bulk_visibility() {
        let mut state = GridState::new();
        assert!(!state.bulk_actions_visible());

        state.set_selection(vec!["1".into(), "2".into()]);
        assert!(state.bulk_actions_visible());
        assert_eq!(state.selected_row_keys(), vec!["1", "2"]);

        state.set_selection(vec![]);
        assert!(!state.bulk_actions_visible());
    }

    #[test]
    fn test_rows_replaced_clears_selection() {
        let mut state = GridState::new();
        state.set_selection(vec!["1".into()]);
        state.rows_replaced();
        assert!(state.selected_row_keys().is_empty());
        assert!(!state.bulk_actions_visible());
    }

    #[test]
    fn test_delete_permission_revocation_clears_selection() {
        let mut state = GridState::new();
        state.set_delete_permission(true);
        state.set_selection(vec!["1".into()]);

        state.set_delete_permission(false);
        assert!(state.selected_row_keys().is_empty());
        assert!(!state.bulk_actions_visible());

        // Denied → denied does not touch the selection.
        state.set_selection(vec!["2".into()]);
        state.set_delete_permission(false);
        assert!(state.bulk_actions_visible());
    }

    #[test]
    fn test_bulk_submission_guard() {
        let mut state = GridState::new();
        state.set_delete_permission(true);
        state.set_selection(vec!["1".into()]);

        assert!(state.begin_bulk());
        // Re-entrant submission is rejected while the batch runs.
        assert!(!state.begin_bulk());

        state.finish_bulk();
        assert!(!state.bulk_in_flight());
        assert!(state.selected_row_keys().is_empty());
    }

    #[test]
    fn test_bulk_requires_permission_and_selection() {
        let mut state = GridState::new();
        assert!(!state.begin_bulk());

        state.set_selection(vec!["1".into()]);
        assert!(!state.can_submit_bulk());

        state.set_delete_permission(true);
        assert!(state.can_submit_bulk());
    }

    #[test]
    fn test_default_selection_locks_system_rows() {
        let selection = RowSelection::Default;
        let matrix = member_matrix(Value::Null);
        let system = json!({"id": 1, "created_by": "SYSTEM"});
        let user = json!({"id": 2, "created_by": "alice"});
        assert!(!selection.row_selectable(&system, &matrix));
        assert!(selection.row_selectable(&user, &matrix));
    }

    #[test]
    fn test_gated_selection_consults_matrix() {
        let selection = RowSelection::Gated {
            module: "lead".into(),
            permission: "delete".into(),
        };
        let row = json!({"id": 1});
        assert!(!selection.row_selectable(&row, &member_matrix(Value::Null)));
        let granted = member_matrix(json!({"lead": {"delete": true}}));
        assert!(selection.row_selectable(&row, &granted));
    }

    #[test]
    fn test_custom_selection_predicate() {
        let selection =
            RowSelection::Custom(Rc::new(|row: &Value| row.get("locked") != Some(&json!(true))));
        let matrix = member_matrix(Value::Null);
        assert!(selection.row_selectable(&json!({"id": 1}), &matrix));
        assert!(!selection.row_selectable(&json!({"id": 2, "locked": true}), &matrix));
    }

    #[test]
    fn test_viewport_breakpoint() {
        let mut state = GridState::new();
        state.set_viewport_width(1280);
        assert!(!state.is_compact_viewport());
        state.set_viewport_width(COMPACT_BREAKPOINT_PX);
        assert!(state.is_compact_viewport());
        state.set_viewport_width(360);
        assert!(state.is_compact_viewport());
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 10, 42);
        assert_eq!(p.page_count(), 5);
        assert_eq!(p.caption("leads"), "Total 42 leads");

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.page_count(), 1);
    }

    #[test]
    fn test_pagination_window() {
        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.window(7), vec![1, 2, 3]);

        let p = Pagination::new(10, 10, 200);
        let window = p.window(7);
        assert_eq!(window.len(), 7);
        assert!(window.contains(&10));

        // Window clamps at the last page.
        let p = Pagination::new(20, 10, 200);
        assert_eq!(p.window(7), vec![14, 15, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(empty_message("holidays"), "No holidays found");
    }
}
