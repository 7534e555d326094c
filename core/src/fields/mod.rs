//! Field descriptors and the column compiler.
//!
//! Screens describe their rows semantically as [`FieldDescriptor`]s; the
//! compiler turns each one into a renderable [`ColumnDescriptor`]. Cell
//! rendering is resolved exactly once at compile time into the tagged
//! [`CellRender`] enum: a field either carries a caller-owned render closure
//! (passed through untouched) or the engine synthesizes one (placeholder for
//! nulls, locale date formatting for configured date fields, plain
//! stringification otherwise). Nothing is re-inspected per render call.

use std::cmp::Ordering;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::{EngineConfig, CELL_PLACEHOLDER};

// =============================================================================
// Closure Aliases
// =============================================================================

/// Caller-owned cell renderer: `(value, row) -> display text`.
pub type RenderFn = Rc<dyn Fn(Option<&Value>, &Value) -> String>;

/// Column filter predicate: `(filter value, row) -> keep`.
pub type FilterFn = Rc<dyn Fn(&Value, &Value) -> bool>;

/// Row comparator for sortable columns.
pub type SortFn = Rc<dyn Fn(&Value, &Value) -> Ordering>;

// =============================================================================
// Field Descriptors
// =============================================================================

/// One entry of an enumerable column's filter menu.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterOption {
    /// Display label.
    pub text: String,
    /// Value handed to the filter predicate.
    pub value: Value,
}

impl FilterOption {
    pub fn new(text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Semantic description of one logical row attribute.
///
/// Built with the builder methods; only `name` is required.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Key into a row object. Unique within a descriptor set by caller
    /// contract; duplicates are not deduplicated.
    pub name: String,
    /// Display label; defaults to the capitalized name.
    pub title: Option<String>,
    /// Caller-owned renderer. When present it is never overridden, not even
    /// for configured date fields.
    pub render: Option<RenderFn>,
    /// Alternate row field to source a date from when the primary is absent.
    pub fallback_field: Option<String>,
    /// Filter menu entries; a non-empty list marks the field enumerable.
    pub filters: Vec<FilterOption>,
    /// Predicate applied when a filter entry is active.
    pub on_filter: Option<FilterFn>,
    /// Row comparator for sorting.
    pub sorter: Option<SortFn>,
}

impl FieldDescriptor {
    /// Create a descriptor for `name` with no custom behavior.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            render: None,
            fallback_field: None,
            filters: Vec::new(),
            on_filter: None,
            sorter: None,
        }
    }

    /// Set the display label.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a caller-owned renderer.
    pub fn render(mut self, render: impl Fn(Option<&Value>, &Value) -> String + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    /// Source the date from another field when the primary value is absent.
    pub fn fallback_field(mut self, field: impl Into<String>) -> Self {
        self.fallback_field = Some(field.into());
        self
    }

    /// Attach filter menu entries and their predicate.
    pub fn filters(
        mut self,
        options: Vec<FilterOption>,
        on_filter: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Self {
        self.filters = options;
        self.on_filter = Some(Rc::new(on_filter));
        self
    }

    /// Attach a row comparator.
    pub fn sorter(mut self, sorter: impl Fn(&Value, &Value) -> Ordering + 'static) -> Self {
        self.sorter = Some(Rc::new(sorter));
        self
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("has_render", &self.render.is_some())
            .field("fallback_field", &self.fallback_field)
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Compiled Columns
// =============================================================================

/// Cell rendering strategy, resolved once at compile time.
#[derive(Clone)]
pub enum CellRender {
    /// Caller-owned renderer, passed through unchanged.
    Custom(RenderFn),
    /// Locale-formatted date with optional fallback source field.
    Date {
        format: String,
        fallback_field: Option<String>,
    },
    /// Placeholder for nulls, raw stringification otherwise.
    Plain,
}

/// Renderable column derived from one [`FieldDescriptor`].
#[derive(Clone)]
pub struct ColumnDescriptor {
    /// Data key into a row (= field name).
    pub key: String,
    /// Header label.
    pub title: String,
    /// Resolved cell rendering strategy.
    pub render: CellRender,
    /// Whether the column carries the text-search affordance.
    pub searchable: bool,
    /// Enumerable columns match search terms exactly instead of by substring.
    pub exact_search: bool,
    /// Filter menu entries (filter-icon affordance when non-empty).
    pub filters: Vec<FilterOption>,
    /// Predicate for the active filter entry.
    pub on_filter: Option<FilterFn>,
    /// Row comparator; presence renders the header sort affordance.
    pub sorter: Option<SortFn>,
}

impl ColumnDescriptor {
    /// Render the cell text for one row.
    pub fn cell_text(&self, row: &Value) -> String {
        let value = row.get(&self.key);
        match &self.render {
            CellRender::Custom(render) => render(value, row),
            CellRender::Plain => match value {
                None | Some(Value::Null) => CELL_PLACEHOLDER.to_string(),
                Some(v) => stringify(v),
            },
            CellRender::Date {
                format,
                fallback_field,
            } => {
                let source = match value {
                    None | Some(Value::Null) => fallback_field
                        .as_deref()
                        .and_then(|field| row.get(field)),
                    some => some,
                };
                source
                    .and_then(parse_timestamp)
                    .map(|date| date.format(format).to_string())
                    .unwrap_or_else(|| CELL_PLACEHOLDER.to_string())
            }
        }
    }

    /// Whether this row matches a search term on this column.
    ///
    /// Case-insensitive substring match over the stringified field value;
    /// enumerable columns require an exact (case-insensitive) match.
    pub fn matches_search(&self, term: &str, row: &Value) -> bool {
        let haystack = match row.get(&self.key) {
            None | Some(Value::Null) => return false,
            Some(v) => stringify(v).to_lowercase(),
        };
        let needle = term.to_lowercase();
        if self.exact_search {
            haystack == needle
        } else {
            haystack.contains(&needle)
        }
    }

    /// Whether this row passes the given filter value.
    pub fn matches_filter(&self, filter_value: &Value, row: &Value) -> bool {
        match &self.on_filter {
            Some(predicate) => predicate(filter_value, row),
            None => true,
        }
    }
}

impl std::fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("searchable", &self.searchable)
            .field("exact_search", &self.exact_search)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Compiler
// =============================================================================

/// Compile field descriptors into renderable columns.
///
/// Exactly one column per field, input order preserved. Fields with a
/// caller-owned renderer pass through unchanged (label defaulted if
/// absent); otherwise rendering is synthesized from the config's date set.
pub fn compile(fields: &[FieldDescriptor], config: &EngineConfig) -> Vec<ColumnDescriptor> {
    fields
        .iter()
        .map(|field| {
            let render = match &field.render {
                Some(custom) => CellRender::Custom(Rc::clone(custom)),
                None if config.is_date_field(&field.name) => CellRender::Date {
                    format: config.date_format_for(&field.name).to_string(),
                    fallback_field: field.fallback_field.clone(),
                },
                None => CellRender::Plain,
            };
            ColumnDescriptor {
                key: field.name.clone(),
                title: field
                    .title
                    .clone()
                    .unwrap_or_else(|| default_title(&field.name)),
                render,
                searchable: config.is_searchable(&field.name),
                exact_search: !field.filters.is_empty(),
                filters: field.filters.clone(),
                on_filter: field.on_filter.clone(),
                sorter: field.sorter.clone(),
            }
        })
        .collect()
}

/// Default header label: capitalized name, underscores as spaces.
fn default_title(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Stringify a raw JSON value without quoting strings.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a cell value into a calendar date.
///
/// Accepts RFC 3339 strings, bare dates, naive datetimes, and numeric
/// epochs (seconds or milliseconds).
fn parse_timestamp(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.date());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
        }
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            // Millisecond epochs are thirteen digits; seconds are ten.
            let seconds = if epoch.abs() >= 1_000_000_000_000 {
                epoch / 1000
            } else {
                epoch
            };
            DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> EngineConfig {
        EngineConfig::new()
            .date_fields(["created_at"])
            .searchable_columns(["name", "status"])
    }

    #[test]
    fn test_one_column_per_field_in_order() {
        let fields = vec![
            FieldDescriptor::new("name"),
            FieldDescriptor::new("status"),
            FieldDescriptor::new("name"),
        ];
        let columns = compile(&fields, &config());
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        // Duplicates are permitted, not deduplicated.
        assert_eq!(keys, ["name", "status", "name"]);
    }

    #[test]
    fn test_default_title_capitalizes() {
        let columns = compile(&[FieldDescriptor::new("created_at")], &config());
        assert_eq!(columns[0].title, "Created at");

        let columns = compile(
            &[FieldDescriptor::new("name").title("Full Name")],
            &config(),
        );
        assert_eq!(columns[0].title, "Full Name");
    }

    #[test]
    fn test_custom_render_never_overridden() {
        // Field is in the date set but carries its own renderer.
        let fields = vec![FieldDescriptor::new("created_at")
            .render(|value, _row| format!("custom:{}", value.and_then(Value::as_str).unwrap_or("?")))];
        let columns = compile(&fields, &config());
        assert!(matches!(columns[0].render, CellRender::Custom(_)));

        let row = json!({"created_at": "2024-01-05T10:30:00Z"});
        assert_eq!(columns[0].cell_text(&row), "custom:2024-01-05T10:30:00Z");
    }

    #[test]
    fn test_null_renders_placeholder() {
        let columns = compile(&[FieldDescriptor::new("status")], &config());
        assert_eq!(columns[0].cell_text(&json!({"status": null})), "-");
        assert_eq!(columns[0].cell_text(&json!({})), "-");
        assert_eq!(columns[0].cell_text(&json!({"status": "open"})), "open");
        assert_eq!(columns[0].cell_text(&json!({"status": 3})), "3");
    }

    #[test]
    fn test_date_rendering_long_format() {
        let columns = compile(&[FieldDescriptor::new("created_at")], &config());
        let row = json!({"created_at": "2024-01-05T10:30:00Z"});
        assert_eq!(columns[0].cell_text(&row), "January 5, 2024");

        // Bare date and epoch millis land on the same calendar day.
        let row = json!({"created_at": "2024-01-05"});
        assert_eq!(columns[0].cell_text(&row), "January 5, 2024");
        let row = json!({"created_at": 1704448800000i64});
        assert_eq!(columns[0].cell_text(&row), "January 5, 2024");
    }

    #[test]
    fn test_date_format_override() {
        let config = config().date_format("created_at", "%Y/%m/%d");
        let columns = compile(&[FieldDescriptor::new("created_at")], &config);
        let row = json!({"created_at": "2024-01-05"});
        assert_eq!(columns[0].cell_text(&row), "2024/01/05");
    }

    #[test]
    fn test_date_fallback_field() {
        let fields = vec![FieldDescriptor::new("created_at").fallback_field("updated_at")];
        let columns = compile(&fields, &config());

        let row = json!({"created_at": null, "updated_at": "2023-06-10"});
        assert_eq!(columns[0].cell_text(&row), "June 10, 2023");

        // Neither present: placeholder.
        assert_eq!(columns[0].cell_text(&json!({})), "-");
        // Unparseable: placeholder, never a panic.
        let row = json!({"created_at": "soon"});
        assert_eq!(columns[0].cell_text(&row), "-");
    }

    #[test]
    fn test_search_substring_case_insensitive() {
        let columns = compile(&[FieldDescriptor::new("name")], &config());
        let row = json!({"name": "Acme Corporation"});
        assert!(columns[0].matches_search("acme", &row));
        assert!(columns[0].matches_search("CORP", &row));
        assert!(!columns[0].matches_search("globex", &row));
        assert!(!columns[0].matches_search("acme", &json!({"name": null})));
    }

    #[test]
    fn test_enumerable_columns_match_exactly() {
        let fields = vec![FieldDescriptor::new("status").filters(
            vec![
                FilterOption::new("Open", "open"),
                FilterOption::new("Closed", "closed"),
            ],
            |value, row| row.get("status") == Some(value),
        )];
        let columns = compile(&fields, &config());
        assert!(columns[0].exact_search);

        let row = json!({"status": "open"});
        assert!(columns[0].matches_search("OPEN", &row));
        // Substring is not enough for enumerable fields.
        assert!(!columns[0].matches_search("ope", &row));
        assert!(columns[0].matches_filter(&json!("open"), &row));
        assert!(!columns[0].matches_filter(&json!("closed"), &row));
    }
}
