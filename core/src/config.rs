//! Engine configuration.
//!
//! Two layers: compile-time constants for behavior that never varies per
//! deployment, and [`EngineConfig`] for the small enumerated sets a host
//! application supplies once at startup (date fields, searchable columns,
//! public modules). The config is passed explicitly to the compiler and the
//! table components; there is no ambient/global store.

use std::collections::{BTreeSet, HashMap};

/// Placeholder rendered for null/absent cell values.
pub const CELL_PLACEHOLDER: &str = "-";

/// Row field holding the creator of a record.
pub const CREATED_BY_FIELD: &str = "created_by";

/// Sentinel creator value marking system-seeded rows.
///
/// Rows created by the system are locked against selection (and therefore
/// bulk deletion) unless the host supplies its own eligibility rule.
pub const SYSTEM_CREATOR: &str = "SYSTEM";

/// Default row field used as the unique row key.
pub const DEFAULT_ROW_KEY_FIELD: &str = "id";

/// Default date-cell format: full month name, day, 4-digit year.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Viewport width (px) at or below which the grid switches to compact mode.
pub const COMPACT_BREAKPOINT_PX: u32 = 768;

/// Debounce interval for the resize listener (ms).
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

/// Default page size when the host supplies none.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum numbered page buttons rendered by the pagination bar.
pub const MAX_PAGE_BUTTONS: usize = 7;

/// Host-supplied engine configuration.
///
/// Built once at application start and shared (by `Rc`) with every table
/// instance. All sets are expected to be small and fixed.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Field names rendered as locale-formatted dates (absent a custom render).
    pub date_fields: Vec<String>,
    /// Per-field chrono format overrides for date fields.
    pub date_format_by_field: HashMap<String, String>,
    /// Field names eligible for the column search affordance.
    pub searchable_columns: Vec<String>,
    /// Modules exempt from all permission checks.
    pub public_modules: BTreeSet<String>,
    /// Row field carrying the unique row key.
    pub row_key_field: String,
}

impl EngineConfig {
    /// Create a config with the default row key field and empty sets.
    pub fn new() -> Self {
        Self {
            row_key_field: DEFAULT_ROW_KEY_FIELD.to_string(),
            ..Default::default()
        }
    }

    /// Add date fields.
    pub fn date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Override the chrono format for one date field.
    ///
    /// Cells carry day-level precision only; use date specifiers.
    pub fn date_format(mut self, field: impl Into<String>, format: impl Into<String>) -> Self {
        self.date_format_by_field
            .insert(field.into(), format.into());
        self
    }

    /// Add searchable columns.
    pub fn searchable_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add public modules.
    pub fn public_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_modules
            .extend(modules.into_iter().map(Into::into));
        self
    }

    /// Use a different row key field.
    pub fn row_key_field(mut self, field: impl Into<String>) -> Self {
        self.row_key_field = field.into();
        self
    }

    /// Chrono format for a date field, honoring per-field overrides.
    pub fn date_format_for(&self, field: &str) -> &str {
        self.date_format_by_field
            .get(field)
            .map(String::as_str)
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Whether a field is in the configured date set.
    pub fn is_date_field(&self, field: &str) -> bool {
        self.date_fields.iter().any(|f| f == field)
    }

    /// Whether a column is eligible for the search affordance.
    pub fn is_searchable(&self, column: &str) -> bool {
        self.searchable_columns.iter().any(|c| c == column)
    }

    /// Whether a module is exempt from permission checks.
    pub fn is_public_module(&self, module: &str) -> bool {
        self.public_modules.contains(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates() {
        let config = EngineConfig::new()
            .date_fields(["created_at", "updated_at"])
            .date_format("updated_at", "%Y-%m-%d")
            .searchable_columns(["name"])
            .public_modules(["holiday"]);

        assert!(config.is_date_field("created_at"));
        assert!(!config.is_date_field("name"));
        assert_eq!(config.date_format_for("updated_at"), "%Y-%m-%d");
        assert_eq!(config.date_format_for("created_at"), DEFAULT_DATE_FORMAT);
        assert!(config.is_searchable("name"));
        assert!(config.is_public_module("holiday"));
        assert_eq!(config.row_key_field, DEFAULT_ROW_KEY_FIELD);
    }
}
