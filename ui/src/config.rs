//! UI-layer configuration.
//!
//! CSS class names shared across components, kept in one place so host
//! stylesheets have a single contract to target.

/// Root class of the table wrapper.
pub const TABLE_CLASS: &str = "gridkit-table";

/// Class of the bulk-actions bar shown above a non-empty selection.
pub const BULK_BAR_CLASS: &str = "gridkit-bulk-bar";

/// Class of the empty-state message block.
pub const EMPTY_CLASS: &str = "gridkit-empty";

/// Class applied to selected rows.
pub const SELECTED_ROW_CLASS: &str = "gridkit-row-selected";

/// Pagination orientation on wide viewports.
pub const PAGINATION_WIDE_CLASS: &str = "gridkit-pagination pagination-right";

/// Pagination orientation on narrow viewports.
pub const PAGINATION_COMPACT_CLASS: &str = "gridkit-pagination pagination-center";
