//! UI components for the grid engine.
//!
//! - [`table`] - The data table controller
//! - [`actions`] - Per-row actions dropdown
//! - [`guard`] - Structural permission gate
//! - [`pagination`] - Render-only pagination bar

pub mod actions;
pub mod guard;
pub mod pagination;
pub mod table;

pub use actions::RowActions;
pub use guard::PermissionGuard;
pub use pagination::PaginationBar;
pub use table::DataTable;
