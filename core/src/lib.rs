//! # Gridkit - headless data-grid engine
//!
//! Gridkit powers the CRUD screens of an admin back-office: every screen
//! supplies rows, semantic field descriptors, action descriptors, and a
//! module name, and the engine compiles columns, gates actions against the
//! caller's permissions, and drives the table's interactive state.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Fields     │────▶│  Compiler   │────▶│  Columns     │
//! │ (semantic)  │     │ (one pass)  │     │ (renderable) │
//! └─────────────┘     └─────────────┘     └──────┬───────┘
//! ┌─────────────┐     ┌─────────────┐            ▼
//! │  Actions    │────▶│  Pipeline   │────▶┌──────────────┐
//! │ (declared)  │     │ (gated)     │     │  GridState   │
//! └─────────────┘     └──────▲──────┘     │ (per table)  │
//!                     ┌──────┴──────┐     └──────────────┘
//!                     │ Permission  │
//!                     │   Matrix    │
//!                     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use gridkit::{compile, EngineConfig, FieldDescriptor};
//! use serde_json::json;
//!
//! let config = EngineConfig::new().date_fields(["created_at"]);
//! let columns = compile(
//!     &[FieldDescriptor::new("name"), FieldDescriptor::new("created_at")],
//!     &config,
//! );
//! assert_eq!(columns[1].cell_text(&json!({"created_at": null})), "-");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types caught at engine boundaries
//! - [`config`] - Constants and host-supplied [`EngineConfig`]
//! - [`notify`] - Transient user-facing notices
//! - [`permissions`] - Caller-scoped permission matrix
//! - [`fields`] - Field descriptors and the column compiler
//! - [`actions`] - Action descriptors and the gating pipeline
//! - [`state`] - Per-table state machine and pagination
//! - [`bulk`] - Sequential bulk-delete execution

// Core modules
pub mod config;
pub mod error;
pub mod notify;

// Permissions
pub mod permissions;

// Columns
pub mod fields;

// Actions
pub mod actions;

// Table state
pub mod state;

// Bulk operations
pub mod bulk;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ActionError, ActionResult, DeleteError, DeleteResult};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{
    EngineConfig,
    CELL_PLACEHOLDER,
    COMPACT_BREAKPOINT_PX,
    DEFAULT_PAGE_SIZE,
    DEFAULT_ROW_KEY_FIELD,
    MAX_PAGE_BUTTONS,
    RESIZE_DEBOUNCE_MS,
    SYSTEM_CREATOR,
};

// =============================================================================
// Re-exports - Notices
// =============================================================================

pub use notify::{Notice, NoticeLevel};

// =============================================================================
// Re-exports - Permissions
// =============================================================================

pub use permissions::{
    parse_grants,
    CallerContext,
    GrantPolicy,
    Grants,
    Permissive,
    PermissionMatrix,
    Role,
    RolePolicy,
};

// =============================================================================
// Re-exports - Fields & Columns
// =============================================================================

pub use fields::{
    compile,
    CellRender,
    ColumnDescriptor,
    FieldDescriptor,
    FilterFn,
    FilterOption,
    RenderFn,
    SortFn,
};

// =============================================================================
// Re-exports - Actions
// =============================================================================

pub use actions::{
    dispatch,
    resolve,
    visible_for,
    ActionDescriptor,
    ActionGate,
    ActionHandler,
    ShowFn,
};

// =============================================================================
// Re-exports - State & Pagination
// =============================================================================

pub use state::{
    empty_message, row_key, GridState, Pagination, RowKey, RowSelection, SortDirection,
};

// =============================================================================
// Re-exports - Bulk
// =============================================================================

pub use bulk::{delete_each, BulkOutcome, DeleteFn};
