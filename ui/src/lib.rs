//! # Gridkit UI - Leptos component layer
//!
//! Leptos (CSR/WebAssembly) components over the headless [`gridkit`]
//! engine. Every CRUD screen of an admin application renders the same
//! [`DataTable`]; screens differ only in the descriptors they pass in.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Screen (rows, fields, actions, module)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DataTable                                                  │
//! │  ├── header: per-column search + enumerable filters         │
//! │  ├── body: selection / cells / RowActions                   │
//! │  ├── bulk bar (structural, permission-gated)                │
//! │  └── PaginationBar                                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PermissionGuard (ad-hoc gating elsewhere in the screen)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`components`] - DataTable, RowActions, PermissionGuard, PaginationBar
//! - [`viewport`] - Shared viewport width signal (single debounced listener)
//! - [`config`] - CSS class contract

use leptos::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod components;
pub mod viewport;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Components
pub use components::{DataTable, PaginationBar, PermissionGuard, RowActions};

// Viewport
pub use viewport::{init_viewport_tracking, use_compact_viewport, use_viewport_width};

// Engine surface screens need alongside the components
pub use gridkit::{
    ActionDescriptor, ActionGate, CallerContext, DeleteFn, EngineConfig, FieldDescriptor,
    FilterOption, Notice, NoticeLevel, Pagination, PermissionMatrix, Role, RowSelection,
};

// =============================================================================
// Host Bootstrap
// =============================================================================

/// One-time logging setup for host applications.
///
/// Installs the panic hook and routes the `log` facade to the browser
/// console. Call once before mounting, together with
/// [`init_viewport_tracking`].
pub fn init_logging() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Gridkit UI initialized");
}

/// Convenience signal pair for a screen-level notices list.
///
/// Hosts that render their own notification area can pass the write half
/// to [`DataTable`] and consume the read half.
pub fn create_notices() -> (ReadSignal<Vec<Notice>>, WriteSignal<Vec<Notice>>) {
    create_signal(Vec::new())
}
