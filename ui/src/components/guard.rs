//! Structural permission gate.

use std::rc::Rc;

use leptos::*;

use gridkit::PermissionMatrix;

/// Render children only when the caller may perform `action` on `module`.
///
/// Public modules always render. The guard is pure: the matrix is immutable
/// for the caller session, so the decision is made once at mount, with no
/// side effects and no caching of its own.
#[component]
pub fn PermissionGuard(
    /// Caller permission matrix.
    matrix: Rc<PermissionMatrix>,
    /// Module the gated element belongs to.
    #[prop(into)] module: String,
    /// Permission required on the module.
    #[prop(into)] action: String,
    /// Rendered instead of the children when the permission is denied.
    #[prop(optional, into)] fallback: ViewFn,
    children: Children,
) -> impl IntoView {
    if matrix.grant(&module, &action) {
        children().into_view()
    } else {
        fallback.run()
    }
}
