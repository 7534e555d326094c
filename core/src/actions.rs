//! Row-scoped actions and the permission-gating pipeline.
//!
//! Screens declare their per-row operations as data ([`ActionDescriptor`]s)
//! and one generic pipeline serves every entity; there are no per-entity
//! action menus. Gating happens in two stages:
//!
//! 1. [`resolve`] filters the whole set against the permission matrix once
//!    (ungated actions always survive)
//! 2. [`visible_for`] applies each action's `should_show` predicate per row
//!
//! Handler failures are caught at the dispatch boundary, logged, and turned
//! into a transient [`Notice`]; they never unwind through the grid.

use std::rc::Rc;

use serde_json::Value;

use crate::error::ActionResult;
use crate::notify::Notice;
use crate::permissions::PermissionMatrix;

/// Row-scoped action handler.
pub type ActionHandler = Rc<dyn Fn(&Value) -> ActionResult>;

/// Per-row visibility predicate.
pub type ShowFn = Rc<dyn Fn(&Value) -> bool>;

/// Permission gate: module and permission are always paired. An action
/// without a gate is never hidden by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionGate {
    pub module: String,
    pub permission: String,
}

impl ActionGate {
    pub fn new(module: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            permission: permission.into(),
        }
    }
}

/// One row-scoped operation exposed in the actions dropdown.
#[derive(Clone)]
pub struct ActionDescriptor {
    /// Unique key within the action set.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Icon name (CSS class or glyph, host-interpreted).
    pub icon: String,
    /// Styling hint for destructive operations.
    pub danger: bool,
    /// Handler invoked with the clicked row.
    pub handler: ActionHandler,
    /// Optional permission gate.
    pub gate: Option<ActionGate>,
    /// Optional per-row visibility predicate (defaults to visible).
    pub should_show: Option<ShowFn>,
}

impl ActionDescriptor {
    /// Create an action with the given key and label.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&Value) -> ActionResult + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            icon: String::new(),
            danger: false,
            handler: Rc::new(handler),
            gate: None,
            should_show: None,
        }
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Mark the action destructive.
    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    /// Gate the action behind a module permission.
    pub fn gate(mut self, module: impl Into<String>, permission: impl Into<String>) -> Self {
        self.gate = Some(ActionGate::new(module, permission));
        self
    }

    /// Restrict visibility per row.
    pub fn should_show(mut self, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        self.should_show = Some(Rc::new(predicate));
        self
    }
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("danger", &self.danger)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

/// Filter an action set against the permission matrix.
///
/// An action survives when it has no gate or the matrix grants its
/// permission on its module. Evaluated once per caller session, not per
/// row.
pub fn resolve(actions: &[ActionDescriptor], matrix: &PermissionMatrix) -> Vec<ActionDescriptor> {
    actions
        .iter()
        .filter(|action| match &action.gate {
            None => true,
            Some(gate) => matrix.grant(&gate.module, &gate.permission),
        })
        .cloned()
        .collect()
}

/// Actions from a resolved set visible for one row.
///
/// An empty result means no actions affordance is rendered for the row at
/// all.
pub fn visible_for<'a>(resolved: &'a [ActionDescriptor], row: &Value) -> Vec<&'a ActionDescriptor> {
    resolved
        .iter()
        .filter(|action| match &action.should_show {
            Some(predicate) => predicate(row),
            None => true,
        })
        .collect()
}

/// Invoke an action handler, catching failures at the boundary.
///
/// Returns a notice to surface when the handler fails; the failure is also
/// logged and never propagated.
pub fn dispatch(action: &ActionDescriptor, row: &Value) -> Option<Notice> {
    match (action.handler)(row) {
        Ok(()) => None,
        Err(err) => {
            log::error!("Action '{}' failed: {}", action.key, err);
            Some(Notice::error(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use crate::permissions::Role;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::BTreeSet;

    fn member_matrix(raw: Value) -> PermissionMatrix {
        PermissionMatrix::new(Role::Member, &raw, BTreeSet::new())
    }

    fn noop(key: &str) -> ActionDescriptor {
        ActionDescriptor::new(key, key, |_| Ok(()))
    }

    #[test]
    fn test_ungated_actions_always_survive() {
        let actions = vec![noop("view")];
        let resolved = resolve(&actions, &member_matrix(Value::Null));
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_denied_gate_hides_action_for_every_row() {
        let actions = vec![noop("edit").gate("lead", "update")];
        let matrix = member_matrix(json!({"lead": {"update": false}}));
        let resolved = resolve(&actions, &matrix);
        assert!(resolved.is_empty());
        // Even a should_show that would return true cannot resurrect it.
        let actions = vec![noop("edit")
            .gate("lead", "update")
            .should_show(|_| true)];
        assert!(resolve(&actions, &matrix).is_empty());
    }

    #[test]
    fn test_granted_gate_keeps_action() {
        let actions = vec![
            noop("edit").gate("lead", "update"),
            noop("delete").gate("lead", "delete").danger(),
        ];
        let matrix = member_matrix(json!({"lead": {"update": true}}));
        let resolved = resolve(&actions, &matrix);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].key, "edit");
    }

    #[test]
    fn test_should_show_filters_per_row() {
        let actions = vec![
            noop("archive").should_show(|row| row.get("status") == Some(&json!("open"))),
            noop("view"),
        ];
        let resolved = resolve(&actions, &member_matrix(Value::Null));

        let open = json!({"status": "open"});
        let closed = json!({"status": "closed"});
        assert_eq!(visible_for(&resolved, &open).len(), 2);
        let visible = visible_for(&resolved, &closed);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].key, "view");
    }

    #[test]
    fn test_dispatch_invokes_handler() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let action = ActionDescriptor::new("edit", "Edit", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        assert!(dispatch(&action, &json!({"id": 1})).is_none());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_dispatch_catches_handler_failure() {
        let action =
            ActionDescriptor::new("edit", "Edit", |_| Err(ActionError::failed("edit", "boom")));
        let notice = dispatch(&action, &json!({"id": 1})).expect("failure surfaces a notice");
        assert!(notice.message.contains("boom"));
    }
}
