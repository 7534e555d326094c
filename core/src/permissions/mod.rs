//! Caller-scoped permission matrix.
//!
//! A [`PermissionMatrix`] answers one question: may the current caller
//! perform `action` on `module`? It is rebuilt wholesale from the caller's
//! raw permission payload on every session change, then shared read-only by
//! every consumer (guard, action pipeline, row-selection eligibility).
//!
//! # Lookup contract
//!
//! 1. `module` is public → granted, regardless of role or payload
//! 2. otherwise the pluggable [`GrantPolicy`] decides; the default
//!    [`RolePolicy`] grants elevated roles universally and everyone else by
//!    explicit per-module/per-action flag, defaulting to denied
//!
//! # Payload parsing
//!
//! The raw payload is a nullable JSON-like blob. Parsing tolerates `null`,
//! an empty string, a non-JSON string (logged, treated as empty), a JSON
//! string containing an object, or an already-parsed object. Modules whose
//! action map contains no `true` are pruned so "has any permission in this
//! module" is an O(1) key lookup. Malformed input never widens permissions
//! and never panics: it degrades to "no permission".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineConfig;

// =============================================================================
// Roles
// =============================================================================

/// Caller role.
///
/// Unknown role strings parse as [`Role::Member`], the least-privileged
/// role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including administrative modules.
    SuperAdmin,
    /// Full access to business modules.
    Admin,
    /// Access governed by the explicit grant flags.
    Member,
}

impl Role {
    /// Elevated roles bypass per-module flags entirely.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "superadmin" | "super_admin" | "super-admin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            _ => Role::Member,
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "superadmin"),
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

// =============================================================================
// Grant Set Parsing
// =============================================================================

/// Pruned per-module action grants.
pub type Grants = BTreeMap<String, BTreeMap<String, bool>>;

/// Parse a raw permission payload into a pruned grant set.
///
/// Accepts the payload shapes listed in the module docs. Only a boolean
/// `true` counts as granted; anything else (missing, `false`, non-boolean)
/// is denied. Modules with no granted action are dropped.
pub fn parse_grants(raw: &Value) -> Grants {
    let object = match raw {
        Value::Null => return Grants::new(),
        Value::Object(map) => map.clone(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Grants::new();
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    log::warn!("Malformed permission payload, treating as empty");
                    return Grants::new();
                }
            }
        }
        _ => {
            log::warn!("Unexpected permission payload type, treating as empty");
            return Grants::new();
        }
    };

    let mut grants = Grants::new();
    for (module, actions) in object {
        let Value::Object(action_map) = actions else {
            continue;
        };
        let module_grants: BTreeMap<String, bool> = action_map
            .into_iter()
            .map(|(action, flag)| (action, flag == Value::Bool(true)))
            .collect();
        // Prune modules with no granted action so has_any() is O(1).
        if module_grants.values().any(|&granted| granted) {
            grants.insert(module, module_grants);
        }
    }
    grants
}

// =============================================================================
// Grant Policy
// =============================================================================

/// Pluggable grant-decision primitive.
///
/// The public-module exemption is applied by the matrix before the policy
/// is consulted; a policy only sees non-public lookups.
pub trait GrantPolicy {
    /// Decide whether `role` with `grants` may perform `action` on `module`.
    fn grant(&self, role: Role, grants: &Grants, module: &str, action: &str) -> bool;
}

/// Default policy: elevated roles are granted universally, everyone else by
/// explicit flag, defaulting to denied for any missing entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct RolePolicy;

impl GrantPolicy for RolePolicy {
    fn grant(&self, role: Role, grants: &Grants, module: &str, action: &str) -> bool {
        if role.is_elevated() {
            return true;
        }
        grants
            .get(module)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(false)
    }
}

/// Grant-everything policy for deployments that run without enforcement.
///
/// Selecting it is an explicit constructor choice; nothing in the engine
/// falls back to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Permissive;

impl GrantPolicy for Permissive {
    fn grant(&self, _role: Role, _grants: &Grants, _module: &str, _action: &str) -> bool {
        true
    }
}

// =============================================================================
// Caller Context
// =============================================================================

/// Explicit caller identity handed to the engine.
///
/// `permissions` is the raw payload as received from the session endpoint;
/// the matrix parses it defensively.
#[derive(Clone, Debug)]
pub struct CallerContext {
    /// Caller role.
    pub role: Role,
    /// Raw permission payload (nullable JSON-like blob).
    pub permissions: Value,
}

impl CallerContext {
    /// Build a context from a role string and raw payload.
    pub fn new(role: &str, permissions: Value) -> Self {
        Self {
            // Infallible: unknown roles become Member.
            role: role.parse().unwrap_or(Role::Member),
            permissions,
        }
    }
}

// =============================================================================
// Permission Matrix
// =============================================================================

/// Caller-scoped permission lookup shared by every grid consumer.
///
/// Immutable for the duration of a caller session; rebuild (do not patch)
/// on session change.
pub struct PermissionMatrix {
    role: Role,
    grants: Grants,
    public_modules: BTreeSet<String>,
    policy: Rc<dyn GrantPolicy>,
}

impl PermissionMatrix {
    /// Build a matrix with the default [`RolePolicy`].
    pub fn new(role: Role, raw_permissions: &Value, public_modules: BTreeSet<String>) -> Self {
        Self::with_policy(role, raw_permissions, public_modules, Rc::new(RolePolicy))
    }

    /// Build a matrix with an explicit grant policy.
    pub fn with_policy(
        role: Role,
        raw_permissions: &Value,
        public_modules: BTreeSet<String>,
        policy: Rc<dyn GrantPolicy>,
    ) -> Self {
        Self {
            role,
            grants: parse_grants(raw_permissions),
            public_modules,
            policy,
        }
    }

    /// Build a matrix for a caller, taking public modules from the config.
    pub fn for_caller(caller: &CallerContext, config: &EngineConfig) -> Self {
        Self::new(
            caller.role,
            &caller.permissions,
            config.public_modules.clone(),
        )
    }

    /// Whether the caller may perform `action` on `module`.
    pub fn grant(&self, module: &str, action: &str) -> bool {
        if self.public_modules.contains(module) {
            return true;
        }
        self.policy.grant(self.role, &self.grants, module, action)
    }

    /// Whether the caller holds any permission in `module`.
    pub fn has_any(&self, module: &str) -> bool {
        self.public_modules.contains(module)
            || self.role.is_elevated()
            || self.grants.contains_key(module)
    }

    /// The caller's role.
    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Debug for PermissionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionMatrix")
            .field("role", &self.role)
            .field("grants", &self.grants)
            .field("public_modules", &self.public_modules)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matrix(role: Role, raw: Value) -> PermissionMatrix {
        PermissionMatrix::new(role, &raw, BTreeSet::from(["holiday".to_string()]))
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("intern".parse::<Role>().unwrap(), Role::Member);
        assert!(Role::Admin.is_elevated());
        assert!(!Role::Member.is_elevated());
    }

    #[test]
    fn test_public_module_short_circuits() {
        // Granted regardless of role and even with a null payload.
        let m = matrix(Role::Member, Value::Null);
        assert!(m.grant("holiday", "delete"));
        assert!(m.has_any("holiday"));
    }

    #[test]
    fn test_elevated_roles_granted_universally() {
        let m = matrix(Role::Admin, Value::Null);
        assert!(m.grant("lead", "delete"));
        let m = matrix(Role::SuperAdmin, json!({}));
        assert!(m.grant("company", "update"));
    }

    #[test]
    fn test_explicit_flags_default_deny() {
        let m = matrix(Role::Member, json!({"lead": {"read": true, "update": false}}));
        assert!(m.grant("lead", "read"));
        assert!(!m.grant("lead", "update"));
        assert!(!m.grant("lead", "delete"));
        assert!(!m.grant("company", "read"));
    }

    #[test]
    fn test_malformed_payloads_degrade_to_denied() {
        for raw in [
            Value::Null,
            json!(""),
            json!("   "),
            json!("not json at all"),
            json!("[1,2,3]"),
            json!(42),
        ] {
            let m = matrix(Role::Member, raw.clone());
            assert!(!m.grant("lead", "read"), "payload {raw:?} should deny");
        }
    }

    #[test]
    fn test_payload_as_json_string() {
        let m = matrix(Role::Member, json!(r#"{"lead": {"read": true}}"#));
        assert!(m.grant("lead", "read"));
        assert!(!m.grant("lead", "update"));
    }

    #[test]
    fn test_all_false_modules_pruned() {
        let grants = parse_grants(&json!({
            "lead": {"read": false, "update": false},
            "company": {"read": true}
        }));
        assert!(!grants.contains_key("lead"));
        assert!(grants.contains_key("company"));

        let m = matrix(Role::Member, json!({"lead": {"read": false}}));
        assert!(!m.has_any("lead"));
    }

    #[test]
    fn test_non_boolean_flags_denied() {
        let m = matrix(
            Role::Member,
            json!({"lead": {"read": "yes", "update": 1, "delete": true}}),
        );
        assert!(!m.grant("lead", "read"));
        assert!(!m.grant("lead", "update"));
        assert!(m.grant("lead", "delete"));
    }

    #[test]
    fn test_permissive_policy_grants_everything() {
        let m = PermissionMatrix::with_policy(
            Role::Member,
            &Value::Null,
            BTreeSet::new(),
            Rc::new(Permissive),
        );
        assert!(m.grant("lead", "delete"));
    }

    #[test]
    fn test_caller_context_roundtrip() {
        let caller = CallerContext::new("admin", Value::Null);
        let config = EngineConfig::new();
        let m = PermissionMatrix::for_caller(&caller, &config);
        assert_eq!(m.role(), Role::Admin);
        assert!(m.grant("anything", "at-all"));
    }
}
