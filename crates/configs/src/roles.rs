//! Loader for the role-permission file: a `roles` mapping keyed by role
//! name, each entry a list of `{action, resource}` grants.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use domains::{MemberRole, Permission, RolePermissions};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct RolesFile {
    roles: HashMap<String, Vec<PermissionEntry>>,
}

#[derive(Debug, Deserialize)]
struct PermissionEntry {
    action: String,
    resource: String,
}

pub fn load_roles(path: impl AsRef<Path>) -> Result<RolePermissions, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_roles(&raw)
}

pub fn parse_roles(raw: &str) -> Result<RolePermissions, ConfigError> {
    let file: RolesFile = serde_yaml::from_str(raw)?;
    let mut grants = HashMap::new();
    for (role, permissions) in file.roles {
        let role =
            MemberRole::parse_str(&role).map_err(|e| ConfigError::InvalidRules(e.to_string()))?;
        let permissions = permissions
            .into_iter()
            .map(|entry| Permission {
                action: entry.action,
                resource: entry.resource,
            })
            .collect();
        grants.insert(role, permissions);
    }
    Ok(RolePermissions::new(grants))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "
roles:
  ADMIN:
    - action: read
      resource: works
    - action: delete
      resource: works
  STAFF:
    - action: read
      resource: works
  MEMBER:
    - action: read
      resource: works
";

    #[test]
    fn grants_are_role_scoped() {
        let roles = parse_roles(VALID).unwrap();
        assert!(roles.allows(MemberRole::Admin, "delete", "works"));
        assert!(roles.allows(MemberRole::Staff, "read", "works"));
        assert!(!roles.allows(MemberRole::Staff, "delete", "works"));
        assert!(!roles.allows(MemberRole::Member, "delete", "works"));
    }

    #[test]
    fn unknown_role_names_are_rejected() {
        let raw = "
roles:
  OVERLORD:
    - action: read
      resource: works
";
        assert!(matches!(
            parse_roles(raw),
            Err(ConfigError::InvalidRules(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            parse_roles("roles: [not, a, mapping]"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
