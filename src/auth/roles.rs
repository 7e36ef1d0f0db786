// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `SuperAdmin` - Platform operator; provisions company representatives
/// - `Admin` - Company representative with full company-dashboard access
/// - `Employee` - Company staff member; triages LGPD requests
/// - `DataSubject` - End user; submits and views their own requests
///
/// The hierarchy is a strict order (`super_admin > admin > employee >
/// data_subject`). Two policies are built on it: `has_privilege` for
/// minimum-rank checks and the exact set checks used by the route table
/// (`is_company_staff`, equality for super-admin-only operations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator
    SuperAdmin,
    /// Company representative
    Admin,
    /// Company staff
    Employee,
    /// End user (request submitter)
    DataSubject,
}

impl Role {
    /// Ordinal rank within the hierarchy; higher means more privileged.
    pub fn rank(self) -> u8 {
        match self {
            Role::SuperAdmin => 3,
            Role::Admin => 2,
            Role::Employee => 1,
            Role::DataSubject => 0,
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Exact membership in the company-scoped role set `{admin, employee}`.
    /// Note: `super_admin` is deliberately not a member; company routes are
    /// scoped to company staff only.
    pub fn is_company_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }

    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "data_subject" => Some(Role::DataSubject),
            _ => None,
        }
    }
}

impl Default for Role {
    /// Default role is DataSubject (least privilege).
    fn default() -> Self {
        Role::DataSubject
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::Admin => write!(f, "admin"),
            Role::Employee => write!(f, "employee"),
            Role::DataSubject => write!(f, "data_subject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_strictly_ordered() {
        assert!(Role::SuperAdmin.rank() > Role::Admin.rank());
        assert!(Role::Admin.rank() > Role::Employee.rank());
        assert!(Role::Employee.rank() > Role::DataSubject.rank());
    }

    #[test]
    fn super_admin_has_all_privileges() {
        assert!(Role::SuperAdmin.has_privilege(Role::SuperAdmin));
        assert!(Role::SuperAdmin.has_privilege(Role::Admin));
        assert!(Role::SuperAdmin.has_privilege(Role::Employee));
        assert!(Role::SuperAdmin.has_privilege(Role::DataSubject));
    }

    #[test]
    fn data_subject_only_has_own_privilege() {
        assert!(!Role::DataSubject.has_privilege(Role::SuperAdmin));
        assert!(!Role::DataSubject.has_privilege(Role::Admin));
        assert!(!Role::DataSubject.has_privilege(Role::Employee));
        assert!(Role::DataSubject.has_privilege(Role::DataSubject));
    }

    #[test]
    fn company_staff_is_exactly_admin_and_employee() {
        assert!(Role::Admin.is_company_staff());
        assert!(Role::Employee.is_company_staff());
        assert!(!Role::SuperAdmin.is_company_staff());
        assert!(!Role::DataSubject.is_company_staff());
    }

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("super_admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("Employee"), Some(Role::Employee));
        assert_eq!(Role::from_str("data_subject"), Some(Role::DataSubject));
        assert_eq!(Role::from_str("unknown"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            r#""super_admin""#
        );
        assert_eq!(
            serde_json::from_str::<Role>(r#""data_subject""#).unwrap(),
            Role::DataSubject
        );
    }

    #[test]
    fn default_role_is_data_subject() {
        assert_eq!(Role::default(), Role::DataSubject);
    }
}
