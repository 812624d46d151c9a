//! Role permission table
//!
//! Static role -> "resource:action" capability mapping. Consulted by the
//! presentation layer to gate UI affordances and handed back on login. Pure
//! data; no algorithm.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor role, the FK target of every acting entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Supervisor,
    Examiner,
    Hod,
    Dean,
    StudentAffairs,
    Accounts,
    Admin,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::Student,
        Role::Supervisor,
        Role::Examiner,
        Role::Hod,
        Role::Dean,
        Role::StudentAffairs,
        Role::Accounts,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Supervisor => "SUPERVISOR",
            Role::Examiner => "EXAMINER",
            Role::Hod => "HOD",
            Role::Dean => "DEAN",
            Role::StudentAffairs => "STUDENT_AFFAIRS",
            Role::Accounts => "ACCOUNTS",
            Role::Admin => "ADMIN",
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .unwrap_or(Role::Student)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions a role may take on one resource
#[derive(Clone, Copy, Debug)]
pub struct Permission {
    pub resource: &'static str,
    pub actions: &'static [&'static str],
}

/// Permissions for each role based on their responsibilities
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Student => &[
            Permission {
                resource: "fyp",
                actions: &[
                    "submit_idea",
                    "select_supervisor",
                    "upload_proposal",
                    "upload_srs",
                    "upload_final_documentation",
                    "track_progress",
                    "view_own_fyp",
                ],
            },
            Permission {
                resource: "clearance",
                actions: &[
                    "submit_request",
                    "view_own_clearance",
                    "view_multi_department_progress",
                ],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Supervisor => &[
            Permission {
                resource: "fyp",
                actions: &[
                    "approve_reject_idea",
                    "accept_reject_supervisor_selection",
                    "upload_plagiarism_report",
                    "upload_ai_similarity_report",
                    "approve_proposal_readiness",
                    "approve_srs",
                    "approve_internal_stage",
                    "forward_to_next_stage",
                    "view_assigned_fyps",
                ],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Examiner => &[
            Permission {
                resource: "evaluation",
                actions: &[
                    "evaluate_proposal",
                    "evaluate_srs",
                    "conduct_evaluation",
                    "enter_marks",
                    "enter_feedback",
                    "view_assigned_evaluations",
                ],
            },
            Permission {
                resource: "fyp",
                actions: &["view_assigned_fyps"],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Hod => &[
            Permission {
                resource: "fyp",
                actions: &[
                    "verify_supervisor_assignment",
                    "approve_fyp_enrollment",
                    "view_all_fyps",
                ],
            },
            Permission {
                resource: "clearance",
                actions: &[
                    "approve_department_clearance",
                    "reject_department_clearance",
                    "view_all_clearances",
                ],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Dean => &[
            Permission {
                resource: "clearance",
                actions: &[
                    "approve_academic_clearance",
                    "confirm_academic_eligibility",
                    "view_all_clearances",
                ],
            },
            Permission {
                resource: "fyp",
                actions: &["view_all_fyps"],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::StudentAffairs => &[
            Permission {
                resource: "clearance",
                actions: &[
                    "approve_hostel_clearance",
                    "approve_library_clearance",
                    "approve_lab_clearance",
                    "validate_activity_records",
                    "view_all_clearances",
                ],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Accounts => &[
            Permission {
                resource: "clearance",
                actions: &[
                    "check_dues",
                    "approve_financial_clearance",
                    "view_all_clearances",
                ],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read"],
            },
        ],
        Role::Admin => &[
            Permission {
                resource: "admin",
                actions: &[
                    "manage_users",
                    "manage_permissions",
                    "configure_workflows",
                    "ensure_security",
                    "view_analytics",
                ],
            },
            Permission {
                resource: "fyp",
                actions: &["view_all_fyps", "manage_stages"],
            },
            Permission {
                resource: "clearance",
                actions: &["view_all_clearances", "manage_clearances"],
            },
            Permission {
                resource: "notifications",
                actions: &["view", "mark_read", "manage"],
            },
        ],
    }
}

/// Check if a role has a specific permission
pub fn has_permission(role: Role, resource: &str, action: &str) -> bool {
    role_permissions(role)
        .iter()
        .find(|p| p.resource == resource)
        .is_some_and(|p| p.actions.contains(&action))
}

/// Flattened list of all permissions for a role (format: resource:action)
pub fn flattened_permissions(role: Role) -> Vec<String> {
    role_permissions(role)
        .iter()
        .flat_map(|p| {
            p.actions
                .iter()
                .map(move |action| format!("{}:{}", p.resource, action))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_permission() {
        assert!(has_permission(Role::Student, "fyp", "submit_idea"));
        assert!(has_permission(Role::Hod, "clearance", "approve_department_clearance"));
        assert!(!has_permission(Role::Student, "clearance", "approve_department_clearance"));
        assert!(!has_permission(Role::Accounts, "fyp", "submit_idea"));
        assert!(!has_permission(Role::Examiner, "unknown", "view"));
    }

    #[test]
    fn test_flattened_permissions() {
        let perms = flattened_permissions(Role::Student);
        assert!(perms.contains(&"fyp:submit_idea".to_string()));
        assert!(perms.contains(&"clearance:submit_request".to_string()));
        assert!(perms.contains(&"notifications:mark_read".to_string()));
    }

    #[test]
    fn test_every_role_can_read_notifications() {
        for &role in Role::ALL {
            assert!(has_permission(role, "notifications", "view"));
            assert!(has_permission(role, "notifications", "mark_read"));
        }
    }

    #[test]
    fn test_role_string_roundtrip() {
        for &role in Role::ALL {
            assert_eq!(Role::from(String::from(role)), role);
        }
        assert_eq!(Role::from("NOBODY".to_string()), Role::Student);
    }
}
