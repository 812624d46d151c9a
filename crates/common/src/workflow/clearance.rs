//! Clearance aggregation rules
//!
//! Four departments decide independently; the overall status is derived from
//! the four sub-statuses and never set directly by a caller. A single
//! rejection is terminal for the whole clearance.

use super::permissions::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one department track, and of the clearance overall
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
}

impl ClearanceStatus {
    pub const ALL: &'static [ClearanceStatus] = &[
        ClearanceStatus::Pending,
        ClearanceStatus::InReview,
        ClearanceStatus::Approved,
        ClearanceStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearanceStatus::Pending => "PENDING",
            ClearanceStatus::InReview => "IN_REVIEW",
            ClearanceStatus::Approved => "APPROVED",
            ClearanceStatus::Rejected => "REJECTED",
        }
    }
}

impl From<String> for ClearanceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IN_REVIEW" => ClearanceStatus::InReview,
            "APPROVED" => ClearanceStatus::Approved,
            "REJECTED" => ClearanceStatus::Rejected,
            _ => ClearanceStatus::Pending,
        }
    }
}

impl From<ClearanceStatus> for String {
    fn from(status: ClearanceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four clearance tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceDepartment {
    Department,
    Academic,
    StudentAffairs,
    Accounts,
}

impl ClearanceDepartment {
    pub const ALL: &'static [ClearanceDepartment] = &[
        ClearanceDepartment::Department,
        ClearanceDepartment::Academic,
        ClearanceDepartment::StudentAffairs,
        ClearanceDepartment::Accounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearanceDepartment::Department => "DEPARTMENT",
            ClearanceDepartment::Academic => "ACADEMIC",
            ClearanceDepartment::StudentAffairs => "STUDENT_AFFAIRS",
            ClearanceDepartment::Accounts => "ACCOUNTS",
        }
    }

    /// The department a given officer role decides for. The binding is fixed;
    /// every other role gets none.
    pub fn for_role(role: Role) -> Option<ClearanceDepartment> {
        match role {
            Role::Hod => Some(ClearanceDepartment::Department),
            Role::Dean => Some(ClearanceDepartment::Academic),
            Role::StudentAffairs => Some(ClearanceDepartment::StudentAffairs),
            Role::Accounts => Some(ClearanceDepartment::Accounts),
            _ => None,
        }
    }
}

impl From<String> for ClearanceDepartment {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACADEMIC" => ClearanceDepartment::Academic,
            "STUDENT_AFFAIRS" => ClearanceDepartment::StudentAffairs,
            "ACCOUNTS" => ClearanceDepartment::Accounts,
            _ => ClearanceDepartment::Department,
        }
    }
}

impl From<ClearanceDepartment> for String {
    fn from(department: ClearanceDepartment) -> Self {
        department.as_str().to_string()
    }
}

impl fmt::Display for ClearanceDepartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the overall clearance status from the four sub-statuses.
///
/// A rejection on any track dominates every recomputation; all four approved
/// yields APPROVED; anything else is IN_REVIEW (there is no distinct
/// "not started" overall once a recomputation runs).
pub fn overall_status(
    department: ClearanceStatus,
    academic: ClearanceStatus,
    affairs: ClearanceStatus,
    accounts: ClearanceStatus,
) -> ClearanceStatus {
    let tracks = [department, academic, affairs, accounts];

    if tracks.contains(&ClearanceStatus::Rejected) {
        ClearanceStatus::Rejected
    } else if tracks.iter().all(|s| *s == ClearanceStatus::Approved) {
        ClearanceStatus::Approved
    } else {
        ClearanceStatus::InReview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClearanceStatus::{Approved, InReview, Pending, Rejected};

    #[test]
    fn test_all_approved_in_any_order() {
        // Approvals land one at a time; overall stays IN_REVIEW until the 4th.
        for order in [[0usize, 1, 2, 3], [3, 1, 0, 2], [2, 3, 1, 0]] {
            let mut tracks = [Pending, Pending, Pending, Pending];
            for (i, &slot) in order.iter().enumerate() {
                tracks[slot] = Approved;
                let overall = overall_status(tracks[0], tracks[1], tracks[2], tracks[3]);
                if i < 3 {
                    assert_eq!(overall, InReview);
                } else {
                    assert_eq!(overall, Approved);
                }
            }
        }
    }

    #[test]
    fn test_first_approve_yields_in_review() {
        // No special case for "nothing started yet".
        assert_eq!(overall_status(Approved, Pending, Pending, Pending), InReview);
    }

    #[test]
    fn test_mixed_statuses_stay_in_review() {
        assert_eq!(overall_status(Approved, Approved, InReview, Pending), InReview);
        assert_eq!(overall_status(Approved, Approved, InReview, Approved), InReview);
        assert_eq!(overall_status(Approved, Approved, Approved, Approved), Approved);
    }

    #[test]
    fn test_single_rejection_dominates() {
        assert_eq!(overall_status(Rejected, Pending, Pending, Pending), Rejected);
        assert_eq!(overall_status(Approved, Approved, Approved, Rejected), Rejected);
        // A later approval on another track cannot pull the overall back.
        assert_eq!(overall_status(Approved, Rejected, Approved, Approved), Rejected);
    }

    #[test]
    fn test_officer_role_binding() {
        assert_eq!(ClearanceDepartment::for_role(Role::Hod), Some(ClearanceDepartment::Department));
        assert_eq!(ClearanceDepartment::for_role(Role::Dean), Some(ClearanceDepartment::Academic));
        assert_eq!(
            ClearanceDepartment::for_role(Role::StudentAffairs),
            Some(ClearanceDepartment::StudentAffairs)
        );
        assert_eq!(
            ClearanceDepartment::for_role(Role::Accounts),
            Some(ClearanceDepartment::Accounts)
        );
        for role in [Role::Student, Role::Supervisor, Role::Examiner, Role::Admin] {
            assert_eq!(ClearanceDepartment::for_role(role), None);
        }
    }

    #[test]
    fn test_status_string_roundtrip() {
        for &status in ClearanceStatus::ALL {
            assert_eq!(ClearanceStatus::from(String::from(status)), status);
        }
        for &department in ClearanceDepartment::ALL {
            assert_eq!(ClearanceDepartment::from(String::from(department)), department);
        }
    }
}
