//! FYP stage machine
//!
//! The stage enum, the fixed transition table, the milestone-timestamp
//! mapping, and the document-upload advance table. The enum values are part
//! of the wire contract with any client that renders a progress UI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of an FYP
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FypStage {
    IdeaPending,
    IdeaApproved,
    IdeaRejected,
    SupervisorPending,
    SupervisorAssigned,
    ProposalPending,
    ProposalApproved,
    ProposalRejected,
    SrsPending,
    SrsApproved,
    SrsRejected,
    InternalPending,
    InternalDone,
    ExternalPending,
    ExternalDone,
    Completed,
}

impl FypStage {
    /// Every stage, in lifecycle order
    pub const ALL: &'static [FypStage] = &[
        FypStage::IdeaPending,
        FypStage::IdeaApproved,
        FypStage::IdeaRejected,
        FypStage::SupervisorPending,
        FypStage::SupervisorAssigned,
        FypStage::ProposalPending,
        FypStage::ProposalApproved,
        FypStage::ProposalRejected,
        FypStage::SrsPending,
        FypStage::SrsApproved,
        FypStage::SrsRejected,
        FypStage::InternalPending,
        FypStage::InternalDone,
        FypStage::ExternalPending,
        FypStage::ExternalDone,
        FypStage::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FypStage::IdeaPending => "IDEA_PENDING",
            FypStage::IdeaApproved => "IDEA_APPROVED",
            FypStage::IdeaRejected => "IDEA_REJECTED",
            FypStage::SupervisorPending => "SUPERVISOR_PENDING",
            FypStage::SupervisorAssigned => "SUPERVISOR_ASSIGNED",
            FypStage::ProposalPending => "PROPOSAL_PENDING",
            FypStage::ProposalApproved => "PROPOSAL_APPROVED",
            FypStage::ProposalRejected => "PROPOSAL_REJECTED",
            FypStage::SrsPending => "SRS_PENDING",
            FypStage::SrsApproved => "SRS_APPROVED",
            FypStage::SrsRejected => "SRS_REJECTED",
            FypStage::InternalPending => "INTERNAL_PENDING",
            FypStage::InternalDone => "INTERNAL_DONE",
            FypStage::ExternalPending => "EXTERNAL_PENDING",
            FypStage::ExternalDone => "EXTERNAL_DONE",
            FypStage::Completed => "COMPLETED",
        }
    }

    /// Stages reachable from this one via an explicit transition request
    pub fn allowed_transitions(&self) -> &'static [FypStage] {
        match self {
            FypStage::IdeaPending => &[FypStage::IdeaApproved, FypStage::IdeaRejected],
            FypStage::IdeaApproved => &[FypStage::SupervisorPending],
            FypStage::IdeaRejected => &[],
            FypStage::SupervisorPending => &[FypStage::SupervisorAssigned],
            FypStage::SupervisorAssigned => &[FypStage::ProposalPending],
            FypStage::ProposalPending => &[FypStage::ProposalApproved, FypStage::ProposalRejected],
            FypStage::ProposalApproved => &[FypStage::SrsPending],
            FypStage::ProposalRejected => &[],
            FypStage::SrsPending => &[FypStage::SrsApproved, FypStage::SrsRejected],
            FypStage::SrsApproved => &[FypStage::InternalPending],
            FypStage::SrsRejected => &[],
            FypStage::InternalPending => &[FypStage::InternalDone],
            FypStage::InternalDone => &[FypStage::ExternalPending],
            FypStage::ExternalPending => &[FypStage::ExternalDone],
            FypStage::ExternalDone => &[FypStage::Completed],
            FypStage::Completed => &[],
        }
    }

    pub fn can_transition_to(&self, target: FypStage) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Check if this stage has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// The once-set timestamp this stage stamps on first entry, if any
    pub fn milestone(&self) -> Option<Milestone> {
        match self {
            FypStage::IdeaApproved => Some(Milestone::IdeaApproved),
            FypStage::ProposalApproved => Some(Milestone::ProposalApproved),
            FypStage::SrsApproved => Some(Milestone::SrsApproved),
            FypStage::InternalDone => Some(Milestone::InternalDone),
            FypStage::ExternalDone => Some(Milestone::ExternalDone),
            FypStage::Completed => Some(Milestone::Completed),
            _ => None,
        }
    }
}

impl From<String> for FypStage {
    fn from(s: String) -> Self {
        FypStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .unwrap_or(FypStage::IdeaPending)
    }
}

impl From<FypStage> for String {
    fn from(stage: FypStage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for FypStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six milestone timestamps an FYP accrues on its way to completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    IdeaApproved,
    ProposalApproved,
    SrsApproved,
    InternalDone,
    ExternalDone,
    Completed,
}

/// Kind of artifact attached to an FYP
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Proposal,
    Srs,
    Final,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "PROPOSAL",
            DocumentType::Srs => "SRS",
            DocumentType::Final => "FINAL",
        }
    }
}

impl From<String> for DocumentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SRS" => DocumentType::Srs,
            "FINAL" => DocumentType::Final,
            _ => DocumentType::Proposal,
        }
    }
}

impl From<DocumentType> for String {
    fn from(doc_type: DocumentType) -> Self {
        doc_type.as_str().to_string()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploads that move the stage forward: (stage at upload, document type,
/// stage after upload). Any combination not listed leaves the stage untouched.
pub const UPLOAD_STAGE_ADVANCES: &[(FypStage, DocumentType, FypStage)] = &[
    (FypStage::SupervisorAssigned, DocumentType::Proposal, FypStage::ProposalPending),
    (FypStage::ProposalApproved, DocumentType::Srs, FypStage::SrsPending),
];

/// Stage a document upload advances to, if the (stage, type) pair is listed
pub fn advance_on_upload(stage: FypStage, doc_type: DocumentType) -> Option<FypStage> {
    UPLOAD_STAGE_ADVANCES
        .iter()
        .find(|(from, dt, _)| *from == stage && *dt == doc_type)
        .map(|(_, _, to)| *to)
}

/// Version assigned to a new document given the latest stored version of the
/// same (FYP, type) pair
pub fn next_document_version(latest: Option<i32>) -> i32 {
    latest.map_or(1, |v| v + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_connected() {
        let path = [
            FypStage::IdeaPending,
            FypStage::IdeaApproved,
            FypStage::SupervisorPending,
            FypStage::SupervisorAssigned,
            FypStage::ProposalPending,
            FypStage::ProposalApproved,
            FypStage::SrsPending,
            FypStage::SrsApproved,
            FypStage::InternalPending,
            FypStage::InternalDone,
            FypStage::ExternalPending,
            FypStage::ExternalDone,
            FypStage::Completed,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "expected {} -> {} to be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unlisted_pairs_are_rejected() {
        // Sweep every pair; only the adjacency table entries pass.
        for &from in FypStage::ALL {
            for &to in FypStage::ALL {
                let listed = from.allowed_transitions().contains(&to);
                assert_eq!(from.can_transition_to(to), listed);
            }
        }
        // Spot-check a few tempting shortcuts.
        assert!(!FypStage::IdeaPending.can_transition_to(FypStage::Completed));
        assert!(!FypStage::ProposalPending.can_transition_to(FypStage::SrsPending));
        assert!(!FypStage::IdeaApproved.can_transition_to(FypStage::IdeaPending));
    }

    #[test]
    fn test_terminal_stages() {
        for stage in [
            FypStage::Completed,
            FypStage::IdeaRejected,
            FypStage::ProposalRejected,
            FypStage::SrsRejected,
        ] {
            assert!(stage.is_terminal());
        }
        assert!(!FypStage::ExternalDone.is_terminal());
    }

    #[test]
    fn test_rejected_branches_reachable_from_pending() {
        assert!(FypStage::IdeaPending.can_transition_to(FypStage::IdeaRejected));
        assert!(FypStage::ProposalPending.can_transition_to(FypStage::ProposalRejected));
        assert!(FypStage::SrsPending.can_transition_to(FypStage::SrsRejected));
    }

    #[test]
    fn test_milestone_mapping() {
        let milestones: Vec<_> = FypStage::ALL
            .iter()
            .filter_map(|stage| stage.milestone())
            .collect();
        assert_eq!(milestones.len(), 6);
        assert_eq!(FypStage::IdeaApproved.milestone(), Some(Milestone::IdeaApproved));
        assert_eq!(FypStage::Completed.milestone(), Some(Milestone::Completed));
        assert_eq!(FypStage::IdeaPending.milestone(), None);
        assert_eq!(FypStage::SrsRejected.milestone(), None);
    }

    #[test]
    fn test_upload_advances() {
        assert_eq!(
            advance_on_upload(FypStage::SupervisorAssigned, DocumentType::Proposal),
            Some(FypStage::ProposalPending)
        );
        assert_eq!(
            advance_on_upload(FypStage::ProposalApproved, DocumentType::Srs),
            Some(FypStage::SrsPending)
        );
        // A second proposal upload after the advance does not move the stage again.
        assert_eq!(advance_on_upload(FypStage::ProposalPending, DocumentType::Proposal), None);
        // No other combination advances.
        for &stage in FypStage::ALL {
            for doc_type in [DocumentType::Proposal, DocumentType::Srs, DocumentType::Final] {
                let listed = UPLOAD_STAGE_ADVANCES
                    .iter()
                    .any(|(from, dt, _)| *from == stage && *dt == doc_type);
                assert_eq!(advance_on_upload(stage, doc_type).is_some(), listed);
            }
        }
    }

    #[test]
    fn test_upload_advances_are_legal_transitions() {
        for (from, _, to) in UPLOAD_STAGE_ADVANCES {
            assert!(from.can_transition_to(*to));
        }
    }

    #[test]
    fn test_stage_string_roundtrip() {
        for &stage in FypStage::ALL {
            assert_eq!(FypStage::from(String::from(stage)), stage);
        }
        // Unknown values fall back to the initial stage.
        assert_eq!(FypStage::from("BOGUS".to_string()), FypStage::IdeaPending);
    }

    #[test]
    fn test_next_document_version() {
        assert_eq!(next_document_version(None), 1);
        assert_eq!(next_document_version(Some(1)), 2);
        assert_eq!(next_document_version(Some(7)), 8);
    }
}
