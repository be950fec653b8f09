use super::super::domain::{Campaign, Candidate};
use super::super::requirements::{resolve_display_documents, RoleDocumentCatalog};
use super::views::{CandidateReport, ComplianceVerdict};

const RECENT_ACTIVITY: usize = 5;

/// Compliance summary for a single candidate, ready for rendering.
pub fn candidate_report(
    candidate: &Candidate,
    campaign: &Campaign,
    catalog: &RoleDocumentCatalog,
) -> CandidateReport {
    let verdict = ComplianceVerdict::for_status(candidate.status);
    let documents = resolve_display_documents(candidate, campaign, catalog).documents;

    CandidateReport {
        candidate_id: candidate.id.clone(),
        name: candidate.name.clone(),
        role: candidate.role.clone(),
        campaign: campaign.name.clone(),
        location: campaign.location.clone(),
        status: candidate.status,
        status_label: candidate.status.label(),
        verdict,
        verdict_label: verdict.label(),
        documents,
        recent_activity: candidate
            .audit_log
            .iter()
            .take(RECENT_ACTIVITY)
            .cloned()
            .collect(),
    }
}
