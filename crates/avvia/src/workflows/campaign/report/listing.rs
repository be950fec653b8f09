use super::super::domain::{Campaign, Candidate};
use super::super::status::CandidateStatus;
use super::coverage::campaign_candidates;
use super::views::{CandidateRow, PipelineListing};

impl CandidateRow {
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            role: candidate.role.clone(),
            status: candidate.status,
            status_label: candidate.status.label(),
            bucket: candidate.bucket(),
            needs_priority_review: candidate.needs_priority_review,
            suspicious_document: candidate.suspicious_document().is_some(),
        }
    }
}

/// Splits a campaign's candidates into the priority-review queue and the main
/// pipeline. Candidates flagged for priority review stay out of the main
/// pipeline whatever their status; `ready_for_offer` covers both.
pub fn pipeline_listing(campaign: &Campaign, candidates: &[Candidate]) -> PipelineListing {
    let (mut priority_review, mut pipeline): (Vec<&Candidate>, Vec<&Candidate>) =
        campaign_candidates(campaign, candidates).partition(|c| c.needs_priority_review);

    // sort_by_key is stable, so ties keep store order.
    pipeline.sort_by_key(|c| c.status.pipeline_priority());
    priority_review.sort_by_key(|c| c.status.pipeline_priority());

    let ready_for_offer = campaign_candidates(campaign, candidates)
        .filter(|c| c.status == CandidateStatus::ReadyForOffer)
        .map(|c| c.id.clone())
        .collect();

    PipelineListing {
        priority_review: priority_review
            .into_iter()
            .map(CandidateRow::from_candidate)
            .collect(),
        pipeline: pipeline.into_iter().map(CandidateRow::from_candidate).collect(),
        ready_for_offer,
    }
}
