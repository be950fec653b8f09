use super::super::domain::{Campaign, Candidate};
use super::super::status::StatusBucket;
use super::views::RoleSummary;

/// Share of the required headcount already in the ready bucket.
///
/// A role that needs nobody reports 0 rather than dividing by zero.
pub fn coverage_percentage(ok: usize, required: u32) -> u8 {
    if required == 0 {
        return 0;
    }
    let pct = ((ok as f64 / required as f64) * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

pub(crate) fn campaign_candidates<'a>(
    campaign: &'a Campaign,
    candidates: &'a [Candidate],
) -> impl Iterator<Item = &'a Candidate> + 'a {
    candidates
        .iter()
        .filter(move |candidate| candidate.campaign_id == campaign.id)
}

/// One summary per campaign role, in the campaign's role order.
pub fn role_summaries(campaign: &Campaign, candidates: &[Candidate]) -> Vec<RoleSummary> {
    campaign
        .roles
        .iter()
        .map(|role| {
            let mut summary = RoleSummary {
                title: role.title.clone(),
                required: role.count,
                ok: 0,
                in_review: 0,
                waiting: 0,
                blocked: 0,
                percentage: 0,
            };

            for candidate in
                campaign_candidates(campaign, candidates).filter(|c| c.role == role.title)
            {
                match candidate.bucket() {
                    StatusBucket::Ready => summary.ok += 1,
                    StatusBucket::InReview => summary.in_review += 1,
                    StatusBucket::Waiting => summary.waiting += 1,
                    StatusBucket::Blocked => summary.blocked += 1,
                }
            }

            summary.percentage = coverage_percentage(summary.ok, role.count);
            summary
        })
        .collect()
}
