use chrono::NaiveDate;

use super::super::domain::{Campaign, Candidate};
use super::super::status::StatusBucket;
use super::coverage::campaign_candidates;
use super::views::{CampaignRisk, CampaignTotals, RiskLevel};

/// Campaign-wide counts the risk heuristic works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskInputs {
    pub totals: CampaignTotals,
    pub days_to_start: i64,
}

impl RiskInputs {
    pub fn gather(campaign: &Campaign, candidates: &[Candidate], today: NaiveDate) -> Self {
        Self {
            totals: campaign_totals(campaign, candidates),
            days_to_start: campaign.period.days_to_start(today),
        }
    }
}

pub fn campaign_totals(campaign: &Campaign, candidates: &[Candidate]) -> CampaignTotals {
    let mut totals = CampaignTotals {
        required: campaign.total_required(),
        candidates: 0,
        ready: 0,
        in_review: 0,
        critical: 0,
    };

    for candidate in campaign_candidates(campaign, candidates) {
        totals.candidates += 1;
        match candidate.bucket() {
            StatusBucket::Ready => totals.ready += 1,
            StatusBucket::InReview => totals.in_review += 1,
            StatusBucket::Waiting | StatusBucket::Blocked => totals.critical += 1,
        }
    }

    totals
}

/// Coarse staffing risk. Every rule that fires adds a reason; the level only
/// ever escalates.
pub fn estimate_risk(inputs: &RiskInputs) -> CampaignRisk {
    let CampaignTotals {
        required,
        candidates,
        ready,
        ..
    } = inputs.totals;
    let days = inputs.days_to_start;

    let mut level = RiskLevel::Low;
    let mut reasons = Vec::new();

    if candidates < required {
        level = RiskLevel::High;
        reasons.push(format!(
            "pipeline gap: missing {} candidates",
            required - candidates
        ));
    }

    if ready < required {
        if days > 0 && days <= 7 {
            level = RiskLevel::High;
            reasons.push(format!(
                "time-critical: only {ready}/{required} ready at {days} days"
            ));
        } else if days == 0 {
            level = RiskLevel::High;
            reasons.push(format!(
                "campaign started: still missing {} workers",
                required - ready
            ));
        } else if days <= 15 && ready * 2 < required {
            level = RiskLevel::High;
            reasons.push("insufficient readiness: under 50% ready".to_string());
        } else if level != RiskLevel::High {
            level = RiskLevel::Medium;
            reasons.push(format!("partial coverage: {ready}/{required} ready"));
        }
    }

    let ready_points = ready.min(u8::MAX as usize) as u8;
    let confidence = match level {
        RiskLevel::Low => 98,
        RiskLevel::Medium => 65 + ready_points.saturating_mul(3).min(15),
        RiskLevel::High => 35 + ready_points.saturating_mul(5).min(20),
    };

    CampaignRisk {
        level,
        reasons,
        confidence,
        days_to_start: days,
    }
}

pub fn campaign_risk(campaign: &Campaign, candidates: &[Candidate], today: NaiveDate) -> CampaignRisk {
    estimate_risk(&RiskInputs::gather(campaign, candidates, today))
}
