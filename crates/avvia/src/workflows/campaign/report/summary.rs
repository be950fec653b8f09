use chrono::NaiveDate;

use super::super::domain::{Campaign, Candidate};
use super::coverage::role_summaries;
use super::risk::{estimate_risk, RiskInputs};
use super::views::{CampaignOverview, ChartBar};

pub fn campaign_overview(
    campaign: &Campaign,
    candidates: &[Candidate],
    today: NaiveDate,
) -> CampaignOverview {
    let inputs = RiskInputs::gather(campaign, candidates, today);
    let totals = inputs.totals;

    let chart = vec![
        ChartBar {
            name: "READY",
            value: totals.ready,
        },
        ChartBar {
            name: "IN REVIEW",
            value: totals.in_review,
        },
        ChartBar {
            name: "CRITICAL",
            value: totals.critical,
        },
        ChartBar {
            name: "TARGET",
            value: totals.required,
        },
    ];

    CampaignOverview {
        campaign_id: campaign.id.clone(),
        name: campaign.name.clone(),
        period: campaign.period.label(),
        reference_date: today,
        totals,
        roles: role_summaries(campaign, candidates),
        risk: estimate_risk(&inputs),
        chart,
    }
}

impl CampaignOverview {
    /// Plain-text rendering used by the CLI.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} ({})\n", self.name, self.period));
        out.push_str(&format!(
            "Risk: {} (confidence {}%), starts in {} days\n",
            self.risk.level.label(),
            self.risk.confidence,
            self.risk.days_to_start
        ));
        for reason in &self.risk.reasons {
            out.push_str(&format!("  - {reason}\n"));
        }
        out.push_str(&format!(
            "Ready {} / in review {} / critical {} / target {}\n",
            self.totals.ready, self.totals.in_review, self.totals.critical, self.totals.required
        ));
        for role in &self.roles {
            out.push_str(&format!(
                "  {:<20} {:>3}% ok {:>2}/{:<2} review {:>2} waiting {:>2} blocked {:>2}\n",
                role.title,
                role.percentage,
                role.ok,
                role.required,
                role.in_review,
                role.waiting,
                role.blocked
            ));
        }
        out
    }
}
