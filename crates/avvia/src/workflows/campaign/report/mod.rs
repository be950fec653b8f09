mod candidate;
mod coverage;
mod listing;
mod risk;
mod summary;
pub mod views;

pub use candidate::candidate_report;
pub use coverage::{coverage_percentage, role_summaries};
pub use listing::pipeline_listing;
pub use risk::{campaign_risk, campaign_totals, estimate_risk, RiskInputs};
pub use summary::campaign_overview;
pub use views::{
    CampaignOverview, CampaignRisk, CampaignTotals, CandidateReport, CandidateRow, ChartBar,
    ComplianceVerdict, PipelineListing, RiskLevel, RoleSummary,
};
