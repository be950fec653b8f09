use avvia::workflows::campaign::report::{
    campaign_overview, coverage_percentage, estimate_risk, role_summaries, CampaignTotals,
    RiskInputs, RiskLevel,
};
use avvia::workflows::campaign::{
    Campaign, CampaignBlueprint, CampaignId, CampaignPeriod, CampaignRole, Candidate, CandidateId,
    CandidateStatus,
};
use chrono::{Duration, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn campaign(roles: Vec<CampaignRole>, start: NaiveDate) -> Campaign {
    Campaign {
        id: CampaignId("tomato-24".to_string()),
        name: "Tomato campaign".to_string(),
        product_type: "Tomatoes".to_string(),
        location: "Foggia (FG)".to_string(),
        period: CampaignPeriod {
            start,
            end: start + Duration::days(60),
        },
        created_at: date(2024, 6, 1).and_hms_opt(9, 0, 0).expect("valid time"),
        agent_active: true,
        roles,
    }
}

fn candidates(campaign: &Campaign, role: &str, mix: &[(CandidateStatus, usize)]) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (status, count) in mix {
        for _ in 0..*count {
            out.push(Candidate::new(
                CandidateId(format!("{}-{}", role, out.len())),
                format!("Worker {}", out.len()),
                role,
                campaign.id.clone(),
                *status,
            ));
        }
    }
    out
}

#[test]
fn field_worker_coverage_counts_ready_and_waiting_candidates() {
    let campaign = campaign(
        vec![CampaignRole::new("Field worker", 12, &["Identity document"])],
        date(2024, 7, 1),
    );
    let pool = candidates(
        &campaign,
        "Field worker",
        &[
            (CandidateStatus::ReadyForOffer, 10),
            (CandidateStatus::PendingDocs, 2),
        ],
    );

    let summaries = role_summaries(&campaign, &pool);

    assert_eq!(summaries.len(), 1);
    let field = &summaries[0];
    assert_eq!(field.ok, 10);
    assert_eq!(field.waiting, 2);
    assert_eq!(field.in_review, 0);
    assert_eq!(field.blocked, 0);
    assert_eq!(field.percentage, 83);
}

#[test]
fn coverage_is_bounded_and_zero_for_empty_roles() {
    assert_eq!(coverage_percentage(0, 0), 0);
    assert_eq!(coverage_percentage(4, 0), 0);
    assert_eq!(coverage_percentage(15, 10), 100);
    assert_eq!(coverage_percentage(1, 3), 33);
    assert_eq!(coverage_percentage(2, 3), 67);
}

#[test]
fn coverage_never_decreases_as_candidates_become_ready() {
    let campaign = campaign(
        vec![CampaignRole::new("Line worker", 7, &["Identity document"])],
        date(2024, 7, 1),
    );
    let mut pool = candidates(&campaign, "Line worker", &[(CandidateStatus::Verifying, 9)]);

    let mut previous = role_summaries(&campaign, &pool)[0].percentage;
    for index in 0..pool.len() {
        pool[index].status = CandidateStatus::ReadyForOffer;
        let current = role_summaries(&campaign, &pool)[0].percentage;
        assert!(current >= previous, "{current} < {previous}");
        assert!(current <= 100);
        previous = current;
    }
    assert_eq!(previous, 100);
}

#[test]
fn candidates_of_other_campaigns_are_ignored() {
    let campaign = campaign(
        vec![CampaignRole::new("Field worker", 2, &["Identity document"])],
        date(2024, 7, 1),
    );
    let mut pool = candidates(&campaign, "Field worker", &[(CandidateStatus::ReadyToStart, 1)]);
    let mut stranger = pool[0].clone();
    stranger.id = CandidateId("stranger".to_string());
    stranger.campaign_id = CampaignId("other".to_string());
    pool.push(stranger);

    assert_eq!(role_summaries(&campaign, &pool)[0].ok, 1);
}

#[test]
fn five_days_out_with_low_readiness_is_high_risk() {
    let inputs = RiskInputs {
        totals: CampaignTotals {
            required: 10,
            candidates: 10,
            ready: 3,
            in_review: 4,
            critical: 3,
        },
        days_to_start: 5,
    };

    let risk = estimate_risk(&inputs);

    assert_eq!(risk.level, RiskLevel::High);
    assert!(risk
        .reasons
        .iter()
        .any(|reason| reason.contains("3/10") && reason.contains("5 days")));
}

#[test]
fn a_short_pipeline_reports_the_gap() {
    let inputs = RiskInputs {
        totals: CampaignTotals {
            required: 20,
            candidates: 15,
            ready: 15,
            in_review: 0,
            critical: 0,
        },
        days_to_start: 40,
    };

    let risk = estimate_risk(&inputs);

    assert_eq!(risk.level, RiskLevel::High);
    assert!(risk.reasons[0].contains("missing 5 candidates"));
}

#[test]
fn a_fully_staffed_campaign_is_low_risk() {
    let campaign = campaign(
        vec![CampaignRole::new("Field worker", 3, &["Identity document"])],
        date(2024, 7, 1),
    );
    let pool = candidates(&campaign, "Field worker", &[(CandidateStatus::ContractSigned, 3)]);

    let overview = campaign_overview(&campaign, &pool, date(2024, 6, 1));

    assert_eq!(overview.risk.level, RiskLevel::Low);
    assert!(overview.risk.reasons.is_empty());
    assert_eq!(overview.roles[0].percentage, 100);
}

#[test]
fn demo_overview_matches_the_seeded_pool() {
    let today = date(2024, 9, 16);
    let blueprint = CampaignBlueprint::demo(today);

    let overview = campaign_overview(&blueprint.campaign, &blueprint.candidates, today);

    assert_eq!(overview.totals.required, 20);
    assert_eq!(overview.totals.candidates, 11);
    assert_eq!(overview.totals.ready, 5);
    assert_eq!(overview.totals.in_review, 2);
    assert_eq!(overview.totals.critical, 4);
    assert_eq!(overview.risk.days_to_start, 15);
    assert_eq!(overview.risk.level, RiskLevel::High);

    let target = overview
        .chart
        .iter()
        .find(|bar| bar.name == "TARGET")
        .expect("target bar");
    assert_eq!(target.value, 20);

    let text = overview.render_text();
    assert!(text.starts_with("Olive campaign"));
    assert!(text.contains("Field worker"));
}
