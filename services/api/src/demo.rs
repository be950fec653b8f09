use crate::infra::{build_pipeline, PipelineService};
use avvia::config::{AppConfig, PipelineSettings};
use avvia::error::AppError;
use avvia::workflows::campaign::pipeline::{CandidateAction, DocumentRequestReason};
use avvia::workflows::campaign::report::{CampaignOverview, PipelineListing};
use avvia::workflows::campaign::{CampaignId, CandidateId, DEMO_CAMPAIGN_ID};
use avvia::workflows::roster::RosterSource;
use chrono::{Duration, NaiveDate, NaiveTime};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CampaignReportArgs {
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional roster CSV to import into the demo campaign before reporting
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Roster provenance, `ats:<provider>` or `manual`
    #[arg(long, default_value = "manual")]
    pub(crate) source: String,
    /// Include the candidate pipeline in the output
    #[arg(long)]
    pub(crate) list_candidates: bool,
    /// Print the overview as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reference date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Only print the initial state, without applying operator actions
    #[arg(long)]
    pub(crate) skip_actions: bool,
}

fn demo_settings(today: Option<NaiveDate>) -> Result<PipelineSettings, AppError> {
    let mut settings = AppConfig::load()?.pipeline;
    if today.is_some() {
        settings.reference_date = today;
    }
    settings.seed_demo = true;
    Ok(settings)
}

fn demo_campaign() -> CampaignId {
    CampaignId(DEMO_CAMPAIGN_ID.to_string())
}

pub(crate) fn run_campaign_report(args: CampaignReportArgs) -> Result<(), AppError> {
    let CampaignReportArgs {
        today,
        roster,
        source,
        list_candidates,
        json,
    } = args;

    let settings = demo_settings(today)?;
    let today = settings.today();
    let (service, _) = build_pipeline(settings)?;
    let campaign_id = demo_campaign();

    if let Some(path) = roster {
        let file = File::open(&path)?;
        let summary = service.import_roster(&campaign_id, file, &RosterSource::parse(&source))?;
        println!(
            "Imported {} candidates from {}",
            summary.imported.len(),
            path.display()
        );
        for role in &summary.unmatched_roles {
            println!("  ! role '{role}' is not configured on the campaign");
        }
    }

    let overview = service.overview(&campaign_id, Some(today))?;
    if json {
        match serde_json::to_string_pretty(&overview) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("Unable to render overview as JSON: {err}"),
        }
    } else {
        render_overview(&overview);
    }

    if list_candidates {
        render_pipeline(&service.pipeline(&campaign_id)?);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = demo_settings(args.today)?;
    let today = settings.today();
    let (service, outbox) = build_pipeline(settings)?;
    let campaign_id = demo_campaign();

    println!("AvvIA campaign demo");
    render_overview(&service.overview(&campaign_id, Some(today))?);
    render_pipeline(&service.pipeline(&campaign_id)?);
    render_documents(&service, "c1")?;

    if args.skip_actions {
        return Ok(());
    }

    println!("\nOperator actions");
    let visit = CandidateAction::ScheduleMedicalVisit {
        date: today + Duration::days(2),
        time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        location: "Bitonto site".to_string(),
    };
    let steps = [
        ("c10", CandidateAction::Approve),
        (
            "c1",
            CandidateAction::RequestDocuments {
                reason: DocumentRequestReason::Suspicious,
            },
        ),
        ("c7", visit),
        ("c5", CandidateAction::SendReminder),
        // Already past the offer stage: shows a refused transition.
        ("c6", CandidateAction::SendOffer),
    ];
    for (id, action) in steps {
        let candidate_id = CandidateId(id.to_string());
        match service.apply(&candidate_id, &action) {
            Ok(candidate) => println!(
                "- {} {} -> {}",
                action.kind().label(),
                candidate.name,
                candidate.status.tag()
            ),
            Err(err) => println!("- {} {id} refused: {err}", action.kind().label()),
        }
    }

    let offers = service.send_contracts_to_ready(&campaign_id)?;
    println!("- contracts sent to {} ready candidates", offers.len());

    println!("\nOutbound WhatsApp messages");
    for message in outbox.sent() {
        println!(
            "  [{}] {} ({}): {}",
            message.sent_at.format("%H:%M"),
            message.candidate_id,
            message.phone.as_deref().unwrap_or("no phone"),
            message.text
        );
    }

    println!();
    render_overview(&service.overview(&campaign_id, Some(today))?);
    Ok(())
}

fn render_overview(overview: &CampaignOverview) {
    println!("{}", overview.render_text());
}

fn render_pipeline(listing: &PipelineListing) {
    if !listing.priority_review.is_empty() {
        println!("Priority review:");
        for row in &listing.priority_review {
            println!("  {:<6} {:<20} {:<18} {}", row.id.0, row.name, row.role, row.status_label);
        }
    }
    println!("Pipeline:");
    for row in &listing.pipeline {
        let marker = if row.suspicious_document { " !" } else { "" };
        println!(
            "  {:<6} {:<20} {:<18} {}{}",
            row.id.0, row.name, row.role, row.status_label, marker
        );
    }
    println!("Ready for offer: {}", listing.ready_for_offer.len());
}

fn render_documents(service: &PipelineService, id: &str) -> Result<(), AppError> {
    let candidate_id = CandidateId(id.to_string());
    let candidate = service.candidate(&candidate_id)?;
    let resolution = service.display_documents(&candidate_id)?;
    println!(
        "\nDocuments for {} ({} needing attention)",
        candidate.name,
        resolution.missing_count()
    );
    for entry in &resolution.documents {
        let badge = if entry.mandatory { "*" } else { " " };
        println!(
            "  {badge} {:<32} {}",
            entry.document.doc_type, entry.status_label
        );
    }
    Ok(())
}
