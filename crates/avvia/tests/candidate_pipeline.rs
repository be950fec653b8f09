use std::collections::HashSet;
use std::sync::Arc;

use avvia::config::PipelineSettings;
use avvia::workflows::campaign::pipeline::{
    CampaignPipelineService, CandidateAction, InMemoryOutbox, InMemoryPipelineStore,
};
use avvia::workflows::campaign::{
    resolve_display_documents, CampaignBlueprint, CampaignId, CandidateId, CandidateStatus,
    RequirementSource, RoleDocumentCatalog, StatusBucket, DEMO_CAMPAIGN_ID,
};
use avvia::workflows::roster::{RosterImporter, RosterSource};
use chrono::{NaiveDate, NaiveTime};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 16).expect("valid date")
}

fn service() -> (
    CampaignPipelineService<InMemoryPipelineStore, InMemoryOutbox>,
    Arc<InMemoryOutbox>,
) {
    let outbox = Arc::new(InMemoryOutbox::new());
    let service = CampaignPipelineService::new(
        Arc::new(InMemoryPipelineStore::new()),
        outbox.clone(),
        PipelineSettings {
            reference_date: Some(today()),
            seed_demo: true,
            warn_unknown_roles: true,
        },
    );
    service
        .seed(CampaignBlueprint::demo(today()))
        .expect("demo seeds");
    (service, outbox)
}

fn demo_id() -> CampaignId {
    CampaignId(DEMO_CAMPAIGN_ID.to_string())
}

#[test]
fn approving_a_flagged_candidate_moves_it_into_the_main_pipeline() {
    let (service, outbox) = service();
    let sara = CandidateId("c10".to_string());
    let before = service.candidate(&sara).expect("seeded");

    let after = service
        .apply(&sara, &CandidateAction::Approve)
        .expect("approval allowed");

    assert_eq!(after.status, CandidateStatus::Verifying);
    assert_eq!(after.audit_log.len(), before.audit_log.len() + 1);
    assert_eq!(after.whatsapp_history.len(), before.whatsapp_history.len() + 1);
    assert_eq!(outbox.sent().len(), 1);

    let listing = service.pipeline(&demo_id()).expect("listing");
    assert!(listing.priority_review.is_empty());
    assert!(listing.pipeline.iter().any(|row| row.id == sara));
}

#[test]
fn pipeline_listing_is_ordered_by_priority() {
    let (service, _) = service();
    let listing = service.pipeline(&demo_id()).expect("listing");

    let order: Vec<_> = listing.pipeline.iter().map(|row| row.id.0.as_str()).collect();
    assert_eq!(
        order,
        vec!["c1", "c2", "c11", "c4", "c3", "c6", "c8", "c7", "c9", "c5"]
    );
    assert!(listing.pipeline[0].suspicious_document);
    assert_eq!(listing.pipeline[0].bucket, StatusBucket::Blocked);
}

#[test]
fn every_required_document_is_shown_exactly_once_for_every_seeded_candidate() {
    let blueprint = CampaignBlueprint::demo(today());
    let catalog = RoleDocumentCatalog::standard();

    for candidate in &blueprint.candidates {
        let resolution = resolve_display_documents(candidate, &blueprint.campaign, &catalog);
        assert_eq!(resolution.source, RequirementSource::CampaignRole);

        for doc_type in &resolution.required_types {
            let slots = resolution
                .documents
                .iter()
                .filter(|entry| entry.required && !entry.duplicate && &entry.document.doc_type == doc_type)
                .count();
            assert_eq!(slots, 1, "{} shows {doc_type} {slots} times", candidate.name);
        }

        let held: HashSet<_> = candidate.documents.iter().map(|doc| doc.id.as_str()).collect();
        let shown: HashSet<_> = resolution
            .documents
            .iter()
            .filter(|entry| !entry.placeholder)
            .map(|entry| entry.document.id.as_str())
            .collect();
        assert_eq!(held, shown, "{} lost an uploaded document", candidate.name);
    }
}

#[test]
fn roster_files_import_into_the_demo_campaign() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/workday_roster.csv");
    let entries = RosterImporter::from_path(path).expect("fixture parses");
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1].name, "Fatima Zahra");
    assert!(entries[2].needs_residence_permit);

    let (service, outbox) = service();
    let file = std::fs::File::open(path).expect("fixture opens");
    let summary = service
        .import_roster(&demo_id(), file, &RosterSource::parse("ats:Workday"))
        .expect("roster imports");
    assert_eq!(summary.imported.len(), 4);
    assert!(summary.unmatched_roles.is_empty());

    let before = service.overview(&demo_id(), None).expect("overview");
    assert_eq!(before.totals.candidates, 15);
    assert_eq!(before.totals.in_review, 6);

    let activation = service.activate_agent(&demo_id()).expect("agent activates");
    assert_eq!(activation.activated.len(), 4);
    assert!(activation.undelivered.is_empty());
    assert_eq!(outbox.sent().len(), 4);

    let fatima = service.candidate(&summary.imported[1]).expect("imported");
    assert_eq!(fatima.role, "Line worker");
    assert!(fatima.whatsapp_active);
    assert_eq!(fatima.audit_log.len(), 2);
    assert_eq!(fatima.audit_log[1].message, "Imported from ATS (Workday)");
}

#[test]
fn offers_and_medical_visits_set_their_milestones_by_action_only() {
    let (service, _) = service();
    let luca = CandidateId("c3".to_string());

    let offered = service
        .apply(&luca, &CandidateAction::SendOffer)
        .expect("offer allowed");
    assert_eq!(offered.status, CandidateStatus::OfferSent);
    assert!(offered.offer_sent);
    assert!(!offered.medical_visit_scheduled);

    let refused = service.apply(&luca, &CandidateAction::SendOffer);
    assert!(refused.is_err());
    assert_eq!(service.candidate(&luca).expect("stored"), offered);

    let too_early = service.apply(
        &luca,
        &CandidateAction::ScheduleMedicalVisit {
            date: NaiveDate::from_ymd_opt(2024, 9, 25).expect("valid date"),
            time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            location: "Bitonto site".to_string(),
        },
    );
    assert!(too_early.is_err());

    let yana = CandidateId("c7".to_string());
    let signed = service.candidate(&yana).expect("seeded");
    assert_eq!(signed.status, CandidateStatus::ContractSigned);
    assert!(!signed.medical_visit_scheduled);

    let visit = service
        .apply(
            &yana,
            &CandidateAction::ScheduleMedicalVisit {
                date: NaiveDate::from_ymd_opt(2024, 9, 25).expect("valid date"),
                time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
                location: "Bitonto site".to_string(),
            },
        )
        .expect("visit allowed after signature");
    assert_eq!(visit.status, CandidateStatus::MedicalScheduled);
    assert!(visit.medical_visit_scheduled);
    assert!(visit.contract_signed);
    assert_eq!(
        visit.audit_log[0].message,
        "Medical visit scheduled: 25/09/2024 at 09:00 at Bitonto site"
    );
    let last = visit.whatsapp_history.last().expect("message sent");
    assert_eq!(
        last.text,
        "Hi Yana Ivanova, your medical visit is scheduled for 25/09/2024 at 09:00 at Bitonto site."
    );
}
