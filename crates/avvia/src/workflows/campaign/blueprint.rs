use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::domain::{
    Campaign, CampaignId, CampaignPeriod, CampaignRole, Candidate, CandidateId, DocStatus,
    Document, Sender,
};
use super::requirements::{
    RoleDocumentCatalog, FORKLIFT_LICENCE, IDENTITY_DOCUMENT, MEDICAL_CERTIFICATE,
    RESIDENCE_PERMIT, TECHNICAL_DIPLOMA,
};
use super::status::CandidateStatus;

pub const DEMO_CAMPAIGN_ID: &str = "demo-1";

/// Days between the reference date and the demo campaign's first working day.
const DEMO_LEAD_DAYS: i64 = 15;
const DEMO_LENGTH_DAYS: i64 = 91;

/// Seed data for the olive-harvest demo: one campaign and its candidate pool.
#[derive(Debug, Clone)]
pub struct CampaignBlueprint {
    pub campaign: Campaign,
    pub candidates: Vec<Candidate>,
}

impl CampaignBlueprint {
    pub fn demo(today: NaiveDate) -> Self {
        let catalog = RoleDocumentCatalog::standard();
        let role = |title: &str, count: u32| CampaignRole {
            title: title.to_string(),
            count,
            required_docs: catalog
                .defaults_for(title)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            mandatory_docs: Vec::new(),
        };

        let start = today + Duration::days(DEMO_LEAD_DAYS);
        let campaign = Campaign {
            id: CampaignId(DEMO_CAMPAIGN_ID.to_string()),
            name: "Olive campaign".to_string(),
            product_type: "Olives (oil)".to_string(),
            location: "Bitonto (BA)".to_string(),
            period: CampaignPeriod {
                start,
                end: start + Duration::days(DEMO_LENGTH_DAYS),
            },
            created_at: at(today, 8, 0),
            agent_active: true,
            roles: vec![
                role("Field worker", 12),
                role("Line worker", 5),
                role("Forklift operator", 2),
                role("Lab technician", 1),
            ],
        };

        let candidates = seed_candidates(today);

        Self {
            campaign,
            candidates,
        }
    }
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
}

fn doc(id: &str, doc_type: &str, file_name: &str, status: DocStatus) -> Document {
    Document {
        id: id.to_string(),
        doc_type: doc_type.to_string(),
        file_name: file_name.to_string(),
        status,
        reason: None,
        suspicious: false,
    }
}

struct Seed<'a> {
    id: &'a str,
    name: &'a str,
    phone: &'a str,
    mother_tongue: &'a str,
    needs_residence_permit: bool,
    role: &'a str,
    status: CandidateStatus,
    cv: &'a str,
}

impl Seed<'_> {
    fn into_candidate(self, day: NaiveDate, audit: ((u32, u32), &str)) -> Candidate {
        let mut candidate = Candidate::new(
            CandidateId(self.id.to_string()),
            self.name,
            self.role,
            CampaignId(DEMO_CAMPAIGN_ID.to_string()),
            self.status,
        );
        candidate.phone = Some(self.phone.to_string());
        candidate.mother_tongue = self.mother_tongue.to_string();
        candidate.needs_residence_permit = self.needs_residence_permit;
        candidate.whatsapp_active = true;
        candidate.cv_url = Some(self.cv.to_string());
        let ((hour, minute), message) = audit;
        candidate.record_audit(at(day, hour, minute), message);
        candidate
    }
}

fn chat(candidate: &mut Candidate, day: NaiveDate, lines: &[(Sender, (u32, u32), &str)]) {
    for (sender, (hour, minute), text) in lines {
        candidate.push_message(*sender, *text, at(day, *hour, *minute));
    }
}

fn seed_candidates(day: NaiveDate) -> Vec<Candidate> {
    use CandidateStatus::*;
    use DocStatus::*;

    let mut ahmed = Seed {
        id: "c1",
        name: "Ahmed Hassan",
        phone: "+39 333 1234567",
        mother_tongue: "Arabic",
        needs_residence_permit: true,
        role: "Forklift operator",
        status: Blocked,
        cv: "hassan_cv.pdf",
    }
    .into_candidate(
        day,
        (
            (9, 12),
            "Residence permit check failed: OCR detected a font mismatch (suspected forgery)",
        ),
    );
    chat(
        &mut ahmed,
        day,
        &[
            (Sender::Agent, (14, 0), "Welcome Ahmed. Please upload your ID and residence permit here."),
            (Sender::Candidate, (14, 30), "Here they are, attached."),
            (
                Sender::Agent,
                (14, 45),
                "The document you sent (residence permit) shows structural anomalies. Verification in progress.",
            ),
        ],
    );
    let mut permit = doc("doc6", RESIDENCE_PERMIT, "suspicious_permit.jpg", Invalid);
    permit.reason = Some("OCR data does not match the ministerial format".to_string());
    permit.suspicious = true;
    ahmed.documents = vec![
        doc("doc5", IDENTITY_DOCUMENT, "passport_ahmed.pdf", Received),
        permit,
        doc("doc7", FORKLIFT_LICENCE, "forklift_licence.pdf", Received),
        doc("doc8", MEDICAL_CERTIFICATE, "", Missing),
    ];

    let mut marco = Seed {
        id: "c2",
        name: "Marco Rossi",
        phone: "+39 333 7654321",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Field worker",
        status: PendingDocs,
        cv: "cv_marco.pdf",
    }
    .into_candidate(day, ((10, 45), "New ID requested after the AI detected an expiry"));
    chat(
        &mut marco,
        day,
        &[(
            Sender::Agent,
            (13, 45),
            "Your identity card expired last month. Could you send an updated one?",
        )],
    );
    let mut expired_id = doc("doc2", IDENTITY_DOCUMENT, "old_id.jpg", Expired);
    expired_id.reason = Some("Expired on 15/02/2023".to_string());
    marco.documents = vec![expired_id, doc("doc3", MEDICAL_CERTIFICATE, "", Missing)];

    let mut luca = Seed {
        id: "c3",
        name: "Luca Ferrari",
        phone: "+39 338 1122334",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Field worker",
        status: ReadyForOffer,
        cv: "cv_luca.pdf",
    }
    .into_candidate(day, ((8, 0), "All essential documents validated automatically"));
    chat(
        &mut luca,
        day,
        &[(
            Sender::Agent,
            (11, 0),
            "Your paperwork is complete. You will receive the job offer shortly.",
        )],
    );
    luca.documents = vec![
        doc("doc8", IDENTITY_DOCUMENT, "id_ferrari.png", Received),
        doc("doc9", MEDICAL_CERTIFICATE, "medical_ok.pdf", Received),
    ];

    let mut elena = Seed {
        id: "c4",
        name: "Elena Popescu",
        phone: "+40 721 123456",
        mother_tongue: "Romanian",
        needs_residence_permit: true,
        role: "Line worker",
        status: Verifying,
        cv: "cv_elena.pdf",
    }
    .into_candidate(day, ((11, 20), "Documents received, AI analysis in progress (personal data extraction)"));
    chat(
        &mut elena,
        day,
        &[
            (Sender::Candidate, (11, 15), "I sent everything, is that okay?"),
            (Sender::Agent, (11, 16), "Received! I'm analysing the files, I'll update you in a moment."),
        ],
    );
    elena.documents = vec![
        doc("doc11", IDENTITY_DOCUMENT, "passport_ro.jpg", Received),
        doc("doc12", MEDICAL_CERTIFICATE, "certificate.pdf", Received),
        doc("doc12b", RESIDENCE_PERMIT, "permit_elena.jpg", Received),
    ];

    let mut amir = Seed {
        id: "c5",
        name: "Amir Ibrahim",
        phone: "+39 345 9988776",
        mother_tongue: "Arabic",
        needs_residence_permit: true,
        role: "Field worker",
        status: AwaitingResponse,
        cv: "amir_cv.pdf",
    }
    .into_candidate(day, ((9, 0), "Welcome message and document request sent"));
    chat(
        &mut amir,
        day,
        &[(
            Sender::Agent,
            (9, 0),
            "Hi Amir, I'm the AvvIA assistant. Please upload your ID and medical certificate.",
        )],
    );
    amir.documents = vec![
        doc("doc13", IDENTITY_DOCUMENT, "", Missing),
        doc("doc14", MEDICAL_CERTIFICATE, "", Missing),
        doc("doc14b", RESIDENCE_PERMIT, "", Missing),
    ];

    let mut giovanni = Seed {
        id: "c6",
        name: "Giovanni Neri",
        phone: "+39 320 1122334",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Forklift operator",
        status: OfferSent,
        cv: "neri_cv.pdf",
    }
    .into_candidate(day, ((15, 30), "Job offer sent successfully"));
    giovanni.offer_sent = true;
    chat(
        &mut giovanni,
        day,
        &[(
            Sender::Agent,
            (15, 30),
            "Great news! Your paperwork is perfect. Here is your contract proposal. Tap to sign.",
        )],
    );
    giovanni.documents = vec![
        doc("doc15", IDENTITY_DOCUMENT, "id_neri.pdf", Received),
        doc("doc16", MEDICAL_CERTIFICATE, "medical.pdf", Received),
        doc("doc17", FORKLIFT_LICENCE, "forklift_licence.pdf", Received),
    ];

    let mut yana = Seed {
        id: "c7",
        name: "Yana Ivanova",
        phone: "+39 351 4455667",
        mother_tongue: "Russian",
        needs_residence_permit: true,
        role: "Line worker",
        status: ContractSigned,
        cv: "yana_cv.pdf",
    }
    .into_candidate(day, ((10, 0), "Digital signature captured (DocuSign integration)"));
    yana.offer_sent = true;
    yana.contract_signed = true;
    chat(
        &mut yana,
        day,
        &[
            (Sender::Candidate, (9, 55), "I signed everything from the link."),
            (Sender::Agent, (10, 0), "Perfect Yana! Contract received. Now we need to book the medical visit."),
        ],
    );
    yana.documents = vec![
        doc("doc18", IDENTITY_DOCUMENT, "yana_id.jpg", Received),
        doc("doc19", MEDICAL_CERTIFICATE, "previous_visit.pdf", Received),
        doc("doc19b", RESIDENCE_PERMIT, "permit_yana.pdf", Received),
    ];

    let mut pietro = Seed {
        id: "c8",
        name: "Pietro Esposito",
        phone: "+39 339 5556677",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Field worker",
        status: MedicalScheduled,
        cv: "esposito_cv.pdf",
    }
    .into_candidate(day, ((12, 0), "Medical visit booked for 25/10 at the Bitonto site"));
    pietro.offer_sent = true;
    pietro.medical_visit_scheduled = true;
    pietro.contract_signed = true;
    chat(
        &mut pietro,
        day,
        &[(Sender::Agent, (12, 0), "Your medical visit is confirmed for tomorrow at 09:00.")],
    );
    pietro.documents = vec![
        doc("doc20", IDENTITY_DOCUMENT, "id_pietro.pdf", Received),
        doc("doc21", MEDICAL_CERTIFICATE, "medical_history.pdf", Received),
    ];

    let mut maria = Seed {
        id: "c9",
        name: "Maria Conti",
        phone: "+39 340 7778899",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Lab technician",
        status: ReadyToStart,
        cv: "maria_cv.pdf",
    }
    .into_candidate(day, ((17, 0), "Pre-start checklist completed: PPE delivered and safety course passed"));
    maria.offer_sent = true;
    maria.medical_visit_scheduled = true;
    maria.contract_signed = true;
    maria.ppe_delivered = true;
    maria.safety_courses_completed = true;
    chat(
        &mut maria,
        day,
        &[(
            Sender::Agent,
            (17, 5),
            "All set Maria! We'll see you on Monday at 08:30 in the lab.",
        )],
    );
    maria.documents = vec![
        doc("doc22", IDENTITY_DOCUMENT, "id_maria.png", Received),
        doc("doc23", MEDICAL_CERTIFICATE, "fitness.pdf", Received),
        doc("doc24", TECHNICAL_DIPLOMA, "agriculture_degree.pdf", Received),
    ];

    let mut sara = Seed {
        id: "c10",
        name: "Sara Melis",
        phone: "+39 347 0001112",
        mother_tongue: "Italian",
        needs_residence_permit: false,
        role: "Lab technician",
        status: ToReview,
        cv: "cv_sara.pdf",
    }
    .into_candidate(
        day,
        (
            (10, 0),
            "Imported from ATS (Workday). Needs manual approval before WhatsApp outreach.",
        ),
    );
    sara.whatsapp_active = false;
    sara.needs_priority_review = true;

    let mut olek = Seed {
        id: "c11",
        name: "Olek Kuznetsov",
        phone: "+39 328 1112223",
        mother_tongue: "Russian",
        needs_residence_permit: true,
        role: "Field worker",
        status: PendingDocs,
        cv: "olek_cv.pdf",
    }
    .into_candidate(day, ((14, 20), "Medical certificate missing from the uploaded set"));
    chat(
        &mut olek,
        day,
        &[
            (Sender::Candidate, (14, 15), "I uploaded the permit, is anything else missing?"),
            (Sender::Agent, (14, 20), "Yes, Olek. The medical certificate is still missing."),
        ],
    );
    olek.documents = vec![
        doc("doc25", IDENTITY_DOCUMENT, "olek_id.jpg", Received),
        doc("doc26", MEDICAL_CERTIFICATE, "", Missing),
        doc("doc27", RESIDENCE_PERMIT, "valid_permit.pdf", Received),
    ];

    vec![
        ahmed, marco, luca, elena, amir, giovanni, yana, pietro, maria, sara, olek,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 16).expect("valid date")
    }

    #[test]
    fn demo_campaign_starts_fifteen_days_out() {
        let blueprint = CampaignBlueprint::demo(today());
        assert_eq!(blueprint.campaign.total_required(), 20);
        assert_eq!(blueprint.campaign.period.days_to_start(today()), 15);
        assert_eq!(blueprint.candidates.len(), 11);
    }

    #[test]
    fn every_seeded_candidate_belongs_to_a_campaign_role() {
        let blueprint = CampaignBlueprint::demo(today());
        let ids: HashSet<_> = blueprint.candidates.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), blueprint.candidates.len());
        for candidate in &blueprint.candidates {
            assert_eq!(candidate.campaign_id, blueprint.campaign.id);
            assert!(
                blueprint.campaign.role(&candidate.role).is_some(),
                "{} has unknown role {}",
                candidate.name,
                candidate.role
            );
        }
    }

    #[test]
    fn exactly_one_candidate_waits_for_priority_review() {
        let blueprint = CampaignBlueprint::demo(today());
        let flagged: Vec<_> = blueprint
            .candidates
            .iter()
            .filter(|c| c.needs_priority_review)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(flagged, vec!["Sara Melis"]);
        assert!(blueprint.candidates[0].suspicious_document().is_some());
    }
}
