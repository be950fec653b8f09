use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::{Campaign, CampaignId, CampaignPeriod, CampaignRole};
use super::requirements::{RoleDocumentCatalog, ALWAYS_REQUIRED_DOCS, EXTRA_DOCUMENTS, STANDARD_ROLES};

/// Editable role row of a campaign draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRole {
    pub title: String,
    pub count: u32,
    pub required_docs: Vec<String>,
    /// Documents offered for this role: its defaults plus any extras added.
    #[serde(default)]
    pub available_docs: Vec<String>,
    #[serde(default)]
    pub mandatory_docs: Vec<String>,
}

impl DraftRole {
    fn from_catalog(title: &str, count: u32, catalog: &RoleDocumentCatalog) -> Self {
        let defaults = catalog.defaults_for(title).map(<[String]>::to_vec).unwrap_or_default();
        Self {
            title: title.to_string(),
            count,
            required_docs: defaults.clone(),
            available_docs: defaults,
            mandatory_docs: ALWAYS_REQUIRED_DOCS.iter().map(|doc| doc.to_string()).collect(),
        }
    }
}

/// Campaign being configured before it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub product_type: String,
    pub location: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub roles: Vec<DraftRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("'{0}' is always required and cannot be changed")]
    LockedDocument(String),
    #[error("role index {0} is out of range")]
    RoleOutOfRange(usize),
    #[error("a campaign needs at least one role")]
    LastRole,
    #[error("'{0}' is not a known role")]
    UnknownRoleTitle(String),
    #[error("'{0}' is not an available extra document")]
    UnknownExtraDocument(String),
    #[error("invalid campaign: {0}")]
    Invalid(String),
}

fn is_locked(doc: &str) -> bool {
    ALWAYS_REQUIRED_DOCS.contains(&doc)
}

impl CampaignDraft {
    /// Empty draft with a single field-worker row of ten.
    pub fn new(catalog: &RoleDocumentCatalog) -> Self {
        Self {
            name: String::new(),
            product_type: String::new(),
            location: String::new(),
            start: None,
            end: None,
            roles: vec![DraftRole::from_catalog(STANDARD_ROLES[0], 10, catalog)],
        }
    }

    fn role_mut(&mut self, index: usize) -> Result<&mut DraftRole, SetupError> {
        self.roles
            .get_mut(index)
            .ok_or(SetupError::RoleOutOfRange(index))
    }

    pub fn add_role(&mut self, catalog: &RoleDocumentCatalog) -> usize {
        self.roles
            .push(DraftRole::from_catalog(STANDARD_ROLES[0], 1, catalog));
        self.roles.len() - 1
    }

    pub fn remove_role(&mut self, index: usize) -> Result<DraftRole, SetupError> {
        if index >= self.roles.len() {
            return Err(SetupError::RoleOutOfRange(index));
        }
        if self.roles.len() == 1 {
            return Err(SetupError::LastRole);
        }
        Ok(self.roles.remove(index))
    }

    /// Changing the title resets the row's documents to that role's defaults.
    pub fn set_role_title(
        &mut self,
        index: usize,
        title: &str,
        catalog: &RoleDocumentCatalog,
    ) -> Result<(), SetupError> {
        if catalog.defaults_for(title).is_none() {
            return Err(SetupError::UnknownRoleTitle(title.to_string()));
        }
        let role = self.role_mut(index)?;
        let count = role.count;
        *role = DraftRole::from_catalog(title, count, catalog);
        Ok(())
    }

    pub fn set_role_count(&mut self, index: usize, count: u32) -> Result<(), SetupError> {
        self.role_mut(index)?.count = count;
        Ok(())
    }

    /// Returns whether the document is required after the toggle.
    pub fn toggle_document(&mut self, index: usize, doc: &str) -> Result<bool, SetupError> {
        if is_locked(doc) {
            return Err(SetupError::LockedDocument(doc.to_string()));
        }
        let role = self.role_mut(index)?;
        if let Some(position) = role.required_docs.iter().position(|d| d == doc) {
            role.required_docs.remove(position);
            Ok(false)
        } else {
            role.required_docs.push(doc.to_string());
            Ok(true)
        }
    }

    /// Marking a document mandatory also makes it required.
    pub fn toggle_mandatory(&mut self, index: usize, doc: &str) -> Result<bool, SetupError> {
        if is_locked(doc) {
            return Err(SetupError::LockedDocument(doc.to_string()));
        }
        let role = self.role_mut(index)?;
        if let Some(position) = role.mandatory_docs.iter().position(|d| d == doc) {
            role.mandatory_docs.remove(position);
            return Ok(false);
        }
        role.mandatory_docs.push(doc.to_string());
        if !role.required_docs.iter().any(|d| d == doc) {
            role.required_docs.push(doc.to_string());
        }
        Ok(true)
    }

    pub fn add_extra_document(&mut self, index: usize, doc: &str) -> Result<(), SetupError> {
        if !EXTRA_DOCUMENTS.contains(&doc) {
            return Err(SetupError::UnknownExtraDocument(doc.to_string()));
        }
        let role = self.role_mut(index)?;
        if !role.available_docs.iter().any(|d| d == doc) {
            role.available_docs.push(doc.to_string());
            role.required_docs.push(doc.to_string());
        }
        Ok(())
    }

    fn validate(&self) -> Result<CampaignPeriod, SetupError> {
        if self.name.trim().is_empty() {
            return Err(SetupError::Invalid("name must not be empty".to_string()));
        }
        if self.roles.is_empty() {
            return Err(SetupError::LastRole);
        }

        let mut titles = HashSet::new();
        for role in &self.roles {
            if role.count == 0 {
                return Err(SetupError::Invalid(format!(
                    "role '{}' needs a positive headcount",
                    role.title
                )));
            }
            if !titles.insert(role.title.as_str()) {
                return Err(SetupError::Invalid(format!(
                    "role '{}' is listed twice",
                    role.title
                )));
            }
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Ok(CampaignPeriod { start, end }),
            (Some(_), Some(_)) => Err(SetupError::Invalid(
                "period must start before it ends".to_string(),
            )),
            _ => Err(SetupError::Invalid("period start and end are required".to_string())),
        }
    }

    /// Validates the draft and produces a campaign with the agent switched off.
    pub fn build(&self, id: CampaignId, created_at: NaiveDateTime) -> Result<Campaign, SetupError> {
        let period = self.validate()?;

        let roles = self
            .roles
            .iter()
            .map(|role| CampaignRole {
                title: role.title.trim().to_string(),
                count: role.count,
                required_docs: role.required_docs.clone(),
                mandatory_docs: role
                    .mandatory_docs
                    .iter()
                    .filter(|doc| !is_locked(doc))
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(Campaign {
            id,
            name: self.name.trim().to_string(),
            product_type: self.product_type.trim().to_string(),
            location: self.location.trim().to_string(),
            period,
            created_at,
            agent_active: false,
            roles,
        })
    }
}
