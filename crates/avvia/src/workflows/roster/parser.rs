use super::normalizer::{clean_text, parse_flag};
use super::{RosterEntry, RosterImportError};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = index + 2;
        entries.push(row.into_entry(line)?);
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(
        rename = "Mother Tongue",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    mother_tongue: Option<String>,
    #[serde(rename = "Role")]
    role: String,
    #[serde(
        rename = "Needs Residence Permit",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    needs_residence_permit: Option<String>,
}

impl RosterRow {
    fn into_entry(self, line: usize) -> Result<RosterEntry, RosterImportError> {
        let name = clean_text(&self.name);
        if name.is_empty() {
            return Err(RosterImportError::InvalidRow {
                line,
                reason: "name is empty".to_string(),
            });
        }

        let role = clean_text(&self.role);
        if role.is_empty() {
            return Err(RosterImportError::InvalidRow {
                line,
                reason: format!("role is empty for {name}"),
            });
        }

        let needs_residence_permit = match self.needs_residence_permit.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| RosterImportError::InvalidRow {
                line,
                reason: format!("'{raw}' is not a yes/no value"),
            })?,
        };

        Ok(RosterEntry {
            line,
            name,
            phone: self.phone.map(|phone| clean_text(&phone)),
            mother_tongue: self.mother_tongue.map(|value| clean_text(&value)).unwrap_or_default(),
            role,
            needs_residence_permit,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
