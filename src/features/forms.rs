//! Forms - New Entity Drafts
//!
//! Each draft validates its fields, then derives a readable id from the parent
//! and entity names. Ids that would collide get a millisecond timestamp appended.

use crate::domain::{
    Company, CompanyId, Device, Location, LocationId, Report, ReportKind, Staff, StaffRole,
};
use crate::error::{Error, Result};
use crate::helpers::{slugify, unique_id};
use crate::states::ReferenceStore;
use chrono::{DateTime, Utc};

fn required_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "Name is required".to_string(),
        });
    }
    Ok(name.to_string())
}

/// `something@host.tld` with no whitespace anywhere
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn stamp(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Name slug, or the timestamp when the name has nothing sluggable in it
fn name_slug(name: &str, now: DateTime<Utc>) -> String {
    let slug = slugify(name);
    if slug.is_empty() { stamp(now) } else { slug }
}

/// Slug used for a parent segment: its name, else its id minus the type prefix
fn parent_slug(name: &str, id: &str, prefix: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        id.strip_prefix(prefix).unwrap_or(id).to_string()
    } else {
        slug
    }
}

fn location_parent<'a>(refs: &'a ReferenceStore, id: &LocationId) -> Result<&'a Location> {
    refs.location(id).ok_or_else(|| Error::Validation {
        field: "location",
        message: format!("Unknown location {id}"),
    })
}

fn location_slug(location: &Location) -> String {
    parent_slug(&location.name, location.id.as_str(), "loc-")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
}

impl CompanyDraft {
    pub fn build(&self, refs: &ReferenceStore, now: DateTime<Utc>) -> Result<Company> {
        let name = required_name(&self.name)?;
        let slug = name_slug(&name, now);
        let id = unique_id("comp", &[slug.as_str()], || stamp(now), |candidate| {
            refs.company(&CompanyId::from(candidate)).is_some()
        });
        Ok(Company { id: id.into(), name })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDraft {
    pub name: String,
    pub company_id: Option<CompanyId>,
}

impl LocationDraft {
    pub fn build(&self, refs: &ReferenceStore, now: DateTime<Utc>) -> Result<Location> {
        let name = required_name(&self.name)?;
        let company = self
            .company_id
            .as_ref()
            .and_then(|id| refs.company(id))
            .ok_or_else(|| Error::Validation {
                field: "company",
                message: "Select a company".to_string(),
            })?;
        let parent = parent_slug(&company.name, company.id.as_str(), "comp-");
        let slug = name_slug(&name, now);
        let id = unique_id("loc", &[parent.as_str(), slug.as_str()], || stamp(now), |candidate| {
            refs.location(&LocationId::from(candidate)).is_some()
        });
        Ok(Location {
            id: id.into(),
            name,
            company_id: company.id.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDraft {
    pub name: String,
    pub location_id: Option<LocationId>,
}

impl DeviceDraft {
    pub fn build(&self, refs: &ReferenceStore, now: DateTime<Utc>) -> Result<Device> {
        let name = required_name(&self.name)?;
        let location = self
            .location_id
            .as_ref()
            .ok_or_else(|| Error::Validation {
                field: "location",
                message: "Select a location".to_string(),
            })
            .and_then(|id| location_parent(refs, id))?;
        let slug = name_slug(&name, now);
        let parent = location_slug(location);
        let id = unique_id(
            "dev",
            &[parent.as_str(), slug.as_str()],
            || stamp(now),
            |candidate| refs.device(&candidate.into()).is_some(),
        );
        Ok(Device {
            id: id.into(),
            name,
            location_id: location.id.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffDraft {
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub location_id: Option<LocationId>,
}

impl Default for StaffDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: StaffRole::Staff,
            location_id: None,
        }
    }
}

impl StaffDraft {
    /// Staff inherit the company of their location
    pub fn build(&self, refs: &ReferenceStore, now: DateTime<Utc>) -> Result<Staff> {
        let name = required_name(&self.name)?;
        let email = self.email.trim();
        if !is_email(email) {
            return Err(Error::Validation {
                field: "email",
                message: "Enter a valid email address".to_string(),
            });
        }
        let location = self
            .location_id
            .as_ref()
            .ok_or_else(|| Error::Validation {
                field: "location",
                message: "Select a location".to_string(),
            })
            .and_then(|id| location_parent(refs, id))?;
        let slug = name_slug(&name, now);
        let parent = location_slug(location);
        let id = unique_id(
            "staff",
            &[parent.as_str(), slug.as_str()],
            || stamp(now),
            |candidate| refs.staff().iter().any(|s| s.id.as_str() == candidate),
        );
        Ok(Staff {
            id: id.into(),
            name,
            email: email.to_string(),
            role: self.role,
            company_id: location.company_id.clone(),
            location_id: location.id.clone(),
            created_at: Some(now),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub name: String,
    pub kind: ReportKind,
    pub location_id: Option<LocationId>,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ReportKind::Usage,
            location_id: None,
        }
    }
}

impl ReportDraft {
    pub fn build(&self, refs: &ReferenceStore, now: DateTime<Utc>) -> Result<Report> {
        let name = required_name(&self.name)?;
        let location = self
            .location_id
            .as_ref()
            .ok_or_else(|| Error::Validation {
                field: "location",
                message: "Select a location".to_string(),
            })
            .and_then(|id| location_parent(refs, id))?;
        let slug = name_slug(&name, now);
        let parent = location_slug(location);
        let id = unique_id(
            "rep",
            &[parent.as_str(), slug.as_str()],
            || stamp(now),
            |candidate| refs.reports().iter().any(|r| r.id.as_str() == candidate),
        );
        Ok(Report {
            id: id.into(),
            name,
            kind: self.kind,
            company_id: location.company_id.clone(),
            location_id: location.id.clone(),
            created_at: Some(now),
        })
    }
}
