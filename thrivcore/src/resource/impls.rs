use serde::{
    Deserialize,
    Deserializer,
};
use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::{
    Approval,
    Resource,
    ResourceDetail,
    ResourceRecord,
};

impl fmt::Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Approval {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unapproved" => Ok(Approval::Unapproved),
            "Approved" => Ok(Approval::Approved),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field,
/// which `#[serde(default)]` leaves as `None`.
pub(super) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Approval {
    pub fn is_approved(&self) -> bool {
        matches!(self, Approval::Approved)
    }
}

impl From<&Resource> for ResourceRecord {
    fn from(resource: &Resource) -> Self {
        Self {
            name: resource.name.clone(),
            description: resource.description.clone(),
            website: resource.website.clone(),
            cost: resource.cost.clone(),
            owner: resource.owner.clone(),
            contact_email: resource.contact_email.clone(),
            contact_phone: resource.contact_phone.clone(),
            contact_notes: resource.contact_notes.clone(),
            approved: resource.approved,
            private: resource.private,
            institution_id: resource.institution_id,
            type_id: resource.type_id,
            segment_id: resource.segment_id,
        }
    }
}

impl Deref for ResourceDetail {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl From<ResourceDetail> for Resource {
    fn from(detail: ResourceDetail) -> Self {
        detail.resource
    }
}
