use serde::{Deserialize, Serialize};
use crate::{
    availability::Availabilities,
    category::Categories,
    institution::Institution,
    macros::collection,
    resource_type::ResourceType,
    segment::Segment,
};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Approval {
    #[default]
    Unapproved,
    Approved,
}

/// A resource as stored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub cost: Option<String>,
    pub owner: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_notes: Option<String>,
    pub approved: Approval,
    pub private: bool,
    pub institution_id: Option<i64>,
    pub type_id: Option<i64>,
    pub segment_id: i64,
    pub last_updated: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Resources(Vec<Resource>);

collection!(Resources, Resource);

/// Caller supplied fields for creating or updating a resource.
///
/// Every field is optional; on update an absent field retains the stored
/// value.  Nullable fields are doubly wrapped so that `Some(None)` (an
/// explicit `null` in JSON) clears the stored value.  The approval state
/// is kept as the raw string until validated.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub cost: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub owner: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub contact_notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "impls::nullable", skip_serializing_if = "Option::is_none")]
    pub type_id: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<i64>,
}

/// The validated set of fields written to the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub cost: Option<String>,
    pub owner: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_notes: Option<String>,
    pub approved: Approval,
    pub private: bool,
    pub institution_id: Option<i64>,
    pub type_id: Option<i64>,
    pub segment_id: i64,
}

/// A resource with its relationships expanded.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub resource: Resource,
    pub institution: Option<Institution>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub segment: Option<Segment>,
    pub availabilities: Availabilities,
    pub categories: Categories,
    pub favorite_count: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceDetails(Vec<ResourceDetail>);

collection!(ResourceDetails, ResourceDetail);

mod impls;
pub mod traits;
