use serde::{Deserialize, Serialize};
use crate::resource::{
    Approval,
    ResourceDetails,
};

/// The dimensions documents may be filtered and faceted on, in the order
/// facets are reported.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum FacetField {
    Type,
    Institution,
    Segment,
    Approved,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Filter {
    pub field: FacetField,
    pub value: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Offset into the visible hits.
    #[serde(default)]
    pub start: Option<usize>,
    /// Maximum number of visible hits returned; unbounded when unset.
    #[serde(default)]
    pub size: Option<usize>,
}

/// The denormalized projection of a resource held by the search index.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchDocument {
    pub resource_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub owner: Option<String>,
    pub type_name: Option<String>,
    pub approved: Approval,
    pub institution_name: Option<String>,
    pub segment_name: Option<String>,
    pub last_updated: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchHit {
    pub score: u32,
    pub document: SearchDocument,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawFacetCount {
    pub value: String,
    pub count: usize,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawFacet {
    pub field: FacetField,
    pub counts: Vec<RawFacetCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RawFacets(Vec<RawFacet>);

/// Everything the index reports for a query, prior to any visibility
/// filtering.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchHits {
    pub hits: Vec<SearchHit>,
    pub total: usize,
    pub facets: RawFacets,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FacetCount {
    pub category: String,
    pub hit_count: usize,
    pub is_selected: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Facet {
    pub name: String,
    pub facet_counts: Vec<FacetCount>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResultSet {
    pub query: String,
    pub filters: Vec<Filter>,
    pub total: usize,
    pub start: usize,
    pub resources: ResourceDetails,
    pub facets: Vec<Facet>,
}

mod impls;
pub mod traits;
