use itertools::Itertools;
use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::{
    error::ValueError,
    resource::ResourceDetail,
};
use super::*;

const NAME_WEIGHT: u32 = 3;
const WEBSITE_WEIGHT: u32 = 2;
const OWNER_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

impl FacetField {
    pub const ALL: [FacetField; 4] = [
        FacetField::Type,
        FacetField::Institution,
        FacetField::Segment,
        FacetField::Approved,
    ];
}

impl fmt::Display for FacetField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for FacetField {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Type" => Ok(FacetField::Type),
            "Institution" => Ok(FacetField::Institution),
            "Segment" => Ok(FacetField::Segment),
            "Approved" => Ok(FacetField::Approved),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl Filter {
    pub fn new(field: FacetField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

/// Parses the `Field=Value` form.
impl FromStr for Filter {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s.split_once('=')
            .ok_or_else(|| ValueError::Unsupported(s.to_string()))?;
        Ok(Filter::new(field.trim().parse()?, value.trim()))
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, field: FacetField, value: impl Into<String>) -> Self {
        self.filters.push(Filter::new(field, value));
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// The lowercased free text tokens of the query.
    pub fn tokens(&self) -> Vec<String> {
        self.query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    pub fn is_selected(&self, field: FacetField, value: &str) -> bool {
        is_selected(&self.filters, field, value)
    }
}

fn is_selected(filters: &[Filter], field: FacetField, value: &str) -> bool {
    filters.iter()
        .any(|filter| filter.field == field && filter.value == value)
}

impl From<&ResourceDetail> for SearchDocument {
    fn from(detail: &ResourceDetail) -> Self {
        Self {
            resource_id: detail.id,
            name: detail.name.clone(),
            description: detail.description.clone(),
            website: detail.website.clone(),
            owner: detail.owner.clone(),
            type_name: detail.resource_type.as_ref().map(|v| v.name.clone()),
            approved: detail.approved,
            institution_name: detail.institution.as_ref().map(|v| v.name.clone()),
            segment_name: detail.segment.as_ref().map(|v| v.name.clone()),
            last_updated: detail.last_updated,
        }
    }
}

impl SearchDocument {
    pub fn facet_value(&self, field: FacetField) -> Option<String> {
        match field {
            FacetField::Type => self.type_name.clone(),
            FacetField::Institution => self.institution_name.clone(),
            FacetField::Segment => self.segment_name.clone(),
            FacetField::Approved => Some(self.approved.to_string()),
        }
    }

    fn weighted_fields(&self) -> [(Option<&str>, u32); 4] {
        [
            (Some(self.name.as_str()), NAME_WEIGHT),
            (self.website.as_deref(), WEBSITE_WEIGHT),
            (self.owner.as_deref(), OWNER_WEIGHT),
            (self.description.as_deref(), DESCRIPTION_WEIGHT),
        ]
    }

    /// The lowercased text every free text token is matched against.
    pub fn content(&self) -> String {
        self.weighted_fields()
            .iter()
            .filter_map(|(field, _)| *field)
            .map(str::to_lowercase)
            .join("\n")
    }

    /// Filters on the same field are alternatives; filters on distinct
    /// fields must all be satisfied.
    pub fn matches_filters(&self, filters: &[Filter]) -> bool {
        filters.iter()
            .into_group_map_by(|filter| filter.field)
            .into_iter()
            .all(|(field, alternatives)| {
                let value = self.facet_value(field);
                alternatives.iter()
                    .any(|filter| value.as_deref() == Some(filter.value.as_str()))
            })
    }

    /// Relevance of the document for the lowercased tokens, or `None` if
    /// any token is absent from every searched field.
    pub fn score(&self, tokens: &[String]) -> Option<u32> {
        let fields = self.weighted_fields()
            .map(|(field, weight)| (field.map(str::to_lowercase), weight));
        tokens.iter()
            .map(|token| {
                let score = fields.iter()
                    .filter(|(field, _)| field.as_deref()
                        .is_some_and(|field| field.contains(token.as_str())))
                    .map(|(_, weight)| weight)
                    .sum::<u32>();
                (score > 0).then_some(score)
            })
            .sum()
    }
}

impl SearchHit {
    pub fn resource_id(&self) -> i64 {
        self.document.resource_id
    }

    /// Ranking order: higher score first, then by name, then by id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.score.cmp(&self.score)
            .then_with(|| self.document.name.to_lowercase()
                .cmp(&other.document.name.to_lowercase()))
            .then_with(|| self.document.resource_id.cmp(&other.document.resource_id))
    }
}

impl From<Vec<RawFacet>> for RawFacets {
    fn from(args: Vec<RawFacet>) -> Self {
        Self(args)
    }
}

impl Deref for RawFacets {
    type Target = Vec<RawFacet>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for RawFacets {
    type Item = RawFacet;
    type IntoIter = std::vec::IntoIter<RawFacet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl RawFacets {
    /// Counts the documents per value for every facet dimension.
    ///
    /// Dimensions follow `FacetField::ALL`; values within a dimension are
    /// ordered by descending count then by value.  Documents without a
    /// value for a dimension are not counted in it.
    pub fn tally<'a>(
        documents: impl IntoIterator<Item = &'a SearchDocument>,
        filters: &[Filter],
    ) -> Self {
        let documents = documents.into_iter().collect::<Vec<_>>();
        FacetField::ALL.iter()
            .map(|field| {
                let mut counts: HashMap<String, usize> = HashMap::new();
                documents.iter()
                    .filter_map(|document| document.facet_value(*field))
                    .for_each(|value| *counts.entry(value).or_default() += 1);
                let counts = counts.into_iter()
                    .sorted_by(|(a_value, a_count), (b_value, b_count)| {
                        b_count.cmp(a_count).then_with(|| a_value.cmp(b_value))
                    })
                    .map(|(value, count)| RawFacetCount {
                        selected: is_selected(filters, *field, &value),
                        value,
                        count,
                    })
                    .collect();
                RawFacet { field: *field, counts }
            })
            .collect::<Vec<_>>()
            .into()
    }

    pub fn get(&self, field: FacetField) -> Option<&RawFacet> {
        self.0.iter().find(|facet| facet.field == field)
    }
}

impl Facet {
    pub fn count(&self, category: &str) -> Option<&FacetCount> {
        self.facet_counts.iter().find(|count| count.category == category)
    }
}

impl SearchResultSet {
    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.name == name)
    }

    pub fn resource_ids(&self) -> Vec<i64> {
        self.resources.iter().map(|resource| resource.id).collect()
    }
}

#[cfg(test)]
mod test {
    use crate::{
        resource::Approval,
        search::*,
    };

    fn document(id: i64, name: &str, type_name: &str, approved: Approval) -> SearchDocument {
        SearchDocument {
            resource_id: id,
            name: name.to_string(),
            type_name: Some(type_name.to_string()),
            approved,
            ..Default::default()
        }
    }

    #[test]
    fn filter_parse() -> anyhow::Result<()> {
        assert_eq!(
            "Type=Software".parse::<Filter>()?,
            Filter::new(FacetField::Type, "Software"),
        );
        assert_eq!(
            "Approved = Unapproved".parse::<Filter>()?,
            Filter::new(FacetField::Approved, "Unapproved"),
        );
        assert!("Type".parse::<Filter>().is_err());
        assert!("Colour=Red".parse::<Filter>().is_err());
        Ok(())
    }

    #[test]
    fn score() {
        let document = SearchDocument {
            resource_id: 1,
            name: "Hairy Spiders".to_string(),
            description: Some("A very hairy spider with lots of fur puff".to_string()),
            website: Some("www.stuff.edu".to_string()),
            owner: Some("Oscar@sesamestreet.com; McDoodle@x.com".to_string()),
            ..Default::default()
        };
        let tokens = SearchRequest::new("HAIRY").tokens();
        assert_eq!(document.score(&tokens), Some(4));
        assert_eq!(document.score(&SearchRequest::new("fur puff").tokens()), Some(2));
        assert_eq!(document.score(&SearchRequest::new("stuff.edu").tokens()), Some(2));
        assert_eq!(document.score(&SearchRequest::new("mcdoodle").tokens()), Some(2));
        // every token must match
        assert_eq!(document.score(&SearchRequest::new("hairy zebra").tokens()), None);
        // no tokens matches everything
        assert_eq!(document.score(&SearchRequest::new("  ").tokens()), Some(0));
    }

    #[test]
    fn matches_filters() {
        let d = document(1, "a", "Software", Approval::Approved);
        assert!(d.matches_filters(&[]));
        assert!(d.matches_filters(&[Filter::new(FacetField::Type, "Software")]));
        assert!(!d.matches_filters(&[Filter::new(FacetField::Type, "software")]));
        assert!(d.matches_filters(&[
            Filter::new(FacetField::Type, "Facility"),
            Filter::new(FacetField::Type, "Software"),
        ]));
        assert!(!d.matches_filters(&[
            Filter::new(FacetField::Type, "Software"),
            Filter::new(FacetField::Approved, "Unapproved"),
        ]));
        // no institution
        assert!(!d.matches_filters(&[Filter::new(FacetField::Institution, "UVA")]));
    }

    #[test]
    fn tally() {
        let documents = [
            document(1, "a", "Software", Approval::Approved),
            document(2, "b", "Facility", Approval::Unapproved),
            document(3, "c", "Software", Approval::Unapproved),
            document(4, "d", "Animal", Approval::Unapproved),
        ];
        let filters = [Filter::new(FacetField::Type, "Facility")];
        let facets = RawFacets::tally(&documents, &filters);
        assert_eq!(
            facets.iter().map(|f| f.field).collect::<Vec<_>>(),
            FacetField::ALL,
        );
        let types = facets.get(FacetField::Type).expect("type facet");
        assert_eq!(types.counts, [
            RawFacetCount { value: "Software".into(), count: 2, selected: false },
            RawFacetCount { value: "Animal".into(), count: 1, selected: false },
            RawFacetCount { value: "Facility".into(), count: 1, selected: true },
        ]);
        let approved = facets.get(FacetField::Approved).expect("approved facet");
        assert_eq!(approved.counts[0].value, "Unapproved");
        assert_eq!(approved.counts[0].count, 3);
        assert!(facets.get(FacetField::Institution)
            .expect("institution facet")
            .counts
            .is_empty());
    }

    #[test]
    fn rank() {
        let mut hits = vec![
            SearchHit { score: 1, document: document(3, "beta", "x", Approval::Approved) },
            SearchHit { score: 3, document: document(2, "Zeta", "x", Approval::Approved) },
            SearchHit { score: 1, document: document(1, "Alpha", "x", Approval::Approved) },
        ];
        hits.sort_by(SearchHit::rank_cmp);
        assert_eq!(
            hits.iter().map(SearchHit::resource_id).collect::<Vec<_>>(),
            [2, 1, 3],
        );
    }
}
