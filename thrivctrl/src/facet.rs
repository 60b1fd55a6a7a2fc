use thrivcore::{
    ac::agent::Agent,
    search::{
        Facet,
        FacetCount,
        FacetField,
        RawFacets,
    },
};

/// Whether the facet may be shown to the agent.  Only administrators may
/// see how the hits break down by approval state.
pub fn facet_visible(field: FacetField, agent: &Agent) -> bool {
    match field {
        FacetField::Approved => agent.is_admin(),
        _ => true,
    }
}

/// Shapes the raw per field counts into facets for presentation,
/// preserving both the dimension order and the value order.
pub fn build_facets(raw: &RawFacets, agent: &Agent) -> Vec<Facet> {
    raw.iter()
        .filter(|facet| facet_visible(facet.field, agent))
        .map(|facet| Facet {
            name: facet.field.to_string(),
            facet_counts: facet.counts.iter()
                .map(|count| FacetCount {
                    category: count.value.clone(),
                    hit_count: count.count,
                    is_selected: count.selected,
                })
                .collect(),
        })
        .collect()
}
