use std::collections::HashMap;
use thrivcore::{
    ac::agent::Agent,
    search::{
        RawFacets,
        SearchRequest,
        SearchResultSet,
    },
};

use crate::{
    error::PlatformError,
    facet::build_facets,
    platform::Platform,
};

impl Platform {
    /// Runs the query against the search index and reports only what the
    /// agent is permitted to view.
    ///
    /// The total and every facet count are computed over the visible hits,
    /// so that they agree with what a listing would show the same agent.
    pub async fn search(
        &self,
        request: &SearchRequest,
        agent: &Agent,
    ) -> Result<SearchResultSet, PlatformError> {
        let raw = self.with_index(self.si_platform().search(request)).await?;
        log::debug!("index reported {} hit(s) for {:?}", raw.total, request.query);

        // the index tallies facets over every hit, hidden ones included

        let ids = raw.hits.iter()
            .map(|hit| hit.resource_id())
            .collect::<Vec<_>>();
        let mut resources = self.rd_platform()
            .list_resources_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|resource| self.enforcer().can_view(agent, resource))
            .map(|resource| (resource.id, resource))
            .collect::<HashMap<_, _>>();

        let visible = raw.hits.into_iter()
            .filter(|hit| resources.contains_key(&hit.resource_id()))
            .collect::<Vec<_>>();
        let facets = RawFacets::tally(
            visible.iter().map(|hit| &hit.document),
            &request.filters,
        );
        let total = visible.len();
        let start = request.start.unwrap_or(0);
        let page = visible.iter()
            .skip(start)
            .take(request.size.unwrap_or(usize::MAX))
            .filter_map(|hit| resources.remove(&hit.resource_id()))
            .collect::<Vec<_>>();
        log::trace!("{total} hit(s) visible, returning {} from {start}", page.len());

        Ok(SearchResultSet {
            query: request.query.clone(),
            filters: request.filters.clone(),
            total,
            start,
            resources: self.rd_platform().expand_resources(page).await?,
            facets: build_facets(&facets, agent),
        })
    }
}
