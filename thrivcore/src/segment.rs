use serde::{Deserialize, Serialize};
use crate::macros::collection;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Segment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Segments(Vec<Segment>);

collection!(Segments, Segment);

pub mod traits {
    use async_trait::async_trait;
    use crate::error::BackendError;
    use super::{Segment, Segments};

    #[async_trait]
    pub trait SegmentBackend {
        async fn add_segment(
            &self,
            name: &str,
            description: Option<&str>,
        ) -> Result<i64, BackendError>;
        async fn get_segment(
            &self,
            id: i64,
        ) -> Result<Option<Segment>, BackendError>;
        async fn get_segment_by_name(
            &self,
            name: &str,
        ) -> Result<Option<Segment>, BackendError>;
        async fn list_segments(
            &self,
        ) -> Result<Segments, BackendError>;
    }
}
