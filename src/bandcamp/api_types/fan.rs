use serde::Deserialize;

use crate::bandcamp::custom_types::Fan;

/// `fan/2/collection_summary`. Tralbum lookup and following are ignored.
#[derive(Deserialize)]
pub struct CollectionSummary {
    pub(in crate::bandcamp) collection_summary: Fan,
}
