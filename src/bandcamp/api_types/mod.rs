//! Response shapes as the fan API sends them.

pub mod collection;
pub mod fan;
pub mod page_data;

pub use collection::{CollectionItems, Item, ItemsRequest, WishlistItems};
pub use fan::CollectionSummary;
pub use page_data::PageData;

use serde::Deserialize;

/// Sent with `error: true` on failure, whatever the HTTP status
#[derive(Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub(in crate::bandcamp) error: bool,
    #[serde(default)]
    pub(in crate::bandcamp) error_message: Option<String>,
}
