use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::bandcamp::custom_types::{FanId, ItemType, SaleType, Time, Track};

/// Body of `fancollection/1/collection_items` and `fancollection/1/wishlist_items`
#[derive(Debug, Serialize)]
pub struct ItemsRequest {
    pub(in crate::bandcamp) fan_id: FanId,
    /// `<unix time>:<item id>:<a|d|t>:<count>:`
    pub(in crate::bandcamp) older_than_token: String,
    pub(in crate::bandcamp) count: i64,
}

impl ItemsRequest {
    /// Request the entire list, older than `now`
    pub fn everything(fan_id: FanId, now: DateTime<Utc>) -> Self {
        Self {
            fan_id,
            older_than_token: format!("{}::a::", now.timestamp()),
            count: i64::MAX,
        }
    }
}

/// Fragments may be missing or `null`; both mean empty
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `fancollection/1/collection_items`
#[derive(Deserialize)]
pub struct CollectionItems {
    pub(in crate::bandcamp) items: Vec<Item>,
    /// Keyed by sale, e.g. `p456`
    #[serde(default, deserialize_with = "null_as_default")]
    pub(in crate::bandcamp) redownload_urls: HashMap<String, String>,
    /// Keyed by item, e.g. `a123`
    #[serde(default, deserialize_with = "null_as_default")]
    pub(in crate::bandcamp) tracklists: HashMap<String, Vec<Track>>,
}

/// `fancollection/1/wishlist_items`, which has no redownload URLs
#[derive(Deserialize)]
pub struct WishlistItems {
    pub(in crate::bandcamp) items: Vec<Item>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(in crate::bandcamp) tracklists: HashMap<String, Vec<Track>>,
}

/// Collection or wishlist entry. Fan id, genre, "why", and the other
/// extraneous metadata are not decoded.
#[derive(Deserialize)]
pub struct Item {
    pub(in crate::bandcamp) item_id: i64,
    pub(in crate::bandcamp) tralbum_type: ItemType,
    pub(in crate::bandcamp) band_name: Option<String>,
    pub(in crate::bandcamp) item_title: Option<String>,
    #[serde(default)]
    pub(in crate::bandcamp) purchased: Time,
    pub(in crate::bandcamp) item_art_url: Option<String>,
    pub(in crate::bandcamp) item_url: Option<String>,
    /// Absent when not purchased
    pub(in crate::bandcamp) sale_item_id: Option<i64>,
    pub(in crate::bandcamp) sale_item_type: Option<SaleType>,
    pub(in crate::bandcamp) price: Option<f64>,
    pub(in crate::bandcamp) currency: Option<String>,
}
