use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bandcamp::api_types;
use crate::bandcamp::error::{Error, Result};

mod time;
mod track;

pub use time::Time;
pub use track::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FanId(pub i64);

impl fmt::Display for FanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fan {
    pub username: String,
    /// Public profile page, which also carries the currency rates
    pub url: String,
    #[serde(rename = "fan_id")]
    pub id: FanId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ItemType {
    #[serde(rename = "a")]
    Album,
    #[serde(rename = "t")]
    Track,
}

impl ItemType {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Album => "a",
            Self::Track => "t",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum SaleType {
    /// Redeemed from a code
    Code,
    /// Purchased individually from an artist
    Purchase,
    /// Purchased as part of a whole discography
    Records,
    /// Tag not known to this client, kept verbatim for the sale key
    Other(String),
}

impl SaleType {
    pub fn tag(&self) -> &str {
        match self {
            Self::Code => "c",
            Self::Purchase => "p",
            Self::Records => "r",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for SaleType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "c" => Self::Code,
            "p" => Self::Purchase,
            "r" => Self::Records,
            _ => Self::Other(value),
        }
    }
}

/// How an item was acquired. Zero-valued when the item is not purchased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sale {
    pub id: i64,
    pub kind: Option<SaleType>,
}

impl Sale {
    pub fn is_purchased(&self) -> bool {
        self.kind.is_some()
    }

    /// Key of the sale in `redownload_urls`, e.g. `p456`
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.kind.as_ref().map(SaleType::tag).unwrap_or_default();
        write!(f, "{tag}{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub kind: ItemType,
    pub band_name: String,
    pub title: String,
    /// Zero if not purchased
    pub purchased: Time,
    pub art_url: String,
    pub url: String,
    pub sale: Sale,
    pub price: f64,
    pub currency: String,
    /// Empty if not purchased
    pub download: String,
    pub tracks: Vec<Track>,
}

impl Item {
    /// Key of the item in `tracklists`, e.g. `a123`
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

/// Partial item, before its tracklist and download are attached
impl From<api_types::Item> for Item {
    fn from(value: api_types::Item) -> Self {
        Self {
            id: value.item_id,
            kind: value.tralbum_type,
            band_name: value.band_name.unwrap_or_default(),
            title: value.item_title.unwrap_or_default(),
            purchased: value.purchased,
            art_url: value.item_art_url.unwrap_or_default(),
            url: value.item_url.unwrap_or_default(),
            sale: Sale {
                id: value.sale_item_id.unwrap_or_default(),
                kind: value.sale_item_type,
            },
            price: value.price.unwrap_or_default(),
            currency: value.currency.unwrap_or_default(),
            download: String::new(),
            tracks: Vec::new(),
        }
    }
}

/// Items with their tracklists (and, when purchased, download URLs) attached,
/// in the order the API listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection(Vec<Item>);

impl Collection {
    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn attach_tracklist(
    item: &mut Item,
    tracklists: &std::collections::HashMap<String, Vec<Track>>,
) -> Result<()> {
    // Cloned rather than removed: two items may share a key
    item.tracks = tracklists
        .get(&item.key())
        .cloned()
        .ok_or_else(|| Error::missing(&*item, "tracklist"))?;
    Ok(())
}

impl TryFrom<api_types::CollectionItems> for Collection {
    type Error = Error;

    fn try_from(value: api_types::CollectionItems) -> Result<Self> {
        let mut items = Vec::with_capacity(value.items.len());
        for raw in value.items {
            let mut item = Item::from(raw);
            attach_tracklist(&mut item, &value.tracklists)?;

            // Keyed by sale rather than item, so items sharing a sale share a URL
            item.download = value
                .redownload_urls
                .get(&item.sale.key())
                .filter(|url| !url.is_empty())
                .cloned()
                .ok_or_else(|| Error::missing(&item, "redownload"))?;

            items.push(item);
        }
        tracing::debug!(items = items.len(), "correlated collection");
        Ok(Self(items))
    }
}

impl TryFrom<api_types::WishlistItems> for Collection {
    type Error = Error;

    fn try_from(value: api_types::WishlistItems) -> Result<Self> {
        let mut items = Vec::with_capacity(value.items.len());
        for raw in value.items {
            let mut item = Item::from(raw);
            attach_tracklist(&mut item, &value.tracklists)?;
            items.push(item);
        }
        tracing::debug!(items = items.len(), "correlated wishlist");
        Ok(Self(items))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw_item(id: i64, kind: &str, sale_id: i64, sale_kind: &str) -> serde_json::Value {
        json!({
            "item_id": id,
            "tralbum_type": kind,
            "band_name": "Band",
            "item_title": format!("Title {id}"),
            "purchased": "17 Mar 2021 10:00:00 GMT",
            "item_art_url": "https://f4.bcbits.com/img/a1_9.jpg",
            "item_url": "https://band.bandcamp.com/album/title",
            "sale_item_id": sale_id,
            "sale_item_type": sale_kind,
            "price": 7.0,
            "currency": "USD",
        })
    }

    fn collection(value: serde_json::Value) -> Result<Collection> {
        let raw: api_types::CollectionItems = serde_json::from_value(value)?;
        Collection::try_from(raw)
    }

    fn wishlist(value: serde_json::Value) -> Result<Collection> {
        let raw: api_types::WishlistItems = serde_json::from_value(value)?;
        Collection::try_from(raw)
    }

    #[test]
    fn test_item_and_sale_keys() {
        let raw: api_types::Item = serde_json::from_value(raw_item(123, "a", 456, "p")).unwrap();
        let item = Item::from(raw);
        assert_eq!(item.key(), "a123");
        assert_eq!(item.sale.key(), "p456");
        assert!(item.sale.is_purchased());
    }

    #[test]
    fn test_unpurchased_sale_key() {
        let sale = Sale::default();
        assert_eq!(sale.key(), "0");
        assert!(!sale.is_purchased());
    }

    #[test]
    fn test_collection_correlates_in_order() {
        let collection = collection(json!({
            "items": [
                raw_item(2, "a", 20, "p"),
                raw_item(1, "t", 10, "c"),
                raw_item(3, "a", 30, "r"),
            ],
            "tracklists": {
                "a3": [{"title": "Three", "track_number": 1}],
                "t1": [{"title": "One", "track_number": null}],
                "a2": [
                    {"title": "Two A", "track_number": 1},
                    {"title": "Two B", "track_num": 2},
                ],
            },
            "redownload_urls": {
                "r30": "https://bandcamp.com/download?sitem_id=30",
                "c10": "https://bandcamp.com/download?sitem_id=10",
                "p20": "https://bandcamp.com/download?sitem_id=20",
            },
        }))
        .unwrap();

        let keys: Vec<String> = collection.iter().map(Item::key).collect();
        assert_eq!(keys, ["a2", "t1", "a3"]);

        let first = &collection.items()[0];
        assert_eq!(first.download, "https://bandcamp.com/download?sitem_id=20");
        assert_eq!(
            first.tracks,
            vec![
                Track {
                    title: "Two A".to_owned(),
                    number: 1,
                    url: String::new(),
                },
                Track {
                    title: "Two B".to_owned(),
                    number: 2,
                    url: String::new(),
                },
            ]
        );
        assert_eq!(first.band_name, "Band");
        assert_eq!(first.title, "Title 2");
        assert!(!first.purchased.is_zero());

        for item in &collection {
            assert!(!item.tracks.is_empty());
            assert!(!item.download.is_empty());
        }
    }

    #[test]
    fn test_collection_missing_tracklist() {
        let err = collection(json!({
            "items": [raw_item(123, "a", 456, "p")],
            "tracklists": {"a999": []},
            "redownload_urls": {"p456": "https://bandcamp.com/download"},
        }))
        .unwrap_err();
        assert!(matches!(&err, Error::Correlation { item, fragment: "tracklist" } if item == "a123"));
        assert_eq!(err.to_string(), "item a123 missing tracklist");
    }

    #[test]
    fn test_collection_missing_redownload() {
        let err = collection(json!({
            "items": [raw_item(123, "a", 456, "p")],
            "tracklists": {"a123": [{"title": "One"}]},
            "redownload_urls": {"p455": "https://bandcamp.com/download"},
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "item a123 missing redownload");
    }

    #[test]
    fn test_collection_empty_redownload_is_missing() {
        let err = collection(json!({
            "items": [raw_item(123, "a", 456, "p")],
            "tracklists": {"a123": [{"title": "One"}]},
            "redownload_urls": {"p456": ""},
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Correlation { fragment: "redownload", .. }));
    }

    #[test]
    fn test_collection_fails_without_partial_result() {
        let result = collection(json!({
            "items": [raw_item(1, "a", 10, "p"), raw_item(2, "a", 20, "p")],
            "tracklists": {"a1": [{"title": "One"}]},
            "redownload_urls": {"p10": "https://bandcamp.com/download?sitem_id=10"},
        }));
        assert!(matches!(result, Err(Error::Correlation { item, .. }) if item == "a2"));
    }

    #[test]
    fn test_collection_bad_track_is_decode_error() {
        let result = collection(json!({
            "items": [raw_item(1, "a", 10, "p")],
            "tracklists": {"a1": [{"track_number": 1}]},
            "redownload_urls": {"p10": "https://bandcamp.com/download"},
        }));
        assert!(matches!(result, Err(Error::Decode(message)) if message.contains("expected title")));
    }

    #[test]
    fn test_collection_unknown_sale_type_still_correlates() {
        let collection = collection(json!({
            "items": [raw_item(1, "a", 9, "s")],
            "tracklists": {"a1": [{"title": "One"}]},
            "redownload_urls": {"s9": "https://bandcamp.com/download?sitem_id=9"},
        }))
        .unwrap();
        let item = &collection.items()[0];
        assert_eq!(item.sale.kind, Some(SaleType::Other("s".to_owned())));
        assert_eq!(item.sale.key(), "s9");
        assert_eq!(item.download, "https://bandcamp.com/download?sitem_id=9");
    }

    #[test]
    fn test_collection_unknown_sale_type_without_redownload() {
        let err = collection(json!({
            "items": [raw_item(1, "a", 9, "s")],
            "tracklists": {"a1": [{"title": "One"}]},
            "redownload_urls": {"p9": "https://bandcamp.com/download?sitem_id=9"},
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "item a1 missing redownload");
    }

    #[test]
    fn test_collection_bad_purchase_date_is_decode_error() {
        let mut bad = raw_item(2, "a", 20, "p");
        bad["purchased"] = json!("2021-03-17T10:00:00Z");
        let result = collection(json!({
            "items": [raw_item(1, "a", 10, "p"), bad],
            "tracklists": {
                "a1": [{"title": "One"}],
                "a2": [{"title": "Two"}],
            },
            "redownload_urls": {
                "p10": "https://bandcamp.com/download?sitem_id=10",
                "p20": "https://bandcamp.com/download?sitem_id=20",
            },
        }));
        assert!(matches!(result, Err(Error::Decode(message)) if message.contains("invalid time")));
    }

    #[test]
    fn test_collection_null_fragments_are_empty() {
        let collection = collection(json!({
            "items": [],
            "tracklists": null,
            "redownload_urls": null,
        }))
        .unwrap();
        assert!(collection.is_empty());

        let err = wishlist(json!({
            "items": [{"item_id": 5, "tralbum_type": "a"}],
            "tracklists": null,
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "item a5 missing tracklist");
    }

    #[test]
    fn test_collection_duplicate_item_keys_share_tracklist() {
        let collection = collection(json!({
            "items": [raw_item(1, "a", 10, "p"), raw_item(1, "a", 11, "c")],
            "tracklists": {"a1": [{"title": "One", "track_number": 1}]},
            "redownload_urls": {
                "p10": "https://bandcamp.com/download?sitem_id=10",
                "c11": "https://bandcamp.com/download?sitem_id=11",
            },
        }))
        .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.items()[0].tracks, collection.items()[1].tracks);
        assert_eq!(collection.items()[1].tracks.len(), 1);
    }

    #[test]
    fn test_sale_type_tags() {
        for tag in ["c", "p", "r", "x"] {
            assert_eq!(SaleType::from(tag.to_owned()).tag(), tag);
        }
        assert_eq!(SaleType::from("p".to_owned()), SaleType::Purchase);
    }

    #[test]
    fn test_collection_empty() {
        let collection = collection(json!({
            "items": [],
            "tracklists": {},
            "redownload_urls": {},
        }))
        .unwrap();
        assert!(collection.is_empty());
    }

    // Redownload URLs are keyed by sale, not item: two items from the same
    // sale resolve to the same URL.
    #[test]
    fn test_collection_items_sharing_sale_share_download() {
        let collection = collection(json!({
            "items": [raw_item(1, "a", 10, "r"), raw_item(2, "a", 10, "r")],
            "tracklists": {
                "a1": [{"title": "One"}],
                "a2": [{"title": "Two"}],
            },
            "redownload_urls": {"r10": "https://bandcamp.com/download?sitem_id=10"},
        }))
        .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.items()[0].download, collection.items()[1].download);
    }

    #[test]
    fn test_wishlist_correlates_tracklists_only() {
        let wishlist = wishlist(json!({
            "items": [
                {"item_id": 5, "tralbum_type": "a", "item_title": "Wanted", "purchased": null,
                 "price": 8.0, "currency": "EUR"},
                {"item_id": 6, "tralbum_type": "t", "item_title": "Also"},
            ],
            "tracklists": {
                "a5": [{"title": "W1", "track_number": 1}],
                "t6": [{"title": "Also"}],
            },
        }))
        .unwrap();
        assert_eq!(wishlist.len(), 2);
        let first = &wishlist.items()[0];
        assert_eq!(first.key(), "a5");
        assert_eq!(first.download, "");
        assert!(first.purchased.is_zero());
        assert!(!first.sale.is_purchased());
        assert_eq!(first.price, 8.0);
        assert_eq!(first.currency, "EUR");
        assert_eq!(wishlist.items()[1].tracks[0].number, 0);
    }

    #[test]
    fn test_wishlist_missing_tracklist() {
        let err = wishlist(json!({
            "items": [{"item_id": 5, "tralbum_type": "a"}],
            "tracklists": {},
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "item a5 missing tracklist");
    }

    #[test]
    fn test_fan_summary() {
        let summary: api_types::CollectionSummary = serde_json::from_value(json!({
            "fan_id": 1234,
            "collection_summary": {
                "fan_id": 1234,
                "username": "listener",
                "url": "https://bandcamp.com/listener",
                "tralbum_lookup": {},
                "follows": {},
            },
        }))
        .unwrap();
        assert_eq!(
            summary.collection_summary,
            Fan {
                username: "listener".to_owned(),
                url: "https://bandcamp.com/listener".to_owned(),
                id: FanId(1234),
            }
        );
    }
}
