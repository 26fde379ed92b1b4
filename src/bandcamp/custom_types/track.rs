use serde::{Deserialize, Deserializer, de};
use serde_json::{Map, Value};

/// Keys the track position may be sent under, in priority order.
/// Web responses use `track_number`, mobile-flavoured ones `track_num`.
const NUMBER_KEYS: [&str; 2] = ["track_number", "track_num"];

/// Streaming bitrate kept as the track URL
const STREAM_FORMAT: &str = "mp3-128";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    /// 0 if the item is itself a track
    pub number: i64,
    /// Empty when the response carries no streaming URLs
    pub url: String,
}

impl Track {
    fn from_map(data: &Map<String, Value>) -> Result<Self, &'static str> {
        let title = data
            .get("title")
            .and_then(Value::as_str)
            .ok_or("expected title")?;

        let number = NUMBER_KEYS
            .iter()
            .find_map(|key| data.get(*key).and_then(Value::as_i64))
            .unwrap_or_default();

        let url = data
            .get("streaming_url")
            .and_then(|urls| urls.get(STREAM_FORMAT))
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(Self {
            title: title.to_owned(),
            number,
            url: url.to_owned(),
        })
    }
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_map(&data).map_err(de::Error::custom)
    }
}
