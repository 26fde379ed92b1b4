use std::collections::HashMap;

use serde::Deserialize;

/// JSON embedded in the `data-blob` attribute of a fan's profile page
#[derive(Deserialize)]
pub struct PageData {
    pub(in crate::bandcamp) currency_data: Option<CurrencyData>,
}

#[derive(Deserialize)]
pub struct CurrencyData {
    /// Currency code to rate against the anchor currency
    #[serde(alias = "Rates")]
    pub(in crate::bandcamp) rates: HashMap<String, f64>,
}
