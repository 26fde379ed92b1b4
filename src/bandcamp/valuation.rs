//! Collection value from the currency rates embedded in a fan's profile page.

use std::collections::HashMap;

use scraper::{Html, Selector};

use crate::bandcamp::api_types;
use crate::bandcamp::custom_types::Item;
use crate::bandcamp::error::{Error, Result};

/// Exchange rates against the page's anchor currency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyRates(HashMap<String, f64>);

impl CurrencyRates {
    /// Extract the rates from the `data-blob` JSON of a profile page
    pub fn from_page(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("[data-blob]")
            .map_err(|err| Error::decode(format!("invalid selector: {err:?}")))?;

        let blob = document
            .select(&selector)
            .find_map(|element| element.value().attr("data-blob"))
            .ok_or_else(|| Error::decode("page has no data blob"))?;

        let data: api_types::PageData = serde_json::from_str(blob)?;
        let currency_data = data
            .currency_data
            .ok_or_else(|| Error::decode("page data has no currency_data"))?;

        tracing::debug!(currencies = currency_data.rates.len(), "found currency rates");
        Ok(Self(currency_data.rates))
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).copied()
    }

    /// Sum of `price * rate` over `items`, converted into `target`.
    ///
    /// Items whose currency has no rate add nothing. Plain floating point,
    /// no rounding to minor units.
    pub fn total<'a>(&self, items: impl IntoIterator<Item = &'a Item>, target: &str) -> Result<f64> {
        let target_rate = self
            .rate(target)
            .ok_or_else(|| Error::UnknownCurrency(target.to_owned()))?;

        let total: f64 = items
            .into_iter()
            .map(|item| match self.rate(&item.currency) {
                Some(rate) => item.price * rate,
                None => {
                    tracing::warn!(item = %item, currency = %item.currency, "no rate for currency");
                    0.0
                }
            })
            .sum();

        Ok(total / target_rate)
    }
}

impl FromIterator<(String, f64)> for CurrencyRates {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
