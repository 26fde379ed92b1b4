mod api_types;
mod client;
pub mod custom_types;
mod error;
mod valuation;

pub use client::{Client, DEFAULT_SITE};
pub use custom_types::{Collection, Fan, FanId, Item, ItemType, Sale, SaleType, Time, Track};
pub use error::{Error, Result};
pub use valuation::CurrencyRates;

/// ISO 4217 style code, e.g. `USD`
pub fn validate_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Run some basic checks on the `identity` cookie value
pub fn validate_identity(identity: &str) -> bool {
    !identity.is_empty()
        && identity
            .chars()
            .all(|c| c.is_ascii_graphic() && c != ';' && c != ',')
}
