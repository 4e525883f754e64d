//! Product pricing transformer
//!
//! The product form holds prices under composite keys, one entry per
//! (configuration, price type) pair:
//!
//! ```text
//! {"configurationKey":"Size","priceType":"base"} -> { Small: 400, Large: 800 }
//! ```
//!
//! The catalog service wants them grouped by configuration key:
//!
//! ```text
//! Size -> { priceType: base, availableOptions: { Small: 400, Large: 800 } }
//! ```
//!
//! [`PricingForm`] is the typed form state. It is parsed from and rendered to
//! the composite-keyed JSON of the form surface, encoded to
//! [`CanonicalPricing`] on submit, and decoded back for edit pre-fill.

use super::error::PricingError;
use catalog_sdk::{CanonicalPricing, Category, PriceConfiguration, PriceType};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Option label -> price in the smallest currency unit.
pub type OptionPrices = BTreeMap<String, u64>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceKey {
    pub configuration_key: String,
    pub price_type: PriceType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CompositeKey {
    configuration_key: String,
    price_type: PriceType,
}

impl PriceKey {
    pub fn new(configuration_key: impl Into<String>, price_type: PriceType) -> Self {
        Self {
            configuration_key: configuration_key.into(),
            price_type,
        }
    }

    /// Parse the form's JSON-string key.
    ///
    /// # Errors
    /// `MalformedKey` for anything but an object with a non-empty
    /// `configurationKey` and a known `priceType`.
    pub fn parse(composite: &str) -> Result<Self, PricingError> {
        let malformed = |reason: String| PricingError::MalformedKey {
            key: composite.to_owned(),
            reason,
        };
        let raw: CompositeKey =
            serde_json::from_str(composite).map_err(|e| malformed(e.to_string()))?;
        if raw.configuration_key.is_empty() {
            return Err(malformed("empty configurationKey".to_owned()));
        }
        Ok(Self::new(raw.configuration_key, raw.price_type))
    }

    /// Render as `{"configurationKey":"…","priceType":"…"}`.
    #[must_use]
    pub fn to_composite(&self) -> String {
        format!(
            r#"{{"configurationKey":{},"priceType":"{}"}}"#,
            Value::String(self.configuration_key.clone()),
            self.price_type
        )
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_composite())
    }
}

/// Typed pricing section of the product form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PricingForm {
    entries: BTreeMap<PriceKey, OptionPrices>,
}

impl PricingForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PriceKey, prices: OptionPrices) -> Option<OptionPrices> {
        self.entries.insert(key, prices)
    }

    /// Set one option price, creating the entry if needed.
    pub fn set_price(&mut self, key: PriceKey, option: impl Into<String>, price: u64) {
        self.entries
            .entry(key)
            .or_default()
            .insert(option.into(), price);
    }

    #[must_use]
    pub fn get(&self, key: &PriceKey) -> Option<&OptionPrices> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PriceKey, &OptionPrices)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty entries for every pricing dimension of `category`.
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        let entries = category
            .price_configuration
            .iter()
            .map(|(key, config)| (PriceKey::new(key.clone(), config.price_type), OptionPrices::new()))
            .collect();
        Self { entries }
    }

    /// Parse the composite-keyed JSON object of the form surface.
    ///
    /// `null` options count as an untouched entry.
    ///
    /// # Errors
    /// Any malformed key or price, or two keys naming the same entry, fails
    /// the whole form; nothing is dropped.
    pub fn from_composite(value: &Value) -> Result<Self, PricingError> {
        let object = value.as_object().ok_or(PricingError::NotAnObject)?;
        let mut form = Self::new();
        for (composite, options) in object {
            let key = PriceKey::parse(composite)?;
            let prices = match options {
                Value::Null => OptionPrices::new(),
                Value::Object(options) => parse_prices(composite, options)?,
                _ => {
                    return Err(PricingError::OptionsNotAnObject {
                        key: composite.clone(),
                    });
                }
            };
            if form.entries.insert(key, prices).is_some() {
                return Err(PricingError::DuplicateKey {
                    key: composite.clone(),
                });
            }
        }
        Ok(form)
    }

    /// Render back to the composite-keyed JSON of the form surface.
    #[must_use]
    pub fn to_composite(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, prices)| {
                let prices = prices
                    .iter()
                    .map(|(option, price)| (option.clone(), Value::from(*price)))
                    .collect();
                (key.to_composite(), Value::Object(prices))
            })
            .collect();
        Value::Object(object)
    }

    /// Configuration keys that appear with more than one price type.
    #[must_use]
    pub fn collisions(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for key in self.entries.keys() {
            *seen.entry(key.configuration_key.as_str()).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key.to_owned())
            .collect()
    }

    /// Group by configuration key for the catalog service.
    ///
    /// When a configuration key appears with both price types the entry that
    /// sorts last (`additional`) wins.
    #[must_use]
    pub fn encode(&self) -> CanonicalPricing {
        let mut pricing = CanonicalPricing::new();
        for (key, prices) in &self.entries {
            let replaced = pricing.insert(
                key.configuration_key.clone(),
                PriceConfiguration {
                    price_type: key.price_type,
                    available_options: prices.clone(),
                },
            );
            if let Some(previous) = replaced {
                tracing::warn!(
                    configuration_key = %key.configuration_key,
                    dropped = %previous.price_type,
                    kept = %key.price_type,
                    "pricing collision: configuration key used with several price types"
                );
            }
        }
        pricing
    }

    /// Rebuild the form from stored pricing.
    #[must_use]
    pub fn decode(pricing: &CanonicalPricing) -> Self {
        let entries = pricing
            .iter()
            .map(|(key, config)| {
                (
                    PriceKey::new(key.clone(), config.price_type),
                    config.available_options.clone(),
                )
            })
            .collect();
        Self { entries }
    }
}

fn parse_prices(composite: &str, options: &Map<String, Value>) -> Result<OptionPrices, PricingError> {
    options
        .iter()
        .map(|(option, price)| {
            price
                .as_u64()
                .map(|p| (option.clone(), p))
                .ok_or_else(|| PricingError::InvalidPrice {
                    key: composite.to_owned(),
                    option: option.clone(),
                    value: price.to_string(),
                })
        })
        .collect()
}
