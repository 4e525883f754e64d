//! Wire shape of product pricing and attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Base,
    Additional,
}

impl PriceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Additional => "additional",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices of one pricing dimension, in the smallest currency unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceConfiguration {
    pub price_type: PriceType,
    pub available_options: BTreeMap<String, u64>,
}

/// `configurationKey -> { priceType, availableOptions }` as sent to the
/// catalog service.
pub type CanonicalPricing = BTreeMap<String, PriceConfiguration>;

/// One product attribute in wire order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: serde_json::Value,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn price_type_uses_wire_names() {
        assert_eq!(
            serde_json::from_str::<PriceType>(r#""additional""#).unwrap(),
            PriceType::Additional
        );
        assert_eq!(serde_json::to_string(&PriceType::Base).unwrap(), r#""base""#);
        assert!(serde_json::from_str::<PriceType>(r#""aditional""#).is_err());
    }

    #[test]
    fn canonical_pricing_json_shape() {
        let pricing: CanonicalPricing = serde_json::from_str(
            r#"{"Size":{"priceType":"base","availableOptions":{"Small":400,"Large":800}}}"#,
        )
        .unwrap();
        assert_eq!(pricing["Size"].available_options["Large"], 800);
        assert!(
            serde_json::to_string(&pricing)
                .unwrap()
                .contains(r#""priceType":"base""#)
        );
    }
}
