//! Attribute section of the product form.
//!
//! The form keeps attributes as `name -> value`; the catalog service wants an
//! ordered `[{ name, value }]`. Order is the form's insertion order.

use catalog_sdk::{Attribute, Category};
use serde_json::{Map, Value};

pub type AttributeValues = Map<String, Value>;

#[must_use]
pub fn encode_attributes(values: &AttributeValues) -> Vec<Attribute> {
    values
        .iter()
        .map(|(name, value)| Attribute {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Later duplicates overwrite earlier ones.
#[must_use]
pub fn decode_attributes(attributes: &[Attribute]) -> AttributeValues {
    attributes
        .iter()
        .map(|a| (a.name.clone(), a.value.clone()))
        .collect()
}

/// Default value of every attribute declared by `category`.
#[must_use]
pub fn attribute_defaults(category: &Category) -> AttributeValues {
    category
        .attributes
        .iter()
        .map(|a| (a.name.clone(), a.default_value.clone()))
        .collect()
}
