//! Product editor: form state, validation and the upload payload.

use super::attributes::{AttributeValues, attribute_defaults, decode_attributes, encode_attributes};
use super::error::SubmissionError;
use super::pricing::PricingForm;
use catalog_sdk::{Attribute, CanonicalPricing, Category, FileUpload, MultipartForm, Product};
use console_query::{Actor, QueryFields, Role};

/// Values of the product editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub category_id: Option<String>,
    /// Tenant picker value; ignored for managers.
    pub tenant_id: Option<String>,
    pub is_publish: Option<bool>,
    /// Newly picked image.
    pub image: Option<FileUpload>,
    /// Image already stored for the product being edited.
    pub image_url: Option<String>,
    pub pricing: PricingForm,
    pub attributes: AttributeValues,
}

impl ProductFormValues {
    /// Fresh form for `category`: empty pricing entries and default attributes.
    #[must_use]
    pub fn for_category(category: &Category) -> Self {
        Self {
            category_id: Some(category.id.clone()),
            pricing: PricingForm::from_category(category),
            attributes: attribute_defaults(category),
            ..Self::default()
        }
    }

    /// Pre-fill from a stored product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category_id: product.category_id.clone(),
            tenant_id: product.tenant_id.clone(),
            is_publish: Some(product.is_publish),
            image: None,
            image_url: Some(product.image.clone()).filter(|url| !url.is_empty()),
            pricing: PricingForm::decode(&product.price_configuration),
            attributes: decode_attributes(&product.attributes),
        }
    }
}

/// Reject anything but JPEG and PNG.
///
/// # Errors
/// `UnsupportedImage` with the offending content type.
pub fn check_image(file: &FileUpload) -> Result<(), SubmissionError> {
    let essence = file.content_type.essence_str();
    if essence == mime::IMAGE_JPEG.essence_str() || essence == mime::IMAGE_PNG.essence_str() {
        Ok(())
    } else {
        Err(SubmissionError::UnsupportedImage(essence.to_owned()))
    }
}

/// Validated product ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub category_id: String,
    pub tenant_id: String,
    pub is_publish: bool,
    pub image: Option<FileUpload>,
    pub price_configuration: CanonicalPricing,
    pub attributes: Vec<Attribute>,
}

impl ProductPayload {
    /// Validate `values` and resolve the tenant for `actor`.
    ///
    /// Managers always submit for their own tenant. Everyone else submits
    /// the picked tenant.
    ///
    /// # Errors
    /// `MissingFields` listing every missing field, or `UnsupportedImage`.
    pub fn build(actor: &Actor, values: &ProductFormValues) -> Result<Self, SubmissionError> {
        let mut missing = Vec::new();
        let mut require = |ok: bool, field: &str| {
            if !ok {
                missing.push(field.to_owned());
            }
        };

        require(!values.name.trim().is_empty(), "name");
        require(!values.description.trim().is_empty(), "description");
        let category_id = values.category_id.clone().filter(|c| !c.is_empty());
        require(category_id.is_some(), QueryFields::CATEGORY_ID);
        require(
            values.image.is_some() || values.image_url.is_some(),
            "image",
        );

        let tenant_id = if actor.role == Role::Manager {
            actor.tenant_id().map(|id| id.to_string())
        } else {
            values.tenant_id.clone().filter(|t| !t.is_empty())
        };
        require(tenant_id.is_some(), QueryFields::TENANT_ID);

        for (key, prices) in values.pricing.entries() {
            let field = format!("priceConfiguration.{}", key.configuration_key);
            require(!prices.is_empty(), field.as_str());
        }

        let (Some(category_id), Some(tenant_id), true) = (category_id, tenant_id, missing.is_empty())
        else {
            return Err(SubmissionError::MissingFields(missing));
        };

        if let Some(image) = &values.image {
            check_image(image)?;
        }

        Ok(Self {
            name: values.name.trim().to_owned(),
            description: values.description.trim().to_owned(),
            category_id,
            tenant_id,
            is_publish: values.is_publish.unwrap_or(false),
            image: values.image.clone(),
            price_configuration: values.pricing.encode(),
            attributes: encode_attributes(&values.attributes),
        })
    }

    /// Flatten into `multipart/form-data` parts.
    ///
    /// # Errors
    /// `Encode` if the JSON parts cannot be serialized.
    pub fn to_multipart(&self) -> Result<MultipartForm, SubmissionError> {
        let mut form = MultipartForm::new()
            .text("name", &self.name)
            .text("description", &self.description)
            .text(QueryFields::CATEGORY_ID, &self.category_id)
            .text(QueryFields::TENANT_ID, &self.tenant_id)
            .text(QueryFields::IS_PUBLISH, self.is_publish.to_string())
            .text(
                "priceConfiguration",
                serde_json::to_string(&self.price_configuration)?,
            )
            .text("attributes", serde_json::to_string(&self.attributes)?);
        if let Some(image) = &self.image {
            form = form.file("image", image.clone());
        }
        Ok(form)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::pricing::{OptionPrices, PriceKey};
    use catalog_sdk::PriceType;
    use serde_json::json;

    fn png() -> FileUpload {
        FileUpload {
            file_name: "pizza.png".to_owned(),
            content_type: mime::IMAGE_PNG,
            data: bytes::Bytes::from_static(b"\x89PNG"),
        }
    }

    fn filled() -> ProductFormValues {
        let mut values = ProductFormValues {
            name: "Margherita".to_owned(),
            description: "Classic".to_owned(),
            category_id: Some("c1".to_owned()),
            tenant_id: Some("9".to_owned()),
            image: Some(png()),
            ..ProductFormValues::default()
        };
        values
            .pricing
            .set_price(PriceKey::new("Size", PriceType::Base), "Small", 400);
        values.attributes.insert("Spiciness".to_owned(), json!("Hot"));
        values
    }

    #[test]
    fn manager_tenant_overrides_form_value() {
        let payload = ProductPayload::build(&Actor::manager(1, 7), &filled()).unwrap();
        assert_eq!(payload.tenant_id, "7");
    }

    #[test]
    fn admin_tenant_is_taken_from_form() {
        let payload = ProductPayload::build(&Actor::admin(1), &filled()).unwrap();
        assert_eq!(payload.tenant_id, "9");
    }

    #[test]
    fn manager_does_not_need_tenant_picker() {
        let values = ProductFormValues {
            tenant_id: None,
            ..filled()
        };
        assert!(ProductPayload::build(&Actor::manager(1, 7), &values).is_ok());
    }

    #[test]
    fn publish_defaults_to_false() {
        let payload = ProductPayload::build(&Actor::admin(1), &filled()).unwrap();
        assert!(!payload.is_publish);
        let form = payload.to_multipart().unwrap();
        assert_eq!(form.get_text("isPublish"), Some("false"));
    }

    #[test]
    fn missing_fields_are_all_listed() {
        let mut values = ProductFormValues::default();
        values
            .pricing
            .insert(PriceKey::new("Size", PriceType::Base), OptionPrices::new());

        let err = ProductPayload::build(&Actor::admin(1), &values).unwrap_err();

        let SubmissionError::MissingFields(fields) = err else {
            panic!("unexpected {err}");
        };
        assert_eq!(
            fields,
            [
                "name",
                "description",
                "categoryId",
                "image",
                "tenantId",
                "priceConfiguration.Size"
            ]
        );
    }

    #[test]
    fn gif_is_rejected() {
        let mut values = filled();
        if let Some(image) = values.image.as_mut() {
            image.content_type = mime::IMAGE_GIF;
        }
        let err = ProductPayload::build(&Actor::admin(1), &values).unwrap_err();
        assert!(matches!(err, SubmissionError::UnsupportedImage(t) if t == "image/gif"));
    }

    #[test]
    fn multipart_carries_json_parts_and_file() {
        let payload = ProductPayload::build(&Actor::admin(1), &filled()).unwrap();
        let form = payload.to_multipart().unwrap();

        let pricing: serde_json::Value =
            serde_json::from_str(form.get_text("priceConfiguration").unwrap()).unwrap();
        assert_eq!(
            pricing,
            json!({ "Size": { "priceType": "base", "availableOptions": { "Small": 400 } } })
        );
        assert_eq!(
            form.get_text("attributes"),
            Some(r#"[{"name":"Spiciness","value":"Hot"}]"#)
        );
        assert_eq!(form.get_file("image").unwrap().file_name, "pizza.png");
    }

    #[test]
    fn edit_prefill_keeps_pricing_shape() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Margherita",
            "image": "https://cdn/p1.png",
            "categoryId": "c1",
            "tenantId": "7",
            "priceConfiguration": {
                "Size": { "priceType": "base", "availableOptions": { "Small": 400 } }
            },
            "attributes": [{ "name": "Spiciness", "value": "Hot" }],
        }))
        .unwrap();

        let values = ProductFormValues::from_product(&product);

        assert_eq!(values.is_publish, Some(false));
        assert_eq!(values.image_url.as_deref(), Some("https://cdn/p1.png"));
        assert_eq!(
            values.pricing.to_composite(),
            json!({ r#"{"configurationKey":"Size","priceType":"base"}"#: { "Small": 400 } })
        );
        assert_eq!(values.pricing.encode(), product.price_configuration);
    }
}
