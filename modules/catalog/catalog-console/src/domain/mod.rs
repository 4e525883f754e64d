pub mod attributes;
pub mod error;
pub mod pricing;
pub mod product_form;
pub mod tenant_form;
pub mod user_form;

pub use attributes::{AttributeValues, attribute_defaults, decode_attributes, encode_attributes};
pub use error::{PricingError, SubmissionError};
pub use pricing::{OptionPrices, PriceKey, PricingForm};
pub use product_form::{ProductFormValues, ProductPayload, check_image};
pub use tenant_form::TenantFormValues;
pub use user_form::UserFormValues;
