use super::error::SubmissionError;
use catalog_sdk::{CreateTenant, Tenant};

/// Values of the tenant (restaurant) editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TenantFormValues {
    pub name: String,
    pub address: String,
}

impl TenantFormValues {
    #[must_use]
    pub fn from_tenant(tenant: &Tenant) -> Self {
        Self {
            name: tenant.name.clone(),
            address: tenant.address.clone(),
        }
    }

    /// # Errors
    /// `MissingFields` when name or address is blank.
    pub fn to_payload(&self) -> Result<CreateTenant, SubmissionError> {
        let missing: Vec<String> = [("name", &self.name), ("address", &self.address)]
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k.to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }
        Ok(CreateTenant {
            name: self.name.trim().to_owned(),
            address: self.address.trim().to_owned(),
        })
    }
}
