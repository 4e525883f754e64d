use super::error::SubmissionError;
use catalog_sdk::{CreateUser, TenantId, User};
use console_sdk::EditorMode;
use console_query::Role;

/// Values of the user editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Required on create; left blank on edit to keep the current one.
    pub password: String,
    pub role: Option<Role>,
    /// Only meaningful for managers.
    pub tenant_id: Option<TenantId>,
}

impl UserFormValues {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password: String::new(),
            role: Some(user.role),
            tenant_id: user.tenant.as_ref().map(|t| t.id),
        }
    }

    /// # Errors
    /// `MissingFields` for blank names, email, role, a missing password on
    /// create, or a manager without a tenant.
    pub fn to_payload(&self, mode: EditorMode) -> Result<CreateUser, SubmissionError> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                missing.push(field.to_owned());
            }
        }
        if mode == EditorMode::Create && self.password.is_empty() {
            missing.push("password".to_owned());
        }
        match self.role {
            None => missing.push("role".to_owned()),
            Some(Role::Manager) if self.tenant_id.is_none() => missing.push("tenantId".to_owned()),
            Some(_) => {}
        }
        let Some(role) = self.role.filter(|_| missing.is_empty()) else {
            return Err(SubmissionError::MissingFields(missing));
        };

        Ok(CreateUser {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
            role,
            tenant_id: self.tenant_id.filter(|_| role == Role::Manager),
        })
    }
}
