use super::{FieldError, Form, FormErrors, Touched};
use crate::models::LoginRequest;

pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
    touched: Touched,
}

impl LoginForm {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            touched: Touched::default(),
        }
    }
}

impl Form for LoginForm {
    type Output = LoginRequest;

    const FIELDS: &'static [&'static str] = &["identifier", "password"];

    fn check(&self) -> Result<LoginRequest, FormErrors> {
        let mut errors = FormErrors::default();
        if self.identifier.trim().is_empty() {
            errors.push("identifier", FieldError::Required);
        }
        if self.password.is_empty() {
            errors.push("password", FieldError::Required);
        } else if self.password.chars().count() < PASSWORD_MIN {
            errors.push("password", FieldError::MinLength(PASSWORD_MIN));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginRequest {
            identifier: self.identifier.trim().to_owned(),
            password: self.password.clone(),
        })
    }

    fn touched(&self) -> &Touched {
        &self.touched
    }

    fn touched_mut(&mut self) -> &mut Touched {
        &mut self.touched
    }
}
