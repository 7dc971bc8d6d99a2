use log::info;

use super::{Services, SubmitError, track};
use crate::forms::{Form as _, LoginForm};
use crate::models::User;

pub const LOGIN_SUCCESS: &str = "Inicio de sesión exitoso";

#[derive(Debug)]
pub struct LoginScreen {
    services: Services,
    form: LoginForm,
    loading: bool,
}

impl LoginScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            form: LoginForm::default(),
            loading: false,
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validates the form and signs in. The password is cleared afterwards either way.
    pub async fn submit(&mut self) -> Result<User, SubmitError> {
        let request = self.form.commit()?;
        let result = track(
            &mut self.loading,
            &self.services.notifier,
            self.services.api.login(&request),
        )
        .await;
        self.form.password.clear();

        let auth = result?;
        info!("signed in as {}", auth.user.username);
        self.services.notifier.success(LOGIN_SUCCESS);
        Ok(auth.user)
    }
}
