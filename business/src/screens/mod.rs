//! Screen controllers.
//!
//! A screen owns its displayed data and a `loading` flag. Every request goes
//! through [`track`]: the flag is raised for the duration of the call, and a
//! failure is published as an error notification while the previously loaded
//! data stays in place. Nothing is retried.

mod category_list;
mod cost_list;
mod dashboard;
mod login;
mod reports;

pub use category_list::CategoryListScreen;
pub use cost_list::CostListScreen;
pub use dashboard::{DashboardScreen, DashboardStats, MONTH_WINDOW, MonthOption, TrendChange};
pub use login::{LOGIN_SUCCESS, LoginScreen};
pub use reports::{
    ExportFile, MSG_NO_DATA, MSG_NO_DOWNLOAD, MSG_REPORT_FAILED, MSG_SELECT_DATES, ReportsScreen,
    category_badge,
};

use std::future::Future;

use log::warn;

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::forms::FormErrors;
use crate::locale::Locale;
use crate::notify::Notifier;

/// What every screen needs: the API client, the notification sink and the display locale.
#[derive(Debug, Clone)]
pub struct Services {
    pub api: ApiClient,
    pub notifier: Notifier,
    pub locale: Locale,
}

impl Services {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let locale = api.config().locale.clone();
        Self {
            api,
            notifier,
            locale,
        }
    }
}

/// Why a submit did not go through.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The edit buffer did not validate; nothing was sent.
    #[error("{0}")]
    Invalid(#[from] FormErrors),
    /// The action needs data the screen has not loaded.
    #[error("{0}")]
    Unavailable(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Runs `request` with `loading` raised, publishing the user-facing message on failure.
async fn track<T>(
    loading: &mut bool,
    notifier: &Notifier,
    request: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    *loading = true;
    let result = request.await;
    *loading = false;
    if let Err(err) = &result {
        report_failure(notifier, err);
    }
    result
}

fn report_failure(notifier: &Notifier, err: &ApiError) {
    warn!("request failed: {err}");
    notifier.error(err.user_message());
}
