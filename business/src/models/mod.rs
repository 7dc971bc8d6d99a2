//! Backend payloads.

mod auth;
mod category;
mod cost;
mod report;

pub use auth::{AuthResponse, AuthTokens, LoginRequest, User};
pub use category::{Category, CategoryPayload, CategoryTree};
pub use cost::{CategoryTotal, Cost, CostFilters, CostPayload, MonthTotal};
pub use report::{MonthlyReport, ReportEntry};

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
