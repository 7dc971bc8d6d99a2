//! Client-side logic for the Corral cost ledger.
//!
//! The crate is UI-agnostic: screens hold their data and loading flags, forms
//! validate edit buffers, and the generic [`DataTable`] does search, sort,
//! pagination and selection over whatever rows a screen hands it. All network
//! traffic goes through [`ApiClient`], which shares a [`Session`] with the rest
//! of the application.

pub mod api;
mod config;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod http;
mod locale;
pub mod models;
pub mod notify;
pub mod screens;
pub mod session;
pub mod table;

pub use api::{ApiClient, ExportFormat};
pub use config::{BusinessConfig, ConfigError};
pub use envelope::{ApiResponse, Pagination};
pub use error::{ApiError, ApiResult};
pub use locale::{DateOrder, Locale};
pub use notify::{Level, Notification, NotificationReceiver, Notifier};
pub use session::{AuthStatus, MemoryTokenStore, Session, TokenStore, TokenStoreError};
pub use table::{ColumnDescriptor, DataTable, TableConfig, TableEvent, TableRow};
