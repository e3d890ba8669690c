//! Resource APIs, one type per API area.
//!
//! Each type is a cheap handle around the shared [`BaseSdk`](crate::base::BaseSdk)
//! and is obtained from [`Dateno`](crate::Dateno).

mod data_catalogs;
mod raw_data_access;
mod search;
mod service;
mod statistics;

pub use data_catalogs::DataCatalogsApi;
pub use raw_data_access::RawDataAccessApi;
pub use search::SearchApi;
pub use service::ServiceApi;
pub use statistics::{StatisticsApi, EXPORT_DEFAULT_ACCEPT};
