//! Integration with the Adyen recurring-contract SOAP API.
//!
//! The crate builds namespaced XML request documents from typed parameter
//! sets, validates per-action required fields before any network call, and
//! parses gateway responses through an engine-agnostic XML layer, so that
//! every hosting environment's XML engine yields identical typed results.

pub mod connectors;
pub mod consts;
pub mod errors;
pub mod transport;
pub mod types;
pub mod utils;
pub mod validate;

pub use connectors::adyen::{Action, Adyen, AdyenConfig, Environment};
pub use errors::{ConnectorError, CustomResult};
pub use transport::{HttpTransport, Transport};
pub use types::{
    DisableResult, ListResult, RecurringDetail, RecurringParams, RecurringResponse,
    StoreTokenResult,
};
