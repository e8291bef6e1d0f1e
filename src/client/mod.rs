//! Azure collaborators: token acquisition, Commerce API fetches, and the
//! on-disk rate card cache. All I/O lives here, outside the pricing core.

pub mod auth;
pub mod azure;
pub mod rate_cache;

pub use auth::AccessToken;
pub use azure::AzureClient;
pub use rate_cache::RateCardCache;
