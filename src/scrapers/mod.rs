pub mod blocket;
pub mod token;
pub mod traits;
pub mod types;

pub use blocket::BlocketClient;
pub use traits::MarketplaceApi;
pub use types::ClientConfig;
