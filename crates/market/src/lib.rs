pub mod client;
pub mod reference;

pub use client::{MarketClientError, MarketDataClient};
pub use reference::ReferencePrices;
