use async_trait::async_trait;

use super::types::RealProductData;

/// External collaborator supplying a current typical price for an
/// ingredient name.
///
/// Implementations must resolve every failure mode (network error,
/// timeout, unknown name) to `None`; the engine treats missing data as
/// "no change", never as an error.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn lookup(&self, name: &str) -> Option<RealProductData>;
}
