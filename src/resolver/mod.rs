//! SRV resolvers.

use crate::{
    order::{order_in_place, ZeroWeight},
    record::SrvRecord,
};
use async_trait::async_trait;
use rand::Rng;

#[cfg(feature = "hickory")]
pub mod hickory;

mod fixed;
pub use fixed::{StaticLookupError, StaticResolver};

/// Represents the ability to act as a SRV resolver.
///
/// Resolvers are plain values handed to whoever needs them, so tests can
/// substitute a [`StaticResolver`] for a real one.
#[async_trait]
pub trait SrvResolver: Send + Sync {
    /// SRV record representation produced by the resolver.
    type Record: SrvRecord + Send;

    /// Errors encountered during SRV resolution.
    type Error: std::error::Error + 'static;

    /// Gets the records corresponding to a srv name without sorting by priority
    /// or shuffling based on weight.
    ///
    /// A name that exists but has no SRV records yields an empty list. Every
    /// other failure (NXDOMAIN, timeouts, network errors) is an `Err`.
    async fn get_srv_records_unordered(&self, srv: &str) -> Result<Vec<Self::Record>, Self::Error>;

    /// Gets the records corresponding to a srv name, sorting by priority and
    /// shuffling based on weight.
    async fn get_srv_records(&self, srv: &str) -> Result<Vec<Self::Record>, Self::Error> {
        let mut records = self.get_srv_records_unordered(srv).await?;
        Self::order_srv_records(&mut records, rand::rng());
        Ok(records)
    }

    /// Sorts SRV records by priority and weight per RFC 2782.
    fn order_srv_records(records: &mut [Self::Record], rng: impl Rng) {
        order_in_place(records, ZeroWeight::Uniform, rng);
    }
}
