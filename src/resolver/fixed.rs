//! SRV resolver answering from an in-memory table.

use super::SrvResolver;
use crate::Record;
use async_trait::async_trait;
use std::collections::HashMap;

/// Failures reported by a [`StaticResolver`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaticLookupError {
    /// The name is not in the table.
    #[error("no such domain: {0}")]
    NxDomain(String),
    /// The name was registered as failing.
    #[error("resolution of {0} failed")]
    Unreachable(String),
}

#[derive(Debug, Clone)]
enum Answer {
    Records(Vec<Record>),
    Failure,
}

/// Resolver returning fixed answers, for tests and for hosts that locate
/// services through their own configuration instead of DNS.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    answers: HashMap<String, Answer>,
}

impl StaticResolver {
    /// Creates a resolver that knows no names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `srv` with `records`. An empty list makes the name exist with
    /// no SRV records.
    pub fn with_records(mut self, srv: &str, records: impl IntoIterator<Item = Record>) -> Self {
        self.answers
            .insert(normalize(srv), Answer::Records(records.into_iter().collect()));
        self
    }

    /// Makes every lookup of `srv` fail.
    pub fn with_failure(mut self, srv: &str) -> Self {
        self.answers.insert(normalize(srv), Answer::Failure);
        self
    }
}

fn normalize(srv: &str) -> String {
    srv.trim_end_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl SrvResolver for StaticResolver {
    type Record = Record;
    type Error = StaticLookupError;

    async fn get_srv_records_unordered(&self, srv: &str) -> Result<Vec<Self::Record>, Self::Error> {
        match self.answers.get(&normalize(srv)) {
            Some(Answer::Records(records)) => Ok(records.clone()),
            Some(Answer::Failure) => Err(StaticLookupError::Unreachable(srv.to_owned())),
            None => Err(StaticLookupError::NxDomain(srv.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SrvRecord;

    const SIP: &str = "_sip._tcp.example.com.";

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with_records(
                SIP,
                [
                    "20 0 5060 backup.example.com.".parse::<Record>().unwrap(),
                    "10 60 5060 sip1.example.com.".parse::<Record>().unwrap(),
                    "10 20 5060 sip2.example.com.".parse::<Record>().unwrap(),
                ],
            )
            .with_records("_xmpp-client._tcp.example.com", [])
            .with_failure("_sip._udp.example.com")
    }

    #[tokio::test]
    async fn srv_lookup_unordered() {
        let records = resolver().get_srv_records_unordered(SIP).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].target(), "backup.example.com.");
    }

    #[tokio::test]
    async fn srv_lookup_ordered() {
        let records = resolver().get_srv_records(SIP).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].priority() <= w[1].priority()));
        assert_eq!(records[2].target(), "backup.example.com.");
    }

    #[tokio::test]
    async fn names_are_case_and_dot_insensitive() {
        let records = resolver()
            .get_srv_records_unordered("_SIP._TCP.Example.COM")
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn no_records_is_not_an_error() {
        let records = resolver()
            .get_srv_records("_xmpp-client._tcp.example.com.")
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn failures_are_distinct_from_no_records() {
        assert_eq!(
            resolver().get_srv_records("_sip._udp.example.com").await,
            Err(StaticLookupError::Unreachable("_sip._udp.example.com".into()))
        );
        assert_eq!(
            resolver().get_srv_records("_sip._tcp.example.net").await,
            Err(StaticLookupError::NxDomain("_sip._tcp.example.net".into()))
        );
    }
}
