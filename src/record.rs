//! SRV records and the connection targets they point at.

use std::{fmt, num::ParseIntError, str::FromStr};

use http::uri::Scheme;
use url::Url;

/// Representation of types that contain the fields of a SRV record.
pub trait SrvRecord {
    /// Type representing the SRV record's target. Must implement `Display` so
    /// it can be turned into a [`Target`].
    type Target: fmt::Display + ?Sized;

    /// Gets a SRV record's target.
    fn target(&self) -> &Self::Target;

    /// Gets a SRV record's port.
    fn port(&self) -> u16;

    /// Gets a SRV record's priority.
    fn priority(&self) -> u16;

    /// Gets a SRV record's weight.
    fn weight(&self) -> u16;

    /// Gets the host/port pair a client should connect to for this record.
    fn to_target(&self) -> Target {
        Target::new(self.target().to_string(), self.port())
    }

    /// Parses a SRV record into a URL with a given scheme (e.g. https).
    fn parse(&self, scheme: Scheme) -> Result<Url, url::ParseError> {
        self.to_target().to_url(scheme)
    }
}

/// Errors produced when building a [`Record`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    /// The target host is empty or contains whitespace.
    #[error("invalid SRV target {0:?}")]
    Target(String),
    /// The textual form did not have exactly four fields.
    #[error("expected `<priority> <weight> <port> <target>`, found {0} fields")]
    FieldCount(usize),
    /// A numeric field was missing its value or out of range.
    #[error("invalid SRV {name}: {source}")]
    Field {
        /// Name of the offending field.
        name: &'static str,
        /// Underlying integer parsing error.
        source: ParseIntError,
    },
}

/// A single SRV answer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    priority: u16,
    weight: u16,
    port: u16,
    target: String,
}

impl Record {
    /// Creates a record, rejecting targets that cannot name a host.
    pub fn new(
        priority: u16,
        weight: u16,
        port: u16,
        target: impl Into<String>,
    ) -> Result<Self, InvalidRecord> {
        let target = target.into();
        if target.is_empty() || target.chars().any(char::is_whitespace) {
            return Err(InvalidRecord::Target(target));
        }
        Ok(Self {
            priority,
            weight,
            port,
            target,
        })
    }
}

impl SrvRecord for Record {
    type Target = str;

    fn target(&self) -> &Self::Target {
        &self.target
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn weight(&self) -> u16 {
        self.weight
    }
}

/// Parses the RDATA presentation form, e.g. `10 60 5060 sip1.example.com.`.
impl FromStr for Record {
    type Err = InvalidRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect::<Vec<_>>();
        let &[priority, weight, port, target] = &fields[..] else {
            return Err(InvalidRecord::FieldCount(fields.len()));
        };

        let number = |name, value: &str| {
            value
                .parse::<u16>()
                .map_err(|source| InvalidRecord::Field { name, source })
        };

        Self::new(
            number("priority", priority)?,
            number("weight", weight)?,
            number("port", port)?,
            target,
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

/// A host/port pair to attempt a connection to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Creates a target. A trailing root label dot is dropped from `host`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let mut host = host.into();
        if host.len() > 1 && host.ends_with('.') {
            host.pop();
        }
        Self { host, port }
    }

    /// Host name (or address literal) of the target.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port of the target.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds a URL for this target with a given scheme.
    pub fn to_url(&self, scheme: Scheme) -> Result<Url, url::ParseError> {
        // Host and port are set separately so each is validated on its own;
        // a formatted `host:port` string would accept a host like
        // `foo.com:123/bar` and silently drop the port.
        let mut url = Url::parse(&format!("{}://localhost", scheme.as_str()))?;
        url.set_host(Some(self.host.as_str()))?;
        url.set_port(Some(self.port))
            .map_err(|_| url::ParseError::SetHostOnCannotBeABaseUrl)?;
        Ok(url)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_presentation_form() {
        let record: Record = "10 60 5060 sip1.example.com.".parse().unwrap();
        assert_eq!(record.priority(), 10);
        assert_eq!(record.weight(), 60);
        assert_eq!(record.port(), 5060);
        assert_eq!(record.target(), "sip1.example.com.");
        assert_eq!(record.to_string(), "10 60 5060 sip1.example.com.");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(
            "10 60 5060".parse::<Record>(),
            Err(InvalidRecord::FieldCount(3))
        );
        assert_eq!(
            "1 2 3 a.example.com extra".parse::<Record>(),
            Err(InvalidRecord::FieldCount(5))
        );
        assert!(matches!(
            "-1 0 5222 xmpp.example.com".parse::<Record>(),
            Err(InvalidRecord::Field {
                name: "priority",
                ..
            })
        ));
        assert!(matches!(
            "0 0 70000 xmpp.example.com".parse::<Record>(),
            Err(InvalidRecord::Field { name: "port", .. })
        ));
    }

    #[test]
    fn new_rejects_bad_targets() {
        assert_eq!(Record::new(0, 0, 1, ""), Err(InvalidRecord::Target("".into())));
        assert!(Record::new(0, 0, 1, "a b").is_err());
    }

    #[test]
    fn target_drops_root_dot() {
        let record = Record::new(5, 0, 5222, "xmpp.example.com.").unwrap();
        let target = record.to_target();
        assert_eq!(target.host(), "xmpp.example.com");
        assert_eq!(target.port(), 5222);
        assert_eq!(target.to_string(), "xmpp.example.com:5222");
    }

    #[test]
    fn url_from_record() {
        let record = Record::new(1, 100, 8211, "srv.example.org").unwrap();
        assert_eq!(
            record.parse(Scheme::HTTPS).unwrap().as_str(),
            "https://srv.example.org:8211/"
        );
        assert_eq!(
            record.parse(Scheme::HTTP).unwrap().as_str(),
            "http://srv.example.org:8211/"
        );
    }
}
