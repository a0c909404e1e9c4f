#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
Ordering of DNS SRV records for failover connection attempts.

# Introduction

SRV Records, as defined in [RFC 2782](https://tools.ietf.org/html/rfc2782),
are DNS records of the form

`_Service._Proto.Name TTL Class SRV Priority Weight Port Target`

For instance, a DNS server might respond with the following SRV records for
`_xmpp-client._tcp.example.com`:

```text
_xmpp-client._tcp.example.com. 60 IN SRV 5  0  5222 xmpp1.example.com.
_xmpp-client._tcp.example.com. 60 IN SRV 10 60 5222 xmpp2.example.com.
_xmpp-client._tcp.example.com. 60 IN SRV 10 20 5222 xmpp3.example.com.
```

A client wanting to communicate with this service first tries
`xmpp1.example.com:5222` (the record with the lowest priority), then the
other two. Between those, `xmpp2` has three times the weight of `xmpp3`, so
it is more likely, but not certain, to be tried before it.

[`order`] implements that selection: records are grouped by ascending
priority, and within a group each position is filled by a weighted random
draw over the records not yet placed.

# Resolvers and clients

Lookups go through the [`SrvResolver`] trait. A resolver is an ordinary value
passed to whoever needs it; [`StaticResolver`] answers from a fixed table and
the `hickory` feature implements the trait for
[`hickory_resolver::Resolver`].

[`SrvClient`] ties the pieces together: it resolves a service, orders its
targets and runs a connection attempt against each in turn, falling back to
a fixed target (usually the bare domain) when DNS has nothing to offer.

[`SrvResolver`]: resolver::SrvResolver
[`StaticResolver`]: resolver::StaticResolver
*/

mod client;
pub use client::{Error, SrvClient};

pub mod order;
pub use order::{order, ZeroWeight};

mod record;
pub use record::{InvalidRecord, Record, SrvRecord, Target};

pub mod resolver;
