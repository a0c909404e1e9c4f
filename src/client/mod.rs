//! Clients based on SRV lookups.

use crate::{
    order::{order_in_place, ZeroWeight},
    resolver::SrvResolver,
    SrvRecord, Target,
};
use arc_swap::ArcSwapOption;
use std::{fmt::Debug, future::Future, sync::Arc};
use url::Host;

/// Errors encountered by a [`SrvClient`].
#[derive(Debug, thiserror::Error)]
pub enum Error<Lookup: Debug> {
    /// SRV lookup errors
    #[error("SRV lookup error")]
    Lookup(Lookup),
    /// Produced when SRV records exist but none of them point at an allowed host
    #[error("no SRV targets to use")]
    NoTargets,
}

/// Client for connecting to a service located by SRV records, trying each
/// target in turn.
///
/// # Usage
///
/// After being created by [`SrvClient::new`] or [`SrvClient::new_with_resolver`],
/// connection attempts are made with [`execute`], which walks the ordered
/// targets and falls back to a fixed target (usually the bare domain on the
/// protocol's default port) when DNS has nothing to offer.
///
/// ## DNS Resolvers
///
/// The resolver used to lookup SRV records is determined by a client's
/// [`SrvResolver`], and can be set with [`SrvClient::resolver`].
///
/// ## Affinity
///
/// By default a client remembers the last target that worked and tries it
/// first next time, as long as DNS still lists it. See [`SrvClient::affinity`].
///
/// [`execute`]: SrvClient::execute()
#[derive(Debug)]
pub struct SrvClient<Resolver> {
    srv: String,
    fallback: Target,
    allowed_suffixes: Option<Vec<Host>>,
    resolver: Resolver,
    zero_weight: ZeroWeight,
    affinity: bool,
    last_success: ArcSwapOption<Target>,
}

impl<Resolver: Default> SrvClient<Resolver> {
    /// Creates a new client for communicating with services located by `srv_name`.
    pub fn new(srv_name: impl ToString, fallback: Target) -> Self {
        Self::new_with_resolver(srv_name, fallback, Resolver::default())
    }
}

impl<Resolver> SrvClient<Resolver> {
    /// Creates a new client for communicating with services located by `srv_name`.
    pub fn new_with_resolver(srv_name: impl ToString, fallback: Target, resolver: Resolver) -> Self {
        Self {
            srv: srv_name.to_string(),
            fallback,
            allowed_suffixes: None,
            resolver,
            zero_weight: ZeroWeight::default(),
            affinity: true,
            last_success: ArcSwapOption::empty(),
        }
    }

    /// Sets the SRV name of the client.
    pub fn srv_name(self, srv_name: impl ToString) -> Self {
        Self {
            srv: srv_name.to_string(),
            last_success: ArcSwapOption::empty(),
            ..self
        }
    }

    /// Sets the resolver of the client.
    pub fn resolver<R>(self, resolver: R) -> SrvClient<R> {
        SrvClient {
            resolver,
            srv: self.srv,
            fallback: self.fallback,
            allowed_suffixes: self.allowed_suffixes,
            zero_weight: self.zero_weight,
            affinity: self.affinity,
            last_success: ArcSwapOption::empty(),
        }
    }

    /// Sets how zero-weight records take part in target ordering.
    pub fn zero_weight(self, zero_weight: ZeroWeight) -> Self {
        Self {
            zero_weight,
            ..self
        }
    }

    /// Restricts targets to hosts equal to, or under, one of `suffixes`.
    pub fn allowed_suffixes(self, suffixes: Vec<Host>) -> Self {
        Self {
            allowed_suffixes: Some(suffixes),
            ..self
        }
    }

    /// Enables or disables trying the last successful target first.
    pub fn affinity(self, affinity: bool) -> Self {
        Self {
            affinity,
            last_success: ArcSwapOption::empty(),
            ..self
        }
    }

    /// Target used when the SRV lookup fails or yields nothing.
    pub fn fallback(&self) -> &Target {
        &self.fallback
    }

    fn allowed(&self, target: &Target) -> bool {
        let Some(allowed_suffixes) = &self.allowed_suffixes else {
            return true;
        };

        let allow = match Host::parse(target.host()) {
            Err(_) => false,
            Ok(Host::Domain(candidate)) => allowed_suffixes.iter().any(|allowed| match allowed {
                Host::Domain(suffix) => {
                    let suffix = suffix.trim_end_matches('.');
                    candidate == suffix
                        || candidate
                            .strip_suffix(suffix)
                            .is_some_and(|rest| rest.ends_with('.'))
                }
                _ => false,
            }),
            Ok(ip) => allowed_suffixes.contains(&ip),
        };

        if !allow {
            #[cfg(feature = "log")]
            tracing::trace!(candidate = %target, "Rejecting SRV target because it is not allowed by the allowed suffixes");
        }

        allow
    }

    /// Moves the last successful target to the front if it is still offered.
    fn apply_affinity(&self, targets: &mut [Target]) {
        if !self.affinity {
            return;
        }
        let last = self.last_success.load();
        if let Some(idx) = last
            .as_deref()
            .and_then(|last| targets.iter().position(|target| target == last))
        {
            targets[..=idx].rotate_right(1);
        }
    }

    fn note_success(&self, target: &Target) {
        if self.affinity {
            self.last_success.store(Some(Arc::new(target.clone())));
        }
    }

    fn note_failure(&self, target: &Target) {
        if self.last_success.load().as_deref() == Some(target) {
            self.last_success.store(None);
        }
    }
}

impl<Resolver: SrvResolver> SrvClient<Resolver> {
    /// Gets a fresh set of SRV records from a client's DNS resolver and turns
    /// them into connection targets, in the order they should be tried.
    ///
    /// A service without SRV records yields an empty list. [`Error::NoTargets`]
    /// is returned only when records exist but every one was disallowed.
    pub async fn get_targets(&self) -> Result<Vec<Target>, Error<Resolver::Error>> {
        let mut records = self
            .resolver
            .get_srv_records_unordered(&self.srv)
            .await
            .map_err(Error::Lookup)?;
        order_in_place(&mut records, self.zero_weight, rand::rng());

        let targets = records
            .iter()
            .map(|record| record.to_target())
            .filter(|target| self.allowed(target))
            .collect::<Vec<_>>();

        if targets.is_empty() && !records.is_empty() {
            return Err(Error::NoTargets);
        }
        Ok(targets)
    }

    /// Performs an operation on a client's SRV targets, producing the first
    /// successful result. When the lookup fails, finds nothing usable, or every
    /// target fails, the operation is run once more against the fallback
    /// target and its result is returned.
    pub async fn execute<T, E, Fut>(&self, func: impl FnMut(Target) -> Fut) -> Result<T, E>
    where
        E: std::error::Error,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut func = func;
        let mut targets = match self.get_targets().await {
            Ok(targets) if !targets.is_empty() => targets,
            Ok(_) => {
                #[cfg(feature = "log")]
                tracing::debug!(srv = %self.srv, "No SRV records, using fallback");
                return func(self.fallback.clone()).await;
            }
            Err(e) => {
                #[cfg(feature = "log")]
                tracing::debug!(%e, srv = %self.srv, "SRV lookup failed, using fallback");
                return func(self.fallback.clone()).await;
            }
        };
        self.apply_affinity(&mut targets);

        for candidate in targets {
            match func(candidate.clone()).await {
                Ok(res) => {
                    #[cfg(feature = "log")]
                    tracing::info!(addr = %candidate, "execution attempt succeeded");
                    self.note_success(&candidate);
                    return Ok(res);
                }
                Err(err) => {
                    #[cfg(feature = "log")]
                    tracing::info!(addr = %candidate, error = %err, "execution attempt failed");
                    self.note_failure(&candidate);
                }
            }
        }

        func(self.fallback.clone()).await
    }
}
