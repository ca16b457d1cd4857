//! Client configuration.
//!
//! The defaults reproduce the plain blocking client: hosts are resolved only
//! when the URL carries an explicit port, and neither connecting nor reading
//! has a deadline. A server that never closes its side keeps `execute`
//! blocked until one of the timeouts below is set.

use std::time::Duration;

use crate::target::ResolvePolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub resolve_policy: ResolvePolicy,
    pub connect_timeout: Option<Duration>,
    /// Applied to each individual read, not to the response as a whole.
    pub read_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Apply the same deadline to connecting and to every read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = policy;
        self
    }
}
