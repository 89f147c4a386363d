//! Selecting the name servers for a query.

use super::conf::MAXNS;
use super::options::Policy;
use super::state::ResState;
use core::ops;
use smallvec::SmallVec;
use std::net::SocketAddr;

//------------ ServerList ----------------------------------------------------

/// The ordered list of name servers to use for a single query.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServerList {
    /// The servers in the order they should be tried.
    servers: SmallVec<[SocketAddr; MAXNS]>,

    /// Whether the policy demands that the list is handed to the facility.
    custom: bool,
}

impl ServerList {
    /// Builds the server list for the next query made with `state`.
    ///
    /// With the primary policy only the first server is used. With the
    /// rotate policy, the state’s rotation cursor is advanced first and the
    /// list starts at the new cursor, continuing circularly. This must be
    /// called at most once per query.
    pub fn build(state: &mut ResState, policy: &Policy) -> Self {
        let count = state.servers().len();
        let effective = if policy.primary { count.min(1) } else { count };
        let start = if policy.rotate {
            state.advance_rotation()
        } else {
            0
        };
        let servers = state.servers();
        ServerList {
            servers: (0..effective)
                .map(|i| servers[(start + i) % count])
                .collect(),
            custom: policy.custom_servers(),
        }
    }

    /// Returns the servers to hand to the native facility.
    ///
    /// Returns `None` if the facility should use its own server selection,
    /// either because the policy doesn’t require a custom list or because
    /// there are no servers to select from.
    pub fn as_override(&self) -> Option<&[SocketAddr]> {
        if self.custom && !self.servers.is_empty() {
            Some(&self.servers)
        } else {
            None
        }
    }
}

impl ops::Deref for ServerList {
    type Target = [SocketAddr];

    fn deref(&self) -> &Self::Target {
        self.servers.as_ref()
    }
}

impl<'a> IntoIterator for &'a ServerList {
    type Item = &'a SocketAddr;
    type IntoIter = core::slice::Iter<'a, SocketAddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}

//============ Testing ======================================================
