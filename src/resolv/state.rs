//! The resolver state.
//!
//! Every thread owns one [`ResState`] which the fixed-state calls operate
//! on. It can be reached through [`ResState::with_current`]. The
//! explicit-state calls take a state provided by the caller instead.

use super::conf::{
    ConfigSource, MAXDNAME, MAXNS, NAMESERVER_PORT, RES_DFLRETRY,
    RES_MAXNDOTS, RES_TIMEOUT,
};
use super::options::ResOptions;
use super::random::random_id;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::net::SocketAddr;
use std::string::String;
use tracing::{debug, warn};

//------------ ResState ------------------------------------------------------

/// The state of a legacy resolver.
///
/// A state created via `Default` is not initialized. It will be initialized
/// implicitly by the first query made with it unless [`init`][Self::init]
/// is called before.
#[derive(Clone, Debug, Default)]
pub struct ResState {
    /// The interval between query attempts in seconds.
    ///
    /// This is kept for compatibility but not currently used.
    pub retrans: u32,

    /// The number of query attempts.
    ///
    /// This is kept for compatibility but not currently used.
    pub retry: u32,

    /// The resolver options.
    pub options: ResOptions,

    /// The number of dots a name needs before it is tried as is first.
    ndots: u8,

    /// The name servers in order of preference.
    servers: SmallVec<[SocketAddr; MAXNS]>,

    /// The index of the server a rotating query starts with.
    rotation: u8,

    /// The default domain in presentation format.
    default_domain: String,

    /// The transaction identifier of the most recent query.
    id: u16,
}

impl ResState {
    /// (Re-)initializes the state from a configuration source.
    ///
    /// All previous content is discarded. Failing to read the configuration
    /// isn’t fatal: the state ends up without servers or without a default
    /// domain, respectively.
    pub fn init<C: ConfigSource + ?Sized>(&mut self, conf: &C) {
        *self = ResState::default();
        self.retrans = RES_TIMEOUT;
        self.retry = RES_DFLRETRY;
        self.options = ResOptions::INIT | ResOptions::DEFAULT;
        self.ndots = 1;
        self.id = random_id();

        match conf.name_servers() {
            Ok(servers) => {
                self.servers.extend(
                    servers
                        .into_iter()
                        .take(MAXNS)
                        .map(|addr| SocketAddr::new(addr, NAMESERVER_PORT)),
                );
            }
            Err(err) => {
                warn!("failed to read name servers: {}", err);
            }
        }

        match conf.primary_domain() {
            Ok(domain) if domain.len() < MAXDNAME => {
                self.default_domain = domain;
            }
            Ok(domain) => {
                warn!("ignoring overlong domain of {} octets", domain.len());
            }
            Err(err) => {
                warn!("failed to read primary domain: {}", err);
            }
        }

        debug!(
            servers = self.servers.len(),
            domain = %self.default_domain,
            "resolver state initialized"
        );
    }

    /// Initializes the state unless it is marked as initialized already.
    ///
    /// Returns whether initialization happened.
    pub fn ensure_init<C: ConfigSource + ?Sized>(&mut self, conf: &C) -> bool {
        if self.options.init() {
            false
        } else {
            self.init(conf);
            true
        }
    }

    /// Runs an operation on the current thread’s state.
    ///
    /// The operation must not try to access the current thread’s state
    /// itself.
    pub fn with_current<F, R>(op: F) -> R
    where
        F: FnOnce(&mut ResState) -> R,
    {
        CURRENT.with(|state| op(&mut *state.borrow_mut()))
    }
}

/// # Field Access
///
impl ResState {
    /// Returns whether the state is marked as initialized.
    pub fn is_init(&self) -> bool {
        self.options.init()
    }

    /// Returns the number of dots a name needs to be tried as is first.
    pub fn ndots(&self) -> u8 {
        self.ndots
    }

    /// Sets the `ndots` threshold.
    ///
    /// The value is capped at [`RES_MAXNDOTS`].
    pub fn set_ndots(&mut self, ndots: u8) {
        self.ndots = ndots.min(RES_MAXNDOTS)
    }

    /// Returns the configured name servers.
    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// Replaces the configured name servers.
    ///
    /// Only the first [`MAXNS`] servers are kept. The rotation starts over.
    pub fn set_servers<I>(&mut self, servers: I)
    where
        I: IntoIterator<Item = SocketAddr>,
    {
        self.servers.clear();
        self.servers.extend(servers.into_iter().take(MAXNS));
        self.rotation = 0;
    }

    /// Returns the default domain.
    ///
    /// The domain is empty if there is none.
    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// Returns the transaction identifier of the most recent query.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Draws a fresh transaction identifier and returns it.
    pub fn next_id(&mut self) -> u16 {
        self.id = random_id();
        self.id
    }

    /// Returns the current rotation cursor.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Moves the rotation cursor to the next server and returns it.
    ///
    /// Without servers, the cursor stays at zero.
    pub fn advance_rotation(&mut self) -> usize {
        let count = self.servers.len();
        if count == 0 {
            self.rotation = 0;
            return 0;
        }
        let next = (usize::from(self.rotation) + 1) % count;
        // MAXNS is well below 256.
        self.rotation = next as u8;
        next
    }
}

//------------ The thread’s state ------------------------------------------

thread_local! {
    static CURRENT: RefCell<ResState> = RefCell::new(ResState::default());
}

//============ Testing ======================================================
