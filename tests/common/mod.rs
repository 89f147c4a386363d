//! Helpers shared by the integration tests.

use resolv_compat::base::iana::{Class, Rtype};
use resolv_compat::resolv::{
    NativeError, NativeQuery, NativeRecord, NativeRequest, QueryFlags,
    StaticConf,
};
use std::cell::RefCell;
use std::net::{IpAddr, SocketAddr};

//------------ Logging -------------------------------------------------------

/// Initializes tracing based logging.
///
/// Override the level with the `RUST_LOG` environment variable, e.g.,
/// `RUST_LOG=trace`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}

//------------ Configuration -------------------------------------------------

/// Returns a configuration with `count` servers and the given domain.
pub fn conf(count: usize, domain: &str) -> StaticConf {
    StaticConf::new(
        (0..count)
            .map(|i| IpAddr::from([192, 0, 2, 10 + i as u8]))
            .collect(),
        domain,
    )
}

//------------ Scripted ------------------------------------------------------

/// A request as seen by the scripted facility.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeenRequest {
    pub name: String,
    pub class: Class,
    pub rtype: Rtype,
    pub flags: QueryFlags,
    pub servers: Option<Vec<SocketAddr>>,
}

/// A native facility giving the same answer to every query.
///
/// All requests are recorded.
pub struct Scripted {
    answer: Result<Vec<NativeRecord>, NativeError>,
    seen: RefCell<Vec<SeenRequest>>,
}

impl Scripted {
    pub fn answering(records: Vec<NativeRecord>) -> Self {
        Scripted {
            answer: Ok(records),
            seen: Default::default(),
        }
    }

    pub fn failing(err: NativeError) -> Self {
        Scripted {
            answer: Err(err),
            seen: Default::default(),
        }
    }

    /// Returns all requests seen so far.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.borrow().clone()
    }
}

impl NativeQuery for Scripted {
    fn query(
        &self,
        request: &NativeRequest,
    ) -> Result<Vec<NativeRecord>, NativeError> {
        self.seen.borrow_mut().push(SeenRequest {
            name: request.name.into(),
            class: request.class,
            rtype: request.rtype,
            flags: request.flags,
            servers: request.servers.map(Vec::from),
        });
        self.answer.clone()
    }
}
