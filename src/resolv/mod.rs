//! The legacy resolver interface.
//!
//! This module provides the calls of the traditional BIND resolver library
//! – `res_init`, `res_search`, `res_query`, `res_querydomain`,
//! `res_mkquery`, `res_send`, and their explicit-state `res_n*` siblings –
//! as well as `getrrsetbyname` and `freerrset`. None of them talk to name
//! servers directly. Instead, queries are handed to a native query facility
//! implementing the [`NativeQuery`] trait and the records it returns are
//! turned back into what legacy callers expect.
//!
//! The entry point is the [`Resolver`] type which combines the native
//! facility with a [`ConfigSource`] from which resolver states are
//! initialized. The state itself is a [`ResState`]: each thread has one of
//! its own which the fixed-state calls use, while the explicit-state calls
//! take one from the caller.
//!
//! How the legacy options affect queries is described by the translation
//! table in the [options] module.

pub use self::conf::{ConfigSource, ResolvConfFile, StaticConf};
pub use self::error::{herror, herror_to, Error, Result};
pub use self::native::{
    NativeError, NativeQuery, NativeRecord, NativeRequest, RecordData,
    Section,
};
pub use self::options::{translate, Policy, QueryFlags, ResOptions};
pub use self::query::{join_name, Resolver};
pub use self::random::random_id;
pub use self::rrset::{free_rrset, RdataInfo, RrsetError, RrsetInfo};
pub use self::servers::ServerList;
pub use self::state::ResState;

pub mod conf;
pub mod error;
pub mod native;
pub mod options;
pub mod query;
pub mod random;
pub mod rrset;
pub mod servers;
pub mod state;
