//! The legacy resolver calls.
//!
//! A [`Resolver`] combines a native query facility with a configuration
//! source and provides the legacy call surface atop them. Each call comes in
//! two flavours: the explicit-state calls, named with a leading `n` as in
//! the C interface, operate on a [`ResState`] provided by the caller. The
//! fixed-state calls operate on the calling thread’s own state.
//!
//! A query translates the state’s options into native flags, selects the
//! name servers, and hands everything to the native facility. The records
//! it returns are then reassembled into a response message in wire format
//! in the caller’s buffer.

use crate::base::iana::{Class, Opcode, Rcode, Rtype};
use crate::base::wire::{compose_dname, dname_wire_len, SliceTarget};
use crate::base::{Compose, HeaderSection};
use octseq::builder::OctetsBuilder;
use std::string::String;
use std::vec::Vec;
use tracing::{debug, trace};

use super::conf::{ConfigSource, ResolvConfFile, MAXDNAME};
use super::error::{Error, Result};
use super::native::{
    NativeError, NativeQuery, NativeRecord, NativeRequest, Section,
};
use super::options::{translate, Policy};
use super::rrset::{RrsetError, RrsetInfo};
use super::servers::ServerList;
use super::state::ResState;

//------------ Resolver ------------------------------------------------------

/// The legacy resolver interface atop a native query facility.
///
/// The fixed-state methods borrow the calling thread’s state for the
/// duration of the call. The native facility must therefore not call back
/// into them.
#[derive(Clone, Debug, Default)]
pub struct Resolver<N, C = ResolvConfFile> {
    /// The facility performing the actual queries.
    native: N,

    /// Where states get their configuration from.
    conf: C,
}

impl<N, C> Resolver<N, C> {
    /// Creates a resolver from a native facility and configuration source.
    pub fn new(native: N, conf: C) -> Self {
        Resolver { native, conf }
    }

    /// Returns a reference to the native facility.
    pub fn native(&self) -> &N {
        &self.native
    }

    /// Returns a reference to the configuration source.
    pub fn conf(&self) -> &C {
        &self.conf
    }
}

/// # Explicit-State Calls
///
impl<N: NativeQuery, C: ConfigSource> Resolver<N, C> {
    /// Initializes `state` from the configuration source.
    ///
    /// This discards everything previously stored in the state.
    pub fn ninit(&self, state: &mut ResState) {
        state.init(&self.conf)
    }

    /// Queries for a name and writes the response into `answer`.
    ///
    /// The name is handed to the native facility as given. On success,
    /// returns the length of the response message.
    ///
    /// If the native facility fails, `answer` is left untouched. If
    /// `answer` is too short for the response, [`Error::ShortBuf`] is
    /// returned and `answer` contains whatever has been written so far.
    pub fn nquery(
        &self,
        state: &mut ResState,
        name: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::InvalidArgument);
        }
        dname_wire_len(name)?;
        let (records, policy) = self.native_query(state, name, class, rtype)?;
        compose_answer(
            state.id(),
            &policy,
            name,
            class,
            rtype,
            &records,
            answer,
        )
    }

    /// Queries for a name, trying the default domain if necessary.
    ///
    /// Absolute names, i.e., names ending in a dot, are queried as is.
    /// Other names are queried as is first. If that results in a name
    /// error, the name has fewer dots than the state’s `ndots`, one of the
    /// `DEFNAMES` or `DNSRCH` options is set, and there is a default
    /// domain, the query is repeated with the default domain appended.
    pub fn nsearch(
        &self,
        state: &mut ResState,
        name: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::InvalidArgument);
        }
        state.ensure_init(&self.conf);
        if name.ends_with('.') {
            return self.nquery(state, name, class, rtype, answer);
        }
        match self.nquery(state, name, class, rtype, answer) {
            Err(Error::Native(NativeError::NameError))
                if Self::may_append_domain(state, name) =>
            {
                let domain = String::from(state.default_domain());
                trace!(
                    qname = name,
                    domain = %domain,
                    "retrying with default domain"
                );
                self.nquerydomain(state, name, &domain, class, rtype, answer)
            }
            res => res,
        }
    }

    /// Queries for the concatenation of a name and a domain.
    ///
    /// If `domain` is empty, `name` is queried by itself. Otherwise, the
    /// two are joined with exactly one dot between them.
    pub fn nquerydomain(
        &self,
        state: &mut ResState,
        name: &str,
        domain: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        let name = join_name(name, domain)?;
        self.nquery(state, &name, class, rtype, answer)
    }

    /// Builds a query message.
    ///
    /// This is not implemented and always fails.
    #[allow(clippy::too_many_arguments)]
    pub fn nmkquery(
        &self,
        _state: &mut ResState,
        _op: Opcode,
        _name: &str,
        _class: Class,
        _rtype: Rtype,
        _data: Option<&[u8]>,
        _newrr: Option<&[u8]>,
        _buf: &mut [u8],
    ) -> Result<usize> {
        debug!("building query messages is not implemented");
        Err(Error::NotImplemented)
    }

    /// Sends a query message and receives the response.
    ///
    /// This is not implemented and always fails.
    pub fn nsend(
        &self,
        _state: &mut ResState,
        _msg: &[u8],
        _answer: &mut [u8],
    ) -> Result<usize> {
        debug!("sending raw messages is not implemented");
        Err(Error::NotImplemented)
    }

    /// Looks up the records of one type for a name and their signatures.
    ///
    /// No flags are currently defined, so `flags` must be zero.
    pub fn nget_rrset_by_name(
        &self,
        state: &mut ResState,
        hostname: &str,
        class: Class,
        rtype: Rtype,
        flags: u32,
    ) -> core::result::Result<RrsetInfo, RrsetError> {
        if flags != 0 || hostname.is_empty() {
            return Err(RrsetError::Invalid);
        }
        let (records, _) = self.native_query(state, hostname, class, rtype)?;
        RrsetInfo::assemble(hostname, class, rtype, state.options, records)
    }

    /// Performs a query through the native facility.
    ///
    /// Returns the records together with the policy the query was made
    /// under.
    fn native_query(
        &self,
        state: &mut ResState,
        name: &str,
        class: Class,
        rtype: Rtype,
    ) -> core::result::Result<(Vec<NativeRecord>, Policy), NativeError> {
        state.ensure_init(&self.conf);
        let (flags, policy) = translate(state.options);
        let servers = ServerList::build(state, &policy);
        let id = state.next_id();
        let request = NativeRequest {
            name,
            class,
            rtype,
            flags,
            servers: servers.as_override(),
        };
        trace!(
            qname = name,
            %rtype,
            id,
            flags = ?flags,
            servers = ?request.servers,
            "native query"
        );
        match self.native.query(&request) {
            Ok(records) => Ok((records, policy)),
            Err(err) => {
                debug!(qname = name, %rtype, "native query failed: {}", err);
                Err(err)
            }
        }
    }

    fn may_append_domain(state: &ResState, name: &str) -> bool {
        let dots = name.bytes().filter(|&ch| ch == b'.').count();
        dots < usize::from(state.ndots())
            && (state.options.default_names() || state.options.dn_search())
            && !state.default_domain().is_empty()
    }
}

/// # Fixed-State Calls
///
impl<N: NativeQuery, C: ConfigSource> Resolver<N, C> {
    /// Initializes the thread’s state.
    pub fn init(&self) {
        ResState::with_current(|state| self.ninit(state))
    }

    /// Searches for a name using the thread’s state.
    ///
    /// See [`nsearch`][Self::nsearch] for details.
    pub fn search(
        &self,
        name: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        ResState::with_current(|state| {
            self.nsearch(state, name, class, rtype, answer)
        })
    }

    /// Queries for a name using the thread’s state.
    ///
    /// See [`nquery`][Self::nquery] for details.
    pub fn query(
        &self,
        name: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        ResState::with_current(|state| {
            self.nquery(state, name, class, rtype, answer)
        })
    }

    /// Queries for a name within a domain using the thread’s state.
    pub fn querydomain(
        &self,
        name: &str,
        domain: &str,
        class: Class,
        rtype: Rtype,
        answer: &mut [u8],
    ) -> Result<usize> {
        ResState::with_current(|state| {
            self.nquerydomain(state, name, domain, class, rtype, answer)
        })
    }

    /// Builds a query message. Not implemented.
    #[allow(clippy::too_many_arguments)]
    pub fn mkquery(
        &self,
        op: Opcode,
        name: &str,
        class: Class,
        rtype: Rtype,
        data: Option<&[u8]>,
        newrr: Option<&[u8]>,
        buf: &mut [u8],
    ) -> Result<usize> {
        ResState::with_current(|state| {
            self.nmkquery(state, op, name, class, rtype, data, newrr, buf)
        })
    }

    /// Sends a query message. Not implemented.
    pub fn send(&self, msg: &[u8], answer: &mut [u8]) -> Result<usize> {
        ResState::with_current(|state| self.nsend(state, msg, answer))
    }

    /// Looks up an RRset using the thread’s state.
    pub fn get_rrset_by_name(
        &self,
        hostname: &str,
        class: Class,
        rtype: Rtype,
        flags: u32,
    ) -> core::result::Result<RrsetInfo, RrsetError> {
        ResState::with_current(|state| {
            self.nget_rrset_by_name(state, hostname, class, rtype, flags)
        })
    }
}

//------------ Helpers -------------------------------------------------------

/// Joins a name and a domain with exactly one dot in between.
///
/// If either is empty, the other one is returned unchanged. Fails if the
/// result is too long to be a domain name.
pub fn join_name(name: &str, domain: &str) -> Result<String> {
    let res = if domain.is_empty() {
        String::from(name)
    } else if name.is_empty() {
        String::from(domain)
    } else {
        match (name.ends_with('.'), domain.strip_prefix('.')) {
            (true, Some(domain)) => [name, domain].concat(),
            (false, None) => [name, ".", domain].concat(),
            _ => [name, domain].concat(),
        }
    };
    if res.len() >= MAXDNAME {
        return Err(Error::InvalidArgument);
    }
    Ok(res)
}

/// Writes a response message for the given records into `buf`.
///
/// Returns the length of the message.
fn compose_answer(
    id: u16,
    policy: &Policy,
    name: &str,
    class: Class,
    rtype: Rtype,
    records: &[NativeRecord],
    buf: &mut [u8],
) -> Result<usize> {
    let mut target = SliceTarget::new(buf);
    let mut section = HeaderSection::new();

    // The header goes in last when we know the counts.
    target.append_slice(&[0; HeaderSection::LEN])?;

    compose_dname(name, &mut target)?;
    rtype.compose(&mut target)?;
    class.compose(&mut target)?;
    section.counts_mut().set_qdcount(1);

    for which in Section::ALL {
        for record in records.iter().filter(|record| record.section == which)
        {
            record.compose(&mut target)?;
            let counts = section.counts_mut();
            match which {
                Section::Answer => counts.inc_ancount()?,
                Section::Authority => counts.inc_nscount()?,
                Section::Additional => counts.inc_arcount()?,
            }
        }
    }

    let header = section.header_mut();
    header.set_id(id);
    header.set_qr(true);
    header.set_opcode(Opcode::QUERY);
    header.set_rd(policy.recurse);
    header.set_rcode(Rcode::NOERROR);
    let len = target.len();
    section.compose(&mut SliceTarget::new(&mut buf[..HeaderSection::LEN]))?;
    Ok(len)
}

//============ Testing ======================================================
