//! Flattening native records into an RRset.
//!
//! The legacy `getrrsetbyname` call returns the records of one type for a
//! name together with their signatures as an [`RrsetInfo`]. The record data
//! of each category is packed into a single contiguous block, with each
//! entry referencing its slice of that block.
//!
//! The result is assembled in two passes over the native records. The
//! first pass counts the records and sums up their data lengths, the second
//! pass allocates exactly once per category and copies the data over.

use crate::base::iana::{Class, Rtype};
use crate::base::wire::SliceTarget;
use bytes::Bytes;
use core::fmt;
use std::string::String;
use std::vec::Vec;
use tracing::{debug, trace};

use super::native::{NativeError, NativeRecord};
use super::options::ResOptions;

/// The flag marking an RRset as validated.
pub const RRSET_VALIDATED: u32 = 1;

//------------ RdataInfo -----------------------------------------------------

/// The data of a single record or signature of an RRset.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RdataInfo {
    /// The length of the data in octets.
    pub length: u32,

    /// The data in wire format.
    ///
    /// This is a slice of the RRset’s block for the entry’s category.
    pub data: Bytes,
}

//------------ RrsetInfo -----------------------------------------------------

/// The records of one type for a name together with their signatures.
///
/// If there are no records of the requested type, both entry lists are
/// empty, nothing has been allocated for them, and the TTL is
/// `u32::MAX`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RrsetInfo {
    flags: u32,
    class: Class,
    rtype: Rtype,
    ttl: u32,
    name: String,
    rdatas: Vec<RdataInfo>,
    sigs: Vec<RdataInfo>,
}

impl RrsetInfo {
    /// Assembles an RRset from the records returned by a query.
    ///
    /// The records are consumed and released before the function returns,
    /// whether it succeeds or not. `name` is the queried name which is
    /// replaced by the target of the last CNAME record if there is one.
    pub fn assemble(
        name: &str,
        class: Class,
        rtype: Rtype,
        options: ResOptions,
        records: Vec<NativeRecord>,
    ) -> Result<Self, RrsetError> {
        let res = Self::assemble_slice(name, class, rtype, options, &records);
        drop(records);
        res
    }

    fn assemble_slice(
        name: &str,
        class: Class,
        rtype: Rtype,
        options: ResOptions,
        records: &[NativeRecord],
    ) -> Result<Self, RrsetError> {
        let mut rdatas = Packer::default();
        let mut sigs = Packer::default();
        let mut ttl = u32::MAX;
        let mut cname = None;

        // Pass 1: count and size.
        for record in records {
            match Category::of(record, rtype) {
                Some(Category::Rdata) => {
                    rdatas.count(record)?;
                    ttl = ttl.min(record.ttl);
                }
                Some(Category::Sig) => sigs.count(record)?,
                None => {}
            }
            if record.rtype == Rtype::CNAME {
                match record.data.to_name() {
                    Ok(target) => cname = Some(target),
                    Err(err) => {
                        debug!(owner = %record.name, "bad CNAME: {}", err);
                        return Err(RrsetError::Fail);
                    }
                }
            }
        }

        // Pass 2: allocate and copy.
        let mut rdatas = rdatas.allocate()?;
        let mut sigs = sigs.allocate()?;
        for record in records {
            match Category::of(record, rtype) {
                Some(Category::Rdata) => rdatas.push(record)?,
                Some(Category::Sig) => sigs.push(record)?,
                None => {}
            }
        }

        let res = RrsetInfo {
            flags: if options.insecure() {
                0
            } else {
                RRSET_VALIDATED
            },
            class,
            rtype,
            ttl,
            name: match cname {
                Some(target) => target.into_owned(),
                None => String::from(name),
            },
            rdatas: rdatas.finish(),
            sigs: sigs.finish(),
        };
        trace!(
            owner = %res.name,
            rdatas = res.rdatas.len(),
            sigs = res.sigs.len(),
            "assembled rrset"
        );
        Ok(res)
    }

    /// Releases the RRset.
    ///
    /// This is the same as dropping it.
    pub fn release(self) {}
}

/// # Field Access
///
impl RrsetInfo {
    /// Returns the flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Returns whether the RRset is flagged as validated.
    pub fn is_validated(&self) -> bool {
        self.flags & RRSET_VALIDATED != 0
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns the smallest TTL of the records.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the owner name of the records.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of records.
    pub fn answer_count(&self) -> usize {
        self.rdatas.len()
    }

    /// Returns the number of signatures.
    pub fn signature_count(&self) -> usize {
        self.sigs.len()
    }

    /// Returns the record data entries in response order.
    pub fn rdatas(&self) -> &[RdataInfo] {
        &self.rdatas
    }

    /// Returns the signature entries in response order.
    pub fn sigs(&self) -> &[RdataInfo] {
        &self.sigs
    }
}

/// Releases an RRset returned by a lookup.
///
/// Passing `None` is fine and does nothing.
pub fn free_rrset(rrset: Option<RrsetInfo>) {
    if let Some(rrset) = rrset {
        rrset.release()
    }
}

//------------ Category ------------------------------------------------------

/// The entry list a record ends up in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Category {
    Rdata,
    Sig,
}

impl Category {
    /// Returns the category of a record for a query of type `rtype`.
    ///
    /// If the requested type is a signature type itself, the records
    /// count as data rather than signatures.
    fn of(record: &NativeRecord, rtype: Rtype) -> Option<Self> {
        if record.rtype == rtype {
            Some(Category::Rdata)
        } else if record.rtype.is_signature() {
            Some(Category::Sig)
        } else {
            None
        }
    }
}

//------------ Packer --------------------------------------------------------

/// Collects the sizes of one category during the first pass.
#[derive(Clone, Copy, Debug, Default)]
struct Packer {
    count: usize,
    len: usize,
}

impl Packer {
    fn count(&mut self, record: &NativeRecord) -> Result<(), RrsetError> {
        let len = record.data.wire_len().map_err(|_| RrsetError::Fail)?;
        self.count += 1;
        self.len = self.len.checked_add(len).ok_or(RrsetError::NoMemory)?;
        Ok(())
    }

    fn allocate(self) -> Result<PackedBlock, RrsetError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(self.count)
            .map_err(|_| RrsetError::NoMemory)?;
        let mut block = Vec::new();
        block
            .try_reserve_exact(self.len)
            .map_err(|_| RrsetError::NoMemory)?;
        block.resize(self.len, 0);
        Ok(PackedBlock {
            entries,
            block,
            pos: 0,
        })
    }
}

//------------ PackedBlock ---------------------------------------------------

/// The allocated storage of one category during the second pass.
#[derive(Debug)]
struct PackedBlock {
    /// The entries with their lengths set but their data still empty.
    entries: Vec<RdataInfo>,

    /// The block all data is copied into.
    block: Vec<u8>,

    /// The end of the data copied so far.
    pos: usize,
}

impl PackedBlock {
    fn push(&mut self, record: &NativeRecord) -> Result<(), RrsetError> {
        let mut target = SliceTarget::new(&mut self.block[self.pos..]);
        record
            .data
            .compose(&mut target)
            .map_err(|_| RrsetError::Fail)?;
        let len = target.len();
        self.pos += len;
        self.entries.push(RdataInfo {
            length: u32::try_from(len).map_err(|_| RrsetError::Fail)?,
            data: Bytes::new(),
        });
        Ok(())
    }

    fn finish(self) -> Vec<RdataInfo> {
        let PackedBlock {
            mut entries, block, ..
        } = self;
        let block = Bytes::from(block);
        let mut start = 0;
        for entry in &mut entries {
            let end = start + entry.length as usize;
            entry.data = block.slice(start..end);
            start = end;
        }
        entries
    }
}

//------------ RrsetError ----------------------------------------------------

/// An RRset lookup failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RrsetError {
    /// Memory for the result could not be allocated.
    NoMemory,

    /// The lookup failed for some other reason.
    Fail,

    /// An argument was unacceptable.
    Invalid,

    /// The name does not exist.
    NoName,

    /// The name has no records of the requested type.
    NoData,
}

impl RrsetError {
    /// The legacy code for success.
    pub const SUCCESS: i32 = 0;

    /// Returns the legacy error code.
    pub fn code(self) -> i32 {
        match self {
            RrsetError::NoMemory => 12,
            RrsetError::Fail => 11,
            RrsetError::Invalid => 22,
            RrsetError::NoName => 2,
            RrsetError::NoData => 61,
        }
    }
}

impl From<NativeError> for RrsetError {
    fn from(error: NativeError) -> Self {
        match error {
            NativeError::NameError => RrsetError::NoName,
            NativeError::NoData => RrsetError::NoData,
            NativeError::Other(_) => RrsetError::Fail,
        }
    }
}

impl fmt::Display for RrsetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RrsetError::NoMemory => f.write_str("out of memory"),
            RrsetError::Fail => f.write_str("lookup failed"),
            RrsetError::Invalid => f.write_str("invalid argument"),
            RrsetError::NoName => f.write_str("no such name"),
            RrsetError::NoData => f.write_str("no data of requested type"),
        }
    }
}

impl std::error::Error for RrsetError {}

//============ Testing ======================================================
