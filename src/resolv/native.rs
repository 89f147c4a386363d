//! The native query facility.
//!
//! The compatibility layer does not talk to name servers itself. Instead,
//! it hands each query to a native facility, represented by the
//! [`NativeQuery`] trait, and converts the records it returns into what the
//! legacy interface expects.

use crate::base::iana::{Class, Rtype};
use crate::base::wire::{
    compose_dname, dname_from_wire, dname_wire_len, ComposeError, DnameError,
};
use crate::base::Compose;
use bytes::Bytes;
use core::fmt;
use octseq::builder::OctetsBuilder;
use std::borrow::Cow;
use std::net::SocketAddr;
use std::string::String;
use std::vec::Vec;

use super::options::QueryFlags;

//------------ NativeQuery ---------------------------------------------------

/// A facility answering DNS queries.
pub trait NativeQuery {
    /// Performs a query and returns all records of the response.
    ///
    /// The records are returned in the order of the response message.
    fn query(
        &self,
        request: &NativeRequest,
    ) -> Result<Vec<NativeRecord>, NativeError>;
}

impl<'a, N: NativeQuery + ?Sized> NativeQuery for &'a N {
    fn query(
        &self,
        request: &NativeRequest,
    ) -> Result<Vec<NativeRecord>, NativeError> {
        (*self).query(request)
    }
}

//------------ NativeRequest -------------------------------------------------

/// A query handed to the native facility.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NativeRequest<'a> {
    /// The name to query for in presentation format.
    pub name: &'a str,

    /// The class to query for.
    pub class: Class,

    /// The record type to query for.
    pub rtype: Rtype,

    /// The flags translated from the resolver options.
    pub flags: QueryFlags,

    /// The servers to use instead of the facility’s own selection.
    pub servers: Option<&'a [SocketAddr]>,
}

//------------ Section -------------------------------------------------------

/// The section of the response a record was found in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl Section {
    /// All sections in message order.
    pub const ALL: [Section; 3] =
        [Section::Answer, Section::Authority, Section::Additional];
}

//------------ NativeRecord --------------------------------------------------

/// A resource record as returned by the native facility.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NativeRecord {
    /// The owner name in presentation format.
    pub name: String,

    /// The record type.
    pub rtype: Rtype,

    /// The record class.
    pub class: Class,

    /// The time to live in seconds.
    pub ttl: u32,

    /// The section of the response the record was found in.
    pub section: Section,

    /// The record data.
    pub data: RecordData,
}

impl NativeRecord {
    /// Creates a new record in the answer section.
    pub fn answer(
        name: impl Into<String>,
        rtype: Rtype,
        ttl: u32,
        data: RecordData,
    ) -> Self {
        NativeRecord {
            name: name.into(),
            rtype,
            class: Class::IN,
            ttl,
            section: Section::Answer,
            data,
        }
    }

    /// Returns the record with the section replaced.
    pub fn in_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    /// Appends the record in uncompressed wire format.
    pub fn compose<Target: OctetsBuilder + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        let rdlen = u16::try_from(self.data.wire_len()?)
            .map_err(|_| ComposeError::LongData)?;
        compose_dname(&self.name, target)?;
        self.rtype.compose(target).map_err(|_| ComposeError::ShortBuf)?;
        self.class.compose(target).map_err(|_| ComposeError::ShortBuf)?;
        self.ttl.compose(target).map_err(|_| ComposeError::ShortBuf)?;
        rdlen.compose(target).map_err(|_| ComposeError::ShortBuf)?;
        self.data.compose(target)
    }
}

//------------ RecordData ----------------------------------------------------

/// The data of a record.
///
/// The facility hands out record data that contains a single domain name,
/// such as that of CNAME, NS, or PTR records, as the name. Everything else
/// comes as raw octets in wire format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordData {
    /// Raw record data.
    Raw(Bytes),

    /// A domain name in presentation format.
    Name(String),
}

impl RecordData {
    /// Creates raw record data from a slice.
    pub fn raw(data: &[u8]) -> Self {
        RecordData::Raw(Bytes::copy_from_slice(data))
    }

    /// Creates record data holding a domain name.
    pub fn name(name: impl Into<String>) -> Self {
        RecordData::Name(name.into())
    }

    /// Returns the single domain name the data consists of.
    ///
    /// Raw data must hold exactly one uncompressed name in wire format.
    pub fn to_name(&self) -> Result<Cow<str>, DnameError> {
        match *self {
            RecordData::Name(ref name) => Ok(Cow::Borrowed(name)),
            RecordData::Raw(ref data) => dname_from_wire(data).map(Cow::Owned),
        }
    }

    /// Returns the length of the data in wire format.
    pub fn wire_len(&self) -> Result<usize, ComposeError> {
        match *self {
            RecordData::Raw(ref data) => Ok(data.len()),
            RecordData::Name(ref name) => Ok(dname_wire_len(name)?),
        }
    }

    /// Appends the data in wire format.
    ///
    /// Domain names are written uncompressed.
    pub fn compose<Target: OctetsBuilder + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), ComposeError> {
        match *self {
            RecordData::Raw(ref data) => target
                .append_slice(data.as_ref())
                .map_err(|_| ComposeError::ShortBuf),
            RecordData::Name(ref name) => compose_dname(name, target),
        }
    }
}

//------------ NativeError ---------------------------------------------------

/// The native facility failed to answer a query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NativeError {
    /// The queried name does not exist.
    NameError,

    /// The name exists but has no records of the queried type.
    NoData,

    /// Some other failure with the facility’s own error code.
    Other(i32),
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            NativeError::NameError => f.write_str("name does not exist"),
            NativeError::NoData => f.write_str("no data for name"),
            NativeError::Other(code) => {
                write!(f, "native query failed with code {}", code)
            }
        }
    }
}

impl std::error::Error for NativeError {}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::wire::SliceTarget;

    #[test]
    fn compose_raw_record() {
        let record = NativeRecord::answer(
            "a.example",
            Rtype::A,
            0x0102_0304,
            RecordData::raw(&[192, 0, 2, 1]),
        );
        let mut buf = [0u8; 64];
        let mut target = SliceTarget::new(&mut buf);
        record.compose(&mut target).unwrap();
        assert_eq!(
            target.as_ref(),
            b"\x01a\x07example\x00\
              \x00\x01\x00\x01\x01\x02\x03\x04\x00\x04\
              \xc0\x00\x02\x01"
        );
    }

    #[test]
    fn compose_name_record() {
        let record = NativeRecord::answer(
            "a.",
            Rtype::CNAME,
            60,
            RecordData::name("b.example."),
        );
        assert_eq!(record.data.to_name().unwrap(), "b.example.");
        assert_eq!(record.data.wire_len().unwrap(), 11);
        let mut buf = [0u8; 64];
        let mut target = SliceTarget::new(&mut buf);
        record.compose(&mut target).unwrap();
        assert_eq!(
            target.as_ref(),
            b"\x01a\x00\x00\x05\x00\x01\x00\x00\x00\x3c\x00\x0b\
              \x01b\x07example\x00"
        );
    }

    #[test]
    fn name_from_either_form() {
        assert_eq!(
            RecordData::name("good.test").to_name().unwrap(),
            "good.test"
        );
        assert_eq!(
            RecordData::raw(b"\x04good\x04test\x00").to_name().unwrap(),
            "good.test"
        );
        assert_eq!(
            RecordData::raw(&[192, 0, 2, 1]).to_name(),
            Err(DnameError::Malformed)
        );
    }

    #[test]
    fn compose_short_buf() {
        let record = NativeRecord::answer(
            "a.example",
            Rtype::A,
            10,
            RecordData::raw(&[192, 0, 2, 1]),
        );
        let mut buf = [0u8; 20];
        let mut target = SliceTarget::new(&mut buf);
        assert_eq!(record.compose(&mut target), Err(ComposeError::ShortBuf));
    }

    #[test]
    fn compose_long_data() {
        let record = NativeRecord::answer(
            "a.example",
            Rtype::TXT,
            10,
            RecordData::raw(&vec![0; usize::from(u16::MAX) + 1]),
        );
        let mut buf = [0u8; 64];
        let mut target = SliceTarget::new(&mut buf);
        assert_eq!(record.compose(&mut target), Err(ComposeError::LongData));
        assert!(target.is_empty());
    }
}
