//! Creating data in wire format.
//!
//! Everything in here writes in network byte order. Targets are octets
//! builders as defined by the `octseq` crate. Since the legacy interface
//! hands us a fixed size buffer, [`SliceTarget`] provides such a builder
//! atop a mutable slice that fails with [`ShortBuf`] once the slice is
//! exhausted.

use core::fmt;
use octseq::builder::{OctetsBuilder, ShortBuf};
use std::string::String;

/// The maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// The maximum length of an uncompressed domain name in wire format.
pub const MAX_DNAME_LEN: usize = 255;

//------------ Compose -------------------------------------------------------

/// A type that can be appended to an octets builder in wire format.
pub trait Compose {
    fn compose<Target: OctetsBuilder + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), Target::AppendError>;
}

impl<'a, T: Compose + ?Sized> Compose for &'a T {
    fn compose<Target: OctetsBuilder + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), Target::AppendError> {
        (*self).compose(target)
    }
}

impl Compose for u8 {
    fn compose<Target: OctetsBuilder + ?Sized>(
        &self,
        target: &mut Target,
    ) -> Result<(), Target::AppendError> {
        target.append_slice(&[*self])
    }
}

macro_rules! compose_to_be_bytes {
    ( $type:ident ) => {
        impl Compose for $type {
            fn compose<Target: OctetsBuilder + ?Sized>(
                &self,
                target: &mut Target,
            ) -> Result<(), Target::AppendError> {
                target.append_slice(&self.to_be_bytes())
            }
        }
    };
}

compose_to_be_bytes!(u16);
compose_to_be_bytes!(u32);

//------------ SliceTarget ---------------------------------------------------

/// An octets builder atop a mutable octets slice.
///
/// The builder starts out empty and appends to the front of the slice.
/// Appending beyond the end of the slice fails with [`ShortBuf`] and leaves
/// the builder unchanged.
#[derive(Debug)]
pub struct SliceTarget<'a> {
    /// The underlying buffer.
    buf: &'a mut [u8],

    /// The number of octets already appended.
    len: usize,
}

impl<'a> SliceTarget<'a> {
    /// Creates a new, empty builder atop `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceTarget { buf, len: 0 }
    }

    /// Returns the number of octets appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

}

impl<'a> OctetsBuilder for SliceTarget<'a> {
    type AppendError = ShortBuf;

    fn append_slice(&mut self, slice: &[u8]) -> Result<(), Self::AppendError> {
        let end = match self.len.checked_add(slice.len()) {
            Some(end) if end <= self.buf.len() => end,
            _ => return Err(ShortBuf),
        };
        self.buf[self.len..end].copy_from_slice(slice);
        self.len = end;
        Ok(())
    }
}

impl<'a> AsRef<[u8]> for SliceTarget<'a> {
    fn as_ref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

//------------ Domain names --------------------------------------------------

/// Returns an iterator over the labels of a domain name in dotted form.
///
/// A single trailing dot is ignored, so both `"example.com"` and
/// `"example.com."` have two labels. The root name, written as `"."` or the
/// empty string, has none. Escape sequences are not supported.
fn labels(name: &str) -> impl Iterator<Item = &str> {
    let name = name.strip_suffix('.').unwrap_or(name);
    name.split('.').filter(move |_| !name.is_empty())
}

/// Returns the length of the uncompressed wire format of a domain name.
///
/// The function also checks that the name can be represented in wire
/// format at all.
pub fn dname_wire_len(name: &str) -> Result<usize, DnameError> {
    let mut len = 1; // the root label
    for label in labels(name) {
        if label.is_empty() {
            return Err(DnameError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DnameError::LongLabel);
        }
        len += label.len() + 1;
    }
    if len > MAX_DNAME_LEN {
        return Err(DnameError::LongName);
    }
    Ok(len)
}

/// Appends a domain name in uncompressed wire format.
///
/// The name is checked before anything is appended, so a malformed name
/// leaves the target untouched.
pub fn compose_dname<Target: OctetsBuilder + ?Sized>(
    name: &str,
    target: &mut Target,
) -> Result<(), ComposeError> {
    dname_wire_len(name)?;
    for label in labels(name) {
        (label.len() as u8)
            .compose(target)
            .map_err(|_| ComposeError::ShortBuf)?;
        target
            .append_slice(label.as_bytes())
            .map_err(|_| ComposeError::ShortBuf)?;
    }
    0u8.compose(target).map_err(|_| ComposeError::ShortBuf)
}

/// Converts an uncompressed domain name in wire format to dotted form.
///
/// The octets must hold exactly one name. The result has no trailing dot
/// unless it is the root name. Compression pointers, escape-worthy
/// octets, and trailing data are rejected.
pub fn dname_from_wire(octets: &[u8]) -> Result<String, DnameError> {
    if octets.len() > MAX_DNAME_LEN {
        return Err(DnameError::LongName);
    }
    let mut res = String::new();
    let mut pos = 0;
    loop {
        let len = match octets.get(pos) {
            Some(&len) => usize::from(len),
            None => return Err(DnameError::Malformed),
        };
        pos += 1;
        if len == 0 {
            break;
        }
        if len > MAX_LABEL_LEN {
            return Err(DnameError::Malformed);
        }
        let label = match octets.get(pos..pos + len) {
            Some(label) => label,
            None => return Err(DnameError::Malformed),
        };
        if !label.iter().all(|&ch| ch.is_ascii_graphic() && ch != b'.') {
            return Err(DnameError::Malformed);
        }
        if !res.is_empty() {
            res.push('.');
        }
        res.extend(label.iter().map(|&ch| char::from(ch)));
        pos += len;
    }
    if pos != octets.len() {
        return Err(DnameError::Malformed);
    }
    if res.is_empty() {
        res.push('.');
    }
    Ok(res)
}

//============ Error Types ===================================================

//------------ DnameError ----------------------------------------------------

/// A domain name cannot be represented in wire format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DnameError {
    /// The name contains an empty label other than the root label.
    EmptyLabel,

    /// A label is longer than 63 octets.
    LongLabel,

    /// The name is longer than 255 octets in wire format.
    LongName,

    /// Wire-format octets do not hold a single uncompressed name.
    Malformed,
}

impl fmt::Display for DnameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DnameError::EmptyLabel => f.write_str("empty label"),
            DnameError::LongLabel => f.write_str("long label"),
            DnameError::LongName => f.write_str("long domain name"),
            DnameError::Malformed => f.write_str("malformed domain name"),
        }
    }
}

impl std::error::Error for DnameError {}

//------------ ComposeError --------------------------------------------------

/// An error happened while composing wire format data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComposeError {
    /// The target ran out of space.
    ShortBuf,

    /// A domain name was malformed.
    BadName(DnameError),

    /// Record data is too long for its 16 bit length field.
    LongData,
}

impl From<ShortBuf> for ComposeError {
    fn from(_: ShortBuf) -> Self {
        ComposeError::ShortBuf
    }
}

impl From<DnameError> for ComposeError {
    fn from(err: DnameError) -> Self {
        ComposeError::BadName(err)
    }
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ComposeError::ShortBuf => f.write_str("buffer size exceeded"),
            ComposeError::BadName(ref err) => err.fmt(f),
            ComposeError::LongData => f.write_str("long record data"),
        }
    }
}

impl std::error::Error for ComposeError {}

//============ Testing =======================================================
