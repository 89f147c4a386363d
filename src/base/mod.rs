//! Basics.
//!
//! This module provides the building blocks for producing wire-format DNS
//! messages: the IANA parameter types in [iana], the message header in
//! [header], and composing of integers and domain names in [wire].
//!
//! Composing happens into octets builders as defined by the `octseq` crate.
//! Since the legacy resolver interface hands in a fixed-size buffer, the
//! [`SliceTarget`] builder atop a mutable slice is the one used throughout
//! the crate.
//!
//! Parsing of wire-format messages and domain name compression are not
//! provided.

pub use self::header::{Header, HeaderCounts, HeaderSection};
pub use self::iana::{Class, Opcode, Rcode, Rtype};
pub use self::wire::{Compose, ComposeError, DnameError, SliceTarget};

pub mod header;
pub mod iana;
pub mod wire;
