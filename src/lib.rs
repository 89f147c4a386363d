//! A legacy resolver interface atop a native DNS query facility.
//!
//! This crate provides the call surface of the traditional BIND resolver
//! library – initializing a resolver state, searching and querying for
//! names, and looking up RRsets – for systems whose DNS client is some
//! other, native facility. Queries are translated into requests to that
//! facility and its answers are translated back into the wire format
//! messages and RRset structures legacy callers expect.
//!
//! # Modules
//!
//! * [base] contains the building blocks for producing wire format data:
//!   IANA parameter types, the message header, and composing of integers
//!   and domain names into fixed size buffers, and
//! * [resolv] contains the resolver calls, the resolver state, the
//!   translation of legacy options, and the native facility abstraction.
//!
//! # Logging
//!
//! The crate logs through the [tracing](https://docs.rs/tracing) crate.
//! State initialization is logged at debug level, configuration failures
//! as warnings, and every native query at trace level.

#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]

pub mod base;
pub mod resolv;
