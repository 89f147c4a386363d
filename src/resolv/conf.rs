//! Resolver configuration.
//!
//! The legacy resolver state is populated from the operating system’s
//! network configuration: the list of name servers to query and the
//! machine’s primary domain. This module defines the [`ConfigSource`] trait
//! through which that information is obtained together with two
//! implementations: [`ResolvConfFile`] reads a glibc-style
//! `/etc/resolv.conf` and [`StaticConf`] simply hands out fixed values.
//!
//! The module also collects the constants of the legacy interface that
//! govern sizes and defaults.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, Read};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;
use std::string::String;
use std::vec::Vec;
use tracing::warn;

//------------ Constants -----------------------------------------------------

/// The maximum number of name servers kept in a resolver state.
pub const MAXNS: usize = 10;

/// The maximum length of an expanded domain name in presentation format.
pub const MAXDNAME: usize = 1025;

/// The well-known port of the DNS protocol.
pub const NAMESERVER_PORT: u16 = 53;

/// The default interval between query attempts in seconds.
pub const RES_TIMEOUT: u32 = 5;

/// The default number of query attempts.
pub const RES_DFLRETRY: u32 = 2;

/// The largest value the four bit `ndots` field can hold.
pub const RES_MAXNDOTS: u8 = 15;

//------------ ConfigSource --------------------------------------------------

/// A source of the system’s resolver configuration.
///
/// The source is consulted every time a resolver state is initialized.
/// Failures are not fatal: the state falls back to an empty server list or
/// an empty domain, respectively.
pub trait ConfigSource {
    /// Returns the addresses of the configured name servers.
    ///
    /// The order of the list is the order of preference.
    fn name_servers(&self) -> Result<Vec<IpAddr>, io::Error>;

    /// Returns the primary domain of the machine.
    ///
    /// The domain is returned in presentation format. An empty string means
    /// that there is no such domain.
    fn primary_domain(&self) -> Result<String, io::Error>;
}

impl<'a, C: ConfigSource + ?Sized> ConfigSource for &'a C {
    fn name_servers(&self) -> Result<Vec<IpAddr>, io::Error> {
        (*self).name_servers()
    }

    fn primary_domain(&self) -> Result<String, io::Error> {
        (*self).primary_domain()
    }
}

//------------ StaticConf ----------------------------------------------------

/// A configuration source with fixed content.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StaticConf {
    /// The name servers to hand out.
    pub servers: Vec<IpAddr>,

    /// The primary domain to hand out.
    pub domain: String,
}

impl StaticConf {
    /// Creates a new configuration from servers and domain.
    pub fn new(servers: Vec<IpAddr>, domain: impl Into<String>) -> Self {
        StaticConf {
            servers,
            domain: domain.into(),
        }
    }
}

impl ConfigSource for StaticConf {
    fn name_servers(&self) -> Result<Vec<IpAddr>, io::Error> {
        Ok(self.servers.clone())
    }

    fn primary_domain(&self) -> Result<String, io::Error> {
        Ok(self.domain.clone())
    }
}

//------------ ResolvConfFile ------------------------------------------------

/// A configuration source reading a glibc-style configuration file.
///
/// The file is read anew each time the source is consulted. Of its
/// content, only the `nameserver` lines and the `domain` and `search` lines
/// are considered. The primary domain is the argument of the `domain` line
/// or, if there is none, the first entry of the `search` line.
#[derive(Clone, Debug)]
pub struct ResolvConfFile {
    path: PathBuf,
}

impl ResolvConfFile {
    /// The path of the system’s configuration file.
    pub const DEFAULT_PATH: &'static str = "/etc/resolv.conf";

    /// Creates a source for the configuration file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ResolvConfFile { path: path.into() }
    }

    /// Returns the path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the configuration file.
    pub fn read(&self) -> Result<ParsedConf, Error> {
        let mut file = fs::File::open(&self.path)?;
        ParsedConf::parse(&mut file)
    }
}

impl Default for ResolvConfFile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ConfigSource for ResolvConfFile {
    fn name_servers(&self) -> Result<Vec<IpAddr>, io::Error> {
        self.read().map(|conf| conf.servers).map_err(Into::into)
    }

    fn primary_domain(&self) -> Result<String, io::Error> {
        self.read()
            .map(|conf| String::from(conf.domain().unwrap_or_default()))
            .map_err(Into::into)
    }
}

//------------ ParsedConf ----------------------------------------------------

/// The relevant content of a configuration file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedConf {
    /// The addresses from the `nameserver` lines in order.
    pub servers: Vec<IpAddr>,

    /// The argument of the last `domain` line.
    pub domain: Option<String>,

    /// The arguments of the last `search` line.
    pub search: Vec<String>,
}

impl ParsedConf {
    /// Parses the configuration from a reader.
    ///
    /// The format is that of the `/etc/resolv.conf` file. Lines with
    /// unknown keywords are skipped, as are malformed `nameserver` and
    /// `domain` lines. Only failing to read is an error.
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let mut res = ParsedConf::default();
        for (lineno, line) in io::BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim_end();

            if line.is_empty()
                || line.starts_with(';')
                || line.starts_with('#')
            {
                continue;
            }

            let mut words = line.split_whitespace();
            let parsed = match words.next() {
                Some("nameserver") => res.parse_nameserver(words),
                Some("domain") => res.parse_domain(words),
                Some("search") => {
                    res.parse_search(words);
                    Ok(())
                }
                _ => Ok(()),
            };
            if parsed.is_err() {
                warn!("skipping malformed line {}: {:?}", lineno + 1, line);
            }
        }
        Ok(res)
    }

    /// Returns the primary domain.
    pub fn domain(&self) -> Option<&str> {
        match self.domain {
            Some(ref domain) => Some(domain.as_str()),
            None => self.search.first().map(String::as_str),
        }
    }

    fn parse_nameserver(
        &mut self,
        mut words: SplitWhitespace,
    ) -> Result<(), Error> {
        let addr = next_word(&mut words)?;
        // Link-local IPv6 addresses may carry a zone index we can’t keep.
        let addr = addr.split('%').next().unwrap_or(addr);
        self.servers.push(addr.parse().map_err(|_| Error::ParseError)?);
        Ok(())
    }

    fn parse_domain(
        &mut self,
        mut words: SplitWhitespace,
    ) -> Result<(), Error> {
        self.domain = Some(next_word(&mut words)?.into());
        Ok(())
    }

    fn parse_search(&mut self, words: SplitWhitespace) {
        self.search = words.map(Into::into).collect();
    }
}

//------------ Private Helpers -----------------------------------------------

/// Returns a reference to the next word or an error.
fn next_word<'a>(words: &mut SplitWhitespace<'a>) -> Result<&'a str, Error> {
    match words.next() {
        Some(word) => Ok(word),
        None => Err(Error::ParseError),
    }
}

//------------ Error ---------------------------------------------------------

/// The error that can happen when reading the configuration file.
#[derive(Debug)]
pub enum Error {
    /// The file is not a proper file.
    ParseError,

    /// Something happend while reading.
    Io(io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::ParseError => None,
            Error::Io(ref err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        match error {
            Error::ParseError => io::Error::new(
                io::ErrorKind::InvalidData,
                "error parsing configuration",
            ),
            Error::Io(err) => err,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ParseError => f.write_str("error parsing configuration"),
            Error::Io(ref err) => err.fmt(f),
        }
    }
}

//============ Testing ======================================================
