//! Resolver options and their translation into native query flags.
//!
//! The legacy interface configures the resolver through a bitmask of
//! `RES_*` options, represented here by [`ResOptions`]. The native query
//! facility has its own set of flags, represented by [`QueryFlags`]. Some
//! options map onto a native flag, some onto the absence of one, and some
//! have no native equivalent at all but need to be implemented by the
//! compatibility layer itself. The latter end up in a [`Policy`].
//!
//! The complete mapping is given by the [`TRANSLATION`] table, one row per
//! legacy option. [`translate`] applies it.

use core::{fmt, ops};

//------------ ResOptions ----------------------------------------------------

/// The legacy option bitmask.
///
/// The associated constants carry the numeric values legacy programs
/// expect. Bits not defined here are kept but ignored.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct ResOptions(u32);

impl ResOptions {
    /// The state has been initialized.
    ///
    /// Clear this flag to trigger implicit initialization on the next call.
    pub const INIT: Self = ResOptions(1 << 0);

    /// Print debugging messages. Accepted but without effect.
    pub const DEBUG: Self = ResOptions(1 << 1);

    /// Accept authoritative answers only.
    pub const AAONLY: Self = ResOptions(1 << 2);

    /// Use TCP only.
    pub const USEVC: Self = ResOptions(1 << 3);

    /// Query the primary name server only.
    pub const PRIMARY: Self = ResOptions(1 << 4);

    /// Ignore truncation.
    pub const IGNTC: Self = ResOptions(1 << 5);

    /// Set the recursion desired bit.
    pub const RECURSE: Self = ResOptions(1 << 6);

    /// Append the default domain to single label names.
    pub const DEFNAMES: Self = ResOptions(1 << 7);

    /// Keep TCP connections open between queries.
    pub const STAYOPEN: Self = ResOptions(1 << 8);

    /// Search up the local domain tree.
    pub const DNSRCH: Self = ResOptions(1 << 9);

    /// Do not require the answer to come from the queried server.
    pub const INSECURE1: Self = ResOptions(1 << 10);

    /// Do not require the answer to match the query.
    pub const INSECURE2: Self = ResOptions(1 << 11);

    /// Do not consult host aliases.
    pub const NOALIASES: Self = ResOptions(1 << 12);

    /// Use IPv6 addresses for lookups.
    pub const USE_INET6: Self = ResOptions(1 << 13);

    /// Rotate through the name servers.
    pub const ROTATE: Self = ResOptions(1 << 14);

    /// Do not check names for invalid characters.
    pub const NOCHECKNAME: Self = ResOptions(1 << 15);

    /// Do not strip TSIG records.
    pub const KEEPTSIG: Self = ResOptions(1 << 16);

    /// Send each query to all servers at once.
    pub const BLAST: Self = ResOptions(1 << 17);

    /// The options enabled by default.
    pub const DEFAULT: Self =
        ResOptions(Self::RECURSE.0 | Self::DEFNAMES.0 | Self::DNSRCH.0);

    /// Creates options from the raw bitmask.
    pub const fn from_bits(bits: u32) -> Self {
        ResOptions(bits)
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns options without anything set.
    pub const fn empty() -> Self {
        ResOptions(0)
    }

    /// Returns whether all the options in `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether any of the options in `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets or clears the options in `other`.
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.0 |= other.0
        } else {
            self.0 &= !other.0
        }
    }
}

/// # Named Access
///
impl ResOptions {
    /// Returns whether the state is marked as initialized.
    pub fn init(self) -> bool {
        self.contains(Self::INIT)
    }

    /// Returns whether the recursion desired bit should be set.
    pub fn recurse(self) -> bool {
        self.contains(Self::RECURSE)
    }

    /// Returns whether single label names get the default domain appended.
    pub fn default_names(self) -> bool {
        self.contains(Self::DEFNAMES)
    }

    /// Returns whether names are searched for in the local domain tree.
    pub fn dn_search(self) -> bool {
        self.contains(Self::DNSRCH)
    }

    /// Returns whether only the primary name server should be used.
    pub fn primary(self) -> bool {
        self.contains(Self::PRIMARY)
    }

    /// Returns whether name servers should be used round-robin.
    pub fn rotate(self) -> bool {
        self.contains(Self::ROTATE)
    }

    /// Returns whether either of the insecure options is set.
    pub fn insecure(self) -> bool {
        self.intersects(Self::INSECURE1 | Self::INSECURE2)
    }
}

impl ops::BitOr for ResOptions {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        ResOptions(self.0 | other.0)
    }
}

impl ops::BitOrAssign for ResOptions {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0
    }
}

impl ops::BitAnd for ResOptions {
    type Output = Self;

    fn bitand(self, other: Self) -> Self {
        ResOptions(self.0 & other.0)
    }
}

impl ops::Not for ResOptions {
    type Output = Self;

    fn not(self) -> Self {
        ResOptions(!self.0)
    }
}

impl From<u32> for ResOptions {
    fn from(bits: u32) -> Self {
        ResOptions(bits)
    }
}

impl From<ResOptions> for u32 {
    fn from(options: ResOptions) -> Self {
        options.0
    }
}

impl fmt::Debug for ResOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ResOptions({:#x})", self.0)
    }
}

//------------ QueryFlags ----------------------------------------------------

/// Flags understood by the native query facility.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct QueryFlags(u64);

impl QueryFlags {
    /// The standard query behaviour.
    pub const STANDARD: Self = QueryFlags(0);

    /// Accept a truncated response rather than retrying via TCP.
    pub const ACCEPT_TRUNCATED_RESPONSE: Self = QueryFlags(0x0001);

    /// Only use TCP.
    pub const USE_TCP_ONLY: Self = QueryFlags(0x0002);

    /// Ask the server not to recurse.
    pub const NO_RECURSION: Self = QueryFlags(0x0004);

    /// Bypass the local cache.
    pub const BYPASS_CACHE: Self = QueryFlags(0x0008);

    /// Don’t use local name resolution.
    pub const NO_LOCAL_NAME: Self = QueryFlags(0x0020);

    /// Don’t consult the hosts file.
    pub const NO_HOSTS_FILE: Self = QueryFlags(0x0040);

    /// Return the raw response message alongside the records.
    pub const RETURN_MESSAGE: Self = QueryFlags(0x0200);

    /// Treat the name as fully qualified, i.e., don’t append suffixes.
    pub const TREAT_AS_FQDN: Self = QueryFlags(0x1000);

    /// Returns the raw value.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns whether all the flags in `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl ops::BitOr for QueryFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        QueryFlags(self.0 | other.0)
    }
}

impl ops::BitOrAssign for QueryFlags {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0
    }
}

impl fmt::Debug for QueryFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QueryFlags({:#x})", self.0)
    }
}

//------------ Policy --------------------------------------------------------

/// Behaviour the compatibility layer implements on its own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Policy {
    /// Query only the first configured server.
    pub primary: bool,

    /// Use the configured servers round-robin.
    pub rotate: bool,

    /// Set the recursion desired bit in the reconstructed question.
    pub recurse: bool,
}

impl Policy {
    /// Returns whether the server list needs to be passed explicitly.
    ///
    /// This is the case whenever the native facility’s own server
    /// selection would not honour the policy.
    pub fn custom_servers(&self) -> bool {
        self.primary || self.rotate
    }
}

//------------ Translation ---------------------------------------------------

/// What a legacy option translates into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Translation {
    /// The option has no effect on the query.
    Ignored,

    /// A set option sets the native flag.
    Native(QueryFlags),

    /// A cleared option sets the native flag.
    NativeIfUnset(QueryFlags),

    /// A set option restricts the query to the primary server.
    PolicyPrimary,

    /// A set option rotates the server list.
    PolicyRotate,

    /// The option decides the recursion desired bit.
    ///
    /// A cleared option also sets the native flag.
    Recurse(QueryFlags),
}

/// The translation table with one row per defined legacy option.
pub const TRANSLATION: &[(ResOptions, Translation)] = &[
    (ResOptions::INIT, Translation::Ignored),
    (ResOptions::DEBUG, Translation::Ignored),
    (
        ResOptions::AAONLY,
        Translation::Native(QueryFlags::BYPASS_CACHE),
    ),
    (ResOptions::USEVC, Translation::Native(QueryFlags::USE_TCP_ONLY)),
    (ResOptions::PRIMARY, Translation::PolicyPrimary),
    (
        ResOptions::IGNTC,
        Translation::Native(QueryFlags::ACCEPT_TRUNCATED_RESPONSE),
    ),
    (
        ResOptions::RECURSE,
        Translation::Recurse(QueryFlags::NO_RECURSION),
    ),
    (
        ResOptions::DEFNAMES,
        Translation::NativeIfUnset(QueryFlags::NO_LOCAL_NAME),
    ),
    (ResOptions::STAYOPEN, Translation::Ignored),
    (
        ResOptions::DNSRCH,
        Translation::NativeIfUnset(QueryFlags::TREAT_AS_FQDN),
    ),
    (ResOptions::INSECURE1, Translation::Ignored),
    (ResOptions::INSECURE2, Translation::Ignored),
    (
        ResOptions::NOALIASES,
        Translation::Native(QueryFlags::NO_HOSTS_FILE),
    ),
    (ResOptions::USE_INET6, Translation::Ignored),
    (ResOptions::ROTATE, Translation::PolicyRotate),
    (ResOptions::NOCHECKNAME, Translation::Ignored),
    (
        ResOptions::KEEPTSIG,
        Translation::Native(QueryFlags::RETURN_MESSAGE),
    ),
    (ResOptions::BLAST, Translation::Ignored),
];

/// Translates legacy options into native flags and policy.
///
/// The function is pure. Options not listed in [`TRANSLATION`] are
/// ignored.
pub fn translate(options: ResOptions) -> (QueryFlags, Policy) {
    let mut flags = QueryFlags::STANDARD;
    let mut policy = Policy::default();
    for &(option, translation) in TRANSLATION {
        let set = options.contains(option);
        match translation {
            Translation::Ignored => {}
            Translation::Native(native) => {
                if set {
                    flags |= native
                }
            }
            Translation::NativeIfUnset(native) => {
                if !set {
                    flags |= native
                }
            }
            Translation::PolicyPrimary => policy.primary = set,
            Translation::PolicyRotate => policy.rotate = set,
            Translation::Recurse(native) => {
                policy.recurse = set;
                if !set {
                    flags |= native
                }
            }
        }
    }
    (flags, policy)
}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    /// All bits that have a defined meaning.
    const DEFINED: u32 = (1 << 18) - 1;

    #[test]
    fn table_is_exhaustive() {
        assert_eq!(TRANSLATION.len(), 18);
        let mut seen = 0;
        for &(option, _) in TRANSLATION {
            assert_eq!(option.bits().count_ones(), 1);
            assert_eq!(seen & option.bits(), 0);
            seen |= option.bits();
        }
        assert_eq!(seen, DEFINED);
    }

    #[test]
    fn defaults() {
        let (flags, policy) =
            translate(ResOptions::INIT | ResOptions::DEFAULT);
        assert_eq!(flags, QueryFlags::STANDARD);
        assert_eq!(
            policy,
            Policy {
                primary: false,
                rotate: false,
                recurse: true
            }
        );
        assert!(!policy.custom_servers());
    }

    #[test]
    fn inverse_mappings() {
        let (flags, policy) = translate(ResOptions::empty());
        assert!(flags.contains(QueryFlags::NO_RECURSION));
        assert!(flags.contains(QueryFlags::TREAT_AS_FQDN));
        assert!(flags.contains(QueryFlags::NO_LOCAL_NAME));
        assert!(!policy.recurse);
    }

    #[rstest]
    #[case(ResOptions::AAONLY, QueryFlags::BYPASS_CACHE)]
    #[case(ResOptions::USEVC, QueryFlags::USE_TCP_ONLY)]
    #[case(ResOptions::IGNTC, QueryFlags::ACCEPT_TRUNCATED_RESPONSE)]
    #[case(ResOptions::NOALIASES, QueryFlags::NO_HOSTS_FILE)]
    #[case(ResOptions::KEEPTSIG, QueryFlags::RETURN_MESSAGE)]
    fn direct_mappings(
        #[case] option: ResOptions,
        #[case] native: QueryFlags,
    ) {
        let base = ResOptions::INIT | ResOptions::DEFAULT;
        let (without, _) = translate(base);
        let (with, _) = translate(base | option);
        assert!(!without.contains(native));
        assert!(with.contains(native));
    }

    #[rstest]
    #[case(ResOptions::PRIMARY)]
    #[case(ResOptions::ROTATE)]
    fn policy_only(#[case] option: ResOptions) {
        let base = ResOptions::INIT | ResOptions::DEFAULT;
        let (without, _) = translate(base);
        let (with, policy) = translate(base | option);
        assert_eq!(without, with);
        assert!(policy.custom_servers());
        assert_eq!(policy.primary, option == ResOptions::PRIMARY);
        assert_eq!(policy.rotate, option == ResOptions::ROTATE);
    }

    #[test]
    fn pure_and_ignores_unknown_bits() {
        // Walk a spread of masks rather than all 2^18.
        let mut mask = 0x2_5a5au32;
        for _ in 0..512 {
            let options = ResOptions::from_bits(mask & DEFINED);
            let noisy = ResOptions::from_bits(mask | !DEFINED);
            assert_eq!(translate(options), translate(options));
            assert_eq!(translate(options), translate(noisy));
            mask = mask.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        }
    }

    #[test]
    fn named_access() {
        let mut options = ResOptions::INIT | ResOptions::DEFAULT;
        assert!(options.init());
        assert!(options.recurse());
        assert!(options.default_names());
        assert!(options.dn_search());
        assert!(!options.insecure());
        options.set(ResOptions::INSECURE2, true);
        assert!(options.insecure());
        options.set(ResOptions::INIT, false);
        assert!(!options.init());
        assert_eq!(options.bits(), 0x0ac0 | ResOptions::INSECURE2.bits());
    }
}
