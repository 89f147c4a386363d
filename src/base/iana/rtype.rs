//! Resource Record (RR) TYPEs

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource Record Types.
    ///
    /// Each resource record has a 16 bit type value indicating what kind of
    /// information is represented by the record. A query names the type it
    /// requests records for. A few additional types, the query types, can
    /// only be used in questions.
    ///
    /// The type covers the values the legacy `arpa/nameser.h` interface
    /// declares as `T_*` constants. Any other value can still be expressed
    /// through [`Rtype::from_int`]. The assigned values are maintained in an
    /// [IANA registry].
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    =>
    Rtype, u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// A mail destination (obsolete).
    (MD => 3, "MD")

    /// A mail forwarder (obsolete).
    (MF => 4, "MF")

    /// The canonical name for an alias.
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A mailbox domain name.
    (MB => 7, "MB")

    /// A mail group member.
    (MG => 8, "MG")

    /// A mail rename domain name.
    (MR => 9, "MR")

    /// A null resource record.
    (NULL => 10, "NULL")

    /// A well known service description.
    (WKS => 11, "WKS")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Host information.
    (HINFO => 13, "HINFO")

    /// Mailbox or mail list information.
    (MINFO => 14, "MINFO")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// Responsible person.
    (RP => 17, "RP")

    /// AFS data base location.
    (AFSDB => 18, "AFSDB")

    /// X.25 PSDN address.
    (X25 => 19, "X25")

    /// ISDN address.
    (ISDN => 20, "ISDN")

    /// Route through.
    (RT => 21, "RT")

    /// NSAP style A record.
    (NSAP => 22, "NSAP")

    /// Domain name pointer, NSAP style.
    (NSAPPTR => 23, "NSAPPTR")

    /// Signature, the pre-DNSSEC-bis variant.
    (SIG => 24, "SIG")

    /// Key, the pre-DNSSEC-bis variant.
    (KEY => 25, "KEY")

    /// X.400 mail mapping information.
    (PX => 26, "PX")

    /// Geographical position.
    (GPOS => 27, "GPOS")

    /// IPv6 address.
    (AAAA => 28, "AAAA")

    /// Location information.
    (LOC => 29, "LOC")

    /// Next domain (obsolete).
    (NXT => 30, "NXT")

    /// Endpoint identifier.
    (EID => 31, "EID")

    /// Nimrod locator.
    (NIMLOC => 32, "NIMLOC")

    /// Server selection.
    (SRV => 33, "SRV")

    /// ATM address.
    (ATMA => 34, "ATMA")

    /// Naming authority pointer.
    (NAPTR => 35, "NAPTR")

    /// Key exchanger.
    (KX => 36, "KX")

    /// Certificate.
    (CERT => 37, "CERT")

    /// A6 (obsolete).
    (A6 => 38, "A6")

    /// Delegation name.
    (DNAME => 39, "DNAME")

    /// Kitchen sink.
    (SINK => 40, "SINK")

    /// EDNS option pseudo-record.
    (OPT => 41, "OPT")

    /// Delegation signer.
    (DS => 43, "DS")

    /// Resource record signature.
    (RRSIG => 46, "RRSIG")

    /// Next secure.
    (NSEC => 47, "NSEC")

    /// DNS key.
    (DNSKEY => 48, "DNSKEY")

    /// DHCP identifier.
    (DHCID => 49, "DHCID")

    /// Hashed next secure.
    (NSEC3 => 50, "NSEC3")

    /// NSEC3 parameters.
    (NSEC3PARAM => 51, "NSEC3PARAM")

    /// TLSA certificate association.
    (TLSA => 52, "TLSA")

    /// Reserved (IANA).
    (UINFO => 100, "UINFO")

    /// Reserved (IANA).
    (UID => 101, "UID")

    /// Reserved (IANA).
    (GID => 102, "GID")

    /// Reserved (IANA).
    (UNSPEC => 103, "UNSPEC")

    /// Transaction key.
    (TKEY => 249, "TKEY")

    /// Transaction signature.
    (TSIG => 250, "TSIG")

    /// Incremental transfer.
    (IXFR => 251, "IXFR")

    /// Transfer of an entire zone.
    (AXFR => 252, "AXFR")

    /// Mailbox-related RRs.
    (MAILB => 253, "MAILB")

    /// Mail agent RRs (obsolete).
    (MAILA => 254, "MAILA")

    /// A request for all records.
    (ANY => 255, "ANY")
}

int_enum_show_with_prefix!(Rtype, "TYPE");

impl Rtype {
    /// Returns whether records of this type carry DNSSEC signatures.
    ///
    /// Both the current RRSIG type and its predecessor SIG count.
    #[must_use]
    pub fn is_signature(self) -> bool {
        self == Rtype::RRSIG || self == Rtype::SIG
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Rtype;

    #[test]
    fn mnemonics() {
        assert_eq!(Rtype::CNAME.to_mnemonic_str(), Some("CNAME"));
        assert_eq!(Rtype::from_int(65280).to_mnemonic_str(), None);
        assert_eq!(format!("{}", Rtype::AAAA), "AAAA");
        assert_eq!(format!("{}", Rtype::from_int(65280)), "TYPE65280");
    }

    #[test]
    fn signature_types() {
        assert!(Rtype::RRSIG.is_signature());
        assert!(Rtype::SIG.is_signature());
        assert!(!Rtype::A.is_signature());
    }
}
