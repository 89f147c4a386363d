//! DNS response codes.
//!
//! Only the four bit response code carried in the message header is
//! covered here. The compatibility layer never produces extended response
//! codes.

//------------ Rcode --------------------------------------------------------

int_enum! {
    /// DNS Response Codes.
    ///
    /// The response code of a response indicates what happend on the server
    /// when trying to answer the query. The code is a 4 bit value and part
    /// of the header of a DNS message. It was defined as part of
    /// [RFC 1035], the UPDATE related values in [RFC 2136].
    ///
    /// [RFC 1035]: https://tools.ietf.org/html/rfc1035
    /// [RFC 2136]: https://tools.ietf.org/html/rfc2136
    =>
    Rcode, u8;

    /// No error condition.
    (NOERROR => 0, "NOERROR")

    /// The name server was unable to interpret the query.
    (FORMERR => 1, "FORMERR")

    /// The name server was unable to process the query.
    (SERVFAIL => 2, "SERVFAIL")

    /// The domain name given in the query does not exist.
    (NXDOMAIN => 3, "NXDOMAIN")

    /// The name server does not support the requested kind of query.
    (NOTIMP => 4, "NOTIMP")

    /// The name server refused the query for policy reasons.
    (REFUSED => 5, "REFUSED")

    /// A name exists when it should not.
    (YXDOMAIN => 6, "YXDOMAIN")

    /// An RRset exists when it should not.
    (YXRRSET => 7, "YXRRSET")

    /// An RRset that should exist does not.
    (NXRRSET => 8, "NXRRSET")

    /// The server is not authoritative for the zone.
    (NOTAUTH => 9, "NOTAUTH")

    /// A name is not contained in the zone.
    (NOTZONE => 10, "NOTZONE")
}

int_enum_show_decimal!(Rcode);
