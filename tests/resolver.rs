//! End-to-end tests of the legacy resolver calls.

mod common;

use common::{conf, init_logging, Scripted};
use resolv_compat::base::iana::{Class, Rtype};
use resolv_compat::resolv::{
    Error, NativeError, NativeRecord, QueryFlags, RecordData, ResOptions,
    ResState, Resolver, RrsetError, Section,
};
use rstest::rstest;
use std::collections::HashSet;

fn a(owner: &str, ttl: u32, last: u8) -> NativeRecord {
    NativeRecord::answer(
        owner,
        Rtype::A,
        ttl,
        RecordData::raw(&[192, 0, 2, last]),
    )
}

//------------ getrrsetbyname ------------------------------------------------

#[test]
fn rrset_good_test() {
    init_logging();
    let resolver = Resolver::new(
        Scripted::answering(vec![
            a("good.test", 10, 1),
            a("good.test", 20, 2),
            NativeRecord::answer(
                "good.test",
                Rtype::RRSIG,
                10,
                RecordData::raw(b"not really a signature"),
            ),
        ]),
        conf(1, ""),
    );
    ResState::with_current(|state| {
        resolver.ninit(state);
        state.options = ResOptions::INIT | ResOptions::DEFAULT;
    });

    let rrset = resolver
        .get_rrset_by_name("good.test", Class::IN, Rtype::A, 0)
        .unwrap();
    assert_eq!(rrset.answer_count(), 2);
    assert_eq!(rrset.ttl(), 10);
    assert_eq!(rrset.signature_count(), 1);
    assert!(rrset.is_validated());
    assert_eq!(rrset.name(), "good.test");
    rrset.release();

    let seen = resolver.native().seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].name, "good.test");
    assert_eq!(seen[0].class, Class::IN);
    assert_eq!(seen[0].rtype, Rtype::A);
    assert_eq!(seen[0].flags, QueryFlags::STANDARD);
    assert_eq!(seen[0].servers, None);
}

#[rstest]
#[case("good.test", 1)]
#[case("good.test", 0x8000_0000)]
#[case("", 0)]
fn rrset_invalid_arguments(#[case] hostname: &str, #[case] flags: u32) {
    let resolver = Resolver::new(
        Scripted::answering(vec![a("good.test", 1, 1)]),
        conf(1, ""),
    );
    let mut state = ResState::default();
    assert_eq!(
        resolver.nget_rrset_by_name(
            &mut state,
            hostname,
            Class::IN,
            Rtype::A,
            flags
        ),
        Err(RrsetError::Invalid)
    );
    assert_eq!(RrsetError::Invalid.code(), 22);
    assert!(resolver.native().seen().is_empty());
}

#[rstest]
#[case(NativeError::NameError, RrsetError::NoName)]
#[case(NativeError::NoData, RrsetError::NoData)]
#[case(NativeError::Other(1460), RrsetError::Fail)]
fn rrset_native_failure(#[case] native: NativeError, #[case] err: RrsetError) {
    let resolver = Resolver::new(Scripted::failing(native), conf(1, ""));
    let mut state = ResState::default();
    assert_eq!(
        resolver.nget_rrset_by_name(
            &mut state,
            "bad.test",
            Class::IN,
            Rtype::A,
            0
        ),
        Err(err)
    );
}

//------------ res_query -----------------------------------------------------

#[test]
fn query_reconstructs_message() {
    init_logging();
    // Deliberately out of order to check grouping into sections.
    let resolver = Resolver::new(
        Scripted::answering(vec![
            a("ns.example.com", 3600, 53).in_section(Section::Additional),
            NativeRecord::answer(
                "example.com",
                Rtype::NS,
                3600,
                RecordData::name("ns.example.com"),
            )
            .in_section(Section::Authority),
            a("www.example.com", 300, 1),
        ]),
        conf(2, "example.com"),
    );
    let mut state = ResState::default();
    let mut buf = [0u8; 512];
    let len = resolver
        .nquery(&mut state, "www.example.com", Class::IN, Rtype::A, &mut buf)
        .unwrap();

    let expected: &[u8] = b"\x81\x00\x00\x01\x00\x01\x00\x01\x00\x01\
        \x03www\x07example\x03com\x00\x00\x01\x00\x01\
        \x03www\x07example\x03com\x00\x00\x01\x00\x01\
        \x00\x00\x01\x2c\x00\x04\xc0\x00\x02\x01\
        \x07example\x03com\x00\x00\x02\x00\x01\
        \x00\x00\x0e\x10\x00\x10\x02ns\x07example\x03com\x00\
        \x02ns\x07example\x03com\x00\x00\x01\x00\x01\
        \x00\x00\x0e\x10\x00\x04\xc0\x00\x02\x35";
    assert_eq!(len, expected.len() + 2);
    assert_eq!(u16::from_be_bytes([buf[0], buf[1]]), state.id());
    assert_eq!(&buf[2..len], expected);
}

#[test]
fn query_without_recursion() {
    let resolver = Resolver::new(
        Scripted::answering(vec![a("x.test", 1, 1)]),
        conf(1, ""),
    );
    let mut state = ResState::default();
    resolver.ninit(&mut state);
    state.options.set(ResOptions::RECURSE, false);
    let mut buf = [0u8; 512];
    resolver
        .nquery(&mut state, "x.test", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    // QR set, RD clear.
    assert_eq!(buf[2], 0x80);
    assert!(resolver.native().seen()[0]
        .flags
        .contains(QueryFlags::NO_RECURSION));
}

#[test]
fn query_short_buffer() {
    let resolver = Resolver::new(
        Scripted::answering(vec![a("www.example.com", 300, 1)]),
        conf(1, ""),
    );
    let mut state = ResState::default();
    // Enough for header and question but not the answer.
    let mut buf = [0u8; 40];
    assert_eq!(
        resolver.nquery(
            &mut state,
            "www.example.com",
            Class::IN,
            Rtype::A,
            &mut buf
        ),
        Err(Error::ShortBuf)
    );
    let mut buf = [0u8; 12];
    assert_eq!(
        resolver.nquery(
            &mut state,
            "www.example.com",
            Class::IN,
            Rtype::A,
            &mut buf
        ),
        Err(Error::ShortBuf)
    );
}

#[test]
fn query_oversized_rdata() {
    let resolver = Resolver::new(
        Scripted::answering(vec![NativeRecord::answer(
            "big.test",
            Rtype::TXT,
            60,
            RecordData::raw(&vec![0x20; 0x1_0000]),
        )]),
        conf(1, ""),
    );
    let mut state = ResState::default();
    // Plenty of room, so this is not about the buffer.
    let mut buf = vec![0u8; 0x2_0000];
    assert_eq!(
        resolver.nquery(
            &mut state,
            "big.test",
            Class::IN,
            Rtype::TXT,
            &mut buf
        ),
        Err(Error::LongData)
    );
}

#[test]
fn query_failure_leaves_buffer_alone() {
    let resolver = Resolver::new(
        Scripted::failing(NativeError::Other(9003)),
        conf(1, ""),
    );
    let mut state = ResState::default();
    let mut buf = [0xeeu8; 64];
    let err = resolver
        .nquery(&mut state, "www.example.com", Class::IN, Rtype::A, &mut buf)
        .unwrap_err();
    assert_eq!(err, Error::Native(NativeError::Other(9003)));
    assert!(err.status() < 0);
    assert!(buf.iter().all(|&octet| octet == 0xee));
}

#[test]
fn query_passes_translated_flags() {
    let resolver =
        Resolver::new(Scripted::answering(Vec::new()), conf(1, ""));
    let mut state = ResState::default();
    resolver.ninit(&mut state);
    state.options |= ResOptions::USEVC | ResOptions::NOALIASES;
    state.options.set(ResOptions::DNSRCH, false);
    let mut buf = [0u8; 512];
    resolver
        .nquery(&mut state, "x.test", Class::IN, Rtype::MX, &mut buf)
        .unwrap();
    let flags = resolver.native().seen()[0].flags;
    assert!(flags.contains(QueryFlags::USE_TCP_ONLY));
    assert!(flags.contains(QueryFlags::NO_HOSTS_FILE));
    assert!(flags.contains(QueryFlags::TREAT_AS_FQDN));
    assert!(!flags.contains(QueryFlags::NO_RECURSION));
}

//------------ res_querydomain -----------------------------------------------

#[test]
fn querydomain_joins_once() {
    let resolver = Resolver::new(
        Scripted::answering(vec![a("host.example.com.", 60, 1)]),
        conf(1, ""),
    );
    let mut buf = [0u8; 512];
    resolver
        .querydomain("host", "example.com.", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    resolver
        .querydomain("host.", ".example.com.", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    resolver
        .querydomain("host", "", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    let names: Vec<_> = resolver
        .native()
        .seen()
        .into_iter()
        .map(|request| request.name)
        .collect();
    assert_eq!(names, ["host.example.com.", "host.example.com.", "host"]);
}

//------------ Server selection ----------------------------------------------

#[rstest]
fn rotation_covers_all_servers(#[values(1, 2, 4, 10)] count: usize) {
    let resolver =
        Resolver::new(Scripted::answering(Vec::new()), conf(count, ""));
    let mut state = ResState::default();
    resolver.ninit(&mut state);
    state.options |= ResOptions::ROTATE;
    let mut buf = [0u8; 512];
    for _ in 0..count {
        resolver
            .nquery(&mut state, "x.test", Class::IN, Rtype::A, &mut buf)
            .unwrap();
    }
    let firsts: HashSet<_> = resolver
        .native()
        .seen()
        .into_iter()
        .map(|request| {
            let servers = request.servers.unwrap();
            assert_eq!(servers.len(), count);
            servers[0]
        })
        .collect();
    assert_eq!(firsts.len(), count);
}

#[test]
fn primary_only() {
    let resolver = Resolver::new(Scripted::answering(Vec::new()), conf(3, ""));
    let mut state = ResState::default();
    resolver.ninit(&mut state);
    state.options |= ResOptions::PRIMARY;
    let mut buf = [0u8; 512];
    resolver
        .nquery(&mut state, "x.test", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    resolver
        .nquery(&mut state, "x.test", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    for request in resolver.native().seen() {
        assert_eq!(request.servers.as_deref(), Some(&state.servers()[..1]));
    }
    assert_eq!(state.servers()[0].port(), 53);
}

//------------ State handling ------------------------------------------------

#[test]
fn implicit_init() {
    let resolver =
        Resolver::new(Scripted::answering(Vec::new()), conf(2, "example.com"));
    let mut buf = [0u8; 512];
    assert!(!ResState::with_current(|state| state.is_init()));
    resolver.query("x.test", Class::IN, Rtype::A, &mut buf).unwrap();
    ResState::with_current(|state| {
        assert!(state.is_init());
        assert_eq!(state.servers().len(), 2);
        assert_eq!(state.default_domain(), "example.com");
    });
}

#[test]
fn explicit_state_is_separate() {
    let resolver = Resolver::new(Scripted::answering(Vec::new()), conf(2, ""));
    let mut state = ResState::default();
    let mut buf = [0u8; 512];
    resolver
        .nquery(&mut state, "x.test", Class::IN, Rtype::A, &mut buf)
        .unwrap();
    assert!(state.is_init());
    assert!(!ResState::with_current(|state| state.is_init()));
}

#[test]
fn search_falls_back_to_default_domain() {
    let resolver = Resolver::new(
        Scripted::failing(NativeError::NameError),
        conf(1, "corp.example"),
    );
    let mut buf = [0u8; 512];
    assert_eq!(
        resolver.search("printer", Class::IN, Rtype::A, &mut buf),
        Err(Error::Native(NativeError::NameError))
    );
    let names: Vec<_> = resolver
        .native()
        .seen()
        .into_iter()
        .map(|request| request.name)
        .collect();
    assert_eq!(names, ["printer", "printer.corp.example"]);
}
