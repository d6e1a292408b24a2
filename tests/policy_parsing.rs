//! Runs complete aut-num documents through the policy parser and checks the resulting peering
//! model.
use rpsl_peering::models::{ActionOperator, Direction, Fingerprint, PeeringIpPair, PolicyAction};
use rpsl_peering::{ParserConfig, PolicyError, PolicyParser};
use std::net::IpAddr;
use std::str::FromStr;

const AUTNUM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<whois-resources>
<objects>
<object type="aut-num">
  <attributes>
    <attribute name="aut-num" value="AS64500"/>
    <attribute name="as-name" value="EXAMPLE-NET"/>
    <attribute name="import" value="from AS64501 192.0.2.1 at 192.0.2.2 action pref=100; accept AS-CUSTOMERS"/>
    <attribute name="import" value="from AS64501 192.0.2.1 at 192.0.2.2 action community .= { 64500:1 }; accept AS-CUSTOMERS"/>
    <attribute name="export" value="to AS64501 192.0.2.1 at 192.0.2.2 action med=10; announce AS64500"/>
    <attribute name="export" value="to AS64502 announce ANY"/>
    <attribute name="import" value="{ from AS64503 accept AS64503; } refine { from AS64503 action pref=50; accept ANY; }"/>
    <attribute name="import" value="from AS64504 accept { 203.0.113.0/24 "/>
    <attribute name="import" value="accept ANY"/>
    <attribute name="mp-import" value="afi ipv6.unicast from AS64501 2001:db8::1 at 2001:db8::2 accept AS-CUSTOMERS"/>
    <attribute name="mp-export" value="afi ipv4.unicast to AS64505 announce AS64500"/>
    <attribute name="mp-export" value="afi any to AS64506 announce AS64500"/>
    <attribute name="default" value="to AS64502 action pref=10; networks ANY"/>
    <attribute name="mnt-by" value="EXAMPLE-MNT"/>
  </attributes>
</object>
</objects>
</whois-resources>
"#;

fn ip(text: &str) -> IpAddr {
    IpAddr::from_str(text).unwrap()
}

#[test]
fn test_full_policy() {
    let mut parser = PolicyParser::new("AS64500");
    let summary = parser.read_policy(AUTNUM).unwrap();

    // the unbalanced and factorless imports fail
    assert_eq!(summary.accepted, 8);
    assert_eq!(summary.mismatched, 0);
    assert_eq!(summary.failed, 2);

    let peers = parser.peerings();
    assert_eq!(peers.len(), 5);
    for subject in ["AS64501", "AS64502", "AS64503", "AS64505", "AS64506"] {
        assert!(peers.contains(subject), "missing {}", subject);
    }
    assert!(!peers.contains("AS64504"));

    // the ipv4.unicast mp-export keeps its multiprotocol flavour
    let peer = peers.get("AS64505").unwrap();
    assert!(peer.peering_point(&None).unwrap().multiprotocol);
    assert!(peer.filters().all(|f| f.multiprotocol));

    // AS-CUSTOMERS, AS64500 and AS64503, each stored once
    let filters = parser.filters();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters.get(&Fingerprint::of("AS-CUSTOMERS")), Some("AS-CUSTOMERS"));
    assert!(filters.contains(&Fingerprint::of("AS64503")));
}

#[test]
fn test_peering_point_union() {
    let mut parser = PolicyParser::new("AS64500");
    parser.read_policy(AUTNUM).unwrap();

    let peer = parser.peerings().get("AS64501").unwrap();
    // one ipv4 point shared by the imports and the export, one ipv6 point
    assert_eq!(peer.peering_point_count(), 2);

    let key = Some(PeeringIpPair::new(ip("192.0.2.2"), ip("192.0.2.1")));
    let point = peer.peering_point(&key).unwrap();
    assert!(!point.multiprotocol);
    assert_eq!(
        point.actions(Direction::Import).unwrap().actions,
        vec![
            PolicyAction::new(0, "PREF", ActionOperator::Assign, "100"),
            PolicyAction::new(0, "COMMUNITY", ActionOperator::AppendAssign, "64500:1"),
        ]
    );
    assert_eq!(
        point.actions(Direction::Export).unwrap().actions,
        vec![PolicyAction::new(0, "MED", ActionOperator::Assign, "10")]
    );

    let key = Some(PeeringIpPair::new(ip("2001:db8::2"), ip("2001:db8::1")));
    let point = peer.peering_point(&key).unwrap();
    assert!(point.multiprotocol);
    assert!(point.actions(Direction::Import).is_none());

    // the filter is recorded once per protocol flavour
    assert!(peer.has_filter(&Fingerprint::of("AS-CUSTOMERS")));
    assert_eq!(peer.filters().count(), 3);
}

#[test]
fn test_refine_filter_is_dropped() {
    let mut parser = PolicyParser::new("AS64500");
    parser.read_policy(AUTNUM).unwrap();

    let peer = parser.peerings().get("AS64503").unwrap();
    assert_eq!(peer.filters().count(), 1);
    assert!(peer.has_filter(&Fingerprint::of("AS64503")));

    // actions are read from the whole rule, refinement included
    let point = peer.peering_point(&None).unwrap();
    assert_eq!(
        point.import_actions.as_ref().unwrap().actions,
        vec![PolicyAction::new(0, "PREF", ActionOperator::Assign, "50")]
    );
}

#[test]
fn test_address_family_toggles() {
    let mut parser = PolicyParser::with_config("AS64500", ParserConfig::default().disable_ipv6());
    let summary = parser.read_policy(AUTNUM).unwrap();
    assert_eq!(summary.accepted, 5);
    assert_eq!(summary.mismatched, 0);
    assert!(!parser.peerings().contains("AS64506"));
    let peer = parser.peerings().get("AS64501").unwrap();
    assert_eq!(peer.peering_point_count(), 1);

    // mp-export of afi ipv4.unicast needs IPv4 enabled
    let mut parser = PolicyParser::with_config("AS64500", ParserConfig::default().disable_ipv4());
    let summary = parser.read_policy(AUTNUM).unwrap();
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.mismatched, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(parser.peerings().len(), 2);
    assert!(!parser.peerings().contains("AS64505"));
}

#[test]
fn test_default_rules_opt_in() {
    let mut parser = PolicyParser::new("AS64500");
    parser.read_policy(AUTNUM).unwrap();
    let peer = parser.peerings().get("AS64502").unwrap();
    assert!(peer.peering_point(&None).unwrap().import_actions.is_none());

    let config = ParserConfig::default().enable_defaults();
    let mut parser = PolicyParser::with_config("AS64500", config);
    let summary = parser.read_policy(AUTNUM).unwrap();
    assert_eq!(summary.accepted, 9);

    let peer = parser.peerings().get("AS64502").unwrap();
    let point = peer.peering_point(&None).unwrap();
    assert_eq!(
        point.import_actions.as_ref().unwrap().actions,
        vec![PolicyAction::new(0, "PREF", ActionOperator::Assign, "10")]
    );
}

#[test]
fn test_documents_without_autnum() {
    let mut parser = PolicyParser::new("AS64500");
    let summary = parser
        .read_policy(r#"<whois-resources><objects/></whois-resources>"#)
        .unwrap();
    assert_eq!(summary.accepted + summary.mismatched + summary.failed, 0);
    assert!(parser.peerings().is_empty());

    assert!(matches!(
        parser.read_policy("<whois-resources>"),
        Err(PolicyError::InvalidDocument(_))
    ));
}

#[test]
fn test_into_parts() -> anyhow::Result<()> {
    let mut parser = PolicyParser::new("AS64500");
    parser.read_policy(AUTNUM)?;
    let (peerings, filters) = parser.into_parts();

    for peer in peerings.iter() {
        for filter in peer.filters() {
            assert!(filters.contains(&filter.fingerprint));
        }
    }
    Ok(())
}
