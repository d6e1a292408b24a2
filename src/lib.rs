/*!
rpsl-peering reads the routing policy of an autonomous system from a routing registry export and
turns its RPSL `import`/`export` (and `mp-import`/`mp-export`) rules into a structured model of
peerings: which neighbours the AS talks to, over which address pairs, with which filters and
which actions.

# Examples

## Analysing a policy

```
use rpsl_peering::PolicyParser;

let xml = r#"<whois-resources><objects><object type="aut-num"><attributes>
    <attribute name="aut-num" value="AS64500"/>
    <attribute name="import" value="from AS64501 192.0.2.1 at 192.0.2.2 action pref=100; accept AS-CUSTOMERS"/>
    <attribute name="export" value="to AS64501 announce ANY"/>
    <attribute name="mp-import" value="afi ipv6.unicast from AS64502 accept ANY"/>
</attributes></object></objects></whois-resources>"#;

let mut parser = PolicyParser::new("AS64500");
let summary = parser.read_policy(xml).unwrap();
assert_eq!(summary.accepted, 3);

let peer = parser.peerings().get("AS64501").unwrap();
assert_eq!(peer.peering_point_count(), 2);
assert_eq!(parser.filters().len(), 1);
```

## Parsing a single rule

```
use rpsl_peering::parser::{parse_rule, RuleContext};
use rpsl_peering::models::AddressFamily;

let rule = parse_rule(
    "AFI IPV6.UNICAST FROM AS1 ACCEPT AS-FOO",
    &RuleContext::import(true),
).unwrap();
assert_eq!(rule.address_family, AddressFamily::Ipv6Unicast);
assert_eq!(rule.factors[0].subject, "AS1");
assert_eq!(rule.factors[0].filter, "AS-FOO");
```

## Fetching from the registry

With the `remote` feature (enabled by default) [registry::RegistryClient] queries the RIPE
REST API. Failures are logged and reported as `None`.

```no_run
use rpsl_peering::registry::{RegistryClient, RIPE_REST_URL};
use rpsl_peering::PolicyParser;

let client = RegistryClient::new(RIPE_REST_URL, "RIPE");
if let Some(reply) = client.policy_by_autnum("AS3333") {
    let mut parser = PolicyParser::new("AS3333");
    parser.read_policy(&String::from_utf8_lossy(&reply)).unwrap();
}
```

# Limitations

Only the first factor of a rule is modelled, `refine` and `except` clauses are dropped, and
filters are stored as text: AS-SETs and route-sets are never expanded.
*/

pub mod error;
pub mod models;
pub mod parser;
pub mod registry;

pub use error::PolicyError;
pub use models::{FilterCatalog, PeerAs, PeeringDirectory, PeeringPoint};
pub use parser::{ParserConfig, PolicyParser, PolicySummary, RuleContext, RuleOutcome};
