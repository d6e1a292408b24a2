use crate::models::AddressFamily;

/// Family token that some registry objects glue directly to the following `FROM`, as in
/// `afi ipv6.unicastfrom AS1 accept ANY`.
const MERGED_IPV6_FAMILY: &str = "IPV6.UNICAST";

/// Splits the optional `AFI <family>` prefix off a multiprotocol rule.
///
/// Returns the family and the remaining rule text. Rules without the prefix are valid for any
/// family and are returned unchanged.
pub fn resolve_address_family(text: &str) -> (AddressFamily, &str) {
    let rest = match strip_afi_keyword(text) {
        Some(rest) => rest,
        None => return (AddressFamily::Any, text),
    };

    if let Some(remainder) = strip_merged_ipv6_family(rest) {
        return (AddressFamily::Ipv6Unicast, remainder);
    }

    match rest.split_once(char::is_whitespace) {
        Some((token, remainder)) => (AddressFamily::from_token(token), remainder.trim_start()),
        None => (AddressFamily::Any, text),
    }
}

fn strip_afi_keyword(text: &str) -> Option<&str> {
    let head = text.get(..3)?;
    let rest = &text[3..];
    if head.eq_ignore_ascii_case("AFI") && rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn strip_merged_ipv6_family(rest: &str) -> Option<&str> {
    let family = rest.get(..MERGED_IPV6_FAMILY.len())?;
    let remainder = &rest[MERGED_IPV6_FAMILY.len()..];
    let starts_with_from = remainder
        .get(..4)
        .map(|s| s.eq_ignore_ascii_case("FROM"))
        .unwrap_or(false);
    if family.eq_ignore_ascii_case(MERGED_IPV6_FAMILY) && starts_with_from {
        Some(remainder)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_afi_prefix() {
        let (afi, rest) = resolve_address_family("AFI IPV6.UNICAST FROM AS1 ACCEPT ANY");
        assert_eq!(afi, AddressFamily::Ipv6Unicast);
        assert_eq!(rest, "FROM AS1 ACCEPT ANY");

        let (afi, rest) = resolve_address_family("AFI  ANY.UNICAST   TO AS1 ANNOUNCE AS-FOO");
        assert_eq!(afi, AddressFamily::AnyUnicast);
        assert_eq!(rest, "TO AS1 ANNOUNCE AS-FOO");

        let (afi, _) = resolve_address_family("AFI IPV4.UNICAST,IPV6.UNICAST FROM AS1 ACCEPT ANY");
        assert_eq!(
            afi,
            AddressFamily::Other("IPV4.UNICAST,IPV6.UNICAST".to_string())
        );
    }

    #[test]
    fn test_no_afi_prefix() {
        let (afi, rest) = resolve_address_family("FROM AS1 ACCEPT ANY");
        assert_eq!(afi, AddressFamily::Any);
        assert_eq!(rest, "FROM AS1 ACCEPT ANY");

        // AFI-like subjects are not a prefix
        let (afi, rest) = resolve_address_family("AFIX FROM AS1");
        assert_eq!(afi, AddressFamily::Any);
        assert_eq!(rest, "AFIX FROM AS1");
    }

    #[test]
    fn test_merged_ipv6_family() {
        let (afi, rest) = resolve_address_family("AFI IPV6.UNICASTFROM AS2852 ACCEPT ANY");
        assert_eq!(afi, AddressFamily::Ipv6Unicast);
        assert_eq!(rest, "FROM AS2852 ACCEPT ANY");

        let (afi, rest) = resolve_address_family("afi ipv6.unicastfrom AS1 accept ANY");
        assert_eq!(afi, AddressFamily::Ipv6Unicast);
        assert_eq!(rest, "from AS1 accept ANY");
    }
}
