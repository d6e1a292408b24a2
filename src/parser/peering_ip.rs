use crate::models::PeeringIpPair;
use crate::parser::lexer::{find_keyword, tokenize, Keyword, Token, TokenKind};
use log::debug;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Extracts the router addresses of `<peering> at <local-router>` rules.
///
/// The remote address is the last token before `AT`; the local address is the last token
/// before `ACTION`, or before the first filter keyword if the rule has no action. Both have to
/// be IPv6 literals for multiprotocol rules and IPv4 literals otherwise, a partial pair is
/// rejected.
pub fn extract_peering_ips(text: &str, multiprotocol: bool) -> Option<PeeringIpPair> {
    let tokens = tokenize(text);
    let at = find_keyword(&tokens, Keyword::At)?;
    let local_end = find_keyword(&tokens, Keyword::Action)
        .or_else(|| tokens.iter().position(is_filter_keyword))
        .unwrap_or(tokens.len());

    let remote = token_before(text, &tokens, at);
    let local = token_before(text, &tokens, local_end);

    match (parse_ip(remote, multiprotocol), parse_ip(local, multiprotocol)) {
        (Some(remote), Some(local)) => Some(PeeringIpPair::new(local, remote)),
        _ => {
            debug!(
                "rejecting peering addresses remote={:?} local={:?} (multiprotocol: {})",
                remote, local, multiprotocol
            );
            None
        }
    }
}

fn is_filter_keyword(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Keyword(Keyword::Accept)
            | TokenKind::Keyword(Keyword::Announce)
            | TokenKind::Keyword(Keyword::Networks)
    )
}

fn token_before<'a>(text: &'a str, tokens: &[Token], index: usize) -> Option<&'a str> {
    index
        .checked_sub(1)
        .and_then(|i| tokens.get(i))
        .map(|t| t.text(text))
}

fn parse_ip(token: Option<&str>, multiprotocol: bool) -> Option<IpAddr> {
    let token = token?;
    match multiprotocol {
        true => Ipv6Addr::from_str(token).ok().map(IpAddr::V6),
        false => Ipv4Addr::from_str(token).ok().map(IpAddr::V4),
    }
}
