use crate::error::PolicyError;
use crate::models::PolicyFactor;
use crate::parser::lexer::{rfind_keyword, tokenize, Keyword, Token, TokenKind};

/// Shape of a factor: `<lead> <subject> [... <boundary> <filter>]`.
struct FactorGrammar {
    lead: Keyword,
    boundary: Keyword,
    /// Accept any trailing text when the boundary keyword is missing.
    open_tail: bool,
}

const IMPORT_FACTOR: FactorGrammar = FactorGrammar {
    lead: Keyword::From,
    boundary: Keyword::Accept,
    open_tail: false,
};

const EXPORT_FACTOR: FactorGrammar = FactorGrammar {
    lead: Keyword::To,
    boundary: Keyword::Announce,
    open_tail: false,
};

const DEFAULT_FACTOR: FactorGrammar = FactorGrammar {
    lead: Keyword::To,
    boundary: Keyword::Networks,
    open_tail: true,
};

impl FactorGrammar {
    fn apply(&self, text: &str, tokens: &[Token]) -> Option<PolicyFactor> {
        let (lead, subject) = (tokens.first()?, tokens.get(1)?);
        if !lead.is_keyword(self.lead) || subject.kind != TokenKind::Word {
            return None;
        }
        let subject = subject.text(text);

        let tail = &tokens[2..];
        if tail.is_empty() {
            return Some(PolicyFactor::any(subject));
        }

        // the filter is whatever follows the last boundary keyword that is not at the very end
        match rfind_keyword(&tail[..tail.len() - 1], self.boundary) {
            Some(i) => Some(PolicyFactor::new(
                subject,
                text[tail[i].span.end..].trim(),
            )),
            None if self.open_tail => Some(PolicyFactor::any(subject)),
            None => None,
        }
    }
}

/// Matches a factor and its filter clause against the import, export and default grammars,
/// returning the subject and filter of the first one that fits.
///
/// ```
/// use rpsl_peering::parser::match_factor;
///
/// let factor = match_factor("TO AS1234", "ANNOUNCE AS-SECRETNET").unwrap();
/// assert_eq!(factor.subject, "AS1234");
/// assert_eq!(factor.filter, "AS-SECRETNET");
/// ```
pub fn match_factor(factor: &str, filter_clause: &str) -> Result<PolicyFactor, PolicyError> {
    let joined = format!("{} {}", factor, filter_clause);
    let mut text = joined.trim();
    if let Some(stripped) = text.strip_suffix(';') {
        text = stripped.trim_end();
    }

    let tokens = tokenize(text);
    [IMPORT_FACTOR, EXPORT_FACTOR, DEFAULT_FACTOR]
        .iter()
        .find_map(|grammar| grammar.apply(text, &tokens))
        .ok_or_else(|| PolicyError::UnmatchedFactor(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_factor() {
        let f = match_factor("FROM AS1234", "ACCEPT ANY").unwrap();
        assert_eq!(f, PolicyFactor::any("AS1234"));

        let f = match_factor("FROM AS1234 10.0.0.1 AT 10.0.0.2", "ACCEPT AS-FOO AND NOT AS-BAR;")
            .unwrap();
        assert_eq!(f, PolicyFactor::new("AS1234", "AS-FOO AND NOT AS-BAR"));
    }

    #[test]
    fn test_export_factor() {
        let f = match_factor("TO AS1", "ANNOUNCE {10.0.0.0/8^+}").unwrap();
        assert_eq!(f, PolicyFactor::new("AS1", "{10.0.0.0/8^+}"));
    }

    #[test]
    fn test_default_factor() {
        let f = match_factor("TO AS1 ACTION PREF=100;", "NETWORKS AS-FOO").unwrap();
        assert_eq!(f, PolicyFactor::new("AS1", "AS-FOO"));

        let f = match_factor("TO AS1 ACTION PREF=100", "").unwrap();
        assert_eq!(f, PolicyFactor::any("AS1"));
    }

    #[test]
    fn test_subject_only() {
        assert_eq!(match_factor("FROM AS1", "").unwrap(), PolicyFactor::any("AS1"));
    }

    #[test]
    fn test_unmatched_factor() {
        let err = match_factor("FROM AS1", "ANNOUNCE ANY").unwrap_err();
        assert!(err.is_grammar_error());

        // keyword without filter text
        assert!(match_factor("FROM AS1", "ACCEPT").is_err());
        assert!(match_factor("FROM", "ACCEPT ANY").is_err());
    }
}
