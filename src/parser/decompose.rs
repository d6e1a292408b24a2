/*!
Brace-aware decomposition of a policy expression into factor text and filter clause.

For `{ from AS1 accept ANY; } refine { ... }` the first brace group is kept and the refinement
is dropped; the remaining text is split at the first filter keyword, probing `ACCEPT`,
`ANNOUNCE` and `NETWORKS` in that order regardless of the rule direction.
*/
use crate::error::PolicyError;
use crate::models::FILTER_ANY;
use crate::parser::lexer::{find_keyword, rfind_keyword, tokenize, Keyword, TokenKind};
use log::warn;

/// Filter keywords in probing priority.
const FILTER_KEYWORDS: [Keyword; 3] = [Keyword::Accept, Keyword::Announce, Keyword::Networks];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Factor texts such as `FROM AS1 AT 10.0.0.1`. Exactly one entry.
    pub factors: Vec<String>,
    /// Filter clause including its keyword, e.g. `ACCEPT AS-FOO`. Empty when missing.
    pub filter_clause: String,
    /// Set when no filter keyword was found in a non-default rule.
    pub missing_filter: bool,
}

/// Returns the interior of a leading brace group, or the text before the first `REFINE` or
/// `EXCEPT`, or the whole text.
fn first_group(text: &str) -> Result<&str, PolicyError> {
    let tokens = tokenize(text);
    let grouped = matches!(tokens.first(), Some(t) if t.kind == TokenKind::OpenBrace);
    let mut depth: i64 = 0;

    for token in &tokens {
        match token.kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if grouped && depth == 0 {
                    return Ok(text[1..token.span.start].trim());
                }
            }
            TokenKind::Keyword(Keyword::Refine) | TokenKind::Keyword(Keyword::Except) => {
                return Ok(text[..token.span.start].trim());
            }
            _ => {}
        }
    }

    match depth {
        0 => Ok(text),
        _ => Err(PolicyError::UnbalancedBraces(text.to_string())),
    }
}

/// Splits a rule into its factor and filter clause.
///
/// `default_rule` makes a missing filter keyword mean `ANY` instead of a syntax warning.
pub fn decompose_expression(text: &str, default_rule: bool) -> Result<Decomposition, PolicyError> {
    let text = text.trim();
    let expression = first_group(text)?;
    let tokens = tokenize(expression);

    let split = FILTER_KEYWORDS
        .into_iter()
        .find_map(|keyword| find_keyword(&tokens, keyword).map(|i| (keyword, &tokens[i])));

    let (selector, filter_clause, missing_filter) = match split {
        Some((keyword, token)) => {
            let rest = expression[token.span.end..].trim();
            let clause = match rest.is_empty() {
                true => keyword.as_str().to_string(),
                false => format!("{} {}", keyword.as_str(), rest),
            };
            (&expression[..token.span.start], clause, false)
        }
        None if default_rule => (expression, FILTER_ANY.to_string(), false),
        None => {
            warn!(
                "syntax error: cannot find selectors in '{}' decomposing expression: {}",
                expression, text
            );
            (expression, String::new(), true)
        }
    };

    let selector_tokens = tokenize(selector);
    let factor = [Keyword::From, Keyword::To]
        .into_iter()
        .find_map(|keyword| {
            rfind_keyword(&selector_tokens, keyword).map(|i| {
                let subject = selector[selector_tokens[i].span.end..].trim();
                format!("{} {}", keyword.as_str(), subject)
                    .trim_end()
                    .to_string()
            })
        })
        .ok_or_else(|| PolicyError::MissingFactor {
            selector: selector.trim().to_string(),
            rule: text.to_string(),
        })?;

    Ok(Decomposition {
        factors: vec![factor],
        filter_clause,
        missing_filter,
    })
}
