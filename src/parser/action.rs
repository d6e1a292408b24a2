use crate::models::{ActionOperator, Direction, PolicyAction, PolicyActionList};
use crate::parser::lexer::{find_keyword, tokenize, Keyword};

/// Parses the `action` clause of a rule into ordered assignments.
///
/// The clause runs from the first `ACTION` keyword to the last `boundary` keyword after it
/// (`ACCEPT` for imports, `ANNOUNCE` for exports), or to the end of the rule when there is
/// none. Statements are separated by `;`; statements that are not assignments are dropped but
/// keep their position in the sequence numbering.
///
/// Returns `None` if the rule has no `ACTION` keyword.
pub fn parse_actions(
    text: &str,
    direction: Direction,
    boundary: Keyword,
) -> Option<PolicyActionList> {
    let tokens = tokenize(text);
    let action = find_keyword(&tokens, Keyword::Action)?;
    let start = tokens[action].span.end;
    let end = tokens[action + 1..]
        .iter()
        .rev()
        .find(|t| t.is_keyword(boundary))
        .map(|t| t.span.start)
        .unwrap_or(text.len());

    let mut list = PolicyActionList::new(direction);
    for (sequence, statement) in text[start..end].split(';').enumerate() {
        if let Some(action) = parse_statement(sequence, statement) {
            list.push(action);
        }
    }
    Some(list)
}

fn parse_statement(sequence: usize, statement: &str) -> Option<PolicyAction> {
    let reshaped: String = statement
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .collect();

    let (attribute, operator, value) = if let Some((attribute, value)) = reshaped.split_once(".=") {
        (attribute, ActionOperator::AppendAssign, value)
    } else if let Some((attribute, value)) = reshaped.split_once('=') {
        (attribute, ActionOperator::Assign, value)
    } else {
        return None;
    };
    Some(PolicyAction::new(sequence, attribute, operator, value))
}
