/*!
Tokenizer for RPSL policy rule text.

Braces and semicolons are tokens of their own, every other run of non-whitespace characters is
a word. Words spelling one of the policy keywords are classified as [Keyword]s. Each token
keeps its byte span so callers can slice the original text exactly.
*/
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    From,
    To,
    Accept,
    Announce,
    Networks,
    Action,
    At,
    Afi,
    Refine,
    Except,
}

impl Keyword {
    const ALL: [Keyword; 10] = [
        Keyword::From,
        Keyword::To,
        Keyword::Accept,
        Keyword::Announce,
        Keyword::Networks,
        Keyword::Action,
        Keyword::At,
        Keyword::Afi,
        Keyword::Refine,
        Keyword::Except,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Keyword::From => "FROM",
            Keyword::To => "TO",
            Keyword::Accept => "ACCEPT",
            Keyword::Announce => "ANNOUNCE",
            Keyword::Networks => "NETWORKS",
            Keyword::Action => "ACTION",
            Keyword::At => "AT",
            Keyword::Afi => "AFI",
            Keyword::Refine => "REFINE",
            Keyword::Except => "EXCEPT",
        }
    }

    fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Word,
    OpenBrace,
    CloseBrace,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '{' | '}' | ';')
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() || is_delimiter(c) {
            if let Some(start) = word_start.take() {
                tokens.push(word_token(text, start..i));
            }
            let kind = match c {
                '{' => TokenKind::OpenBrace,
                '}' => TokenKind::CloseBrace,
                ';' => TokenKind::Semicolon,
                _ => continue,
            };
            tokens.push(Token {
                kind,
                span: i..i + c.len_utf8(),
            });
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(word_token(text, start..text.len()));
    }
    tokens
}

fn word_token(text: &str, span: Range<usize>) -> Token {
    let kind = match Keyword::from_word(&text[span.clone()]) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Word,
    };
    Token { kind, span }
}

/// Index of the first token that is `keyword`.
pub fn find_keyword(tokens: &[Token], keyword: Keyword) -> Option<usize> {
    tokens.iter().position(|t| t.is_keyword(keyword))
}

/// Index of the last token that is `keyword`.
pub fn rfind_keyword(tokens: &[Token], keyword: Keyword) -> Option<usize> {
    tokens.iter().rposition(|t| t.is_keyword(keyword))
}

/// Checks whether `text` contains `keyword` as a whole token.
pub fn contains_keyword(text: &str, keyword: Keyword) -> bool {
    find_keyword(&tokenize(text), keyword).is_some()
}
