//! The SQL tokeniser.

use super::grammar::{KEYWORDS, OPERATORS};
use once_cell::sync::Lazy;
use regex::Regex;

/// The final label of a token handed to the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    Keyword,
    Word,
    Number,
    Operator,
}

/// One SQL token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub label: Label,
    pub text: String,
}

impl Token {
    pub fn new(label: Label, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }
}

// One alternation of named groups, tried in order: quoted strings shadow
// keywords, keywords shadow words. Anything unmatched is skipped.
#[allow(clippy::expect_used)]
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    let keywords = KEYWORDS.join("|");
    let operators = OPERATORS
        .iter()
        .map(|op| regex::escape(op))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        "(?P<dquote>\"(?:\"\"|[^\"])*\")\
         |(?P<squote>'(?:''|[^'])*')\
         |(?P<keyword>(?i:{keywords}))\
         |(?P<operator>{operators})\
         |(?P<number>\\d+)\
         |(?P<word>\\w+|\\*)"
    );
    Regex::new(&pattern).expect("token regex is well formed")
});

/// Generate tokens for a given SQL query.
pub fn tokenise(query: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(query)
        .map(|captures| {
            if let Some(m) = captures.name("dquote") {
                return Token::new(Label::Word, unquote(m.as_str(), '"'));
            }
            if let Some(m) = captures.name("squote") {
                return Token::new(Label::Word, unquote(m.as_str(), '\''));
            }
            if let Some(m) = captures.name("keyword") {
                return Token::new(Label::Keyword, m.as_str().to_lowercase());
            }
            if let Some(m) = captures.name("operator") {
                return Token::new(Label::Operator, m.as_str());
            }
            if let Some(m) = captures.name("number") {
                return Token::new(Label::Number, m.as_str());
            }
            #[allow(clippy::expect_used)]
            let m = captures
                .name("word")
                .expect("one alternation group always matches");
            Token::new(Label::Word, m.as_str())
        })
        .collect()
}

/// Strip the outer quotes and collapse doubled quote characters.
fn unquote(text: &str, quote: char) -> String {
    let inner = text
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(text);
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}
