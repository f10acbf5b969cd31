use std::fmt;

use cli_common::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Select,
    Upsert,
    Into,
    Delete,
    Drop,
    From,
    Where,
    Keyspace,
    With,
    Key,
    Keys,
    Between,
}

/// Case-sensitive keyword table. `AND` and `OR` are structural tokens and
/// live outside of it.
pub const KEYWORDS: [(&str, Keyword); 13] = [
    ("CREATE", Keyword::Create),
    ("SELECT", Keyword::Select),
    ("UPSERT", Keyword::Upsert),
    ("INTO", Keyword::Into),
    ("DELETE", Keyword::Delete),
    ("DROP", Keyword::Drop),
    ("FROM", Keyword::From),
    ("WHERE", Keyword::Where),
    ("KEYSPACE", Keyword::Keyspace),
    ("WITH", Keyword::With),
    ("KEY", Keyword::Key),
    ("KEYS", Keyword::Keys),
    ("BETWEEN", Keyword::Between),
];

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Select => "SELECT",
            Keyword::Upsert => "UPSERT",
            Keyword::Into => "INTO",
            Keyword::Delete => "DELETE",
            Keyword::Drop => "DROP",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Keyspace => "KEYSPACE",
            Keyword::With => "WITH",
            Keyword::Key => "KEY",
            Keyword::Keys => "KEYS",
            Keyword::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Whitespace,
    Dot,
    Comma,
    Semicolon,
    Equal,
    And,
    Or,
    Keyword(Keyword),
    Identifier,
    Str,
    BadString,
    BadEscape,
    Illegal,
    EOF,
}

impl Token {
    /// Resolve a scanned word into a keyword, a logical operator or a plain identifier.
    pub fn lookup(word: &str) -> Token {
        match word {
            "AND" => Token::And,
            "OR" => Token::Or,
            _ => KEYWORDS
                .iter()
                .find(|(name, _)| *name == word)
                .map_or(Token::Identifier, |(_, keyword)| Token::Keyword(*keyword)),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace => f.write_str("WS"),
            Token::Dot => f.write_str("."),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::Equal => f.write_str("="),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Keyword(k) => write!(f, "{k}"),
            Token::Identifier => f.write_str("IDENT"),
            Token::Str => f.write_str("TEXTUAL"),
            Token::BadString => f.write_str("BADSTRING"),
            Token::BadEscape => f.write_str("BADESCAPE"),
            Token::Illegal => f.write_str("ILLEGAL"),
            Token::EOF => f.write_str("EOF"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocatableToken {
    pub token: Token,
    pub position: Position,
    pub literal: String,
}

impl LocatableToken {
    pub fn at_position(token: Token, position: Position) -> Self {
        LocatableToken {
            token,
            position,
            literal: String::new(),
        }
    }

    pub fn with_literal(token: Token, position: Position, literal: String) -> Self {
        LocatableToken {
            token,
            position,
            literal,
        }
    }

    pub fn is(&self, token: Token) -> bool {
        self.token == token
    }

    /// How the token reads in a "found ..." error message.
    pub fn describe(&self) -> String {
        match self.token {
            Token::Identifier => format!("IDENTIFIER ({})", self.literal),
            t => t.to_string(),
        }
    }
}
