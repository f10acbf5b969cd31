use cli_common::Position;
use token::*;
pub mod token;

const HISTORY_LEN: usize = 3;

/// Character reader that remembers the last few characters it handed out,
/// along with where they were, so the scanner can step back.
struct Reader {
    chars: Vec<char>,
    offset: usize,
    pos: Position,
    eof: bool,
    history: [(Option<char>, Position); HISTORY_LEN],
    head: usize,
    unread: usize,
}

impl Reader {
    fn new(buf: &str) -> Self {
        Reader {
            chars: buf.chars().collect(),
            offset: 0,
            pos: Position::default(),
            eof: false,
            history: [(None, Position::default()); HISTORY_LEN],
            head: 0,
            unread: 0,
        }
    }

    fn read(&mut self) -> (Option<char>, Position) {
        if self.unread > 0 {
            self.unread -= 1;
            return self.current();
        }

        let ch = self.chars.get(self.offset).copied();
        if ch.is_some() {
            self.offset += 1;
        }

        self.head = (self.head + 1) % HISTORY_LEN;
        self.history[self.head] = (ch, self.pos);

        // End of input only moves the position once.
        match ch {
            Some('\n') => {
                self.pos.line += 1;
                self.pos.char = 0;
            }
            _ if !self.eof => self.pos.char += 1,
            _ => {}
        }

        if ch.is_none() {
            self.eof = true;
        }

        self.current()
    }

    fn unread(&mut self) {
        debug_assert!(self.unread < HISTORY_LEN - 1);
        self.unread += 1;
    }

    /// The last character handed out by `read`.
    fn current(&self) -> (Option<char>, Position) {
        self.history[(self.head + HISTORY_LEN - self.unread) % HISTORY_LEN]
    }

    fn peek(&self) -> Option<char> {
        match self.unread {
            0 => self.chars.get(self.offset).copied(),
            n => self.history[(self.head + HISTORY_LEN + 1 - n) % HISTORY_LEN].0,
        }
    }
}

pub struct Lexer {
    reader: Reader,
}

impl Lexer {
    pub fn new(buf: &str) -> Lexer {
        Lexer {
            reader: Reader::new(buf),
        }
    }

    /// Scan everything up to and including the first EOF.
    pub fn lex(mut self) -> Vec<LocatableToken> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan();
            let done = token.is(Token::EOF);
            tokens.push(token);

            if done {
                break;
            }
        }

        tokens
    }

    /// Return the next token. Once the input is exhausted this keeps returning EOF.
    pub fn scan(&mut self) -> LocatableToken {
        let (ch, pos) = self.reader.read();

        let Some(ch) = ch else {
            return LocatableToken::at_position(Token::EOF, pos);
        };

        match ch {
            c if is_whitespace(c) => {
                self.reader.unread();
                self.scan_whitespace(pos)
            }
            c if is_ident_start(c) => {
                self.reader.unread();
                self.scan_ident(pos)
            }
            '"' => self.scan_string(),
            '.' => LocatableToken::at_position(Token::Dot, pos),
            ',' => LocatableToken::at_position(Token::Comma, pos),
            ';' => LocatableToken::at_position(Token::Semicolon, pos),
            '=' => LocatableToken::at_position(Token::Equal, pos),
            c => LocatableToken::with_literal(Token::Illegal, pos, c.to_string()),
        }
    }

    /// The next raw character the scanner would consume, without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.reader.peek()
    }

    fn scan_whitespace(&mut self, pos: Position) -> LocatableToken {
        let literal = self.scan_while(is_whitespace);

        LocatableToken::with_literal(Token::Whitespace, pos, literal)
    }

    fn scan_ident(&mut self, pos: Position) -> LocatableToken {
        let literal = self.scan_while(is_ident_char);

        LocatableToken::with_literal(Token::lookup(&literal), pos, literal)
    }

    /// Collect characters while `accept` holds. End of input is consumed,
    /// the first rejected character is not.
    fn scan_while<F>(&mut self, accept: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut buf = String::new();

        loop {
            match self.reader.read() {
                (None, _) => break,
                (Some(ch), _) if accept(ch) => buf.push(ch),
                _ => {
                    self.reader.unread();
                    break;
                }
            }
        }

        buf
    }

    // Strings report the position of the character in front of the opening quote.
    fn scan_string(&mut self) -> LocatableToken {
        self.reader.unread();
        let (_, pos) = self.reader.current();
        self.reader.read();

        let mut buf = String::new();

        loop {
            match self.reader.read() {
                (None, _) | (Some('\n'), _) => {
                    return LocatableToken::with_literal(Token::BadString, pos, buf)
                }
                (Some('"'), _) => return LocatableToken::with_literal(Token::Str, pos, buf),
                (Some('\\'), _) => match self.reader.read() {
                    (Some('n'), _) => buf.push('\n'),
                    (Some('t'), _) => buf.push('\t'),
                    (Some('\\'), _) => buf.push('\\'),
                    (Some('"'), _) => buf.push('"'),
                    (Some(other), _) => {
                        return LocatableToken::with_literal(
                            Token::BadEscape,
                            pos,
                            format!("\\{other}"),
                        )
                    }
                    (None, _) => return LocatableToken::with_literal(Token::BadString, pos, buf),
                },
                (Some(ch), _) => buf.push(ch),
            }
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod lexer_tests {
    use crate::*;

    fn to_token_vec_without_locations(tokens: Vec<LocatableToken>) -> Vec<Token> {
        tokens.iter().map(|t| t.token).collect()
    }

    fn at(token: Token, line: usize, char: usize) -> (Token, Position) {
        (token, Position::new(line, char))
    }

    fn positioned(tokens: Vec<LocatableToken>) -> Vec<(Token, Position)> {
        tokens.iter().map(|t| (t.token, t.position)).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new(".,;= \n").lex();
        let actual_without_locations = to_token_vec_without_locations(tokens);

        let expected = vec![
            Token::Dot,
            Token::Comma,
            Token::Semicolon,
            Token::Equal,
            Token::Whitespace,
            Token::EOF,
        ];

        assert_eq!(actual_without_locations, expected);
    }

    #[test]
    fn test_keywords() {
        let tokens = Lexer::new("CREATE KEYSPACE WITH KEY KEYS BETWEEN AND OR").lex();
        let actual_without_locations = to_token_vec_without_locations(tokens);

        let expected = vec![
            Token::Keyword(Keyword::Create),
            Token::Whitespace,
            Token::Keyword(Keyword::Keyspace),
            Token::Whitespace,
            Token::Keyword(Keyword::With),
            Token::Whitespace,
            Token::Keyword(Keyword::Key),
            Token::Whitespace,
            Token::Keyword(Keyword::Keys),
            Token::Whitespace,
            Token::Keyword(Keyword::Between),
            Token::Whitespace,
            Token::And,
            Token::Whitespace,
            Token::Or,
            Token::EOF,
        ];

        assert_eq!(actual_without_locations, expected);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let tokens = Lexer::new("select").lex();

        assert_eq!(tokens[0].token, Token::Identifier);
        assert_eq!(tokens[0].literal, "select");
    }

    #[test]
    fn test_keywords_not_greedy() {
        let tokens = Lexer::new("KEYSPACES").lex();

        // Should not match on Token::Keyword for Keyspace!
        assert_eq!(
            to_token_vec_without_locations(tokens),
            vec![Token::Identifier, Token::EOF]
        );
    }

    #[test]
    fn test_keywords_positioning() {
        let tokens = Lexer::new("CREATE KEYSPACE acme").lex();

        let expected = vec![
            at(Token::Keyword(Keyword::Create), 0, 0),
            at(Token::Whitespace, 0, 6),
            at(Token::Keyword(Keyword::Keyspace), 0, 7),
            at(Token::Whitespace, 0, 15),
            at(Token::Identifier, 0, 16),
            // The identifier already consumed the end of input once.
            at(Token::EOF, 0, 21),
        ];

        assert_eq!(positioned(tokens), expected);
    }

    #[test]
    fn test_eof_after_punctuation() {
        let tokens = Lexer::new("a.").lex();

        let expected = vec![
            at(Token::Identifier, 0, 0),
            at(Token::Dot, 0, 1),
            at(Token::EOF, 0, 2),
        ];

        assert_eq!(positioned(tokens), expected);
    }

    #[test]
    fn test_multiline() {
        let tokens = Lexer::new("DROP\nKEYSPACE x").lex();

        let expected = vec![
            at(Token::Keyword(Keyword::Drop), 0, 0),
            at(Token::Whitespace, 0, 4),
            at(Token::Keyword(Keyword::Keyspace), 1, 0),
            at(Token::Whitespace, 1, 8),
            at(Token::Identifier, 1, 9),
            at(Token::EOF, 1, 11),
        ];

        assert_eq!(positioned(tokens), expected);
    }

    #[test]
    fn test_identifier_literals() {
        let tokens = Lexer::new("users.convo_id").lex();

        let literals: Vec<&str> = tokens.iter().map(|t| t.literal.as_str()).collect();

        assert_eq!(literals, vec!["users", "", "convo_id", ""]);
    }

    #[test]
    fn test_strings() {
        let tokens = Lexer::new(r#""a\"b" "c""#).lex();

        let expected = vec![
            at(Token::Str, 0, 0),
            at(Token::Whitespace, 0, 6),
            // Strings are located at the character ahead of the quote.
            at(Token::Str, 0, 6),
            at(Token::EOF, 0, 10),
        ];

        assert_eq!(positioned(tokens.clone()), expected);
        assert_eq!(tokens[0].literal, "a\"b");
        assert_eq!(tokens[2].literal, "c");
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""line\none\ttab\\""#).lex();

        assert_eq!(tokens[0].token, Token::Str);
        assert_eq!(tokens[0].literal, "line\none\ttab\\");
    }

    #[test]
    fn test_bad_strings() {
        let tokens = Lexer::new(r#""abc"#).lex();
        assert_eq!(
            positioned(tokens.clone()),
            vec![at(Token::BadString, 0, 0), at(Token::EOF, 0, 5)]
        );
        assert_eq!(tokens[0].literal, "abc");

        let tokens = Lexer::new(r#""a\qb""#).lex();
        assert_eq!(tokens[0].token, Token::BadEscape);
        assert_eq!(tokens[0].literal, "\\q");
    }

    #[test]
    fn test_illegal() {
        let tokens = Lexer::new("@").lex();

        assert_eq!(tokens[0].token, Token::Illegal);
        assert_eq!(tokens[0].literal, "@");
        assert_eq!(tokens[0].describe(), "ILLEGAL");
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");

        assert_eq!(lexer.scan().position, Position::new(0, 0));
        assert_eq!(lexer.scan().position, Position::new(0, 1));
        assert_eq!(lexer.scan().position, Position::new(0, 1));
    }

    #[test]
    fn test_peek_char() {
        let mut lexer = Lexer::new("ab c");

        assert_eq!(lexer.peek_char(), Some('a'));
        assert_eq!(lexer.scan().token, Token::Identifier);
        assert_eq!(lexer.peek_char(), Some(' '));
        assert_eq!(lexer.scan().token, Token::Whitespace);
        assert_eq!(lexer.peek_char(), Some('c'));
        assert_eq!(lexer.scan().token, Token::Identifier);
        assert_eq!(lexer.peek_char(), None);
    }

    #[test]
    fn test_describe() {
        let tokens = Lexer::new("acme , ;").lex();

        let described: Vec<String> = tokens.iter().map(|t| t.describe()).collect();

        assert_eq!(
            described,
            vec!["IDENTIFIER (acme)", "WS", ",", "WS", ";", "EOF"]
        );
    }
}
