use lexer::{
    token::{LocatableToken, Token},
    Lexer,
};

/// Token stream with a single token of pushback.
pub struct TokenBuffer {
    lexer: Lexer,
    last: Option<LocatableToken>,
    unscanned: bool,
}

impl TokenBuffer {
    pub fn new(buf: &str) -> Self {
        TokenBuffer {
            lexer: Lexer::new(buf),
            last: None,
            unscanned: false,
        }
    }

    /// Consume and return the next token, replaying a pushed back one first.
    pub fn scan(&mut self) -> LocatableToken {
        if self.unscanned {
            if let Some(last) = &self.last {
                self.unscanned = false;
                return last.clone();
            }
        }

        let token = self.lexer.scan();
        log::trace!("scanned {:?} at {}", token.token, token.position);

        self.last = Some(token.clone());
        token
    }

    /// Push the most recently scanned token back. Only one level is kept.
    pub fn unscan(&mut self) {
        debug_assert!(self.last.is_some(), "unscan before any scan");
        debug_assert!(!self.unscanned, "unscan called twice in a row");

        self.unscanned = true;
    }

    // Whitespace is never significant to the grammar.
    pub fn scan_skip_whitespace(&mut self) -> LocatableToken {
        loop {
            let token = self.scan();
            if !token.is(Token::Whitespace) {
                return token;
            }
        }
    }

    /// Next raw character of the source, ignoring any pushed back token.
    /// Keyspace paths do not need it: the token after a segment is scanned
    /// and pushed back instead.
    pub fn peek_char(&self) -> Option<char> {
        self.lexer.peek_char()
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::*;
    use lexer::token::Keyword;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unscan_replays_token() {
        let mut buf = TokenBuffer::new("DROP KEYSPACE");

        let first = buf.scan();
        buf.unscan();
        let replayed = buf.scan();

        assert_eq!(first, replayed);
        assert_eq!(replayed.token, Token::Keyword(Keyword::Drop));
        assert_eq!(buf.scan().token, Token::Whitespace);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut buf = TokenBuffer::new("  DROP \n\t KEYSPACE");

        assert_eq!(buf.scan_skip_whitespace().token, Token::Keyword(Keyword::Drop));
        assert_eq!(
            buf.scan_skip_whitespace().token,
            Token::Keyword(Keyword::Keyspace)
        );
        assert_eq!(buf.scan_skip_whitespace().token, Token::EOF);
    }

    #[test]
    fn test_unscan_after_skip_whitespace() {
        let mut buf = TokenBuffer::new("acme WITH");

        assert_eq!(buf.scan().literal, "acme");
        assert_eq!(buf.scan_skip_whitespace().token, Token::Keyword(Keyword::With));
        buf.unscan();
        assert_eq!(buf.scan_skip_whitespace().token, Token::Keyword(Keyword::With));
    }

    #[test]
    fn test_peek_char() {
        let mut buf = TokenBuffer::new("acme.example");

        assert_eq!(buf.peek_char(), Some('a'));
        buf.scan();
        assert_eq!(buf.peek_char(), Some('.'));
        buf.scan();
        assert_eq!(buf.peek_char(), Some('e'));
    }
}
