use ast::*;
use buffer::TokenBuffer;
use cli_common::{Capability, ParseError};
use consts::*;
use lexer::token::{Keyword, LocatableToken, Token};

pub mod ast;
pub mod buffer;
pub mod consts;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Which optional WHERE grammar a statement accepts.
#[derive(Clone, Copy, Debug)]
struct Filters {
    between: bool,
    logical_or: bool,
}

impl Filters {
    // SELECT and DELETE may address many rows.
    const READ: Filters = Filters {
        between: true,
        logical_or: true,
    };

    // UPSERT must resolve to exactly one row.
    const WRITE: Filters = Filters {
        between: false,
        logical_or: false,
    };
}

pub struct Parser {
    buf: TokenBuffer,
}

/// Parse exactly one statement. Anything after its terminator is left alone.
pub fn parse_statement(text: &str) -> Result<Statement> {
    Parser::new(text).parse_statement()
}

pub fn parse_program(text: &str) -> Result<Program> {
    Parser::new(text).parse_program()
}

impl Parser {
    pub fn new(text: &str) -> Parser {
        Parser {
            buf: TokenBuffer::new(text),
        }
    }

    /// Parse a `;` separated list of statements, stopping at the first error.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements = vec![];

        loop {
            let token = self.buf.scan_skip_whitespace();
            match token.token {
                Token::EOF => break,
                Token::Semicolon => continue,
                _ => {
                    self.buf.unscan();
                    let statement = self.parse_statement()?;

                    // DROP leaves its terminator unread.
                    if let Statement::Drop(_) = statement {
                        self.expect_terminator()?;
                    }

                    statements.push(statement);
                }
            }
        }

        if statements.is_empty() {
            return Ok(Program::Empty);
        }

        Ok(Program::Statements(statements))
    }

    pub fn parse_statement(&mut self) -> Result<Statement> {
        let token = self.buf.scan_skip_whitespace();
        log::debug!("parsing statement starting with {}", token.describe());

        let statement = match token.token {
            Token::Keyword(Keyword::Create) => {
                self.expect_keyspace_keyword()?;
                self.parse_create_keyspace().map(Statement::Create)
            }
            Token::Keyword(Keyword::Drop) => {
                self.expect_keyspace_keyword()?;
                self.parse_drop_keyspace().map(Statement::Drop)
            }
            Token::Keyword(Keyword::Select) => self
                .parse_from_where()
                .map(|(keyspace, where_clause)| {
                    Statement::Select(SelectStatement {
                        keyspace,
                        where_clause,
                    })
                }),
            Token::Keyword(Keyword::Delete) => self
                .parse_from_where()
                .map(|(keyspace, where_clause)| {
                    Statement::Delete(DeleteStatement {
                        keyspace,
                        where_clause,
                    })
                }),
            Token::Keyword(Keyword::Upsert) => self.parse_upsert().map(Statement::Upsert),
            _ => Err(unexpected(&token, EXPECT_STATEMENT)),
        };

        match &statement {
            Ok(stmt) => log::debug!("parsed {:?}: {stmt}", stmt.node_type()),
            Err(err) => log::debug!("parse failed: {err}"),
        }

        statement
    }

    fn expect_keyspace_keyword(&mut self) -> Result<()> {
        let token = self.buf.scan_skip_whitespace();
        match token.token {
            Token::Keyword(Keyword::Keyspace) => Ok(()),
            _ => Err(unexpected(&token, EXPECT_KEYSPACE_KEYWORD)),
        }
    }

    // CREATE KEYSPACE has been consumed.
    fn parse_create_keyspace(&mut self) -> Result<CreateStatement> {
        let keyspace = self.parse_keyspace()?;

        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Keyword(Keyword::With)) {
            return Err(unexpected(&token, EXPECT_WITH));
        }

        let token = self.buf.scan_skip_whitespace();
        let keys = match token.token {
            Token::Keyword(Keyword::Key) => vec![self.parse_ident()?],
            Token::Keyword(Keyword::Keys) => self.parse_ident_list()?,
            _ => return Err(unexpected(&token, EXPECT_KEY_OR_KEYS)),
        };

        self.expect_terminator()?;

        Ok(CreateStatement { keyspace, keys })
    }

    // DROP KEYSPACE has been consumed. Nothing after the name is read.
    fn parse_drop_keyspace(&mut self) -> Result<DropStatement> {
        let keyspace = self.parse_keyspace()?;

        Ok(DropStatement { keyspace })
    }

    /// `FROM <keyspace> WHERE <filters>`, shared by SELECT and DELETE.
    fn parse_from_where(&mut self) -> Result<(Path, Vec<Expression>)> {
        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Keyword(Keyword::From)) {
            return Err(unexpected(&token, EXPECT_FROM));
        }

        let keyspace = self.parse_keyspace()?;

        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Keyword(Keyword::Where)) {
            return Err(unexpected(&token, EXPECT_WHERE));
        }

        let where_clause = self.parse_where_clause(Filters::READ)?;

        Ok((keyspace, where_clause))
    }

    fn parse_upsert(&mut self) -> Result<UpsertStatement> {
        let value = StringLiteral::from(self.parse_string()?);

        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Keyword(Keyword::Into)) {
            return Err(unexpected(&token, EXPECT_INTO));
        }

        let keyspace = self.parse_keyspace()?;

        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Keyword(Keyword::Where)) {
            return Err(unexpected(&token, EXPECT_WHERE));
        }

        let where_clause = self.parse_where_clause(Filters::WRITE)?;

        Ok(UpsertStatement {
            value,
            keyspace,
            where_clause,
        })
    }

    /// One or more AND-joined expressions, closed by EOF or `;`.
    fn parse_where_clause(&mut self, filters: Filters) -> Result<Vec<Expression>> {
        let mut expressions = vec![self.parse_expression(filters)?];

        loop {
            let token = self.buf.scan_skip_whitespace();
            match token.token {
                Token::EOF | Token::Semicolon => break,
                Token::And => expressions.push(self.parse_expression(filters)?),
                _ => return Err(unexpected(&token, EXPECT_WHERE_CONTINUATION)),
            }
        }

        Ok(expressions)
    }

    fn parse_expression(&mut self, filters: Filters) -> Result<Expression> {
        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Identifier) {
            return Err(unexpected(&token, EXPECT_IDENT));
        }

        let attribute = KeyAttribute {
            name: Identifier::from(token.literal),
        };

        let operator = self.buf.scan_skip_whitespace();
        match operator.token {
            Token::Equal => self.parse_equality_expression(attribute, filters),
            Token::Keyword(Keyword::Between) if !filters.between => Err(ParseError::not_allowed(
                Capability::Between,
                operator.position,
            )),
            Token::Keyword(Keyword::Between) => self.parse_between_expression(attribute),
            _ if filters.between => Err(unexpected(&operator, EXPECT_OPERATOR)),
            _ => Err(unexpected(&operator, EXPECT_EQ)),
        }
    }

    // Only a single OR pair is accepted per attribute.
    fn parse_equality_expression(
        &mut self,
        attribute: KeyAttribute,
        filters: Filters,
    ) -> Result<Expression> {
        let first = self.parse_string()?;

        let token = self.buf.scan_skip_whitespace();
        let value = match token.token {
            Token::And | Token::EOF | Token::Semicolon => {
                self.buf.unscan();
                StringValue::Literal(StringLiteral::from(first))
            }
            Token::Or if !filters.logical_or => {
                return Err(ParseError::not_allowed(
                    Capability::LogicalOr,
                    token.position,
                ))
            }
            Token::Or => {
                let second = self.parse_string()?;
                StringValue::Group(StringLiteralGroup::either(first, second))
            }
            _ if filters.logical_or => return Err(unexpected(&token, EXPECT_LOGICAL)),
            _ => return Err(unexpected(&token, EXPECT_AND)),
        };

        Ok(Expression::Equality(EqualityExpression { attribute, value }))
    }

    fn parse_between_expression(&mut self, attribute: KeyAttribute) -> Result<Expression> {
        let lower = self.parse_string()?;

        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::And) {
            return Err(unexpected(&token, EXPECT_AND));
        }

        let upper = self.parse_string()?;

        Ok(Expression::Between(BetweenExpression {
            attribute,
            values: StringLiteralGroup::range(lower, upper),
        }))
    }

    /// A keyspace is a dot-separated list of identifiers. Segments are read
    /// without skipping whitespace, so `acme. example` is rejected.
    fn parse_keyspace(&mut self) -> Result<Path> {
        let token = self.buf.scan_skip_whitespace();
        if !token.is(Token::Identifier) {
            return Err(unexpected(&token, EXPECT_KEYSPACE));
        }

        let mut keyspace = token.literal;
        let mut pending_dot = false;

        let last = loop {
            let token = self.buf.scan();
            match token.token {
                Token::Dot if pending_dot => return Err(unexpected(&token, EXPECT_IDENT)),
                Token::Dot => {
                    keyspace.push('.');
                    pending_dot = true;
                }
                Token::Identifier => {
                    keyspace.push_str(&token.literal);
                    pending_dot = false;
                }
                _ => break token,
            }
        };

        self.buf.unscan();

        if pending_dot {
            return Err(unexpected(&last, EXPECT_IDENT));
        }

        Ok(Path::from(keyspace))
    }

    fn parse_string(&mut self) -> Result<String> {
        let token = self.buf.scan_skip_whitespace();
        match token.token {
            Token::Str => Ok(token.literal),
            _ => Err(unexpected(&token, EXPECT_STRING)),
        }
    }

    fn parse_ident(&mut self) -> Result<Identifier> {
        let token = self.buf.scan_skip_whitespace();
        match token.token {
            Token::Identifier => Ok(Identifier::from(token.literal)),
            _ => Err(unexpected(&token, EXPECT_IDENT)),
        }
    }

    /// Comma separated identifiers. The terminator is left for the caller.
    fn parse_ident_list(&mut self) -> Result<Vec<Identifier>> {
        let mut keys = vec![self.parse_ident()?];

        loop {
            let token = self.buf.scan_skip_whitespace();
            match token.token {
                Token::EOF | Token::Semicolon => break,
                Token::Comma => keys.push(self.parse_ident()?),
                _ => return Err(unexpected(&token, EXPECT_KEY_LIST_CONTINUATION)),
            }
        }

        self.buf.unscan();

        Ok(keys)
    }

    fn expect_terminator(&mut self) -> Result<()> {
        let token = self.buf.scan_skip_whitespace();
        match token.token {
            Token::EOF | Token::Semicolon => Ok(()),
            _ => Err(unexpected(&token, EXPECT_TERMINATOR)),
        }
    }
}

fn unexpected(token: &LocatableToken, expected: &'static [&'static str]) -> ParseError {
    ParseError::unexpected(token.describe(), expected, token.position)
}
