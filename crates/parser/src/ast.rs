use std::fmt;

#[derive(PartialEq, Debug)]
pub enum Program {
    Statements(Vec<Statement>),
    Empty,
}

/// Discriminant for every kind of node the parser produces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    CreateKeyspace,
    DropKeyspace,
    Select,
    Upsert,
    Delete,
    StringLiteral,
    StringLiteralGroup,
    Expression,
    KeyAttribute,
    Between,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Statement {
    Create(CreateStatement),
    Drop(DropStatement),
    Select(SelectStatement),
    Upsert(UpsertStatement),
    Delete(DeleteStatement),
}

impl Statement {
    pub fn node_type(&self) -> NodeType {
        match self {
            Statement::Create(_) => NodeType::CreateKeyspace,
            Statement::Drop(_) => NodeType::DropKeyspace,
            Statement::Select(_) => NodeType::Select,
            Statement::Upsert(_) => NodeType::Upsert,
            Statement::Delete(_) => NodeType::Delete,
        }
    }

    /// Canonical text of the statement. Parsing it again yields an equal tree.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn keyspace(&self) -> &Path {
        match self {
            Statement::Create(s) => &s.keyspace,
            Statement::Drop(s) => &s.keyspace,
            Statement::Select(s) => &s.keyspace,
            Statement::Upsert(s) => &s.keyspace,
            Statement::Delete(s) => &s.keyspace,
        }
    }

    /// The AND-joined WHERE filters. Empty for keyspace statements.
    pub fn filters(&self) -> &[Expression] {
        match self {
            Statement::Create(_) | Statement::Drop(_) => &[],
            Statement::Select(s) => &s.where_clause,
            Statement::Upsert(s) => &s.where_clause,
            Statement::Delete(s) => &s.where_clause,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Create(s) => write!(f, "{s}"),
            Statement::Drop(s) => write!(f, "{s}"),
            Statement::Select(s) => write!(f, "{s}"),
            Statement::Upsert(s) => write!(f, "{s}"),
            Statement::Delete(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct CreateStatement {
    pub keyspace: Path,
    pub keys: Vec<Identifier>,
}

impl fmt::Display for CreateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.keys.len() {
            1 => "KEY",
            _ => "KEYS",
        };

        let keys = self
            .keys
            .iter()
            .map(|k| k.value.as_str())
            .collect::<Vec<&str>>()
            .join(", ");

        write!(f, "CREATE KEYSPACE {} WITH {keyword} {keys};", self.keyspace)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct DropStatement {
    pub keyspace: Path,
}

impl fmt::Display for DropStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP KEYSPACE {};", self.keyspace)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SelectStatement {
    pub keyspace: Path,
    pub where_clause: Vec<Expression>,
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SELECT FROM {} WHERE {};",
            self.keyspace,
            WhereClause(&self.where_clause)
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct UpsertStatement {
    pub value: StringLiteral,
    pub keyspace: Path,
    pub where_clause: Vec<Expression>,
}

impl fmt::Display for UpsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UPSERT {} INTO {} WHERE {};",
            self.value,
            self.keyspace,
            WhereClause(&self.where_clause)
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct DeleteStatement {
    pub keyspace: Path,
    pub where_clause: Vec<Expression>,
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DELETE FROM {} WHERE {};",
            self.keyspace,
            WhereClause(&self.where_clause)
        )
    }
}

struct WhereClause<'a>(&'a [Expression]);

impl fmt::Display for WhereClause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{expr}")?;
        }

        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operator {
    Equality,
    And,
    Or,
    Between,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equality => f.write_str(" = "),
            Operator::And => f.write_str(" AND "),
            Operator::Or => f.write_str(" OR "),
            Operator::Between => f.write_str(" BETWEEN "),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Expression {
    Equality(EqualityExpression),
    Between(BetweenExpression),
}

impl Expression {
    pub fn node_type(&self) -> NodeType {
        match self {
            Expression::Equality(_) => NodeType::Expression,
            Expression::Between(_) => NodeType::Between,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Expression::Equality(_) => Operator::Equality,
            Expression::Between(_) => Operator::Between,
        }
    }

    pub fn attribute(&self) -> &KeyAttribute {
        match self {
            Expression::Equality(e) => &e.attribute,
            Expression::Between(e) => &e.attribute,
        }
    }

    /// The literal values the expression compares against, in source order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Expression::Equality(e) => match &e.value {
                StringValue::Literal(literal) => vec![literal.value.as_str()],
                StringValue::Group(group) => group.values.iter().map(String::as_str).collect(),
            },
            Expression::Between(e) => e.values.values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Equality(e) => write!(f, "{}{}{}", e.attribute, self.operator(), e.value),
            Expression::Between(e) => write!(f, "{}{}{}", e.attribute, self.operator(), e.values),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct EqualityExpression {
    pub attribute: KeyAttribute,
    pub value: StringValue,
}

#[derive(Clone, PartialEq, Debug)]
pub struct BetweenExpression {
    pub attribute: KeyAttribute,
    pub values: StringLiteralGroup,
}

#[derive(Clone, PartialEq, Debug)]
pub enum StringValue {
    Literal(StringLiteral),
    Group(StringLiteralGroup),
}

impl StringValue {
    pub fn node_type(&self) -> NodeType {
        match self {
            StringValue::Literal(_) => NodeType::StringLiteral,
            StringValue::Group(_) => NodeType::StringLiteralGroup,
        }
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringValue::Literal(l) => write!(f, "{l}"),
            StringValue::Group(g) => write!(f, "{g}"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct StringLiteral {
    pub value: String,
}

impl StringLiteral {
    pub fn from(value: String) -> Self {
        StringLiteral { value }
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;

        for ch in self.value.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{c}")?,
            }
        }

        f.write_str("\"")
    }
}

/// Two or more values joined by a single operator. Holds the OR pair of an
/// equality and the bounds of a BETWEEN.
#[derive(Clone, PartialEq, Debug)]
pub struct StringLiteralGroup {
    pub operator: Operator,
    pub values: Vec<String>,
}

impl StringLiteralGroup {
    pub fn either(first: String, second: String) -> Self {
        StringLiteralGroup {
            operator: Operator::Or,
            values: vec![first, second],
        }
    }

    pub fn range(lower: String, upper: String) -> Self {
        StringLiteralGroup {
            operator: Operator::And,
            values: vec![lower, upper],
        }
    }
}

impl fmt::Display for StringLiteralGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.operator)?;
            }
            write!(f, "{}", StringLiteral::from(value.clone()))?;
        }

        Ok(())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct KeyAttribute {
    pub name: Identifier,
}

impl KeyAttribute {
    pub fn node_type(&self) -> NodeType {
        NodeType::KeyAttribute
    }
}

impl fmt::Display for KeyAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Dot-separated keyspace name, e.g. `users.convo.timestamp`.
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    pub value: String,
}

impl Path {
    pub fn from(value: String) -> Self {
        Path { value }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.value.split('.')
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Identifier {
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Identifier {
    pub fn from(value: String) -> Self {
        Identifier { value }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use pretty_assertions::assert_eq;

    fn ident(value: &str) -> Identifier {
        Identifier::from(value.to_string())
    }

    fn equality(attribute: &str, value: StringValue) -> Expression {
        Expression::Equality(EqualityExpression {
            attribute: KeyAttribute {
                name: ident(attribute),
            },
            value,
        })
    }

    #[test]
    fn test_render_create_normalises_key_keyword() {
        let single = CreateStatement {
            keyspace: Path::from("acme".to_string()),
            keys: vec![ident("id")],
        };
        let multiple = CreateStatement {
            keyspace: Path::from("acme".to_string()),
            keys: vec![ident("id"), ident("category")],
        };

        assert_eq!(single.to_string(), "CREATE KEYSPACE acme WITH KEY id;");
        assert_eq!(
            multiple.to_string(),
            "CREATE KEYSPACE acme WITH KEYS id, category;"
        );
    }

    #[test]
    fn test_render_select() {
        let stmt = Statement::Select(SelectStatement {
            keyspace: Path::from("users".to_string()),
            where_clause: vec![
                equality(
                    "username",
                    StringValue::Group(StringLiteralGroup::either(
                        "bugs.bunny".to_string(),
                        "daffy.duck".to_string(),
                    )),
                ),
                Expression::Between(BetweenExpression {
                    attribute: KeyAttribute {
                        name: ident("timestamp"),
                    },
                    values: StringLiteralGroup::range(
                        "2015-01-01".to_string(),
                        "2016-01-01".to_string(),
                    ),
                }),
            ],
        });

        assert_eq!(
            stmt.render(),
            r#"SELECT FROM users WHERE username = "bugs.bunny" OR "daffy.duck" AND timestamp BETWEEN "2015-01-01" AND "2016-01-01";"#
        );
    }

    #[test]
    fn test_render_escapes_strings() {
        let literal = StringLiteral::from("say \"hi\"\\\n".to_string());

        assert_eq!(literal.to_string(), r#""say \"hi\"\\\n""#);
    }

    #[test]
    fn test_node_types() {
        let drop = Statement::Drop(DropStatement {
            keyspace: Path::from("acme".to_string()),
        });
        let expr = equality(
            "id",
            StringValue::Literal(StringLiteral::from("1".to_string())),
        );

        assert_eq!(drop.node_type(), NodeType::DropKeyspace);
        assert_eq!(expr.node_type(), NodeType::Expression);
        assert_eq!(expr.attribute().node_type(), NodeType::KeyAttribute);
        assert_eq!(expr.values(), vec!["1"]);
        assert!(drop.filters().is_empty());
    }

    #[test]
    fn test_path_segments() {
        let path = Path::from("users.convo.timestamp".to_string());

        assert_eq!(
            path.segments().collect::<Vec<&str>>(),
            vec!["users", "convo", "timestamp"]
        );
    }
}
