// Expected-token sets reported in parse errors, in display order.

pub const EXPECT_STATEMENT: &[&str] = &["CREATE", "DROP", "SELECT", "DELETE", "UPSERT"];

pub const EXPECT_KEYSPACE_KEYWORD: &[&str] = &["KEYSPACE"];

pub const EXPECT_KEYSPACE: &[&str] = &["keyspace"];

pub const EXPECT_IDENT: &[&str] = &["identifier"];

pub const EXPECT_STRING: &[&str] = &["string"];

pub const EXPECT_WITH: &[&str] = &["WITH"];

pub const EXPECT_KEY_OR_KEYS: &[&str] = &["KEY", "KEYS"];

// `;` also ends the list; the message keeps its historical wording.
pub const EXPECT_KEY_LIST_CONTINUATION: &[&str] = &["COMMA", "EOF"];

pub const EXPECT_TERMINATOR: &[&str] = &["EOF", "SEMICOLON"];

pub const EXPECT_FROM: &[&str] = &["FROM"];

pub const EXPECT_INTO: &[&str] = &["INTO"];

pub const EXPECT_WHERE: &[&str] = &["WHERE"];

pub const EXPECT_WHERE_CONTINUATION: &[&str] = &["EOF", "SEMICOLON", "AND"];

pub const EXPECT_OPERATOR: &[&str] = &["EQ", "BETWEEN"];

pub const EXPECT_EQ: &[&str] = &["EQ"];

pub const EXPECT_LOGICAL: &[&str] = &["AND", "OR"];

pub const EXPECT_AND: &[&str] = &["AND"];
