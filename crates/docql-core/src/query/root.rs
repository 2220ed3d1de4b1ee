//! Root constructors: databases, tables, literals, and administrative
//! operations that do not derive from another query.

use crate::{
    error::TermError,
    expr::{Expr, Func},
    query::{
        Document, Query, SequenceQuery, SingleObjectQuery, WriteQuery, write::Insert,
    },
    term::{Datum, Term, TermContext, TermKind},
    value::Value,
};

/// Reference a database by name.
#[must_use]
pub fn db(name: impl Into<String>) -> Db {
    Db::new(name)
}

/// Reference a table in the connection's default database.
#[must_use]
pub fn table(name: impl Into<String>) -> Table {
    Table {
        db: None,
        name: name.into(),
        use_outdated: false,
    }
}

#[must_use]
pub fn db_create(name: impl Into<String>) -> DbCreate {
    DbCreate { name: name.into() }
}

#[must_use]
pub fn db_drop(name: impl Into<String>) -> DbDrop {
    DbDrop { name: name.into() }
}

#[must_use]
pub const fn db_list() -> DbList {
    DbList
}

/// Wrap a literal value as a single-object query.
#[must_use]
pub fn literal(value: impl Into<Value>) -> Literal {
    Literal {
        value: value.into(),
    }
}

/// Wrap literal values as a sequence query.
#[must_use]
pub fn literal_seq<I, V>(values: I) -> LiteralSeq
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    LiteralSeq {
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// The remote engine's current time.
#[must_use]
pub const fn now() -> Now {
    Now
}

fn name_term(name: &str) -> Term {
    Term::datum(Datum::string(name))
}

///
/// Db
///
/// Database reference. Not itself a sequence; it only offers table-level
/// operations.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Db {
    name: String,
}

impl Db {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table {
            db: Some(self.clone()),
            name: name.into(),
            use_outdated: false,
        }
    }

    #[must_use]
    pub fn table_create(&self, name: impl Into<String>) -> TableCreate {
        TableCreate {
            db: self.clone(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn table_drop(&self, name: impl Into<String>) -> TableDrop {
        TableDrop {
            db: self.clone(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn table_list(&self) -> TableList {
        TableList { db: self.clone() }
    }
}

impl Query for Db {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(ctx.node(TermKind::Db, vec![name_term(&self.name)]))
    }
}

///
/// Table
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    db: Option<Db>,
    name: String,
    use_outdated: bool,
}

impl Table {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allow reads from out-of-date replicas.
    #[must_use]
    pub const fn use_outdated(mut self, use_outdated: bool) -> Self {
        self.use_outdated = use_outdated;
        self
    }

    /// Insert a document, or a list of documents.
    #[must_use]
    pub fn insert(self, value: impl Into<Value>) -> Insert {
        Insert::new(self, value.into())
    }

    /// Create a secondary index over a single member of the same name.
    #[must_use]
    pub fn index_create(self, name: impl Into<String>) -> IndexCreate {
        IndexCreate {
            table: self,
            name: name.into(),
            function: None,
        }
    }

    /// Create a secondary index over a computed key.
    #[must_use]
    pub fn index_create_with(
        self,
        name: impl Into<String>,
        key: impl FnOnce(Expr) -> Expr,
    ) -> IndexCreate {
        IndexCreate {
            table: self,
            name: name.into(),
            function: Some(Func::unary(key)),
        }
    }

    #[must_use]
    pub fn index_drop(self, name: impl Into<String>) -> IndexDrop {
        IndexDrop {
            table: self,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn index_list(self) -> IndexList {
        IndexList { table: self }
    }
}

impl Query for Table {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let mut args = Vec::with_capacity(2);
        if let Some(db) = &self.db {
            args.push(db.build_term(ctx)?);
        }
        args.push(name_term(&self.name));

        let term = ctx.node(TermKind::Table, args);
        Ok(if self.use_outdated {
            term.with_optarg("use_outdated", Term::datum(Datum::Bool(true)))
        } else {
            term
        })
    }
}

impl SequenceQuery for Table {
    type Item = Document;
}

// ----------------------------------------------------------------------
// Database administration
// ----------------------------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DbCreate {
    name: String,
}

impl Query for DbCreate {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(ctx.node(TermKind::DbCreate, vec![name_term(&self.name)]))
    }
}

impl WriteQuery for DbCreate {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DbDrop {
    name: String,
}

impl Query for DbDrop {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(ctx.node(TermKind::DbDrop, vec![name_term(&self.name)]))
    }
}

impl WriteQuery for DbDrop {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DbList;

impl Query for DbList {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(ctx.node(TermKind::DbList, Vec::new()))
    }
}

impl SingleObjectQuery for DbList {}

// ----------------------------------------------------------------------
// Table administration
// ----------------------------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableCreate {
    db: Db,
    name: String,
}

impl Query for TableCreate {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let db = self.db.build_term(ctx)?;
        Ok(ctx.node(TermKind::TableCreate, vec![db, name_term(&self.name)]))
    }
}

impl WriteQuery for TableCreate {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableDrop {
    db: Db,
    name: String,
}

impl Query for TableDrop {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let db = self.db.build_term(ctx)?;
        Ok(ctx.node(TermKind::TableDrop, vec![db, name_term(&self.name)]))
    }
}

impl WriteQuery for TableDrop {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableList {
    db: Db,
}

impl Query for TableList {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let db = self.db.build_term(ctx)?;
        Ok(ctx.node(TermKind::TableList, vec![db]))
    }
}

impl SingleObjectQuery for TableList {}

// ----------------------------------------------------------------------
// Index administration
// ----------------------------------------------------------------------

///
/// IndexCreate
///
/// Without a key function the index covers the member named like the index.
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexCreate {
    table: Table,
    name: String,
    function: Option<Func>,
}

impl Query for IndexCreate {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let mut args = vec![self.table.build_term(ctx)?, name_term(&self.name)];
        if let Some(function) = &self.function {
            args.push(function.to_term(ctx)?);
        }

        Ok(ctx.node(TermKind::IndexCreate, args))
    }
}

impl WriteQuery for IndexCreate {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexDrop {
    table: Table,
    name: String,
}

impl Query for IndexDrop {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let table = self.table.build_term(ctx)?;
        Ok(ctx.node(TermKind::IndexDrop, vec![table, name_term(&self.name)]))
    }
}

impl WriteQuery for IndexDrop {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexList {
    table: Table,
}

impl Query for IndexList {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let table = self.table.build_term(ctx)?;
        Ok(ctx.node(TermKind::IndexList, vec![table]))
    }
}

impl SingleObjectQuery for IndexList {}

// ----------------------------------------------------------------------
// Literals
// ----------------------------------------------------------------------

///
/// Literal
/// A single literal value lifted into a query.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Query for Literal {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        ctx.literal(&self.value)
    }
}

impl SingleObjectQuery for Literal {}

///
/// LiteralSeq
/// Literal values lifted into a sequence query.
///

#[derive(Clone, Debug, PartialEq)]
pub struct LiteralSeq {
    values: Vec<Value>,
}

impl Query for LiteralSeq {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let items = self
            .values
            .iter()
            .map(|value| ctx.literal(value))
            .collect::<Result<_, _>>()?;

        Ok(ctx.node(TermKind::MakeArray, items))
    }
}

impl SequenceQuery for LiteralSeq {
    type Item = Document;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Now;

impl Query for Now {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(ctx.node(TermKind::Now, Vec::new()))
    }
}

impl SingleObjectQuery for Now {}
