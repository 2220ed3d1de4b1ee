//! Key-based access: primary-key lookup, secondary-index lookup, ranges.

use crate::{
    error::TermError,
    query::{MutableSingleObjectQuery, Query, SequenceQuery, SingleObjectQuery},
    term::{Datum, Term, TermContext, TermKind},
    value::Value,
};

///
/// PrimaryKey
///
/// Primary keys are either text or numbers on the wire. Integer keys keep
/// their width until conversion, so the converter decides whether they fit.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PrimaryKey {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl PrimaryKey {
    fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::Int(*n),
            Self::Uint(n) => Value::Uint(*n),
            Self::Float(n) => Value::Float(*n),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }
}

macro_rules! impl_from_for_primary_key {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for PrimaryKey {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_primary_key! {
    i32 => Int,
    i64 => Int,
    u32 => Uint,
    u64 => Uint,
    f64 => Float,
    &str => Text,
    String => Text,
}

///
/// Get
///
/// Lookup by primary key. The only source of `MutableSingleObjectQuery`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Get<S> {
    source: S,
    key: PrimaryKey,
    attribute: Option<String>,
}

impl<S: SequenceQuery> Get<S> {
    pub(crate) const fn new(source: S, key: PrimaryKey) -> Self {
        Self {
            source,
            key,
            attribute: None,
        }
    }

    /// Look the key up under a primary attribute other than the table's default.
    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub const fn key(&self) -> &PrimaryKey {
        &self.key
    }
}

impl<S: SequenceQuery> Query for Get<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let key = ctx.literal(&self.key.to_value())?;

        Ok(ctx
            .node(TermKind::Get, vec![source, key])
            .with_optional("attribute", self.attribute.as_deref().map(text)))
    }
}

impl<S: SequenceQuery> SingleObjectQuery for Get<S> {}
impl<S: SequenceQuery> MutableSingleObjectQuery for Get<S> {}

///
/// GetAll
///
/// Lookup by key on the primary key or a named secondary index; may match
/// any number of items.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GetAll<S> {
    source: S,
    key: Value,
    index: Option<String>,
}

impl<S: SequenceQuery> GetAll<S> {
    pub(crate) const fn new(source: S, key: Value, index: Option<String>) -> Self {
        Self { source, key, index }
    }

    #[must_use]
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }
}

impl<S: SequenceQuery> Query for GetAll<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let key = ctx.literal(&self.key)?;

        Ok(ctx
            .node(TermKind::GetAll, vec![source, key])
            .with_optional("index", self.index.as_deref().map(text)))
    }
}

impl<S: SequenceQuery> SequenceQuery for GetAll<S> {
    type Item = S::Item;
}

///
/// Bound
///
/// Whether a range endpoint includes its key.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Bound {
    #[default]
    Closed,
    Open,
}

impl Bound {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

///
/// Between
///
/// Range over the primary key or a secondary index. Bounds default to
/// left-closed, right-open; both are always emitted so the remote engine
/// never applies its own default.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Between<S> {
    source: S,
    left: Value,
    right: Value,
    index: Option<String>,
    left_bound: Bound,
    right_bound: Bound,
}

impl<S: SequenceQuery> Between<S> {
    pub(crate) const fn new(source: S, left: Value, right: Value) -> Self {
        Self {
            source,
            left,
            right,
            index: None,
            left_bound: Bound::Closed,
            right_bound: Bound::Open,
        }
    }

    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    #[must_use]
    pub const fn left_bound(mut self, bound: Bound) -> Self {
        self.left_bound = bound;
        self
    }

    #[must_use]
    pub const fn right_bound(mut self, bound: Bound) -> Self {
        self.right_bound = bound;
        self
    }

    #[must_use]
    pub const fn bounds(&self) -> (Bound, Bound) {
        (self.left_bound, self.right_bound)
    }
}

impl<S: SequenceQuery> Query for Between<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let left = ctx.literal(&self.left)?;
        let right = ctx.literal(&self.right)?;

        Ok(ctx
            .node(TermKind::Between, vec![source, left, right])
            .with_optional("index", self.index.as_deref().map(text))
            .with_optarg("left_bound", text(self.left_bound.as_str()))
            .with_optarg("right_bound", text(self.right_bound.as_str())))
    }
}

impl<S: SequenceQuery> SequenceQuery for Between<S> {
    type Item = S::Item;
}

fn text(value: &str) -> Term {
    Term::datum(Datum::string(value))
}
