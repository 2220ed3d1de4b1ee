//! Sequence transforms: filtering, projection, paging, set operations and
//! folds.

use crate::{
    error::TermError,
    expr::Func,
    query::{Document, Query, SequenceQuery, SingleObjectQuery},
    term::{Term, TermContext, TermKind},
    value::Value,
};

///
/// Filter
///

#[derive(Clone, Debug, PartialEq)]
pub struct Filter<S> {
    source: S,
    predicate: Func,
}

impl<S: SequenceQuery> Filter<S> {
    pub(crate) const fn new(source: S, predicate: Func) -> Self {
        Self { source, predicate }
    }

    #[must_use]
    pub const fn predicate(&self) -> &Func {
        &self.predicate
    }
}

impl<S: SequenceQuery> Query for Filter<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let predicate = self.predicate.to_term(ctx)?;

        Ok(ctx.node(TermKind::Filter, vec![source, predicate]))
    }
}

impl<S: SequenceQuery> SequenceQuery for Filter<S> {
    type Item = S::Item;
}

///
/// Map
///
/// Projection; the element shape afterwards is whatever the projection
/// builds, so the marker resets to `Document`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Map<S> {
    source: S,
    projection: Func,
}

impl<S: SequenceQuery> Map<S> {
    pub(crate) const fn new(source: S, projection: Func) -> Self {
        Self { source, projection }
    }
}

impl<S: SequenceQuery> Query for Map<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let projection = self.projection.to_term(ctx)?;

        Ok(ctx.node(TermKind::Map, vec![source, projection]))
    }
}

impl<S: SequenceQuery> SequenceQuery for Map<S> {
    type Item = Document;
}

///
/// ConcatMap
/// Projection to a sequence per element, flattened.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ConcatMap<S> {
    source: S,
    mapping: Func,
}

impl<S: SequenceQuery> ConcatMap<S> {
    pub(crate) const fn new(source: S, mapping: Func) -> Self {
        Self { source, mapping }
    }
}

impl<S: SequenceQuery> Query for ConcatMap<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let mapping = self.mapping.to_term(ctx)?;

        Ok(ctx.node(TermKind::ConcatMap, vec![source, mapping]))
    }
}

impl<S: SequenceQuery> SequenceQuery for ConcatMap<S> {
    type Item = Document;
}

// ----------------------------------------------------------------------
// Paging
// ----------------------------------------------------------------------

// Counts and indices are passed through unvalidated; the remote engine
// rejects what it cannot execute.

#[derive(Clone, Debug, PartialEq)]
pub struct Skip<S> {
    source: S,
    count: i64,
}

impl<S: SequenceQuery> Skip<S> {
    pub(crate) const fn new(source: S, count: i64) -> Self {
        Self { source, count }
    }
}

impl<S: SequenceQuery> Query for Skip<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let count = ctx.literal(&Value::Int(self.count))?;

        Ok(ctx.node(TermKind::Skip, vec![source, count]))
    }
}

impl<S: SequenceQuery> SequenceQuery for Skip<S> {
    type Item = S::Item;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Limit<S> {
    source: S,
    count: i64,
}

impl<S: SequenceQuery> Limit<S> {
    pub(crate) const fn new(source: S, count: i64) -> Self {
        Self { source, count }
    }
}

impl<S: SequenceQuery> Query for Limit<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let count = ctx.literal(&Value::Int(self.count))?;

        Ok(ctx.node(TermKind::Limit, vec![source, count]))
    }
}

impl<S: SequenceQuery> SequenceQuery for Limit<S> {
    type Item = S::Item;
}

///
/// Slice
///
/// Without an end index the slice is open-ended; no end is invented
/// locally, the remote engine decides what an omitted end means.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Slice<S> {
    source: S,
    start: i64,
    end: Option<i64>,
}

impl<S: SequenceQuery> Slice<S> {
    pub(crate) const fn new(source: S, start: i64, end: Option<i64>) -> Self {
        Self { source, start, end }
    }
}

impl<S: SequenceQuery> Query for Slice<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let mut args = vec![
            self.source.build_term(ctx)?,
            ctx.literal(&Value::Int(self.start))?,
        ];
        if let Some(end) = self.end {
            args.push(ctx.literal(&Value::Int(end))?);
        }

        Ok(ctx.node(TermKind::Slice, args))
    }
}

impl<S: SequenceQuery> SequenceQuery for Slice<S> {
    type Item = S::Item;
}

/// Single element at an index.
#[derive(Clone, Debug, PartialEq)]
pub struct Nth<S> {
    source: S,
    index: i64,
}

impl<S: SequenceQuery> Nth<S> {
    pub(crate) const fn new(source: S, index: i64) -> Self {
        Self { source, index }
    }
}

impl<S: SequenceQuery> Query for Nth<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let index = ctx.literal(&Value::Int(self.index))?;

        Ok(ctx.node(TermKind::Nth, vec![source, index]))
    }
}

impl<S: SequenceQuery> SingleObjectQuery for Nth<S> {}

// ----------------------------------------------------------------------
// Set operations and aggregates
// ----------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Distinct<S> {
    source: S,
}

impl<S: SequenceQuery> Distinct<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SequenceQuery> Query for Distinct<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        Ok(ctx.node(TermKind::Distinct, vec![source]))
    }
}

impl<S: SequenceQuery> SequenceQuery for Distinct<S> {
    type Item = S::Item;
}

/// Number of elements; a scalar result.
#[derive(Clone, Debug, PartialEq)]
pub struct Count<S> {
    source: S,
}

impl<S: SequenceQuery> Count<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SequenceQuery> Query for Count<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        Ok(ctx.node(TermKind::Count, vec![source]))
    }
}

impl<S: SequenceQuery> SingleObjectQuery for Count<S> {}

///
/// Union
/// Concatenation of two sequences with the same element shape.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Union<A, B> {
    first: A,
    second: B,
}

impl<A, B> Union<A, B>
where
    A: SequenceQuery,
    B: SequenceQuery<Item = A::Item>,
{
    pub(crate) const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Query for Union<A, B>
where
    A: SequenceQuery,
    B: SequenceQuery<Item = A::Item>,
{
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let first = self.first.build_term(ctx)?;
        let second = self.second.build_term(ctx)?;

        Ok(ctx.node(TermKind::Union, vec![first, second]))
    }
}

impl<A, B> SequenceQuery for Union<A, B>
where
    A: SequenceQuery,
    B: SequenceQuery<Item = A::Item>,
{
    type Item = A::Item;
}

///
/// Reduce
///
/// Fold with a binary function. Without a base the first element seeds the
/// fold: `f(f(x1, x2), x3)`; with one, the base does: `f(f(f(b, x1), x2), x3)`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Reduce<S> {
    source: S,
    function: Func,
    base: Option<Value>,
}

impl<S: SequenceQuery> Reduce<S> {
    pub(crate) const fn new(source: S, function: Func) -> Self {
        Self {
            source,
            function,
            base: None,
        }
    }

    /// Seed the fold with an explicit base value.
    #[must_use]
    pub fn base(mut self, base: impl Into<Value>) -> Self {
        self.base = Some(base.into());
        self
    }
}

impl<S: SequenceQuery> Query for Reduce<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let function = self.function.to_term(ctx)?;
        let base = self.base.as_ref().map(|b| ctx.literal(b)).transpose()?;

        Ok(ctx
            .node(TermKind::Reduce, vec![source, function])
            .with_optional("base", base))
    }
}

impl<S: SequenceQuery> SingleObjectQuery for Reduce<S> {}
