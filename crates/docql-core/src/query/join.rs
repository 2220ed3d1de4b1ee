//! Binary sequence operations that pair elements of two sequences.

use crate::{
    error::TermError,
    expr::Func,
    query::{Document, Pair, Paired, Query, SequenceQuery},
    term::{Datum, Term, TermContext, TermKind},
};

///
/// InnerJoin
///
/// Pairs every left/right combination for which the predicate holds.
///

#[derive(Clone, Debug, PartialEq)]
pub struct InnerJoin<L, R> {
    left: L,
    right: R,
    predicate: Func,
}

impl<L: SequenceQuery, R: SequenceQuery> InnerJoin<L, R> {
    pub(crate) const fn new(left: L, right: R, predicate: Func) -> Self {
        Self {
            left,
            right,
            predicate,
        }
    }
}

impl<L: SequenceQuery, R: SequenceQuery> Query for InnerJoin<L, R> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let left = self.left.build_term(ctx)?;
        let right = self.right.build_term(ctx)?;
        let predicate = self.predicate.to_term(ctx)?;

        Ok(ctx.node(TermKind::InnerJoin, vec![left, right, predicate]))
    }
}

impl<L: SequenceQuery, R: SequenceQuery> SequenceQuery for InnerJoin<L, R> {
    type Item = Pair<L::Item, R::Item>;
}

///
/// OuterJoin
///
/// Like `InnerJoin`, but every left element is kept; left elements with no
/// match are paired with an absent right value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct OuterJoin<L, R> {
    left: L,
    right: R,
    predicate: Func,
}

impl<L: SequenceQuery, R: SequenceQuery> OuterJoin<L, R> {
    pub(crate) const fn new(left: L, right: R, predicate: Func) -> Self {
        Self {
            left,
            right,
            predicate,
        }
    }
}

impl<L: SequenceQuery, R: SequenceQuery> Query for OuterJoin<L, R> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let left = self.left.build_term(ctx)?;
        let right = self.right.build_term(ctx)?;
        let predicate = self.predicate.to_term(ctx)?;

        Ok(ctx.node(TermKind::OuterJoin, vec![left, right, predicate]))
    }
}

impl<L: SequenceQuery, R: SequenceQuery> SequenceQuery for OuterJoin<L, R> {
    type Item = Pair<L::Item, R::Item>;
}

///
/// EqJoin
///
/// Equality-only join: a left member is looked up against the right
/// sequence's primary key, or a named secondary index.
///

#[derive(Clone, Debug, PartialEq)]
pub struct EqJoin<L, R> {
    left: L,
    left_member: Func,
    right: R,
    index: Option<String>,
}

impl<L: SequenceQuery, R: SequenceQuery> EqJoin<L, R> {
    pub(crate) const fn new(left: L, left_member: Func, right: R) -> Self {
        Self {
            left,
            left_member,
            right,
            index: None,
        }
    }

    /// Match against a secondary index of the right sequence.
    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

impl<L: SequenceQuery, R: SequenceQuery> Query for EqJoin<L, R> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let left = self.left.build_term(ctx)?;
        let member = self.left_member.member_term("eq_join left member")?;
        let right = self.right.build_term(ctx)?;
        let index = self
            .index
            .as_deref()
            .map(|index| Term::datum(Datum::string(index)));

        Ok(ctx
            .node(TermKind::EqJoin, vec![left, member, right])
            .with_optional("index", index))
    }
}

impl<L: SequenceQuery, R: SequenceQuery> SequenceQuery for EqJoin<L, R> {
    type Item = Pair<L::Item, R::Item>;
}

///
/// Zip
/// Merges each left/right pair into a single document.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Zip<S> {
    source: S,
}

impl<S> Zip<S>
where
    S: SequenceQuery,
    S::Item: Paired,
{
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S> Query for Zip<S>
where
    S: SequenceQuery,
    S::Item: Paired,
{
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        Ok(ctx.node(TermKind::Zip, vec![source]))
    }
}

impl<S> SequenceQuery for Zip<S>
where
    S: SequenceQuery,
    S::Item: Paired,
{
    type Item = Document;
}
