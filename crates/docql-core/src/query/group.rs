//! Grouping: reduction descriptors and the grouped query nodes that use them.

use crate::{
    error::TermError,
    expr::{Expr, Func},
    query::{Document, GroupReduction, Query, SequenceQuery},
    term::{Datum, Term, TermContext, TermKind},
    value::Value,
};

/// Count the elements of each group.
#[must_use]
pub const fn count() -> CountReduction {
    CountReduction
}

/// Sum a numeric member over each group.
#[must_use]
pub fn sum(member: impl FnOnce(Expr) -> Expr) -> SumReduction {
    SumReduction {
        member: Func::unary(member),
    }
}

/// Average a numeric member over each group.
#[must_use]
pub fn avg(member: impl FnOnce(Expr) -> Expr) -> AvgReduction {
    AvgReduction {
        member: Func::unary(member),
    }
}

// Reduction objects are single-entry objects keyed by the reduction name.
fn reduction_object(name: &str, value: Term) -> Term {
    Term::apply(TermKind::MakeObj, Vec::new()).with_optarg(name, value)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CountReduction;

impl GroupReduction for CountReduction {
    fn build_reduction(&self, _ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        Ok(reduction_object("COUNT", Term::datum(Datum::Bool(true))))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SumReduction {
    member: Func,
}

impl GroupReduction for SumReduction {
    fn build_reduction(&self, _ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let member = self.member.member_term("sum reduction")?;
        Ok(reduction_object("SUM", member))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AvgReduction {
    member: Func,
}

impl GroupReduction for AvgReduction {
    fn build_reduction(&self, _ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let member = self.member.member_term("avg reduction")?;
        Ok(reduction_object("AVG", member))
    }
}

///
/// GroupBy
///
/// Groups by a computed key and applies a prebuilt reduction per group.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GroupBy<S, G> {
    source: S,
    reduction: G,
    key: Func,
}

impl<S: SequenceQuery, G: GroupReduction> GroupBy<S, G> {
    pub(crate) const fn new(source: S, reduction: G, key: Func) -> Self {
        Self {
            source,
            reduction,
            key,
        }
    }
}

impl<S: SequenceQuery, G: GroupReduction> Query for GroupBy<S, G> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let key = self.key.to_term(ctx)?;
        let reduction = self.reduction.build_reduction(ctx)?;

        Ok(ctx.node(TermKind::GroupBy, vec![source, key, reduction]))
    }
}

impl<S: SequenceQuery, G: GroupReduction> SequenceQuery for GroupBy<S, G> {
    type Item = Document;
}

///
/// GroupedMapReduce
///
/// Groups by a key, maps each element, then folds the mapped values of
/// each group, optionally from a base.
///

#[derive(Clone, Debug, PartialEq)]
pub struct GroupedMapReduce<S> {
    source: S,
    grouping: Func,
    mapping: Func,
    reduction: Func,
    base: Option<Value>,
}

impl<S: SequenceQuery> GroupedMapReduce<S> {
    pub(crate) const fn new(source: S, grouping: Func, mapping: Func, reduction: Func) -> Self {
        Self {
            source,
            grouping,
            mapping,
            reduction,
            base: None,
        }
    }

    #[must_use]
    pub fn base(mut self, base: impl Into<Value>) -> Self {
        self.base = Some(base.into());
        self
    }
}

impl<S: SequenceQuery> Query for GroupedMapReduce<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let grouping = self.grouping.to_term(ctx)?;
        let mapping = self.mapping.to_term(ctx)?;
        let reduction = self.reduction.to_term(ctx)?;
        let base = self.base.as_ref().map(|b| ctx.literal(b)).transpose()?;

        Ok(ctx
            .node(
                TermKind::GroupedMapReduce,
                vec![source, grouping, mapping, reduction],
            )
            .with_optional("base", base))
    }
}

impl<S: SequenceQuery> SequenceQuery for GroupedMapReduce<S> {
    type Item = Document;
}
