use crate::{
    error::TermError,
    expr::{Expr, Func},
    query::{Query, SequenceQuery},
    term::{Datum, Term, TermContext, TermKind},
};
use derive_more::{Deref, IntoIterator};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    const fn term_kind(self) -> TermKind {
        match self {
            Self::Asc => TermKind::Asc,
            Self::Desc => TermKind::Desc,
        }
    }
}

///
/// OrderKey
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrderKey {
    pub selector: Func,
    pub direction: OrderDirection,
}

impl OrderKey {
    // Member selectors go on the wire by name; anything else as a function.
    fn to_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let key = match self.selector.member_name() {
            Some(name) => Term::datum(Datum::string(name)),
            None => self.selector.to_term(ctx)?,
        };

        Ok(Term::apply(self.direction.term_kind(), vec![key]))
    }
}

///
/// OrderSpec
///
/// Sort keys, primary first. Keys are only ever appended.
///

#[derive(Clone, Debug, Deref, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct OrderSpec {
    keys: Vec<OrderKey>,
}

impl OrderSpec {
    #[must_use]
    pub fn new(first: OrderKey) -> Self {
        Self { keys: vec![first] }
    }

    /// A new spec with `key` appended; `self` is left as it was.
    #[must_use]
    pub fn appended(&self, key: OrderKey) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend(self.keys.iter().cloned());
        keys.push(key);

        Self { keys }
    }

    #[must_use]
    pub fn directions(&self) -> Vec<OrderDirection> {
        self.keys.iter().map(|key| key.direction).collect()
    }
}

///
/// OrderBy
///

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy<S> {
    source: S,
    order: OrderSpec,
}

impl<S: SequenceQuery> OrderBy<S> {
    pub(crate) fn new(source: S, selector: Func, direction: OrderDirection) -> Self {
        Self {
            source,
            order: OrderSpec::new(OrderKey {
                selector,
                direction,
            }),
        }
    }

    /// Append a secondary sort key.
    #[must_use]
    pub fn then_by(self, selector: impl FnOnce(Expr) -> Expr, direction: OrderDirection) -> Self {
        let order = self.order.appended(OrderKey {
            selector: Func::unary(selector),
            direction,
        });

        Self {
            source: self.source,
            order,
        }
    }

    #[must_use]
    pub fn then_by_desc(self, selector: impl FnOnce(Expr) -> Expr) -> Self {
        self.then_by(selector, OrderDirection::Desc)
    }

    #[must_use]
    pub const fn order(&self) -> &OrderSpec {
        &self.order
    }
}

impl<S: SequenceQuery> Query for OrderBy<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let mut args = Vec::with_capacity(self.order.len() + 1);
        args.push(self.source.build_term(ctx)?);
        for key in &self.order {
            args.push(key.to_term(ctx)?);
        }

        Ok(ctx.node(TermKind::OrderBy, args))
    }
}

impl<S: SequenceQuery> SequenceQuery for OrderBy<S> {
    type Item = S::Item;
}
