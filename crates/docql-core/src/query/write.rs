//! Write nodes. Bulk forms wrap a sequence; single-object forms wrap a
//! mutable single object. The `*AndReturn` variants exist only for the
//! latter, since a bulk write has no single old or new value to return.

use crate::{
    error::TermError,
    expr::Func,
    query::{MutableSingleObjectQuery, Query, WriteQuery, root::Table},
    term::{Datum, Term, TermContext, TermKind},
    value::Value,
};

fn flag(term: Term, name: &str, enabled: bool) -> Term {
    if enabled {
        term.with_optarg(name, Term::datum(Datum::Bool(true)))
    } else {
        term
    }
}

///
/// Update
///
/// Merge the result of a function of the old value into each targeted item.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Update<S> {
    source: S,
    function: Func,
    non_atomic: bool,
}

impl<S: Query> Update<S> {
    pub(crate) const fn new(source: S, function: Func) -> Self {
        Self {
            source,
            function,
            non_atomic: false,
        }
    }

    /// Allow the update function to be evaluated non-atomically.
    #[must_use]
    pub const fn non_atomic(mut self) -> Self {
        self.non_atomic = true;
        self
    }
}

impl<S: Query> Query for Update<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let function = self.function.to_term(ctx)?;
        let term = ctx.node(TermKind::Update, vec![source, function]);

        Ok(flag(term, "non_atomic", self.non_atomic))
    }
}

impl<S: Query> WriteQuery for Update<S> {}

/// Update a single object and return its old and new values.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateAndReturn<S> {
    source: S,
    function: Func,
    non_atomic: bool,
}

impl<S: MutableSingleObjectQuery> UpdateAndReturn<S> {
    pub(crate) const fn new(source: S, function: Func) -> Self {
        Self {
            source,
            function,
            non_atomic: false,
        }
    }

    #[must_use]
    pub const fn non_atomic(mut self) -> Self {
        self.non_atomic = true;
        self
    }
}

impl<S: MutableSingleObjectQuery> Query for UpdateAndReturn<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let function = self.function.to_term(ctx)?;
        let term = ctx.node(TermKind::Update, vec![source, function]);
        let term = flag(term, "non_atomic", self.non_atomic);

        Ok(flag(term, "return_vals", true))
    }
}

impl<S: MutableSingleObjectQuery> WriteQuery for UpdateAndReturn<S> {}

///
/// Replace
///
/// Replace a whole object with a literal value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Replace<S> {
    source: S,
    value: Value,
    non_atomic: bool,
}

impl<S: MutableSingleObjectQuery> Replace<S> {
    pub(crate) const fn new(source: S, value: Value) -> Self {
        Self {
            source,
            value,
            non_atomic: false,
        }
    }

    #[must_use]
    pub const fn non_atomic(mut self) -> Self {
        self.non_atomic = true;
        self
    }
}

impl<S: MutableSingleObjectQuery> Query for Replace<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let value = ctx.literal(&self.value)?;
        let term = ctx.node(TermKind::Replace, vec![source, value]);

        Ok(flag(term, "non_atomic", self.non_atomic))
    }
}

impl<S: MutableSingleObjectQuery> WriteQuery for Replace<S> {}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceAndReturn<S> {
    source: S,
    value: Value,
    non_atomic: bool,
}

impl<S: MutableSingleObjectQuery> ReplaceAndReturn<S> {
    pub(crate) const fn new(source: S, value: Value) -> Self {
        Self {
            source,
            value,
            non_atomic: false,
        }
    }

    #[must_use]
    pub const fn non_atomic(mut self) -> Self {
        self.non_atomic = true;
        self
    }
}

impl<S: MutableSingleObjectQuery> Query for ReplaceAndReturn<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let value = ctx.literal(&self.value)?;
        let term = ctx.node(TermKind::Replace, vec![source, value]);
        let term = flag(term, "non_atomic", self.non_atomic);

        Ok(flag(term, "return_vals", true))
    }
}

impl<S: MutableSingleObjectQuery> WriteQuery for ReplaceAndReturn<S> {}

///
/// Delete
///

#[derive(Clone, Debug, PartialEq)]
pub struct Delete<S> {
    source: S,
}

impl<S: Query> Delete<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Query> Query for Delete<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        Ok(ctx.node(TermKind::Delete, vec![source]))
    }
}

impl<S: Query> WriteQuery for Delete<S> {}

/// Delete a single object and return its old value.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteAndReturn<S> {
    source: S,
}

impl<S: MutableSingleObjectQuery> DeleteAndReturn<S> {
    pub(crate) const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: MutableSingleObjectQuery> Query for DeleteAndReturn<S> {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let source = self.source.build_term(ctx)?;
        let term = ctx.node(TermKind::Delete, vec![source]);

        Ok(flag(term, "return_vals", true))
    }
}

impl<S: MutableSingleObjectQuery> WriteQuery for DeleteAndReturn<S> {}

///
/// Insert
///

#[derive(Clone, Debug, PartialEq)]
pub struct Insert {
    table: Table,
    value: Value,
    upsert: bool,
}

impl Insert {
    pub(crate) const fn new(table: Table, value: Value) -> Self {
        Self {
            table,
            value,
            upsert: false,
        }
    }

    /// Overwrite existing documents with the same primary key.
    #[must_use]
    pub const fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }
}

impl Query for Insert {
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let table = self.table.build_term(ctx)?;
        let value = ctx.literal(&self.value)?;
        let term = ctx.node(TermKind::Insert, vec![table, value]);

        Ok(flag(term, "upsert", self.upsert))
    }
}

impl WriteQuery for Insert {}
