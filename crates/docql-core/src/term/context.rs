use crate::{
    error::TermError,
    expr::Param,
    term::{ConvertError, DatumConverterFactory, Term, TermKind},
    value::Value,
};
use tracing::trace;

///
/// TermContext
///
/// State for one term-generation walk: the converter collaborator, the
/// function-variable allocator and the stack of parameters currently in
/// scope. Variable ids are handed out in traversal order, so walking the
/// same chain twice yields identical ids.
///

pub struct TermContext<'a> {
    converter: &'a dyn DatumConverterFactory,
    next_var: u64,
    scopes: Vec<(Param, u64)>,
}

impl<'a> TermContext<'a> {
    #[must_use]
    pub fn new(converter: &'a dyn DatumConverterFactory) -> Self {
        Self {
            converter,
            next_var: 1,
            scopes: Vec::new(),
        }
    }

    #[must_use]
    pub fn converter(&self) -> &'a dyn DatumConverterFactory {
        self.converter
    }

    /// Convert a literal operand into a datum leaf.
    ///
    /// Every kind in the value, nested list items and map entries included,
    /// must be supported before the converter is asked to convert anything.
    pub fn literal(&self, value: &Value) -> Result<Term, TermError> {
        let mut pending = vec![value];
        while let Some(current) = pending.pop() {
            let kind = current.kind();
            if !self.converter.supports(kind) {
                return Err(ConvertError::unsupported(kind).into());
            }

            match current {
                Value::List(items) => pending.extend(items.iter().rev()),
                Value::Map(entries) => {
                    for (key, item) in entries.iter().rev() {
                        pending.push(item);
                        pending.push(key);
                    }
                }
                _ => {}
            }
        }

        Ok(Term::datum(self.converter.convert(value)?))
    }

    /// Build an operation node for a query combinator.
    pub(crate) fn node(&self, kind: TermKind, args: Vec<Term>) -> Term {
        trace!(kind = ?kind, args = args.len(), "generated term node");

        Term::apply(kind, args)
    }

    pub(crate) const fn fresh_var(&mut self) -> u64 {
        let id = self.next_var;
        self.next_var += 1;
        id
    }

    /// Allocate a variable for each parameter and bring them into scope.
    /// Returns the allocated ids in parameter order.
    pub(crate) fn enter_scope(&mut self, params: &[Param]) -> Vec<u64> {
        params
            .iter()
            .map(|param| {
                let var = self.fresh_var();
                self.scopes.push((*param, var));
                var
            })
            .collect()
    }

    /// Drop the innermost `count` bindings.
    pub(crate) fn exit_scope(&mut self, count: usize) {
        let keep = self.scopes.len().saturating_sub(count);
        self.scopes.truncate(keep);
    }

    /// Variable bound to `param`, innermost binding first.
    pub(crate) fn resolve(&self, param: Param) -> Option<u64> {
        self.scopes
            .iter()
            .rev()
            .find(|(bound, _)| *bound == param)
            .map(|(_, var)| *var)
    }
}
