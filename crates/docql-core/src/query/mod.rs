//! Module: query
//! Responsibility: immutable query nodes, the capability traits that gate
//! which combinators may follow which, and the term-generation walk.
//! Does not own: expression translation (`expr`) or literal conversion
//! (`term::DatumConverterFactory`).
//! Boundary: a combinator is only offered where its source capability is
//! present; illegal chains do not type-check.

mod access;
mod ext;
mod group;
mod join;
mod order;
mod root;
mod sequence;
mod write;


pub use access::{Between, Bound, Get, GetAll, PrimaryKey};
pub use ext::{MutableSingleObjectExt, SequenceExt};
pub use group::{
    AvgReduction, CountReduction, GroupBy, GroupedMapReduce, SumReduction, avg, count, sum,
};
pub use join::{EqJoin, InnerJoin, OuterJoin, Zip};
pub use order::{OrderBy, OrderDirection, OrderKey, OrderSpec};
pub use root::{
    Db, DbCreate, DbDrop, DbList, IndexCreate, IndexDrop, IndexList, Literal, LiteralSeq, Now,
    Table, TableCreate, TableDrop, TableList, db, db_create, db_drop, db_list, literal,
    literal_seq, now, table,
};
pub use sequence::{
    ConcatMap, Count, Distinct, Filter, Limit, Map, Nth, Reduce, Skip, Slice, Union,
};
pub use write::{
    Delete, DeleteAndReturn, Insert, Replace, ReplaceAndReturn, Update, UpdateAndReturn,
};

use crate::{
    error::TermError,
    term::{DatumConverterFactory, Term, TermContext},
};
use std::{fmt, marker::PhantomData};
use tracing::debug;

///
/// Query
///
/// A pipeline so far. Every node can generate its term; it does so by
/// generating its source term(s) first and wrapping them with its own
/// operands.
///

pub trait Query: fmt::Debug {
    /// Append this node's term to an in-progress generation walk.
    fn build_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError>;

    /// Generate a fresh term for this chain.
    ///
    /// Each call starts a new walk, so the same chain always yields
    /// structurally equal output for the same converter.
    fn generate_term(&self, converter: &dyn DatumConverterFactory) -> Result<Term, TermError> {
        let mut ctx = TermContext::new(converter);
        let term = self
            .build_term(&mut ctx)
            .inspect_err(|err| debug!(error = %err, "term generation failed"))?;

        debug!(kind = ?term.kind(), nodes = term.node_count(), "term generated");

        Ok(term)
    }
}

///
/// SequenceQuery
///
/// Zero or more items. `Item` is a marker describing the element shape,
/// used to gate element-specific combinators such as `zip`.
///

pub trait SequenceQuery: Query {
    type Item;
}

/// Exactly one addressable item.
pub trait SingleObjectQuery: Query {}

/// A single item that may also be updated, replaced or deleted in place.
pub trait MutableSingleObjectQuery: SingleObjectQuery {}

/// A mutation whose result is a write summary rather than data.
pub trait WriteQuery: Query {}

///
/// GroupReduction
///
/// Reduction descriptor usable inside `group_by`. Not a query: it only
/// contributes the reduction-object portion of a term.
///

pub trait GroupReduction: fmt::Debug {
    fn build_reduction(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError>;
}

// ----------------------------------------------------------------------
// Element markers
// ----------------------------------------------------------------------

///
/// Document
/// Element marker for untyped documents.
///

#[derive(Clone, Copy, Debug)]
pub struct Document;

///
/// Pair
/// Element marker for join output: a left and a right element.
///

#[derive(Clone, Copy, Debug)]
pub struct Pair<L, R>(PhantomData<(L, R)>);

/// Implemented only by `Pair`; gates `zip`.
pub trait Paired {}

impl<L, R> Paired for Pair<L, R> {}
