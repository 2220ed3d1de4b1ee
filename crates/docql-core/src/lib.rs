//! Core of docql: immutable query chains over a remote document engine,
//! symbolic expressions for caller logic, and generation of the term tree
//! that a transport layer serializes.
//!
//! Nothing here talks to a server. A chain is built from plain values and
//! turned into a [`term::Term`] on demand; connections, wire encoding and
//! response decoding live elsewhere.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod expr;
pub mod query;
pub mod term;
pub mod value;

pub use error::TermError;

///
/// Prelude
///
/// Chain-building vocabulary. Combinator traits come in as `_` so their
/// methods are callable without claiming the names.
///

pub mod prelude {
    pub use crate::{
        expr::{Expr, Func},
        query::{
            Bound, MutableSingleObjectExt as _, OrderDirection, Query, SequenceExt as _, avg,
            count, db, db_create, db_drop, db_list, literal, literal_seq, now, sum, table,
        },
        term::{DefaultConverterFactory, Term},
        value::Value,
    };
}
