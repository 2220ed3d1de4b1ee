//! Module: term
//! Responsibility: the AST artifact handed to the transport layer, plus the
//! converter boundary and the per-generation context.
//! Does not own: wire encoding, connections, or response decoding.

mod context;
mod convert;
mod datum;
mod fingerprint;

#[cfg(test)]
mod tests;

pub use context::TermContext;
pub use convert::{
    ConvertError, ConverterConfig, DEFAULT_MAX_DEPTH, DatumConverterFactory,
    DefaultConverterFactory,
};
pub use datum::Datum;
pub use fingerprint::TermFingerprint;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// TermKind
///
/// One tag per AST node kind. Discriminants are the stable wire tags;
/// existing values must never be renumbered.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[repr(u16)]
pub enum TermKind {
    Datum = 1,
    MakeArray = 2,
    MakeObj = 3,
    Var = 10,
    Db = 14,
    Table = 15,
    Get = 16,
    Eq = 17,
    Ne = 18,
    Lt = 19,
    Le = 20,
    Gt = 21,
    Ge = 22,
    Not = 23,
    Add = 24,
    Sub = 25,
    Mul = 26,
    Div = 27,
    Mod = 28,
    Append = 29,
    Slice = 30,
    GetField = 31,
    HasFields = 32,
    Between = 36,
    Reduce = 37,
    Map = 38,
    Filter = 39,
    ConcatMap = 40,
    OrderBy = 41,
    Distinct = 42,
    Count = 43,
    Union = 44,
    Nth = 45,
    GroupedMapReduce = 46,
    GroupBy = 47,
    InnerJoin = 48,
    OuterJoin = 49,
    EqJoin = 50,
    CoerceTo = 51,
    TypeOf = 52,
    Update = 53,
    Delete = 54,
    Replace = 55,
    Insert = 56,
    DbCreate = 57,
    DbDrop = 58,
    DbList = 59,
    TableCreate = 60,
    TableDrop = 61,
    TableList = 62,
    Or = 66,
    And = 67,
    Func = 69,
    Skip = 70,
    Limit = 71,
    Zip = 72,
    Asc = 73,
    Desc = 74,
    IndexCreate = 75,
    IndexDrop = 76,
    IndexList = 77,
    GetAll = 78,
    Default = 92,
    Contains = 93,
    Keys = 94,
    Match = 97,
    Now = 103,
    Upcase = 141,
    Downcase = 142,
}

impl TermKind {
    #[must_use]
    pub const fn tag(self) -> u16 {
        self as u16
    }
}

///
/// Term
///
/// Immutable AST node. A `Datum` leaf carries a converted literal; every
/// other node is an operation applied to positional args and named
/// optargs. Optargs are kept sorted by name so that equal chains always
/// produce structurally equal terms.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Term {
    Datum(Datum),
    Apply {
        kind: TermKind,
        args: Vec<Self>,
        optargs: BTreeMap<String, Self>,
    },
}

impl Term {
    #[must_use]
    pub const fn datum(datum: Datum) -> Self {
        Self::Datum(datum)
    }

    /// Operation node with positional args and no optargs.
    #[must_use]
    pub const fn apply(kind: TermKind, args: Vec<Self>) -> Self {
        Self::Apply {
            kind,
            args,
            optargs: BTreeMap::new(),
        }
    }

    /// Attach a named optarg. Has no effect on datum leaves.
    #[must_use]
    pub fn with_optarg(mut self, name: impl Into<String>, value: Self) -> Self {
        if let Self::Apply { optargs, .. } = &mut self {
            optargs.insert(name.into(), value);
        }
        self
    }

    /// Attach a named optarg only when a value is present.
    #[must_use]
    pub fn with_optional(self, name: &str, value: Option<Self>) -> Self {
        match value {
            Some(value) => self.with_optarg(name, value),
            None => self,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TermKind {
        match self {
            Self::Datum(_) => TermKind::Datum,
            Self::Apply { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub fn args(&self) -> &[Self] {
        match self {
            Self::Datum(_) => &[],
            Self::Apply { args, .. } => args,
        }
    }

    #[must_use]
    pub fn optarg(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Datum(_) => None,
            Self::Apply { optargs, .. } => optargs.get(name),
        }
    }

    #[must_use]
    pub const fn as_datum(&self) -> Option<&Datum> {
        match self {
            Self::Datum(datum) => Some(datum),
            Self::Apply { .. } => None,
        }
    }

    /// Total number of nodes in this tree, optargs included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Datum(_) => 1,
            Self::Apply { args, optargs, .. } => {
                1 + args.iter().map(Self::node_count).sum::<usize>()
                    + optargs.values().map(Self::node_count).sum::<usize>()
            }
        }
    }
}
