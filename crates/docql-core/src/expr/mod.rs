//! Module: expr
//! Responsibility: symbolic capture of caller logic (predicates, projections,
//! reductions, selectors) as data.
//! Does not own: evaluation. Expressions are never run locally; they are
//! translated into terms and evaluated by the remote engine.
//!
//! Callers build expressions through closures over symbolic parameters:
//!
//! ```ignore
//! table("users").filter(|u| u.get("active").eq(true))
//! ```
//!
//! The closure runs once, at the call site, over `Expr::Param` placeholders;
//! the resulting tree is what gets captured. Every placeholder carries an
//! identity unique to the process, so a closure nested inside another (for
//! example in a subquery filter) can still name the outer row.

mod translate;

#[cfg(test)]
mod tests;

use crate::{query::Query, value::Value};
use std::{
    fmt,
    ops::{Add, BitAnd, BitOr, Div, Mul, Not, Rem, Sub},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

///
/// ArithOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

///
/// Expr
///
/// Restricted expression vocabulary. Translation into terms is structural
/// and total over these shapes, except for `Call`, whose name must be one
/// of the recognized remote functions, and `Param`, which must be declared
/// by an enclosing function.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Parameter declared by an enclosing function.
    Param(Param),
    Literal(Value),
    Field {
        target: Box<Self>,
        name: String,
    },
    Compare {
        op: CompareOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Array(Vec<Self>),
    Object(Vec<(String, Self)>),
    /// Named remote function; resolved during translation.
    Call {
        name: String,
        args: Vec<Self>,
    },
    Subquery(Subquery),
}

impl Expr {
    #[must_use]
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn array<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Self>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn object<I, K, E>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Self>,
    {
        Self::Object(
            members
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn call<I, E>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Self>,
    {
        Self::Call {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Embed a whole query as a value inside an expression.
    #[must_use]
    pub fn subquery<Q>(query: Q) -> Self
    where
        Q: Query + Send + Sync + 'static,
    {
        Self::Subquery(Subquery(Arc::new(query)))
    }

    // ------------------------------------------------------------------
    // Member access
    // ------------------------------------------------------------------

    /// Member access: `self.name`.
    #[must_use]
    pub fn get(self, name: impl Into<String>) -> Self {
        Self::Field {
            target: Box::new(self),
            name: name.into(),
        }
    }

    // ------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------

    #[must_use]
    pub fn eq(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Eq, rhs.into())
    }

    #[must_use]
    pub fn ne(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Ne, rhs.into())
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Lt, rhs.into())
    }

    #[must_use]
    pub fn le(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Le, rhs.into())
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Gt, rhs.into())
    }

    #[must_use]
    pub fn ge(self, rhs: impl Into<Self>) -> Self {
        self.compare(CompareOp::Ge, rhs.into())
    }

    // ------------------------------------------------------------------
    // Boolean
    // ------------------------------------------------------------------

    #[must_use]
    pub fn and(self, rhs: impl Into<Self>) -> Self {
        Self::And(vec![self, rhs.into()])
    }

    #[must_use]
    pub fn or(self, rhs: impl Into<Self>) -> Self {
        Self::Or(vec![self, rhs.into()])
    }

    // ------------------------------------------------------------------
    // Recognized remote functions
    // ------------------------------------------------------------------

    #[must_use]
    pub fn contains(self, item: impl Into<Self>) -> Self {
        Self::call("contains", [self, item.into()])
    }

    #[must_use]
    pub fn count(self) -> Self {
        Self::call("count", [self])
    }

    #[must_use]
    pub fn upcase(self) -> Self {
        Self::call("upcase", [self])
    }

    #[must_use]
    pub fn downcase(self) -> Self {
        Self::call("downcase", [self])
    }

    /// Regular-expression match, evaluated remotely.
    #[must_use]
    pub fn matches(self, pattern: impl Into<String>) -> Self {
        Self::call("match", [self, Self::lit(pattern.into())])
    }

    #[must_use]
    pub fn append(self, item: impl Into<Self>) -> Self {
        Self::call("append", [self, item.into()])
    }

    /// Substitute `fallback` when `self` is missing or null.
    #[must_use]
    pub fn default_to(self, fallback: impl Into<Self>) -> Self {
        Self::call("default", [self, fallback.into()])
    }

    #[must_use]
    pub fn has_field(self, name: impl Into<String>) -> Self {
        Self::call("has_fields", [self, Self::lit(name.into())])
    }

    fn compare(self, op: CompareOp, rhs: Self) -> Self {
        Self::Compare {
            op,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }

    fn arith(self, op: ArithOp, rhs: Self) -> Self {
        Self::Arith {
            op,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }
}

// ----------------------------------------------------------------------
// Operator sugar
// ----------------------------------------------------------------------

macro_rules! impl_arith_op {
    ( $( $trait:ident :: $method:ident => $op:ident ),* $(,)? ) => {
        $(
            impl<R: Into<Expr>> $trait<R> for Expr {
                type Output = Self;

                fn $method(self, rhs: R) -> Self::Output {
                    self.arith(ArithOp::$op, rhs.into())
                }
            }
        )*
    };
}

impl_arith_op! {
    Add::add => Add,
    Sub::sub => Sub,
    Mul::mul => Mul,
    Div::div => Div,
    Rem::rem => Mod,
}

impl<R: Into<Expr>> BitAnd<R> for Expr {
    type Output = Self;

    fn bitand(self, rhs: R) -> Self::Output {
        self.and(rhs)
    }
}

impl<R: Into<Expr>> BitOr<R> for Expr {
    type Output = Self;

    fn bitor(self, rhs: R) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

macro_rules! impl_from_for_expr {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl From<$type> for Expr {
                fn from(v: $type) -> Self {
                    Self::Literal(v.into())
                }
            }
        )*
    };
}

impl_from_for_expr!(bool, f64, i32, i64, u32, u64, usize, String, &str, Value);

///
/// Subquery
///
/// A query embedded in an expression. Compared by identity.
///

#[derive(Clone)]
pub struct Subquery(Arc<dyn Query + Send + Sync>);

impl Subquery {
    #[must_use]
    pub fn query(&self) -> &(dyn Query + Send + Sync) {
        self.0.as_ref()
    }
}

impl fmt::Debug for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subquery").field(&self.0).finish()
    }
}

impl PartialEq for Subquery {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

///
/// Param
///
/// Identity of one captured function parameter. Ids come from a process-wide
/// counter and are never reused; the wire variable a parameter becomes is
/// decided later, per generation walk.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Param(u64);

impl Param {
    #[must_use]
    pub fn fresh() -> Self {
        static NEXT_PARAM: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_PARAM.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl From<Param> for Expr {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}

///
/// Func
///
/// A captured function: its declared parameters plus a body over them.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Func {
    params: Vec<Param>,
    body: Expr,
}

impl Func {
    #[must_use]
    pub const fn new(params: Vec<Param>, body: Expr) -> Self {
        Self { params, body }
    }

    /// Capture a single-parameter function.
    #[must_use]
    pub fn unary(f: impl FnOnce(Expr) -> Expr) -> Self {
        let row = Param::fresh();
        Self::new(vec![row], f(row.into()))
    }

    /// Capture a two-parameter function.
    #[must_use]
    pub fn binary(f: impl FnOnce(Expr, Expr) -> Expr) -> Self {
        let (left, right) = (Param::fresh(), Param::fresh());
        Self::new(vec![left, right], f(left.into(), right.into()))
    }

    /// Selector for a single top-level member.
    #[must_use]
    pub fn member(name: impl Into<String>) -> Self {
        Self::unary(|row| row.get(name))
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub const fn params(&self) -> &[Param] {
        self.params.as_slice()
    }

    #[must_use]
    pub const fn body(&self) -> &Expr {
        &self.body
    }

    /// The member name when the body is exactly `param0.name`.
    #[must_use]
    pub fn member_name(&self) -> Option<&str> {
        let first = self.params.first()?;
        match &self.body {
            Expr::Field { target, name } if **target == Expr::Param(*first) => Some(name),
            _ => None,
        }
    }
}
