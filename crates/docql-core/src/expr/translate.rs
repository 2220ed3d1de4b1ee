use crate::{
    error::TermError,
    expr::{ArithOp, CompareOp, Expr, Func},
    term::{Datum, Term, TermContext, TermKind},
};
use std::collections::BTreeMap;
use tracing::debug;

///
/// RemoteCall
///
/// Function names the remote engine understands, with their fixed arity
/// (receiver included).
///

struct RemoteCall {
    name: &'static str,
    kind: TermKind,
    arity: usize,
}

const REMOTE_CALLS: &[RemoteCall] = &[
    RemoteCall {
        name: "append",
        kind: TermKind::Append,
        arity: 2,
    },
    RemoteCall {
        name: "coerce_to",
        kind: TermKind::CoerceTo,
        arity: 2,
    },
    RemoteCall {
        name: "contains",
        kind: TermKind::Contains,
        arity: 2,
    },
    RemoteCall {
        name: "count",
        kind: TermKind::Count,
        arity: 1,
    },
    RemoteCall {
        name: "default",
        kind: TermKind::Default,
        arity: 2,
    },
    RemoteCall {
        name: "downcase",
        kind: TermKind::Downcase,
        arity: 1,
    },
    RemoteCall {
        name: "has_fields",
        kind: TermKind::HasFields,
        arity: 2,
    },
    RemoteCall {
        name: "keys",
        kind: TermKind::Keys,
        arity: 1,
    },
    RemoteCall {
        name: "match",
        kind: TermKind::Match,
        arity: 2,
    },
    RemoteCall {
        name: "now",
        kind: TermKind::Now,
        arity: 0,
    },
    RemoteCall {
        name: "type_of",
        kind: TermKind::TypeOf,
        arity: 1,
    },
    RemoteCall {
        name: "upcase",
        kind: TermKind::Upcase,
        arity: 1,
    },
];

impl Func {
    /// Translate into `FUNC(MAKE_ARRAY(var ids), body)`.
    ///
    /// Fresh variable ids are drawn from the context, one per parameter, and
    /// stay bound while the body is translated. Parameters of enclosing
    /// functions remain reachable from nested ones.
    pub fn to_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        let vars = ctx.enter_scope(&self.params);
        let body = translate(&self.body, ctx);
        ctx.exit_scope(vars.len());
        let body = body?;

        #[expect(clippy::cast_precision_loss)]
        let params = vars
            .iter()
            .map(|id| Term::datum(Datum::Number(*id as f64)))
            .collect();

        Ok(Term::apply(
            TermKind::Func,
            vec![Term::apply(TermKind::MakeArray, params), body],
        ))
    }

    /// Translate a selector that must name a single top-level member.
    pub(crate) fn member_term(&self, usage: &str) -> Result<Term, TermError> {
        match self.member_name() {
            Some(name) => Ok(Term::datum(Datum::string(name))),
            None => {
                let err = TermError::unsupported(format!(
                    "{usage} requires a single member access, found {}",
                    describe(&self.body)
                ));
                debug!(error = %err, "selector translation failed");
                Err(err)
            }
        }
    }
}

impl Expr {
    /// Translate an expression whose parameters, if any, are bound by the
    /// functions currently being translated.
    pub fn to_term(&self, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
        translate(self, ctx)
    }
}

fn translate(expr: &Expr, ctx: &mut TermContext<'_>) -> Result<Term, TermError> {
    let term = match expr {
        Expr::Param(param) => {
            let Some(id) = ctx.resolve(*param) else {
                return Err(unsupported(format!(
                    "parameter #{} used outside the function that declares it",
                    param.id()
                )));
            };
            #[expect(clippy::cast_precision_loss)]
            let id = Term::datum(Datum::Number(id as f64));
            Term::apply(TermKind::Var, vec![id])
        }
        Expr::Literal(value) => ctx.literal(value)?,
        Expr::Field { target, name } => Term::apply(
            TermKind::GetField,
            vec![
                translate(target, ctx)?,
                Term::datum(Datum::string(name.as_str())),
            ],
        ),
        Expr::Compare { op, left, right } => Term::apply(
            compare_kind(*op),
            vec![translate(left, ctx)?, translate(right, ctx)?],
        ),
        Expr::Arith { op, left, right } => Term::apply(
            arith_kind(*op),
            vec![translate(left, ctx)?, translate(right, ctx)?],
        ),
        Expr::And(items) => Term::apply(TermKind::And, translate_all(items, ctx)?),
        Expr::Or(items) => Term::apply(TermKind::Or, translate_all(items, ctx)?),
        Expr::Not(inner) => Term::apply(TermKind::Not, vec![translate(inner, ctx)?]),
        Expr::Array(items) => Term::apply(TermKind::MakeArray, translate_all(items, ctx)?),
        Expr::Object(members) => {
            let mut optargs = BTreeMap::new();
            for (name, member) in members {
                let member = translate(member, ctx)?;
                if optargs.insert(name.clone(), member).is_some() {
                    return Err(unsupported(format!("object with duplicate member '{name}'")));
                }
            }
            Term::Apply {
                kind: TermKind::MakeObj,
                args: Vec::new(),
                optargs,
            }
        }
        Expr::Call { name, args } => {
            let Some(call) = REMOTE_CALLS.iter().find(|call| call.name == name.as_str()) else {
                return Err(unsupported(format!("call to unknown function '{name}'")));
            };
            if call.arity != args.len() {
                return Err(unsupported(format!(
                    "call to '{name}' with {} arguments, expected {}",
                    args.len(),
                    call.arity
                )));
            }
            Term::apply(call.kind, translate_all(args, ctx)?)
        }
        Expr::Subquery(subquery) => subquery.query().build_term(ctx)?,
    };

    Ok(term)
}

fn translate_all(items: &[Expr], ctx: &mut TermContext<'_>) -> Result<Vec<Term>, TermError> {
    items.iter().map(|item| translate(item, ctx)).collect()
}

fn unsupported(construct: String) -> TermError {
    let err = TermError::unsupported(construct);
    debug!(error = %err, "expression translation failed");
    err
}

const fn compare_kind(op: CompareOp) -> TermKind {
    match op {
        CompareOp::Eq => TermKind::Eq,
        CompareOp::Ne => TermKind::Ne,
        CompareOp::Lt => TermKind::Lt,
        CompareOp::Le => TermKind::Le,
        CompareOp::Gt => TermKind::Gt,
        CompareOp::Ge => TermKind::Ge,
    }
}

const fn arith_kind(op: ArithOp) -> TermKind {
    match op {
        ArithOp::Add => TermKind::Add,
        ArithOp::Sub => TermKind::Sub,
        ArithOp::Mul => TermKind::Mul,
        ArithOp::Div => TermKind::Div,
        ArithOp::Mod => TermKind::Mod,
    }
}

// Short label used in error messages.
const fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Param(_) => "a bare parameter",
        Expr::Literal(_) => "a literal",
        Expr::Field { .. } => "a nested member access",
        Expr::Compare { .. } => "a comparison",
        Expr::Arith { .. } => "arithmetic",
        Expr::And(_) | Expr::Or(_) | Expr::Not(_) => "a boolean combination",
        Expr::Array(_) => "an array",
        Expr::Object(_) => "an object",
        Expr::Call { .. } => "a function call",
        Expr::Subquery(_) => "a subquery",
    }
}
