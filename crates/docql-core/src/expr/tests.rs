use super::*;
use crate::{
    error::TermError,
    query::{SequenceExt, table},
    term::{Datum, DefaultConverterFactory, Term, TermContext, TermKind},
};

fn var(id: u64) -> Term {
    #[expect(clippy::cast_precision_loss)]
    let id = Term::datum(Datum::Number(id as f64));
    Term::apply(TermKind::Var, vec![id])
}

fn text(value: &str) -> Term {
    Term::datum(Datum::string(value))
}

fn params(ids: &[u64]) -> Term {
    #[expect(clippy::cast_precision_loss)]
    let ids = ids
        .iter()
        .map(|id| Term::datum(Datum::Number(*id as f64)))
        .collect();
    Term::apply(TermKind::MakeArray, ids)
}

fn translate_func(func: &Func) -> Result<Term, TermError> {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);
    func.to_term(&mut ctx)
}

// ----------------------------------------------------------------------
// Capture
// ----------------------------------------------------------------------

#[test]
fn closures_capture_a_tree_over_parameters() {
    let func = Func::unary(|row| row.get("age").gt(21));

    assert_eq!(func.arity(), 1);
    assert_eq!(
        func.body(),
        &Expr::Compare {
            op: CompareOp::Gt,
            left: Box::new(Expr::Field {
                target: Box::new(Expr::Param(func.params()[0])),
                name: "age".to_string(),
            }),
            right: Box::new(Expr::Literal(Value::Int(21))),
        }
    );
}

#[test]
fn operator_sugar_builds_the_same_nodes_as_methods() {
    let sugar = Func::binary(|acc, x| acc + x.get("n") * 2);
    let (acc, x) = (sugar.params()[0], sugar.params()[1]);
    let explicit = Func::new(
        vec![acc, x],
        Expr::Arith {
            op: ArithOp::Add,
            left: Box::new(acc.into()),
            right: Box::new(Expr::Arith {
                op: ArithOp::Mul,
                left: Box::new(Expr::from(x).get("n")),
                right: Box::new(Expr::lit(2)),
            }),
        },
    );
    assert_eq!(sugar, explicit);

    let logic = Func::unary(|row| !row.clone().get("banned") & row.get("active").eq(true));
    let Expr::And(items) = logic.body() else {
        panic!("expected conjunction");
    };
    assert!(matches!(items[0], Expr::Not(_)));
}

#[test]
fn every_capture_declares_new_parameters() {
    let first = Func::member("a");
    let second = Func::member("a");

    assert_ne!(first.params(), second.params());
    assert_ne!(first, second);

    let pair = Func::binary(|a, b| a + b);
    assert_ne!(pair.params()[0], pair.params()[1]);
}

#[test]
fn member_name_only_matches_a_direct_member() {
    assert_eq!(Func::member("age").member_name(), Some("age"));
    assert_eq!(Func::unary(|row| row.get("a").get("b")).member_name(), None);
    assert_eq!(Func::unary(|row| row.get("a").upcase()).member_name(), None);
    assert_eq!(
        Func::binary(|_, right| right.get("a")).member_name(),
        None
    );
}

// ----------------------------------------------------------------------
// Translation
// ----------------------------------------------------------------------

#[test]
fn unary_function_translates_to_func_over_one_variable() {
    let term = translate_func(&Func::unary(|row| row.get("active").eq(true))).unwrap();

    let expected = Term::apply(
        TermKind::Func,
        vec![
            params(&[1]),
            Term::apply(
                TermKind::Eq,
                vec![
                    Term::apply(TermKind::GetField, vec![var(1), text("active")]),
                    Term::datum(Datum::Bool(true)),
                ],
            ),
        ],
    );
    assert_eq!(term, expected);
}

#[test]
fn binary_function_gets_distinct_variables() {
    let term = translate_func(&Func::binary(|a, b| a - b)).unwrap();

    assert_eq!(term.args()[0], params(&[1, 2]));
    assert_eq!(
        term.args()[1],
        Term::apply(TermKind::Sub, vec![var(1), var(2)])
    );
}

#[test]
fn functions_in_one_walk_never_share_variables() {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);

    let first = Func::member("a").to_term(&mut ctx).unwrap();
    let second = Func::member("b").to_term(&mut ctx).unwrap();

    assert_eq!(first.args()[0], params(&[1]));
    assert_eq!(second.args()[0], params(&[2]));
}

#[test]
fn objects_translate_to_named_members() {
    let term = translate_func(&Func::unary(|row| {
        Expr::object([("name", row.clone().get("name")), ("n", Expr::lit(1))])
    }))
    .unwrap();

    let body = &term.args()[1];
    assert_eq!(body.kind(), TermKind::MakeObj);
    assert!(body.args().is_empty());
    assert_eq!(body.optarg("n"), Some(&Term::datum(Datum::Number(1.0))));
    assert_eq!(
        body.optarg("name"),
        Some(&Term::apply(TermKind::GetField, vec![var(1), text("name")]))
    );
}

#[test]
fn recognized_calls_translate_to_their_kinds() {
    let term = translate_func(&Func::unary(|row| {
        row.clone().get("tags").contains("x") | row.get("name").matches("^a")
    }))
    .unwrap();

    let body = &term.args()[1];
    assert_eq!(body.kind(), TermKind::Or);
    assert_eq!(body.args()[0].kind(), TermKind::Contains);
    assert_eq!(body.args()[1].kind(), TermKind::Match);
    assert_eq!(body.args()[1].args()[1], text("^a"));
}

#[test]
fn closed_expression_translates_without_variables() {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);

    let term = Expr::array([1, 2]).to_term(&mut ctx).unwrap();
    assert_eq!(
        term,
        Term::apply(
            TermKind::MakeArray,
            vec![
                Term::datum(Datum::Number(1.0)),
                Term::datum(Datum::Number(2.0))
            ]
        )
    );
}

#[test]
fn subquery_embeds_the_generated_query() {
    let func = Func::unary(|row| {
        Expr::subquery(table("admins")).contains(row.get("id"))
    });
    let term = translate_func(&func).unwrap();

    let contains = &term.args()[1];
    assert_eq!(contains.kind(), TermKind::Contains);
    assert_eq!(
        contains.args()[0],
        Term::apply(TermKind::Table, vec![text("admins")])
    );
}

#[test]
fn subquery_can_reference_the_enclosing_parameter() {
    let func = Func::unary(|user| {
        Expr::subquery(table("orders").filter(move |order| order.get("uid").eq(user.get("id"))))
            .count()
            .gt(0)
    });
    let term = translate_func(&func).unwrap();

    assert_eq!(term.args()[0], params(&[1]));

    let gt = &term.args()[1];
    assert_eq!(gt.kind(), TermKind::Gt);
    let count = &gt.args()[0];
    assert_eq!(count.kind(), TermKind::Count);
    let filter = &count.args()[0];
    assert_eq!(filter.kind(), TermKind::Filter);

    let inner = &filter.args()[1];
    assert_eq!(inner.args()[0], params(&[2]));
    assert_eq!(
        inner.args()[1],
        Term::apply(
            TermKind::Eq,
            vec![
                Term::apply(TermKind::GetField, vec![var(2), text("uid")]),
                Term::apply(TermKind::GetField, vec![var(1), text("id")]),
            ],
        )
    );
}

#[test]
fn doubly_nested_subquery_reaches_both_enclosing_parameters() {
    let func = Func::unary(|user| {
        Expr::subquery(table("orders").filter(move |order| {
            let lines = table("lines").filter(move |line| {
                let same_order = line.clone().get("order").eq(order.get("id"));
                same_order & line.get("buyer").eq(user.get("id"))
            });
            Expr::subquery(lines).count().gt(0)
        }))
        .count()
        .gt(0)
    });
    let term = translate_func(&func).unwrap();

    // user -> 1, order -> 2, line -> 3
    let orders = &term.args()[1].args()[0].args()[0];
    let lines = &orders.args()[1].args()[1].args()[0].args()[0];
    assert_eq!(lines.kind(), TermKind::Filter);

    let innermost = &lines.args()[1];
    assert_eq!(innermost.args()[0], params(&[3]));
    assert_eq!(
        innermost.args()[1],
        Term::apply(
            TermKind::And,
            vec![
                Term::apply(
                    TermKind::Eq,
                    vec![
                        Term::apply(TermKind::GetField, vec![var(3), text("order")]),
                        Term::apply(TermKind::GetField, vec![var(2), text("id")]),
                    ],
                ),
                Term::apply(
                    TermKind::Eq,
                    vec![
                        Term::apply(TermKind::GetField, vec![var(3), text("buyer")]),
                        Term::apply(TermKind::GetField, vec![var(1), text("id")]),
                    ],
                ),
            ],
        )
    );
}

#[test]
fn sibling_functions_do_not_see_each_others_parameters() {
    let converter = DefaultConverterFactory::default();
    let mut ctx = TermContext::new(&converter);

    let first = Func::member("a");
    let leaked = Func::new(Vec::new(), Expr::from(first.params()[0]).get("b"));

    first.to_term(&mut ctx).unwrap();
    let err = leaked.to_term(&mut ctx).unwrap_err();

    assert!(matches!(err, TermError::UnsupportedExpression { .. }));
    assert!(err.to_string().contains("outside the function that declares it"));
}

#[test]
fn subqueries_compare_by_identity() {
    let shared = Expr::subquery(table("a"));

    assert_eq!(shared.clone(), shared);
    assert_ne!(Expr::subquery(table("a")), Expr::subquery(table("a")));
}

// ----------------------------------------------------------------------
// Rejections
// ----------------------------------------------------------------------

#[test]
fn unknown_call_is_unsupported() {
    let err = translate_func(&Func::unary(|row| Expr::call("reverse", [row]))).unwrap_err();

    let TermError::UnsupportedExpression { construct } = err else {
        panic!("expected unsupported expression");
    };
    assert!(construct.contains("reverse"));
}

#[test]
fn call_with_wrong_arity_is_unsupported() {
    let err = translate_func(&Func::unary(|row| Expr::call("upcase", [row, Expr::lit(1)])))
        .unwrap_err();

    assert!(matches!(err, TermError::UnsupportedExpression { .. }));
    assert!(err.to_string().contains("expected 1"));
}

#[test]
fn undeclared_parameter_is_unsupported() {
    let err = translate_func(&Func::new(vec![Param::fresh()], Param::fresh().into())).unwrap_err();

    assert!(matches!(err, TermError::UnsupportedExpression { .. }));
}

#[test]
fn duplicate_object_member_is_unsupported() {
    let err = translate_func(&Func::unary(|row| {
        Expr::object([("a", row.clone()), ("a", row)])
    }))
    .unwrap_err();

    assert!(err.to_string().contains("duplicate member 'a'"));
}

#[test]
fn unconvertible_literal_surfaces_as_conversion_error() {
    let err = translate_func(&Func::unary(|row| row.eq(Value::Blob(vec![0])))).unwrap_err();

    assert!(matches!(err, TermError::Convert(_)));
}

#[test]
fn member_term_rejects_computed_selectors() {
    assert_eq!(Func::member("score").member_term("sum").unwrap(), text("score"));

    let err = Func::unary(|row| row.get("a") + 1)
        .member_term("sum reduction")
        .unwrap_err();
    assert!(err.to_string().contains("sum reduction"));
    assert!(err.to_string().contains("arithmetic"));
}
