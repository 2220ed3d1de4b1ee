//! Whole-chain behaviour through the public facade.

use docql::{
    Error,
    core::{
        term::{ConvertError, Datum, DatumConverterFactory, TermKind},
        value::{Value, ValueKind},
    },
    prelude::*,
};
use proptest::prelude::*;
use std::{cell::Cell, thread};

fn generate(query: &impl Query) -> Term {
    query
        .generate_term(&DefaultConverterFactory::default())
        .expect("term should generate")
}

// Spine of operation kinds from the root down, following first args.
fn spine(term: &Term) -> Vec<TermKind> {
    let mut kinds = vec![term.kind()];
    let mut current = term;
    while let Some(first) = current.args().first() {
        if first.as_datum().is_some() {
            break;
        }
        kinds.push(first.kind());
        current = first;
    }
    kinds
}

///
/// CountingConverter
/// Refuses text and counts every conversion it is asked to perform.
///

#[derive(Default)]
struct CountingConverter {
    calls: Cell<usize>,
}

impl DatumConverterFactory for CountingConverter {
    fn supports(&self, kind: ValueKind) -> bool {
        kind != ValueKind::Text
    }

    fn convert(&self, value: &Value) -> Result<Datum, ConvertError> {
        self.calls.set(self.calls.get() + 1);
        DefaultConverterFactory::default().convert(value)
    }
}

#[test]
fn facade_version_is_the_workspace_version() {
    assert_eq!(docql::VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn users_scenario_generates_expected_spine() {
    let term = generate(
        &table("users")
            .get_all_by_index(42, "age_index")
            .filter(|u| u.get("active").eq(true))
            .order_by(|u| u.get("name"), OrderDirection::Desc)
            .limit(10),
    );

    assert_eq!(
        spine(&term),
        vec![
            TermKind::Limit,
            TermKind::OrderBy,
            TermKind::Filter,
            TermKind::GetAll,
            TermKind::Table,
        ]
    );
}

#[test]
fn shared_prefix_can_branch() {
    let active = table("users").filter(|u| u.get("active").eq(true));

    let newest = active
        .clone()
        .order_by(|u| u.get("created"), OrderDirection::Desc)
        .limit(5);
    let total = active.clone().count();

    assert_eq!(generate(&newest).args()[0].args()[0], generate(&active));
    assert_eq!(generate(&total).args()[0], generate(&active));
}

#[test]
fn chains_generate_identically_on_other_threads() {
    let query = table("orders")
        .eq_join(|o| o.get("user_id"), table("users"))
        .zip()
        .map(|row| Expr::object([("name", row.clone().get("name")), ("total", row.get("total"))]));
    let local = generate(&query);

    let remote = thread::spawn(move || generate(&query))
        .join()
        .expect("generation thread should finish");

    assert_eq!(local, remote);
    assert_eq!(local.fingerprint(), remote.fingerprint());
}

#[test]
fn converter_is_consulted_only_during_generation() {
    let converter = CountingConverter::default();
    let query = table("scores").get_all(7).filter(|s| s.get("points").gt(100));

    assert_eq!(converter.calls.get(), 0);

    query.generate_term(&converter).expect("numeric operands convert");
    assert_eq!(converter.calls.get(), 2);

    // a second walk converts again; nothing is cached on the chain
    query.generate_term(&converter).expect("numeric operands convert");
    assert_eq!(converter.calls.get(), 4);
}

#[test]
fn unsupported_kinds_are_refused_before_conversion() {
    let converter = CountingConverter::default();

    let err = table("users")
        .get_all("ada")
        .generate_term(&converter)
        .unwrap_err();

    assert!(matches!(err, Error::Convert(ConvertError { kind: ValueKind::Text, .. })));
    assert_eq!(converter.calls.get(), 0);
}

#[test]
fn single_object_writes_and_reads() {
    let update = generate(
        &table("users")
            .get("ada")
            .update(|u| Expr::object([("visits", u.get("visits") + 1)])),
    );
    assert_eq!(spine(&update), vec![TermKind::Update, TermKind::Get, TermKind::Table]);

    let deleted = generate(&table("users").get("ada").delete_and_return());
    assert_eq!(
        deleted.optarg("return_vals").and_then(Term::as_datum),
        Some(&Datum::Bool(true))
    );
}

#[test]
fn grouping_with_prebuilt_reductions() {
    let term = generate(&table("players").group_by(avg(|p| p.get("score")), |p| p.get("team")));

    assert_eq!(term.kind(), TermKind::GroupBy);
    assert_eq!(
        term.args()[2].optarg("AVG").and_then(Term::as_datum),
        Some(&Datum::string("score"))
    );
}

#[test]
fn computed_sum_selector_is_an_error() {
    let err = table("players")
        .group_by(sum(|p| p.get("score") * 2), |p| p.get("team"))
        .generate_term(&DefaultConverterFactory::default())
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedExpression { .. }));
}

proptest! {
    #[test]
    fn literal_sequences_keep_order(values in prop::collection::vec(-1_000_i64..1_000, 0..16)) {
        let term = generate(&literal_seq(values.clone()));

        prop_assert_eq!(term.kind(), TermKind::MakeArray);
        let numbers: Vec<f64> = term
            .args()
            .iter()
            .filter_map(|arg| arg.as_datum().and_then(Datum::as_number))
            .collect();
        #[expect(clippy::cast_precision_loss)]
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn range_queries_always_carry_both_bounds(low in any::<i32>(), high in any::<i32>()) {
        let term = generate(&table("t").between(low, high));

        prop_assert!(term.optarg("left_bound").is_some());
        prop_assert!(term.optarg("right_bound").is_some());
    }
}
