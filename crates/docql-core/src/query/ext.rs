//! Combinator surface. Each method consumes its source and returns a new
//! node; a combinator is reachable only through the extension trait of the
//! capability it requires.

use crate::{
    expr::{Expr, Func},
    query::{
        GroupReduction, MutableSingleObjectQuery, Paired, SequenceQuery,
        access::{Between, Get, GetAll, PrimaryKey},
        group::{GroupBy, GroupedMapReduce},
        join::{EqJoin, InnerJoin, OuterJoin, Zip},
        order::{OrderBy, OrderDirection},
        sequence::{
            ConcatMap, Count, Distinct, Filter, Limit, Map, Nth, Reduce, Skip, Slice, Union,
        },
        write::{Delete, DeleteAndReturn, Replace, ReplaceAndReturn, Update, UpdateAndReturn},
    },
    value::Value,
};

///
/// SequenceExt
///
/// Combinators available on every sequence-shaped query.
///

pub trait SequenceExt: SequenceQuery + Sized {
    // ------------------------------------------------------------------
    // Key access
    // ------------------------------------------------------------------

    /// Look up one item by primary key.
    #[must_use]
    fn get(self, key: impl Into<PrimaryKey>) -> Get<Self> {
        Get::new(self, key.into())
    }

    /// All items whose primary key equals `key`.
    #[must_use]
    fn get_all(self, key: impl Into<Value>) -> GetAll<Self> {
        GetAll::new(self, key.into(), None)
    }

    /// All items whose secondary index `index` equals `key`.
    #[must_use]
    fn get_all_by_index(self, key: impl Into<Value>, index: impl Into<String>) -> GetAll<Self> {
        GetAll::new(self, key.into(), Some(index.into()))
    }

    /// Items with keys in `[left, right)`; see `Between` for bound and
    /// index overrides.
    #[must_use]
    fn between(self, left: impl Into<Value>, right: impl Into<Value>) -> Between<Self> {
        Between::new(self, left.into(), right.into())
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    #[must_use]
    fn filter(self, predicate: impl FnOnce(Expr) -> Expr) -> Filter<Self> {
        Filter::new(self, Func::unary(predicate))
    }

    /// Alias for `filter`.
    #[must_use]
    fn where_(self, predicate: impl FnOnce(Expr) -> Expr) -> Filter<Self> {
        self.filter(predicate)
    }

    #[must_use]
    fn map(self, projection: impl FnOnce(Expr) -> Expr) -> Map<Self> {
        Map::new(self, Func::unary(projection))
    }

    /// Alias for `map`.
    #[must_use]
    fn select(self, projection: impl FnOnce(Expr) -> Expr) -> Map<Self> {
        self.map(projection)
    }

    #[must_use]
    fn concat_map(self, mapping: impl FnOnce(Expr) -> Expr) -> ConcatMap<Self> {
        ConcatMap::new(self, Func::unary(mapping))
    }

    // ------------------------------------------------------------------
    // Ordering and paging
    // ------------------------------------------------------------------

    #[must_use]
    fn order_by(
        self,
        selector: impl FnOnce(Expr) -> Expr,
        direction: OrderDirection,
    ) -> OrderBy<Self> {
        OrderBy::new(self, Func::unary(selector), direction)
    }

    #[must_use]
    fn order_by_desc(self, selector: impl FnOnce(Expr) -> Expr) -> OrderBy<Self> {
        self.order_by(selector, OrderDirection::Desc)
    }

    #[must_use]
    fn skip(self, count: i64) -> Skip<Self> {
        Skip::new(self, count)
    }

    #[must_use]
    fn limit(self, count: i64) -> Limit<Self> {
        Limit::new(self, count)
    }

    /// Alias for `limit`.
    #[must_use]
    fn take(self, count: i64) -> Limit<Self> {
        self.limit(count)
    }

    /// Elements from `start` up to `end`, or to the end when `end` is `None`.
    #[must_use]
    fn slice(self, start: i64, end: Option<i64>) -> Slice<Self> {
        Slice::new(self, start, end)
    }

    #[must_use]
    fn nth(self, index: i64) -> Nth<Self> {
        Nth::new(self, index)
    }

    // ------------------------------------------------------------------
    // Set operations and aggregates
    // ------------------------------------------------------------------

    #[must_use]
    fn distinct(self) -> Distinct<Self> {
        Distinct::new(self)
    }

    #[must_use]
    fn count(self) -> Count<Self> {
        Count::new(self)
    }

    #[must_use]
    fn union<R>(self, other: R) -> Union<Self, R>
    where
        R: SequenceQuery<Item = Self::Item>,
    {
        Union::new(self, other)
    }

    /// Fold the sequence; see `Reduce::base` to seed it.
    #[must_use]
    fn reduce(self, function: impl FnOnce(Expr, Expr) -> Expr) -> Reduce<Self> {
        Reduce::new(self, Func::binary(function))
    }

    #[must_use]
    fn group_by<G: GroupReduction>(
        self,
        reduction: G,
        key: impl FnOnce(Expr) -> Expr,
    ) -> GroupBy<Self, G> {
        GroupBy::new(self, reduction, Func::unary(key))
    }

    #[must_use]
    fn grouped_map_reduce(
        self,
        grouping: impl FnOnce(Expr) -> Expr,
        mapping: impl FnOnce(Expr) -> Expr,
        reduction: impl FnOnce(Expr, Expr) -> Expr,
    ) -> GroupedMapReduce<Self> {
        GroupedMapReduce::new(
            self,
            Func::unary(grouping),
            Func::unary(mapping),
            Func::binary(reduction),
        )
    }

    // ------------------------------------------------------------------
    // Joins
    // ------------------------------------------------------------------

    #[must_use]
    fn inner_join<R: SequenceQuery>(
        self,
        other: R,
        predicate: impl FnOnce(Expr, Expr) -> Expr,
    ) -> InnerJoin<Self, R> {
        InnerJoin::new(self, other, Func::binary(predicate))
    }

    #[must_use]
    fn outer_join<R: SequenceQuery>(
        self,
        other: R,
        predicate: impl FnOnce(Expr, Expr) -> Expr,
    ) -> OuterJoin<Self, R> {
        OuterJoin::new(self, other, Func::binary(predicate))
    }

    /// Join on `left_member` equal to the right side's primary key; see
    /// `EqJoin::index` to match a secondary index instead.
    #[must_use]
    fn eq_join<R: SequenceQuery>(
        self,
        left_member: impl FnOnce(Expr) -> Expr,
        other: R,
    ) -> EqJoin<Self, R> {
        EqJoin::new(self, Func::unary(left_member), other)
    }

    /// Merge the halves of each joined pair.
    #[must_use]
    fn zip(self) -> Zip<Self>
    where
        Self::Item: Paired,
    {
        Zip::new(self)
    }

    // ------------------------------------------------------------------
    // Bulk writes
    // ------------------------------------------------------------------

    #[must_use]
    fn update(self, function: impl FnOnce(Expr) -> Expr) -> Update<Self> {
        Update::new(self, Func::unary(function))
    }

    #[must_use]
    fn delete(self) -> Delete<Self> {
        Delete::new(self)
    }
}

impl<S: SequenceQuery> SequenceExt for S {}

///
/// MutableSingleObjectExt
///
/// In-place writes on a single addressable object.
///

pub trait MutableSingleObjectExt: MutableSingleObjectQuery + Sized {
    #[must_use]
    fn update(self, function: impl FnOnce(Expr) -> Expr) -> Update<Self> {
        Update::new(self, Func::unary(function))
    }

    #[must_use]
    fn update_and_return(self, function: impl FnOnce(Expr) -> Expr) -> UpdateAndReturn<Self> {
        UpdateAndReturn::new(self, Func::unary(function))
    }

    #[must_use]
    fn replace(self, value: impl Into<Value>) -> Replace<Self> {
        Replace::new(self, value.into())
    }

    #[must_use]
    fn replace_and_return(self, value: impl Into<Value>) -> ReplaceAndReturn<Self> {
        ReplaceAndReturn::new(self, value.into())
    }

    #[must_use]
    fn delete(self) -> Delete<Self> {
        Delete::new(self)
    }

    #[must_use]
    fn delete_and_return(self) -> DeleteAndReturn<Self> {
        DeleteAndReturn::new(self)
    }
}

impl<Q: MutableSingleObjectQuery> MutableSingleObjectExt for Q {}
