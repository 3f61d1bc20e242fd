//! Declarative description of an aggregation pipeline.
//!
//! A report is an ordered list of [`Stage`]s over a named source collection.
//! The description is interpreted twice: by the in-memory engine in
//! [`crate::memory`] and by the BSON translator in the database crate. Only the
//! stage vocabulary the report catalog actually needs is modeled.

use serde_json::Value;

/// Sort direction for a [`Stage::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Grouping key for a [`Stage::Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    /// Group on a document field.
    Field(&'static str),
    /// Group on a fixed-length prefix of a string field, e.g. the "YYYY-MM"
    /// month key cut from a "YYYY-MM-DD" date.
    Prefix { field: &'static str, length: usize },
}

/// Aggregation function computed per group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorOp {
    /// Sum of a numeric field across the group. Non-numeric values are skipped.
    Sum(&'static str),
    /// Number of rows in the group.
    Count,
}

/// Named accumulator on a group row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    /// Output field name on the group row.
    pub name: &'static str,
    pub op: AccumulatorOp,
}

impl Accumulator {
    pub fn sum(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            op: AccumulatorOp::Sum(field),
        }
    }

    pub fn count(name: &'static str) -> Self {
        Self {
            name,
            op: AccumulatorOp::Count,
        }
    }
}

/// Row filter for a [`Stage::Match`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact equality on a field. String matching is case-sensitive.
    Eq { field: &'static str, value: Value },
    /// Numeric strictly-greater-than comparison.
    Gt { field: &'static str, value: i64 },
}

/// Expressions available to derived fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Copy of another field; dotted paths reach into joined subdocuments.
    Field(&'static str),
    /// Field value multiplied by a constant.
    Multiply(&'static str, f64),
    /// Quotient of two fields.
    Divide(&'static str, &'static str),
}

/// Derived field added by [`Stage::AddFields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub name: &'static str,
    pub expr: Expr,
}

/// Output projection entry for a [`Stage::Project`].
///
/// When a projection is present the output row contains exactly the included
/// and renamed fields, plus the implicit `_id` unless explicitly excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    Include(&'static str),
    Exclude(&'static str),
    /// Output `to` carrying the value found at the (possibly dotted) path
    /// `from`.
    Rename {
        from: &'static str,
        to: &'static str,
    },
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep only rows matching the filter.
    Match(Filter),
    /// Partition rows by key and compute the accumulators per partition. The
    /// output row shape is `{_id: key, <accumulator fields>}`. Output order
    /// between groups is unspecified.
    Group {
        key: GroupKey,
        accumulators: Vec<Accumulator>,
    },
    /// Sort rows by a single field. No secondary key: ties keep an
    /// unspecified relative order.
    Sort {
        field: &'static str,
        order: SortOrder,
    },
    /// Keep at most the first `n` rows.
    Limit(i64),
    /// Attach all rows of `from` whose `foreign_field` equals the row's
    /// `local_field`, as an array under `as_field`.
    Lookup {
        from: &'static str,
        local_field: &'static str,
        foreign_field: &'static str,
        as_field: &'static str,
    },
    /// Flatten the array at `path` into one row per element. Rows whose array
    /// is empty or missing are dropped, which gives lookup-then-unwind its
    /// inner-join semantics.
    Unwind { path: &'static str },
    /// Add derived fields to every row.
    AddFields(Vec<Derived>),
    /// Reshape every row.
    Project(Vec<ProjectField>),
}

/// A complete aggregation over a source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub collection: &'static str,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn over(collection: &'static str, stages: Vec<Stage>) -> Self {
        Self { collection, stages }
    }
}
