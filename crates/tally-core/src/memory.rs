//! In-memory implementation of the aggregation contract.
//!
//! [`MemoryStore`] interprets the same pipeline descriptions the MongoDB
//! repository translates to BSON, over seeded JSON rows. It exists so the
//! report catalog can be exercised without a live database; it is never
//! served behind the HTTP surface.
//!
//! Semantics mirror the document store where the catalog depends on them:
//! missing group keys bucket under null, sums skip non-numeric values, an
//! unwind drops rows whose array is empty (the inner-join law), and integral
//! numeric results surface as JSON integers the way relaxed extended JSON
//! renders BSON numbers.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::catalog::{CUSTOMERS_COLLECTION, PRODUCTS_COLLECTION, SALES_COLLECTION};
use crate::error::AppError;
use crate::models::{Customer, Product, Sale};
use crate::pipeline::{
    Accumulator, AccumulatorOp, Derived, Expr, Filter, GroupKey, Pipeline, ProjectField,
    SortOrder, Stage,
};
use crate::traits::SalesStore;

/// Seeded, read-only collections shared by clone.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

#[derive(Default)]
struct Collections {
    sales: Vec<Value>,
    customers: Vec<Value>,
    products: Vec<Value>,
}

impl MemoryStore {
    /// Builds a store over the given sales and customers.
    pub fn new(sales: &[Sale], customers: &[Customer]) -> Result<Self, AppError> {
        Self::with_products(sales, customers, &[])
    }

    /// Builds a store that also carries product rows.
    pub fn with_products(
        sales: &[Sale],
        customers: &[Customer],
        products: &[Product],
    ) -> Result<Self, AppError> {
        Ok(Self {
            inner: Arc::new(Collections {
                sales: rows(sales)?,
                customers: rows(customers)?,
                products: rows(products)?,
            }),
        })
    }

    /// Number of seeded sale rows, for count-conservation checks in tests.
    pub fn sales_len(&self) -> usize {
        self.inner.sales.len()
    }

    fn collection(&self, name: &str) -> &[Value] {
        match name {
            SALES_COLLECTION => &self.inner.sales,
            CUSTOMERS_COLLECTION => &self.inner.customers,
            PRODUCTS_COLLECTION => &self.inner.products,
            _ => &[],
        }
    }

    /// Runs a pipeline synchronously over the seeded rows.
    pub fn execute(&self, pipeline: &Pipeline) -> Vec<Value> {
        let mut current: Vec<Value> = self.collection(pipeline.collection).to_vec();
        for stage in &pipeline.stages {
            current = self.apply(stage, current);
        }
        current
    }

    fn apply(&self, stage: &Stage, rows: Vec<Value>) -> Vec<Value> {
        match stage {
            Stage::Match(filter) => rows.into_iter().filter(|r| matches(filter, r)).collect(),
            Stage::Group { key, accumulators } => group(rows, key, accumulators),
            Stage::Sort { field, order } => sort(rows, field, *order),
            Stage::Limit(n) => {
                let mut rows = rows;
                rows.truncate(*n as usize);
                rows
            }
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => self.lookup(rows, from, local_field, foreign_field, as_field),
            Stage::Unwind { path } => unwind(rows, path),
            Stage::AddFields(derived) => add_fields(rows, derived),
            Stage::Project(fields) => project(rows, fields),
        }
    }

    fn lookup(
        &self,
        rows: Vec<Value>,
        from: &str,
        local_field: &str,
        foreign_field: &str,
        as_field: &str,
    ) -> Vec<Value> {
        let foreign = self.collection(from);
        rows.into_iter()
            .map(|mut row| {
                let local = field_path(&row, local_field).cloned().unwrap_or(Value::Null);
                let found: Vec<Value> = foreign
                    .iter()
                    .filter(|candidate| {
                        field_path(candidate, foreign_field)
                            .is_some_and(|v| values_equal(v, &local))
                    })
                    .cloned()
                    .collect();
                if let Value::Object(obj) = &mut row {
                    obj.insert(as_field.to_string(), Value::Array(found));
                }
                row
            })
            .collect()
    }
}

impl SalesStore for MemoryStore {
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Value>, AppError> {
        Ok(self.execute(pipeline))
    }
}

fn rows<T: serde::Serialize>(items: &[T]) -> Result<Vec<Value>, AppError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(AppError::from))
        .collect()
}

/// Resolves a possibly dotted path inside a JSON object.
fn field_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Numbers compare numerically regardless of integer/float representation;
/// everything else compares structurally.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Collapses integral results to JSON integers, the way relaxed extended JSON
/// renders BSON numeric widening.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn matches(filter: &Filter, row: &Value) -> bool {
    match filter {
        Filter::Eq { field, value } => {
            field_path(row, field).is_some_and(|v| values_equal(v, value))
        }
        Filter::Gt { field, value } => field_path(row, field)
            .and_then(Value::as_f64)
            .is_some_and(|n| n > *value as f64),
    }
}

fn group_key(row: &Value, key: &GroupKey) -> Value {
    match key {
        GroupKey::Field(field) => field_path(row, field).cloned().unwrap_or(Value::Null),
        GroupKey::Prefix { field, length } => match field_path(row, field).and_then(Value::as_str)
        {
            Some(s) => Value::String(s.chars().take(*length).collect()),
            None => Value::Null,
        },
    }
}

fn group(rows: Vec<Value>, key: &GroupKey, accumulators: &[Accumulator]) -> Vec<Value> {
    // Buckets keyed by the serialized group key. Output order between groups
    // is unspecified by the contract; key order keeps it reproducible here.
    let mut buckets: BTreeMap<String, (Value, Vec<f64>)> = BTreeMap::new();

    for row in rows {
        let key_value = group_key(&row, key);
        let entry = buckets
            .entry(key_value.to_string())
            .or_insert_with(|| (key_value, vec![0.0; accumulators.len()]));
        for (accumulator, total) in accumulators.iter().zip(entry.1.iter_mut()) {
            match accumulator.op {
                AccumulatorOp::Sum(field) => {
                    if let Some(n) = field_path(&row, field).and_then(Value::as_f64) {
                        *total += n;
                    }
                }
                AccumulatorOp::Count => *total += 1.0,
            }
        }
    }

    buckets
        .into_values()
        .map(|(key_value, totals)| {
            let mut obj = Map::new();
            obj.insert("_id".to_string(), key_value);
            for (accumulator, total) in accumulators.iter().zip(totals) {
                obj.insert(accumulator.name.to_string(), number(total));
            }
            Value::Object(obj)
        })
        .collect()
}

fn sort(mut rows: Vec<Value>, field: &str, order: SortOrder) -> Vec<Value> {
    rows.sort_by(|a, b| {
        let ordering = compare(field_path(a, field), field_path(b, field));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    rows
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a
                .as_str()
                .unwrap_or_default()
                .cmp(b.as_str().unwrap_or_default()),
        },
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn unwind(rows: Vec<Value>, path: &str) -> Vec<Value> {
    let mut out = Vec::new();
    for row in rows {
        let items = match field_path(&row, path).and_then(Value::as_array) {
            Some(items) => items.clone(),
            None => continue,
        };
        for item in items {
            let mut flattened = row.clone();
            if let Value::Object(obj) = &mut flattened {
                obj.insert(path.to_string(), item);
            }
            out.push(flattened);
        }
    }
    out
}

fn add_fields(rows: Vec<Value>, derived: &[Derived]) -> Vec<Value> {
    rows.into_iter()
        .map(|mut row| {
            for field in derived {
                let value = eval(&row, &field.expr);
                if let Value::Object(obj) = &mut row {
                    obj.insert(field.name.to_string(), value);
                }
            }
            row
        })
        .collect()
}

fn eval(row: &Value, expr: &Expr) -> Value {
    match expr {
        Expr::Field(path) => field_path(row, path).cloned().unwrap_or(Value::Null),
        Expr::Multiply(path, factor) => match field_path(row, path).and_then(Value::as_f64) {
            Some(n) => json!(n * factor),
            None => Value::Null,
        },
        Expr::Divide(numerator, denominator) => {
            let n = field_path(row, numerator).and_then(Value::as_f64);
            let d = field_path(row, denominator).and_then(Value::as_f64);
            match (n, d) {
                (Some(n), Some(d)) if d != 0.0 => json!(n / d),
                _ => Value::Null,
            }
        }
    }
}

fn project(rows: Vec<Value>, fields: &[ProjectField]) -> Vec<Value> {
    rows.into_iter()
        .map(|row| {
            let mut obj = Map::new();
            let mut id_excluded = false;
            for field in fields {
                match field {
                    ProjectField::Include(name) => {
                        if let Some(value) = field_path(&row, name) {
                            obj.insert((*name).to_string(), value.clone());
                        }
                    }
                    ProjectField::Rename { from, to } => {
                        obj.insert(
                            (*to).to_string(),
                            field_path(&row, from).cloned().unwrap_or(Value::Null),
                        );
                    }
                    ProjectField::Exclude(name) => {
                        if *name == "_id" {
                            id_excluded = true;
                        }
                        obj.remove(*name);
                    }
                }
            }
            if !id_excluded {
                if let Some(id) = row.get("_id") {
                    obj.entry("_id".to_string()).or_insert_with(|| id.clone());
                }
            }
            Value::Object(obj)
        })
        .collect()
}
