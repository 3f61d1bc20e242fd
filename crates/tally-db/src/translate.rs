//! Translation from pipeline descriptions to BSON aggregation documents.
//!
//! Each [`Stage`] maps to exactly one aggregation stage document; the output
//! is handed to `Collection::aggregate` untouched. Field references become
//! `$`-prefixed paths on the way through.

use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

use tally_core::pipeline::{
    Accumulator, AccumulatorOp, Expr, Filter, GroupKey, Pipeline, ProjectField, SortOrder, Stage,
};

/// Renders the stage list as the documents handed to `aggregate`.
pub fn to_documents(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages.iter().map(stage_document).collect()
}

fn stage_document(stage: &Stage) -> Document {
    match stage {
        Stage::Match(filter) => doc! { "$match": match_document(filter) },
        Stage::Group { key, accumulators } => {
            let mut group = Document::new();
            group.insert("_id", group_key(key));
            for accumulator in accumulators {
                group.insert(accumulator.name, accumulator_document(accumulator));
            }
            doc! { "$group": group }
        }
        Stage::Sort { field, order } => {
            let direction = match order {
                SortOrder::Ascending => 1,
                SortOrder::Descending => -1,
            };
            let mut sort = Document::new();
            sort.insert(*field, direction);
            doc! { "$sort": sort }
        }
        Stage::Limit(n) => doc! { "$limit": *n },
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => doc! {
            "$lookup": {
                "from": *from,
                "localField": *local_field,
                "foreignField": *foreign_field,
                "as": *as_field,
            }
        },
        Stage::Unwind { path } => doc! { "$unwind": field_ref(path) },
        Stage::AddFields(derived) => {
            let mut fields = Document::new();
            for field in derived {
                fields.insert(field.name, expr_bson(&field.expr));
            }
            doc! { "$addFields": fields }
        }
        Stage::Project(fields) => {
            let mut projection = Document::new();
            for field in fields {
                match field {
                    ProjectField::Include(name) => {
                        projection.insert(*name, 1);
                    }
                    ProjectField::Exclude(name) => {
                        projection.insert(*name, 0);
                    }
                    ProjectField::Rename { from, to } => {
                        projection.insert(*to, field_ref(from));
                    }
                }
            }
            doc! { "$project": projection }
        }
    }
}

fn match_document(filter: &Filter) -> Document {
    let mut document = Document::new();
    match filter {
        Filter::Eq { field, value } => {
            document.insert(*field, json_to_bson(value));
        }
        Filter::Gt { field, value } => {
            document.insert(*field, doc! { "$gt": *value });
        }
    }
    document
}

fn group_key(key: &GroupKey) -> Bson {
    match key {
        GroupKey::Field(field) => Bson::String(field_ref(field)),
        GroupKey::Prefix { field, length } => Bson::Document(doc! {
            "$substr": [field_ref(field), 0, *length as i32]
        }),
    }
}

fn accumulator_document(accumulator: &Accumulator) -> Document {
    match accumulator.op {
        AccumulatorOp::Sum(field) => doc! { "$sum": field_ref(field) },
        AccumulatorOp::Count => doc! { "$sum": 1 },
    }
}

fn expr_bson(expr: &Expr) -> Bson {
    match expr {
        Expr::Field(path) => Bson::String(field_ref(path)),
        Expr::Multiply(path, factor) => Bson::Document(doc! {
            "$multiply": [field_ref(path), *factor]
        }),
        Expr::Divide(numerator, denominator) => Bson::Document(doc! {
            "$divide": [field_ref(numerator), field_ref(denominator)]
        }),
    }
}

fn field_ref(path: &str) -> String {
    format!("${path}")
}

fn json_to_bson(value: &Value) -> Bson {
    // Filter values are strings and small numbers; only a u64 beyond i64
    // range cannot be represented, and such a value never reaches a filter.
    Bson::try_from(value.clone()).unwrap_or(Bson::Null)
}
