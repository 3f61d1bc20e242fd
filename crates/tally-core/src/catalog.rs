//! The fixed report catalog.
//!
//! Each report the service exposes is one pipeline over the `sales`
//! collection, optionally joined with `customers`. The constructors here are
//! the single source of truth for what every report means: grouping keys,
//! accumulator names, sort directions and projections all live in this module
//! and nowhere else.
//!
//! The two "top" reports cap their output at one row. When several groups tie
//! for the maximum, which of them is returned is unspecified: no secondary
//! sort key is applied.

use serde_json::Value;

use crate::pipeline::{
    Accumulator, Derived, Expr, Filter, GroupKey, Pipeline, ProjectField, SortOrder, Stage,
};

/// Source collection names as stored in the database.
pub const SALES_COLLECTION: &str = "sales";
pub const CUSTOMERS_COLLECTION: &str = "customers";
pub const PRODUCTS_COLLECTION: &str = "products";

/// Revenue summed per product category: `{_id: category, totalSales}`.
pub fn total_sales_per_category() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![Stage::Group {
            key: GroupKey::Field("category"),
            accumulators: vec![Accumulator::sum("totalSales", "totalAmount")],
        }],
    )
}

/// The single most used payment method: `{_id: method, totalUsers}`.
pub fn popular_payment_method() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Field("paymentMethod"),
                accumulators: vec![Accumulator::count("totalUsers")],
            },
            Stage::Sort {
                field: "totalUsers",
                order: SortOrder::Descending,
            },
            Stage::Limit(1),
        ],
    )
}

/// The customer with the highest total spend: `{_id: customer, totalAmount}`.
pub fn top_customers() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Field("customer"),
                accumulators: vec![Accumulator::sum("totalAmount", "totalAmount")],
            },
            Stage::Sort {
                field: "totalAmount",
                order: SortOrder::Descending,
            },
            Stage::Limit(1),
        ],
    )
}

/// Order count per calendar day: `{_id: date, count}`.
pub fn orders_per_day() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![Stage::Group {
            key: GroupKey::Field("date"),
            accumulators: vec![Accumulator::count("count")],
        }],
    )
}

/// Raw sale records whose payment method equals `method` exactly.
///
/// The value is taken verbatim from the caller; no normalization or
/// validation is applied, so an unknown method simply selects nothing.
pub fn filter_by_payment(method: &str) -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![Stage::Match(Filter::Eq {
            field: "paymentMethod",
            value: Value::String(method.to_string()),
        })],
    )
}

/// Sales flattened with their customer details.
///
/// Inner join: a sale whose customer id has no matching customer record is
/// silently dropped. The internal `_id` is suppressed from the output.
pub fn sales_with_customers() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Lookup {
                from: CUSTOMERS_COLLECTION,
                local_field: "customer",
                foreign_field: "_id",
                as_field: "customerDetails",
            },
            Stage::Unwind {
                path: "customerDetails",
            },
            Stage::Project(vec![
                ProjectField::Exclude("_id"),
                ProjectField::Include("orderId"),
                ProjectField::Include("totalAmount"),
                ProjectField::Include("items"),
                ProjectField::Include("date"),
                ProjectField::Include("paymentMethod"),
                ProjectField::Include("status"),
                ProjectField::Rename {
                    from: "customerDetails.name",
                    to: "customerName",
                },
                ProjectField::Rename {
                    from: "customerDetails.email",
                    to: "customerEmail",
                },
                ProjectField::Rename {
                    from: "customerDetails.location",
                    to: "customerLocation",
                },
                ProjectField::Rename {
                    from: "customerDetails.age",
                    to: "customerAge",
                },
            ]),
        ],
    )
}

/// All categories ranked by revenue, highest first: `{_id: category,
/// totalSales}` with no limit.
pub fn top_category() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Field("category"),
                accumulators: vec![Accumulator::sum("totalSales", "totalAmount")],
            },
            Stage::Sort {
                field: "totalSales",
                order: SortOrder::Descending,
            },
        ],
    )
}

/// Revenue per month, ascending: `{month, totalRevenue}`.
///
/// The month key is the first seven characters of the stored date string,
/// which assumes "YYYY-MM-DD" dates. Non-conforming dates land in whatever
/// bucket their prefix happens to form.
pub fn monthly_sales() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Prefix {
                    field: "date",
                    length: 7,
                },
                accumulators: vec![Accumulator::sum("totalRevenue", "totalAmount")],
            },
            Stage::Sort {
                field: "_id",
                order: SortOrder::Ascending,
            },
            Stage::Project(vec![
                ProjectField::Exclude("_id"),
                ProjectField::Rename {
                    from: "_id",
                    to: "month",
                },
                ProjectField::Include("totalRevenue"),
            ]),
        ],
    )
}

/// Customers with more than one order: `{customer, totalOrders}`.
pub fn repeat_customers() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Field("customer"),
                accumulators: vec![Accumulator::count("totalOrders")],
            },
            Stage::Match(Filter::Gt {
                field: "totalOrders",
                value: 1,
            }),
            Stage::Project(vec![
                ProjectField::Exclude("_id"),
                ProjectField::Rename {
                    from: "_id",
                    to: "customer",
                },
                ProjectField::Include("totalOrders"),
            ]),
        ],
    )
}

/// Per-order summary joined with the customer's location, with a derived 10%
/// tax: `{customer, location, totalAmount, tax, status}`. Inner join, same
/// exclusion rule as [`sales_with_customers`].
pub fn order_summary() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Lookup {
                from: CUSTOMERS_COLLECTION,
                local_field: "customer",
                foreign_field: "_id",
                as_field: "customerDetails",
            },
            Stage::Unwind {
                path: "customerDetails",
            },
            Stage::AddFields(vec![
                Derived {
                    name: "location",
                    expr: Expr::Field("customerDetails.location"),
                },
                Derived {
                    name: "tax",
                    expr: Expr::Multiply("totalAmount", 0.1),
                },
            ]),
            Stage::Project(vec![
                ProjectField::Exclude("_id"),
                ProjectField::Include("customer"),
                ProjectField::Include("location"),
                ProjectField::Include("totalAmount"),
                ProjectField::Include("tax"),
                ProjectField::Include("status"),
            ]),
        ],
    )
}

/// Average order value per category: `{category, totalSales, totalOrders,
/// avgOrderValue}`.
///
/// `totalOrders` is at least one for every group by construction, so the
/// division cannot hit zero.
pub fn avg_order_value() -> Pipeline {
    Pipeline::over(
        SALES_COLLECTION,
        vec![
            Stage::Group {
                key: GroupKey::Field("category"),
                accumulators: vec![
                    Accumulator::sum("totalSales", "totalAmount"),
                    Accumulator::count("totalOrders"),
                ],
            },
            Stage::AddFields(vec![Derived {
                name: "avgOrderValue",
                expr: Expr::Divide("totalSales", "totalOrders"),
            }]),
            Stage::Project(vec![
                ProjectField::Exclude("_id"),
                ProjectField::Rename {
                    from: "_id",
                    to: "category",
                },
                ProjectField::Include("totalSales"),
                ProjectField::Include("totalOrders"),
                ProjectField::Include("avgOrderValue"),
            ]),
        ],
    )
}

/// All parameterless reports by route name, for iteration in tests and docs.
pub fn fixed_reports() -> Vec<(&'static str, Pipeline)> {
    vec![
        ("total-sales-per-category", total_sales_per_category()),
        ("popular-payment-method", popular_payment_method()),
        ("top-customers", top_customers()),
        ("orders-per-day", orders_per_day()),
        ("sales-with-customers", sales_with_customers()),
        ("top-category", top_category()),
        ("monthly-sales", monthly_sales()),
        ("repeat-customers", repeat_customers()),
        ("order-summary", order_summary()),
        ("avg-order-value", avg_order_value()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixed_report_reads_the_sales_collection() {
        for (name, pipeline) in fixed_reports() {
            assert_eq!(pipeline.collection, SALES_COLLECTION, "report {name}");
        }
    }

    #[test]
    fn top_reports_cap_at_one_row() {
        for pipeline in [popular_payment_method(), top_customers()] {
            assert!(
                pipeline.stages.contains(&Stage::Limit(1)),
                "expected a limit stage in {pipeline:?}"
            );
        }
    }

    #[test]
    fn filter_by_payment_carries_the_literal_value() {
        let pipeline = filter_by_payment("CASH ");
        assert_eq!(
            pipeline.stages,
            vec![Stage::Match(Filter::Eq {
                field: "paymentMethod",
                value: Value::String("CASH ".to_string()),
            })]
        );
    }

    #[test]
    fn joining_reports_unwind_the_lookup() {
        for pipeline in [sales_with_customers(), order_summary()] {
            let lookup = pipeline.stages.iter().position(|s| {
                matches!(
                    s,
                    Stage::Lookup {
                        from: CUSTOMERS_COLLECTION,
                        ..
                    }
                )
            });
            let unwind = pipeline
                .stages
                .iter()
                .position(|s| matches!(s, Stage::Unwind { .. }));
            assert!(lookup.is_some() && unwind.is_some());
            assert!(lookup < unwind, "unwind must follow the lookup");
        }
    }
}
