//! Shared fixtures for the report catalog tests.

use tally_core::{Customer, MemoryStore, Sale};

/// Builds a sale with the fields the reports care about; the rest stay fixed.
pub fn sale(
    order_id: i64,
    customer: i64,
    category: &str,
    total_amount: f64,
    date: &str,
    payment_method: &str,
) -> Sale {
    Sale {
        order_id,
        customer,
        category: category.to_string(),
        total_amount,
        items: 1,
        date: date.to_string(),
        payment_method: payment_method.to_string(),
        status: "delivered".to_string(),
    }
}

pub fn customer(id: i64, name: &str, location: &str) -> Customer {
    Customer {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        location: location.to_string(),
        age: 30 + id,
    }
}

/// The worked three-sale dataset from the report semantics:
/// two category-A sales by customer 1, one category-B sale by customer 2.
pub fn worked_example() -> MemoryStore {
    MemoryStore::new(
        &[
            sale(1, 1, "A", 100.0, "2024-01-05", "credit"),
            sale(2, 1, "A", 50.0, "2024-01-20", "credit"),
            sale(3, 2, "B", 30.0, "2024-02-01", "cash"),
        ],
        &[customer(1, "Ada", "London"), customer(2, "Bo", "Oslo")],
    )
    .expect("fixture serializes")
}

/// A broader dataset: four customers, three categories, three months, one
/// sale whose customer id has no customer record (id 99).
pub fn seeded_store() -> MemoryStore {
    MemoryStore::new(
        &[
            sale(1, 1, "Electronics", 250.0, "2024-01-03", "credit"),
            sale(2, 1, "Electronics", 120.5, "2024-01-15", "credit"),
            sale(3, 2, "Books", 35.0, "2024-01-20", "cash"),
            sale(4, 3, "Books", 18.25, "2024-02-02", "paypal"),
            sale(5, 2, "Garden", 74.0, "2024-02-14", "cash"),
            sale(6, 99, "Garden", 41.0, "2024-03-01", "credit"),
            sale(7, 4, "Electronics", 330.0, "2024-03-09", "credit"),
        ],
        &[
            customer(1, "Ada", "London"),
            customer(2, "Bo", "Oslo"),
            customer(3, "Chen", "Taipei"),
            customer(4, "Dina", "Cairo"),
        ],
    )
    .expect("fixture serializes")
}
