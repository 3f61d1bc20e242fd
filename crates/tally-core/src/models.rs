//! Record types as persisted in the sales database.
//!
//! All three collections are externally owned: this service only ever reads
//! them. Field names follow the stored documents (camelCase, numeric `_id` on
//! the reference collections).

use serde::{Deserialize, Serialize};

/// One order in the `sales` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub order_id: i64,
    /// References [`Customer::id`]. Sales whose customer no longer exists are
    /// silently dropped by the joining reports.
    pub customer: i64,
    pub category: String,
    pub total_amount: f64,
    pub items: i64,
    /// Stored as an ISO-like "YYYY-MM-DD" string; the monthly report keys on
    /// its first seven characters.
    pub date: String,
    pub payment_method: String,
    pub status: String,
}

/// One customer in the `customers` collection, joined from [`Sale::customer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub location: String,
    pub age: i64,
}

/// One product in the `products` collection.
///
/// Matches [`Sale::category`] by value. No current report reads it; it is
/// carried as the reference entity for category-level joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}
