use serde::{Deserialize, Serialize};

/// User row for list views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
  pub id: u64,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub gender: String,
  pub phone: String,
  pub image: String,
  pub company: Option<Company>,
}

impl User {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
  pub name: String,
  pub department: String,
  pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
  pub address: String,
  pub city: String,
  pub state: String,
  pub postal_code: String,
}

/// Full user record from `GET /users/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetail {
  pub id: u64,
  pub first_name: String,
  pub last_name: String,
  pub username: String,
  pub email: String,
  pub phone: String,
  pub gender: String,
  pub age: Option<u32>,
  pub birth_date: Option<String>,
  pub blood_group: Option<String>,
  pub image: String,
  pub address: Option<Address>,
  pub company: Option<Company>,
}

/// Product row for list views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
  pub id: u64,
  pub title: String,
  pub description: String,
  pub price: f64,
  pub rating: f64,
  pub stock: i64,
  pub brand: Option<String>,
  pub category: String,
  pub thumbnail: String,
  pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
  pub width: f64,
  pub height: f64,
  pub depth: f64,
}

/// Full product record from `GET /products/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDetail {
  pub id: u64,
  pub title: String,
  pub description: String,
  pub price: f64,
  pub discount_percentage: f64,
  pub rating: f64,
  pub stock: i64,
  pub brand: Option<String>,
  pub category: String,
  pub dimensions: Option<Dimensions>,
  pub warranty_information: Option<String>,
  pub shipping_information: Option<String>,
  pub images: Vec<String>,
}

/// Identity of the logged-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
  pub id: u64,
  pub username: String,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub gender: String,
  pub image: String,
}

/// One resolved page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
  pub skip: u64,
  pub limit: u64,
}

/// Successful login: bearer token plus the account it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
  pub token: String,
  pub account: Account,
}
