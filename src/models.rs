use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Chef,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Chef => "chef",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Fraud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Transitions the backend accepts: `pending -> accepted -> delivered`
    /// and `pending -> cancelled`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Accepted, OrderStatus::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct User {
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub chef_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl User {
    pub fn is_fraud(&self) -> bool {
        self.status == UserStatus::Fraud
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub price: i64,
    pub rating: f64,
    #[sqlx(json)]
    pub ingredients: Vec<String>,
    pub chef_id: String,
    pub chef_name: String,
    pub chef_experience: String,
    pub delivery_area: String,
    pub estimated_delivery_minutes: u32,
    pub chef_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub price: i64,
    pub quantity: u32,
    pub total: i64,
    pub chef_id: String,
    pub customer_email: String,
    pub address: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Upper bound on a meal price, keeping every order total and its minor-unit
/// amount well inside `i64`.
pub const MAX_MEAL_PRICE: i64 = 1_000_000;
pub const MAX_ORDER_QUANTITY: u32 = 1_000;

/// `price * quantity`, or `None` when it does not fit.
pub fn order_total(price: i64, quantity: u32) -> Option<i64> {
    price.checked_mul(i64::from(quantity))
}

impl Order {
    /// Amount in minor currency units, as handed to the payment processor.
    pub fn amount_minor_units(&self) -> Option<i64> {
        order_total(self.price, self.quantity)?.checked_mul(100)
    }

    pub fn is_payable(&self) -> bool {
        self.status == OrderStatus::Accepted && self.payment_status == PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub reviewer_email: String,
    pub reviewer_name: String,
    pub reviewer_photo: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_email: String,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub meal_image: String,
    pub price: i64,
    pub chef_name: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromRow)]
pub struct RoleRequest {
    pub id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub requested_role: Role,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_meals: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub delivered_orders: i64,
    pub total_payment: i64,
}

/// Credential record held by the local identity provider.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub password_hash: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}
