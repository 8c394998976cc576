//! Form validation run before anything is sent. Every check records a
//! per-field message; a form is submitted only when none were recorded.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::{
    client::error::{ClientResult, ValidationErrors},
    dto::{
        meals::CreateMealRequest,
        orders::PlaceOrderRequest,
        reviews::{CreateReviewRequest, UpdateReviewRequest},
    },
    models::{MAX_MEAL_PRICE, MAX_ORDER_QUANTITY},
};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str, label: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
        return false;
    }
    true
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if required(errors, "email", email, "Email") && !is_valid_email(email) {
        errors.add("email", "Please enter a valid email address");
    }
}

/// At least six characters with one uppercase and one lowercase letter.
pub fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, "Password must be at least 6 characters");
    } else if !password.chars().any(char::is_uppercase) {
        errors.add(field, "Password must contain an uppercase letter");
    } else if !password.chars().any(char::is_lowercase) {
        errors.add(field, "Password must contain a lowercase letter");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> ClientResult<()> {
        let mut errors = ValidationErrors::default();
        required(&mut errors, "name", &self.name, "Name");
        check_email(&mut errors, &self.email);
        check_password(&mut errors, "password", &self.password);
        if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ClientResult<()> {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, &self.email);
        required(&mut errors, "password", &self.password, "Password");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
}

impl ReviewForm {
    pub fn validate(&self) -> ClientResult<()> {
        let mut errors = ValidationErrors::default();
        if !(1..=5).contains(&self.rating) {
            errors.add("rating", "Rating must be between 1 and 5");
        }
        required(&mut errors, "comment", &self.comment, "Comment");
        errors.into_result()
    }

    pub fn to_create(&self, meal_id: Uuid) -> ClientResult<CreateReviewRequest> {
        self.validate()?;
        Ok(CreateReviewRequest {
            meal_id,
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        })
    }

    pub fn to_update(&self) -> ClientResult<UpdateReviewRequest> {
        self.validate()?;
        Ok(UpdateReviewRequest {
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        })
    }
}

pub fn validate_order(meal_id: Uuid, quantity: u32, address: &str) -> ClientResult<PlaceOrderRequest> {
    let mut errors = ValidationErrors::default();
    if quantity < 1 {
        errors.add("quantity", "Quantity must be at least 1");
    } else if quantity > MAX_ORDER_QUANTITY {
        errors.add(
            "quantity",
            format!("Quantity must not exceed {MAX_ORDER_QUANTITY}"),
        );
    }
    required(&mut errors, "address", address, "Delivery address");
    errors.into_result()?;
    Ok(PlaceOrderRequest {
        meal_id,
        quantity,
        address: address.trim().to_string(),
    })
}

/// Chef's create-meal form. Ingredients are entered comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealForm {
    pub name: String,
    pub image_url: String,
    pub price: i64,
    pub ingredients: String,
    pub chef_experience: String,
    pub delivery_area: String,
    pub estimated_delivery_minutes: u32,
}

impl MealForm {
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> ClientResult<CreateMealRequest> {
        let mut errors = ValidationErrors::default();
        required(&mut errors, "name", &self.name, "Meal name");
        required(&mut errors, "image_url", &self.image_url, "Image");
        if self.price <= 0 {
            errors.add("price", "Price must be greater than 0");
        } else if self.price > MAX_MEAL_PRICE {
            errors.add("price", format!("Price must not exceed {MAX_MEAL_PRICE}"));
        }
        if self.ingredient_list().is_empty() {
            errors.add("ingredients", "Add at least one ingredient");
        }
        required(&mut errors, "delivery_area", &self.delivery_area, "Delivery area");
        if self.estimated_delivery_minutes == 0 {
            errors.add("estimated_delivery_minutes", "Estimated delivery time is required");
        }
        errors.into_result()?;

        Ok(CreateMealRequest {
            name: self.name.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            price: self.price,
            ingredients: self.ingredient_list(),
            chef_experience: self.chef_experience.trim().to_string(),
            delivery_area: self.delivery_area.trim().to_string(),
            estimated_delivery_minutes: self.estimated_delivery_minutes,
        })
    }
}
