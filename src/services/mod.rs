pub mod admin_service;
pub mod auth_service;
pub mod favorite_service;
pub mod meal_service;
pub mod order_service;
pub mod payment_service;
pub mod request_service;
pub mod review_service;
pub mod user_service;
