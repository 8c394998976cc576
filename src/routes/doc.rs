use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{IdToken, IdentityUser, LoginRequest, RegisterRequest, SessionTokens, TokenRequest},
        favorites::{AddFavoriteRequest, FavoriteList},
        meals::{CreateMealRequest, MealList, UpdateMealRequest},
        orders::{OrderList, PayOrderRequest, PlaceOrderRequest, UpdateOrderStatusRequest},
        params::{MealListQuery, SortOrder},
        payments::{CreatePaymentIntentRequest, UploadResponse, UploadedImage},
        requests::{ResolveRoleRequest, RoleRequestList, SubmitRoleRequest},
        reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
        users::{RoleResponse, UpdateProfileRequest, UpsertUserRequest, UserList},
    },
    models::{
        AdminStats, Favorite, Meal, Order, OrderStatus, PaymentIntent, PaymentStatus,
        RequestStatus, Review, Role, RoleRequest, User, UserStatus,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, favorites, health, meals, orders, payments, requests, reviews, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh_token,
        auth::logout,
        meals::list_meals,
        meals::get_meal,
        meals::list_chef_meals,
        meals::create_meal,
        meals::update_meal,
        meals::delete_meal,
        reviews::list_meal_reviews,
        reviews::list_recent_reviews,
        reviews::list_user_reviews,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        orders::place_order,
        orders::list_customer_orders,
        orders::list_chef_orders,
        orders::update_order_status,
        orders::pay_order,
        users::upsert_user,
        users::update_profile,
        users::get_user,
        users::get_role,
        users::list_users,
        users::flag_fraud,
        requests::submit_request,
        requests::list_requests,
        requests::resolve_request,
        admin::platform_stats,
        payments::create_payment_intent,
        payments::upload_image
    ),
    components(
        schemas(
            User,
            Meal,
            Order,
            Review,
            Favorite,
            RoleRequest,
            AdminStats,
            PaymentIntent,
            Role,
            UserStatus,
            OrderStatus,
            PaymentStatus,
            RequestStatus,
            RegisterRequest,
            LoginRequest,
            TokenRequest,
            SessionTokens,
            IdToken,
            IdentityUser,
            CreateMealRequest,
            UpdateMealRequest,
            MealList,
            MealListQuery,
            SortOrder,
            CreateReviewRequest,
            UpdateReviewRequest,
            ReviewList,
            AddFavoriteRequest,
            FavoriteList,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            PayOrderRequest,
            OrderList,
            UpsertUserRequest,
            UpdateProfileRequest,
            RoleResponse,
            UserList,
            SubmitRoleRequest,
            ResolveRoleRequest,
            RoleRequestList,
            CreatePaymentIntentRequest,
            UploadResponse,
            UploadedImage,
            Meta,
            ApiResponse<Meal>,
            ApiResponse<MealList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<User>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Local identity provider"),
        (name = "Meals", description = "Meal endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Requests", description = "Role upgrade requests"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Payments", description = "Payment and upload endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
