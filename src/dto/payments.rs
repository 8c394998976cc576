use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct CreatePaymentIntentRequest {
    pub order_id: Uuid,
    /// Minor currency units.
    pub amount: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct UploadedImage {
    pub url: String,
    pub display_url: String,
}

/// imgbb answers `{"data": {...}, "success": true, "status": 200}`.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct UploadResponse {
    pub data: UploadedImage,
    pub success: bool,
    pub status: u16,
}
