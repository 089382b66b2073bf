use axum::Json;

use crate::dto::MessageResponse;

pub async fn index_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Casting Agency API"))
}
