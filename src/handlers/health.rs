use crate::models::{HealthResponse, WelcomeResponse};
use std::convert::Infallible;

// GET /chatbot/health
pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse {
        status: "ok".to_string(),
        message: "Chatbot service is running".to_string(),
    }))
}

// GET /
pub async fn welcome_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&WelcomeResponse {
        message: "Welcome to the Chatbot Backend".to_string(),
    }))
}
