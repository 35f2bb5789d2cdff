// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// Startup
pub mod config;
pub mod logging;

// Message store client library
pub mod message_store;

// Completion provider layer
pub mod llm;

// Exchange orchestration
pub mod relay;
