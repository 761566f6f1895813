//! HTTP shell for the coverage backend.
//!
//! A thin axum layer over [`crate::services::compute_coverage`]: it reads the
//! multipart upload, runs the computation on the blocking pool and renders
//! the report or error as JSON.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                   │
//! │  - multipart parsing, format selection        │
//! │  - CORS, compression, tracing, body limit     │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  Service Layer (services/)                    │
//! │  - demand index, availability, coverage       │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  Parsing Layer (parsing/)                     │
//! │  - delimited text / spreadsheet rows          │
//! └──────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
