//! Query-resolution and aggregation engine: free-form French questions in,
//! renderer-agnostic chart payloads out.

pub mod aggregate;
pub mod intent;
pub mod llm;
pub mod matrix;
pub mod palette;
pub mod payload;
pub mod service;
pub mod spec;
pub mod timeframe;

pub use llm::LlmResolver;
pub use payload::{ChartData, ChartResponse};
pub use service::ChartEngine;
