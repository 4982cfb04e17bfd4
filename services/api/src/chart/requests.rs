use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub message: String,
}
