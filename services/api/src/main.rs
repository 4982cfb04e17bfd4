mod chart;
mod mistral;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chartbot_common::types::ServiceInfo;
use chartbot_config::{init_tracing, AppConfig};
use chartbot_db::testcases::pg_repository::PgTestCaseRepository;
use chartbot_engine::ChartEngine;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

use mistral::{MistralClient, MistralConfig};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChartEngine<PgTestCaseRepository, MistralClient>>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("chartbot-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP chartbot_up Service up indicator\n\
# TYPE chartbot_up gauge\n\
chartbot_up 1\n\
# HELP chartbot_info Service info\n\
# TYPE chartbot_info gauge\n\
chartbot_info{service=\"chartbot-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(chart::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "chartbot-api", "starting");

    let pool = chartbot_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let mistral_config = MistralConfig::from_env().expect("invalid Mistral config");
    if mistral_config.is_none() {
        tracing::warn!("MISTRAL_API_KEY not set, only keyword questions will resolve");
    }
    let llm = MistralClient::new(mistral_config).expect("failed to build http client");

    let state = AppState {
        engine: Arc::new(ChartEngine::new(PgTestCaseRepository::new(pool), llm)),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use sqlx::PgPool;
    use tower::ServiceExt;

    async fn test_state() -> Option<(AppState, PgPool)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = chartbot_db::create_pool(&url)
            .await
            .expect("db should connect");
        let llm = MistralClient::new(None).expect("client should build");
        let state = AppState {
            engine: Arc::new(ChartEngine::new(
                PgTestCaseRepository::new(pool.clone()),
                llm,
            )),
        };
        Some((state, pool))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body should read");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let Some((state, _pool)) = test_state().await else {
            return;
        };
        let app = build_router(state);
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn suggestions_lists_canned_questions() {
        let Some((state, _pool)) = test_state().await else {
            return;
        };
        let app = build_router(state);
        let resp = app
            .oneshot(Request::get("/suggestions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["suggestions"].as_array().unwrap().len() >= 5);
    }

    #[tokio::test]
    async fn chart_endpoint_answers_a_keyword_question() {
        let Some((state, pool)) = test_state().await else {
            return;
        };
        sqlx::query(
            "insert into cas_de_test (projet, prio, criticality, test_state, date_creation) \
             values ('chartbot-it-projet', 'High', 'High', 'OK', now())",
        )
        .execute(&pool)
        .await
        .expect("insert test case");

        let app = build_router(state);
        let resp = app
            .oneshot(
                Request::post("/chart")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"message": "répartition par projet"}"#.to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["is_heatmap"], false);

        sqlx::query("delete from cas_de_test where projet = 'chartbot-it-projet'")
            .execute(&pool)
            .await
            .expect("cleanup");
    }

    #[tokio::test]
    async fn empty_question_answers_with_a_failure_body() {
        let Some((state, _pool)) = test_state().await else {
            return;
        };
        let app = build_router(state);
        let resp = app
            .oneshot(
                Request::post("/chart")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "   "}"#.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().is_some());
    }
}
