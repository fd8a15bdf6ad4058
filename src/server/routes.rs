use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::payload::{parse_analyze_request, parse_json, ClassifyRequest};
use crate::analysis::{AnalysisResult, ClassificationSuggestion};
use crate::app::AppState;

#[derive(Debug, Serialize)]
struct ModelsBody {
    models: Vec<String>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analise-dre", post(analyze_dre))
        .route("/api/sugerir-classificacao", post(suggest_classification))
        .route("/api/modelos", get(list_models))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let cache = state.analyzer.loader().cache_stats();
    Json(json!({
        "status": "ok",
        "contextCache": {
            "hits": cache.hits,
            "misses": cache.misses,
            "hitRate": cache.hit_rate(),
        }
    }))
}

async fn analyze_dre(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request = parse_analyze_request(&body)?;
    let result = state
        .analyzer
        .analyze(&request.input, request.model.as_deref())
        .await?;
    Ok(Json(result))
}

async fn suggest_classification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ClassificationSuggestion>, ApiError> {
    let request: ClassifyRequest = parse_json(&body)?;
    let suggestion = state
        .analyzer
        .suggest_classification(&request.descricao, request.tipo, &request.opcoes)
        .await?;
    Ok(Json(suggestion))
}

async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsBody>, ApiError> {
    let models = state.analyzer.gateway().list_models().await?;
    Ok(Json(ModelsBody { models }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use mockito::{Matcher, Server};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn config(base_url: &str, dir: &TempDir, api_key: Option<&str>) -> Config {
        let mut config = Config::default();
        config.llm.api_base_url = Some(base_url.to_string());
        config.llm.default_model = Some("stable".to_string());
        config.llm.api_key = api_key.map(str::to_string);
        config.llm.api_key_env = "DRE_TEST_UNSET_ROUTES_KEY".to_string();
        config.llm.timeout_secs = 5;
        config.context.primary_path = dir.path().join("contexto-dre.md");
        config.context.chart_of_accounts_path = dir.path().join("plano-de-contas.md");
        config.context.transcripts_path = dir.path().join("transcricoes.md");
        config
    }

    fn app(config: Config) -> Router {
        router(AppState::from_config(config).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn completion_body(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    const ENTRIES: &str = r#"{
        "origem": "lancamentos",
        "total_lancamentos": 2,
        "itens": [
            {"data": "2024-01-10", "descricao": "Venda", "valor": 1000, "tipo": "receita",
             "classificacao": "Receita de vendas", "grupo": "Receita bruta"},
            {"data": "2024-01-12", "descricao": "Aluguel", "valor": "400", "tipo": "despesa",
             "classificacao": "Aluguel", "grupo": "Despesas operacionais"}
        ]
    }"#;

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let response = app(config("http://127.0.0.1:9", &dir, Some("k")))
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({"status": "ok", "contextCache": {"hits": 0, "misses": 0, "hitRate": 0.0}})
        );
    }

    #[tokio::test]
    async fn test_health_reports_context_cache_hits() {
        let mut server = Server::new_async().await;
        let _upstream = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion_body("## Resumo executivo"))
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("contexto-dre.md"), "contexto").unwrap();
        let app = app(config(&server.url(), &dir, Some("k")));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/api/analise-dre", r#"{"dre": "Receita 100"}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["contextCache"]["hits"], 1);
        assert_eq!(body["contextCache"]["misses"], 1);
        assert_eq!(body["contextCache"]["hitRate"], 50.0);
    }

    #[tokio::test]
    async fn test_get_on_analysis_is_405() {
        let dir = TempDir::new().unwrap();
        let response = app(config("http://127.0.0.1:9", &dir, Some("k")))
            .oneshot(Request::get("/api/analise-dre").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_empty_items_is_400_without_network() {
        let mut server = Server::new_async().await;
        let upstream = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();

        let response = app(config(&server.url(), &dir, Some("k")))
            .oneshot(post_json("/api/analise-dre", r#"{"itens": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].is_string());
        upstream.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_json_is_400() {
        let dir = TempDir::new().unwrap();
        let response = app(config("http://127.0.0.1:9", &dir, Some("k")))
            .oneshot(post_json("/api/analise-dre", "{itens"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analysis_end_to_end() {
        let mut server = Server::new_async().await;
        let upstream = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer k")
            .match_body(Matcher::PartialJson(json!({"model": "stable"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                "## Resumo executivo\nResultado positivo.\n\n- **Aula 3** — https://example.com/aula-3",
            ))
            .expect(1)
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("contexto-dre.md"),
            "## Links rápidos\n- Aula 3: https://example.com/aula-3",
        )
        .unwrap();

        let response = app(config(&server.url(), &dir, Some("k")))
            .oneshot(post_json("/api/analise-dre", ENTRIES))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["contextSource"], "primary");
        assert_eq!(body["contextTruncated"], false);
        assert_eq!(body["model"], "stable");
        assert!(body["analysis"]
            .as_str()
            .unwrap()
            .starts_with("## Resumo executivo"));
        assert_eq!(body["nodes"][0]["type"], "heading");
        assert_eq!(body["nodes"][3]["type"], "recommendation");
        assert_eq!(body["nodes"][3]["link"]["href"], "https://example.com/aula-3");
        assert!(body["html"]
            .as_str()
            .unwrap()
            .contains("rel=\"noopener noreferrer\""));
        upstream.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let mut server = Server::new_async().await;
        let upstream = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("contexto-dre.md"), "contexto").unwrap();

        let response = app(config(&server.url(), &dir, None))
            .oneshot(post_json("/api/analise-dre", ENTRIES))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert!(body["error"].is_string());
        assert!(body.get("details").is_none());
        upstream.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_context_is_500_generic() {
        let dir = TempDir::new().unwrap();
        let response = app(config("http://127.0.0.1:9", &dir, Some("k")))
            .oneshot(post_json("/api/analise-dre", r#"{"dre": "Receita 100"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Tente novamente"));
    }

    #[tokio::test]
    async fn test_suggest_classification() {
        let mut server = Server::new_async().await;
        let _upstream = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion_body("Aluguel"))
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();

        let response = app(config(&server.url(), &dir, Some("k")))
            .oneshot(post_json(
                "/api/sugerir-classificacao",
                r#"{"descricao": "Aluguel da loja", "tipo": "despesa", "opcoes": ["Energia", "Aluguel"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({"classificacao": "Aluguel", "matched": true})
        );
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = Server::new_async().await;
        let _upstream = server
            .mock("GET", "/models")
            .with_status(200)
            .with_body(
                json!({"data": [
                    {"id": "b-model", "active": true},
                    {"id": "a-model"},
                    {"id": "old", "active": false},
                    {"id": "b-model", "active": true}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();

        let response = app(config(&server.url(), &dir, Some("k")))
            .oneshot(Request::get("/api/modelos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({"models": ["a-model", "b-model"]})
        );
    }
}
