use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d410_sales_overview::{
    DashboardErrorResponse, Regionalization, RegionsRequest, SalesOverviewRequest,
    SalesOverviewResponse,
};

use crate::dashboards::d410_sales_overview::service;
use crate::routes::AppState;
use crate::shared::error::DashboardError;

/// Error body returned by every D410 endpoint
#[derive(Debug)]
pub struct ApiError(pub DashboardError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DashboardError::NoYearsSelected => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::UnknownCategory(_) => StatusCode::BAD_REQUEST,
            DashboardError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = DashboardErrorResponse {
            code: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Runs a pipeline call on the blocking pool; CSV parsing and k-means are CPU bound.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DashboardError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!("D410 Dashboard: Worker task failed: {}", e);
            Err(ApiError(DashboardError::Io(std::io::Error::other(e.to_string()))))
        }
    }
}

fn log_failure(action: &str, err: &ApiError) {
    if err.0.is_recoverable() {
        tracing::warn!("D410 Dashboard: {} rejected: {}", action, err.0);
    } else {
        tracing::error!("D410 Dashboard: Failed to {}: {}", action, err.0);
    }
}

/// GET /api/d410/years
pub async fn get_available_years(State(state): State<AppState>) -> Result<Json<Vec<i32>>, ApiError> {
    let source = state.source.clone();
    match run_blocking(move || service::list_years(source.as_ref())).await {
        Ok(years) => {
            tracing::info!("D410 Dashboard: Returning {} available years", years.len());
            Ok(Json(years))
        }
        Err(e) => {
            log_failure("list years", &e);
            Err(e)
        }
    }
}

/// GET /api/d410/categories
pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let source = state.source.clone();
    match run_blocking(move || service::list_categories(source.as_ref())).await {
        Ok(categories) => {
            tracing::info!(
                "D410 Dashboard: Returning {} product categories",
                categories.len()
            );
            Ok(Json(categories))
        }
        Err(e) => {
            log_failure("list categories", &e);
            Err(e)
        }
    }
}

/// POST /api/d410/overview
pub async fn get_sales_overview(
    State(state): State<AppState>,
    Json(request): Json<SalesOverviewRequest>,
) -> Result<Json<SalesOverviewResponse>, ApiError> {
    tracing::info!(
        "D410 Dashboard: Building overview for years {:?}, category {:?}, strategy {:?}",
        request.years,
        request.category,
        request.strategy
    );

    let source = state.source.clone();
    match run_blocking(move || service::build_overview(source.as_ref(), &request)).await {
        Ok(response) => {
            tracing::info!(
                "D410 Dashboard: Returning overview with {} regions and {} months",
                response.regions.records().len(),
                response.monthly_sales_trend.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            log_failure("build overview", &e);
            Err(e)
        }
    }
}

/// POST /api/d410/regions
pub async fn get_regions(
    State(state): State<AppState>,
    Json(request): Json<RegionsRequest>,
) -> Result<Json<Regionalization>, ApiError> {
    tracing::info!(
        "D410 Dashboard: Regionalizing years {:?} with {:?}",
        request.years,
        request.strategy
    );

    let source = state.source.clone();
    match run_blocking(move || service::build_regions(source.as_ref(), &request)).await {
        Ok(regions) => {
            tracing::info!(
                "D410 Dashboard: Returning {} regions",
                regions.records().len()
            );
            Ok(Json(regions))
        }
        Err(e) => {
            log_failure("regionalize", &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use contracts::domain::a030_order_line::OrderLine;
    use tower::ServiceExt;

    use super::*;
    use crate::dashboards::d410_sales_overview::test_support::line;
    use crate::routes::configure_routes;
    use crate::shared::data::dataset_loader::OrderLineSource;

    struct FixedSource(Vec<OrderLine>);

    impl OrderLineSource for FixedSource {
        fn load(&self) -> Result<Vec<OrderLine>, DashboardError> {
            Ok(self.0.clone())
        }
    }

    struct MissingSource;

    impl OrderLineSource for MissingSource {
        fn load(&self) -> Result<Vec<OrderLine>, DashboardError> {
            Err(DashboardError::DataUnavailable {
                primary: "a.csv".into(),
                fallback: "b.csv".into(),
            })
        }
    }

    fn app(source: impl OrderLineSource + Send + Sync + 'static) -> axum::Router {
        configure_routes(AppState {
            source: Arc::new(source),
        })
    }

    fn fixed() -> FixedSource {
        FixedSource(vec![
            line("2017-01-10 10:00:00", "p1", Some("toys"), "SP", 3, 10.0, Some(5)),
            line("2017-05-10 10:00:00", "p2", Some("garden"), "RJ", 1, 20.0, Some(4)),
            line("2018-02-10 10:00:00", "p3", Some("toys"), "BA", 2, 5.0, None),
        ])
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(fixed())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_years_and_categories() {
        let response = app(fixed())
            .oneshot(Request::get("/api/d410/years").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([2017, 2018]));

        let response = app(fixed())
            .oneshot(
                Request::get("/api/d410/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            serde_json::json!(["garden", "toys"])
        );
    }

    #[tokio::test]
    async fn test_overview_returns_headline() {
        let response = app(fixed())
            .oneshot(post_json("/api/d410/overview", r#"{"years":[2017]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["headline"]["total_units_sold"], 4);
        assert_eq!(body["headline"]["total_review_score"], 9);
        assert_eq!(body["regions"]["strategy"], "quantile");
        let rj = body["regions"]["records"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["state_code"] == "RJ")
            .unwrap();
        assert_eq!(rj["tier"]["value"], "Low Sales Region");
    }

    #[tokio::test]
    async fn test_empty_year_selection_is_unprocessable() {
        let response = app(fixed())
            .oneshot(post_json("/api/d410/overview", r#"{"years":[]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["code"], "no_years_selected");
    }

    #[tokio::test]
    async fn test_unknown_category_is_bad_request() {
        let response = app(fixed())
            .oneshot(post_json(
                "/api/d410/overview",
                r#"{"years":[2017],"category":"books"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_service_unavailable() {
        let response = app(MissingSource)
            .oneshot(post_json(
                "/api/d410/regions",
                r#"{"years":[2017],"strategy":"kmeans"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["code"], "data_unavailable");
    }

    #[tokio::test]
    async fn test_regions_with_kmeans() {
        let response = app(fixed())
            .oneshot(post_json(
                "/api/d410/regions",
                r#"{"years":[2017,2018],"strategy":"kmeans"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["strategy"], "kmeans");
        assert_eq!(body["records"].as_array().unwrap().len(), 3);
        assert_eq!(body["elbow"].as_array().unwrap().len(), 9);
    }
}
