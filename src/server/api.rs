use crate::core::{
    calculate_depreciation, parse_purchase_date, Depreciation, DepreciationError,
    DepreciationInput,
};
use crate::server::config::{Config, CorsOrigins};
use crate::server::error::{ApiError, ApiResult};
use crate::utils::today;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Body of `POST /api/v1/depreciation`. Every field is optional here so that
/// a missing field is reported as a bad request rather than a decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationRequest {
    purchase_price: Option<f64>,
    useful_life_years: Option<f64>,
    purchase_date: Option<String>,
    /// Defaults to today
    evaluation_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationResponse {
    #[serde(with = "rust_decimal::serde::float")]
    current_book_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    monthly_depreciation: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    accumulated_depreciation: Decimal,
    months_elapsed: i64,
}

impl From<Depreciation> for DepreciationResponse {
    fn from(d: Depreciation) -> Self {
        DepreciationResponse {
            current_book_value: d.current_book_value,
            monthly_depreciation: d.monthly_depreciation,
            accumulated_depreciation: d.accumulated_depreciation,
            months_elapsed: d.months_elapsed,
        }
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

async fn calculate(
    payload: Result<Json<DepreciationRequest>, JsonRejection>,
) -> ApiResult<Json<DepreciationResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let price = request
        .purchase_price
        .ok_or(DepreciationError::MissingField("purchasePrice"))?;
    let life = request
        .useful_life_years
        .ok_or(DepreciationError::MissingField("usefulLifeYears"))?;
    let purchase_date = request
        .purchase_date
        .ok_or(DepreciationError::MissingField("purchaseDate"))?;
    let input = DepreciationInput::from_f64(price, life, &purchase_date)?;

    let as_of = match request.evaluation_date.as_deref() {
        Some(date) => parse_purchase_date(date)
            .map_err(|_| ApiError::BadRequest(format!("invalid evaluationDate: {date}")))?,
        None => today(),
    };

    let result = calculate_depreciation(&input, as_of)?;
    Ok(Json(result.into()))
}

pub fn app_router(config: &Config) -> Router {
    let cors = match &config.cors_allow {
        CorsOrigins::Any => CorsLayer::new().allow_origin(Any),
        CorsOrigins::List(origins) => {
            CorsLayer::new().allow_origin(AllowOrigin::list(origins.iter().cloned()))
        }
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/depreciation", post(calculate));

    Router::new().nest("/api/v1", api).layer(cors)
}
