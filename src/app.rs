use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::downloader;
use crate::error::InventoryError;
use crate::graph::{ChartOptions, render_category_chart};
use crate::labels::{LabelConfig, LayoutMode, generate_labels_pdf};
use crate::session::Session;

/// Address the dashboard listens on.
pub const BIND_ADDR: &str = "127.0.0.1:3000";

/// Highest threshold offered by the low-stock slider.
pub const MAX_LOW_STOCK_THRESHOLD: u32 = 20;

pub struct AppState {
    session: Mutex<Session>,
    labels: LabelConfig,
    // One label run at a time; runs share the PNG cache and the output PDF
    label_run: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(session: Session, labels: LabelConfig) -> Self {
        AppState {
            session: Mutex::new(session),
            labels,
            label_run: tokio::sync::Mutex::new(()),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize)]
struct ScanRequest {
    barcode: String,
}

#[derive(Serialize)]
struct ScanResponse {
    status: &'static str,
    message: String,
    name: Option<String>,
    stock: Option<u32>,
}

#[derive(Deserialize)]
struct LowStockQuery {
    threshold: Option<u32>,
}

#[derive(Deserialize)]
struct LabelsQuery {
    mode: Option<String>,
}

#[derive(Serialize)]
struct TableResponse {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<u32>,
}

#[derive(Serialize)]
struct LabelsResponse {
    status: &'static str,
    url: String,
}

/// JSON body sent for every failed request
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        code: status.as_u16(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            InventoryError::EmptyInput => (StatusCode::BAD_REQUEST, "EMPTY_INPUT"),
            InventoryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            InventoryError::Schema(_) => (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_ERROR"),
            InventoryError::Encoding { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "ENCODING_ERROR"),
            InventoryError::MissingAsset { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MISSING_ASSET")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };
        if status.is_server_error() {
            error!("{}", self);
        }
        error_response(status, kind, self.to_string())
    }
}

/// Open the inventory file and serve the dashboard until the process exits.
pub async fn run(csv_path: PathBuf, labels: LabelConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(&csv_path)?;
    let app = router(Arc::new(AppState::new(session, labels)));

    let listener = TcpListener::bind(BIND_ADDR).await?;
    info!("Listening on http://{}", BIND_ADDR);
    axum::serve(listener, app).await?;

    Ok(())
}

/// All dashboard routes. Generated PDFs are served from `/files`.
pub fn router(app_state: Arc<AppState>) -> Router {
    let out_dir = app_state.labels.out_dir.clone();

    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/inventory", get(get_inventory))
        .route("/api/low_stock", get(get_low_stock))
        .route("/api/scan", post(scan_barcode))
        .route("/api/categories", get(get_categories))
        .route("/api/chart.png", get(get_chart))
        .route("/api/labels", post(create_labels))
        .route("/api/export.xlsx", get(export_xlsx))
        .nest_service("/files", ServeDir::new(out_dir))
        .with_state(app_state)
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn get_inventory(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session();
    let inventory = session.inventory();

    Json(TableResponse {
        headers: inventory.headers().to_vec(),
        rows: inventory.rows(),
        threshold: None,
    })
}

async fn get_low_stock(
    Query(params): Query<LowStockQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let threshold = params.threshold.unwrap_or(0).min(MAX_LOW_STOCK_THRESHOLD);
    let session = state.session();
    let inventory = session.inventory();
    let low = inventory.low_stock(threshold);

    Json(TableResponse {
        headers: inventory.headers().to_vec(),
        rows: inventory.rows_of(&low),
        threshold: Some(threshold),
    })
}

async fn scan_barcode(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScanRequest>,
) -> Response {
    let mut session = state.session();

    match session.scan(&payload.barcode) {
        Ok(receipt) => Json(ScanResponse {
            status: "ok",
            message: format!("✓ {} → new stock: {}", receipt.name, receipt.stock),
            name: Some(receipt.name),
            stock: Some(receipt.stock),
        })
        .into_response(),
        Err(e) if e.is_scan_rejection() => {
            let (status, kind) = match &e {
                InventoryError::EmptyInput => (StatusCode::BAD_REQUEST, "warning"),
                _ => (StatusCode::NOT_FOUND, "error"),
            };
            (
                status,
                Json(ScanResponse {
                    status: kind,
                    message: e.to_string(),
                    name: None,
                    stock: None,
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn get_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session().inventory().stock_by_category())
}

async fn get_chart(State(state): State<Arc<AppState>>) -> Response {
    let totals = state.session().inventory().stock_by_category();

    match render_category_chart(&totals, &ChartOptions::default()) {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CHART_ERROR",
            e.to_string(),
        ),
    }
}

async fn create_labels(
    Query(params): Query<LabelsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mode = match params.mode.as_deref() {
        None => state.labels.mode,
        Some(name) => match LayoutMode::parse(name) {
            Some(mode) => mode,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    format!("unknown label mode '{}'", name),
                );
            }
        },
    };

    let _run = state.label_run.lock().await;
    let inventory = state.session().inventory().clone();
    let config = state.labels.clone().with_mode(mode);

    let generated =
        tokio::task::spawn_blocking(move || generate_labels_pdf(&inventory, &config)).await;

    match generated {
        Ok(Ok(path)) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Json(LabelsResponse {
                status: "ok",
                url: format!("/files/{}", file_name),
            })
            .into_response()
        }
        Ok(Err(e)) => e.into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            e.to_string(),
        ),
    }
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let exported = downloader::to_xlsx(state.session().inventory());

    match exported {
        Ok(bytes) => (
            [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                ),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory.xlsx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "EXPORT_ERROR",
            e.to_string(),
        ),
    }
}
