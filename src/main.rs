use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};

use hms_core::config::data_dir_from_env_value;
use hms_core::{
    Appointment, Bill, CollectionKey, CoreConfig, DashboardSummary, HospitalError,
    HospitalService, Record,
};

/// Application state shared across REST API handlers
#[derive(Clone)]
struct AppState {
    hospital: HospitalService,
}

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(Serialize, ToSchema)]
struct SummaryRes {
    patients: usize,
    doctors: usize,
    staff: usize,
    medicines: usize,
    appointments: usize,
    machinery: usize,
    available_beds: usize,
}

impl From<DashboardSummary> for SummaryRes {
    fn from(s: DashboardSummary) -> Self {
        Self {
            patients: s.patients,
            doctors: s.doctors,
            staff: s.staff,
            medicines: s.medicines,
            appointments: s.appointments,
            machinery: s.machinery,
            available_beds: s.available_beds,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ListRecordsRes {
    /// Field names in column order
    columns: Vec<String>,
    /// One row per record, values aligned with `columns`
    rows: Vec<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
struct MutationRes {
    /// Collection size after an add, records removed after a delete
    count: usize,
}

#[derive(Deserialize, ToSchema)]
struct SelectionReq {
    /// Values of the selected row, in column order
    values: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
struct BookAppointmentReq {
    patient_name: String,
    doctor: String,
    date: String,
    time: String,
}

#[derive(Serialize, ToSchema)]
struct AppointmentRes {
    patient_name: String,
    doctor: String,
    date: String,
    time: String,
}

impl From<Appointment> for AppointmentRes {
    fn from(a: Appointment) -> Self {
        Self {
            patient_name: a.patient_name,
            doctor: a.doctor,
            date: a.date,
            time: a.time,
        }
    }
}

#[derive(Deserialize, ToSchema)]
struct GenerateBillReq {
    patient: String,
    medicine: String,
    quantity: String,
}

#[derive(Serialize, ToSchema)]
struct BillRes {
    patient: String,
    medicine: String,
    quantity: String,
    price: String,
    total: String,
}

impl From<Bill> for BillRes {
    fn from(b: Bill) -> Self {
        Self {
            patient: b.patient,
            medicine: b.medicine,
            quantity: b.quantity,
            price: b.price,
            total: b.total,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct PriceRes {
    medicine: String,
    price: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        dashboard,
        list_records,
        add_record,
        delete_record,
        list_doctors,
        list_appointments,
        book_appointment,
        delete_appointment,
        list_medicines,
        price_of,
        list_bills,
        generate_bill,
        delete_bill
    ),
    components(schemas(
        HealthRes,
        SummaryRes,
        ListRecordsRes,
        MutationRes,
        SelectionReq,
        BookAppointmentReq,
        AppointmentRes,
        GenerateBillReq,
        BillRes,
        PriceRes
    ))
)]
struct ApiDoc;

/// Main entry point for the hospital REST server
///
/// # Environment Variables
/// - `HMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HMS_DATA_DIR`: Directory for collection files (default: "hospital_data")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hms=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = data_dir_from_env_value(std::env::var("HMS_DATA_DIR").ok());
    let cfg = Arc::new(CoreConfig::new(data_dir)?);

    tracing::info!("++ Starting hospital REST on {}", rest_addr);
    tracing::info!("++ Data directory {}", cfg.data_dir().display());

    let app = Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(dashboard))
        .route(
            "/entities/:key",
            get(list_records).post(add_record).delete(delete_record),
        )
        .route("/appointments/doctors", get(list_doctors))
        .route(
            "/appointments",
            get(list_appointments)
                .post(book_appointment)
                .delete(delete_appointment),
        )
        .route("/billing/medicines", get(list_medicines))
        .route("/billing/price/:medicine", get(price_of))
        .route(
            "/billing",
            get(list_bills).post(generate_bill).delete(delete_bill),
        )
        .route("/api-docs/openapi.json", get(openapi))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            hospital: HospitalService::new(cfg),
        });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Maps a core error onto an HTTP status.
fn api_error(e: HospitalError) -> ApiError {
    let status = match &e {
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        HospitalError::UnknownMedicine(_) | HospitalError::UnknownCollection(_) => {
            StatusCode::NOT_FOUND
        }
        _ => {
            tracing::error!("request failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

/// Resolves a path segment to one of the generic entity collections.
fn entity_key(raw: &str) -> Result<CollectionKey, ApiError> {
    let key: CollectionKey = raw.parse().map_err(api_error)?;
    if !key.is_entity() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("{key} is managed through its own endpoints"),
        ));
    }
    Ok(key)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "hospital records service is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Record counts", body = SummaryRes),
        (status = 500, description = "Storage unavailable")
    )
)]
async fn dashboard(State(state): State<AppState>) -> ApiResult<SummaryRes> {
    let summary = state.hospital.dashboard().summary().map_err(api_error)?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/entities/{key}",
    params(("key" = String, Path, description = "patients, doctors, staff, medicines, lab_tests or machinery")),
    responses(
        (status = 200, description = "Records in persisted order", body = ListRecordsRes),
        (status = 404, description = "Unknown collection"),
        (status = 500, description = "Storage unavailable")
    )
)]
async fn list_records(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ListRecordsRes> {
    let manager = state.hospital.records(entity_key(&key)?);
    let schema = manager.schema();
    let records = manager.list().map_err(api_error)?;

    Ok(Json(ListRecordsRes {
        columns: schema.field_names().map(String::from).collect(),
        rows: records.iter().map(|r: &Record| r.values_for(schema)).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/entities/{key}",
    params(("key" = String, Path, description = "Entity collection")),
    request_body = HashMap<String, String>,
    responses(
        (status = 200, description = "Record added", body = MutationRes),
        (status = 400, description = "Missing field or invalid number"),
        (status = 404, description = "Unknown collection")
    )
)]
async fn add_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(fields): Json<HashMap<String, String>>,
) -> ApiResult<MutationRes> {
    let manager = state.hospital.records(entity_key(&key)?);
    let count = manager.add(&fields).map_err(api_error)?;
    Ok(Json(MutationRes { count }))
}

#[utoipa::path(
    delete,
    path = "/entities/{key}",
    params(("key" = String, Path, description = "Entity collection")),
    request_body = SelectionReq,
    responses(
        (status = 200, description = "Matching records removed", body = MutationRes),
        (status = 400, description = "No selection"),
        (status = 404, description = "Unknown collection")
    )
)]
async fn delete_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SelectionReq>,
) -> ApiResult<MutationRes> {
    let manager = state.hospital.records(entity_key(&key)?);
    let count = manager.delete(req.values.as_slice()).map_err(api_error)?;
    Ok(Json(MutationRes { count }))
}

#[utoipa::path(
    get,
    path = "/appointments/doctors",
    responses((status = 200, description = "Doctor names", body = Vec<String>))
)]
async fn list_doctors(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let doctors = state
        .hospital
        .appointments()
        .available_doctors()
        .map_err(api_error)?;
    Ok(Json(doctors))
}

#[utoipa::path(
    get,
    path = "/appointments",
    responses((status = 200, description = "Appointments in persisted order", body = Vec<AppointmentRes>))
)]
async fn list_appointments(State(state): State<AppState>) -> ApiResult<Vec<AppointmentRes>> {
    let appointments = state.hospital.appointments().list().map_err(api_error)?;
    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = BookAppointmentReq,
    responses(
        (status = 200, description = "Appointment booked", body = MutationRes),
        (status = 400, description = "Missing field, invalid date or invalid time")
    )
)]
async fn book_appointment(
    State(state): State<AppState>,
    Json(req): Json<BookAppointmentReq>,
) -> ApiResult<MutationRes> {
    let count = state
        .hospital
        .appointments()
        .book(&req.patient_name, &req.doctor, &req.date, &req.time)
        .map_err(api_error)?;
    Ok(Json(MutationRes { count }))
}

#[utoipa::path(
    delete,
    path = "/appointments",
    request_body = SelectionReq,
    responses(
        (status = 200, description = "Matching appointments removed", body = MutationRes),
        (status = 400, description = "No selection")
    )
)]
async fn delete_appointment(
    State(state): State<AppState>,
    Json(req): Json<SelectionReq>,
) -> ApiResult<MutationRes> {
    let count = state
        .hospital
        .appointments()
        .delete_selected(req.values.as_slice())
        .map_err(api_error)?;
    Ok(Json(MutationRes { count }))
}

#[utoipa::path(
    get,
    path = "/billing/medicines",
    responses((status = 200, description = "Medicine names", body = Vec<String>))
)]
async fn list_medicines(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let names = state
        .hospital
        .billing()
        .available_medicines()
        .map_err(api_error)?;
    Ok(Json(names))
}

#[utoipa::path(
    get,
    path = "/billing/price/{medicine}",
    params(("medicine" = String, Path, description = "Exact medicine name")),
    responses(
        (status = 200, description = "Unit price", body = PriceRes),
        (status = 404, description = "Unknown medicine")
    )
)]
async fn price_of(
    State(state): State<AppState>,
    Path(medicine): Path<String>,
) -> ApiResult<PriceRes> {
    let price = state
        .hospital
        .billing()
        .price_of(&medicine)
        .map_err(api_error)?
        .ok_or_else(|| api_error(HospitalError::UnknownMedicine(medicine.clone())))?;
    Ok(Json(PriceRes {
        medicine,
        price: price.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/billing",
    responses((status = 200, description = "Bills in persisted order", body = Vec<BillRes>))
)]
async fn list_bills(State(state): State<AppState>) -> ApiResult<Vec<BillRes>> {
    let bills = state.hospital.billing().list().map_err(api_error)?;
    Ok(Json(bills.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/billing",
    request_body = GenerateBillReq,
    responses(
        (status = 200, description = "Bill generated", body = BillRes),
        (status = 400, description = "Missing field or invalid quantity"),
        (status = 404, description = "Unknown medicine")
    )
)]
async fn generate_bill(
    State(state): State<AppState>,
    Json(req): Json<GenerateBillReq>,
) -> ApiResult<BillRes> {
    let bill = state
        .hospital
        .billing()
        .generate_bill(&req.patient, &req.medicine, &req.quantity)
        .map_err(api_error)?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    delete,
    path = "/billing",
    request_body = SelectionReq,
    responses(
        (status = 200, description = "Matching bills removed", body = MutationRes),
        (status = 400, description = "No selection")
    )
)]
async fn delete_bill(
    State(state): State<AppState>,
    Json(req): Json<SelectionReq>,
) -> ApiResult<MutationRes> {
    let count = state
        .hospital
        .billing()
        .delete_selected(req.values.as_slice())
        .map_err(api_error)?;
    Ok(Json(MutationRes { count }))
}
