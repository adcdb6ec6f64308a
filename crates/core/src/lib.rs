//! # Hospital Core
//!
//! Core business logic for the hospital records system.
//!
//! This crate contains pure data operations over flat per-collection JSON files:
//! - Entity schemas for patients, doctors, staff, medicines, lab tests, machinery,
//!   appointments and billing
//! - A generic record manager (list, validate-and-add, delete-by-match) driven by those schemas
//! - Appointment booking against the doctors collection
//! - Bill generation priced from the medicines collection
//! - Dashboard record counts
//!
//! **No UI concerns**: rendering, navigation, login and input collection belong to the
//! binaries (`hms` CLI, `hms-run` REST server). They call the operations here and render
//! whatever comes back.

pub mod appointments;
pub mod billing;
pub mod collection;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod manager;
pub mod record;
pub mod schema;
pub mod store;
pub mod validation;

pub use appointments::{Appointment, AppointmentService};
pub use billing::{Bill, BillingService, PriceList};
pub use collection::CollectionKey;
pub use config::CoreConfig;
pub use dashboard::{DashboardService, DashboardSummary};
pub use error::{HospitalError, HospitalResult, StorageError};
pub use hms_types::{NonEmptyText, TextError};
pub use manager::{candidate, RecordManager};
pub use record::Record;
pub use rust_decimal::Decimal;
pub use schema::{EntitySchema, FieldKind, FieldSpec};
pub use store::RecordStore;

use std::sync::Arc;

/// Entry point handing out the per-screen services over one data directory.
#[derive(Clone, Debug)]
pub struct HospitalService {
    store: RecordStore,
}

impl HospitalService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: RecordStore::new(cfg),
        }
    }

    /// Generic manager for any collection.
    pub fn records(&self, key: CollectionKey) -> RecordManager {
        RecordManager::new(self.store.clone(), key)
    }

    pub fn appointments(&self) -> AppointmentService {
        AppointmentService::new(self.store.clone())
    }

    pub fn billing(&self) -> BillingService {
        BillingService::new(self.store.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.store.clone())
    }
}
