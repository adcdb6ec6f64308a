//! Appointment booking.
//!
//! Booking is a single validate-then-append against the appointments collection. The doctor
//! choice set is read from the doctors collection on every call. Nothing checks that the chosen
//! doctor still exists, and double booking the same slot is permitted.

use crate::collection::CollectionKey;
use crate::manager::{candidate, RecordManager};
use crate::record::Record;
use crate::store::RecordStore;
use crate::HospitalResult;
use serde::Serialize;

/// One booked appointment, as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub patient_name: String,
    pub doctor: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

impl Appointment {
    fn from_record(record: &Record) -> Self {
        Self {
            patient_name: record.get("patient name").to_string(),
            doctor: record.get("doctor").to_string(),
            date: record.get("date").to_string(),
            time: record.get("time").to_string(),
        }
    }

    fn selection(&self) -> [&str; 4] {
        [
            self.patient_name.as_str(),
            self.doctor.as_str(),
            self.date.as_str(),
            self.time.as_str(),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct AppointmentService {
    doctors: RecordManager,
    appointments: RecordManager,
}

impl AppointmentService {
    pub fn new(store: RecordStore) -> Self {
        Self {
            doctors: RecordManager::new(store.clone(), CollectionKey::Doctors),
            appointments: RecordManager::new(store, CollectionKey::Appointments),
        }
    }

    /// Names of every doctor currently on record, in persisted order.
    pub fn available_doctors(&self) -> HospitalResult<Vec<String>> {
        Ok(self
            .doctors
            .list()?
            .iter()
            .map(|doctor| doctor.get("name").to_string())
            .collect())
    }

    /// Books an appointment.
    ///
    /// # Returns
    ///
    /// The number of appointments on record after booking.
    ///
    /// # Errors
    ///
    /// - `MissingField` if any input is blank after trimming.
    /// - `InvalidDate` unless `date` is a real calendar date written `YYYY-MM-DD`.
    /// - `InvalidTime` unless `time` is written `HH:MM` within `00:00`..=`23:59`.
    pub fn book(
        &self,
        patient_name: &str,
        doctor: &str,
        date: &str,
        time: &str,
    ) -> HospitalResult<usize> {
        let booking = self.appointments.validate(&candidate([
            ("patient name", patient_name),
            ("doctor", doctor),
            ("date", date),
            ("time", time),
        ]))?;

        let total = self.appointments.append(booking)?;
        tracing::info!(
            "booked appointment with {} on {} {}",
            doctor.trim(),
            date.trim(),
            time.trim()
        );
        Ok(total)
    }

    pub fn list(&self) -> HospitalResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .list()?
            .iter()
            .map(Appointment::from_record)
            .collect())
    }

    /// Removes every appointment equal to the given one on all four fields.
    ///
    /// # Returns
    ///
    /// The number of appointments removed.
    pub fn delete(&self, appointment: &Appointment) -> HospitalResult<usize> {
        self.appointments.delete(&appointment.selection())
    }

    /// Deletes from a raw row selection, `NoSelection` when nothing was selected.
    pub fn delete_selected<S: AsRef<str>>(&self, selection: &[S]) -> HospitalResult<usize> {
        self.appointments.delete(selection)
    }
}
