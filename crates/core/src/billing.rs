//! Medicine billing.
//!
//! A bill multiplies the unit price of a medicine by a whole quantity. The price is always
//! re-resolved from the medicines collection when the bill is generated and validated as a
//! decimal, so a price list that went stale between display and submission cannot produce a
//! bill. Arithmetic is done in [`Decimal`], never in binary floating point.
//!
//! Bills are persisted as text like every other record: quantity in canonical integer form,
//! price and total in decimal form (`2.50 * 3` is stored as `"7.50"`).

use crate::collection::CollectionKey;
use crate::manager::RecordManager;
use crate::record::Record;
use crate::store::RecordStore;
use crate::validation::{parse_decimal, parse_whole_number};
use crate::{HospitalError, HospitalResult, NonEmptyText};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// One stored bill. Values are the persisted text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bill {
    pub patient: String,
    pub medicine: String,
    pub quantity: String,
    pub price: String,
    pub total: String,
}

impl Bill {
    fn from_record(record: &Record) -> Self {
        Self {
            patient: record.get("patient").to_string(),
            medicine: record.get("medicine").to_string(),
            quantity: record.get("quantity").to_string(),
            price: record.get("price").to_string(),
            total: record.get("total").to_string(),
        }
    }

    fn to_record(&self) -> Record {
        [
            ("patient", self.patient.as_str()),
            ("medicine", self.medicine.as_str()),
            ("quantity", self.quantity.as_str()),
            ("price", self.price.as_str()),
            ("total", self.total.as_str()),
        ]
        .into_iter()
        .collect()
    }

    /// Total reinterpreted as a decimal.
    pub fn total_amount(&self) -> HospitalResult<Decimal> {
        parse_decimal(&self.total, "total")
    }

    fn selection(&self) -> [&str; 5] {
        [
            self.patient.as_str(),
            self.medicine.as_str(),
            self.quantity.as_str(),
            self.price.as_str(),
            self.total.as_str(),
        ]
    }
}

/// Snapshot of medicine name to unit price, taken when a billing screen is activated.
///
/// When several medicines share a name the last one on record wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceList {
    names: Vec<String>,
    prices: HashMap<String, String>,
}

impl PriceList {
    fn from_records(records: &[Record]) -> Self {
        let mut list = PriceList::default();
        for medicine in records {
            let name = medicine.get("name").to_string();
            if !list.prices.contains_key(&name) {
                list.names.push(name.clone());
            }
            list.prices.insert(name, medicine.get("price").to_string());
        }
        list
    }

    /// Medicine names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Displayed price text for `medicine`, exactly as stored.
    pub fn displayed_price(&self, medicine: &str) -> Option<&str> {
        self.prices.get(medicine).map(String::as_str)
    }

    /// Unit price of `medicine` as a decimal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber("price")` if the stored price is not a decimal.
    pub fn price_of(&self, medicine: &str) -> HospitalResult<Option<Decimal>> {
        self.displayed_price(medicine)
            .map(|price| parse_decimal(price.trim(), "price"))
            .transpose()
    }
}

#[derive(Clone, Debug)]
pub struct BillingService {
    medicines: RecordManager,
    bills: RecordManager,
}

impl BillingService {
    pub fn new(store: RecordStore) -> Self {
        Self {
            medicines: RecordManager::new(store.clone(), CollectionKey::Medicines),
            bills: RecordManager::new(store, CollectionKey::Billing),
        }
    }

    /// Reads the medicines collection into a fresh [`PriceList`].
    pub fn price_list(&self) -> HospitalResult<PriceList> {
        Ok(PriceList::from_records(&self.medicines.list()?))
    }

    /// Medicine names available for billing.
    pub fn available_medicines(&self) -> HospitalResult<Vec<String>> {
        Ok(self.price_list()?.names().to_vec())
    }

    /// Unit price of `medicine` by exact name, read fresh from storage.
    ///
    /// Returns `Ok(None)` when no medicine has that name.
    pub fn price_of(&self, medicine: &str) -> HospitalResult<Option<Decimal>> {
        self.price_list()?.price_of(medicine)
    }

    /// Generates and stores a bill of `quantity` units of `medicine` for `patient`.
    ///
    /// # Errors
    ///
    /// - `MissingField` if any input is blank after trimming.
    /// - `InvalidNumber("quantity")` unless the quantity is a non-negative whole number.
    /// - `UnknownMedicine` if no medicine has that name.
    /// - `InvalidNumber("price")` if the medicine's stored price is not a decimal.
    pub fn generate_bill(
        &self,
        patient: &str,
        medicine: &str,
        quantity: &str,
    ) -> HospitalResult<Bill> {
        let required = |field: &str, value: &str| {
            NonEmptyText::new(value).map_err(|_| HospitalError::MissingField(field.to_string()))
        };
        let patient = required("patient", patient)?;
        let medicine = required("medicine", medicine)?;
        let quantity = required("quantity", quantity)?;

        let units = parse_whole_number(quantity.as_str(), "quantity")?;
        let price = self
            .price_of(medicine.as_str())?
            .ok_or_else(|| HospitalError::UnknownMedicine(medicine.to_string()))?;
        let total = price
            .checked_mul(Decimal::from(units))
            .ok_or_else(|| HospitalError::InvalidNumber("total".into()))?;

        let bill = Bill {
            patient: patient.into_inner(),
            medicine: medicine.into_inner(),
            quantity: units.to_string(),
            price: price.to_string(),
            total: total.to_string(),
        };
        self.bills.append(bill.to_record())?;

        tracing::info!("generated bill for {} totalling {}", bill.medicine, bill.total);
        Ok(bill)
    }

    pub fn list(&self) -> HospitalResult<Vec<Bill>> {
        Ok(self.bills.list()?.iter().map(Bill::from_record).collect())
    }

    /// Removes every bill equal to `bill` on all five fields.
    pub fn delete(&self, bill: &Bill) -> HospitalResult<usize> {
        self.bills.delete(&bill.selection())
    }

    /// Deletes from a raw row selection: patient, medicine, quantity, price, total.
    pub fn delete_selected<S: AsRef<str>>(&self, selection: &[S]) -> HospitalResult<usize> {
        self.bills.delete(selection)
    }
}
