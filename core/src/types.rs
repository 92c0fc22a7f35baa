//! Request payloads for the Tutto API.
//!
//! # Design
//! Each payload is a flat serde struct. Whether a field reaches the wire is
//! decided on the field itself: required fields are always serialized,
//! optional ones carry `skip_serializing_if` so their zero value (empty
//! string or `0`) is left out. `Employee` is the exception and always sends
//! every field, including empty `relatives`/`occurrences` arrays.
//!
//! A required field set to `""` or `0` is still sent on purpose. Only
//! optional fields are dropped at their zero value; required ones are never
//! filtered by value.
//!
//! All payloads reject unknown keys so a misspelled parameter in a
//! name-based call is reported instead of silently dropped.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// Filters for `deductions` and `purchases`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceQuery {
    /// Reference period, `YYYYMM`.
    pub reference: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// `YYYYMMDD`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    /// `YYYYMMDD`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
}

impl ReferenceQuery {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            ..Self::default()
        }
    }
}

/// Filters for `dirf_infos` and `dirf_additional_infos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirfQuery {
    pub reference: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layout: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub company_id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
}

impl DirfQuery {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            ..Self::default()
        }
    }
}

/// A dependant or family member attached to an employee record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relative {
    pub name: String,
    pub kinship: String,
    pub vat: String,
    pub gender: String,
    pub birthday_date: NaiveDate,
}

/// A dated event in an employee's history (leave, suspension, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Occurrence {
    pub code: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Full employee record for `POST /employees`. Every field is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Employee {
    pub company_code: String,
    pub company_vat: String,
    pub name: String,
    pub badge: String,
    pub vat: String,
    pub id_card: String,
    pub id_card_entity: String,
    pub id_card_emission: NaiveDate,
    pub id_card_emission_state: String,
    pub sus_card: String,
    pub ctps_number: String,
    pub pis_pasep: String,
    pub mother_name: String,
    pub address: String,
    pub address_number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub phone: String,
    pub email: String,
    pub personal_email: String,
    pub gender: String,
    pub marital_status: String,
    pub salary: f64,
    pub birthday_date: NaiveDate,
    pub admission_date: NaiveDate,
    pub resignation_date: NaiveDate,
    pub experience_end_date: NaiveDate,
    pub status_in_payroll: String,
    pub organizational_unit_code: String,
    pub organizational_unit_name: String,
    pub position_code: String,
    pub position_name: String,
    pub occupation_code: String,
    pub occupation_name: String,
    pub workplace_code: String,
    pub workplace_name: String,
    pub syndicate_name: String,
    pub transfer_date: NaiveDate,
    pub bank_code: String,
    pub bank_agency: String,
    pub bank_account: String,
    pub resignation_reason_code: String,
    pub resignation_reason_name: String,
    #[serde(default)]
    pub relatives: Vec<Relative>,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

/// Assigns an occupation to an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeOccupation {
    pub badge: String,
    pub vat: String,
    pub occupation_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_vat: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Occupation {
    pub code: String,
    pub name: String,
    pub description: String,
    pub points: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company_vat: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceTicket {
    pub employee_badge: String,
    pub employee_vat: String,
    pub employee_email: String,
    pub title: String,
    pub description: String,
    pub service_type_id: i64,
}
