// Contract checks for the create-booking endpoint.
// Given what was sent, work out what the service must echo and compare it with what came back.

use crate::booking::{BookedRecord, BookingDates, BookingPayload, BookingResponse};
use crate::client::ApiError;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

// Keys every accepted booking carries in the response
pub const BOOKING_KEYS: [&str; 5] = [
    "firstname",
    "lastname",
    "totalprice",
    "depositpaid",
    "bookingdates",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("{field} does not match with expected: expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("bookingid must be a positive integer, got {0}")]
    InvalidBookingId(i64),

    #[error("{0} is missing in response")]
    MissingKey(String),

    #[error("{key} should be {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("expected a remote failure but booking {0} was created")]
    UnexpectedSuccess(i64),

    #[error("unexpected error: {0}")]
    UnexpectedError(String),

    #[error("payload cannot produce an accepted booking: {0}")]
    MalformedPayload(String),
}

/// Canonical `YYYY-MM-DD` form of a stay date given as `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn normalize_date(raw: &str) -> Option<String> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
        .map(|date| date.format(DATE_OUTPUT_FORMAT).to_string())
}

/// The record an accepted payload must be echoed as.
///
/// Applies the documented normalizations: dates reformatted to `YYYY-MM-DD`,
/// numeric deposit flags become `value != 0`, numeric price strings are parsed
/// and non-numeric ones nulled. Payloads the service is expected to reject
/// yield [`ContractViolation::MalformedPayload`].
pub fn expected_echo(payload: &BookingPayload) -> Result<BookedRecord, ContractViolation> {
    let firstname = expected_name(payload, "firstname")?;
    let lastname = expected_name(payload, "lastname")?;

    let totalprice = match payload.get("totalprice") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|p| p.trunc() as i64)),
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .map(|p| p.trunc() as i64),
        _ => return Err(malformed("totalprice must be a number or a string")),
    };

    let depositpaid = match payload.get("depositpaid") {
        Some(Value::Bool(paid)) => *paid,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |v| v != 0.0),
        _ => return Err(malformed("depositpaid must be a boolean or a number")),
    };

    let dates = payload
        .get("bookingdates")
        .ok_or_else(|| malformed("bookingdates is missing"))?;
    let bookingdates = BookingDates {
        checkin: expected_date(dates, "checkin")?,
        checkout: expected_date(dates, "checkout")?,
    };

    let additionalneeds = payload
        .get("additionalneeds")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(BookedRecord {
        firstname,
        lastname,
        totalprice,
        depositpaid,
        bookingdates,
        additionalneeds,
    })
}

fn expected_name(payload: &BookingPayload, field: &str) -> Result<String, ContractViolation> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed(&format!("{} must be a string", field)))
}

fn expected_date(dates: &Value, key: &str) -> Result<String, ContractViolation> {
    dates
        .get(key)
        .and_then(Value::as_str)
        .and_then(normalize_date)
        .ok_or_else(|| malformed(&format!("bookingdates.{} is not a valid date", key)))
}

fn malformed(reason: &str) -> ContractViolation {
    ContractViolation::MalformedPayload(reason.to_string())
}

fn compare<V: PartialEq + Debug>(
    field: &str,
    expected: &V,
    actual: &V,
) -> Result<(), ContractViolation> {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractViolation::FieldMismatch {
            field: field.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// Checks that a created booking echoes the payload modulo normalization.
pub fn verify_echo(
    payload: &BookingPayload,
    response: &BookingResponse,
) -> Result<(), ContractViolation> {
    if response.bookingid <= 0 {
        return Err(ContractViolation::InvalidBookingId(response.bookingid));
    }

    let expected = expected_echo(payload)?;
    let actual = &response.booking;

    compare("firstname", &expected.firstname, &actual.firstname)?;
    compare("lastname", &expected.lastname, &actual.lastname)?;
    compare("totalprice", &expected.totalprice, &actual.totalprice)?;
    compare("depositpaid", &expected.depositpaid, &actual.depositpaid)?;
    compare(
        "checkin",
        &expected.bookingdates.checkin,
        &actual.bookingdates.checkin,
    )?;
    compare(
        "checkout",
        &expected.bookingdates.checkout,
        &actual.bookingdates.checkout,
    )?;
    compare(
        "additionalneeds",
        &expected.additionalneeds,
        &actual.additionalneeds,
    )
}

/// Checks key presence and primitive types of a raw create-booking answer.
pub fn verify_shape(body: &Value) -> Result<(), ContractViolation> {
    let bookingid = body
        .get("bookingid")
        .ok_or_else(|| ContractViolation::MissingKey("bookingid".to_string()))?;
    if !(bookingid.is_i64() || bookingid.is_u64()) {
        return Err(ContractViolation::WrongType {
            key: "bookingid".to_string(),
            expected: "an integer",
        });
    }

    let booking = body
        .get("booking")
        .ok_or_else(|| ContractViolation::MissingKey("booking".to_string()))?
        .as_object()
        .ok_or_else(|| ContractViolation::WrongType {
            key: "booking".to_string(),
            expected: "an object",
        })?;

    for key in BOOKING_KEYS {
        if !booking.contains_key(key) {
            return Err(ContractViolation::MissingKey(format!("booking.{}", key)));
        }
    }

    let typed = [
        ("firstname", booking["firstname"].is_string(), "a string"),
        ("lastname", booking["lastname"].is_string(), "a string"),
        ("depositpaid", booking["depositpaid"].is_boolean(), "a boolean"),
        ("bookingdates", booking["bookingdates"].is_object(), "an object"),
    ];
    for (key, ok, expected) in typed {
        if !ok {
            return Err(ContractViolation::WrongType {
                key: format!("booking.{}", key),
                expected,
            });
        }
    }

    Ok(())
}

/// Checks that a call failed remotely with exactly this status and message.
pub fn verify_failure(
    result: Result<BookingResponse, ApiError>,
    status: u16,
    message: &str,
) -> Result<(), ContractViolation> {
    match result {
        Ok(created) => Err(ContractViolation::UnexpectedSuccess(created.bookingid)),
        Err(ApiError::RemoteRequestFailure {
            status_code,
            message: actual,
        }) if status_code == status && actual == message => Ok(()),
        Err(other) => Err(ContractViolation::UnexpectedError(other.to_string())),
    }
}
