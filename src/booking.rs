// Booking data model: typed requests, untyped payloads and the record the service echoes back

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: String,
    pub checkout: String,
}

impl BookingDates {
    pub fn new(checkin: impl Into<String>, checkout: impl Into<String>) -> Self {
        Self {
            checkin: checkin.into(),
            checkout: checkout.into(),
        }
    }
}

// Well-formed booking request as the service documents it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Request body handed to the client.
///
/// Unlike [`BookingRequest`] this is an arbitrary JSON object, so boundary and
/// invalid inputs (missing fields, numeric strings, wrong types) can be sent
/// as-is. The client never validates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingPayload(Map<String, Value>);

impl BookingPayload {
    pub fn new() -> Self {
        Self::default()
    }

    // Fails when the value is not a JSON object
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value).map(Self)
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        self.0.remove(field);
        self
    }

    pub fn with_dates(self, checkin: impl Into<Value>, checkout: impl Into<Value>) -> Self {
        let checkin = checkin.into();
        let checkout = checkout.into();
        self.with(
            "bookingdates",
            json!({ "checkin": checkin, "checkout": checkout }),
        )
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

impl From<BookingRequest> for BookingPayload {
    fn from(request: BookingRequest) -> Self {
        let payload = BookingPayload::new()
            .with("firstname", request.firstname)
            .with("lastname", request.lastname)
            .with("totalprice", request.totalprice)
            .with("depositpaid", request.depositpaid)
            .with_dates(request.bookingdates.checkin, request.bookingdates.checkout);

        match request.additionalneeds {
            Some(needs) => payload.with("additionalneeds", needs),
            None => payload,
        }
    }
}

// Booking as accepted and normalized by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedRecord {
    pub firstname: String,
    pub lastname: String,
    // null when the service could not coerce the submitted price
    pub totalprice: Option<i64>,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

impl From<BookingRequest> for BookedRecord {
    fn from(request: BookingRequest) -> Self {
        Self {
            firstname: request.firstname,
            lastname: request.lastname,
            totalprice: Some(request.totalprice),
            depositpaid: request.depositpaid,
            bookingdates: request.bookingdates,
            additionalneeds: request.additionalneeds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub bookingid: i64,
    pub booking: BookedRecord,
}
