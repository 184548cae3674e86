// Test doubles for the booking service.
// StubTransport answers every request with one canned response; BookingSimulator
// is an in-process stand-in for the service that applies its documented normalizations.

use crate::client::ApiError;
use crate::contract::normalize_date;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicI64, Ordering};

pub struct StubTransport {
    outcome: Result<HttpResponse, ApiError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn responding(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            outcome: Ok(HttpResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    // Plain-text failure body, as the service sends for rejected bookings
    pub fn failing(status: u16, message: &str) -> Self {
        Self::responding(status, message.to_string())
    }

    pub fn erroring(error: ApiError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().push(request);
        self.outcome.clone()
    }
}

const MANDATORY_FIELDS: [&str; 5] = [
    "firstname",
    "lastname",
    "totalprice",
    "depositpaid",
    "bookingdates",
];

pub struct BookingSimulator {
    next_id: AtomicI64,
    bookings: DashMap<i64, Value>,
}

impl Default for BookingSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingSimulator {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            bookings: DashMap::new(),
        }
    }

    pub fn booking(&self, bookingid: i64) -> Option<Value> {
        self.bookings.get(&bookingid).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        if request.path() != "/booking" {
            return HttpResponse::new(404, "Not Found");
        }
        if request.method != HttpMethod::Post {
            return HttpResponse::new(405, "Method Not Allowed");
        }

        let body = match serde_json::from_slice::<Value>(&request.body) {
            Ok(Value::Object(body)) => body,
            _ => return HttpResponse::new(400, "Bad Request"),
        };

        match accept_booking(&body) {
            Ok(booking) => {
                let bookingid = self.next_id.fetch_add(1, Ordering::SeqCst);
                self.bookings.insert(bookingid, booking.clone());
                let created = json!({ "bookingid": bookingid, "booking": booking });
                HttpResponse::new(200, created.to_string())
            }
            Err(message) => HttpResponse::new(500, message),
        }
    }
}

#[async_trait]
impl HttpTransport for BookingSimulator {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.handle(&request))
    }
}

// Builds the stored booking or the 500 message explaining the rejection
fn accept_booking(body: &Map<String, Value>) -> Result<Value, String> {
    if let Some(missing) = MANDATORY_FIELDS.iter().find(|f| !body.contains_key(**f)) {
        return Err(format!("Missing required field: {}", missing));
    }

    let mut booking = Map::new();
    booking.insert("firstname".to_string(), name_field(body, "firstname")?);
    booking.insert("lastname".to_string(), name_field(body, "lastname")?);
    booking.insert("totalprice".to_string(), coerce_price(&body["totalprice"])?);
    booking.insert("depositpaid".to_string(), coerce_deposit(&body["depositpaid"])?);
    booking.insert("bookingdates".to_string(), stay_dates(&body["bookingdates"])?);

    match body.get("additionalneeds") {
        None | Some(Value::Null) => {}
        Some(Value::String(needs)) => {
            booking.insert("additionalneeds".to_string(), Value::String(needs.clone()));
        }
        Some(_) => return Err("Invalid type for field: additionalneeds".to_string()),
    }

    Ok(Value::Object(booking))
}

fn name_field(body: &Map<String, Value>, field: &str) -> Result<Value, String> {
    match &body[field] {
        Value::String(name) => Ok(Value::String(name.clone())),
        _ => Err(format!("Invalid type for field: {}", field)),
    }
}

fn coerce_price(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Err("Field totalprice must not be null".to_string()),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(whole) => Value::from(whole),
            None => n.as_f64().map(truncate).unwrap_or(Value::Null),
        }),
        Value::String(raw) => Ok(raw
            .trim()
            .parse::<f64>()
            .ok()
            .map(truncate)
            .unwrap_or(Value::Null)),
        _ => Err("Invalid type for field: totalprice".to_string()),
    }
}

fn truncate(price: f64) -> Value {
    if price.is_finite() {
        Value::from(price.trunc() as i64)
    } else {
        Value::Null
    }
}

fn coerce_deposit(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(paid) => Ok(Value::Bool(*paid)),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().map_or(false, |v| v != 0.0))),
        _ => Err("Invalid type for field: depositpaid".to_string()),
    }
}

fn stay_dates(value: &Value) -> Result<Value, String> {
    let dates = match value {
        Value::Object(dates) => dates,
        _ => return Err("Invalid type for field: bookingdates".to_string()),
    };

    let mut normalized = Map::new();
    for key in ["checkin", "checkout"] {
        let field = format!("bookingdates.{}", key);
        let raw = match dates.get(key) {
            None => return Err(format!("Missing required field: {}", field)),
            Some(Value::String(raw)) => raw,
            Some(_) => return Err(format!("Invalid date for field: {}", field)),
        };
        let date = normalize_date(raw).ok_or_else(|| format!("Invalid date for field: {}", field))?;
        normalized.insert(key.to_string(), Value::String(date));
    }

    Ok(Value::Object(normalized))
}
