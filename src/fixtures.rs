// Test data for booking scenarios: a fixed booking and randomized valid ones

use crate::booking::{BookingDates, BookingRequest};
use chrono::{Days, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

const FIRST_NAMES: &[&str] = &[
    "Ivan", "Maria", "John", "Aiko", "Pedro", "Olga", "Samir", "Lena", "Tomas", "Nadia",
];
const LAST_NAMES: &[&str] = &[
    "Ivanov", "Garcia", "Smith", "Tanaka", "Silva", "Petrova", "Haddad", "Novak", "Berg", "Kowalski",
];
const ADDITIONAL_NEEDS: &[&str] = &[
    "Breakfast",
    "Dinner",
    "Late checkout",
    "Airport transfer",
    "Extra bed",
    "Parking",
];

// Guest Ivan Ivanov, two weeks in February 2025
pub fn fixed_booking() -> BookingRequest {
    BookingRequest {
        firstname: "Ivan".to_string(),
        lastname: "Ivanov".to_string(),
        totalprice: 150,
        depositpaid: true,
        bookingdates: BookingDates::new("2025-02-01", "2025-02-10"),
        additionalneeds: Some("Dinner".to_string()),
    }
}

pub fn booking_dates() -> BookingDates {
    booking_dates_from(Local::now().date_naive(), &mut thread_rng())
}

/// Checkin 1 to 30 days after `today`, checkout 1 to 14 nights later.
pub fn booking_dates_from<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> BookingDates {
    let checkin = today + Days::new(rng.gen_range(1..=30));
    let checkout = checkin + Days::new(rng.gen_range(1..=14));

    BookingDates::new(
        checkin.format("%Y-%m-%d").to_string(),
        checkout.format("%Y-%m-%d").to_string(),
    )
}

pub fn random_booking() -> BookingRequest {
    random_booking_with(Local::now().date_naive(), &mut thread_rng())
}

pub fn random_booking_with<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> BookingRequest {
    BookingRequest {
        firstname: pick(FIRST_NAMES, rng),
        lastname: pick(LAST_NAMES, rng),
        totalprice: rng.gen_range(1..=1000),
        depositpaid: rng.gen_bool(0.5),
        bookingdates: booking_dates_from(today, rng),
        additionalneeds: Some(pick(ADDITIONAL_NEEDS, rng)),
    }
}

fn pick<R: Rng + ?Sized>(options: &[&str], rng: &mut R) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}
