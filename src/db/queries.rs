use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::models::{
    Booking, BookingStatus, BookingType, Contact, Cottage, NewBooking, NewContact, NewCottage,
    NewPackage, NewSubscriber, NewTaxi, Package, Subscriber, Taxi,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

fn now_str() -> String {
    Utc::now().naive_utc().format(DATETIME_FMT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_decimal(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn unknown_value(idx: usize, what: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unknown {what}: {value}").into(),
    )
}

fn collect<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> anyhow::Result<Vec<T>> {
    let mut out = vec![];
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// ── Taxis ──

const TAXI_COLUMNS: &str =
    "id, name, description, vehicle_type, capacity, price_per_km, image_url, available, created_at";

fn parse_taxi_row(row: &Row) -> rusqlite::Result<Taxi> {
    let price: String = row.get(5)?;
    let created_at: String = row.get(8)?;
    Ok(Taxi {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        vehicle_type: row.get(3)?,
        capacity: row.get(4)?,
        price_per_km: parse_decimal(5, &price)?,
        image_url: row.get(6)?,
        available: row.get(7)?,
        created_at: parse_datetime(&created_at),
    })
}

pub fn list_taxis(conn: &Connection) -> anyhow::Result<Vec<Taxi>> {
    let mut stmt = conn.prepare(&format!("SELECT {TAXI_COLUMNS} FROM taxis ORDER BY id ASC"))?;
    let rows = stmt.query_map([], parse_taxi_row)?;
    collect(rows)
}

pub fn get_taxi(conn: &Connection, id: i64) -> anyhow::Result<Option<Taxi>> {
    let taxi = conn
        .query_row(
            &format!("SELECT {TAXI_COLUMNS} FROM taxis WHERE id = ?1"),
            params![id],
            parse_taxi_row,
        )
        .optional()?;
    Ok(taxi)
}

pub fn create_taxi(conn: &Connection, taxi: &NewTaxi) -> anyhow::Result<Taxi> {
    conn.execute(
        "INSERT INTO taxis (name, description, vehicle_type, capacity, price_per_km, image_url, available, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            taxi.name,
            taxi.description,
            taxi.vehicle_type,
            taxi.capacity,
            taxi.price_per_km.to_string(),
            taxi.image_url,
            taxi.available,
            now_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_taxi(conn, id)?.ok_or_else(|| anyhow::anyhow!("taxi {id} vanished after insert"))
}

pub fn update_taxi(conn: &Connection, id: i64, taxi: &NewTaxi) -> anyhow::Result<Option<Taxi>> {
    let count = conn.execute(
        "UPDATE taxis SET name = ?1, description = ?2, vehicle_type = ?3, capacity = ?4,
           price_per_km = ?5, image_url = ?6, available = ?7
         WHERE id = ?8",
        params![
            taxi.name,
            taxi.description,
            taxi.vehicle_type,
            taxi.capacity,
            taxi.price_per_km.to_string(),
            taxi.image_url,
            taxi.available,
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_taxi(conn, id)
}

pub fn delete_taxi(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM taxis WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Cottages ──

const COTTAGE_COLUMNS: &str = "id, name, description, location, bedrooms, max_guests, price_per_night, amenities, image_url, available, created_at";

fn parse_cottage_row(row: &Row) -> rusqlite::Result<Cottage> {
    let price: String = row.get(6)?;
    let created_at: String = row.get(10)?;
    Ok(Cottage {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        bedrooms: row.get(4)?,
        max_guests: row.get(5)?,
        price_per_night: parse_decimal(6, &price)?,
        amenities: row.get(7)?,
        image_url: row.get(8)?,
        available: row.get(9)?,
        created_at: parse_datetime(&created_at),
    })
}

pub fn list_cottages(conn: &Connection) -> anyhow::Result<Vec<Cottage>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {COTTAGE_COLUMNS} FROM cottages ORDER BY id ASC"))?;
    let rows = stmt.query_map([], parse_cottage_row)?;
    collect(rows)
}

pub fn get_cottage(conn: &Connection, id: i64) -> anyhow::Result<Option<Cottage>> {
    let cottage = conn
        .query_row(
            &format!("SELECT {COTTAGE_COLUMNS} FROM cottages WHERE id = ?1"),
            params![id],
            parse_cottage_row,
        )
        .optional()?;
    Ok(cottage)
}

pub fn create_cottage(conn: &Connection, cottage: &NewCottage) -> anyhow::Result<Cottage> {
    conn.execute(
        "INSERT INTO cottages (name, description, location, bedrooms, max_guests, price_per_night, amenities, image_url, available, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            cottage.name,
            cottage.description,
            cottage.location,
            cottage.bedrooms,
            cottage.max_guests,
            cottage.price_per_night.to_string(),
            cottage.amenities,
            cottage.image_url,
            cottage.available,
            now_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_cottage(conn, id)?.ok_or_else(|| anyhow::anyhow!("cottage {id} vanished after insert"))
}

pub fn update_cottage(
    conn: &Connection,
    id: i64,
    cottage: &NewCottage,
) -> anyhow::Result<Option<Cottage>> {
    let count = conn.execute(
        "UPDATE cottages SET name = ?1, description = ?2, location = ?3, bedrooms = ?4,
           max_guests = ?5, price_per_night = ?6, amenities = ?7, image_url = ?8, available = ?9
         WHERE id = ?10",
        params![
            cottage.name,
            cottage.description,
            cottage.location,
            cottage.bedrooms,
            cottage.max_guests,
            cottage.price_per_night.to_string(),
            cottage.amenities,
            cottage.image_url,
            cottage.available,
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_cottage(conn, id)
}

pub fn delete_cottage(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM cottages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Packages ──

const PACKAGE_COLUMNS: &str = "id, name, description, duration_days, destinations, price, includes, image_url, available, created_at";

fn parse_package_row(row: &Row) -> rusqlite::Result<Package> {
    let price: String = row.get(5)?;
    let created_at: String = row.get(9)?;
    Ok(Package {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        duration_days: row.get(3)?,
        destinations: row.get(4)?,
        price: parse_decimal(5, &price)?,
        includes: row.get(6)?,
        image_url: row.get(7)?,
        available: row.get(8)?,
        created_at: parse_datetime(&created_at),
    })
}

pub fn list_packages(conn: &Connection) -> anyhow::Result<Vec<Package>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY id ASC"))?;
    let rows = stmt.query_map([], parse_package_row)?;
    collect(rows)
}

pub fn get_package(conn: &Connection, id: i64) -> anyhow::Result<Option<Package>> {
    let package = conn
        .query_row(
            &format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ?1"),
            params![id],
            parse_package_row,
        )
        .optional()?;
    Ok(package)
}

pub fn create_package(conn: &Connection, package: &NewPackage) -> anyhow::Result<Package> {
    conn.execute(
        "INSERT INTO packages (name, description, duration_days, destinations, price, includes, image_url, available, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            package.name,
            package.description,
            package.duration_days,
            package.destinations,
            package.price.to_string(),
            package.includes,
            package.image_url,
            package.available,
            now_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_package(conn, id)?.ok_or_else(|| anyhow::anyhow!("package {id} vanished after insert"))
}

pub fn update_package(
    conn: &Connection,
    id: i64,
    package: &NewPackage,
) -> anyhow::Result<Option<Package>> {
    let count = conn.execute(
        "UPDATE packages SET name = ?1, description = ?2, duration_days = ?3, destinations = ?4,
           price = ?5, includes = ?6, image_url = ?7, available = ?8
         WHERE id = ?9",
        params![
            package.name,
            package.description,
            package.duration_days,
            package.destinations,
            package.price.to_string(),
            package.includes,
            package.image_url,
            package.available,
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_package(conn, id)
}

pub fn delete_package(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM packages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, booking_type, customer_name, customer_email, customer_phone, start_date, end_date, number_of_guests, special_requests, status, taxi_id, cottage_id, package_id, created_at, updated_at";

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    let booking_type_str: String = row.get(1)?;
    let booking_type = BookingType::parse(&booking_type_str)
        .ok_or_else(|| unknown_value(1, "booking type", &booking_type_str))?;
    let start_date_str: String = row.get(5)?;
    let end_date_str: Option<String> = row.get(6)?;
    let status_str: String = row.get(9)?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| unknown_value(9, "booking status", &status_str))?;
    let created_at_str: String = row.get(13)?;
    let updated_at_str: String = row.get(14)?;

    Ok(Booking {
        id: row.get(0)?,
        booking_type,
        customer_name: row.get(2)?,
        customer_email: row.get(3)?,
        customer_phone: row.get(4)?,
        start_date: parse_date(5, &start_date_str)?,
        end_date: end_date_str.as_deref().map(|s| parse_date(6, s)).transpose()?,
        number_of_guests: row.get(7)?,
        special_requests: row.get(8)?,
        status,
        taxi: row.get(10)?,
        cottage: row.get(11)?,
        package: row.get(12)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], parse_booking_row)?;
    collect(rows)
}

pub fn get_booking(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn create_booking(conn: &Connection, booking: &NewBooking) -> anyhow::Result<Booking> {
    let now = now_str();
    conn.execute(
        "INSERT INTO bookings (booking_type, customer_name, customer_email, customer_phone, start_date, end_date,
           number_of_guests, special_requests, status, taxi_id, cottage_id, package_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
        params![
            booking.booking_type.as_str(),
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.start_date.format(DATE_FMT).to_string(),
            booking.end_date.map(|d| d.format(DATE_FMT).to_string()),
            booking.number_of_guests,
            booking.special_requests,
            booking.status.as_str(),
            booking.taxi,
            booking.cottage,
            booking.package,
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_booking(conn, id)?.ok_or_else(|| anyhow::anyhow!("booking {id} vanished after insert"))
}

pub fn update_booking(
    conn: &Connection,
    id: i64,
    booking: &NewBooking,
) -> anyhow::Result<Option<Booking>> {
    let count = conn.execute(
        "UPDATE bookings SET booking_type = ?1, customer_name = ?2, customer_email = ?3, customer_phone = ?4,
           start_date = ?5, end_date = ?6, number_of_guests = ?7, special_requests = ?8, status = ?9,
           taxi_id = ?10, cottage_id = ?11, package_id = ?12, updated_at = ?13
         WHERE id = ?14",
        params![
            booking.booking_type.as_str(),
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.start_date.format(DATE_FMT).to_string(),
            booking.end_date.map(|d| d.format(DATE_FMT).to_string()),
            booking.number_of_guests,
            booking.special_requests,
            booking.status.as_str(),
            booking.taxi,
            booking.cottage,
            booking.package,
            now_str(),
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_booking(conn, id)
}

pub fn delete_booking(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Contacts ──

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, created_at";

fn parse_contact_row(row: &Row) -> rusqlite::Result<Contact> {
    let created_at: String = row.get(6)?;
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

pub fn list_contacts(conn: &Connection) -> anyhow::Result<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], parse_contact_row)?;
    collect(rows)
}

pub fn get_contact(conn: &Connection, id: i64) -> anyhow::Result<Option<Contact>> {
    let contact = conn
        .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
            params![id],
            parse_contact_row,
        )
        .optional()?;
    Ok(contact)
}

pub fn create_contact(conn: &Connection, contact: &NewContact) -> anyhow::Result<Contact> {
    conn.execute(
        "INSERT INTO contacts (name, email, phone, subject, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            contact.name,
            contact.email,
            contact.phone,
            contact.subject,
            contact.message,
            now_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_contact(conn, id)?.ok_or_else(|| anyhow::anyhow!("contact {id} vanished after insert"))
}

pub fn update_contact(
    conn: &Connection,
    id: i64,
    contact: &NewContact,
) -> anyhow::Result<Option<Contact>> {
    let count = conn.execute(
        "UPDATE contacts SET name = ?1, email = ?2, phone = ?3, subject = ?4, message = ?5 WHERE id = ?6",
        params![
            contact.name,
            contact.email,
            contact.phone,
            contact.subject,
            contact.message,
            id,
        ],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_contact(conn, id)
}

pub fn delete_contact(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Newsletter ──

const SUBSCRIBER_COLUMNS: &str = "id, email, subscribed_at, is_active";

fn parse_subscriber_row(row: &Row) -> rusqlite::Result<Subscriber> {
    let subscribed_at: String = row.get(2)?;
    Ok(Subscriber {
        id: row.get(0)?,
        email: row.get(1)?,
        subscribed_at: parse_datetime(&subscribed_at),
        is_active: row.get(3)?,
    })
}

pub fn list_subscribers(conn: &Connection) -> anyhow::Result<Vec<Subscriber>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SUBSCRIBER_COLUMNS} FROM newsletters ORDER BY subscribed_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], parse_subscriber_row)?;
    collect(rows)
}

pub fn get_subscriber(conn: &Connection, id: i64) -> anyhow::Result<Option<Subscriber>> {
    let subscriber = conn
        .query_row(
            &format!("SELECT {SUBSCRIBER_COLUMNS} FROM newsletters WHERE id = ?1"),
            params![id],
            parse_subscriber_row,
        )
        .optional()?;
    Ok(subscriber)
}

pub fn find_subscriber_by_email(
    conn: &Connection,
    email: &str,
) -> anyhow::Result<Option<Subscriber>> {
    let subscriber = conn
        .query_row(
            &format!("SELECT {SUBSCRIBER_COLUMNS} FROM newsletters WHERE email = ?1"),
            params![email],
            parse_subscriber_row,
        )
        .optional()?;
    Ok(subscriber)
}

pub fn create_subscriber(conn: &Connection, subscriber: &NewSubscriber) -> anyhow::Result<Subscriber> {
    conn.execute(
        "INSERT INTO newsletters (email, subscribed_at, is_active) VALUES (?1, ?2, ?3)",
        params![subscriber.email, now_str(), subscriber.is_active],
    )?;
    let id = conn.last_insert_rowid();
    get_subscriber(conn, id)?.ok_or_else(|| anyhow::anyhow!("subscriber {id} vanished after insert"))
}

pub fn update_subscriber(
    conn: &Connection,
    id: i64,
    subscriber: &NewSubscriber,
) -> anyhow::Result<Option<Subscriber>> {
    let count = conn.execute(
        "UPDATE newsletters SET email = ?1, is_active = ?2 WHERE id = ?3",
        params![subscriber.email, subscriber.is_active, id],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_subscriber(conn, id)
}

pub fn reactivate_subscriber(conn: &Connection, id: i64) -> anyhow::Result<Option<Subscriber>> {
    let count = conn.execute(
        "UPDATE newsletters SET is_active = 1, subscribed_at = ?1 WHERE id = ?2",
        params![now_str(), id],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_subscriber(conn, id)
}

pub fn delete_subscriber(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM newsletters WHERE id = ?1", params![id])?;
    Ok(count > 0)
}
