use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Gender, Salon, Service};

#[derive(Debug, Serialize)]
pub struct SalonListing {
    #[serde(flatten)]
    pub salon: Salon,
    pub services: Vec<Service>,
    pub starting_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct ServicesByGender {
    pub male: Vec<Service>,
    pub female: Vec<Service>,
    pub unisex: Vec<Service>,
}

#[derive(Debug, Serialize)]
pub struct SalonDetail {
    #[serde(flatten)]
    pub salon: Salon,
    pub services: Vec<Service>,
    pub starting_price: Option<Decimal>,
    pub services_by_gender: ServicesByGender,
}

#[derive(Debug, Serialize)]
pub struct SlotGrid {
    pub date: Option<String>,
    pub slots: Vec<String>,
    pub salon_hours: SalonHours,
}

#[derive(Debug, Serialize)]
pub struct SalonHours {
    pub opening: String,
    pub closing: String,
}

fn starting_price(services: &[Service]) -> Option<Decimal> {
    services.iter().map(|s| s.price).min()
}

/// Active salons ordered by rating, each with its active services and the
/// cheapest service price. Geolocation query parameters are accepted at the
/// boundary but perform no filtering; the distance path is disabled.
pub fn list_salons(
    conn: &Connection,
    search: Option<&str>,
    page: i64,
    limit: i64,
) -> Result<Vec<SalonListing>, AppError> {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let salons =
        queries::list_salons(conn, search, limit, offset).map_err(AppError::Internal)?;

    let mut listings = Vec::with_capacity(salons.len());
    for salon in salons {
        let services =
            queries::list_services_for_salon(conn, &salon.id).map_err(AppError::Internal)?;
        listings.push(SalonListing {
            starting_price: starting_price(&services),
            services,
            salon,
        });
    }
    Ok(listings)
}

pub fn get_salon_detail(conn: &Connection, salon_id: &str) -> Result<SalonDetail, AppError> {
    let salon = queries::get_salon(conn, salon_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

    let services =
        queries::list_services_for_salon(conn, &salon.id).map_err(AppError::Internal)?;

    let by_gender = ServicesByGender {
        male: services
            .iter()
            .filter(|s| s.gender == Gender::Male)
            .cloned()
            .collect(),
        female: services
            .iter()
            .filter(|s| s.gender == Gender::Female)
            .cloned()
            .collect(),
        unisex: services
            .iter()
            .filter(|s| s.gender == Gender::Unisex)
            .cloned()
            .collect(),
    };

    Ok(SalonDetail {
        starting_price: starting_price(&services),
        services_by_gender: by_gender,
        services,
        salon,
    })
}

pub fn list_services(conn: &Connection, salon_id: &str) -> Result<Vec<Service>, AppError> {
    queries::get_salon(conn, salon_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

    queries::list_services_for_salon(conn, salon_id).map_err(AppError::Internal)
}

/// Half-hour grid from opening hour to closing hour. Bookings are keyed by
/// these labels, so the grid is generated, not stored.
pub fn available_slots(
    conn: &Connection,
    salon_id: &str,
    date: Option<String>,
) -> Result<SlotGrid, AppError> {
    let salon = queries::get_salon(conn, salon_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

    let slots = slot_grid(&salon.opening_time, &salon.closing_time);

    Ok(SlotGrid {
        date,
        slots,
        salon_hours: SalonHours {
            opening: salon.opening_time,
            closing: salon.closing_time,
        },
    })
}

fn hour_of(time: &str) -> u32 {
    time.split(':')
        .next()
        .and_then(|h| h.parse().ok())
        .unwrap_or(0)
}

fn slot_grid(opening: &str, closing: &str) -> Vec<String> {
    let opening_hour = hour_of(opening);
    let closing_hour = hour_of(closing);

    let mut slots = vec![];
    for hour in opening_hour..closing_hour {
        slots.push(format!("{hour:02}:00"));
        slots.push(format!("{hour:02}:30"));
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rusqlite::params;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn seed_salon(conn: &Connection, id: &str, rating: f64, active: bool) {
        conn.execute(
            "INSERT INTO salons (id, name, address, city, state, latitude, longitude,
                 phone_number, rating, opening_time, closing_time, is_active)
             VALUES (?1, ?2, '12 Main St', 'Pune', 'MH', 18.52, 73.85, '+912012345678',
                 ?3, '09:00', '12:00', ?4)",
            params![id, format!("Salon {id}"), rating, active as i64],
        )
        .unwrap();
    }

    fn seed_service(conn: &Connection, id: &str, salon_id: &str, price: &str, gender: &str) {
        conn.execute(
            "INSERT INTO services (id, salon_id, name, price, duration, category, gender, is_active)
             VALUES (?1, ?2, ?3, ?4, 30, 'hair', ?5, 1)",
            params![id, salon_id, format!("Service {id}"), price, gender],
        )
        .unwrap();
    }

    #[test]
    fn test_slot_grid_covers_open_hours() {
        let slots = slot_grid("09:00", "12:00");
        assert_eq!(
            slots,
            vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
    }

    #[test]
    fn test_list_excludes_inactive_and_orders_by_rating() {
        let conn = setup_db();
        seed_salon(&conn, "low", 3.0, true);
        seed_salon(&conn, "high", 4.8, true);
        seed_salon(&conn, "off", 5.0, false);

        let listings = list_salons(&conn, None, 1, 50).unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.salon.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[test]
    fn test_search_matches_name_and_city() {
        let conn = setup_db();
        seed_salon(&conn, "glow", 4.0, true);
        conn.execute(
            "INSERT INTO salons (id, name, address, city, state, latitude, longitude,
                 phone_number, rating, is_active)
             VALUES ('other', 'Trim Shop', '1 Side St', 'Mumbai', 'MH', 19.07, 72.87,
                 '+912298765432', 4.0, 1)",
            [],
        )
        .unwrap();

        let by_name = list_salons(&conn, Some("Trim"), 1, 50).unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].salon.id, "other");

        let by_city = list_salons(&conn, Some("Pune"), 1, 50).unwrap();
        assert_eq!(by_city.len(), 1);
        assert_eq!(by_city[0].salon.id, "glow");
    }

    #[test]
    fn test_starting_price_and_gender_grouping() {
        let conn = setup_db();
        seed_salon(&conn, "salon-1", 4.0, true);
        seed_service(&conn, "svc-1", "salon-1", "45.00", "male");
        seed_service(&conn, "svc-2", "salon-1", "20.00", "female");
        seed_service(&conn, "svc-3", "salon-1", "99.99", "unisex");

        let detail = get_salon_detail(&conn, "salon-1").unwrap();
        assert_eq!(detail.starting_price, Some("20.00".parse().unwrap()));
        assert_eq!(detail.services.len(), 3);
        assert_eq!(detail.services_by_gender.male.len(), 1);
        assert_eq!(detail.services_by_gender.female.len(), 1);
        assert_eq!(detail.services_by_gender.unisex.len(), 1);
    }

    #[test]
    fn test_salon_without_services_has_no_starting_price() {
        let conn = setup_db();
        seed_salon(&conn, "salon-1", 4.0, true);

        let detail = get_salon_detail(&conn, "salon-1").unwrap();
        assert_eq!(detail.starting_price, None);
    }

    #[test]
    fn test_unknown_salon_not_found() {
        let conn = setup_db();
        assert!(matches!(
            get_salon_detail(&conn, "nope").unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            list_services(&conn, "nope").unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            available_slots(&conn, "nope", None).unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_slots_for_salon() {
        let conn = setup_db();
        seed_salon(&conn, "salon-1", 4.0, true);

        let grid = available_slots(&conn, "salon-1", Some("2031-01-01".to_string())).unwrap();
        assert_eq!(grid.slots.len(), 6);
        assert_eq!(grid.salon_hours.opening, "09:00");
    }
}
