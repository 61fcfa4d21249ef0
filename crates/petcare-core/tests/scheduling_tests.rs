//! Slot and calendar integration tests.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use petcare_core::booking::NewPet;
use petcare_core::{
    Account, AccountKind, AppointmentStatus, BookingError, BookingPolicy, Database,
    DirectBooking, ScheduleQuery, Scheduler, WorkWindow,
};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn setup() -> (Database, Account, Account, String) {
    let db = Database::open_in_memory().unwrap();
    let vet = Account::new("Dr. Rivera".into(), "rivera@example.com".into(), AccountKind::Vet);
    let owner = Account::new("Sam".into(), "sam@example.com".into(), AccountKind::Owner);
    db.insert_account(&vet).unwrap();
    db.insert_account(&owner).unwrap();
    let pet_id = Scheduler::new(&db)
        .register_pet(
            &owner,
            NewPet {
                name: "Max".into(),
                species: "canine".into(),
                breed: None,
            },
        )
        .unwrap()
        .id;
    (db, vet, owner, pet_id)
}

fn book(scheduler: &Scheduler, vet: &Account, pet_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    scheduler
        .book_direct(
            vet,
            DirectBooking {
                clinic_id: None,
                pet_id: pet_id.to_string(),
                start,
                end,
                reason: None,
                notes: None,
            },
        )
        .unwrap()
        .id
}

#[test]
fn test_booked_slot_is_not_offered() {
    let (db, vet, _, pet_id) = setup();
    let scheduler = Scheduler::new(&db);
    book(&scheduler, &vet, &pet_id, at(10, 10, 0), at(10, 10, 30));

    let slots = scheduler
        .available_slots(&vet.id, date(10), at(1, 8, 0))
        .unwrap();

    assert_eq!(slots.len(), 17);
    assert!(!slots.contains(&"10:00".to_string()));
    assert!(slots.contains(&"10:30".to_string()));
}

#[test]
fn test_released_appointment_frees_slot() {
    let (db, vet, _, pet_id) = setup();
    let scheduler = Scheduler::new(&db);
    let id = book(&scheduler, &vet, &pet_id, at(10, 10, 0), at(10, 10, 30));
    scheduler
        .update_status(&vet, &id, AppointmentStatus::NoShow)
        .unwrap();

    let slots = scheduler
        .available_slots(&vet.id, date(10), at(1, 8, 0))
        .unwrap();
    assert_eq!(slots.len(), 18);
}

#[test]
fn test_slots_today_are_in_the_future() {
    let (db, vet, _, _) = setup();
    let scheduler = Scheduler::new(&db);

    let slots = scheduler
        .available_slots(&vet.id, date(10), at(10, 16, 45))
        .unwrap();
    assert_eq!(slots, vec!["17:00", "17:30"]);
}

#[test]
fn test_slots_respect_policy_window() {
    let (db, vet, _, _) = setup();
    let policy = BookingPolicy {
        window: WorkWindow::new(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            60,
        )
        .unwrap(),
        request_minutes: 30,
    };
    let scheduler = Scheduler::with_policy(&db, policy);

    let slots = scheduler
        .available_slots(&vet.id, date(10), at(1, 8, 0))
        .unwrap();
    assert_eq!(slots, vec!["08:00", "09:00"]);
}

#[test]
fn test_slots_for_unknown_vet() {
    let (db, _, owner, _) = setup();
    let scheduler = Scheduler::new(&db);

    let result = scheduler.available_slots("ghost", date(10), at(1, 8, 0));
    assert!(matches!(result, Err(BookingError::NotFound(_))));

    // Owners have no slots
    let result = scheduler.available_slots(&owner.id, date(10), at(1, 8, 0));
    assert!(matches!(result, Err(BookingError::NotFound(_))));
}

#[test]
fn test_schedule_window() {
    let (db, vet, _, pet_id) = setup();
    let scheduler = Scheduler::new(&db);
    book(&scheduler, &vet, &pet_id, at(10, 10, 0), at(10, 10, 30));
    book(&scheduler, &vet, &pet_id, at(12, 9, 0), at(12, 9, 30));
    book(&scheduler, &vet, &pet_id, at(20, 9, 0), at(20, 9, 30));

    let week = scheduler
        .schedule(
            &vet,
            ScheduleQuery {
                start: Some(at(10, 0, 0)),
                end: Some(at(17, 0, 0)),
                clinic_id: None,
            },
            at(10, 8, 0),
        )
        .unwrap();
    assert_eq!(week.len(), 2);
    assert!(week[0].starts_at < week[1].starts_at);

    // Defaults to seven days from the start of today
    let defaulted = scheduler
        .schedule(&vet, ScheduleQuery::default(), at(10, 8, 0))
        .unwrap();
    assert_eq!(defaulted.len(), 2);
}

#[test]
fn test_schedule_rejects_inverted_range() {
    let (db, vet, _, _) = setup();
    let scheduler = Scheduler::new(&db);

    let result = scheduler.schedule(
        &vet,
        ScheduleQuery {
            start: Some(at(17, 0, 0)),
            end: Some(at(10, 0, 0)),
            clinic_id: None,
        },
        at(10, 8, 0),
    );
    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[test]
fn test_slots_on_last_representable_date() {
    let (db, vet, _, _) = setup();
    let scheduler = Scheduler::new(&db);
    let max_date: NaiveDate = "+262142-12-31".parse().unwrap();

    let result = scheduler.available_slots(&vet.id, max_date, at(10, 8, 0));
    assert!(matches!(result, Err(BookingError::Validation(_))));

    // Storage is still usable afterwards
    assert_eq!(scheduler.available_slots(&vet.id, date(11), at(10, 8, 0)).unwrap().len(), 18);
}

#[test]
fn test_schedule_start_near_end_of_time() {
    let (db, vet, _, _) = setup();
    let scheduler = Scheduler::new(&db);

    let result = scheduler.schedule(
        &vet,
        ScheduleQuery {
            start: Some(DateTime::<Utc>::MAX_UTC),
            end: None,
            clinic_id: None,
        },
        at(10, 8, 0),
    );
    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[test]
fn test_schedule_for_foreign_clinic_is_forbidden() {
    let (db, vet, _, pet_id) = setup();
    let scheduler = Scheduler::new(&db);
    let other = Account::new("Dr. Chen".into(), "chen@example.com".into(), AccountKind::Vet);
    db.insert_account(&other).unwrap();

    book(&scheduler, &vet, &pet_id, at(10, 10, 0), at(10, 10, 30));
    let clinic = scheduler.ensure_personal_clinic(&vet.id).unwrap();

    let result = scheduler.schedule(
        &other,
        ScheduleQuery {
            clinic_id: Some(clinic.id),
            ..Default::default()
        },
        at(10, 8, 0),
    );
    assert!(matches!(result, Err(BookingError::Forbidden(_))));
}

#[test]
fn test_on_disk_database_keeps_bookings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("petcare.db");

    let vet_id = {
        let db = Database::open(&path).unwrap();
        let vet = Account::new("Dr. Rivera".into(), "rivera@example.com".into(), AccountKind::Vet);
        let owner = Account::new("Sam".into(), "sam@example.com".into(), AccountKind::Owner);
        db.insert_account(&vet).unwrap();
        db.insert_account(&owner).unwrap();
        let scheduler = Scheduler::new(&db);
        let pet = scheduler
            .register_pet(
                &owner,
                NewPet {
                    name: "Max".into(),
                    species: "canine".into(),
                    breed: None,
                },
            )
            .unwrap();
        book(&scheduler, &vet, &pet.id, at(10, 10, 0), at(10, 10, 30));
        vet.id
    };

    let db = Database::open(&path).unwrap();
    let slots = Scheduler::new(&db)
        .available_slots(&vet_id, date(10), at(1, 8, 0))
        .unwrap();
    assert!(!slots.contains(&"10:00".to_string()));
}
