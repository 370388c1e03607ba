mod support;

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;

use fleetdesk_client::{ApiError, FetchOutcome};
use fleetdesk_core::{BunkId, FuelId, Upload, UserId, VehicleId};
use fleetdesk_fleet::{NewFuelRecord, VehicleForm};
use fleetdesk_parties::{DriverDraft, NewBunk};

use support::{Canned, MockApi, bunk_json, fuel_json, user_json, vehicle_json};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn fetch_all_replaces_items_wholesale() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/vehicles",
        Canned::ok(json!([vehicle_json(1, "A-1", 100), vehicle_json(2, "A-2", 200)])),
    )
    .on("GET", "/vehicles", Canned::ok(json!([vehicle_json(3, "B-3", 300)])));
    let services = api.services(Some("T0")).await;

    assert_eq!(services.vehicles.fetch_all().await, FetchOutcome::Applied);
    assert_eq!(services.vehicles.snapshot().await.items.len(), 2);

    assert_eq!(services.vehicles.fetch_all().await, FetchOutcome::Applied);
    let state = services.vehicles.snapshot().await;
    let ids: Vec<i64> = state.items.iter().map(|v| v.id.get()).collect();
    assert_eq!(ids, vec![3]);
    assert!(!state.loading);
    assert_eq!(state.error, None);

    let sent = api.requests_to("GET", "/vehicles");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer T0"));
}

#[tokio::test]
async fn failed_fetch_keeps_stale_items_and_records_message() {
    let api = MockApi::spawn().await;
    api.on("GET", "/bunks", Canned::ok(json!([bunk_json(1, "HP Auto Nagar")])))
        .on("GET", "/bunks", Canned::json(500, json!({ "message": "database down" })));
    let services = api.services(Some("T0")).await;

    services.bunks.fetch_all().await;
    assert_eq!(services.bunks.fetch_all().await, FetchOutcome::Failed);

    let state = services.bunks.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, BunkId::new(1));
    assert_eq!(state.error.as_deref(), Some("database down"));
    assert!(!state.loading);
}

#[tokio::test]
async fn rejected_fetch_without_message_uses_default() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::raw(502, "bad gateway"));
    let services = api.services(Some("T0")).await;

    services.vehicles.fetch_all().await;
    assert_eq!(
        services.vehicles.snapshot().await.error.as_deref(),
        Some("Failed to fetch vehicles")
    );
}

#[tokio::test]
async fn malformed_json_surfaces_as_parse_error() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicle-fuels", Canned::raw(200, "<html>oops</html>"));
    let services = api.services(Some("T0")).await;

    assert_eq!(services.fuels.fetch_all().await, FetchOutcome::Failed);
    let error = services.fuels.snapshot().await.error.unwrap();
    assert!(error.starts_with("parse error"), "{error}");
}

#[tokio::test]
async fn fetch_one_reads_through_without_touching_items() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::ok(json!([vehicle_json(1, "A-1", 100)])))
        .on("GET", "/vehicles/7", Canned::ok(vehicle_json(7, "C-7", 700)));
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;

    let vehicle = services.vehicles.fetch_one(VehicleId::new(7)).await.unwrap();
    assert_eq!(vehicle.vehicle_number, "C-7");

    let state = services.vehicles.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert!(services.vehicles.find(VehicleId::new(7)).await.is_none());

    let err = services
        .vehicles
        .fetch_one(VehicleId::new(99))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_then_refresh_holds_new_vehicle_exactly_once() {
    let api = MockApi::spawn().await;
    api.on("POST", "/vehicles", Canned::json(201, vehicle_json(3, "TN 38 AB 1234", 0)))
        .on(
            "GET",
            "/vehicles",
            Canned::ok(json!([
                vehicle_json(1, "A-1", 100),
                vehicle_json(3, "TN 38 AB 1234", 0)
            ])),
        );
    let services = api.services(Some("T0")).await;

    let form = VehicleForm {
        vehicle_name: Some("Tipper".into()),
        vehicle_number: Some("TN 38 AB 1234".into()),
        insurance: Some(day(2030, 1, 1)),
        kilometer: Some(0),
        vehicle_image: Some(Upload::new("front.jpg", b"jpeg".to_vec()).with_content_type("image/jpeg")),
        ..VehicleForm::default()
    };
    let created = services.vehicles.create(form).await.unwrap();
    assert_eq!(created.map(|v| v.id), Some(VehicleId::new(3)));

    let items = services.vehicles.snapshot().await.items;
    let count = items.iter().filter(|v| v.id == VehicleId::new(3)).count();
    assert_eq!(count, 1);
    assert_eq!(items.len(), 2);

    let post = &api.requests_to("POST", "/vehicles")[0];
    assert!(post
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    let body = post.body_text();
    assert!(body.contains("name=\"vehicleName\""));
    assert!(body.contains("name=\"insurance\""));
    assert!(body.contains("2030-01-01"));
    assert!(body.contains("filename=\"front.jpg\""));
    assert!(!body.contains("name=\"pollution\""));
    assert_eq!(api.requests_to("GET", "/vehicles").len(), 1);
}

#[tokio::test]
async fn failed_create_records_and_returns_server_message() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::ok(json!([vehicle_json(1, "A-1", 100)])))
        .on(
            "POST",
            "/vehicles",
            Canned::json(409, json!({ "message": "Vehicle number already exists" })),
        );
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;

    let form = VehicleForm {
        vehicle_name: Some("Tipper".into()),
        vehicle_number: Some("A-1".into()),
        kilometer: Some(10),
        ..VehicleForm::default()
    };
    let err = services.vehicles.create(form).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 409,
            message: "Vehicle number already exists".into()
        }
    );

    let state = services.vehicles.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Vehicle number already exists"));
    assert!(!state.loading);
    assert_eq!(api.requests_to("GET", "/vehicles").len(), 1);
}

#[tokio::test]
async fn incomplete_vehicle_form_is_never_sent() {
    let api = MockApi::spawn().await;
    let services = api.services(Some("T0")).await;

    let err = services
        .vehicles
        .create(VehicleForm::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn update_refreshes_and_remove_drops_locally() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/vehicles",
        Canned::ok(json!([vehicle_json(1, "A-1", 100), vehicle_json(2, "A-2", 200)])),
    )
    .on("PUT", "/vehicles/1", Canned::ok(json!({ "message": "Vehicle updated" })))
    .on("DELETE", "/vehicles/2", Canned::ok(json!({ "message": "Vehicle deleted" })));
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;

    let backwards = VehicleForm {
        kilometer: Some(50),
        ..VehicleForm::default()
    };
    let err = services
        .vehicles
        .update(VehicleId::new(1), backwards)
        .await
        .unwrap_err();
    assert!(err.message().contains("100"));
    assert!(api.requests_to("PUT", "/vehicles/1").is_empty());

    let forward = VehicleForm {
        kilometer: Some(150),
        ..VehicleForm::default()
    };
    services
        .vehicles
        .update(VehicleId::new(1), forward)
        .await
        .unwrap();
    assert_eq!(api.requests_to("PUT", "/vehicles/1").len(), 1);
    assert_eq!(api.requests_to("GET", "/vehicles").len(), 2);

    services.vehicles.remove(VehicleId::new(2)).await.unwrap();
    assert!(services.vehicles.find(VehicleId::new(2)).await.is_none());
    assert_eq!(services.vehicles.snapshot().await.items.len(), 1);
}

#[tokio::test]
async fn fuel_reading_not_ahead_of_vehicle_is_blocked_locally() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::ok(json!([vehicle_json(5, "TN 38 AB 1234", 450)])));
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;
    let vehicle = services.vehicles.find(VehicleId::new(5)).await.unwrap();

    let record = NewFuelRecord {
        vehicle_id: VehicleId::new(5),
        bunk_id: BunkId::new(2),
        volume: 40.0,
        amount: 4200.0,
        date: day(2025, 2, 1),
        kilometer: 450,
    };
    let err = services.fuels.create(&vehicle, record).await.unwrap_err();

    assert!(err.is_validation());
    assert!(err.message().contains("450"), "{}", err.message());
    assert!(api.requests_to("POST", "/vehicle-fuels").is_empty());
}

#[tokio::test]
async fn fuel_create_posts_json_then_refreshes() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::ok(json!([vehicle_json(5, "TN 38 AB 1234", 450)])))
        .on("POST", "/vehicle-fuels", Canned::json(201, json!({ "message": "created" })))
        .on("GET", "/vehicle-fuels", Canned::ok(json!([fuel_json(11, 5, false)])));
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;
    let vehicle = services.vehicles.find(VehicleId::new(5)).await.unwrap();

    let record = NewFuelRecord {
        vehicle_id: VehicleId::new(5),
        bunk_id: BunkId::new(2),
        volume: 40.0,
        amount: 4200.0,
        date: day(2025, 2, 1),
        kilometer: 470,
    };
    services.fuels.create(&vehicle, record).await.unwrap();

    let post = &api.requests_to("POST", "/vehicle-fuels")[0];
    let body = post.json();
    assert_eq!(body["kilometer"], 470);
    assert_eq!(body["date"], "2025-02-01");
    assert_eq!(post.authorization.as_deref(), Some("Bearer T0"));

    let items = services.fuels.snapshot().await.items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, FuelId::new(11));
}

#[tokio::test]
async fn toggling_verification_twice_restores_original_state() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/vehicle-fuels",
        Canned::ok(json!([fuel_json(11, 5, false), fuel_json(12, 5, true)])),
    )
    .on("PATCH", "/vehicle-fuel/11/verify", Canned::ok(json!({ "fuel": { "isVerified": true } })))
    .on("PATCH", "/vehicle-fuel/11/verify", Canned::ok(json!({ "fuel": { "isVerified": false } })));
    let services = api.services(Some("T0")).await;
    services.fuels.fetch_all().await;
    let before = services.fuels.snapshot().await.items;

    assert!(services.fuels.toggle_verification(FuelId::new(11)).await.unwrap());
    assert!(services.fuels.find(FuelId::new(11)).await.unwrap().is_verified);

    assert!(!services.fuels.toggle_verification(FuelId::new(11)).await.unwrap());
    assert_eq!(services.fuels.snapshot().await.items, before);

    // Patched in place, never refetched.
    assert_eq!(api.requests_to("GET", "/vehicle-fuels").len(), 1);
}

#[tokio::test]
async fn bunk_create_validates_then_posts_json() {
    let api = MockApi::spawn().await;
    api.on("POST", "/bunks", Canned::json(201, bunk_json(4, "Indian Oil")))
        .on("GET", "/bunks", Canned::ok(json!([bunk_json(4, "Indian Oil")])));
    let services = api.services(Some("T0")).await;

    let mut bunk = NewBunk {
        bunk_name: "Indian Oil".into(),
        owner_name: " ".into(),
        phone_number: "9000000000".into(),
        address: "Salem".into(),
        amount: 0.0,
    };
    assert!(services.bunks.create(bunk.clone()).await.unwrap_err().is_validation());
    assert!(api.requests().is_empty());

    bunk.owner_name = "Selvam".into();
    services.bunks.create(bunk).await.unwrap();

    let body = api.requests_to("POST", "/bunks")[0].json();
    assert_eq!(body["bunkName"], "Indian Oil");
    assert_eq!(body["ownerName"], "Selvam");
    assert_eq!(services.bunks.snapshot().await.items.len(), 1);
}

#[tokio::test]
async fn driver_create_sends_documents_and_refreshes_driver_list() {
    let api = MockApi::spawn().await;
    api.on("POST", "/driver/create-driver", Canned::json(201, json!({ "message": "ok" })))
        .on("GET", "/user/drivers", Canned::ok(json!([user_json(8, "Murugan", 2)])));
    let services = api.services(Some("T0")).await;

    let draft = DriverDraft {
        name: "Murugan".into(),
        email: "murugan@example.com".into(),
        phone_number: "9876501234".into(),
        password: "secret1".into(),
        amount: Some(2500.0),
        driving_licence_validity: Some(day(2030, 5, 1)),
        image: Some(Upload::new("me.jpg", vec![1])),
        aadhar: Some(Upload::new("aadhar.pdf", vec![2])),
        driving_licence: Some(Upload::new("dl.jpg", vec![3])),
        driving_licence_back: None,
    };
    services.drivers.create(draft).await.unwrap();

    let body = api.requests_to("POST", "/driver/create-driver")[0].body_text();
    assert!(body.contains("name=\"aadhar\""));
    assert!(body.contains("name=\"drivingLicenceValidity\""));
    assert!(!body.contains("name=\"drivingLicenceBack\""));

    let drivers = services.drivers.snapshot().await.items;
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].id, UserId::new(8));
}

#[tokio::test]
async fn user_delete_drops_user_from_directory() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/user",
        Canned::ok(json!([user_json(1, "Admin", 1), user_json(8, "Murugan", 2)])),
    )
    .on("DELETE", "/user/8", Canned::ok(json!({ "message": "deleted" })))
    .on("DELETE", "/user/1", Canned::json(403, json!({})));
    let services = api.services(Some("T0")).await;
    services.users.fetch_users().await;

    services.users.delete_user(UserId::new(8)).await.unwrap();
    let err = services.users.delete_user(UserId::new(1)).await.unwrap_err();
    assert_eq!(err.message(), "Delete failed");

    let state = services.users.users().await;
    let ids: Vec<i64> = state.items.iter().map(|u| u.id.get()).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(state.error.as_deref(), Some("Delete failed"));
}

#[tokio::test]
async fn older_fetch_response_cannot_overwrite_newer_one() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/bunks",
        Canned::ok(json!([bunk_json(1, "Old")])).after(Duration::from_millis(300)),
    )
    .on("GET", "/bunks", Canned::ok(json!([bunk_json(2, "New")])));
    let services = api.services(Some("T0")).await;

    let bunks = services.bunks.clone();
    let first = tokio::spawn(async move { bunks.fetch_all().await });
    api.wait_for_requests(1).await;

    assert_eq!(services.bunks.fetch_all().await, FetchOutcome::Applied);
    assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);

    let state = services.bunks.snapshot().await;
    let names: Vec<&str> = state.items.iter().map(|b| b.bunk_name.as_str()).collect();
    assert_eq!(names, vec!["New"]);
    assert!(!state.loading);
}

#[tokio::test]
async fn rejected_update_records_error_and_skips_refresh() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicles", Canned::ok(json!([vehicle_json(1, "A-1", 100)])))
        .on(
            "PUT",
            "/vehicles/1",
            Canned::json(500, json!({ "message": "Could not save vehicle" })),
        );
    let services = api.services(Some("T0")).await;
    services.vehicles.fetch_all().await;
    let before = services.vehicles.snapshot().await.items;

    let form = VehicleForm {
        kilometer: Some(150),
        ..VehicleForm::default()
    };
    let err = services
        .vehicles
        .update(VehicleId::new(1), form)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "Could not save vehicle".into()
        }
    );

    let state = services.vehicles.snapshot().await;
    assert_eq!(state.items, before);
    assert_eq!(state.error.as_deref(), Some("Could not save vehicle"));
    assert!(!state.loading);
    assert_eq!(api.requests_to("GET", "/vehicles").len(), 1);
}

#[tokio::test]
async fn rejected_verification_leaves_records_untouched() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicle-fuels", Canned::ok(json!([fuel_json(11, 5, false)])))
        .on("PATCH", "/vehicle-fuel/11/verify", Canned::json(500, json!({})));
    let services = api.services(Some("T0")).await;
    services.fuels.fetch_all().await;
    let before = services.fuels.snapshot().await.items;

    let err = services
        .fuels
        .toggle_verification(FuelId::new(11))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = services.fuels.snapshot().await;
    assert_eq!(state.items, before);
    assert_eq!(state.error.as_deref(), Some("Failed to update fuel status"));
    assert!(!state.loading);
}

#[tokio::test]
async fn undecodable_verification_reply_lands_in_store_error() {
    let api = MockApi::spawn().await;
    api.on("GET", "/vehicle-fuels", Canned::ok(json!([fuel_json(11, 5, false)])))
        .on("PATCH", "/vehicle-fuel/11/verify", Canned::raw(200, "<html>ok</html>"));
    let services = api.services(Some("T0")).await;
    services.fuels.fetch_all().await;

    let err = services
        .fuels
        .toggle_verification(FuelId::new(11))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));

    let state = services.fuels.snapshot().await;
    assert_eq!(state.error, Some(err.message()));
    assert!(!state.items[0].is_verified);
    assert!(!state.loading);
}

#[tokio::test]
async fn write_finishing_first_keeps_loading_for_pending_fetch() {
    let api = MockApi::spawn().await;
    api.on(
        "GET",
        "/user",
        Canned::ok(json!([user_json(2, "Kumar", 2)])).after(Duration::from_millis(300)),
    )
    .on("DELETE", "/user/1", Canned::ok(json!({ "message": "deleted" })));
    let services = api.services(Some("T0")).await;

    let users = services.users.clone();
    let fetch = tokio::spawn(async move { users.fetch_users().await });
    api.wait_for_requests(1).await;

    services.users.delete_user(UserId::new(1)).await.unwrap();
    assert!(services.users.users().await.loading);

    assert_eq!(fetch.await.unwrap(), FetchOutcome::Applied);
    let state = services.users.users().await;
    assert!(!state.loading);
    assert_eq!(state.items.len(), 1);
}
