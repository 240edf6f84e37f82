mod helpers;

use helpers::setup::spawn_app;
use helpers::utils::{create_salon, phone_client, FRIDAY, HOUR};
use salon_scheduler_sdk::{
    APIError, AppointmentInput, AppointmentStatus, CreateAppointmentInput, GetAvailableSlotsInput,
    GetConversionStatsInput, InboundBookingInput, RescheduleAppointmentInput, ReminderJobStatus,
    UpdateAppointmentStatusInput, ID,
};

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_book_and_cancel_appointment() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;
    let input = |start_ts: i64, phone: &str| CreateAppointmentInput {
        tenant_id: salon.tenant.id.clone(),
        resource_id: salon.resource.id.clone(),
        service_id: salon.service.id.clone(),
        client: phone_client(phone),
        start_ts,
    };

    let appointment = sdk
        .appointment
        .create(input(FRIDAY + 15 * HOUR, "+4711111111"))
        .await
        .expect("Expected to create appointment")
        .appointment;
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(appointment.end_ts, FRIDAY + 16 * HOUR);

    // Overlapping booking of the same resource
    let res = sdk
        .appointment
        .create(input(FRIDAY + 15 * HOUR + HOUR / 2, "+4722222222"))
        .await;
    assert!(matches!(
        res,
        Err(APIError::UnexpectedStatusCode(status)) if status.as_u16() == 409
    ));

    let reminders = sdk
        .appointment
        .get_reminders(AppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
        })
        .await
        .unwrap()
        .reminders;
    assert_eq!(reminders.len(), 2);
    assert!(reminders.iter().all(|r| r.status == ReminderJobStatus::Pending));

    let cancelled = sdk
        .appointment
        .cancel(AppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
        })
        .await
        .unwrap()
        .appointment;
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let reminders = sdk
        .appointment
        .get_reminders(AppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
        })
        .await
        .unwrap()
        .reminders;
    assert!(reminders.is_empty());

    // The interval is free again
    assert!(sdk
        .appointment
        .create(input(FRIDAY + 15 * HOUR + HOUR / 2, "+4722222222"))
        .await
        .is_ok());
}

#[actix_web::main]
#[test]
async fn test_only_one_of_concurrent_bookings_wins() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;
    let input = |phone: &str| CreateAppointmentInput {
        tenant_id: salon.tenant.id.clone(),
        resource_id: salon.resource.id.clone(),
        service_id: salon.service.id.clone(),
        client: phone_client(phone),
        start_ts: FRIDAY + 12 * HOUR,
    };

    let results = futures::future::join_all(vec![
        sdk.appointment.create(input("+4711111111")),
        sdk.appointment.create(input("+4722222222")),
        sdk.appointment.create(input("+4733333333")),
    ])
    .await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
}

#[actix_web::main]
#[test]
async fn test_update_status_and_reschedule() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;
    let appointment = sdk
        .appointment
        .create(CreateAppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            resource_id: salon.resource.id.clone(),
            service_id: salon.service.id.clone(),
            client: phone_client("+4711111111"),
            start_ts: FRIDAY + 12 * HOUR,
        })
        .await
        .unwrap()
        .appointment;

    let confirmed = sdk
        .appointment
        .update_status(UpdateAppointmentStatusInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
            status: AppointmentStatus::Confirmed,
        })
        .await
        .unwrap()
        .appointment;
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let res = sdk
        .appointment
        .reschedule(RescheduleAppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
            start_ts: FRIDAY + 17 * HOUR,
            resource_id: None,
        })
        .await
        .unwrap();
    assert_eq!(res.cancelled.id, appointment.id);
    assert_eq!(res.cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(res.appointment.start_ts, FRIDAY + 17 * HOUR);

    // A cancelled appointment can not be completed
    let res = sdk
        .appointment
        .update_status(UpdateAppointmentStatusInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
            status: AppointmentStatus::Completed,
        })
        .await;
    assert!(matches!(
        res,
        Err(APIError::UnexpectedStatusCode(status)) if status.as_u16() == 400
    ));

    let fetched = sdk
        .appointment
        .get(AppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            appointment_id: appointment.id.clone(),
        })
        .await
        .unwrap()
        .appointment;
    assert_eq!(fetched.status, AppointmentStatus::Cancelled);
}

#[actix_web::main]
#[test]
async fn test_get_available_slots() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;
    sdk.appointment
        .create(CreateAppointmentInput {
            tenant_id: salon.tenant.id.clone(),
            resource_id: salon.resource.id.clone(),
            service_id: salon.service.id.clone(),
            client: phone_client("+4711111111"),
            start_ts: FRIDAY + 12 * HOUR,
        })
        .await
        .unwrap();

    let res = sdk
        .slots
        .get_available(GetAvailableSlotsInput {
            tenant_id: salon.tenant.id.clone(),
            service_id: salon.service.id.clone(),
            date: "2030-5-10".into(),
            resource_id: None,
            preferred_ts: Some(FRIDAY + 13 * HOUR),
        })
        .await
        .unwrap();
    assert_eq!(res.date, "2030-5-10");
    assert_eq!(res.slots.len(), 9);
    assert_eq!(res.slots[0].start, FRIDAY + 13 * HOUR);
    assert!(res.slots.iter().all(|s| s.start != FRIDAY + 12 * HOUR));
    assert!(res.slots.iter().all(|s| (0.0..=1.0).contains(&s.score)));

    let res = sdk
        .slots
        .get_available(GetAvailableSlotsInput {
            tenant_id: salon.tenant.id.clone(),
            service_id: salon.service.id.clone(),
            date: "2030-2-30".into(),
            resource_id: None,
            preferred_ts: None,
        })
        .await;
    assert!(matches!(
        res,
        Err(APIError::UnexpectedStatusCode(status)) if status.as_u16() == 400
    ));
}

#[actix_web::main]
#[test]
async fn test_conversion_stats_of_empty_tenant() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;

    let res = sdk
        .notification
        .get_conversion_stats(GetConversionStatsInput {
            tenant_id: salon.tenant.id.clone(),
            channel: "sms".into(),
            notification_type: "reminder_24h".into(),
            from_ts: None,
            to_ts: None,
        })
        .await
        .unwrap();
    assert!(res.stats.is_empty());
    assert!(res.from_ts < res.to_ts);

    let res = sdk
        .notification
        .get_conversion_stats(GetConversionStatsInput {
            tenant_id: ID::default(),
            channel: "sms".into(),
            notification_type: "reminder_24h".into(),
            from_ts: None,
            to_ts: None,
        })
        .await;
    assert!(matches!(
        res,
        Err(APIError::UnexpectedStatusCode(status)) if status.as_u16() == 404
    ));
}

#[actix_web::main]
#[test]
async fn test_inbound_booking_is_idempotent() {
    let (app, sdk, _) = spawn_app().await;
    let salon = create_salon(&app.ctx).await;
    let payload = format!(
        r#"{{
            "serviceId": "{}",
            "client": {{ "name": "Kari", "channel": {{ "channel": "telegram", "userId": "991" }} }},
            "startTs": {},
            "idempotencyKey": "update-1"
        }}"#,
        salon.service.id,
        FRIDAY + 12 * HOUR
    );
    let input = |secret: &str| InboundBookingInput {
        tenant_id: salon.tenant.id.clone(),
        channel: "telegram".into(),
        secret: secret.into(),
        payload: payload.clone().into_bytes(),
    };

    let res = sdk
        .inbound
        .book(input(app.config.inbound_webhook_secret.as_str()))
        .await
        .unwrap();
    assert!(!res.duplicate);
    let appointment = res.appointment.expect("Expected an appointment");
    assert_eq!(appointment.resource_id, salon.resource.id);

    let res = sdk
        .inbound
        .book(input(app.config.inbound_webhook_secret.as_str()))
        .await
        .unwrap();
    assert!(res.duplicate);
    assert!(res.appointment.is_none());

    let res = sdk.inbound.book(input("wrong secret")).await;
    assert!(matches!(
        res,
        Err(APIError::UnexpectedStatusCode(status)) if status.as_u16() == 401
    ));
}
