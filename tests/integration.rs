//! Comprehensive integration tests for the Time Ledger & Compliance Engine.
//!
//! This test suite covers the full HTTP surface including:
//! - Day recomputation from raw events
//! - Weekly overtime splitting (weekly, daily, double-time, seventh-day)
//! - PTO balances with carryover and overrides
//! - Payroll timesheet generation (weekly and monthly)
//! - Policy resolution with jurisdiction bundles
//! - Error cases

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use ledger_engine::api::{AppState, create_router};
use ledger_engine::config::JurisdictionTable;
use ledger_engine::engine::TimeLedger;
use ledger_engine::models::{
    EventType, LeaveAllowanceOverride, LeaveRequest, LeaveStatus, LeaveType, Policy, RawEvent,
};
use ledger_engine::store::{InMemoryStore, SummaryStore};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state(store: Arc<InMemoryStore>) -> AppState {
    let ledger = TimeLedger::new(store.clone(), store.clone(), store.clone(), store);
    let jurisdictions = JurisdictionTable::builtin().expect("Failed to load builtin rules");
    AppState::new(ledger, jurisdictions)
}

fn create_router_for_test(store: Arc<InMemoryStore>) -> Router {
    create_router(create_test_state(store))
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Seeds a clock-in/clock-out pair at the given location.
fn seed_shift(store: &InMemoryStore, user_id: &str, start: &str, end: &str, location: &str) {
    store.add_event(RawEvent::new(
        user_id,
        EventType::ClockIn,
        at(start),
        Some(location.to_string()),
    ));
    store.add_event(RawEvent::new(
        user_id,
        EventType::ClockOut,
        at(end),
        Some(location.to_string()),
    ));
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn recompute_body(user_id: &str, day: &str) -> Value {
    json!({
        "user_id": user_id,
        "org_id": "org_001",
        "date": day,
        "timezone": "UTC"
    })
}

fn week_entries(minutes: [i64; 7]) -> Vec<Value> {
    let monday = date("2026-03-02");
    minutes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            json!({
                "date": monday + chrono::Duration::days(i as i64),
                "total_minutes": m
            })
        })
        .collect()
}

// =============================================================================
// SECTION 1: Day Recomputation Tests
// =============================================================================

#[tokio::test]
async fn test_recompute_simple_shift_with_break() {
    // Scenario A: 09:00 in, 12:00-12:30 break, 17:30 out.
    // Worked 8.5h minus 0.5h break = 480 minutes.
    let store = Arc::new(InMemoryStore::new());
    store.add_event(RawEvent::new(
        "user_001",
        EventType::ClockIn,
        at("2026-03-02T09:00:00Z"),
        Some("loc_hq".to_string()),
    ));
    store.add_event(RawEvent::new(
        "user_001",
        EventType::BreakStart,
        at("2026-03-02T12:00:00Z"),
        None,
    ));
    store.add_event(RawEvent::new(
        "user_001",
        EventType::BreakEnd,
        at("2026-03-02T12:30:00Z"),
        None,
    ));
    store.add_event(RawEvent::new(
        "user_001",
        EventType::ClockOut,
        at("2026-03-02T17:30:00Z"),
        Some("loc_hq".to_string()),
    ));
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/days/recompute", recompute_body("user_001", "2026-03-02")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total_minutes"], 480);
    assert_eq!(result["break_minutes"], 30);
    assert_eq!(result["meets_policy"], true);
}

#[tokio::test]
async fn test_recompute_is_idempotent_over_http() {
    let store = Arc::new(InMemoryStore::new());
    seed_shift(&store, "user_001", "2026-03-02T08:00:00Z", "2026-03-02T16:00:00Z", "loc_hq");

    let (_, first) = post(
        create_router_for_test(store.clone()),
        "/days/recompute",
        recompute_body("user_001", "2026-03-02"),
    )
    .await;
    let (_, second) = post(
        create_router_for_test(store.clone()),
        "/days/recompute",
        recompute_body("user_001", "2026-03-02"),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(
        store
            .list_summaries("user_001", date("2026-03-02"), date("2026-03-02"))
            .unwrap()
            .len(),
        1,
        "recomputation must upsert, not append"
    );
}

#[tokio::test]
async fn test_recompute_orphan_break_end_is_skipped() {
    // A BREAK_END with no open break is skipped; the shift still counts.
    let store = Arc::new(InMemoryStore::new());
    store.add_event(RawEvent::new(
        "user_001",
        EventType::BreakEnd,
        at("2026-03-02T07:00:00Z"),
        None,
    ));
    seed_shift(&store, "user_001", "2026-03-02T08:00:00Z", "2026-03-02T16:00:00Z", "loc_hq");
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/days/recompute", recompute_body("user_001", "2026-03-02")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total_minutes"], 480);
    assert_eq!(result["break_minutes"], 0);
}

#[tokio::test]
async fn test_recompute_remote_day_fails_on_site_check() {
    let store = Arc::new(InMemoryStore::new());
    seed_shift(&store, "user_001", "2026-03-02T08:00:00Z", "2026-03-02T16:00:00Z", "loc_home");
    let router = create_router_for_test(store);

    let body = json!({
        "user_id": "user_001",
        "org_id": "org_001",
        "date": "2026-03-02",
        "timezone": "UTC",
        "remote_location_ids": ["loc_home"]
    });
    let (status, result) = post(router, "/days/recompute", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total_minutes"], 480);
    assert_eq!(result["meets_policy"], false);
}

#[tokio::test]
async fn test_recompute_respects_local_day_boundaries() {
    // 23:00-01:00 UTC straddles midnight; only the first hour belongs to
    // March 2 in UTC.
    let store = Arc::new(InMemoryStore::new());
    seed_shift(&store, "user_001", "2026-03-02T23:00:00Z", "2026-03-03T01:00:00Z", "loc_hq");
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/days/recompute", recompute_body("user_001", "2026-03-02")).await;

    assert_eq!(status, StatusCode::OK);
    // Clock-out falls outside the day window, so only the open session up
    // to the boundary would count if the day were today; for a past day
    // the orphaned clock-in is dropped.
    assert_eq!(result["total_minutes"], 0);
}

// =============================================================================
// SECTION 2: Weekly Overtime Tests
// =============================================================================

#[tokio::test]
async fn test_overtime_scenario_weekly_excess() {
    // Scenario B: 4 days x 480 + 600 = 2520 against a 2400 weekly
    // threshold. 120 minutes move to overtime.
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));
    let body = json!({
        "days": week_entries([480, 480, 480, 480, 600, 0, 0]),
        "policy": Policy::system_default("org_001")
    });

    let (status, result) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["regular_minutes"], 2400);
    assert_eq!(result["overtime_minutes"], 120);
    assert_eq!(result["double_time_minutes"], 0);
}

#[tokio::test]
async fn test_overtime_scenario_daily_double_time() {
    // Scenario C: one 800-minute day under daily 480 / double-time 720.
    // 480 regular + 240 overtime + 80 double time.
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));
    let policy = Policy {
        overtime_threshold_daily: 480,
        daily_double_time_minutes: 720,
        ..Policy::system_default("org_001")
    };
    let body = json!({
        "days": week_entries([800, 0, 0, 0, 0, 0, 0]),
        "policy": policy
    });

    let (status, result) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["regular_minutes"], 480);
    assert_eq!(result["overtime_minutes"], 240);
    assert_eq!(result["double_time_minutes"], 80);
}

#[tokio::test]
async fn test_overtime_seventh_consecutive_day() {
    // Seven consecutive worked days with the seventh-day rule: the
    // seventh day earns no regular minutes.
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));
    let policy = Policy {
        seventh_day_rule: true,
        overtime_threshold_weekly: 0,
        ..Policy::system_default("org_001")
    };
    let body = json!({
        "days": week_entries([480, 480, 480, 480, 480, 480, 480]),
        "policy": policy
    });

    let (status, result) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["regular_minutes"], 2880);
    assert_eq!(result["overtime_minutes"], 480);
    let seventh = &result["daily_breakdown"][6];
    assert_eq!(seventh["seventh_day"], true);
    assert_eq!(seventh["regular_minutes"], 0);
}

#[tokio::test]
async fn test_overtime_buckets_conserve_total() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));
    let policy = Policy {
        overtime_threshold_daily: 480,
        daily_double_time_minutes: 720,
        seventh_day_rule: true,
        ..Policy::system_default("org_001")
    };
    let minutes = [800, 480, 520, 480, 480, 300, 400];
    let body = json!({
        "days": week_entries(minutes),
        "policy": policy
    });

    let (status, result) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::OK);
    let split = result["regular_minutes"].as_i64().unwrap()
        + result["overtime_minutes"].as_i64().unwrap()
        + result["double_time_minutes"].as_i64().unwrap();
    assert_eq!(split, minutes.iter().sum::<i64>());
}

#[tokio::test]
async fn test_overtime_rejects_non_monday_start() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));
    let tuesday = date("2026-03-03");
    let days: Vec<Value> = (0..7)
        .map(|i| {
            json!({
                "date": tuesday + chrono::Duration::days(i),
                "total_minutes": 480
            })
        })
        .collect();
    let body = json!({"days": days, "policy": Policy::system_default("org_001")});

    let (status, result) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_WEEK");
}

// =============================================================================
// SECTION 3: PTO Balance Tests
// =============================================================================

fn balance_body(reference: &str) -> Value {
    json!({
        "user_id": "user_001",
        "org_id": "org_001",
        "reference_date": reference
    })
}

fn pto_day(store: &InMemoryStore, day: &str) {
    store.add_leave(LeaveRequest {
        user_id: "user_001".to_string(),
        org_id: "org_001".to_string(),
        date: date(day),
        leave_type: LeaveType::Pto,
        status: LeaveStatus::Approved,
    });
}

#[tokio::test]
async fn test_balance_scenario_carryover_capped() {
    // Scenario D: allowance 10, cap 5, 2 days taken last year.
    // Leftover 8 is capped at 5; 3 taken this year leaves 10 + 5 - 3 = 12.
    let store = Arc::new(InMemoryStore::new());
    store.add_policy(Policy {
        annual_pto_days: 10,
        max_carryover_days: 5,
        ..Policy::system_default("org_001")
    });
    pto_day(&store, "2025-04-01");
    pto_day(&store, "2025-08-15");
    pto_day(&store, "2026-02-02");
    pto_day(&store, "2026-03-10");
    pto_day(&store, "2026-04-20");
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/leave/balance", balance_body("2026-06-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["annual_allowance"], 10);
    assert_eq!(result["carryover"], 5);
    assert_eq!(result["taken"], 3);
    assert_eq!(result["remaining"], 12);
}

#[tokio::test]
async fn test_balance_scenario_anchor_boundary() {
    // Scenario E: leave year anchored at April 1; a balance queried on
    // March 31 belongs to the year that started last April 1.
    let store = Arc::new(InMemoryStore::new());
    store.add_policy(Policy {
        annual_pto_days: 10,
        leave_year_start_month: 4,
        leave_year_start_day: 1,
        ..Policy::system_default("org_001")
    });
    pto_day(&store, "2026-03-30");
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/leave/balance", balance_body("2026-03-31")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["leave_year_start"], "2025-04-01");
    assert_eq!(result["leave_year_end"], "2026-03-31");
    assert_eq!(result["taken"], 1);
}

#[tokio::test]
async fn test_balance_override_beats_policy_default() {
    let store = Arc::new(InMemoryStore::new());
    store.add_policy(Policy {
        annual_pto_days: 10,
        ..Policy::system_default("org_001")
    });
    store.add_override(LeaveAllowanceOverride {
        user_id: "user_001".to_string(),
        org_id: "org_001".to_string(),
        annual_pto_days: 18,
        effective_year: None,
    });
    store.add_override(LeaveAllowanceOverride {
        user_id: "user_001".to_string(),
        org_id: "org_001".to_string(),
        annual_pto_days: 25,
        effective_year: Some(2026),
    });
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/leave/balance", balance_body("2026-06-01")).await;

    assert_eq!(status, StatusCode::OK);
    // The year-specific override wins over the permanent one.
    assert_eq!(result["annual_allowance"], 25);
    assert_eq!(result["override_applied"], true);
}

#[tokio::test]
async fn test_balance_can_go_negative() {
    let store = Arc::new(InMemoryStore::new());
    store.add_policy(Policy {
        annual_pto_days: 2,
        ..Policy::system_default("org_001")
    });
    for day in ["2026-02-02", "2026-02-03", "2026-02-04"] {
        pto_day(&store, day);
    }
    let router = create_router_for_test(store);

    let (status, result) = post(router, "/leave/balance", balance_body("2026-06-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["remaining"], -1);
}

#[tokio::test]
async fn test_balance_with_no_configured_policy_uses_fallback() {
    // No policy rows at all: the system default applies (zero allowance).
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let (status, result) = post(router, "/leave/balance", balance_body("2026-06-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["annual_allowance"], 0);
    assert_eq!(result["remaining"], 0);
}

// =============================================================================
// SECTION 4: Timesheet Tests
// =============================================================================

/// Seeds five 8-hour on-site days (Mon-Fri of 2026-03-02) and recomputes
/// their summaries through the API.
async fn seed_standard_week(store: &Arc<InMemoryStore>) {
    for day in 2..=6 {
        let d = format!("2026-03-{day:02}");
        seed_shift(
            store,
            "user_001",
            &format!("{d}T08:00:00Z"),
            &format!("{d}T16:00:00Z"),
            "loc_hq",
        );
        let (status, _) = post(
            create_router_for_test(store.clone()),
            "/days/recompute",
            recompute_body("user_001", &d),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_timesheet_flat_forty_hour_week() {
    let store = Arc::new(InMemoryStore::new());
    seed_standard_week(&store).await;
    let router = create_router_for_test(store);

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "week", "monday": "2026-03-02"}
    });
    let (status, result) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["totals"]["total_minutes"], 2400);
    assert_eq!(result["totals"]["regular_minutes"], 2400);
    assert_eq!(result["totals"]["overtime_minutes"], 0);
    assert_eq!(result["totals"]["on_site_minutes"], 2400);
    assert_eq!(result["weeks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_timesheet_incident_minutes_push_into_overtime() {
    let store = Arc::new(InMemoryStore::new());
    seed_standard_week(&store).await;
    let router = create_router_for_test(store);

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "week", "monday": "2026-03-02"},
        "incidents": [{"date": "2026-03-04", "minutes": 240}]
    });
    let (status, result) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["totals"]["total_minutes"], 2640);
    assert_eq!(result["totals"]["incident_minutes"], 240);
    // 2640 against the 2400 payroll threshold.
    assert_eq!(result["totals"]["overtime_minutes"], 240);
}

#[tokio::test]
async fn test_timesheet_monthly_partitions_iso_weeks() {
    // February 2026 starts on a Sunday, so the month spans 5 ISO weeks
    // and the first contains a single in-month day.
    let store = Arc::new(InMemoryStore::new());
    let router = create_router_for_test(store);

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "month", "year": 2026, "month": 2}
    });
    let (status, result) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::OK);
    let weeks = result["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0]["start"], "2026-02-01");
    assert_eq!(weeks[0]["end"], "2026-02-01");
    assert_eq!(weeks[4]["end"], "2026-02-28");
}

#[tokio::test]
async fn test_timesheet_counts_leave_days() {
    let store = Arc::new(InMemoryStore::new());
    seed_standard_week(&store).await;
    store.add_leave(LeaveRequest {
        user_id: "user_001".to_string(),
        org_id: "org_001".to_string(),
        date: date("2026-03-06"),
        leave_type: LeaveType::Sick,
        status: LeaveStatus::Approved,
    });
    let router = create_router_for_test(store);

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "week", "monday": "2026-03-02"}
    });
    let (status, result) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["totals"]["leave_days"], 1);
}

#[tokio::test]
async fn test_timesheet_rejects_non_monday_week() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "week", "monday": "2026-03-03"}
    });
    let (status, result) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_PERIOD");
}

// =============================================================================
// SECTION 5: Policy Resolution Tests
// =============================================================================

#[tokio::test]
async fn test_policy_resolve_known_jurisdiction_bundle() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({"org_id": "org_001", "jurisdiction": "us_ca"});
    let (status, result) = post(router, "/policy/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["policy"]["org_id"], "org_001");
    assert_eq!(result["jurisdiction_rules"]["name"], "California");
    assert_eq!(result["jurisdiction_rules"]["seventh_day_rule"], true);
}

#[tokio::test]
async fn test_policy_resolve_unknown_jurisdiction_omits_bundle() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({"org_id": "org_001", "jurisdiction": "atlantis"});
    let (status, result) = post(router, "/policy/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["jurisdiction_rules"].is_null());
}

#[tokio::test]
async fn test_policy_resolve_prefers_jurisdiction_specific_policy() {
    let store = Arc::new(InMemoryStore::new());
    store.add_policy(Policy {
        overtime_threshold_weekly: 2400,
        ..Policy::system_default("org_001")
    });
    store.add_policy(Policy {
        jurisdiction: Some("us_ca".to_string()),
        overtime_threshold_weekly: 2000,
        ..Policy::system_default("org_001")
    });
    let router = create_router_for_test(store);

    let body = json!({"org_id": "org_001", "jurisdiction": "us_ca"});
    let (status, result) = post(router, "/policy/resolve", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["policy"]["overtime_threshold_weekly"], 2000);
}

// =============================================================================
// SECTION 6: Error Cases Tests
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/timesheets")
                .header("Content-Type", "application/json")
                .body(Body::from("{invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_user_id() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({
        "period": {"kind": "week", "monday": "2026-03-02"}
    });
    let (status, error) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_unknown_timezone() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({
        "user_id": "user_001",
        "org_id": "org_001",
        "date": "2026-03-02",
        "timezone": "Mars/Olympus"
    });
    let (status, error) = post(router, "/days/recompute", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "UNKNOWN_TIMEZONE");
}

#[tokio::test]
async fn test_error_wrong_day_count() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({
        "days": [{"date": "2026-03-02", "total_minutes": 480}],
        "policy": Policy::system_default("org_001")
    });
    let (status, error) = post(router, "/overtime/calculate", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_DAY_COUNT");
}

#[tokio::test]
async fn test_error_invalid_month() {
    let router = create_router_for_test(Arc::new(InMemoryStore::new()));

    let body = json!({
        "user_id": "user_001",
        "period": {"kind": "month", "year": 2026, "month": 13}
    });
    let (status, error) = post(router, "/timesheets", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}
