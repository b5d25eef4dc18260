//! Tests to verify serialized payloads match what the Umami `/api/send`
//! endpoint expects.

use chrono::{TimeZone, Utc};
use serde_json::json;
use umami::types::{Envelope, CURRENCY_KEY, REVENUE_KEY};
use umami::{EventData, EventKind, Payload, Track};

#[test]
fn test_event_envelope_json_structure() {
    let payload = Payload::new()
        .hostname("example.com")
        .language("en-US")
        .referrer("")
        .screen("1920x1080")
        .title("Home")
        .url("/")
        .website("site_1");

    let json = serde_json::to_value(Envelope {
        kind: EventKind::Event,
        payload: &payload,
    })
    .unwrap();

    assert_eq!(json["type"], "event");
    assert_eq!(json["payload"]["website"], "site_1");
    // Empty strings are values, not absent fields
    assert_eq!(json["payload"]["referrer"], "");
    assert!(json["payload"].get("name").is_none());
    assert!(json["payload"].get("data").is_none());
    assert!(json["payload"].get("session").is_none());
}

#[test]
fn test_identify_envelope_json_structure() {
    let payload = Payload::new()
        .session("sess_1")
        .data(EventData::new().property("userId", "u1"))
        .website("site_1");

    let json = serde_json::to_value(Envelope {
        kind: EventKind::Identify,
        payload: &payload,
    })
    .unwrap();

    assert_eq!(
        json,
        json!({
            "type": "identify",
            "payload": { "session": "sess_1", "data": { "userId": "u1" }, "website": "site_1" }
        })
    );
}

#[test]
fn test_website_serialized_last() {
    let payload = Payload::new().name("click").title("t").website("site_1");

    let body = serde_json::to_string(&payload).unwrap();

    assert!(body.ends_with(r#""website":"site_1"}"#));
}

#[test]
fn test_event_data_value_types() {
    let at = Utc.with_ymd_and_hms(2024, 1, 28, 0, 0, 0).unwrap();
    let data = EventData::new()
        .property("label", "pro")
        .property("count", 3)
        .property("ratio", 0.5)
        .property("at", at)
        .property("missing", None::<i64>);

    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(
        json,
        json!({
            "label": "pro",
            "count": 3,
            "ratio": 0.5,
            "at": "2024-01-28T00:00:00.000Z",
            "missing": null
        })
    );
}

#[test]
fn test_revenue_keys_on_the_wire() {
    let data = EventData::new().with_revenue(49.0, "USD").unwrap();

    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json[REVENUE_KEY], 49.0);
    assert_eq!(json[CURRENCY_KEY], "USD");
}

#[test]
fn test_payload_parses_from_json_object() {
    let track = Track::try_from(json!({
        "title": "t",
        "data": { "x": 1 },
        "website": "ignored"
    }))
    .unwrap();

    assert_eq!(
        track,
        Track::Payload(
            Payload::new()
                .title("t")
                .data(EventData::new().property("x", 1))
                .website("ignored")
        )
    );
}

#[test]
fn test_payload_object_keeps_unknown_keys() {
    let track = Track::try_from(json!({ "title": "t", "tag": "beta", "score": 3 })).unwrap();

    let Track::Payload(payload) = track else {
        panic!("Expected payload");
    };
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json, json!({ "title": "t", "tag": "beta", "score": 3 }));
}

#[test]
fn test_unknown_keys_serialize_before_website() {
    let payload = Payload::new().title("t").extra("tag", "beta").website("site_1");

    let body = serde_json::to_string(&payload).unwrap();

    assert_eq!(body, r#"{"title":"t","tag":"beta","website":"site_1"}"#);
}
