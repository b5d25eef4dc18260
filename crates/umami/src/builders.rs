//! Payload construction for page views, events and identify calls.

use crate::environment::EnvironmentSnapshot;
use crate::types::{EventData, Payload};
use crate::Error;
use serde_json::Value;

/// Page view: the environment snapshot with `overrides` applied on top.
pub fn page_view(env: &EnvironmentSnapshot, overrides: Option<Payload>) -> Payload {
    let defaults = env.to_payload();
    match overrides {
        Some(overrides) => defaults.merge(overrides),
        None => defaults,
    }
}

/// Named event carrying the environment snapshot.
///
/// `data` is attached verbatim and never merged with environment values.
pub fn named_event(
    env: &EnvironmentSnapshot,
    name: impl Into<String>,
    data: Option<EventData>,
) -> Payload {
    Payload {
        name: Some(name.into()),
        data,
        ..env.to_payload()
    }
}

/// Identify payload: the session and a full copy of the identity properties.
pub fn identify(session: Option<&str>, properties: &EventData) -> Payload {
    Payload {
        session: session.map(String::from),
        data: Some(properties.clone()),
        ..Payload::default()
    }
}

// ============================================
// TRACK INPUT
// ============================================

/// Input to [`Umami::track`](crate::Umami::track).
///
/// Neither form reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    /// An event name with optional data.
    Event {
        name: String,
        data: Option<EventData>,
    },
    /// A prebuilt payload, sent as-is.
    Payload(Payload),
}

impl Track {
    /// Track by event name.
    pub fn named(name: impl Into<String>) -> Self {
        Track::Event {
            name: name.into(),
            data: None,
        }
    }

    /// Track a prebuilt payload.
    pub fn payload(payload: Payload) -> Self {
        Track::Payload(payload)
    }

    /// Attach event data. Has no effect on a prebuilt payload.
    pub fn with_data(self, data: EventData) -> Self {
        match self {
            Track::Event { name, .. } => Track::Event {
                name,
                data: Some(data),
            },
            payload => payload,
        }
    }

    /// Build the outbound payload.
    pub(crate) fn build(self) -> Payload {
        match self {
            Track::Event { name, data } => Payload {
                name: Some(name),
                data,
                ..Payload::default()
            },
            Track::Payload(payload) => payload,
        }
    }
}

impl From<&str> for Track {
    fn from(name: &str) -> Self {
        Track::named(name)
    }
}

impl From<String> for Track {
    fn from(name: String) -> Self {
        Track::named(name)
    }
}

impl From<Payload> for Track {
    fn from(payload: Payload) -> Self {
        Track::Payload(payload)
    }
}

/// Dynamic inputs: a string is an event name, an object is a payload.
/// Anything else is rejected with [`Error::InvalidPayload`].
impl TryFrom<Value> for Track {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => Ok(Track::named(name)),
            obj @ Value::Object(_) => serde_json::from_value(obj)
                .map(Track::Payload)
                .map_err(|_| Error::InvalidPayload),
            _ => Err(Error::InvalidPayload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataValue;
    use serde_json::json;

    fn env() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new()
            .hostname("example.com")
            .language("en-US")
            .referrer("https://google.com")
            .screen(1920, 1080)
            .title("Home")
            .url("/home")
    }

    #[test]
    fn test_page_view_without_overrides_is_snapshot() {
        assert_eq!(page_view(&env(), None), env().to_payload());
    }

    #[test]
    fn test_page_view_override_wins_per_field() {
        let payload = page_view(&env(), Some(Payload::new().title("Pricing").url("/pricing")));

        assert_eq!(payload.title.as_deref(), Some("Pricing"));
        assert_eq!(payload.url.as_deref(), Some("/pricing"));
        assert_eq!(payload.hostname.as_deref(), Some("example.com"));
        assert_eq!(payload.screen.as_deref(), Some("1920x1080"));
        assert!(payload.name.is_none());
    }

    #[test]
    fn test_page_view_override_adds_fields_absent_from_env() {
        let payload = page_view(
            &EnvironmentSnapshot::default(),
            Some(Payload::new().referrer("https://news.ycombinator.com")),
        );

        assert_eq!(payload, Payload::new().referrer("https://news.ycombinator.com"));
    }

    #[test]
    fn test_named_event_includes_env_and_data() {
        let data = EventData::new().property("id", "test");
        let payload = named_event(&env(), "button_press", Some(data.clone()));

        assert_eq!(payload.name.as_deref(), Some("button_press"));
        assert_eq!(payload.data, Some(data));
        assert_eq!(payload.title.as_deref(), Some("Home"));
        assert_eq!(payload.language.as_deref(), Some("en-US"));
    }

    #[test]
    fn test_named_event_without_data_omits_data() {
        let payload = named_event(&env(), "button_press", None);
        assert!(payload.data.is_none());
    }

    #[test]
    fn test_identify_payload_has_no_env_fields() {
        let props = EventData::new().property("userId", "u1");
        let payload = identify(Some("sess_1"), &props);

        assert_eq!(
            payload,
            Payload {
                session: Some("sess_1".into()),
                data: Some(props),
                ..Payload::default()
            }
        );
    }

    #[test]
    fn test_identify_without_properties_sends_empty_data() {
        let payload = identify(None, &EventData::new());

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json, json!({ "data": {} }));
    }

    #[test]
    fn test_track_named_has_no_env_fields() {
        let payload = Track::named("click")
            .with_data(EventData::new().property("x", 1))
            .build();

        assert_eq!(payload.name.as_deref(), Some("click"));
        assert_eq!(payload.data.unwrap().get("x"), Some(&DataValue::from(1)));
        assert!(payload.hostname.is_none());
        assert!(payload.title.is_none());
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_track_payload_passes_through() {
        let given = Payload::new().title("t");
        assert_eq!(Track::from(given.clone()).build(), given);
    }

    #[test]
    fn test_with_data_ignored_for_payload() {
        let given = Payload::new().title("t");
        let track = Track::payload(given.clone()).with_data(EventData::new().property("x", 1));
        assert_eq!(track, Track::Payload(given));
    }

    #[test]
    fn test_try_from_string_is_named() {
        let track = Track::try_from(json!("signup")).unwrap();
        assert_eq!(track, Track::named("signup"));
    }

    #[test]
    fn test_try_from_object_is_payload() {
        let track = Track::try_from(json!({ "title": "t", "url": "/x" })).unwrap();
        assert_eq!(track, Track::Payload(Payload::new().title("t").url("/x")));
    }

    #[test]
    fn test_try_from_other_shapes_rejected() {
        for value in [json!(null), json!(42), json!(true), json!(["a"])] {
            let err = Track::try_from(value).unwrap_err();
            assert!(matches!(err, Error::InvalidPayload));
        }
    }
}
