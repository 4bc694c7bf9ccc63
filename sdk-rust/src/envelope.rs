//! Request bodies for each collection endpoint.
//!
//! Merge order is the contract here: client context first, caller data over
//! it, and the session `organizeId` last so it can never be spoofed.

use crate::{ConnectXError, ConnectXResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TRACKING_PATH: &str = "/webtracking";
pub const IDENTIFY_PATH: &str = "/webtracking/dropform";
pub const OPEN_TICKET_PATH: &str = "/webtracking/dropformOpenTicket";

const ORGANIZE_ID: &str = "organizeId";

pub type JsonObject = Map<String, Value>;

/// Input of [`crate::ConnectX::identify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    pub key: String,
    #[serde(default)]
    pub customers: JsonObject,
    /// Extra tracking fields merged over the client context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<JsonObject>,
    #[serde(default)]
    pub form: Option<JsonObject>,
    #[serde(default)]
    pub options: Option<JsonObject>,
}

/// Input of [`crate::ConnectX::open_ticket`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenTicketPayload {
    pub key: String,
    #[serde(default)]
    pub customers: JsonObject,
    #[serde(default)]
    pub ticket: JsonObject,
    #[serde(default)]
    pub lead: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs: Option<Value>,
}

/// Flat tracking body: context, then caller fields, then `organizeId`.
#[must_use]
pub fn tracking(context: JsonObject, fields: JsonObject, organize_id: &str) -> JsonObject {
    let mut body = merge(context, fields);
    body.insert(ORGANIZE_ID.to_string(), organize_id.into());
    body
}

#[must_use]
pub fn identify(context: JsonObject, payload: IdentifyPayload, organize_id: &str) -> JsonObject {
    let IdentifyPayload {
        key,
        customers,
        tracking: extra,
        form,
        options,
    } = payload;

    let mut body = JsonObject::new();
    body.insert("key".to_string(), key.into());
    body.insert("customers".to_string(), customers.into());
    body.insert(
        "tracking".to_string(),
        tracking(context, extra.unwrap_or_default(), organize_id).into(),
    );
    body.insert("form".to_string(), form.map_or(Value::Null, Value::Object));
    body.insert(
        "options".to_string(),
        options.map_or(Value::Null, Value::Object),
    );
    body
}

/// The ticket and its tracking block each carry the session `organizeId`.
/// Caller tracking fields are not accepted here.
#[must_use]
pub fn open_ticket(
    context: JsonObject,
    payload: OpenTicketPayload,
    organize_id: &str,
) -> JsonObject {
    let OpenTicketPayload {
        key,
        customers,
        mut ticket,
        lead,
        customs,
    } = payload;

    ticket.insert(ORGANIZE_ID.to_string(), organize_id.into());

    let mut body = JsonObject::new();
    body.insert("key".to_string(), key.into());
    body.insert("customers".to_string(), customers.into());
    body.insert("ticket".to_string(), ticket.into());
    body.insert(
        "tracking".to_string(),
        tracking(context, JsonObject::new(), organize_id).into(),
    );
    body.insert("lead".to_string(), lead.into());
    if let Some(customs) = customs {
        body.insert("customs".to_string(), customs);
    }
    body
}

#[must_use]
pub fn records_path(object_name: &str) -> String {
    format!("/object/{object_name}/composite")
}

/// Records are sent as a bare JSON array, one object per record.
pub fn records<T: Serialize>(records: &[T]) -> ConnectXResult<Value> {
    let items = records
        .iter()
        .map(|record| to_object(record, "record"))
        .collect::<ConnectXResult<Vec<_>>>()?;
    Ok(Value::Array(items.into_iter().map(Value::Object).collect()))
}

/// Serialize caller data that must be a JSON object.
pub fn to_object<T: Serialize + ?Sized>(value: &T, what: &str) -> ConnectXResult<JsonObject> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ConnectXError::InvalidPayload(format!(
            "{what} must be a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn merge(mut base: JsonObject, overlay: JsonObject) -> JsonObject {
    base.extend(overlay);
    base
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> JsonObject {
        let Value::Object(map) = json!({
            "os": "Android",
            "cx_fingerprint": "device-abc",
            "cx_language": "en",
        }) else {
            unreachable!()
        };
        map
    }

    fn object(value: Value) -> JsonObject {
        to_object(&value, "test value").unwrap()
    }

    #[test]
    fn tracking_caller_fields_override_context() {
        let body = tracking(
            context(),
            object(json!({ "os": "Override", "event": "page_view" })),
            "org-1",
        );
        assert_eq!(body["os"], "Override");
        assert_eq!(body["event"], "page_view");
        assert_eq!(body["cx_fingerprint"], "device-abc");
        assert_eq!(body["organizeId"], "org-1");
    }

    #[test]
    fn tracking_session_organize_id_wins() {
        let body = tracking(context(), object(json!({ "organizeId": "spoofed" })), "org-1");
        assert_eq!(body["organizeId"], "org-1");
    }

    #[test]
    fn tracking_is_rebuilt_per_call() {
        let fields = object(json!({ "event": "tap" }));
        let first = tracking(context(), fields.clone(), "org-1");
        let second = tracking(context(), fields, "org-1");
        assert_eq!(first, second);
    }

    #[test]
    fn identify_merges_tracking_and_passes_nullables() {
        let payload = IdentifyPayload {
            key: "email".to_string(),
            customers: object(json!({ "email": "a@b.co" })),
            tracking: Some(object(json!({ "cx_fingerprint": "custom", "cx_event": "signup" }))),
            form: None,
            options: Some(object(json!({ "updateCustomer": true }))),
        };
        let body = Value::Object(identify(context(), payload, "org-1"));

        assert_eq!(body["key"], "email");
        assert_eq!(body["customers"], json!({ "email": "a@b.co" }));
        assert_eq!(body["tracking"]["cx_fingerprint"], "custom");
        assert_eq!(body["tracking"]["cx_event"], "signup");
        assert_eq!(body["tracking"]["os"], "Android");
        assert_eq!(body["tracking"]["organizeId"], "org-1");
        assert_eq!(body["form"], Value::Null);
        assert!(body.as_object().unwrap().contains_key("form"));
        assert_eq!(body["options"], json!({ "updateCustomer": true }));
    }

    #[test]
    fn open_ticket_injects_organize_id_into_ticket_and_tracking() {
        let payload = OpenTicketPayload {
            key: "email".to_string(),
            customers: object(json!({ "email": "a@b.co" })),
            ticket: object(json!({ "ticketName": "Help", "organizeId": "wrong" })),
            lead: object(json!({ "source": "app" })),
            customs: None,
        };
        let body = Value::Object(open_ticket(context(), payload, "org-123"));

        assert_eq!(body["ticket"]["organizeId"], "org-123");
        assert_eq!(body["ticket"]["ticketName"], "Help");
        assert_eq!(body["tracking"]["organizeId"], "org-123");
        assert_eq!(body["tracking"]["os"], "Android");
        assert_eq!(body["lead"], json!({ "source": "app" }));
        assert!(!body.as_object().unwrap().contains_key("customs"));
    }

    #[test]
    fn open_ticket_passes_customs_through() {
        let payload = OpenTicketPayload {
            key: "email".to_string(),
            customs: Some(json!([{ "field": "priority", "value": "high" }])),
            ..OpenTicketPayload::default()
        };
        let body = open_ticket(context(), payload, "org-1");
        assert_eq!(
            body["customs"],
            json!([{ "field": "priority", "value": "high" }])
        );
    }

    #[test]
    fn records_serialize_as_bare_array() {
        let body = records(&[json!({ "name": "A" })]).unwrap();
        assert_eq!(body, json!([{ "name": "A" }]));
        assert_eq!(records_path("Lead"), "/object/Lead/composite");
    }

    #[test]
    fn rejects_non_object_input() {
        let err = records(&[json!("not an object")]).unwrap_err();
        assert!(matches!(
            err,
            ConnectXError::InvalidPayload(msg)
                if msg == "record must be a JSON object, got a string"
        ));
        assert!(matches!(
            to_object(&vec![1, 2], "tracking fields"),
            Err(ConnectXError::InvalidPayload(_))
        ));
    }

    #[test]
    fn payloads_deserialize_from_caller_json() {
        let payload: IdentifyPayload = serde_json::from_value(json!({
            "key": "email",
            "customers": { "email": "a@b.co" },
        }))
        .unwrap();
        assert_eq!(payload.tracking, None);
        assert_eq!(payload.form, None);
        assert_eq!(payload.options, None);
    }
}
