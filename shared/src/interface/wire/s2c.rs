use {
    schemars::JsonSchema,
    serde::{
        Deserialize,
        Serialize,
    },
};

pub const DEFAULT_NOTIFICATION_TITLE: &str = "Notification";
pub const DEFAULT_NOTIFICATION_BODY: &str = "New activity";
pub const DEFAULT_NOTIFICATION_URL: &str = "/tickets";
pub const DEFAULT_NOTIFICATION_TAG: &str = "ticket-notification";

/// Push payload as sent by the server. Every field is optional; missing
/// fields resolve to the defaults above. Unknown fields are ignored rather
/// than rejected, so a newer server can attach data an older client doesn't
/// know about without losing the fields it does.
#[derive(Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Fully-resolved notification. `url` is never rendered, only consumed when
/// the notification is clicked.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct NotificationSpec {
    pub title: String,
    pub body: String,
    pub url: String,
    pub tag: String,
}

/// Turn the raw push event data into something showable. A payload that
/// doesn't parse as json becomes the notification body verbatim; a push with
/// no data at all gets an empty body.
pub fn resolve_notification(raw: Option<&str>) -> NotificationSpec {
    let payload = match raw {
        Some(raw) => match serde_json::from_str::<PushPayload>(raw) {
            Ok(p) => p,
            Err(_) => PushPayload {
                title: None,
                body: Some(raw.to_string()),
                url: None,
                tag: None,
            },
        },
        None => PushPayload {
            title: None,
            body: Some(String::new()),
            url: None,
            tag: None,
        },
    };
    return NotificationSpec {
        title: payload.title.unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
        body: payload.body.unwrap_or_else(|| DEFAULT_NOTIFICATION_BODY.to_string()),
        url: payload.url.unwrap_or_else(|| DEFAULT_NOTIFICATION_URL.to_string()),
        tag: payload.tag.unwrap_or_else(|| DEFAULT_NOTIFICATION_TAG.to_string()),
    };
}

/// Resolve a click target against the worker's own origin. The payload url is
/// only ever treated as a path under that origin, so a payload can't redirect
/// the click somewhere else.
pub fn resolve_click_url(origin: &str, url: Option<&str>) -> String {
    let path = url.unwrap_or(DEFAULT_NOTIFICATION_URL);
    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        return format!("{}{}", origin, path);
    } else {
        return format!("{}/{}", origin, path);
    }
}

/// True if `url` is a page under `origin` (not merely a string-prefix match
/// against a longer hostname).
pub fn same_origin(origin: &str, url: &str) -> bool {
    let origin = origin.trim_end_matches('/');
    let Some(rest) = url.strip_prefix(origin) else {
        return false;
    };
    return match rest.as_bytes().first() {
        None => true,
        Some(b'/') | Some(b'?') | Some(b'#') => true,
        Some(_) => false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_full_payload() {
        let got =
            resolve_notification(
                Some("{\"title\":\"Ticket updated\",\"body\":\"Agent replied\",\"url\":\"/tickets/42\",\"tag\":\"ticket-42\"}"),
            );
        assert_eq!(got, NotificationSpec {
            title: "Ticket updated".to_string(),
            body: "Agent replied".to_string(),
            url: "/tickets/42".to_string(),
            tag: "ticket-42".to_string(),
        });
    }

    #[test]
    fn test_resolve_missing_fields_use_defaults() {
        let got = resolve_notification(Some("{\"title\":\"Hi\"}"));
        assert_eq!(got.title, "Hi");
        assert_eq!(got.body, DEFAULT_NOTIFICATION_BODY);
        assert_eq!(got.url, DEFAULT_NOTIFICATION_URL);
        assert_eq!(got.tag, DEFAULT_NOTIFICATION_TAG);
        let got = resolve_notification(Some("{}"));
        assert_eq!(got.title, DEFAULT_NOTIFICATION_TITLE);
        assert_eq!(got.body, DEFAULT_NOTIFICATION_BODY);
    }

    #[test]
    fn test_resolve_keeps_known_fields_next_to_unknown_ones() {
        let got = resolve_notification(Some("{\"title\":\"Hi\",\"body\":\"B\",\"extra\":1}"));
        assert_eq!(got.title, "Hi");
        assert_eq!(got.body, "B");
        assert_eq!(got.url, DEFAULT_NOTIFICATION_URL);
        assert_eq!(got.tag, DEFAULT_NOTIFICATION_TAG);
    }

    #[test]
    fn test_resolve_non_json_becomes_body() {
        let got = resolve_notification(Some("ticket #7 was closed"));
        assert_eq!(got.title, DEFAULT_NOTIFICATION_TITLE);
        assert_eq!(got.body, "ticket #7 was closed");
        assert_eq!(got.url, DEFAULT_NOTIFICATION_URL);
        assert_eq!(got.tag, DEFAULT_NOTIFICATION_TAG);
    }

    #[test]
    fn test_resolve_unreadable_becomes_empty_body() {
        let got = resolve_notification(None);
        assert_eq!(got.title, DEFAULT_NOTIFICATION_TITLE);
        assert_eq!(got.body, "");
    }

    #[test]
    fn test_click_url_anchors_at_origin() {
        assert_eq!(resolve_click_url("https://tickets.example.com", Some("/tickets/9")), "https://tickets.example.com/tickets/9");
        assert_eq!(resolve_click_url("https://tickets.example.com/", Some("tickets/9")), "https://tickets.example.com/tickets/9");
        assert_eq!(resolve_click_url("https://tickets.example.com", None), "https://tickets.example.com/tickets");
    }

    #[test]
    fn test_same_origin_matching() {
        assert!(same_origin("https://a.example.com", "https://a.example.com/tickets"));
        assert!(same_origin("https://a.example.com", "https://a.example.com"));
        assert!(same_origin("https://a.example.com", "https://a.example.com?x=1"));
        assert!(!same_origin("https://a.example.com", "https://a.example.company.com/tickets"));
        assert!(!same_origin("https://a.example.com", "https://b.example.com/tickets"));
    }
}
