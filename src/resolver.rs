// ABOUTME: Derives a service's effective scheme, host and URL from its overrides and the global settings
// ABOUTME: Pure functions; degenerate input yields a degenerate string, never an error

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{default_service_name, Service, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn from_https(https: bool) -> Self {
        if https {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A present per-service override wins; otherwise the global default applies
pub fn effective_scheme(service: &Service, settings: &Settings) -> Scheme {
    Scheme::from_https(service.custom_use_https.unwrap_or(settings.use_https))
}

/// The service's own host when set, else the default host verbatim (possibly empty)
pub fn effective_host<'a>(service: &'a Service, settings: &'a Settings) -> &'a str {
    match service.custom_host.as_deref() {
        Some(host) if !host.is_empty() => host,
        _ => settings.host.as_str(),
    }
}

/// `<scheme>://<host>:<port>`, unencoded and unvalidated
pub fn build_url(service: &Service, settings: &Settings) -> String {
    format!(
        "{}://{}:{}",
        effective_scheme(service, settings),
        effective_host(service, settings),
        service.port
    )
}

/// The URL to hand to the system opener, or `None` when it has no host
pub fn launch_url(service: &Service, settings: &Settings) -> Option<String> {
    if effective_host(service, settings).trim().is_empty() {
        None
    } else {
        Some(build_url(service, settings))
    }
}

/// Form values for a service that is still being edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub host: String,
    #[serde(rename = "useHTTPS", default)]
    pub use_https: bool,
}

impl ServiceDraft {
    /// Port text as a number; anything unparsable (including padded text) counts as 0
    pub fn port_value(&self) -> i64 {
        self.port.parse().unwrap_or(0)
    }

    /// True when the draft would pass validation and has a host to point at
    pub fn is_submittable(&self, settings: &Settings) -> bool {
        let port = self.port_value();
        let has_host = !self.host.trim().is_empty() || !settings.host.trim().is_empty();
        port > 0 && port < 65536 && has_host
    }
}

/// Label shown under the form: fallback name, then the base URL,
/// with the port only when it is positive.
pub fn preview_label(draft: &ServiceDraft, settings: &Settings) -> String {
    let port = draft.port_value();
    let name = match draft.name.as_str() {
        "" => default_service_name(port),
        typed => typed.to_string(),
    };
    let host = match draft.host.as_str() {
        "" => settings.host.as_str(),
        typed => typed,
    };
    let base = format!("{}://{}", Scheme::from_https(draft.use_https), host);

    if port > 0 {
        format!("{} — {}:{}", name, base, port)
    } else {
        format!("{} — {}", name, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn service(port: u16, host: Option<&str>, https: Option<bool>) -> Service {
        Service {
            id: "svc".to_string(),
            name: "svc".to_string(),
            port,
            custom_host: host.map(str::to_string),
            custom_use_https: https,
            symbol_name: None,
            category: None,
            created_at: Utc::now(),
        }
    }

    fn settings(host: &str, use_https: bool) -> Settings {
        Settings {
            host: host.to_string(),
            use_https,
        }
    }

    #[test]
    fn test_default_host_and_scheme() {
        let url = build_url(&service(8080, None, None), &settings("10.0.0.5", false));
        assert_eq!(url, "http://10.0.0.5:8080");
    }

    #[test]
    fn test_https_override() {
        let url = build_url(&service(8443, None, Some(true)), &settings("10.0.0.5", false));
        assert_eq!(url, "https://10.0.0.5:8443");
    }

    #[test]
    fn test_custom_host() {
        let url = build_url(&service(5000, Some("nas.local"), None), &settings("10.0.0.5", false));
        assert_eq!(url, "http://nas.local:5000");
    }

    #[test]
    fn test_http_override_beats_https_default() {
        let url = build_url(&service(80, None, Some(false)), &settings("10.0.0.5", true));
        assert_eq!(url, "http://10.0.0.5:80");
    }

    #[test]
    fn test_empty_host_is_degenerate_not_an_error() {
        let svc = service(8080, None, None);
        let cfg = settings("", false);
        assert_eq!(build_url(&svc, &cfg), "http://:8080");
        assert_eq!(launch_url(&svc, &cfg), None);

        let svc = service(8080, Some(""), None);
        assert_eq!(effective_host(&svc, &settings("router", false)), "router");
    }

    #[test]
    fn test_preview_label() {
        let cfg = settings("10.0.0.5", false);

        let draft = ServiceDraft {
            port: "8080".to_string(),
            ..Default::default()
        };
        assert_eq!(preview_label(&draft, &cfg), "Service :8080 — http://10.0.0.5:8080");

        let draft = ServiceDraft {
            name: "Pi-hole".to_string(),
            port: "abc".to_string(),
            host: "pi.hole".to_string(),
            use_https: true,
        };
        assert_eq!(preview_label(&draft, &cfg), "Pi-hole — https://pi.hole");

        let draft = ServiceDraft::default();
        assert_eq!(preview_label(&draft, &cfg), "Service :0 — http://10.0.0.5");
    }

    #[test]
    fn test_preview_uses_text_as_typed() {
        let cfg = settings("10.0.0.5", false);

        let draft = ServiceDraft {
            port: " 80".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.port_value(), 0);
        assert_eq!(preview_label(&draft, &cfg), "Service :0 — http://10.0.0.5");

        let draft = ServiceDraft {
            name: " ".to_string(),
            port: "80".to_string(),
            host: "nas ".to_string(),
            use_https: false,
        };
        assert_eq!(preview_label(&draft, &cfg), "  — http://nas :80");
    }

    #[test]
    fn test_draft_submittable() {
        let mut draft = ServiceDraft {
            port: "8080".to_string(),
            ..Default::default()
        };
        assert!(draft.is_submittable(&settings("10.0.0.5", false)));
        assert!(!draft.is_submittable(&settings("  ", false)));

        draft.host = "nas.local".to_string();
        assert!(draft.is_submittable(&settings("", false)));

        draft.port = "70000".to_string();
        assert!(!draft.is_submittable(&settings("10.0.0.5", false)));
        draft.port = "".to_string();
        assert!(!draft.is_submittable(&settings("10.0.0.5", false)));
    }

    proptest! {
        #[test]
        fn prop_override_wins(
            port in 1u16..,
            over in any::<bool>(),
            global in any::<bool>(),
            host in ".*",
        ) {
            let svc = service(port, None, Some(over));
            let scheme = effective_scheme(&svc, &settings(&host, global));
            prop_assert_eq!(scheme, Scheme::from_https(over));
        }

        #[test]
        fn prop_absent_override_uses_global(port in 1u16.., global in any::<bool>()) {
            let svc = service(port, None, None);
            let expected = if global { "https" } else { "http" };
            prop_assert_eq!(effective_scheme(&svc, &settings("h", global)).as_str(), expected);
        }

        #[test]
        fn prop_host_resolution(
            port in 1u16..,
            custom in proptest::option::of("[a-z0-9.]{0,12}"),
            global in "[a-z0-9.]{0,12}",
        ) {
            let svc = service(port, custom.as_deref(), None);
            let cfg = settings(&global, false);
            let expected = match custom.as_deref() {
                Some(h) if !h.is_empty() => h,
                _ => global.as_str(),
            };
            prop_assert_eq!(effective_host(&svc, &cfg), expected);
        }

        #[test]
        fn prop_build_url_is_deterministic(
            port in 1u16..,
            custom in proptest::option::of(".*"),
            https in proptest::option::of(any::<bool>()),
            global in ".*",
        ) {
            let svc = service(port, custom.as_deref(), https);
            let cfg = settings(&global, false);
            let url = build_url(&svc, &cfg);
            prop_assert_eq!(&url, &build_url(&svc, &cfg));
            let port_suffix = format!(":{}", port);
            prop_assert!(url.ends_with(&port_suffix));
        }
    }
}
