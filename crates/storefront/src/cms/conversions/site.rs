//! Global settings, logo and footer conversions.

use serde_json::Value;

use super::media::{best_media_url, media_asset};
use super::{entries, field, record, text};
use crate::cms::types::{
    BUSINESS_NAME, Footer, FooterIcons, Logo, SiteGlobals, SiteSettings, SocialLink,
};

const DEFAULT_LOGO_WIDTH: u32 = 160;
const DEFAULT_LOGO_HEIGHT: u32 = 48;

/// Contact details from the `global` singleton, flat fields first.
#[must_use]
pub fn extract_globals(response: &Value) -> SiteGlobals {
    let data = field(response, "data");
    let attrs = field(data, "attributes");
    let pick = |key: &str| {
        let flat = text(data, key);
        if flat.is_empty() { text(attrs, key) } else { flat }
    };

    let name = pick("name");
    SiteGlobals {
        name: if name.is_empty() {
            BUSINESS_NAME.to_string()
        } else {
            name
        },
        email: pick("email"),
        phone: pick("phone"),
    }
}

/// The site logo, or `None` when no media is attached.
#[must_use]
pub fn extract_logo(response: &Value, base_url: &str) -> Option<Logo> {
    let data = field(response, "data");
    let logo = field(data, "logo");
    let logo = if logo.is_null() {
        field(field(data, "attributes"), "logo")
    } else {
        logo
    };

    let url = best_media_url(logo, base_url)?;
    let meta = media_asset(logo);
    let dimension = |key: &str, default: u32| {
        meta.and_then(|m| m.get(key))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(default)
    };

    let alt = meta.map(|m| text(m, "alternativeText")).unwrap_or_default();
    Some(Logo {
        url,
        alt: if alt.is_empty() {
            BUSINESS_NAME.to_string()
        } else {
            alt
        },
        width: dimension("width", DEFAULT_LOGO_WIDTH),
        height: dimension("height", DEFAULT_LOGO_HEIGHT),
    })
}

/// Globals and logo from one `global` response.
#[must_use]
pub fn extract_site_settings(response: &Value, base_url: &str) -> SiteSettings {
    SiteSettings {
        globals: extract_globals(response),
        logo: extract_logo(response, base_url),
    }
}

/// Footer icons and social links.
///
/// Social links missing either a label or a URL are dropped.
#[must_use]
pub fn extract_footer(response: &Value, base_url: &str) -> Footer {
    let d = record(field(response, "data"));

    let socials = entries(field(d, "socialLinks"))
        .iter()
        .map(record)
        .map(|s| SocialLink {
            label: text(s, "label"),
            url: text(s, "url"),
            icon: best_media_url(field(s, "icon"), base_url),
        })
        .filter(|s| !s.url.is_empty() && !s.label.is_empty())
        .collect();

    Footer {
        icons: FooterIcons {
            name: best_media_url(field(d, "nameIcon"), base_url),
            email: best_media_url(field(d, "emailIcon"), base_url),
            phone: best_media_url(field(d, "phoneIcon"), base_url),
        },
        socials,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const BASE: &str = "https://cms.example.com";

    #[test]
    fn test_logo_without_media_is_none() {
        assert!(extract_logo(&json!({"data": {"name": "UTH"}}), BASE).is_none());
        assert!(extract_logo(&json!({"data": {"logo": null}}), BASE).is_none());
        assert!(extract_logo(&json!({"data": {"attributes": {"logo": {"data": null}}}}), BASE).is_none());
        assert!(extract_logo(&Value::Null, BASE).is_none());
    }

    #[test]
    fn test_flat_logo() {
        let response = json!({"data": {"logo": {
            "url": "/uploads/logo.png",
            "alternativeText": "UTH logo",
            "width": 320,
            "height": 96
        }}});
        let logo = extract_logo(&response, BASE).unwrap();
        assert_eq!(logo.url, "https://cms.example.com/uploads/logo.png");
        assert_eq!(logo.alt, "UTH logo");
        assert_eq!((logo.width, logo.height), (320, 96));
    }

    #[test]
    fn test_wrapped_logo_defaults() {
        let response = json!({"data": {"attributes": {"logo": {"data": {"attributes": {
            "url": "https://cdn.example.com/logo.png"
        }}}}}});
        let logo = extract_logo(&response, BASE).unwrap();
        assert_eq!(logo.url, "https://cdn.example.com/logo.png");
        assert_eq!(logo.alt, BUSINESS_NAME);
        assert_eq!((logo.width, logo.height), (160, 48));
    }

    #[test]
    fn test_globals_prefer_flat_fields() {
        let globals = extract_globals(&json!({"data": {
            "email": "hi@example.com",
            "attributes": {"email": "old@example.com", "phone": "021 000"}
        }}));
        assert_eq!(globals.name, BUSINESS_NAME);
        assert_eq!(globals.email, "hi@example.com");
        assert_eq!(globals.phone, "021 000");

        assert_eq!(extract_globals(&Value::Null), SiteGlobals::default());
    }

    #[test]
    fn test_footer_drops_incomplete_socials() {
        let response = json!({"data": {
            "nameIcon": {"url": "/uploads/name.svg"},
            "socialLinks": [
                {"label": "Instagram", "url": "https://instagram.com/uth", "icon": {"url": "/uploads/ig.svg"}},
                {"label": "Facebook", "url": ""},
                {"url": "https://example.com"}
            ]
        }});
        let footer = extract_footer(&response, BASE);
        assert_eq!(
            footer.icons.name.as_deref(),
            Some("https://cms.example.com/uploads/name.svg")
        );
        assert!(footer.icons.email.is_none());
        assert_eq!(footer.socials.len(), 1);
        assert_eq!(footer.socials[0].label, "Instagram");
        assert_eq!(
            footer.socials[0].icon.as_deref(),
            Some("https://cms.example.com/uploads/ig.svg")
        );
    }

    #[test]
    fn test_empty_footer() {
        assert_eq!(extract_footer(&Value::Null, BASE), Footer::default());
    }
}
