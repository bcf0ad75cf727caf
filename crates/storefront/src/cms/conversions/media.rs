//! Media URL resolution.

use serde_json::Value;

use super::{entries, field, record, text, unwrap_data};

/// Make a media URL absolute against the CMS origin.
///
/// URLs already starting with `http` pass through; anything else is
/// appended to `base_url` (which has no trailing slash).
#[must_use]
pub fn resolve_media_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{}{url}", base_url.trim_end_matches('/'))
    }
}

/// Best URL for a single media field.
///
/// Accepts `{url, formats}`, `{attributes: {...}}`, `{data: {attributes: {...}}}`
/// and one-entry collections of any of those. The widest entry in `formats`
/// wins (ties keep the first one seen); without formats the original upload
/// URL is used.
#[must_use]
pub fn best_media_url(media: &Value, base_url: &str) -> Option<String> {
    let asset = media_asset(media)?;

    let mut best: Option<(&Value, f64)> = None;
    if let Some(formats) = field(asset, "formats").as_object() {
        for rendition in formats.values() {
            let width = field(rendition, "width").as_f64().unwrap_or(0.0);
            if best.is_none_or(|(_, best_width)| width > best_width) {
                best = Some((rendition, width));
            }
        }
    }

    let url = best
        .map(|(rendition, _)| text(rendition, "url"))
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| text(asset, "url"));

    if url.is_empty() {
        None
    } else {
        Some(resolve_media_url(&url, base_url))
    }
}

/// The upload record behind a media field, peeling relation wrappers.
pub(crate) fn media_asset(media: &Value) -> Option<&Value> {
    let asset = match unwrap_data(media) {
        Value::Array(items) => record(unwrap_data(items.first()?)),
        other => record(other),
    };
    asset.is_object().then_some(asset)
}

/// Best URL of the first entry in a multi-media field.
///
/// Falls back to treating the field as a single media object.
#[must_use]
pub fn first_image_url(images: &Value, base_url: &str) -> Option<String> {
    entries(images)
        .first()
        .map_or_else(|| best_media_url(images, base_url), |first| best_media_url(first, base_url))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const BASE: &str = "https://cms.example.com";

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(
            resolve_media_url("/uploads/a.png", BASE),
            "https://cms.example.com/uploads/a.png"
        );
        assert_eq!(
            resolve_media_url("https://cdn.example.com/a.png", BASE),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            resolve_media_url("/uploads/a.png", "http://localhost:1337/"),
            "http://localhost:1337/uploads/a.png"
        );
    }

    #[test]
    fn test_picks_widest_format() {
        let media = json!({
            "url": "/uploads/original.png",
            "formats": {
                "thumbnail": {"url": "/uploads/thumb.png", "width": 156},
                "large": {"url": "/uploads/large.png", "width": 1000},
                "medium": {"url": "/uploads/medium.png", "width": 750}
            }
        });
        assert_eq!(
            best_media_url(&media, BASE).unwrap(),
            "https://cms.example.com/uploads/large.png"
        );
    }

    #[test]
    fn test_width_tie_keeps_first_seen() {
        let media = json!({
            "formats": {
                "small": {"url": "/uploads/first.png", "width": 500},
                "alt": {"url": "/uploads/second.png", "width": 500}
            }
        });
        assert_eq!(
            best_media_url(&media, BASE).unwrap(),
            "https://cms.example.com/uploads/first.png"
        );
    }

    #[test]
    fn test_falls_back_to_original_url() {
        let media = json!({"url": "/uploads/original.png", "formats": {}});
        assert_eq!(
            best_media_url(&media, BASE).unwrap(),
            "https://cms.example.com/uploads/original.png"
        );
    }

    #[test]
    fn test_wrapped_shapes() {
        let v4 = json!({"data": {"id": 3, "attributes": {"url": "/uploads/v4.png"}}});
        assert_eq!(
            best_media_url(&v4, BASE).unwrap(),
            "https://cms.example.com/uploads/v4.png"
        );

        let list = json!({"data": [{"attributes": {"url": "/uploads/one.png"}}]});
        assert_eq!(
            best_media_url(&list, BASE).unwrap(),
            "https://cms.example.com/uploads/one.png"
        );
    }

    #[test]
    fn test_missing_media_is_none() {
        assert!(best_media_url(&Value::Null, BASE).is_none());
        assert!(best_media_url(&json!({"data": null}), BASE).is_none());
        assert!(best_media_url(&json!({"data": []}), BASE).is_none());
        assert!(best_media_url(&json!([]), BASE).is_none());
        assert!(best_media_url(&json!({"alternativeText": "logo"}), BASE).is_none());
    }

    #[test]
    fn test_first_image_url() {
        let images = json!([
            {"url": "/uploads/a.png"},
            {"url": "/uploads/b.png"}
        ]);
        assert_eq!(
            first_image_url(&images, BASE).unwrap(),
            "https://cms.example.com/uploads/a.png"
        );

        let single = json!({"url": "/uploads/only.png"});
        assert_eq!(
            first_image_url(&single, BASE).unwrap(),
            "https://cms.example.com/uploads/only.png"
        );

        assert!(first_image_url(&json!({"data": []}), BASE).is_none());
    }
}
