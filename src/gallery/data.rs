//! Media list payload
//!
//! These structs mirror the JSON returned by the media-coverage endpoint.
//! Every field is optional because the endpoint omits fields freely; unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};

/// One entry of the media list
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub media_type: Option<i32>,
    #[serde(rename = "coverageURL")]
    pub coverage_url: Option<String>,
    pub published_at: Option<String>,
    pub published_by: Option<String>,
}

/// Where a media item's thumbnail lives
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub id: Option<String>,
    pub version: Option<i32>,
    /// Scheme and host, e.g. "https://cdn.example.com"
    pub domain: Option<String>,
    pub base_path: Option<String>,
    pub key: Option<String>,
    #[serde(default)]
    pub qualities: Vec<i32>,
    pub aspect_ratio: Option<f32>,
}

impl Thumbnail {
    /// Image locator `{domain}/{basePath}/0/{key}`
    ///
    /// Returns `None` when any of the three parts is missing.
    pub fn locator(&self) -> Option<String> {
        let domain = self.domain.as_deref()?;
        let base_path = self.base_path.as_deref()?;
        let key = self.key.as_deref()?;
        Some(format!("{domain}/{base_path}/0/{key}"))
    }
}

impl MediaItem {
    /// Image locator of this item's thumbnail, if it has a complete one
    pub fn image_locator(&self) -> Option<String> {
        self.thumbnail.as_ref().and_then(Thumbnail::locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_fields() {
        let json = r#"{
            "id": "m1",
            "title": "Coverage",
            "mediaType": 2,
            "coverageURL": "https://news.example.com/story",
            "publishedAt": "2023-05-01",
            "extraField": true,
            "thumbnail": {
                "id": "t1",
                "version": 1,
                "domain": "https://cdn.example.com",
                "basePath": "media/covers",
                "key": "abc.jpg",
                "qualities": [10, 20, 30],
                "aspectRatio": 1.5
            }
        }"#;

        let item: MediaItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.media_type, Some(2));
        assert_eq!(item.coverage_url.as_deref(), Some("https://news.example.com/story"));

        let thumb = item.thumbnail.as_ref().unwrap();
        assert_eq!(thumb.qualities, vec![10, 20, 30]);
        assert_eq!(thumb.aspect_ratio, Some(1.5));
        assert_eq!(
            item.image_locator().as_deref(),
            Some("https://cdn.example.com/media/covers/0/abc.jpg")
        );
    }

    #[test]
    fn test_missing_qualities_default_to_empty() {
        let thumb: Thumbnail = serde_json::from_str(r#"{"domain": "d"}"#).unwrap();
        assert!(thumb.qualities.is_empty());
    }

    #[test]
    fn test_incomplete_thumbnail_has_no_locator() {
        let thumb = Thumbnail {
            domain: Some("https://cdn.example.com".to_string()),
            base_path: Some("media".to_string()),
            key: None,
            ..Default::default()
        };
        assert_eq!(thumb.locator(), None);

        let item = MediaItem::default();
        assert_eq!(item.image_locator(), None);
    }
}
