use serde::{Deserialize, Serialize};

pub const THUMBNAIL_SIZE: (u32, u32) = (300, 200);
pub const FULL_SIZE: (u32, u32) = (800, 600);

/// A photo record exactly as the list and info endpoints return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPhoto {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

impl RawPhoto {
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

/// Which description text a derived [`Photo`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStyle {
    /// Short text used for gallery cards.
    Card,
    /// Longer text used on the detail view.
    Detail,
}

/// Base URL for the derived image links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlScheme {
    image_base: String,
}

impl UrlScheme {
    pub fn new(image_base: &str) -> Self {
        Self {
            image_base: image_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn sized(&self, id: &str, (width, height): (u32, u32)) -> String {
        format!("{}/id/{}/{}/{}", self.image_base, id, width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
    pub thumbnail_url: String,
    pub full_url: String,
    pub title: String,
    pub description: String,
}

impl Photo {
    /// Derives the display fields from a raw record.
    ///
    /// `thumbnail_url` and `full_url` point at the 300x200 and 800x600
    /// renditions under the scheme's image base, `title` is
    /// "Photo by {author}" and `description` follows `style`.
    pub fn from_raw(raw: RawPhoto, scheme: &UrlScheme, style: DescriptionStyle) -> Self {
        let thumbnail_url = scheme.sized(&raw.id, THUMBNAIL_SIZE);
        let full_url = scheme.sized(&raw.id, FULL_SIZE);
        let title = format!("Photo by {}", raw.author);
        let description = describe(&raw.author, style);

        Self {
            id: raw.id,
            author: raw.author,
            width: raw.width,
            height: raw.height,
            url: raw.url,
            download_url: raw.download_url,
            thumbnail_url,
            full_url,
            title,
            description,
        }
    }
}

fn describe(author: &str, style: DescriptionStyle) -> String {
    match style {
        DescriptionStyle::Card => format!(
            "A beautiful photograph captured by {}. This image showcases the artistic vision and technical skill of the photographer.",
            author
        ),
        DescriptionStyle::Detail => format!(
            "A stunning photograph captured by {}. This image demonstrates exceptional composition and technical excellence. The photograph showcases the photographer's unique perspective and artistic vision, making it a remarkable piece of visual art.",
            author
        ),
    }
}
