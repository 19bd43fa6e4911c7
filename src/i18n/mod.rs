//! Client-facing message translation.
//!
//! Error bodies are rendered in English first. The locale middleware
//! re-renders them in the language picked from `Accept-Language`.

mod messages;
pub use messages::MessageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Picks the supported language with the highest quality from an
    /// `Accept-Language` header value. Ties keep header order.
    pub fn from_accept_language(header: &str) -> Self {
        let mut best: Option<(Self, f32)> = None;

        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let Some(tag) = parts.next() else { continue };

            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            if quality <= 0.0 {
                continue;
            }

            if let Some(locale) = Self::from_tag(tag) {
                if best.is_none_or(|(_, q)| quality > q) {
                    best = Some((locale, quality));
                }
            }
        }

        best.map(|(locale, _)| locale).unwrap_or_default()
    }
}
