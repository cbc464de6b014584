/// Attachment media kind, derived from the file extension the uploader
/// supplied. Kinds the client renders natively get explicit variants;
/// everything else is `Other` and leans on mime sniffing by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Jpeg,
    Png,
    Webp,
    Heic,
    Heif,
    Pdf,
    Text,
    Json,
    Other,
}

impl AttachmentKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "heic" => Self::Heic,
            "heif" => Self::Heif,
            "pdf" => Self::Pdf,
            "txt" => Self::Text,
            "json" => Self::Json,
            _ => Self::Other,
        }
    }

    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Png | Self::Webp | Self::Heic | Self::Heif
        )
    }

    /// Mime type for outbound payloads. `Other` falls back to a guess from
    /// the extension, octet-stream when even that fails.
    pub fn mime_type(self, extension: &str) -> String {
        match self {
            Self::Jpeg => "image/jpeg".to_string(),
            Self::Png => "image/png".to_string(),
            Self::Webp => "image/webp".to_string(),
            Self::Heic => "image/heic".to_string(),
            Self::Heif => "image/heif".to_string(),
            Self::Pdf => "application/pdf".to_string(),
            Self::Text => "text/plain".to_string(),
            Self::Json => "application/json".to_string(),
            Self::Other => mime_guess::from_ext(extension)
                .first()
                .map_or_else(
                    || "application/octet-stream".to_string(),
                    |mime| mime.essence_str().to_string(),
                ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_extensions_map_case_insensitively() {
        assert_eq!(AttachmentKind::from_extension("JPG"), AttachmentKind::Jpeg);
        assert_eq!(AttachmentKind::from_extension("jpeg"), AttachmentKind::Jpeg);
        assert_eq!(AttachmentKind::from_extension("png"), AttachmentKind::Png);
        assert_eq!(AttachmentKind::from_extension("txt"), AttachmentKind::Text);
        assert_eq!(AttachmentKind::from_extension("zip"), AttachmentKind::Other);
    }

    #[test]
    fn image_kinds_are_images() {
        assert!(AttachmentKind::Heic.is_image());
        assert!(AttachmentKind::Webp.is_image());
        assert!(!AttachmentKind::Pdf.is_image());
        assert!(!AttachmentKind::Other.is_image());
    }

    #[test]
    fn other_kind_guesses_mime_from_extension() {
        assert_eq!(AttachmentKind::Other.mime_type("gif"), "image/gif");
        assert_eq!(
            AttachmentKind::Other.mime_type("definitely-not-real"),
            "application/octet-stream"
        );
        assert_eq!(AttachmentKind::Jpeg.mime_type("jpg"), "image/jpeg");
    }
}
