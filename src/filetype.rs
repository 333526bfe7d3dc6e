//! File-type classification collaborator.
//!
//! A closed tag ([`FileKind`]) with one lookup table mapping extension and
//! MIME tokens to a canonical tag, plus small pure predicates. Total:
//! unknown tokens classify as [`FileKind::Other`] rather than failing.
use serde::{Deserialize, Serialize};

/// Canonical file-type tag resolved from an extension or MIME token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum FileKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Tiff,
    Svg,
    Pdf,
    Json,
    Xml,
    Html,
    Csv,
    Text,
    Zip,
    Gzip,
    Tar,
    Mp3,
    Mp4,
    /// Unclassified content; reported as `bin` / `application/octet-stream`.
    Other,
}

/// One row per kind: canonical extension and canonical MIME type.
/// `classify` also accepts the aliases listed in `ALIASES`.
const TABLE: &[(FileKind, &str, &str)] = &[
    (FileKind::Png, "png", "image/png"),
    (FileKind::Jpeg, "jpg", "image/jpeg"),
    (FileKind::Gif, "gif", "image/gif"),
    (FileKind::Webp, "webp", "image/webp"),
    (FileKind::Bmp, "bmp", "image/bmp"),
    (FileKind::Tiff, "tif", "image/tiff"),
    (FileKind::Svg, "svg", "image/svg+xml"),
    (FileKind::Pdf, "pdf", "application/pdf"),
    (FileKind::Json, "json", "application/json"),
    (FileKind::Xml, "xml", "application/xml"),
    (FileKind::Html, "html", "text/html"),
    (FileKind::Csv, "csv", "text/csv"),
    (FileKind::Text, "txt", "text/plain"),
    (FileKind::Zip, "zip", "application/zip"),
    (FileKind::Gzip, "gz", "application/gzip"),
    (FileKind::Tar, "tar", "application/x-tar"),
    (FileKind::Mp3, "mp3", "audio/mpeg"),
    (FileKind::Mp4, "mp4", "video/mp4"),
    (FileKind::Other, "bin", "application/octet-stream"),
];

/// Extension and MIME spellings that map onto a canonical kind.
const ALIASES: &[(FileKind, &str)] = &[
    (FileKind::Jpeg, "jpeg"),
    (FileKind::Tiff, "tiff"),
    (FileKind::Html, "htm"),
    (FileKind::Json, "text/json"),
    (FileKind::Xml, "text/xml"),
    (FileKind::Gzip, "gzip"),
];

/// Classifies an extension or MIME token into a [`FileKind`].
///
/// Matching is case-insensitive and total; tokens not in the table return
/// [`FileKind::Other`].
///
/// ```rust
/// use intake::{classify, FileKind};
///
/// assert_eq!(classify("PNG"), FileKind::Png);
/// assert_eq!(classify("image/png"), FileKind::Png);
/// assert_eq!(classify("wat"), FileKind::Other);
/// ```
pub fn classify(token: &str) -> FileKind {
    let token = token.trim().to_ascii_lowercase();
    for (kind, ext, mime) in TABLE {
        if token == *ext || token == *mime {
            return *kind;
        }
    }
    for (kind, alias) in ALIASES {
        if token == *alias {
            return *kind;
        }
    }
    FileKind::Other
}

impl FileKind {
    /// Human-readable name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Png => "PNG image",
            FileKind::Jpeg => "JPEG image",
            FileKind::Gif => "GIF image",
            FileKind::Webp => "WebP image",
            FileKind::Bmp => "BMP image",
            FileKind::Tiff => "TIFF image",
            FileKind::Svg => "SVG image",
            FileKind::Pdf => "PDF document",
            FileKind::Json => "JSON document",
            FileKind::Xml => "XML document",
            FileKind::Html => "HTML document",
            FileKind::Csv => "CSV document",
            FileKind::Text => "plain text",
            FileKind::Zip => "ZIP archive",
            FileKind::Gzip => "gzip archive",
            FileKind::Tar => "tar archive",
            FileKind::Mp3 => "MP3 audio",
            FileKind::Mp4 => "MP4 video",
            FileKind::Other => "unclassified",
        }
    }

    /// Canonical lowercase file extension for this kind.
    pub fn extension(&self) -> &'static str {
        table_row(*self).1
    }

    /// Canonical lowercase MIME type for this kind.
    pub fn media_type(&self) -> &'static str {
        table_row(*self).2
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            FileKind::Png
                | FileKind::Jpeg
                | FileKind::Gif
                | FileKind::Webp
                | FileKind::Bmp
                | FileKind::Tiff
                | FileKind::Svg
        )
    }

    pub fn is_document(&self) -> bool {
        matches!(
            self,
            FileKind::Pdf | FileKind::Json | FileKind::Xml | FileKind::Html | FileKind::Csv
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FileKind::Text
                | FileKind::Json
                | FileKind::Xml
                | FileKind::Html
                | FileKind::Csv
                | FileKind::Svg
        )
    }

    /// True for kinds whose payload is not meaningfully text.
    pub fn is_binary(&self) -> bool {
        !self.is_text()
    }
}

fn table_row(kind: FileKind) -> (FileKind, &'static str, &'static str) {
    for row in TABLE {
        if row.0 == kind {
            return *row;
        }
    }
    // Every variant has a TABLE row; Other is the terminal row.
    (FileKind::Other, "bin", "application/octet-stream")
}
