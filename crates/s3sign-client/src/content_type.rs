//! Content-Type lookup by file extension.

use mime::Mime;

/// Extensions without a `mime` constant.
const EXTRA_TYPES: &[(&str, &str)] = &[
    ("avi", "video/x-msvideo"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("gz", "application/gzip"),
    ("ico", "image/x-icon"),
    ("m4a", "audio/mp4"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("ogg", "audio/ogg"),
    ("rtf", "text/rtf"),
    ("tar", "application/x-tar"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("wav", "audio/wav"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("zip", "application/zip"),
];

/// Guess the `Content-Type` of an object from the extension of its path.
///
/// Unknown or missing extensions map to `application/octet-stream`.
///
/// ```
/// use s3sign_client::content_type::content_type_for;
///
/// assert_eq!(content_type_for("photos/puppy.JPG").as_ref(), "image/jpeg");
/// assert_eq!(content_type_for("notes.md").as_ref(), "application/octet-stream");
/// assert_eq!(content_type_for("").as_ref(), "application/octet-stream");
/// ```
#[must_use]
pub fn content_type_for(path: &str) -> Mime {
    let Some(ext) = extension(path) else {
        return mime::APPLICATION_OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "txt" | "text" => mime::TEXT_PLAIN,
        "html" | "htm" => mime::TEXT_HTML,
        "css" => mime::TEXT_CSS,
        "csv" => mime::TEXT_CSV,
        "js" | "mjs" => mime::TEXT_JAVASCRIPT,
        "xml" => mime::TEXT_XML,
        "vcf" => mime::TEXT_VCARD,
        "tsv" => mime::TEXT_TAB_SEPARATED_VALUES,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        "json" => mime::APPLICATION_JSON,
        "pdf" => mime::APPLICATION_PDF,
        "msgpack" => mime::APPLICATION_MSGPACK,
        other => EXTRA_TYPES
            .iter()
            .find(|(e, _)| *e == other)
            .and_then(|(_, t)| t.parse().ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
    }
}

/// The extension of the last path segment, if it has a non-empty one.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
