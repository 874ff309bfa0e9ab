//! Image source helpers: extension and MIME resolution, source
//! classification, and raster payload inspection.
//!
//! The embedding layer of the conversion pipeline uses these to decide how to
//! obtain an image (network fetch, data URL decode, local read) and under
//! which format to embed the bytes in the output document.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// A whitelisted image format.
///
/// This is the closed set of formats the conversion pipeline will embed.
/// Extension resolution always lands in this set or fails; it never produces
/// an unrecognized extension string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
}

impl ImageFormat {
    /// Normalized lowercase file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
            ImageFormat::Svg => "svg",
        }
    }

    /// Canonical MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Look up a whitelisted extension. Exact lowercase match only; callers
    /// normalize case first. Note that `"jpeg"` is not a whitelisted
    /// extension, only the normalized `"jpg"` is.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(ImageFormat::Jpg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "webp" => Some(ImageFormat::Webp),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Look up a MIME subtype (`"jpeg"`, `"svg+xml"`, ...), normalizing it to
    /// a whitelisted format. Keys are lowercase, matching what MIME-emitting
    /// sources actually send.
    pub fn from_mime_subtype(subtype: &str) -> Option<Self> {
        match subtype {
            "jpeg" => Some(ImageFormat::Jpg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "webp" => Some(ImageFormat::Webp),
            "svg+xml" => Some(ImageFormat::Svg),
            _ => None,
        }
    }
}

/// Resolve an image's format from its filename and/or MIME type.
///
/// A non-empty MIME type wins over the filename: its subtype (the part after
/// the first `/`, or the whole string when there is no `/`) is looked up in
/// the subtype table. An unrecognized non-empty subtype resolves to
/// [`ImageFormat::Png`] rather than failing; callers that need certainty
/// should [`sniff_format`] the payload instead.
///
/// Without a usable MIME type, the extension is taken from the filename:
/// everything after the first `?` is stripped, and the lowercased text after
/// the last `.` becomes the candidate.
///
/// # Errors
///
/// [`Error::ExtensionUndeterminable`] when neither input yields a candidate,
/// and [`Error::UnsupportedExtension`] when the filename yields an extension
/// outside the whitelist.
///
/// # Examples
///
/// ```
/// use mdocx::{ImageFormat, image_extension};
///
/// assert_eq!(image_extension("photo.JPG", None).unwrap(), ImageFormat::Jpg);
/// assert_eq!(
///     image_extension("a.php?x=1", Some("image/png")).unwrap(),
///     ImageFormat::Png,
/// );
/// assert!(image_extension("noext", None).is_err());
/// ```
pub fn image_extension(filename: &str, mime: Option<&str>) -> Result<ImageFormat> {
    if let Some(mime) = mime.filter(|m| !m.is_empty()) {
        // "image/jpeg" -> "jpeg"; a bare "jpeg" is taken as the subtype.
        let subtype = mime.split_once('/').map_or(mime, |(_, subtype)| subtype);
        if !subtype.is_empty() {
            return Ok(ImageFormat::from_mime_subtype(subtype).unwrap_or(ImageFormat::Png));
        }
    }

    let name = filename.split('?').next().unwrap_or("");
    let candidate = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty());

    match candidate {
        Some(ext) => ImageFormat::from_extension(&ext).ok_or(Error::UnsupportedExtension(ext)),
        None => Err(Error::ExtensionUndeterminable {
            filename: filename.to_string(),
            mime: mime.map(str::to_string),
        }),
    }
}

/// Whether an image source must be fetched over the network.
///
/// True iff the source starts with `http://` or `https://` (case-sensitive).
pub fn is_http(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// An inline `data:` URL split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type, e.g. `image/png`. Empty when the URL omits it.
    pub mime: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

/// Parse an inline `data:` URL into its MIME type and decoded bytes.
///
/// Handles both base64 payloads (`data:image/png;base64,...`) and plain
/// percent-encoded payloads.
///
/// # Errors
///
/// [`Error::InvalidDataUrl`] when the `data:` prefix or the comma separating
/// header from payload is missing; [`Error::Base64`] when a base64 payload
/// does not decode.
pub fn parse_data_url(src: &str) -> Result<DataUrl> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUrl(src.to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl(src.to_string()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or("").to_string();
    let base64_encoded = params.any(|param| param == "base64");

    let data = if base64_encoded {
        BASE64.decode(payload.trim())?
    } else {
        percent_decode_str(payload).collect()
    };

    Ok(DataUrl { mime, data })
}

/// Extract the filename from an image source URL or path.
///
/// Strips any query string or fragment, takes the last path segment, and
/// percent-decodes it. The result is what callers feed to
/// [`image_extension`] for remote sources.
pub fn source_filename(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or("");
    let segment = path.rsplit('/').next().unwrap_or("");
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Detect an image format from magic bytes.
///
/// Covers the raster formats in the whitelist plus a text heuristic for SVG.
/// Returns `None` for anything unrecognized.
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpg),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
        [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
        [b'B', b'M', ..] => Some(ImageFormat::Bmp),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
            Some(ImageFormat::Webp)
        }
        _ if looks_like_svg(data) => Some(ImageFormat::Svg),
        _ => None,
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    // Only the document prologue matters; cap the scan.
    let head = &data[..data.len().min(256)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && trimmed.contains("<svg"))
}

/// Pixel dimensions of an image payload.
///
/// Parses PNG, JPEG, GIF, and BMP headers. Document embedding needs explicit
/// extents; vector (SVG) and WebP payloads report `None` and leave sizing to
/// the caller.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match sniff_format(data)? {
        ImageFormat::Png => png_dimensions(data),
        ImageFormat::Jpg => jpeg_dimensions(data),
        ImageFormat::Gif => gif_dimensions(data),
        ImageFormat::Bmp => bmp_dimensions(data),
        ImageFormat::Webp | ImageFormat::Svg => None,
    }
}

fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // IHDR is the first chunk: width/height at bytes 16..24, big-endian.
    let width = u32::from_be_bytes(data.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(data.get(20..24)?.try_into().ok()?);
    Some((width, height))
}

fn gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // Logical screen descriptor at bytes 6..10, little-endian.
    let width = u16::from_le_bytes(data.get(6..8)?.try_into().ok()?) as u32;
    let height = u16::from_le_bytes(data.get(8..10)?.try_into().ok()?) as u32;
    Some((width, height))
}

fn bmp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // BITMAPINFOHEADER stores signed width/height at bytes 18..26; the height
    // is negative for top-down bitmaps.
    let width = i32::from_le_bytes(data.get(18..22)?.try_into().ok()?);
    let height = i32::from_le_bytes(data.get(22..26)?.try_into().ok()?);
    Some((width.unsigned_abs(), height.unsigned_abs()))
}

fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // Walk the segment chain looking for a start-of-frame marker; the frame
    // dimensions sit at offsets 5..9 within that segment.
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if marker == 0xFF {
            // Fill byte before a marker.
            i += 1;
            continue;
        }
        if matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length;
    }
    None
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(image_extension("photo.JPG", None).unwrap(), ImageFormat::Jpg);
        assert_eq!(image_extension("a.png", None).unwrap(), ImageFormat::Png);
        assert_eq!(
            image_extension("archive.tar.gz.webp", None).unwrap(),
            ImageFormat::Webp,
        );
    }

    #[test]
    fn test_extension_strips_query_string() {
        assert_eq!(
            image_extension("photo.png?width=200", None).unwrap(),
            ImageFormat::Png,
        );
    }

    #[test]
    fn test_mime_takes_precedence_over_filename() {
        assert_eq!(
            image_extension("a.php?x=1", Some("image/png")).unwrap(),
            ImageFormat::Png,
        );
        assert_eq!(
            image_extension("photo.png", Some("image/jpeg")).unwrap(),
            ImageFormat::Jpg,
        );
    }

    #[test]
    fn test_mime_subtype_normalization() {
        assert_eq!(
            image_extension("", Some("image/svg+xml")).unwrap(),
            ImageFormat::Svg,
        );
        // A bare subtype with no "/" is accepted as-is.
        assert_eq!(image_extension("", Some("jpeg")).unwrap(), ImageFormat::Jpg);
    }

    #[test]
    fn test_unrecognized_mime_subtype_defaults_to_png() {
        assert_eq!(
            image_extension("a.gif", Some("image/tiff")).unwrap(),
            ImageFormat::Png,
        );
    }

    #[test]
    fn test_empty_mime_subtype_falls_back_to_filename() {
        assert_eq!(
            image_extension("a.gif", Some("image/")).unwrap(),
            ImageFormat::Gif,
        );
        assert_eq!(image_extension("a.gif", Some("")).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_extension_undeterminable() {
        let err = image_extension("noext", None).unwrap_err();
        assert!(matches!(err, Error::ExtensionUndeterminable { .. }));

        let err = image_extension("", None).unwrap_err();
        assert!(matches!(err, Error::ExtensionUndeterminable { .. }));

        // A trailing dot yields an empty candidate, which counts as none.
        let err = image_extension("name.", None).unwrap_err();
        assert!(matches!(err, Error::ExtensionUndeterminable { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = image_extension("a.tiff", None).unwrap_err();
        match err {
            Error::UnsupportedExtension(ext) => assert_eq!(ext, "tiff"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }

        // "jpeg" is a MIME subtype, not a whitelisted extension.
        assert!(matches!(
            image_extension("a.jpeg", None),
            Err(Error::UnsupportedExtension(_)),
        ));
    }

    #[test]
    fn test_is_http() {
        assert!(is_http("https://x.com/a.png"));
        assert!(is_http("http://x.com/a.png"));
        assert!(!is_http("data:image/png;base64,iVBOR"));
        assert!(!is_http("/local/a.png"));
        assert!(!is_http("HTTP://x.com/a.png"));
        assert!(!is_http("ftp://x.com/a.png"));
    }

    #[test]
    fn test_parse_data_url_base64() {
        // "hi!" base64-encoded.
        let url = parse_data_url("data:image/png;base64,aGkh").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(url.data, b"hi!");
    }

    #[test]
    fn test_parse_data_url_percent_encoded() {
        let url = parse_data_url("data:image/svg+xml,%3Csvg%3E%3C/svg%3E").unwrap();
        assert_eq!(url.mime, "image/svg+xml");
        assert_eq!(url.data, b"<svg></svg>");
    }

    #[test]
    fn test_parse_data_url_rejects_malformed() {
        assert!(matches!(
            parse_data_url("image/png;base64,aGkh"),
            Err(Error::InvalidDataUrl(_)),
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64"),
            Err(Error::InvalidDataUrl(_)),
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64,!!!"),
            Err(Error::Base64(_)),
        ));
    }

    #[test]
    fn test_source_filename() {
        assert_eq!(source_filename("https://x.com/img/a.png?s=1"), "a.png");
        assert_eq!(source_filename("https://x.com/a%20b.png?s=1"), "a b.png");
        assert_eq!(source_filename("/local/dir/photo.jpg#frag"), "photo.jpg");
        assert_eq!(source_filename("plain.gif"), "plain.gif");
        assert_eq!(source_filename("https://x.com/dir/"), "");
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpg));
        assert_eq!(
            sniff_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some(ImageFormat::Png),
        );
        assert_eq!(sniff_format(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(sniff_format(b"BM\x00\x00"), Some(ImageFormat::Bmp));
        assert_eq!(
            sniff_format(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::Webp),
        );
        assert_eq!(
            sniff_format(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Some(ImageFormat::Svg),
        );
        assert_eq!(
            sniff_format(b"<?xml version=\"1.0\"?><svg/>"),
            Some(ImageFormat::Svg),
        );
        assert_eq!(sniff_format(b"plain text"), None);
        assert_eq!(sniff_format(&[]), None);
    }

    #[test]
    fn test_png_dimensions() {
        // Minimal PNG header: signature + IHDR with 2x3 dimensions.
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0, 0, 0, 13]); // IHDR length
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&3u32.to_be_bytes());
        assert_eq!(image_dimensions(&data), Some((2, 3)));
    }

    #[test]
    fn test_gif_dimensions() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&640u16.to_le_bytes());
        data.extend_from_slice(&480u16.to_le_bytes());
        assert_eq!(image_dimensions(&data), Some((640, 480)));
    }

    #[test]
    fn test_bmp_dimensions() {
        let mut data = b"BM".to_vec();
        data.resize(18, 0);
        data.extend_from_slice(&800i32.to_le_bytes());
        // Top-down bitmaps store a negative height.
        data.extend_from_slice(&(-600i32).to_le_bytes());
        assert_eq!(image_dimensions(&data), Some((800, 600)));
    }

    #[test]
    fn test_jpeg_dimensions() {
        // SOI, APP0 segment, then SOF0 with 4x5 dimensions.
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00]); // APP0
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]); // SOF0, precision
        data.extend_from_slice(&5u16.to_be_bytes()); // height
        data.extend_from_slice(&4u16.to_be_bytes()); // width
        data.extend_from_slice(&[0x03, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(image_dimensions(&data), Some((4, 5)));
    }

    #[test]
    fn test_dimensions_unrecognized_payload() {
        assert_eq!(image_dimensions(b"not an image"), None);
        assert_eq!(image_dimensions(&[]), None);
    }

    proptest! {
        #[test]
        fn prop_resolved_extension_is_always_whitelisted(
            filename in ".{0,40}",
            mime in prop::option::of(".{0,20}"),
        ) {
            if let Ok(format) = image_extension(&filename, mime.as_deref()) {
                prop_assert!(
                    ["jpg", "png", "gif", "bmp", "webp", "svg"].contains(&format.extension())
                );
            }
        }

        #[test]
        fn prop_sniff_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = sniff_format(&data);
            let _ = image_dimensions(&data);
        }
    }
}
