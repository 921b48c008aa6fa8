//! Contact picture upload rules.
//!
//! Pictures are accepted when their bytes decode as PNG, JPEG, GIF or WebP;
//! the client-supplied filename and content type are not trusted. Stored
//! files live under `pictures/{YYYY}/{MM}/` relative to the media root and get
//! a fresh UUID name so uploads never collide.

use image::ImageFormat;
use uuid::Uuid;

use crate::types::Timestamp;

/// Upload directory prefix, relative to the media root.
pub const PICTURE_DIR: &str = "pictures";

pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Decode an uploaded picture and return the file extension to store it under.
///
/// The format comes from the magic bytes; the whole body must then decode in
/// that format, so a valid header followed by garbage is rejected.
pub fn verify_picture(bytes: &[u8]) -> Result<&'static str, String> {
    let invalid = |_| INVALID_IMAGE_MESSAGE.to_string();
    let format = image::guess_format(bytes).map_err(invalid)?;
    let extension = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        _ => return Err(INVALID_IMAGE_MESSAGE.to_string()),
    };
    image::load_from_memory_with_format(bytes, format).map_err(invalid)?;
    Ok(extension)
}

/// Relative storage path for a new upload: `pictures/2024/03/<uuid>.png`.
pub fn upload_path(now: Timestamp, extension: &str) -> String {
    format!(
        "{PICTURE_DIR}/{}/{}.{extension}",
        now.format("%Y/%m"),
        Uuid::new_v4()
    )
}

/// Public URL of a stored picture.
pub fn picture_url(media_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use image::{DynamicImage, RgbImage};

    use super::*;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn accepts_decodable_pictures() {
        assert_eq!(verify_picture(&encode(ImageFormat::Png)), Ok("png"));
        assert_eq!(verify_picture(&encode(ImageFormat::Jpeg)), Ok("jpg"));
        assert_eq!(verify_picture(&encode(ImageFormat::Gif)), Ok("gif"));
    }

    #[test]
    fn rejects_valid_header_with_corrupt_body() {
        let mut bytes = encode(ImageFormat::Png);
        bytes.truncate(16);
        bytes.extend_from_slice(b"not really pixel data");
        assert_eq!(
            verify_picture(&bytes),
            Err(INVALID_IMAGE_MESSAGE.to_string())
        );

        assert_matches!(verify_picture(b"GIF89a\x01\0\x01\0"), Err(_));
    }

    #[test]
    fn rejects_non_images() {
        assert_matches!(verify_picture(b"hello, world"), Err(_));
        assert_matches!(verify_picture(b""), Err(_));
    }

    #[test]
    fn rejects_unsupported_image_formats() {
        // BMP header.
        assert_matches!(verify_picture(b"BM\x3a\0\0\0\0\0\0\0"), Err(_));
    }

    #[test]
    fn upload_path_is_keyed_by_year_and_month() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let path = upload_path(now, "png");
        assert!(path.starts_with("pictures/2024/03/"), "got {path}");
        assert!(path.ends_with(".png"));
        assert_ne!(path, upload_path(now, "png"), "names must be unique");
    }

    #[test]
    fn picture_url_joins_with_single_slash() {
        assert_eq!(
            picture_url("/media/", "pictures/2024/03/a.png"),
            "/media/pictures/2024/03/a.png"
        );
        assert_eq!(picture_url("/media", "/x.png"), "/media/x.png");
    }
}
