//! Capsule image loading: fetch, decode, resize to 184x69, gray fallback.

use image::imageops::FilterType;
use std::time::Duration;

const CAPSULE_URL: &str = "https://cdn.akamai.steamstatic.com/steam/apps";
const FETCH_TIMEOUT_SECS: u64 = 5;
const PLACEHOLDER_GRAY: [u8; 4] = [128, 128, 128, 255];

pub const THUMB_WIDTH: u32 = 184;
pub const THUMB_HEIGHT: u32 = 69;

/// A decoded RGBA cover image. Produced on a worker thread and turned into
/// an egui texture on the UI thread.
#[derive(Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
}

/// Fetch the header capsule for a game. Any failure (timeout, non-2xx,
/// decode error) falls back to the placeholder; a missing cover must never
/// abort a backlog check.
pub fn load_thumbnail(client: &reqwest::blocking::Client, appid: u64) -> Thumbnail {
    match fetch_capsule_bytes(client, appid) {
        Ok(bytes) => decode_or_placeholder(appid, &bytes),
        Err(e) => {
            eprintln!("[!] Image load failed for {}: {}", appid, e);
            placeholder()
        }
    }
}

fn fetch_capsule_bytes(
    client: &reqwest::blocking::Client,
    appid: u64,
) -> Result<Vec<u8>, reqwest::Error> {
    let url = format!("{}/{}/header.jpg", CAPSULE_URL, appid);
    let response = client.get(&url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Decode downloaded bytes, substituting the placeholder on corrupt payloads.
pub fn decode_or_placeholder(appid: u64, bytes: &[u8]) -> Thumbnail {
    match decode_and_resize(bytes) {
        Ok(thumb) => thumb,
        Err(e) => {
            eprintln!("[!] Image decode failed for {}: {}", appid, e);
            placeholder()
        }
    }
}

/// Decode image bytes and resize to exactly 184x69 with Lanczos3.
pub fn decode_and_resize(bytes: &[u8]) -> Result<Thumbnail, image::ImageError> {
    let resized = image::load_from_memory(bytes)?
        .resize_exact(THUMB_WIDTH, THUMB_HEIGHT, FilterType::Lanczos3)
        .to_rgba8();
    Ok(Thumbnail {
        width: THUMB_WIDTH,
        height: THUMB_HEIGHT,
        rgba: resized.into_raw(),
    })
}

/// Solid-gray stand-in with the same dimensions as a real capsule.
pub fn placeholder() -> Thumbnail {
    let rgba = PLACEHOLDER_GRAY.repeat((THUMB_WIDTH * THUMB_HEIGHT) as usize);
    Thumbnail {
        width: THUMB_WIDTH,
        height: THUMB_HEIGHT,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions() {
        let thumb = placeholder();
        assert_eq!(thumb.width, 184);
        assert_eq!(thumb.height, 69);
        assert_eq!(thumb.rgba.len(), 184 * 69 * 4);
        assert!(thumb.rgba.chunks(4).all(|px| px == PLACEHOLDER_GRAY));
    }

    #[test]
    fn test_corrupt_payload_yields_placeholder() {
        let thumb = decode_or_placeholder(440, b"definitely not an image");
        assert_eq!(thumb.width, 184);
        assert_eq!(thumb.height, 69);
        assert_eq!(thumb.rgba, placeholder().rgba);
    }

    #[test]
    fn test_decode_resizes_to_capsule_size() {
        // Encode a small solid-red PNG in memory, then run it through the
        // normal decode path
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let thumb = decode_and_resize(&png).unwrap();
        assert_eq!(thumb.width, 184);
        assert_eq!(thumb.height, 69);
        assert_eq!(thumb.rgba.len(), 184 * 69 * 4);
        // Still recognisably red after resampling
        assert!(thumb.rgba[0] > 200 && thumb.rgba[1] < 50 && thumb.rgba[2] < 50);
    }

    #[test]
    #[ignore] // Requires network access
    fn test_load_thumbnail_real_capsule() {
        // Team Fortress 2 has a stable capsule image
        let client = client().unwrap();
        let thumb = load_thumbnail(&client, 440);
        assert_eq!(thumb.width, 184);
        assert_eq!(thumb.height, 69);
    }
}
