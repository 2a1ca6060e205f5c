use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use tracing::warn;

/// Largest edge of the rendered code, in pixels.
const MAX_QR_PIXELS: u32 = 200;

/// Encode the receipt payload URL as a PNG raster.
///
/// The code always points at the configured destination URL, independent
/// of which order triggered rendering. A failed encode degrades to `None`
/// so the renderer can still produce the rest of the document.
pub fn encode(payload_url: &str) -> Option<Vec<u8>> {
    let code = match QrCode::new(payload_url.as_bytes()) {
        Ok(code) => code,
        Err(e) => {
            warn!(error = %e, "QR encoding failed");
            return None;
        }
    };

    let raster = code
        .render::<Luma<u8>>()
        .max_dimensions(MAX_QR_PIXELS, MAX_QR_PIXELS)
        .build();

    let mut png = Vec::new();
    if let Err(e) =
        DynamicImage::ImageLuma8(raster).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
    {
        warn!(error = %e, "QR raster could not be PNG-encoded");
        return None;
    }
    Some(png)
}
