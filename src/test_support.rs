use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

const MODULE_PX: u32 = 8;
const QUIET_ZONE: u32 = 4;

/// Render `data` as a black-on-white QR symbol with a quiet zone
pub fn render_symbol(data: &str) -> RgbaImage {
    let code = QrCode::new(data.as_bytes()).expect("symbol fits");
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + QUIET_ZONE * 2) * MODULE_PX;
    let mut image = RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]));

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (i as u32 % modules + QUIET_ZONE) * MODULE_PX;
        let y = (i as u32 / modules + QUIET_ZONE) * MODULE_PX;
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                image.put_pixel(x + dx, y + dy, Rgba([0, 0, 0, 255]));
            }
        }
    }

    image
}
