use std::sync::{Arc, OnceLock};

use image::{DynamicImage, Rgb, RgbImage};

const PLACEHOLDER_WIDTH: u32 = 352;
const PLACEHOLDER_HEIGHT: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// The image endpoint answered 404 for this camera.
    NotFound,
    /// Any other failure.
    Error,
}

static NOT_FOUND: OnceLock<Arc<DynamicImage>> = OnceLock::new();
static ERROR: OnceLock<Arc<DynamicImage>> = OnceLock::new();

impl Placeholder {
    /// Shared copy of the placeholder. Rendered once per process.
    pub fn image(self) -> Arc<DynamicImage> {
        let cell = match self {
            Placeholder::NotFound => &NOT_FOUND,
            Placeholder::Error => &ERROR,
        };
        cell.get_or_init(|| Arc::new(self.render())).clone()
    }

    fn render(self) -> DynamicImage {
        let (background, foreground) = match self {
            Placeholder::NotFound => (Rgb([48, 48, 48]), Rgb([160, 160, 160])),
            Placeholder::Error => (Rgb([96, 16, 16]), Rgb([230, 80, 80])),
        };

        let mut canvas = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, background);
        let border = 6;

        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let on_border = x < border
                || y < border
                || x >= PLACEHOLDER_WIDTH - border
                || y >= PLACEHOLDER_HEIGHT - border;

            // Scale x into y-space to draw the diagonals
            let scaled = x * PLACEHOLDER_HEIGHT / PLACEHOLDER_WIDTH;
            let on_cross = matches!(self, Placeholder::Error)
                && (scaled.abs_diff(y) <= 2 || (PLACEHOLDER_HEIGHT - 1 - scaled).abs_diff(y) <= 2);

            if on_border || on_cross {
                *pixel = foreground;
            }
        }

        DynamicImage::ImageRgb8(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_shared_and_distinct() {
        let not_found = Placeholder::NotFound.image();
        let again = Placeholder::NotFound.image();
        let error = Placeholder::Error.image();

        assert!(Arc::ptr_eq(&not_found, &again));
        assert!(!Arc::ptr_eq(&not_found, &error));
        assert_ne!(not_found.as_bytes(), error.as_bytes());
        assert_eq!(not_found.width(), PLACEHOLDER_WIDTH);
        assert_eq!(error.height(), PLACEHOLDER_HEIGHT);
    }
}
