//! Canvas sizing and pointer coordinate mapping
//!
//! The canvas is sized from the background image, capped at a maximum width.
//! The page may display it at a different size, so client coordinates are
//! mapped through the current display rectangle on every pointer event.

use crate::roi::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Where the canvas currently sits on the page, in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale the image down to `max_width` if wider, keeping the aspect ratio
pub fn fit_canvas(natural_width: f64, natural_height: f64, max_width: f64) -> CanvasSize {
    if natural_width > max_width {
        let scale = max_width / natural_width;
        CanvasSize {
            width: max_width,
            height: natural_height * scale,
        }
    } else {
        CanvasSize {
            width: natural_width,
            height: natural_height,
        }
    }
}

/// Client coordinates to canvas pixels. A collapsed rectangle maps 1:1.
pub fn to_canvas(client_x: f64, client_y: f64, rect: &DisplayRect, canvas: CanvasSize) -> Point {
    let scale_x = if rect.width > 0.0 { canvas.width / rect.width } else { 1.0 };
    let scale_y = if rect.height > 0.0 { canvas.height / rect.height } else { 1.0 };
    Point::new((client_x - rect.left) * scale_x, (client_y - rect.top) * scale_y)
}
