use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::shared::face_detection::BoundingBox;
use crate::shared::frame::Frame;

pub const LABEL_COLOR: Rgb888 = Rgb888::RED;
pub const BOX_COLOR: Rgb888 = Rgb888::GREEN;
pub const BOX_STROKE_WIDTH: u32 = 2;

/// Renders `text` with its baseline starting at `(x, y)` in a small fixed
/// font, red. Glyph pixels outside the frame are dropped.
pub fn draw_label(frame: &mut Frame, text: &str, x: i32, y: i32) {
    let style = MonoTextStyle::new(&FONT_6X10, LABEL_COLOR);
    match Text::with_baseline(text, Point::new(x, y), style, Baseline::Alphabetic)
        .draw(&mut Canvas(frame))
    {
        Ok(_) => {}
        Err(infallible) => match infallible {},
    }
}

/// Outlines `bbox` in green with a 2 px stroke centred on the box edges.
pub fn draw_box(frame: &mut Frame, bbox: &BoundingBox) {
    match Rectangle::with_corners(Point::new(bbox.x1, bbox.y1), Point::new(bbox.x2, bbox.y2))
        .into_styled(PrimitiveStyle::with_stroke(BOX_COLOR, BOX_STROKE_WIDTH))
        .draw(&mut Canvas(frame))
    {
        Ok(_) => {}
        Err(infallible) => match infallible {},
    }
}

/// `DrawTarget` adapter writing straight into an RGB frame.
struct Canvas<'a>(&'a mut Frame);

impl Dimensions for Canvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle {
            top_left: Point::zero(),
            size: Size::new(self.0.width(), self.0.height()),
        }
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.0.width();
        let height = self.0.height();
        let channels = self.0.channels() as usize;
        let data = self.0.data_mut();
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && (point.x as u32) < width
                && point.y >= 0
                && (point.y as u32) < height
            {
                let offset = (point.y as usize * width as usize + point.x as usize) * channels;
                data[offset] = color.r();
                data[offset + 1] = color.g();
                data[offset + 2] = color.b();
            }
        }
        Ok(())
    }
}
