//! Signature capture as a stroke accumulator.
//!
//! The pad moves between `Idle`, `Drawing` and `Captured`; only a captured
//! pad can be rendered. Rendering produces a PNG data URI with a transparent
//! background, independent of whichever surface recorded the strokes.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::media::model::DataUri;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SignatureError {
    #[error("A stroke is already in progress")]
    AlreadyDrawing,
    #[error("No stroke in progress")]
    NotDrawing,
    #[error("Signature has already been captured")]
    AlreadyCaptured,
    #[error("Signature has not been captured")]
    NotCaptured,
    #[error("Signature is empty")]
    Empty,
    #[error("Signature could not be rendered: {0}")]
    Render(String),
}

/// Coordinates are pad pixels. The bounds cover twice the largest pad so a
/// pen dragged off the edge still records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Point {
    #[validate(range(min = -4000.0, max = 4000.0))]
    pub x: f32,
    #[validate(range(min = -2000.0, max = 2000.0))]
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Stroke {
    #[validate(length(min = 1, max = 5000))]
    #[validate(nested)]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadState {
    Idle,
    Drawing,
    Captured,
}

#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    pen_width: f32,
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    captured: bool,
}

impl SignaturePad {
    pub fn new(width: u32, height: u32, pen_width: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pen_width: pen_width.max(0.5),
            strokes: Vec::new(),
            current: None,
            captured: false,
        }
    }

    pub fn state(&self) -> PadState {
        if self.captured {
            PadState::Captured
        } else if self.current.is_some() {
            PadState::Drawing
        } else {
            PadState::Idle
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn begin_stroke(&mut self, point: Point) -> Result<(), SignatureError> {
        match self.state() {
            PadState::Idle => {
                self.current = Some(Stroke { points: vec![point] });
                Ok(())
            }
            PadState::Drawing => Err(SignatureError::AlreadyDrawing),
            PadState::Captured => Err(SignatureError::AlreadyCaptured),
        }
    }

    pub fn add_point(&mut self, point: Point) -> Result<(), SignatureError> {
        match (&mut self.current, self.captured) {
            (_, true) => Err(SignatureError::AlreadyCaptured),
            (Some(stroke), false) => {
                stroke.points.push(point);
                Ok(())
            }
            (None, false) => Err(SignatureError::NotDrawing),
        }
    }

    pub fn end_stroke(&mut self) -> Result<(), SignatureError> {
        if self.captured {
            return Err(SignatureError::AlreadyCaptured);
        }
        let stroke = self.current.take().ok_or(SignatureError::NotDrawing)?;
        if !stroke.points.is_empty() {
            self.strokes.push(stroke);
        }
        Ok(())
    }

    pub fn capture(&mut self) -> Result<(), SignatureError> {
        match self.state() {
            PadState::Drawing => Err(SignatureError::NotDrawing),
            PadState::Captured => Err(SignatureError::AlreadyCaptured),
            PadState::Idle if self.strokes.is_empty() => Err(SignatureError::Empty),
            PadState::Idle => {
                self.captured = true;
                Ok(())
            }
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.captured = false;
    }

    /// Replays recorded strokes and captures the result.
    pub fn replay(&mut self, strokes: &[Stroke]) -> Result<(), SignatureError> {
        for stroke in strokes {
            let mut points = stroke.points.iter().copied();
            let Some(first) = points.next() else { continue };
            self.begin_stroke(first)?;
            for point in points {
                self.add_point(point)?;
            }
            self.end_stroke()?;
        }
        self.capture()
    }

    pub fn render_png(&self) -> Result<String, SignatureError> {
        if !self.captured {
            return Err(SignatureError::NotCaptured);
        }

        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 0]));
        let radius = self.pen_width / 2.0;

        for stroke in &self.strokes {
            match stroke.points.as_slice() {
                [single] => stamp(&mut canvas, *single, radius),
                points => {
                    for pair in points.windows(2) {
                        draw_segment(&mut canvas, pair[0], pair[1], radius);
                    }
                }
            }
        }

        let mut buf = Cursor::new(Vec::new());
        canvas
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| SignatureError::Render(e.to_string()))?;
        Ok(DataUri::encode("image/png", &buf.into_inner()))
    }
}

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fills a disc of `radius` around `center`, clipped to the canvas.
fn stamp(canvas: &mut RgbaImage, center: Point, radius: f32) {
    let r = radius.max(0.5);
    let min_x = (center.x - r).floor().max(0.0) as u32;
    let min_y = (center.y - r).floor().max(0.0) as u32;
    let max_x = ((center.x + r).ceil() as i64).min(canvas.width() as i64 - 1);
    let max_y = ((center.y + r).ceil() as i64).min(canvas.height() as i64 - 1);
    if max_x < 0 || max_y < 0 {
        return;
    }

    for y in min_y..=max_y as u32 {
        for x in min_x..=max_x as u32 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r * r {
                canvas.put_pixel(x, y, INK);
            }
        }
    }
}

/// Liang-Barsky clip of `from..to` against the box `[min, max]`.
fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);

    for (p, q) in [
        (-dx, from.x - min.x),
        (dx, max.x - from.x),
        (-dy, from.y - min.y),
        (dy, max.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        Point { x: from.x + dx * t0, y: from.y + dy * t0 },
        Point { x: from.x + dx * t1, y: from.y + dy * t1 },
    ))
}

fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point, radius: f32) {
    let margin = radius.max(0.5) + 1.0;
    let min = Point { x: -margin, y: -margin };
    let max = Point { x: canvas.width() as f32 + margin, y: canvas.height() as f32 + margin };
    let Some((from, to)) = clip_segment(from, to, min, max) else { return };

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(canvas, Point { x: from.x + dx * t, y: from.y + dy * t }, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    #[test]
    fn transitions_idle_drawing_captured() {
        let mut pad = SignaturePad::new(100, 40, 2.0);
        assert_eq!(pad.state(), PadState::Idle);

        pad.begin_stroke(p(1.0, 1.0)).unwrap();
        assert_eq!(pad.state(), PadState::Drawing);
        pad.add_point(p(10.0, 10.0)).unwrap();
        pad.end_stroke().unwrap();
        assert_eq!(pad.state(), PadState::Idle);

        pad.capture().unwrap();
        assert_eq!(pad.state(), PadState::Captured);
        assert_eq!(pad.strokes().len(), 1);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut pad = SignaturePad::new(100, 40, 2.0);
        assert_eq!(pad.add_point(p(0.0, 0.0)), Err(SignatureError::NotDrawing));
        assert_eq!(pad.end_stroke(), Err(SignatureError::NotDrawing));
        assert_eq!(pad.capture(), Err(SignatureError::Empty));

        pad.begin_stroke(p(0.0, 0.0)).unwrap();
        assert_eq!(pad.begin_stroke(p(1.0, 1.0)), Err(SignatureError::AlreadyDrawing));
        assert_eq!(pad.capture(), Err(SignatureError::NotDrawing));
        pad.end_stroke().unwrap();

        pad.capture().unwrap();
        assert_eq!(pad.begin_stroke(p(1.0, 1.0)), Err(SignatureError::AlreadyCaptured));
        assert_eq!(pad.capture(), Err(SignatureError::AlreadyCaptured));
    }

    #[test]
    fn clear_resets_any_state() {
        let mut pad = SignaturePad::new(100, 40, 2.0);
        pad.replay(&[Stroke { points: vec![p(1.0, 1.0), p(5.0, 5.0)] }]).unwrap();
        assert_eq!(pad.state(), PadState::Captured);

        pad.clear();
        assert_eq!(pad.state(), PadState::Idle);
        assert!(pad.is_empty());
    }

    #[test]
    fn render_requires_capture() {
        let pad = SignaturePad::new(10, 10, 1.0);
        assert_eq!(pad.render_png(), Err(SignatureError::NotCaptured));
    }

    #[test]
    fn rendered_png_has_ink_along_stroke() {
        let mut pad = SignaturePad::new(50, 20, 3.0);
        pad.replay(&[Stroke { points: vec![p(5.0, 10.0), p(45.0, 10.0)] }]).unwrap();

        let data = pad.render_png().unwrap();
        assert!(data.starts_with("data:image/png;base64,"));

        let bytes = DataUri::parse(&data).unwrap().decode().unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (50, 20));
        assert_eq!(img.get_pixel(25, 10)[3], 255);
        assert_eq!(img.get_pixel(25, 2)[3], 0);
    }

    #[test]
    fn far_off_segment_renders_only_the_visible_part() {
        let mut pad = SignaturePad::new(40, 20, 2.0);
        pad.replay(&[Stroke { points: vec![p(0.0, 10.0), p(1.0e12, 10.0)] }]).unwrap();

        let started = std::time::Instant::now();
        let data = pad.render_png().unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        let bytes = DataUri::parse(&data).unwrap().decode().unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(39, 10)[3], 255);
    }

    #[test]
    fn segments_outside_the_canvas_are_dropped() {
        let min = p(0.0, 0.0);
        let max = p(10.0, 10.0);
        assert_eq!(clip_segment(p(-5.0, -5.0), p(-1.0, 20.0), min, max), None);
        assert_eq!(clip_segment(p(f32::NAN, 0.0), p(5.0, 5.0), min, max), None);
        assert_eq!(
            clip_segment(p(-10.0, 5.0), p(30.0, 5.0), min, max),
            Some((p(0.0, 5.0), p(10.0, 5.0)))
        );
    }

    #[test]
    fn point_validation_rejects_far_coordinates() {
        let stroke = Stroke { points: vec![p(0.0, 0.0), p(1.0e12, 0.0)] };
        assert!(stroke.validate().is_err());

        let stroke = Stroke { points: vec![p(-100.0, 0.0), p(1900.0, 900.0)] };
        assert!(stroke.validate().is_ok());
    }

    #[test]
    fn out_of_bounds_points_are_clipped() {
        let mut pad = SignaturePad::new(10, 10, 2.0);
        pad.replay(&[Stroke { points: vec![p(-20.0, -20.0), p(30.0, 30.0)] }]).unwrap();
        assert!(pad.render_png().is_ok());
    }
}
