//! 2D geometry primitives and tests.
//!
//! All positions are world units with Y increasing downward. Rectangles are
//! axis-aligned and use strict overlap: boxes that merely touch along an
//! edge do not collide.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fallback direction used when a direction is requested from a zero-length
/// delta.
pub const FALLBACK_DIRECTION: Vec2 = Vec2::X;

/// Axis-aligned rectangle (top-left corner plus size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle from its centre and half-extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            x: center.x - half_width,
            y: center.y - half_height,
            w: half_width * 2.0,
            h: half_height * 2.0,
        }
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Area of the rectangle.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Checks if this rectangle overlaps another (strictly).
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the overlapping region, if any.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Checks if a point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns the rectangle moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Returns the rectangle resized to `w`×`h` around its current centre.
    #[must_use]
    pub fn resized_about_center(&self, w: f32, h: f32) -> Self {
        Self::from_center(self.center(), w / 2.0, h / 2.0)
    }

    /// Checks if any wall in `walls` overlaps this rectangle.
    #[must_use]
    pub fn intersects_any(&self, walls: &[Rect]) -> bool {
        walls.iter().any(|wall| self.intersects(wall))
    }

    /// Whether every component is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

/// Circle used for entity-entity collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre point
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Square bounding box of the circle.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_center(self.center, self.radius, self.radius)
    }

    /// Area of the circle.
    #[must_use]
    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }
}

/// Circle-circle collision: distance between centres strictly less than the
/// sum of radii.
#[must_use]
pub fn check_circle_collision(a: Circle, b: Circle) -> bool {
    a.center.distance(b.center) < a.radius + b.radius
}

/// Checks if two line segments `p1→p2` and `p3→p4` intersect.
///
/// Parallel (including collinear) segments are reported as not intersecting.
#[must_use]
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return false;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Checks if the segment `start→end` touches `rect`.
#[must_use]
pub fn segment_intersects_rect(start: Vec2, end: Vec2, rect: &Rect) -> bool {
    // Entirely to one side
    if start.x.max(end.x) < rect.left()
        || start.x.min(end.x) > rect.right()
        || start.y.max(end.y) < rect.top()
        || start.y.min(end.y) > rect.bottom()
    {
        return false;
    }

    if rect.contains_point(start) || rect.contains_point(end) {
        return true;
    }

    let top_left = Vec2::new(rect.left(), rect.top());
    let top_right = Vec2::new(rect.right(), rect.top());
    let bottom_left = Vec2::new(rect.left(), rect.bottom());
    let bottom_right = Vec2::new(rect.right(), rect.bottom());

    [
        (top_left, top_right),
        (bottom_left, bottom_right),
        (top_left, bottom_left),
        (top_right, bottom_right),
    ]
    .into_iter()
    .any(|(a, b)| segments_intersect(start, end, a, b))
}

/// Unit vector along `delta`, or `fallback` when `delta` has no usable length.
#[must_use]
pub fn direction_or(delta: Vec2, fallback: Vec2) -> Vec2 {
    delta.try_normalize().unwrap_or(fallback)
}

/// Angle of a vector in radians, measured from +X toward +Y.
#[must_use]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Wraps an angle into `[-π, π)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic smoothstep on `[0, 1]`.
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
