// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Contour extraction from binary masks.
//!
//! Borders are traced with `imageproc`'s Suzuki & Abe border following.
//! Foreground is 8-connected, the hierarchy is reduced to two levels (outer
//! borders and the holes directly inside them) and straight runs are
//! compressed to their end points.

use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use ndarray::ArrayView2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub kind: BorderKind,
    /// Index of the outer contour enclosing a hole. Always `None` for outer
    /// contours.
    pub parent: Option<usize>,
    /// Closed loop, the last point connects back to the first.
    pub points: Vec<Point>,
}

/// Copies `mask` into a grayscale image with one pixel of background on every
/// side. The tracer only finds borders that touch background, so foreground on
/// the mask edge needs the frame around it.
fn padded_image(mask: ArrayView2<u8>) -> GrayImage {
    let (rows, cols) = mask.dim();
    let mut image = GrayImage::new(cols as u32 + 2, rows as u32 + 2);
    for ((r, c), &v) in mask.indexed_iter() {
        if v != 0 {
            image.put_pixel(c as u32 + 1, r as u32 + 1, Luma([255]));
        }
    }
    image
}

/// Traces every outer and hole border of the non-zero pixels in `mask`.
/// Pixels outside the mask are background. Contour order follows the raster
/// scan that discovers each border.
pub fn trace_contours(mask: ArrayView2<u8>) -> Vec<Contour> {
    if mask.is_empty() {
        return Vec::new();
    }

    find_contours::<i32>(&padded_image(mask))
        .into_iter()
        .map(|contour| {
            let (kind, parent) = match contour.border_type {
                BorderType::Outer => (BorderKind::Outer, None),
                BorderType::Hole => (BorderKind::Hole, contour.parent),
            };
            let points = contour
                .points
                .iter()
                .map(|p| Point {
                    x: p.x - 1,
                    y: p.y - 1,
                })
                .collect::<Vec<_>>();
            Contour {
                kind,
                parent,
                points: compress_runs(&points),
            }
        })
        .collect()
}

/// Keeps the first point and every point where the step direction changes.
fn compress_runs(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&k| {
            if k == 0 {
                return true;
            }
            let prev = points[k - 1];
            let cur = points[k];
            let next = points[(k + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|k| points[k])
        .collect()
}
