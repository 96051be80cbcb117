// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

pub mod boxes2d;
pub mod contours;
pub mod mask;
pub mod raster;

/// The camera stream the model overlays are drawn on is assumed to be
/// 1920x1080.
pub const FRAME_WIDTH: f64 = 1920.0;
pub const FRAME_HEIGHT: f64 = 1080.0;

/// `PointsAnnotation.Type.LINE_LOOP`
pub(crate) const LINE_LOOP: i32 = 2;
