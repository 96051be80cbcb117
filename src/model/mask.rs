// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Segmentation mask converters: an RGBA overlay image and per-class contour
//! annotations.

use super::{
    FRAME_HEIGHT, FRAME_WIDTH, LINE_LOOP,
    contours::{Contour, Point, trace_contours},
    raster::rasterize,
};
use crate::{
    decompress::Decompressor,
    error::{Error, Result},
    frame::MaskFrame,
    palette::{TRANSPARENT, color_for},
};
use bytes::Bytes;
use foxglove::schemas::{ImageAnnotations, Point2, PointsAnnotation, RawImage, Timestamp};
use std::borrow::Cow;
use tracing::{debug, warn};

const CONTOUR_THICKNESS: f64 = 3.0;

fn decode<'a>(mask: &'a MaskFrame, decoder: &Decompressor) -> Result<Cow<'a, [u8]>> {
    decoder.decompress(&mask.mask, &mask.encoding)
}

fn log_fallback(e: &Error) {
    match e {
        Error::DecoderNotReady(_) => debug!("skipping mask: {e}"),
        _ => warn!("skipping mask: {e}"),
    }
}

/// Colors every pixel by its argmax class. The image is all zeros when the
/// payload cannot be decoded.
pub fn mask_to_image(mask: &MaskFrame, decoder: &Decompressor) -> RawImage {
    let (h, w) = (mask.height as usize, mask.width as usize);
    let data = match decode(mask, decoder) {
        Ok(bytes) => rasterize(&bytes, h, w).to_rgba8(),
        Err(e) => {
            log_fallback(&e);
            vec![0; h * w * 4]
        }
    };

    RawImage {
        timestamp: Some(Timestamp::new(0, 0)),
        frame_id: String::new(),
        width: mask.width,
        height: mask.height,
        encoding: "rgba8".to_string(),
        step: mask.width.saturating_mul(4),
        data: Bytes::from(data),
    }
}

/// Center of the mask pixel `p` in a `dst_width x dst_height` frame.
pub fn project_point(
    p: Point,
    src_width: f64,
    src_height: f64,
    dst_width: f64,
    dst_height: f64,
) -> Point2 {
    Point2 {
        x: (p.x as f64 + 0.5) / src_width * dst_width,
        y: (p.y as f64 + 0.5) / src_height * dst_height,
    }
}

/// Closed outline of one contour in the video frame, drawn in the class color.
/// Hole contours are drawn the same way as outer ones.
pub fn project_contour(
    contour: &Contour,
    class: usize,
    src_width: f64,
    src_height: f64,
) -> PointsAnnotation {
    let color = color_for(class);
    PointsAnnotation {
        timestamp: Some(Timestamp::new(0, 0)),
        r#type: LINE_LOOP,
        points: contour
            .points
            .iter()
            .map(|&p| project_point(p, src_width, src_height, FRAME_WIDTH, FRAME_HEIGHT))
            .collect(),
        outline_color: Some(color),
        outline_colors: vec![],
        fill_color: Some(color),
        thickness: CONTOUR_THICKNESS,
    }
}

/// Invisible single point annotation. The viewer only accepts annotation
/// messages that contain at least one timestamped element.
pub fn timestamp_sentinel() -> PointsAnnotation {
    PointsAnnotation {
        timestamp: Some(Timestamp::new(0, 0)),
        r#type: LINE_LOOP,
        points: vec![Point2 { x: 0.0, y: 0.0 }],
        outline_color: Some(TRANSPARENT),
        outline_colors: vec![],
        fill_color: Some(TRANSPARENT),
        thickness: 5.0,
    }
}

/// Outlines of every foreground class region, followed by the timestamp
/// sentinel. Returns empty annotations when the payload cannot be decoded.
pub fn mask_to_annotations(mask: &MaskFrame, decoder: &Decompressor) -> ImageAnnotations {
    let bytes = match decode(mask, decoder) {
        Ok(bytes) => bytes,
        Err(e) => {
            log_fallback(&e);
            return ImageAnnotations::default();
        }
    };

    let (h, w) = (mask.height as usize, mask.width as usize);
    let raster = rasterize(&bytes, h, w);
    let mut points = Vec::new();
    for (class, class_mask) in raster.class_masks() {
        let contours = trace_contours(class_mask.view());
        debug!("class {} has {} contours", class, contours.len());
        points.extend(
            contours
                .iter()
                .map(|c| project_contour(c, class, w as f64, h as f64)),
        );
    }
    points.push(timestamp_sentinel());

    ImageAnnotations {
        points,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::contours::BorderKind;

    fn frame(height: u32, width: u32, mask: Vec<u8>) -> MaskFrame {
        MaskFrame {
            height,
            width,
            encoding: String::new(),
            mask,
        }
    }

    fn assert_near(p: Point2, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{p:?}");
    }

    #[test]
    fn pixel_center_projection() {
        let p = project_point(Point { x: 0, y: 0 }, 10.0, 10.0, 100.0, 100.0);
        assert_near(p, 5.0, 5.0);

        let p = project_point(Point { x: 9, y: 4 }, 10.0, 5.0, 1920.0, 1080.0);
        assert_near(p, 1824.0, 972.0);
    }

    #[test]
    fn contour_annotation_uses_class_color() {
        let contour = Contour {
            kind: BorderKind::Hole,
            parent: Some(0),
            points: vec![Point { x: 1, y: 1 }, Point { x: 2, y: 2 }],
        };
        let annotation = project_contour(&contour, 3, 4.0, 4.0);
        assert_eq!(annotation.r#type, LINE_LOOP);
        assert_eq!(annotation.points.len(), 2);
        assert_eq!(annotation.outline_color, Some(color_for(3)));
        assert_eq!(annotation.fill_color, Some(color_for(3)));
        assert_eq!(annotation.thickness, 3.0);

        let beyond = project_contour(&contour, 40, 4.0, 4.0);
        assert_eq!(beyond.outline_color, Some(crate::palette::WHITE));
    }

    #[test]
    fn background_only_mask_yields_only_the_sentinel() {
        let mask = frame(2, 2, vec![200, 10, 200, 10, 200, 10, 200, 10]);
        let annotations = mask_to_annotations(&mask, &Decompressor::new());
        assert_eq!(annotations.points, vec![timestamp_sentinel()]);
    }

    #[test]
    fn rgba_image_dimensions() {
        let mask = frame(2, 3, vec![0, 255, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let image = mask_to_image(&mask, &Decompressor::new());
        assert_eq!(image.encoding, "rgba8");
        assert_eq!(image.step, 12);
        assert_eq!(image.data.len(), 24);
        assert_eq!(&image.data[..4], &[230, 25, 75, 200]);
        assert_eq!(&image.data[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn oversized_width_saturates_step() {
        let mask = frame(0, 1 << 30, vec![]);
        let image = mask_to_image(&mask, &Decompressor::new());
        assert_eq!(image.step, u32::MAX);
        assert!(image.data.is_empty());
    }

    #[test]
    fn unknown_encoding_gives_neutral_output() {
        let mut mask = frame(2, 2, vec![0; 8]);
        mask.encoding = "lz4".to_string();
        let decoder = Decompressor::ready();
        assert_eq!(mask_to_annotations(&mask, &decoder), ImageAnnotations::default());
        let image = mask_to_image(&mask, &decoder);
        assert_eq!(image.data.len(), 16);
        assert!(image.data.iter().all(|&b| b == 0));
    }
}
