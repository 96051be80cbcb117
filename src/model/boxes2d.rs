// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use super::{FRAME_HEIGHT, FRAME_WIDTH, LINE_LOOP};
use crate::{
    frame::{DetectBox, DetectFrame},
    options::{DisplayOptions, LabelMode},
    palette::{TRANSPARENT, str_to_color, uuid_to_color},
};
use foxglove::schemas::{Color, ImageAnnotations, Point2, PointsAnnotation, TextAnnotation};

/// Score rounded to two decimals, ties away from zero.
fn round_score(score: f32) -> f64 {
    (score as f64 * 100.0).round() / 100.0
}

/// Color and caption of a box for the selected label mode.
pub fn box_color_label(b: &DetectBox, mode: LabelMode) -> (Color, String) {
    let mut color = str_to_color(&b.label);
    let mut label = b.label.clone();
    match mode {
        LabelMode::Label => {}
        LabelMode::Score => label = format!("{:.2}", round_score(b.score)),
        LabelMode::LabelScore => label = format!("{} {:.2}", b.label, round_score(b.score)),
        LabelMode::Track => {
            if !b.track.id.is_empty() {
                label = b.track.id.chars().take(8).collect();
                color = uuid_to_color(&b.track.id);
            }
        }
    }
    (color, label)
}

/// Box outlines and captions over the 1920x1080 camera frame.
pub fn detect_to_annotations(detect: &DetectFrame, options: &DisplayOptions) -> ImageAnnotations {
    let ts = detect.input_timestamp.to_timestamp();
    let mut points = Vec::with_capacity(detect.boxes.len());
    let mut texts = Vec::with_capacity(detect.boxes.len());

    for b in &detect.boxes {
        let x = b.center_x as f64 * FRAME_WIDTH;
        let y = b.center_y as f64 * FRAME_HEIGHT;
        let width = b.width as f64 * FRAME_WIDTH;
        let height = b.height as f64 * FRAME_HEIGHT;
        let (left, right) = (x - width / 2.0, x + width / 2.0);
        let (top, bottom) = (y - height / 2.0, y + height / 2.0);
        let (color, label) = box_color_label(b, options.label_mode);

        points.push(PointsAnnotation {
            timestamp: Some(ts.clone()),
            r#type: LINE_LOOP,
            points: vec![
                Point2 { x: left, y: top },
                Point2 { x: left, y: bottom },
                Point2 { x: right, y: bottom },
                Point2 { x: right, y: top },
            ],
            outline_color: Some(color),
            outline_colors: vec![color; 4],
            fill_color: Some(TRANSPARENT),
            thickness: 9.0,
        });

        texts.push(TextAnnotation {
            timestamp: Some(ts.clone()),
            position: Some(Point2 {
                x: left,
                y: top + 6.0,
            }),
            text: label,
            font_size: 48.0,
            text_color: Some(color),
            background_color: Some(TRANSPARENT),
        });
    }

    ImageAnnotations {
        points,
        texts,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Stamp, Track};

    fn person(track: &str) -> DetectBox {
        DetectBox {
            center_x: 0.5,
            center_y: 0.5,
            width: 0.25,
            height: 0.5,
            label: "person".to_string(),
            score: 0.876,
            track: Track {
                id: track.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn label_modes() {
        let b = person("0a1b2c3d-4e5f-6789");
        let (_, label) = box_color_label(&b, LabelMode::Label);
        assert_eq!(label, "person");
        let (_, label) = box_color_label(&b, LabelMode::Score);
        assert_eq!(label, "0.88");
        let (color, label) = box_color_label(&b, LabelMode::LabelScore);
        assert_eq!(label, "person 0.88");
        assert_eq!(color, str_to_color("person"));

        let tie = DetectBox {
            score: 0.125,
            ..person("")
        };
        let (_, label) = box_color_label(&tie, LabelMode::Score);
        assert_eq!(label, "0.13");
        let tie = DetectBox {
            score: 0.625,
            ..person("")
        };
        let (_, label) = box_color_label(&tie, LabelMode::LabelScore);
        assert_eq!(label, "person 0.63");

        let (color, label) = box_color_label(&b, LabelMode::Track);
        assert_eq!(label, "0a1b2c3d");
        assert_eq!(color, uuid_to_color("0a1b2c3d"));
    }

    #[test]
    fn untracked_box_keeps_label_in_track_mode() {
        let (color, label) = box_color_label(&person(""), LabelMode::Track);
        assert_eq!(label, "person");
        assert_eq!(color, str_to_color("person"));
    }

    #[test]
    fn boxes_are_scaled_to_the_frame() {
        let detect = DetectFrame {
            input_timestamp: Stamp {
                sec: 12,
                nanosec: 34,
            },
            boxes: vec![person("")],
            ..Default::default()
        };
        let options = DisplayOptions {
            label_mode: LabelMode::Label,
            ..Default::default()
        };
        let annotations = detect_to_annotations(&detect, &options);
        assert_eq!(annotations.points.len(), 1);
        assert_eq!(annotations.texts.len(), 1);

        let outline = &annotations.points[0];
        assert_eq!(outline.timestamp, Some(foxglove::schemas::Timestamp::new(12, 34)));
        assert_eq!(
            outline.points,
            vec![
                Point2 { x: 720.0, y: 270.0 },
                Point2 { x: 720.0, y: 810.0 },
                Point2 { x: 1200.0, y: 810.0 },
                Point2 { x: 1200.0, y: 270.0 },
            ]
        );
        assert_eq!(outline.outline_colors.len(), 4);
        assert_eq!(outline.fill_color, Some(TRANSPARENT));

        let text = &annotations.texts[0];
        assert_eq!(text.text, "person");
        assert_eq!(text.position, Some(Point2 { x: 720.0, y: 276.0 }));
    }

    #[test]
    fn no_boxes_no_annotations() {
        let annotations =
            detect_to_annotations(&DetectFrame::default(), &DisplayOptions::default());
        assert!(annotations.points.is_empty());
        assert!(annotations.texts.is_empty());
    }
}
