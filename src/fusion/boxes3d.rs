// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Detection boxes with a known distance, drawn as wireframe cuboids in the
//! 3D scene.

use crate::{
    frame::{DetectBox, DetectFrame},
    model::boxes2d::box_color_label,
    options::DisplayOptions,
};
use foxglove::schemas::{
    Color, LinePrimitive, Point3, Pose, Quaternion, SceneEntity, SceneUpdate, TextPrimitive,
    Vector3,
};

/// `LinePrimitive.Type.LINE_LIST`
const LINE_LIST: i32 = 2;

// Bottom face, top face, then the four vertical edges.
const CUBOID_EDGES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, 4, 5, 5, 6, 6, 7, 7, 4, 0, 4, 1, 5, 2, 6, 3, 7,
];

fn pose_at(x: f64, y: f64, z: f64) -> Pose {
    Pose {
        position: Some(Vector3 { x, y, z }),
        orientation: Some(Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }),
    }
}

/// Corners of a `width x width x height` cuboid centered on the origin.
fn cuboid_corners(width: f64, height: f64) -> Vec<Point3> {
    let (w, h) = (width / 2.0, height / 2.0);
    [
        (-w, -w, -h),
        (-w, w, -h),
        (-w, w, h),
        (-w, -w, h),
        (w, -w, -h),
        (w, w, -h),
        (w, w, h),
        (w, -w, h),
    ]
    .into_iter()
    .map(|(x, y, z)| Point3 { x, y, z })
    .collect()
}

fn box_primitives(b: &DetectBox, color: Color, label: String) -> (LinePrimitive, TextPrimitive) {
    // x forward at the measured distance, the image center offsets give y and z
    let (x, y, z) = (b.distance as f64, b.center_x as f64, b.center_y as f64);
    let (width, height) = (b.width as f64, b.height as f64);

    let line = LinePrimitive {
        r#type: LINE_LIST,
        pose: Some(pose_at(x, y, z)),
        thickness: 2.0,
        scale_invariant: true,
        points: cuboid_corners(width, height),
        color: Some(color),
        colors: vec![],
        indices: CUBOID_EDGES.to_vec(),
    };

    let text = TextPrimitive {
        pose: Some(pose_at(x, y, z + height / 2.0 + 0.2)),
        billboard: true,
        font_size: 12.0,
        scale_invariant: true,
        color: Some(color),
        text: label,
    };

    (line, text)
}

/// One scene entity holding a cuboid and a caption per box. Boxes without a
/// distance are skipped.
pub fn detect_to_scene(detect: &DetectFrame, options: &DisplayOptions) -> SceneUpdate {
    let mut lines = Vec::new();
    let mut texts = Vec::new();
    for b in detect.boxes.iter().filter(|b| b.distance != 0.0) {
        let (color, label) = box_color_label(b, options.label_mode);
        let (line, text) = box_primitives(b, color, label);
        lines.push(line);
        texts.push(text);
    }

    let entity = SceneEntity {
        timestamp: Some(detect.input_timestamp.to_timestamp()),
        frame_id: detect.header.frame_id.clone(),
        id: detect.header.frame_id.clone(),
        frame_locked: false,
        lines,
        texts,
        ..Default::default()
    };

    SceneUpdate {
        deletions: vec![],
        entities: vec![entity],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frame::{FrameHeader, Track},
        options::LabelMode,
    };

    fn detect(boxes: Vec<DetectBox>) -> DetectFrame {
        DetectFrame {
            header: FrameHeader {
                frame_id: "camera".to_string(),
                ..Default::default()
            },
            boxes,
            ..Default::default()
        }
    }

    fn car(distance: f32) -> DetectBox {
        DetectBox {
            center_x: 0.5,
            center_y: -0.25,
            width: 2.0,
            height: 1.5,
            label: "car".to_string(),
            distance,
            track: Track::default(),
            ..Default::default()
        }
    }

    #[test]
    fn boxes_without_distance_are_skipped() {
        let frame = detect(vec![car(0.0), car(12.0)]);
        let update = detect_to_scene(&frame, &DisplayOptions::default());
        assert_eq!(update.entities.len(), 1);
        let entity = &update.entities[0];
        assert_eq!(entity.id, "camera");
        assert_eq!(entity.frame_id, "camera");
        assert_eq!(entity.lines.len(), 1);
        assert_eq!(entity.texts.len(), 1);
    }

    #[test]
    fn cuboid_geometry() {
        let options = DisplayOptions {
            label_mode: LabelMode::Label,
            ..Default::default()
        };
        let update = detect_to_scene(&detect(vec![car(12.0)]), &options);
        let line = &update.entities[0].lines[0];
        assert_eq!(line.r#type, LINE_LIST);
        assert_eq!(line.points.len(), 8);
        assert_eq!(line.indices.len(), 24);
        assert_eq!(line.points[0], Point3 { x: -1.0, y: -1.0, z: -0.75 });
        assert_eq!(line.points[6], Point3 { x: 1.0, y: 1.0, z: 0.75 });
        let position = line.pose.as_ref().and_then(|p| p.position.as_ref()).unwrap();
        assert_eq!((position.x, position.y, position.z), (12.0, 0.5, -0.25));

        let text = &update.entities[0].texts[0];
        assert_eq!(text.text, "car");
        assert!(text.billboard);
        let position = text.pose.as_ref().and_then(|p| p.position.as_ref()).unwrap();
        assert!((position.z - (-0.25 + 0.75 + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn empty_detection_still_has_an_entity() {
        let update = detect_to_scene(&detect(vec![]), &DisplayOptions::default());
        assert_eq!(update.entities.len(), 1);
        assert!(update.entities[0].lines.is_empty());
    }
}
