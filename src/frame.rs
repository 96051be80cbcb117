// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Converter inputs.
//!
//! The bridge decodes CDR payloads into `edgefirst-schemas` messages and moves
//! them into these frames, which hold only the fields the converters read.

use edgefirst_schemas::{builtin_interfaces::Time, edgefirst_msgs, std_msgs::Header};
use foxglove::schemas::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stamp {
    pub sec: i32,
    pub nanosec: u32,
}

impl Stamp {
    pub fn to_timestamp(self) -> Timestamp {
        Timestamp::new(self.sec as u32, self.nanosec)
    }
}

impl From<Time> for Stamp {
    fn from(t: Time) -> Self {
        Stamp {
            sec: t.sec,
            nanosec: t.nanosec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameHeader {
    pub stamp: Stamp,
    pub frame_id: String,
}

impl From<Header> for FrameHeader {
    fn from(h: Header) -> Self {
        FrameHeader {
            stamp: h.stamp.into(),
            frame_id: h.frame_id,
        }
    }
}

/// Segmentation mask: `height x width x classes` scores, row-major, one byte
/// per class, optionally compressed as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskFrame {
    pub height: u32,
    pub width: u32,
    pub encoding: String,
    pub mask: Vec<u8>,
}

impl From<edgefirst_msgs::Mask> for MaskFrame {
    fn from(m: edgefirst_msgs::Mask) -> Self {
        MaskFrame {
            height: m.height,
            width: m.width,
            encoding: m.encoding,
            mask: m.mask,
        }
    }
}

/// Radar cube with shape `[sequence, range, rx, doppler]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadarCubeFrame {
    pub header: FrameHeader,
    pub shape: Vec<u16>,
    pub cube: Vec<i16>,
}

impl From<edgefirst_msgs::RadarCube> for RadarCubeFrame {
    fn from(r: edgefirst_msgs::RadarCube) -> Self {
        RadarCubeFrame {
            header: r.header.into(),
            shape: r.shape,
            cube: r.cube,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub id: String,
}

/// Detection box with geometry normalized to the frame, `0..1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectBox {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub label: String,
    pub score: f32,
    /// Distance in meters, `0` when unknown.
    pub distance: f32,
    pub speed: f32,
    pub track: Track,
}

impl From<edgefirst_msgs::DetectBox2D> for DetectBox {
    fn from(b: edgefirst_msgs::DetectBox2D) -> Self {
        DetectBox {
            center_x: b.center_x,
            center_y: b.center_y,
            width: b.width,
            height: b.height,
            label: b.label,
            score: b.score,
            distance: b.distance,
            speed: b.speed,
            track: Track { id: b.track.id },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectFrame {
    pub header: FrameHeader,
    pub input_timestamp: Stamp,
    pub boxes: Vec<DetectBox>,
}

impl From<edgefirst_msgs::Detect> for DetectFrame {
    fn from(d: edgefirst_msgs::Detect) -> Self {
        DetectFrame {
            header: d.header.into(),
            input_timestamp: d.input_timestamp.into(),
            boxes: d.boxes.into_iter().map(DetectBox::from).collect(),
        }
    }
}
