// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Radar cube to 16-bit grayscale image.
//!
//! The cube is laid out as `[sequence, range, rx, doppler]`. One range-doppler
//! slice is cut out for the selected sequence and receive channel, each
//! amplitude is log-compressed and the result is packed as big-endian `mono16`.

use crate::{
    buffer::Buffer,
    frame::RadarCubeFrame,
    options::{DisplayOptions, RadarSelection},
};
use bytes::Bytes;
use foxglove::schemas::RawImage;
use tracing::debug;

/// Maps `log2(|amplitude| + 1)` onto the 16-bit range. 2500 is the largest
/// amplitude expected from the sensor.
pub const AMPLITUDE_SCALE: f64 = 65535.0 / 2500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeShape {
    pub sequences: usize,
    /// Image height.
    pub range: usize,
    pub rx: usize,
    /// Image width.
    pub doppler: usize,
}

impl CubeShape {
    /// Reads the four dimensions, a missing dimension counts as 1.
    pub fn from_dims(shape: &[u16]) -> Self {
        let dim = |k: usize| shape.get(k).map_or(1, |&d| d as usize);
        CubeShape {
            sequences: dim(0),
            range: dim(1),
            rx: dim(2),
            doppler: dim(3),
        }
    }

    /// Distance between consecutive range rows.
    pub fn stride(&self) -> usize {
        self.rx * self.doppler
    }
}

/// Linear indexing of one range-doppler slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeSlice {
    height: usize,
    width: usize,
    stride: usize,
    offset: Option<usize>,
    flip: bool,
}

impl CubeSlice {
    /// Sequence `"A"` is the first half of the cube, `"B"` (or empty) the
    /// second half when the cube has more than one sequence. Any other
    /// sequence or an rx outside `0..shape.rx` selects nothing.
    pub fn select(shape: CubeShape, selection: &RadarSelection, flip: bool) -> Self {
        let stride = shape.stride();
        let base = match selection.sequence.as_str() {
            "A" => Some(0),
            "B" | "" if shape.sequences > 1 => Some(shape.range * stride),
            "B" | "" => Some(0),
            _ => None,
        };
        let rx = usize::try_from(selection.rx)
            .ok()
            .filter(|&rx| rx < shape.rx);
        let offset = match (base, rx) {
            (Some(base), Some(rx)) => Some(base + rx * shape.doppler),
            _ => None,
        };

        CubeSlice {
            height: shape.range,
            width: shape.doppler,
            stride,
            offset,
            flip,
        }
    }

    /// Start of the slice in the cube, `None` when nothing is selected.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Cube index of output pixel `i` (row-major). With `flip` set, row `r` of
    /// the image reads range row `height - r`. `None` past the last pixel.
    pub fn index(&self, i: usize) -> Option<usize> {
        let offset = self.offset?;
        if i >= self.width * self.height {
            return None;
        }
        let row = i / self.width;
        let row = if self.flip { self.height - row } else { row };
        Some(offset + row * self.stride + i % self.width)
    }
}

/// `log2(magnitude + 1) * AMPLITUDE_SCALE`, clamped to `u16`.
pub fn log_compress(magnitude: f64) -> u16 {
    let val = (magnitude + 1.0).log2() * AMPLITUDE_SCALE;
    if val.is_nan() {
        return 0;
    }
    val.clamp(0.0, 65535.0) as u16
}

pub fn encode_amplitude(amplitude: i16) -> u16 {
    log_compress((amplitude as i32).unsigned_abs() as f64)
}

/// Renders the selected slice as `mono16`. A selection that matches nothing
/// gives a black image of the slice's size.
pub fn cube_to_image(cube: &RadarCubeFrame, options: &DisplayOptions) -> RawImage {
    let shape = CubeShape::from_dims(&cube.shape);
    let (height, width) = (shape.range, shape.doppler);
    let slice = CubeSlice::select(shape, &options.radar, options.radar_flip);
    let mut data = vec![0u8; width * height * 2];

    if slice.offset().is_some() {
        for (i, px) in data.chunks_exact_mut(2).enumerate() {
            let amplitude = slice.index(i).map_or(0, |k| cube.cube.get_or_zero(k));
            px.copy_from_slice(&encode_amplitude(amplitude).to_be_bytes());
        }
    } else {
        debug!(
            "radar selection {:?} rx {} matches nothing in cube {:?}",
            options.radar.sequence, options.radar.rx, cube.shape
        );
    }

    RawImage {
        timestamp: Some(cube.header.stamp.to_timestamp()),
        frame_id: cube.header.frame_id.clone(),
        width: width as u32,
        height: height as u32,
        encoding: "mono16".to_string(),
        step: 2 * width as u32,
        data: Bytes::from(data),
    }
}
