// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Per-pixel argmax over segmentation class scores.

use crate::{buffer::Buffer, palette};
use ndarray::Array2;
use tracing::warn;

/// Argmax class and its score for every pixel of a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRaster {
    classes: usize,
    labels: Array2<u32>,
    scores: Array2<u8>,
}

/// Number of classes packed per pixel, `round(len / (height * width))`.
///
/// A length that is not a whole multiple of the pixel count is reported but
/// still rounded; the trailing rows then read scores from shifted offsets.
pub fn class_count(len: usize, height: usize, width: usize) -> usize {
    let pixels = height * width;
    if pixels == 0 {
        return 0;
    }
    if len % pixels != 0 {
        warn!(
            "mask length {} is not a multiple of {}x{}, class count is rounded",
            len, height, width
        );
    }
    (len as f64 / pixels as f64).round() as usize
}

/// Computes the argmax class of every pixel. Ties keep the lowest class index
/// and a pixel whose scores are all zero is class 0 with score 0.
pub fn rasterize(bytes: &[u8], height: usize, width: usize) -> ClassRaster {
    let classes = class_count(bytes.len(), height, width);
    let mut labels = Array2::<u32>::zeros((height, width));
    let mut scores = Array2::<u8>::zeros((height, width));

    for (i, (label, score)) in labels.iter_mut().zip(scores.iter_mut()).enumerate() {
        let mut max_ind = 0;
        let mut max_val = 0;
        for j in 0..classes {
            let val = bytes.get_or_zero(i * classes + j);
            if val > max_val {
                max_ind = j;
                max_val = val;
            }
        }
        *label = max_ind as u32;
        *score = max_val;
    }

    ClassRaster {
        classes,
        labels,
        scores,
    }
}

impl ClassRaster {
    pub fn height(&self) -> usize {
        self.labels.nrows()
    }

    pub fn width(&self) -> usize {
        self.labels.ncols()
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    pub fn labels(&self) -> &Array2<u32> {
        &self.labels
    }

    pub fn scores(&self) -> &Array2<u8> {
        &self.scores
    }

    /// RGBA pixels colored by the class palette, color channels scaled by the
    /// argmax score.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.labels.len() * 4);
        for (&label, &score) in self.labels.iter().zip(self.scores.iter()) {
            let [r, g, b, a] = palette::rgba8_for(label as usize);
            let scale = |c: u8| (c as u32 * score as u32 / 255) as u8;
            data.extend_from_slice(&[scale(r), scale(g), scale(b), a]);
        }
        data
    }

    /// One 0/255 mask per foreground class. The background class 0 has none.
    pub fn class_masks(&self) -> Vec<(usize, Array2<u8>)> {
        (1..self.classes)
            .map(|class| {
                let mask = self
                    .labels
                    .mapv(|label| if label as usize == class { 255 } else { 0 });
                (class, mask)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Log lines at warn level or above emitted while `f` runs.
    fn warnings_from(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn argmax_picks_highest_score() {
        // 1x3 pixels, 3 classes
        let bytes = [10, 20, 5, 0, 0, 0, 7, 7, 9];
        let raster = rasterize(&bytes, 1, 3);
        assert_eq!(raster.classes(), 3);
        assert_eq!(raster.labels().as_slice().unwrap(), &[1, 0, 2]);
        assert_eq!(raster.scores().as_slice().unwrap(), &[20, 0, 9]);
    }

    #[test]
    fn ties_keep_the_first_class() {
        let bytes = [0, 90, 90, 90];
        let raster = rasterize(&bytes, 1, 1);
        assert_eq!(raster.labels()[[0, 0]], 1);
        assert_eq!(raster.scores()[[0, 0]], 90);
    }

    #[test]
    fn class_count_rounds() {
        assert_eq!(class_count(32, 4, 4), 2);
        assert_eq!(class_count(33, 4, 4), 2);
        assert_eq!(class_count(40, 4, 4), 3);
        assert_eq!(class_count(10, 0, 4), 0);
    }

    #[test]
    fn uneven_length_is_reported() {
        let log = warnings_from(|| assert_eq!(class_count(33, 4, 4), 2));
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("mask length 33 is not a multiple of 4x4"), "{log}");

        let log = warnings_from(|| assert_eq!(class_count(32, 4, 4), 2));
        assert!(log.is_empty(), "{log}");
    }

    #[test]
    fn short_buffer_reads_zero() {
        // 2 pixels, 3 classes declared by rounding, last pixel truncated
        let bytes = [1, 2, 3, 9, 1];
        let raster = rasterize(&bytes, 1, 2);
        assert_eq!(raster.classes(), 3);
        assert_eq!(raster.labels().as_slice().unwrap(), &[2, 0]);
        assert_eq!(raster.scores().as_slice().unwrap(), &[3, 9]);
    }

    #[test]
    fn rgba_scales_palette_by_score() {
        let bytes = [0, 255, 0, 0, 0, 0];
        let raster = rasterize(&bytes, 1, 2);
        let rgba = raster.to_rgba8();
        assert_eq!(&rgba[..4], &[230, 25, 75, 200]);
        assert_eq!(&rgba[4..], &[0, 0, 0, 0]);

        let half = rasterize(&[0, 51], 1, 1).to_rgba8();
        assert_eq!(half, vec![46, 5, 15, 200]);
    }

    #[test]
    fn classes_past_the_palette_are_white() {
        let mut bytes = vec![0u8; 30];
        bytes[25] = 255;
        let rgba = rasterize(&bytes, 1, 1).to_rgba8();
        assert_eq!(rgba, vec![255, 255, 255, 255]);
    }

    #[test]
    fn class_masks_skip_background() {
        let bytes = [9, 1, 0, 0, 2, 8, 0, 5, 1];
        let raster = rasterize(&bytes, 1, 3);
        let masks = raster.class_masks();
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].0, 1);
        assert_eq!(masks[0].1.as_slice().unwrap(), &[0, 0, 255]);
        assert_eq!(masks[1].0, 2);
        assert_eq!(masks[1].1.as_slice().unwrap(), &[0, 255, 0]);
    }

    proptest! {
        #[test]
        fn zero_score_only_when_all_scores_are_zero(
            scores in proptest::collection::vec(any::<u8>(), 1..8)
        ) {
            let raster = rasterize(&scores, 1, 1);
            let label = raster.labels()[[0, 0]] as usize;
            let best = *scores.iter().max().unwrap();
            prop_assert_eq!(raster.scores()[[0, 0]], best);
            prop_assert_eq!(label, scores.iter().position(|&s| s == best).unwrap_or(0));
            if best > 0 {
                prop_assert!(scores[label] > 0);
            } else {
                prop_assert_eq!(label, 0);
            }
        }
    }
}
