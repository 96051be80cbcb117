// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

/// Bounds-checked element access where a read past the end of the buffer is
/// defined as zero.
///
/// Mask scores and radar cube amplitudes are indexed with arithmetic derived
/// from the message's declared dimensions, which may disagree with the actual
/// payload length. Every such read goes through this trait.
pub trait Buffer<T> {
    fn get_or_zero(&self, index: usize) -> T;
}

impl<T: Copy + Default> Buffer<T> for [T] {
    fn get_or_zero(&self, index: usize) -> T {
        self.get(index).copied().unwrap_or_default()
    }
}

impl<T: Copy + Default> Buffer<T> for Vec<T> {
    fn get_or_zero(&self, index: usize) -> T {
        self.as_slice().get_or_zero(index)
    }
}
