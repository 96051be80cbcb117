// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Colors for segmentation classes, detection labels and tracks.

use foxglove::schemas::Color;

pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
pub const WHITE_RGBA8: [u8; 4] = [255, 255, 255, 255];
pub const TRANSPARENT: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.0 };

// https://sashamaps.net/docs/resources/20-colors/
// Class 0 is the background and stays fully transparent.
pub const CLASS_COLORS_RGBA8: [[u8; 4]; 21] = [
    [0, 0, 0, 0],
    [230, 25, 75, 200],
    [60, 180, 75, 200],
    [255, 225, 25, 200],
    [0, 130, 200, 200],
    [245, 130, 48, 200],
    [145, 30, 180, 200],
    [70, 240, 240, 200],
    [240, 50, 230, 200],
    [210, 245, 60, 200],
    [250, 190, 212, 200],
    [0, 128, 128, 200],
    [220, 190, 255, 200],
    [170, 110, 40, 200],
    [255, 250, 200, 200],
    [128, 0, 0, 200],
    [170, 255, 195, 200],
    [128, 128, 0, 200],
    [255, 215, 180, 200],
    [0, 0, 128, 200],
    [128, 128, 128, 200],
];

/// 8-bit palette entry of a class, opaque white past the end of the palette.
pub fn rgba8_for(class: usize) -> [u8; 4] {
    CLASS_COLORS_RGBA8
        .get(class)
        .copied()
        .unwrap_or(WHITE_RGBA8)
}

/// Normalized palette entry of a class, [`WHITE`] past the end of the palette.
pub fn color_for(class: usize) -> Color {
    match CLASS_COLORS_RGBA8.get(class) {
        Some(&[r, g, b, a]) => Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        },
        None => WHITE,
    }
}

/// Color from the first eight hex digits of a track UUID. Dashes and dots are
/// skipped.
pub fn uuid_to_color(id: &str) -> Color {
    let mut hexcode: u32 = 0;
    let mut digits = 0;
    for c in id.chars() {
        if c == '-' || c == '.' {
            continue;
        }
        let c = c as u32;
        let val = if c >= 'a' as u32 {
            c - 'a' as u32 + 10
        } else if c >= 'A' as u32 {
            c - 'A' as u32 + 10
        } else if c >= '0' as u32 {
            c - '0' as u32
        } else {
            0
        };
        hexcode = (hexcode << 4).wrapping_add(val);

        digits += 1;
        if digits >= 8 {
            break;
        }
    }

    Color {
        r: ((hexcode >> 24) & 0xff) as f64 / 255.0,
        g: ((hexcode >> 16) & 0xff) as f64 / 255.0,
        b: ((hexcode >> 8) & 0xff) as f64 / 255.0,
        a: 1.0,
    }
}

/// 53-bit cyrb53 string hash over UTF-16 code units.
pub fn cyrb53(s: &str, seed: u32) -> u64 {
    let mut h1: u32 = 0xdeadbeef ^ seed;
    let mut h2: u32 = 0x41c6ce57 ^ seed;
    for ch in s.encode_utf16() {
        let ch = ch as u32;
        h1 = (h1 ^ ch).wrapping_mul(2654435761);
        h2 = (h2 ^ ch).wrapping_mul(1597334677);
    }
    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2246822507);
    h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(3266489909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2246822507);
    h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(3266489909);

    (((h2 & 0x1fffff) as u64) << 32) | h1 as u64
}

/// Stable color for a detection label.
pub fn str_to_color(s: &str) -> Color {
    let hash = cyrb53(s, 0) as u32;
    Color {
        r: (hash & 0xff) as f64 / 0xff as f64,
        g: (hash & 0xff00) as f64 / 0xff00 as f64,
        // extra zero in the divisor matches the deployed label colors
        b: (hash & 0xff0000) as f64 / 0xff00000 as f64,
        a: 1.0,
    }
}
