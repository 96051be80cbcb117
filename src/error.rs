// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::decompress::DecoderState;

/// Failures inside a conversion. Converters fold these into a neutral output
/// message, they never cross the public converter functions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("zstd decoder is not ready (state: {0:?})")]
    DecoderNotReady(DecoderState),

    #[error("unsupported payload encoding {0:?}")]
    UnknownEncoding(String),

    #[error("failed to decompress payload: {0}")]
    Decompress(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
