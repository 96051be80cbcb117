// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Optional zstd decompression of mask and cube payloads.
//!
//! The decoder has a one-time startup step that runs in the background. Until
//! it reports [`DecoderState::Ready`] every compressed payload is rejected with
//! [`Error::DecoderNotReady`] so converters can answer with an empty message
//! instead of waiting.

use crate::error::{Error, Result};
use std::{
    borrow::Cow,
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};
use tracing::{debug, warn};
use zstd::stream::decode_all;

/// Payload encodings carried in the `encoding` field of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    None,
    Zstd,
}

impl Encoding {
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "" | "none" => Ok(Encoding::None),
            "zstd" => Ok(Encoding::Zstd),
            other => Err(Error::UnknownEncoding(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DecoderState {
    Uninitialized = 0,
    Ready = 1,
    Failed = 2,
}

impl From<u8> for DecoderState {
    fn from(value: u8) -> Self {
        match value {
            1 => DecoderState::Ready,
            2 => DecoderState::Failed,
            _ => DecoderState::Uninitialized,
        }
    }
}

/// Handle on the shared decoder readiness. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct Decompressor {
    state: Arc<AtomicU8>,
}

impl Decompressor {
    /// A decoder that has not been initialized yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that is usable immediately.
    pub fn ready() -> Self {
        let decoder = Self::new();
        decoder.set_state(DecoderState::Ready);
        decoder
    }

    pub fn state(&self) -> DecoderState {
        DecoderState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == DecoderState::Ready
    }

    fn set_state(&self, state: DecoderState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Runs the startup round-trip through zstd and records the outcome.
    pub fn initialize(&self) -> DecoderState {
        let state = match warm_up() {
            Ok(()) => DecoderState::Ready,
            Err(e) => {
                warn!("Could not load zstd: {e}");
                DecoderState::Failed
            }
        };
        self.set_state(state);
        state
    }

    /// Initializes the decoder on the blocking pool of the current tokio
    /// runtime. Conversions running meanwhile see the decoder as not ready.
    pub fn spawn_init(&self) -> tokio::task::JoinHandle<DecoderState> {
        let decoder = self.clone();
        tokio::task::spawn_blocking(move || decoder.initialize())
    }

    /// Returns the payload bytes, decompressed when `encoding` asks for it.
    pub fn decompress<'a>(&self, payload: &'a [u8], encoding: &str) -> Result<Cow<'a, [u8]>> {
        match Encoding::parse(encoding)? {
            Encoding::None => Ok(Cow::Borrowed(payload)),
            Encoding::Zstd => {
                let state = self.state();
                if state != DecoderState::Ready {
                    return Err(Error::DecoderNotReady(state));
                }
                let bytes = decode_all(Cursor::new(payload))?;
                debug!("decompressed {} bytes into {}", payload.len(), bytes.len());
                Ok(Cow::Owned(bytes))
            }
        }
    }
}

fn warm_up() -> std::io::Result<()> {
    let probe = b"edgefirst";
    let frame = zstd::bulk::compress(probe, 1)?;
    let restored = decode_all(Cursor::new(frame))?;
    if restored != probe {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "zstd round-trip mismatch",
        ));
    }
    Ok(())
}
