// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Converters from EdgeFirst perception messages to Foxglove primitives.
//!
//! * [`model::boxes2d::detect_to_annotations`]: detection boxes as image
//!   annotations.
//! * [`fusion::boxes3d::detect_to_scene`]: boxes with a distance as 3D
//!   cuboids.
//! * [`model::mask::mask_to_image`] and [`model::mask::mask_to_annotations`]:
//!   segmentation masks as an overlay image or as class outlines.
//! * [`radar::cube::cube_to_image`]: one radar cube slice as a `mono16` image.
//!
//! Converters never fail. Malformed or undecodable input produces a neutral
//! message (empty annotations, a black image) and a log record.

pub mod buffer;
pub mod decompress;
pub mod error;
pub mod frame;
pub mod fusion;
pub mod model;
pub mod options;
pub mod palette;
pub mod radar;

pub use decompress::{DecoderState, Decompressor};
pub use error::{Error, Result};
pub use options::{DisplayOptions, LabelMode, RadarSelection, SharedOptions};

use clap::Parser;
use serde_json::json;
use zenoh::config::{Config, WhatAmI};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// zenoh connection mode
    #[arg(long, default_value = "peer")]
    mode: WhatAmI,

    /// connect to zenoh endpoints
    #[arg(short, long)]
    remote: Vec<String>,

    /// listen to zenoh endpoints
    #[arg(short, long)]
    listen: Vec<String>,

    /// disable zenoh multicast scouting
    #[arg(long)]
    no_multicast_scouting: bool,

    /// foxglove websocket server address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// foxglove websocket server port
    #[arg(long, default_value_t = 8765)]
    pub port: u16,

    /// box caption: label, score, label-score or track
    #[arg(long, default_value = "track")]
    pub box_label: String,

    /// radar cube sequence: A, B or empty for B
    #[arg(long, default_value = "")]
    pub radar_seq: String,

    /// radar cube receive channel
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub radar_rx: i64,

    /// draw the radar range axis top-down instead of bottom-up
    #[arg(long)]
    pub no_radar_flip: bool,

    /// detection topic
    #[arg(long, default_value = "rt/model/boxes2d")]
    pub boxes_topic: String,

    /// segmentation mask topics
    #[arg(long, default_values = ["rt/model/mask", "rt/model/mask_compressed"])]
    pub mask_topics: Vec<String>,

    /// radar cube topic
    #[arg(long, default_value = "rt/radar/cube")]
    pub radar_topic: String,

    /// topic carrying display variables as a JSON object
    #[arg(long, default_value = "rt/foxglove/variables")]
    pub variables_topic: String,
}

impl Args {
    /// Display options selected on the command line.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            label_mode: LabelMode::from_variable(&self.box_label),
            radar: RadarSelection {
                sequence: self.radar_seq.clone(),
                rx: self.radar_rx,
            },
            radar_flip: !self.no_radar_flip,
        }
    }
}

impl TryFrom<&Args> for Config {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut config = Config::default();

        config
            .insert_json5("mode", &json!(args.mode).to_string())
            .map_err(|e| anyhow::anyhow!("Failed to set Zenoh mode: {}", e))?;

        if !args.remote.is_empty() {
            config
                .insert_json5("connect/endpoints", &json!(args.remote).to_string())
                .map_err(|e| anyhow::anyhow!("Failed to set Zenoh endpoints: {}", e))?;
        }

        if !args.listen.is_empty() {
            config
                .insert_json5("listen/endpoints", &json!(args.listen).to_string())
                .map_err(|e| anyhow::anyhow!("Failed to set Zenoh listen endpoints: {}", e))?;
        }

        if args.no_multicast_scouting {
            config
                .insert_json5("scouting/multicast/enabled", &json!(false).to_string())
                .map_err(|e| anyhow::anyhow!("Failed to disable multicast scouting: {}", e))?;
        }

        config
            .insert_json5("scouting/multicast/interface", &json!("lo").to_string())
            .map_err(|e| anyhow::anyhow!("Failed to set scouting interface: {}", e))?;

        Ok(config)
    }
}
