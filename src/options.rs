// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! User-selected display options shared by the converters.
//!
//! The viewer exposes three variables: `box_label` picks how detection boxes
//! are labelled, `radar_seq` and `radar_rx` pick which slice of the radar cube
//! is rendered. Converters receive a [`DisplayOptions`] value on every call;
//! the host keeps the live copy in [`SharedOptions`] and updates it whenever
//! the variables change.

use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};
use tracing::debug;

pub const BOX_LABEL_VAR: &str = "box_label";
pub const RADAR_SEQ_VAR: &str = "radar_seq";
pub const RADAR_RX_VAR: &str = "radar_rx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    Label,
    Score,
    LabelScore,
    /// Track id and track color, falling back to the label for untracked
    /// boxes. Any unrecognized mode selects this one.
    #[default]
    Track,
}

impl LabelMode {
    pub fn from_variable(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "label" => LabelMode::Label,
            "score" => LabelMode::Score,
            "label-score" => LabelMode::LabelScore,
            _ => LabelMode::Track,
        }
    }
}

/// Which 2D slice of the radar cube to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RadarSelection {
    /// `"A"`, `"B"` or empty (same as `"B"`). Anything else renders nothing.
    pub sequence: String,
    /// Receive channel. Negative values render nothing.
    pub rx: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub label_mode: LabelMode,
    pub radar: RadarSelection,
    /// Render the radar range axis bottom-up.
    pub radar_flip: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::default(),
            radar: RadarSelection::default(),
            radar_flip: true,
        }
    }
}

impl DisplayOptions {
    /// Applies the viewer's variables. Missing variables reset to their
    /// defaults, an rx that is not a finite integer becomes `-1`.
    pub fn apply_variables(&mut self, variables: &Map<String, Value>) {
        self.label_mode = LabelMode::from_variable(&variable_text(variables.get(BOX_LABEL_VAR)));
        self.radar.sequence = variable_text(variables.get(RADAR_SEQ_VAR));
        self.radar.rx = match variable_number(variables.get(RADAR_RX_VAR)) {
            rx if rx.is_finite() && rx.fract() == 0.0 => rx as i64,
            _ => -1,
        };
        debug!(
            "display options: label {:?}, radar sequence {:?} rx {}",
            self.label_mode, self.radar.sequence, self.radar.rx
        );
    }
}

fn variable_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn variable_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(_) => f64::NAN,
    }
}

/// Live display options, written by the host's settings callback and read at
/// the start of every conversion.
#[derive(Debug, Clone, Default)]
pub struct SharedOptions {
    inner: Arc<RwLock<DisplayOptions>>,
}

impl SharedOptions {
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(options)),
        }
    }

    pub fn snapshot(&self) -> DisplayOptions {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn apply_variables(&self, variables: &Map<String, Value>) {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .apply_variables(variables);
    }
}
