// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Controller symbol table
//!
//! Maps controller action names ("LEFT STICK LEFT", "A") to the
//! `(result_type, result_value)` pair the interception engine feeds to its
//! virtual gamepad. Every pair is unique, so the reverse lookup is exact.
//!
//! Values follow XInput conventions:
//! - Stick axes: ±32767 (`thumb_ly`/`thumb_ry` positive is up)
//! - Triggers: 255 (fully pressed)
//! - Buttons: `XINPUT_GAMEPAD_*` bitmask

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Output channel on the virtual gamepad
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ControllerResultType {
    /// Digital button (value is a button bitmask)
    FaceButton,
    /// Left analog trigger
    TriggerL,
    /// Right analog trigger
    TriggerR,
    /// Left stick, horizontal axis
    ThumbLx,
    /// Left stick, vertical axis
    ThumbLy,
    /// Right stick, horizontal axis
    ThumbRx,
    /// Right stick, vertical axis
    ThumbRy,
}

impl ControllerResultType {
    /// Tag written to a record's `result_type`
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerResultType::FaceButton => "face_button",
            ControllerResultType::TriggerL => "trigger_l",
            ControllerResultType::TriggerR => "trigger_r",
            ControllerResultType::ThumbLx => "thumb_lx",
            ControllerResultType::ThumbLy => "thumb_ly",
            ControllerResultType::ThumbRx => "thumb_rx",
            ControllerResultType::ThumbRy => "thumb_ry",
        }
    }
}

impl fmt::Display for ControllerResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControllerResultType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "face_button" => Ok(ControllerResultType::FaceButton),
            "trigger_l" => Ok(ControllerResultType::TriggerL),
            "trigger_r" => Ok(ControllerResultType::TriggerR),
            "thumb_lx" => Ok(ControllerResultType::ThumbLx),
            "thumb_ly" => Ok(ControllerResultType::ThumbLy),
            "thumb_rx" => Ok(ControllerResultType::ThumbRx),
            "thumb_ry" => Ok(ControllerResultType::ThumbRy),
            _ => Err(()),
        }
    }
}

/// A resolved controller output
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ControllerResult {
    /// Output channel
    pub result_type: ControllerResultType,
    /// Axis deflection, trigger pressure or button mask
    pub result_value: i32,
}

impl ControllerResult {
    const fn new(result_type: ControllerResultType, result_value: i32) -> Self {
        Self {
            result_type,
            result_value,
        }
    }
}

const AXIS_MAX: i32 = 32767;
const TRIGGER_MAX: i32 = 255;

use ControllerResultType::*;

const CONTROLLER_OUTPUTS: &[(&str, ControllerResult)] = &[
    ("LEFT STICK LEFT", ControllerResult::new(ThumbLx, -AXIS_MAX)),
    ("LEFT STICK RIGHT", ControllerResult::new(ThumbLx, AXIS_MAX)),
    ("LEFT STICK UP", ControllerResult::new(ThumbLy, AXIS_MAX)),
    ("LEFT STICK DOWN", ControllerResult::new(ThumbLy, -AXIS_MAX)),
    ("RIGHT STICK LEFT", ControllerResult::new(ThumbRx, -AXIS_MAX)),
    ("RIGHT STICK RIGHT", ControllerResult::new(ThumbRx, AXIS_MAX)),
    ("RIGHT STICK UP", ControllerResult::new(ThumbRy, AXIS_MAX)),
    ("RIGHT STICK DOWN", ControllerResult::new(ThumbRy, -AXIS_MAX)),
    ("LEFT TRIGGER", ControllerResult::new(TriggerL, TRIGGER_MAX)),
    ("RIGHT TRIGGER", ControllerResult::new(TriggerR, TRIGGER_MAX)),
    ("DPAD UP", ControllerResult::new(FaceButton, 0x0001)),
    ("DPAD DOWN", ControllerResult::new(FaceButton, 0x0002)),
    ("DPAD LEFT", ControllerResult::new(FaceButton, 0x0004)),
    ("DPAD RIGHT", ControllerResult::new(FaceButton, 0x0008)),
    ("START", ControllerResult::new(FaceButton, 0x0010)),
    ("BACK", ControllerResult::new(FaceButton, 0x0020)),
    ("LEFT STICK BUTTON", ControllerResult::new(FaceButton, 0x0040)),
    ("RIGHT STICK BUTTON", ControllerResult::new(FaceButton, 0x0080)),
    ("LEFT BUMPER", ControllerResult::new(FaceButton, 0x0100)),
    ("RIGHT BUMPER", ControllerResult::new(FaceButton, 0x0200)),
    ("GUIDE", ControllerResult::new(FaceButton, 0x0400)),
    ("A", ControllerResult::new(FaceButton, 0x1000)),
    ("B", ControllerResult::new(FaceButton, 0x2000)),
    ("X", ControllerResult::new(FaceButton, 0x4000)),
    ("Y", ControllerResult::new(FaceButton, 0x8000)),
];

static GLOBAL: LazyLock<ControllerOutputTable> = LazyLock::new(ControllerOutputTable::new);

/// Bidirectional action name ⇄ controller result lookup
#[derive(Debug)]
pub struct ControllerOutputTable {
    by_action: HashMap<&'static str, ControllerResult>,
    by_result: HashMap<ControllerResult, &'static str>,
}

impl ControllerOutputTable {
    /// Builds the table and its reverse index
    pub fn new() -> Self {
        let mut by_action = HashMap::with_capacity(CONTROLLER_OUTPUTS.len());
        let mut by_result = HashMap::with_capacity(CONTROLLER_OUTPUTS.len());

        for &(action, result) in CONTROLLER_OUTPUTS {
            by_action.insert(action, result);
            by_result.insert(result, action);
        }

        Self {
            by_action,
            by_result,
        }
    }

    /// Shared instance, built on first use
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Action name → result. `None` when the action is unknown.
    pub fn action_to_result(&self, action: &str) -> Option<ControllerResult> {
        self.by_action.get(action).copied()
    }

    /// Raw record fields → action name
    ///
    /// `None` when `result_type` is not a controller tag or the pair has no
    /// table entry.
    pub fn result_to_action(&self, result_type: &str, result_value: i32) -> Option<&'static str> {
        let result_type = result_type.parse().ok()?;
        self.by_result
            .get(&ControllerResult::new(result_type, result_value))
            .copied()
    }

    /// True if `result_type` names a controller output channel
    pub fn is_controller_tag(&self, result_type: &str) -> bool {
        result_type.parse::<ControllerResultType>().is_ok()
    }

    /// All action names in table order
    pub fn actions(&self) -> Vec<&'static str> {
        CONTROLLER_OUTPUTS.iter().map(|&(action, _)| action).collect()
    }

    /// Number of actions in the table
    pub fn len(&self) -> usize {
        self.by_action.len()
    }

    /// True if the table holds no actions
    pub fn is_empty(&self) -> bool {
        self.by_action.is_empty()
    }
}

impl Default for ControllerOutputTable {
    fn default() -> Self {
        Self::new()
    }
}
