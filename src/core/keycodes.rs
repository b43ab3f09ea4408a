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

//! Keyboard symbol table
//!
//! Maps key names to the Windows virtual-key codes the interception engine
//! stores in its config. Both directions are O(1): the reverse index is
//! built once when the table is constructed.
//!
//! Key names are upper case ("Q", "LEFT", "F1", "NUMPAD0"). Punctuation keys
//! use their unshifted glyph (";", "[", "`").

use std::collections::HashMap;
use std::sync::LazyLock;

/// Windows virtual-key code
pub type KeyCode = u32;

const KEY_CODES: &[(&str, KeyCode)] = &[
    ("BACKSPACE", 0x08),
    ("TAB", 0x09),
    ("CLEAR", 0x0C),
    ("ENTER", 0x0D),
    ("SHIFT", 0x10),
    ("CTRL", 0x11),
    ("ALT", 0x12),
    ("PAUSE", 0x13),
    ("CAPSLOCK", 0x14),
    ("ESCAPE", 0x1B),
    ("SPACE", 0x20),
    ("PAGEUP", 0x21),
    ("PAGEDOWN", 0x22),
    ("END", 0x23),
    ("HOME", 0x24),
    ("LEFT", 0x25),
    ("UP", 0x26),
    ("RIGHT", 0x27),
    ("DOWN", 0x28),
    ("PRINTSCREEN", 0x2C),
    ("INSERT", 0x2D),
    ("DELETE", 0x2E),
    ("0", 0x30),
    ("1", 0x31),
    ("2", 0x32),
    ("3", 0x33),
    ("4", 0x34),
    ("5", 0x35),
    ("6", 0x36),
    ("7", 0x37),
    ("8", 0x38),
    ("9", 0x39),
    ("A", 0x41),
    ("B", 0x42),
    ("C", 0x43),
    ("D", 0x44),
    ("E", 0x45),
    ("F", 0x46),
    ("G", 0x47),
    ("H", 0x48),
    ("I", 0x49),
    ("J", 0x4A),
    ("K", 0x4B),
    ("L", 0x4C),
    ("M", 0x4D),
    ("N", 0x4E),
    ("O", 0x4F),
    ("P", 0x50),
    ("Q", 0x51),
    ("R", 0x52),
    ("S", 0x53),
    ("T", 0x54),
    ("U", 0x55),
    ("V", 0x56),
    ("W", 0x57),
    ("X", 0x58),
    ("Y", 0x59),
    ("Z", 0x5A),
    ("LMETA", 0x5B),
    ("RMETA", 0x5C),
    ("MENU", 0x5D),
    ("NUMPAD0", 0x60),
    ("NUMPAD1", 0x61),
    ("NUMPAD2", 0x62),
    ("NUMPAD3", 0x63),
    ("NUMPAD4", 0x64),
    ("NUMPAD5", 0x65),
    ("NUMPAD6", 0x66),
    ("NUMPAD7", 0x67),
    ("NUMPAD8", 0x68),
    ("NUMPAD9", 0x69),
    ("NUMPAD*", 0x6A),
    ("NUMPAD+", 0x6B),
    ("NUMPAD-", 0x6D),
    ("NUMPAD.", 0x6E),
    ("NUMPAD/", 0x6F),
    ("F1", 0x70),
    ("F2", 0x71),
    ("F3", 0x72),
    ("F4", 0x73),
    ("F5", 0x74),
    ("F6", 0x75),
    ("F7", 0x76),
    ("F8", 0x77),
    ("F9", 0x78),
    ("F10", 0x79),
    ("F11", 0x7A),
    ("F12", 0x7B),
    ("F13", 0x7C),
    ("F14", 0x7D),
    ("F15", 0x7E),
    ("F16", 0x7F),
    ("F17", 0x80),
    ("F18", 0x81),
    ("F19", 0x82),
    ("F20", 0x83),
    ("F21", 0x84),
    ("F22", 0x85),
    ("F23", 0x86),
    ("F24", 0x87),
    ("NUMLOCK", 0x90),
    ("SCROLLLOCK", 0x91),
    ("LSHIFT", 0xA0),
    ("RSHIFT", 0xA1),
    ("LCTRL", 0xA2),
    ("RCTRL", 0xA3),
    ("LALT", 0xA4),
    ("RALT", 0xA5),
    (";", 0xBA),
    ("=", 0xBB),
    (",", 0xBC),
    ("-", 0xBD),
    (".", 0xBE),
    ("/", 0xBF),
    ("`", 0xC0),
    ("[", 0xDB),
    ("\\", 0xDC),
    ("]", 0xDD),
    ("'", 0xDE),
];

/// DOM `KeyboardEvent.code` / `.key` spellings that differ from table names
const KEY_ALIASES: &[(&str, &str)] = &[
    ("ARROWLEFT", "LEFT"),
    ("ARROWUP", "UP"),
    ("ARROWRIGHT", "RIGHT"),
    ("ARROWDOWN", "DOWN"),
    ("ESC", "ESCAPE"),
    ("RETURN", "ENTER"),
    ("NUMPADENTER", "ENTER"),
    (" ", "SPACE"),
    ("SHIFTLEFT", "LSHIFT"),
    ("SHIFTRIGHT", "RSHIFT"),
    ("CONTROL", "CTRL"),
    ("CONTROLLEFT", "LCTRL"),
    ("CONTROLRIGHT", "RCTRL"),
    ("ALTLEFT", "LALT"),
    ("ALTRIGHT", "RALT"),
    ("METALEFT", "LMETA"),
    ("METARIGHT", "RMETA"),
    ("CONTEXTMENU", "MENU"),
    ("SEMICOLON", ";"),
    ("EQUAL", "="),
    ("COMMA", ","),
    ("MINUS", "-"),
    ("PERIOD", "."),
    ("SLASH", "/"),
    ("BACKQUOTE", "`"),
    ("BRACKETLEFT", "["),
    ("BACKSLASH", "\\"),
    ("BRACKETRIGHT", "]"),
    ("QUOTE", "'"),
    ("NUMPADMULTIPLY", "NUMPAD*"),
    ("NUMPADADD", "NUMPAD+"),
    ("NUMPADSUBTRACT", "NUMPAD-"),
    ("NUMPADDECIMAL", "NUMPAD."),
    ("NUMPADDIVIDE", "NUMPAD/"),
];

static GLOBAL: LazyLock<KeyCodeTable> = LazyLock::new(KeyCodeTable::new);

/// Bidirectional key name ⇄ key code lookup
#[derive(Debug)]
pub struct KeyCodeTable {
    by_name: HashMap<&'static str, KeyCode>,
    by_code: HashMap<KeyCode, &'static str>,
    aliases: HashMap<&'static str, &'static str>,
}

impl KeyCodeTable {
    /// Builds the table and its reverse index
    pub fn new() -> Self {
        let mut by_name = HashMap::with_capacity(KEY_CODES.len());
        let mut by_code = HashMap::with_capacity(KEY_CODES.len());

        for &(name, code) in KEY_CODES {
            by_name.insert(name, code);
            by_code.insert(code, name);
        }

        Self {
            by_name,
            by_code,
            aliases: KEY_ALIASES.iter().copied().collect(),
        }
    }

    /// Shared instance, built on first use
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Key name → code. `None` when the name is not in the table.
    pub fn name_to_code(&self, name: &str) -> Option<KeyCode> {
        self.by_name.get(name).copied()
    }

    /// Key code → name. `None` when no key has that code.
    pub fn code_to_name(&self, code: KeyCode) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// Resolves a loosely spelled key name to its canonical table name
    ///
    /// Accepts table names in any case, DOM `KeyboardEvent.code` values
    /// ("KeyQ", "Digit1", "ArrowLeft", "Numpad5") and the aliases above.
    pub fn normalize(&self, raw: &str) -> Option<&'static str> {
        let upper = raw.to_uppercase();

        let candidate = if let Some(rest) = upper.strip_prefix("KEY").filter(|r| r.len() == 1) {
            rest.to_string()
        } else if let Some(rest) = upper.strip_prefix("DIGIT") {
            rest.to_string()
        } else {
            upper
        };

        if let Some((&name, _)) = self.by_name.get_key_value(candidate.as_str()) {
            return Some(name);
        }

        self.aliases.get(candidate.as_str()).copied()
    }

    /// All key names, ordered by key code
    pub fn names(&self) -> Vec<&'static str> {
        KEY_CODES.iter().map(|&(name, _)| name).collect()
    }

    /// Number of keys in the table
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True if the table holds no keys
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for KeyCodeTable {
    fn default() -> Self {
        Self::new()
    }
}
