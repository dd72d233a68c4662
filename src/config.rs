//! Configuration tables: gaps, auto-assignment rules, and global
//! hotkey bindings. Everything here is a fixed-capacity table populated at
//! startup from built-in defaults and optionally extended programmatically;
//! parsing an on-disk format is explicitly out of scope (see
//! [`WMConfig::load`]).

use std::path::Path;

use bitflags::bitflags;
use stdext::function_name;
use tracing::warn;

use crate::actions::Action;
use crate::errors::{Error, Result};
use crate::geometry::Gap;
use crate::registry::BUNDLE_ID_MAX;

pub const MAX_RULES: usize = 64;
pub const MAX_BINDINGS: usize = 64;

bitflags! {
    /// Modifier bitmask. Masks are compared by equality, not subset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const OPT = 1 << 0;
        const SHIFT = 1 << 1;
        const CMD = 1 << 2;
        const CTRL = 1 << 3;
    }
}

/// An auto-assignment rule: bundle identifier -> target buffer.
#[derive(Debug, Clone)]
pub struct Rule {
    pub bundle_identifier: String,
    pub target_buffer: usize,
}

/// A global hotkey binding: modifiers + keycode -> action.
#[derive(Debug, Clone)]
pub struct Binding {
    pub modifiers: Modifiers,
    pub keycode: u16,
    pub action: Action,
}

/// OS-level scancodes for the digit row `1..5` on a macOS-style keyboard.
const DIGIT_KEYCODES: [u16; 5] = [18, 19, 20, 21, 23];
const KEYCODE_P: u16 = 35;

/// Global configuration: gaps, rules, bindings.
pub struct WMConfig {
    pub gaps_outer: Gap,
    pub gaps_inner: Gap,
    rules: Vec<Rule>,
    bindings: Vec<Binding>,
}

impl Default for WMConfig {
    fn default() -> Self {
        let mut config = WMConfig {
            gaps_outer: Gap::default(),
            gaps_inner: Gap::default(),
            rules: Vec::new(),
            bindings: Vec::new(),
        };
        config.init();
        config
    }
}

impl WMConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets gaps, rules and bindings to the built-in defaults.
    pub fn init(&mut self) {
        self.gaps_outer = Gap::all(12);
        self.gaps_inner = Gap::all(8);
        self.rules.clear();
        self.bindings.clear();

        for (i, &keycode) in DIGIT_KEYCODES.iter().enumerate() {
            self.add_binding(Modifiers::OPT, keycode, Action::SwitchBuffer(i));
            self.add_binding(
                Modifiers::SHIFT | Modifiers::OPT,
                keycode,
                Action::MoveBuffer(0, i),
            );
        }
        self.add_binding(Modifiers::SHIFT | Modifiers::OPT, KEYCODE_P, Action::TogglePassthrough);
    }

    /// Stub: does not parse `path` (no file format is defined by this
    /// crate), resets the config to built-in defaults, and reports
    /// success. A real adapter implements file parsing itself and calls
    /// [`WMConfig::add_rule`]/[`WMConfig::add_binding`] programmatically.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        warn!(path = %path.display(), "config_load is a stub; resetting to built-in defaults");
        self.init();
        Ok(())
    }

    /// Adds a rule. `false` if the table is full or `bundle_identifier` is
    /// empty.
    pub fn add_rule(&mut self, bundle_identifier: &str, target_buffer: usize) -> bool {
        if bundle_identifier.is_empty() || self.rules.len() >= MAX_RULES {
            return false;
        }
        self.rules.push(Rule {
            bundle_identifier: truncate(bundle_identifier),
            target_buffer,
        });
        true
    }

    /// First exact-string match wins; `None` on miss.
    pub fn match_rule(&self, bundle_identifier: &str) -> Option<usize> {
        self.rules
            .iter()
            .find(|rule| rule.bundle_identifier == bundle_identifier)
            .map(|rule| rule.target_buffer)
    }

    /// Adds a binding. `false` if the table is full.
    pub fn add_binding(&mut self, modifiers: Modifiers, keycode: u16, action: Action) -> bool {
        if self.bindings.len() >= MAX_BINDINGS {
            return false;
        }
        self.bindings.push(Binding { modifiers, keycode, action });
        true
    }

    /// First `(modifier_mask, keycode)` exact match wins (mask equality,
    /// not subset); `None` on miss.
    pub fn match_binding(&self, modifiers: Modifiers, keycode: u16) -> Option<Action> {
        self.bindings
            .iter()
            .find(|binding| binding.modifiers == modifiers && binding.keycode == keycode)
            .map(|binding| binding.action.clone())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

fn truncate(bundle_identifier: &str) -> String {
    if bundle_identifier.len() < BUNDLE_ID_MAX {
        return bundle_identifier.to_owned();
    }
    let mut end = BUNDLE_ID_MAX - 1;
    while !bundle_identifier.is_char_boundary(end) {
        end -= 1;
    }
    bundle_identifier[..end].to_owned()
}

/// Parses a `"mod+mod-..."` style modifier spec, matching the compact
/// keybinding syntax this lineage favors over a verbose struct-of-bools.
/// Unknown tokens are rejected rather than silently ignored.
pub fn parse_modifiers(input: &str) -> Result<Modifiers> {
    let mut mods = Modifiers::empty();
    for token in input.split(['+', '-']) {
        match token.to_ascii_lowercase().as_str() {
            "opt" | "alt" => mods |= Modifiers::OPT,
            "shift" => mods |= Modifiers::SHIFT,
            "cmd" | "super" => mods |= Modifiers::CMD,
            "ctrl" | "control" => mods |= Modifiers::CTRL,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "{}: unknown modifier `{other}`",
                    function_name!()
                )))
            }
        }
    }
    Ok(mods)
}
