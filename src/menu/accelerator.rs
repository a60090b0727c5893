//! Accelerator strings (`"Shift+CmdOrCtrl+Z"`, `"F11"`) parsed for native renderers.
//! The menu model itself keeps them as opaque strings.

use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    /// `CmdOrCtrl`: Command on macOS, Control elsewhere.
    pub cmd_or_ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Function(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerator {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Accelerator {
    pub fn parse(s: &str) -> Result<Self> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        // A trailing "+" is the plus key itself ("CmdOrCtrl++").
        let (head, plus_key) = match s.strip_suffix("++") {
            Some(head) => (head, true),
            None => (s, false),
        };

        for part in head.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "cmdorctrl" | "commandorcontrol" => modifiers.cmd_or_ctrl = true,
                "cmd" | "command" | "super" => modifiers.command = true,
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => {
                    if key.is_some() {
                        bail!("accelerator '{s}' names more than one key");
                    }
                    let parsed = parse_key(part)
                        .ok_or_else(|| anyhow!("unknown key '{part}' in '{s}'"))?;
                    key = Some(parsed);
                }
            }
        }

        if plus_key {
            if key.is_some() {
                bail!("accelerator '{s}' names more than one key");
            }
            key = Some(Key::Char('+'));
        }

        let key = key.ok_or_else(|| anyhow!("accelerator '{s}' has no key"))?;
        Ok(Self { modifiers, key })
    }

    /// Human-readable hint shown next to the label on Windows/Linux.
    pub fn display(&self) -> String {
        let m = &self.modifiers;
        let mut parts: Vec<String> = Vec::new();
        if m.control || m.cmd_or_ctrl {
            parts.push("Ctrl".to_string());
        }
        if m.command {
            parts.push("Win".to_string());
        }
        if m.alt {
            parts.push("Alt".to_string());
        }
        if m.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
            Key::Function(n) => format!("F{n}"),
        });
        parts.join("+")
    }
}

fn parse_key(part: &str) -> Option<Key> {
    let mut chars = part.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Char(c.to_ascii_lowercase()));
    }

    let lower = part.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&n) {
            return Some(Key::Function(n));
        }
    }

    match lower.as_str() {
        "plus" => Some(Key::Char('+')),
        "space" => Some(Key::Char(' ')),
        _ => None,
    }
}
