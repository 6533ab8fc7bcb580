//! Keyboard and mouse bindings: a compact trigger (key or button, modifiers,
//! flags) mapped to an ordered list of [crate::action::Action]s, matched with
//! ignore-modifier masking so locks like CapsLock or NumLock don't break a
//! configured binding.
use crate::action::Action;
use fensterchef_keysyms::XKeySym;

bitflags::bitflags! {
    /// X11 modifier mask bits, named the way `keybind.c` names them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierSet: u16 {
        const SHIFT   = 0b0000_0001;
        const LOCK    = 0b0000_0010;
        const CONTROL = 0b0000_0100;
        const MOD1    = 0b0000_1000;
        const MOD2    = 0b0001_0000;
        const MOD3    = 0b0010_0000;
        const MOD4    = 0b0100_0000;
        const MOD5    = 0b1000_0000;
    }
}

bitflags::bitflags! {
    /// Per-binding flags from the configuration file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindingFlags: u8 {
        /// Fires on release instead of press.
        const RELEASE = 0b01;
        /// Does not consume the event (does not grab it exclusively).
        const TRANSPARENT = 0b10;
    }
}

/// A physical mouse button, including the two scroll directions X reports
/// as buttons 4/5.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

impl From<u8> for MouseButton {
    fn from(b: u8) -> Self {
        match b {
            1 => Self::Left,
            2 => Self::Middle,
            3 => Self::Right,
            4 => Self::ScrollUp,
            5 => Self::ScrollDown,
            other => Self::Other(other),
        }
    }
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> Self {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
            MouseButton::Other(n) => n,
        }
    }
}

/// A resolved key press: the keysym the transport decoded plus the modifier
/// mask active at the time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct KeyCode {
    pub symbol: XKeySym,
    pub modifiers: ModifierSet,
}

/// One configured key binding.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub symbol: XKeySym,
    pub modifiers: ModifierSet,
    pub flags: BindingFlags,
    pub actions: Vec<Action>,
}

/// One configured mouse binding.
#[derive(Debug, Clone)]
pub struct MouseBinding {
    pub button: MouseButton,
    pub modifiers: ModifierSet,
    pub flags: BindingFlags,
    pub actions: Vec<Action>,
}

/// The full set of configured bindings plus the modifiers each device class
/// should ignore when matching (e.g. CapsLock/NumLock).
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    pub key_bindings: Vec<KeyBinding>,
    pub mouse_bindings: Vec<MouseBinding>,
    pub ignore_keyboard_modifiers: ModifierSet,
    pub ignore_mouse_modifiers: ModifierSet,
}

/// The result of a successful match: the actions to run and whether the
/// event should be consumed (grabbed) rather than passed through.
pub struct Matched<'a> {
    pub actions: &'a [Action],
    pub consumes: bool,
}

impl BindingTable {
    pub fn match_key(&self, symbol: XKeySym, modifiers: ModifierSet, is_release: bool) -> Option<Matched<'_>> {
        let event_mods = strip(modifiers, self.ignore_keyboard_modifiers);
        self.key_bindings.iter().find_map(|b| {
            let binding_mods = strip(b.modifiers, self.ignore_keyboard_modifiers);
            let wants_release = b.flags.contains(BindingFlags::RELEASE);
            if b.symbol == symbol && binding_mods == event_mods && wants_release == is_release {
                Some(Matched {
                    actions: &b.actions,
                    consumes: !b.flags.contains(BindingFlags::TRANSPARENT),
                })
            } else {
                None
            }
        })
    }

    pub fn match_button(&self, button: MouseButton, modifiers: ModifierSet, is_release: bool) -> Option<Matched<'_>> {
        let event_mods = strip(modifiers, self.ignore_mouse_modifiers);
        self.mouse_bindings.iter().find_map(|b| {
            let binding_mods = strip(b.modifiers, self.ignore_mouse_modifiers);
            let wants_release = b.flags.contains(BindingFlags::RELEASE);
            if b.button == button && binding_mods == event_mods && wants_release == is_release {
                Some(Matched {
                    actions: &b.actions,
                    consumes: !b.flags.contains(BindingFlags::TRANSPARENT),
                })
            } else {
                None
            }
        })
    }

    /// Every modifier combination a binding must be grabbed under so that an
    /// ignored modifier (e.g. CapsLock held down) doesn't prevent the match:
    /// the power set of `ignore_modifiers`, each combined with the binding's
    /// own modifiers.
    pub fn grab_combinations(&self) -> Vec<(XKeySym, ModifierSet)> {
        self.key_bindings
            .iter()
            .flat_map(|b| {
                power_set(self.ignore_keyboard_modifiers)
                    .into_iter()
                    .map(move |extra| (b.symbol, b.modifiers | extra))
            })
            .collect()
    }

    pub fn grab_button_combinations(&self) -> Vec<(MouseButton, ModifierSet)> {
        self.mouse_bindings
            .iter()
            .flat_map(|b| {
                power_set(self.ignore_mouse_modifiers)
                    .into_iter()
                    .map(move |extra| (b.button, b.modifiers | extra))
            })
            .collect()
    }
}

fn strip(modifiers: ModifierSet, ignore: ModifierSet) -> ModifierSet {
    modifiers & !ignore
}

fn power_set(bits: ModifierSet) -> Vec<ModifierSet> {
    let individual: Vec<ModifierSet> = bits.iter().collect();
    let mut out = Vec::with_capacity(1 << individual.len());
    for mask in 0u32..(1u32 << individual.len()) {
        let mut combo = ModifierSet::empty();
        for (i, bit) in individual.iter().enumerate() {
            if mask & (1 << i) != 0 {
                combo |= *bit;
            }
        }
        out.push(combo);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, ActionCode, Value};
    use fensterchef_keysyms::XKeySym;

    fn binding(symbol: XKeySym, modifiers: ModifierSet) -> KeyBinding {
        KeyBinding {
            symbol,
            modifiers,
            flags: BindingFlags::empty(),
            actions: vec![Action {
                code: ActionCode::NextWindow,
                parameter: Value::Void,
            }],
        }
    }

    #[test]
    fn match_ignores_configured_modifiers() {
        let mut table = BindingTable::default();
        table.ignore_keyboard_modifiers = ModifierSet::LOCK;
        table
            .key_bindings
            .push(binding(XKeySym::XK_Tab, ModifierSet::MOD4));

        let m = table
            .match_key(XKeySym::XK_Tab, ModifierSet::MOD4 | ModifierSet::LOCK, false)
            .expect("should match with CapsLock held");
        assert_eq!(m.actions.len(), 1);
    }

    #[test]
    fn release_flag_requires_release_event() {
        let mut table = BindingTable::default();
        table.key_bindings.push(KeyBinding {
            flags: BindingFlags::RELEASE,
            ..binding(XKeySym::XK_Tab, ModifierSet::empty())
        });
        assert!(table.match_key(XKeySym::XK_Tab, ModifierSet::empty(), false).is_none());
        assert!(table.match_key(XKeySym::XK_Tab, ModifierSet::empty(), true).is_some());
    }

    #[test]
    fn grab_combinations_cover_the_power_set_of_ignored_modifiers() {
        let mut table = BindingTable::default();
        table.ignore_keyboard_modifiers = ModifierSet::LOCK | ModifierSet::MOD2;
        table.key_bindings.push(binding(XKeySym::XK_Tab, ModifierSet::MOD4));
        assert_eq!(table.grab_combinations().len(), 4);
    }
}
