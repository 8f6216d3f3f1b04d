//! Handheld keyboard to remote keysym translation.
//!
//! The keyboard has no dedicated symbol row, so most physical keys carry up
//! to three meanings selected by the shift- and alt-equivalent keys. Each key
//! is described by one [`Binding`] in a static table and resolved in the
//! order shift, alt, base.

use evdevil::event::Key;

use super::keysym::*;
use super::modifier::ModifierState;

/// RFB pointer button masks.
pub const BUTTON_PRIMARY: u8 = 1 << 0;
pub const BUTTON_SECONDARY: u8 = 1 << 2;

/// What a physical key event turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Send a key event with the raw press state.
    Key(Keysym),
    /// Send a pointer event with this button mask at the primary touch point.
    Pointer(u8),
    /// Nothing to send.
    None,
}

#[derive(Debug, Clone, Copy)]
enum Binding {
    Symbol {
        base: Keysym,
        shift: Option<Keysym>,
        alt: Option<Keysym>,
    },
    /// Letter that becomes a mouse button while alt is held.
    Chord {
        base: Keysym,
        shift: Keysym,
        button: u8,
    },
    /// Updates the shift state and is also forwarded as this keysym.
    Shift(Keysym),
    /// Updates the alt state only.
    Alt,
}

#[derive(Debug, Clone, Copy)]
struct KeyEntry {
    code: Key,
    binding: Binding,
}

const fn plain(code: Key, base: Keysym) -> KeyEntry {
    KeyEntry {
        code,
        binding: Binding::Symbol { base, shift: None, alt: None },
    }
}

const fn shifted(code: Key, base: Keysym, shift: Keysym) -> KeyEntry {
    KeyEntry {
        code,
        binding: Binding::Symbol { base, shift: Some(shift), alt: None },
    }
}

const fn triple(code: Key, base: Keysym, shift: Keysym, alt: Keysym) -> KeyEntry {
    KeyEntry {
        code,
        binding: Binding::Symbol { base, shift: Some(shift), alt: Some(alt) },
    }
}

const fn letter(code: Key, c: u8) -> KeyEntry {
    shifted(code, lower(c), upper(c))
}

const fn letter_alt(code: Key, c: u8, alt: Keysym) -> KeyEntry {
    triple(code, lower(c), upper(c), alt)
}

const fn chord(code: Key, c: u8, button: u8) -> KeyEntry {
    KeyEntry {
        code,
        binding: Binding::Chord { base: lower(c), shift: upper(c), button },
    }
}

const KEYMAP: &[KeyEntry] = &[
    triple(Key::KEY_1, keypad_digit(1), XK_EXCLAM, XK_BAR),
    shifted(Key::KEY_2, keypad_digit(2), XK_AT),
    shifted(Key::KEY_3, keypad_digit(3), XK_NUMBERSIGN),
    shifted(Key::KEY_4, keypad_digit(4), XK_DOLLAR),
    shifted(Key::KEY_5, keypad_digit(5), XK_PERCENT),
    shifted(Key::KEY_6, keypad_digit(6), XK_ASCIICIRCUM),
    shifted(Key::KEY_7, keypad_digit(7), XK_AMPERSAND),
    shifted(Key::KEY_8, keypad_digit(8), XK_ASTERISK),
    triple(Key::KEY_9, keypad_digit(9), XK_PARENLEFT, XK_BRACELEFT),
    triple(Key::KEY_0, keypad_digit(0), XK_PARENRIGHT, XK_BRACERIGHT),
    letter(Key::KEY_A, b'a'),
    letter(Key::KEY_B, b'b'),
    letter(Key::KEY_C, b'c'),
    letter(Key::KEY_D, b'd'),
    letter(Key::KEY_E, b'e'),
    letter(Key::KEY_F, b'f'),
    letter(Key::KEY_G, b'g'),
    letter(Key::KEY_H, b'h'),
    letter(Key::KEY_I, b'i'),
    letter(Key::KEY_J, b'j'),
    chord(Key::KEY_K, b'k', BUTTON_PRIMARY),
    chord(Key::KEY_L, b'l', BUTTON_SECONDARY),
    letter(Key::KEY_M, b'm'),
    letter(Key::KEY_N, b'n'),
    letter_alt(Key::KEY_O, b'o', XK_BRACKETLEFT),
    letter_alt(Key::KEY_P, b'p', XK_BRACKETRIGHT),
    letter(Key::KEY_Q, b'q'),
    letter(Key::KEY_R, b'r'),
    letter(Key::KEY_S, b's'),
    letter(Key::KEY_T, b't'),
    letter(Key::KEY_U, b'u'),
    letter(Key::KEY_V, b'v'),
    letter(Key::KEY_W, b'w'),
    letter(Key::KEY_X, b'x'),
    letter(Key::KEY_Y, b'y'),
    letter(Key::KEY_Z, b'z'),
    // Shift turns the arrows into page navigation.
    shifted(Key::KEY_UP, XK_UP, XK_PAGE_UP),
    shifted(Key::KEY_DOWN, XK_DOWN, XK_PAGE_DOWN),
    shifted(Key::KEY_RIGHT, XK_RIGHT, XK_BEGIN),
    shifted(Key::KEY_LEFT, XK_LEFT, XK_END),
    plain(Key::KEY_ENTER, XK_KP_ENTER),
    plain(Key::KEY_BACKSPACE, XK_BACKSPACE),
    plain(Key::KEY_TAB, XK_TAB),
    triple(Key::KEY_COMMA, XK_COMMA, XK_SEMICOLON, XK_LESS),
    triple(Key::KEY_DOT, XK_PERIOD, XK_COLON, XK_GREATER),
    plain(Key::KEY_SPACE, XK_SPACE),
    shifted(Key::KEY_GRAVE, XK_APOSTROPHE, XK_QUOTEDBL),
    triple(Key::KEY_MINUS, XK_MINUS, XK_UNDERSCORE, XK_ASCIITILDE),
    shifted(Key::KEY_EQUAL, XK_EQUAL, XK_PLUS),
    triple(Key::KEY_SLASH, XK_SLASH, XK_QUESTION, XK_BACKSLASH),
    // The key labelled shift acts as control on this keyboard.
    plain(Key::KEY_LEFTSHIFT, XK_CONTROL_L),
    KeyEntry { code: Key::KEY_RIGHTALT, binding: Binding::Alt },
    KeyEntry { code: Key::KEY_LEFTCTRL, binding: Binding::Shift(XK_SHIFT_L) },
    KeyEntry { code: Key::KEY_CAPSLOCK, binding: Binding::Shift(XK_SHIFT_L) },
];

fn lookup(code: Key) -> Option<&'static Binding> {
    KEYMAP.iter().find(|e| e.code == code).map(|e| &e.binding)
}

/// Translates raw key codes, tracking modifier keys as they pass through.
#[derive(Debug, Default)]
pub struct KeyTranslator {
    modifiers: ModifierState,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    /// Translate one key event. Releases of modifier keys must go through
    /// here too so the modifier state follows the physical key.
    pub fn translate(&mut self, code: Key, pressed: bool) -> KeyAction {
        let Some(binding) = lookup(code) else {
            return KeyAction::None;
        };

        let shift = self.modifiers.is_shift();
        let alt = self.modifiers.is_alt();

        match *binding {
            Binding::Symbol { base, shift: on_shift, alt: on_alt } => {
                let sym = match (shift, on_shift, alt, on_alt) {
                    (true, Some(sym), _, _) => sym,
                    (_, _, true, Some(sym)) => sym,
                    _ => base,
                };
                KeyAction::Key(sym)
            }
            Binding::Chord { base, shift: on_shift, button } => {
                if shift {
                    KeyAction::Key(on_shift)
                } else if alt {
                    KeyAction::Pointer(if pressed { button } else { 0 })
                } else {
                    KeyAction::Key(base)
                }
            }
            Binding::Shift(sym) => {
                self.modifiers.set_shift(pressed);
                KeyAction::Key(sym)
            }
            Binding::Alt => {
                self.modifiers.set_alt(pressed);
                KeyAction::None
            }
        }
    }
}
