/// Shift/alt-equivalent key states of the handheld keyboard.
///
/// Owned by the input pump's key translator; nothing else writes it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    shift: bool,
    alt: bool,
}

impl ModifierState {
    pub fn set_shift(&mut self, pressed: bool) {
        self.shift = pressed;
    }

    pub fn set_alt(&mut self, pressed: bool) {
        self.alt = pressed;
    }

    pub fn is_shift(&self) -> bool {
        self.shift
    }

    pub fn is_alt(&self) -> bool {
        self.alt
    }
}
