//! X11 keysyms sent to the remote session.

pub type Keysym = u32;

pub const XK_SPACE: Keysym = 0x0020;
pub const XK_EXCLAM: Keysym = 0x0021;
pub const XK_QUOTEDBL: Keysym = 0x0022;
pub const XK_NUMBERSIGN: Keysym = 0x0023;
pub const XK_DOLLAR: Keysym = 0x0024;
pub const XK_PERCENT: Keysym = 0x0025;
pub const XK_AMPERSAND: Keysym = 0x0026;
pub const XK_APOSTROPHE: Keysym = 0x0027;
pub const XK_PARENLEFT: Keysym = 0x0028;
pub const XK_PARENRIGHT: Keysym = 0x0029;
pub const XK_ASTERISK: Keysym = 0x002a;
pub const XK_PLUS: Keysym = 0x002b;
pub const XK_COMMA: Keysym = 0x002c;
pub const XK_MINUS: Keysym = 0x002d;
pub const XK_PERIOD: Keysym = 0x002e;
pub const XK_SLASH: Keysym = 0x002f;
pub const XK_COLON: Keysym = 0x003a;
pub const XK_SEMICOLON: Keysym = 0x003b;
pub const XK_LESS: Keysym = 0x003c;
pub const XK_EQUAL: Keysym = 0x003d;
pub const XK_GREATER: Keysym = 0x003e;
pub const XK_QUESTION: Keysym = 0x003f;
pub const XK_AT: Keysym = 0x0040;
pub const XK_BRACKETLEFT: Keysym = 0x005b;
pub const XK_BACKSLASH: Keysym = 0x005c;
pub const XK_BRACKETRIGHT: Keysym = 0x005d;
pub const XK_ASCIICIRCUM: Keysym = 0x005e;
pub const XK_UNDERSCORE: Keysym = 0x005f;
pub const XK_BRACELEFT: Keysym = 0x007b;
pub const XK_BAR: Keysym = 0x007c;
pub const XK_BRACERIGHT: Keysym = 0x007d;
pub const XK_ASCIITILDE: Keysym = 0x007e;

pub const XK_BACKSPACE: Keysym = 0xff08;
pub const XK_TAB: Keysym = 0xff09;
pub const XK_LEFT: Keysym = 0xff51;
pub const XK_UP: Keysym = 0xff52;
pub const XK_RIGHT: Keysym = 0xff53;
pub const XK_DOWN: Keysym = 0xff54;
pub const XK_PAGE_UP: Keysym = 0xff55;
pub const XK_PAGE_DOWN: Keysym = 0xff56;
pub const XK_END: Keysym = 0xff57;
pub const XK_BEGIN: Keysym = 0xff58;
pub const XK_KP_ENTER: Keysym = 0xff8d;
pub const XK_KP_0: Keysym = 0xffb0;
pub const XK_SHIFT_L: Keysym = 0xffe1;
pub const XK_CONTROL_L: Keysym = 0xffe3;

/// `XK_KP_0` + n for n in 0..=9.
pub const fn keypad_digit(n: u32) -> Keysym {
    XK_KP_0 + n
}

/// Lower-case Latin letter keysym (`XK_a`..`XK_z`).
pub const fn lower(c: u8) -> Keysym {
    c.to_ascii_lowercase() as Keysym
}

/// Upper-case Latin letter keysym (`XK_A`..`XK_Z`).
pub const fn upper(c: u8) -> Keysym {
    c.to_ascii_uppercase() as Keysym
}
