//! Flat `key=value` configuration parsing, per spec §6.
//!
//! No external config crate is used here: none of the pack's library
//! crates reach for `toml`/`serde` for a flat option file like this
//! one (those appear only in full terminal-emulator binaries, which
//! sit outside this spec's scope per §1). This is a hand-rolled
//! line-oriented parser in the teacher's plain style.

use termshape_data::Rgba8;

/// The cursor glyph shape a caller should draw, per spec §6's
/// `cursor-shape` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

/// How the digit `0` should be distinguished from the letter `O`, per
/// spec §6's `zero-style` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroStyle {
    #[default]
    Normal,
    Slashed,
    Dotted,
}

/// Parsed configuration from the closed key set of spec §6. Unknown
/// keys are ignored; malformed values for a recognized key keep that
/// field at its default rather than failing the whole parse (spec §7:
/// configuration isn't part of the decode/shape error taxonomy).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub font_family: Option<String>,
    pub font_size: f32,
    pub theme: Option<String>,
    pub enable_ligatures: bool,
    pub enable_kerning: bool,
    pub zero_style: ZeroStyle,
    pub cursor_blink: bool,
    pub cursor_shape: CursorShape,
    pub window_padding_x: u32,
    pub window_padding_y: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 12.0,
            theme: None,
            enable_ligatures: true,
            enable_kerning: true,
            zero_style: ZeroStyle::default(),
            cursor_blink: true,
            cursor_shape: CursorShape::default(),
            window_padding_x: 0,
            window_padding_y: 0,
        }
    }
}

impl Config {
    /// Parses `text` as a flat `key=value` configuration, one
    /// assignment per line, `#` starting a line comment. Unrecognized
    /// keys are ignored (spec §6: "Unknown keys are ignored").
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("ignoring malformed config line: {line:?}");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            config.apply(key, value);
        }

        config
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "font-family" => self.font_family = Some(value.to_string()),
            "font-size" => match value.parse() {
                Ok(v) => self.font_size = v,
                Err(_) => log::warn!("invalid font-size: {value:?}"),
            },
            "theme" => self.theme = Some(value.to_string()),
            "enable-ligatures" => self.enable_ligatures = parse_bool(value, self.enable_ligatures),
            "enable-kerning" => self.enable_kerning = parse_bool(value, self.enable_kerning),
            "zero-style" => {
                self.zero_style = match value {
                    "normal" => ZeroStyle::Normal,
                    "slashed" => ZeroStyle::Slashed,
                    "dotted" => ZeroStyle::Dotted,
                    other => {
                        log::warn!("unknown zero-style: {other:?}");
                        self.zero_style
                    },
                };
            },
            "cursor-blink" => self.cursor_blink = parse_bool(value, self.cursor_blink),
            "cursor-shape" => {
                self.cursor_shape = match value {
                    "block" => CursorShape::Block,
                    "underline" => CursorShape::Underline,
                    "bar" => CursorShape::Bar,
                    other => {
                        log::warn!("unknown cursor-shape: {other:?}");
                        self.cursor_shape
                    },
                };
            },
            "window-padding-x" => match value.parse() {
                Ok(v) => self.window_padding_x = v,
                Err(_) => log::warn!("invalid window-padding-x: {value:?}"),
            },
            "window-padding-y" => match value.parse() {
                Ok(v) => self.window_padding_y = v,
                Err(_) => log::warn!("invalid window-padding-y: {value:?}"),
            },
            _ => log::trace!("ignoring unknown config key: {key:?}"),
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value {
        "true" => true,
        "false" => false,
        other => {
            log::warn!("expected bool, got {other:?}");
            default
        },
    }
}

/// Parses a packed `0xRRGGBBAA` color the way spec §6's examples write
/// them (`fg=0xFFFFFFFF`). Returns `None` on malformed input.
pub fn parse_color(value: &str) -> Option<Rgba8> {
    let hex = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))?;
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgba8::from_u32(v))
}
