use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Quality/size tradeoff understood by the compression tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    #[default]
    Ebook,
    Screen,
    Printer,
    Prepress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset {0:?} (expected one of: ebook, screen, printer, prepress)")]
pub struct UnknownPreset(pub String);

impl Preset {
    /// Every preset, in the order the selector lists them.
    pub const ALL: [Preset; 4] = [
        Preset::Ebook,
        Preset::Screen,
        Preset::Printer,
        Preset::Prepress,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Preset::Ebook => "ebook",
            Preset::Screen => "screen",
            Preset::Printer => "printer",
            Preset::Prepress => "prepress",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Preset::Ebook => "Good balance of size and quality (recommended)",
            Preset::Screen => "Smallest size, screen-resolution images",
            Preset::Printer => "Higher quality for desktop printing",
            Preset::Prepress => "Highest quality, preserves colour for press",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.token() == raw)
            .ok_or_else(|| UnknownPreset(raw.to_string()))
    }
}
