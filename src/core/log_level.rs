//! Severity levels and level masks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// Severity of a single record. Every level is one bit so that a set of
/// enabled levels can be stored as a [`LevelMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Debug = 1 << 0,
    Info = 1 << 1,
    Warn = 1 << 2,
    Error = 1 << 3,
    Fatal = 1 << 4,
    Panic = 1 << 5,
}

impl Level {
    /// All levels, lowest severity first
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// Lower-case name used in record headers and file names
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Position of the level in [`Level::ALL`]
    #[inline]
    pub const fn index(self) -> usize {
        (self as u8).trailing_zeros() as usize
    }

    /// Convert a single bit back into a level
    pub const fn from_bit(bit: u8) -> Option<Level> {
        match bit {
            0x01 => Some(Level::Debug),
            0x02 => Some(Level::Info),
            0x04 => Some(Level::Warn),
            0x08 => Some(Level::Error),
            0x10 => Some(Level::Fatal),
            0x20 => Some(Level::Panic),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Set of enabled levels, the bitwise OR of [`Level`] bits.
///
/// # Examples
///
/// ```
/// use fieldlog::{Level, LevelMask};
///
/// let mask = Level::Warn | Level::Error;
/// assert!(mask.contains(Level::Warn));
/// assert!(!mask.contains(Level::Debug));
/// assert_eq!(LevelMask::at_least(Level::Error).bits(), 0b11_1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LevelMask(u8);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const ALL: LevelMask = LevelMask(0x3f);

    /// Build a mask from raw bits, rejecting bits that name no level
    pub const fn from_bits(bits: u8) -> Option<LevelMask> {
        if bits & !Self::ALL.0 != 0 {
            None
        } else {
            Some(LevelMask(bits))
        }
    }

    /// Every level at or above `min`
    pub const fn at_least(min: Level) -> LevelMask {
        let bit = min.bit();
        // clear all bits below `min`
        LevelMask(Self::ALL.0 & !(bit - 1))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn with(self, level: Level) -> LevelMask {
        LevelMask(self.0 | level.bit())
    }

    #[must_use]
    pub const fn without(self, level: Level) -> LevelMask {
        LevelMask(self.0 & !level.bit())
    }

    /// Enabled levels, lowest severity first
    pub fn levels(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        LevelMask::ALL
    }
}

impl From<Level> for LevelMask {
    fn from(level: Level) -> Self {
        LevelMask(level.bit())
    }
}

impl TryFrom<u8> for LevelMask {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        LevelMask::from_bits(bits).ok_or_else(|| format!("Invalid level mask: {:#04x}", bits))
    }
}

impl From<LevelMask> for u8 {
    fn from(mask: LevelMask) -> Self {
        mask.0
    }
}

impl BitOr for Level {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        LevelMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Level> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        self.with(rhs)
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}
