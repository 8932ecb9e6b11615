//! crates/logging/src/config.rs
//! Verbosity configuration built from a verbose level or `FLAG[N]` tokens.

use super::levels::{DebugFlag, DebugLevels};

/// Error returned when a `FLAG[N]` token cannot be applied.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FlagError {
    /// The token was empty.
    #[error("empty flag token")]
    Empty,
    /// The name part does not match any [`DebugFlag`].
    #[error("unknown debug flag: {0}")]
    Unknown(String),
    /// The numeric suffix is not a valid level.
    #[error("invalid level in flag: {0}")]
    InvalidLevel(String),
}

/// Per-flag debug verbosity for the data path.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VerbosityConfig {
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level (0-4).
    ///
    /// Level 1 surfaces refused edits and pool exhaustion, level 2 adds
    /// realignment and sniffer verdicts, level 3 enables every category at
    /// debug detail and level 4 and above at trace detail.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();
        let debug = &mut config.debug;

        match level {
            0 => {}
            1 => {
                debug.edit = 1;
                debug.pool = 1;
            }
            2 => {
                debug.edit = 2;
                debug.pool = 2;
                debug.realign = 1;
                debug.sniff = 1;
            }
            3 => debug.set_all(2),
            _ => debug.set_all(3),
        }

        config
    }

    /// Apply a single debug flag token (e.g. `"ssl2"`, `"edit"`).
    ///
    /// A token without a numeric suffix sets level 1; `"all"` applies the
    /// level to every flag.
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), FlagError> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag = DebugFlag::from_name(name).ok_or_else(|| FlagError::Unknown(name.to_owned()))?;
        self.debug.set(flag, level);
        Ok(())
    }

    /// Apply a comma separated list of tokens, stopping at the first error.
    pub fn apply_debug_flags(&mut self, tokens: &str) -> Result<(), FlagError> {
        tokens
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "ssl2" into ("ssl", 2) or "edit" into ("edit", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), FlagError> {
    if token.is_empty() {
        return Err(FlagError::Empty);
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(FlagError::Unknown(token.to_owned())),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| FlagError::InvalidLevel(token.to_owned()))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}
