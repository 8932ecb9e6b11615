//! crates/logging/src/levels.rs
//! Debug flag enum and per-flag level storage.

use core::fmt;

/// Diagnostic categories of the data path, one per tracing target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DebugFlag {
    /// Fills, block writes and region movement.
    Buffer,
    /// Structural edits (replace, insert, delete).
    Edit,
    /// Realignment strategy choice and execution.
    Realign,
    /// Buffer pool allocation and exhaustion.
    Pool,
    /// Generic sniffer verdicts.
    Sniff,
    /// SSL/TLS hello inspection.
    Ssl,
    /// RDP cookie extraction.
    Rdp,
    /// Raw payload extraction.
    Payload,
}

impl DebugFlag {
    /// Every flag, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Buffer,
        Self::Edit,
        Self::Realign,
        Self::Pool,
        Self::Sniff,
        Self::Ssl,
        Self::Rdp,
        Self::Payload,
    ];

    /// Lowercase name used in `FLAG[N]` tokens and tracing targets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Edit => "edit",
            Self::Realign => "realign",
            Self::Pool => "pool",
            Self::Sniff => "sniff",
            Self::Ssl => "ssl",
            Self::Rdp => "rdp",
            Self::Payload => "payload",
        }
    }

    /// Tracing target carried by events of this category.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Buffer => "datapath::buffer",
            Self::Edit => "datapath::edit",
            Self::Realign => "datapath::realign",
            Self::Pool => "datapath::pool",
            Self::Sniff => "datapath::sniff",
            Self::Ssl => "datapath::ssl",
            Self::Rdp => "datapath::rdp",
            Self::Payload => "datapath::payload",
        }
    }

    /// Looks a flag up by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.as_str() == name)
    }
}

impl fmt::Display for DebugFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug verbosity level for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebugLevels {
    /// Buffer data-flow level.
    pub buffer: u8,
    /// Structural edit level.
    pub edit: u8,
    /// Realignment level.
    pub realign: u8,
    /// Buffer pool level.
    pub pool: u8,
    /// Sniffer verdict level.
    pub sniff: u8,
    /// SSL/TLS inspection level.
    pub ssl: u8,
    /// RDP cookie level.
    pub rdp: u8,
    /// Payload extraction level.
    pub payload: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    #[must_use]
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Buffer => self.buffer,
            DebugFlag::Edit => self.edit,
            DebugFlag::Realign => self.realign,
            DebugFlag::Pool => self.pool,
            DebugFlag::Sniff => self.sniff,
            DebugFlag::Ssl => self.ssl,
            DebugFlag::Rdp => self.rdp,
            DebugFlag::Payload => self.payload,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Buffer => self.buffer = level,
            DebugFlag::Edit => self.edit = level,
            DebugFlag::Realign => self.realign = level,
            DebugFlag::Pool => self.pool = level,
            DebugFlag::Sniff => self.sniff = level,
            DebugFlag::Ssl => self.ssl = level,
            DebugFlag::Rdp => self.rdp = level,
            DebugFlag::Payload => self.payload = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_targets_agree() {
        for flag in DebugFlag::ALL {
            assert_eq!(flag.target(), format!("datapath::{}", flag.as_str()));
            assert_eq!(DebugFlag::from_name(flag.as_str()), Some(flag));
            assert_eq!(flag.to_string(), flag.as_str());
        }
        assert_eq!(DebugFlag::from_name("Buffer"), None);
        assert_eq!(DebugFlag::from_name(""), None);
    }

    #[test]
    fn default_levels_are_zero() {
        let levels = DebugLevels::default();
        for flag in DebugFlag::ALL {
            assert_eq!(levels.get(flag), 0, "{flag}");
        }
    }

    #[test]
    fn set_updates_only_the_named_flag() {
        for target in DebugFlag::ALL {
            let mut levels = DebugLevels::default();
            levels.set(target, 3);
            for flag in DebugFlag::ALL {
                let expected = if flag == target { 3 } else { 0 };
                assert_eq!(levels.get(flag), expected, "{target} -> {flag}");
            }
        }
    }

    #[test]
    fn set_all_updates_every_flag() {
        let mut levels = DebugLevels::default();
        levels.set_all(2);
        assert!(DebugFlag::ALL.iter().all(|&flag| levels.get(flag) == 2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn levels_deserialize_with_missing_fields() {
        let levels: DebugLevels = serde_json::from_str(r#"{"ssl":2}"#).unwrap();
        assert_eq!(levels.ssl, 2);
        assert_eq!(levels.edit, 0);
    }
}
