//! crates/buffer/src/config.rs
//! Sizing knobs shared by every buffer allocated for a connection direction.

use crate::error::ConfigError;

/// Sizing applied to every [`RingBuffer`](crate::RingBuffer) built for a
/// connection direction.
///
/// `size` is the fixed storage capacity. `reserve` is the number of bytes kept
/// free for in-place header rewriting: incoming data is considered to have
/// filled the buffer once only `reserve` bytes remain, and sniffers that wait
/// for a whole message never wait for more than `size - reserve` bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferConfig {
    /// Storage capacity in bytes.
    pub size: usize,
    /// Bytes held back from incoming data for rewrites.
    pub reserve: usize,
}

impl BufferConfig {
    /// Default storage capacity.
    pub const DEFAULT_SIZE: usize = 16 * 1024;

    /// Default rewrite reserve.
    pub const DEFAULT_RESERVE: usize = 1024;

    /// Creates a configuration from explicit values without validating them.
    #[must_use]
    pub const fn new(size: usize, reserve: usize) -> Self {
        Self { size, reserve }
    }

    /// Checks the configuration and returns it unchanged when usable.
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        if self.reserve >= self.size {
            return Err(ConfigError::ReserveTooLarge {
                size: self.size,
                reserve: self.reserve,
            });
        }
        Ok(self)
    }

    /// Largest number of bytes incoming data may occupy.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.size.saturating_sub(self.reserve)
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_RESERVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = BufferConfig::default();
        assert_eq!(config.validate(), Ok(config));
        assert_eq!(config.max_len(), 15 * 1024);
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(
            BufferConfig::new(0, 0).validate(),
            Err(ConfigError::ZeroSize)
        );
    }

    #[test]
    fn rejects_reserve_covering_whole_buffer() {
        assert_eq!(
            BufferConfig::new(64, 64).validate(),
            Err(ConfigError::ReserveTooLarge {
                size: 64,
                reserve: 64
            })
        );
        assert!(BufferConfig::new(64, 63).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_defaults_for_missing_fields() {
        let config: BufferConfig = serde_json::from_str(r#"{"size": 4096}"#).unwrap();
        assert_eq!(config.size, 4096);
        assert_eq!(config.reserve, BufferConfig::DEFAULT_RESERVE);

        let round: BufferConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round, config);
    }
}
