//! Process-wide game parameters and their validation.

use std::{ops::RangeInclusive, time::Duration};

use thiserror::Error;

const DIMENSION_RANGE: RangeInclusive<u32> = 9..=99;
const BLOCK_SIZE_RANGE: RangeInclusive<u32> = 8..=128;
const SPEED_RANGE: RangeInclusive<f64> = 20.0..=200.0;
const DENSITY_RANGE: RangeInclusive<f64> = 0.0..=50.0;
const TICK_INTERVAL_RANGE: RangeInclusive<Duration> =
    Duration::from_millis(10)..=Duration::from_millis(100);

/// Immutable parameters supplied once before the first game starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Number of block rows; odd, 9 through 99.
    pub rows: u32,
    /// Number of block columns; odd, 9 through 99.
    pub columns: u32,
    /// Edge length of a block in pixels.
    pub block_size: u32,
    /// Movement speed shared by every entity, in pixels per second.
    pub speed: f64,
    /// Hostiles per 1000 blocks of board area.
    pub hostile_density: f64,
    /// Nominal sleep between two ticks.
    pub tick_interval: Duration,
    /// Seed for maze generation and wandering; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let block_size = 32;
        Self {
            rows: 33,
            columns: 33,
            block_size,
            speed: f64::from(block_size) * 2.0,
            hostile_density: 10.0,
            tick_interval: Duration::from_millis(50),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks every parameter against its documented constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DIMENSION_RANGE.contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange { rows: self.rows });
        }
        if self.rows % 2 == 0 {
            return Err(ConfigError::RowsNotOdd { rows: self.rows });
        }
        if !DIMENSION_RANGE.contains(&self.columns) {
            return Err(ConfigError::ColumnsOutOfRange {
                columns: self.columns,
            });
        }
        if self.columns % 2 == 0 {
            return Err(ConfigError::ColumnsNotOdd {
                columns: self.columns,
            });
        }
        if !BLOCK_SIZE_RANGE.contains(&self.block_size) {
            return Err(ConfigError::BlockSizeOutOfRange {
                block_size: self.block_size,
            });
        }
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(ConfigError::SpeedOutOfRange { speed: self.speed });
        }
        if !DENSITY_RANGE.contains(&self.hostile_density) {
            return Err(ConfigError::DensityOutOfRange {
                density: self.hostile_density,
            });
        }
        if !TICK_INTERVAL_RANGE.contains(&self.tick_interval) {
            return Err(ConfigError::TickIntervalOutOfRange {
                interval: self.tick_interval,
            });
        }
        Ok(())
    }

    /// Number of hostiles placed into each new game.
    #[must_use]
    pub fn hostile_count(&self) -> usize {
        let area = f64::from(self.rows) * f64::from(self.columns);
        (area * self.hostile_density / 1000.0).floor() as usize
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Row count outside 9 through 99.
    #[error("rows {rows} is outside of valid range 9..=99")]
    RowsOutOfRange {
        /// Offending row count.
        rows: u32,
    },
    /// Even row count.
    #[error("rows {rows} must be odd")]
    RowsNotOdd {
        /// Offending row count.
        rows: u32,
    },
    /// Column count outside 9 through 99.
    #[error("cols {columns} is outside of valid range 9..=99")]
    ColumnsOutOfRange {
        /// Offending column count.
        columns: u32,
    },
    /// Even column count.
    #[error("cols {columns} must be odd")]
    ColumnsNotOdd {
        /// Offending column count.
        columns: u32,
    },
    /// Block size outside 8 through 128 pixels.
    #[error("block size {block_size} is outside of valid range 8..=128")]
    BlockSizeOutOfRange {
        /// Offending block size.
        block_size: u32,
    },
    /// Speed outside 20 through 200 pixels per second.
    #[error("speed {speed} is outside of valid range 20..=200")]
    SpeedOutOfRange {
        /// Offending speed.
        speed: f64,
    },
    /// Density outside 0 through 50 hostiles per 1000 blocks.
    #[error("hostile density {density} is outside of valid range 0..=50")]
    DensityOutOfRange {
        /// Offending density.
        density: f64,
    },
    /// Tick interval outside 10 through 100 milliseconds.
    #[error("tick interval {interval:?} is outside of valid range 10ms..=100ms")]
    TickIntervalOutOfRange {
        /// Offending interval.
        interval: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn even_dimensions_are_rejected() {
        let config = GameConfig {
            rows: 32,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RowsNotOdd { rows: 32 }));

        let config = GameConfig {
            columns: 10,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ColumnsNotOdd { columns: 10 })
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = GameConfig {
            rows: 7,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RowsOutOfRange { rows: 7 })
        );

        let config = GameConfig {
            speed: 250.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpeedOutOfRange { speed: 250.0 })
        );

        let config = GameConfig {
            tick_interval: Duration::from_millis(5),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TickIntervalOutOfRange { .. })
        ));
    }

    #[test]
    fn hostile_count_follows_density() {
        let config = GameConfig::default();
        assert_eq!(config.hostile_count(), 10);

        let config = GameConfig {
            hostile_density: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(config.hostile_count(), 0);
    }
}
