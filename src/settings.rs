use crate::error::{Error, Result};

/// Per-container growth configuration.
///
/// `step` is the number of spare slots a side receives whenever it is topped up or rebalanced.
/// `shrink_factor` decides how wasteful a side may become: once a spare side holds more than
/// `shrink_factor * step` slots, the next pop trims it back down to `step`.
///
/// # Examples
/// ```
/// # use sparevec::Settings;
/// let settings = Settings::new(4).unwrap().with_shrink_factor(3).unwrap();
/// assert_eq!(settings.step(), 4);
/// assert_eq!(settings.shrink_threshold(), 12);
/// assert!(Settings::new(0).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Settings {
    step: usize,
    shrink_factor: usize,
}

impl Settings {
    pub const DEFAULT_STEP: usize = 10;
    pub const DEFAULT_SHRINK_FACTOR: usize = 2;

    /// Creates settings with the given step and the default shrink factor.
    pub fn new(step: usize) -> Result<Self> {
        if step == 0 {
            return Err(Error::InvalidSize { requested: step });
        }
        Ok(Settings {
            step,
            shrink_factor: Self::DEFAULT_SHRINK_FACTOR,
        })
    }

    pub fn with_shrink_factor(self, shrink_factor: usize) -> Result<Self> {
        if shrink_factor == 0 {
            return Err(Error::InvalidSize {
                requested: shrink_factor,
            });
        }
        Ok(Settings {
            shrink_factor,
            ..self
        })
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    #[inline]
    pub fn shrink_factor(&self) -> usize {
        self.shrink_factor
    }

    /// Spare slots a side may hold before the shrink check trims it.
    #[inline]
    pub fn shrink_threshold(&self) -> usize {
        self.shrink_factor.saturating_mul(self.step)
    }

    pub(crate) fn set_step(&mut self, step: usize) -> Result<()> {
        *self = Settings::new(step)?.with_shrink_factor(self.shrink_factor)?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            step: Self::DEFAULT_STEP,
            shrink_factor: Self::DEFAULT_SHRINK_FACTOR,
        }
    }
}
