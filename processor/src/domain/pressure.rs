//! Absolute pressure.

use core::fmt::{Debug, Display, Formatter};

/// A pressure in Pascals.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Pressure(f64);

impl Pressure {
    pub const fn from_pascals(value: f64) -> Self {
        Self(value)
    }

    pub fn pascals(&self) -> f64 {
        self.0
    }
}

impl Debug for Pressure {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}Pa", &self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pressure {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{}Pa", &self.0)
    }
}

impl Display for Pressure {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)?;
        f.write_str(" Pa")
    }
}
