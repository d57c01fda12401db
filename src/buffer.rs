//! Growable output buffers for transcoding.
//!
//! The conversion loop does not know the output length in advance: one
//! source character can become one to four target units. [`GrowBuffer`]
//! holds native-endian units of the target width and grows in two modes:
//!
//! - **Batch growth** ([`GrowBuffer::ensure_capacity`]): capacity starts at
//!   [`GrowthPolicy::base_bytes`] and is multiplied by
//!   [`GrowthPolicy::factor`] until the requested unit index fits.
//! - **Exact growth** ([`GrowBuffer::grow_one`]): exactly one more unit,
//!   used once to make room for the terminator.
//!
//! Both are no-ops when the capacity already suffices. When an allocation
//! fails the buffer releases everything it held and reports
//! [`Error::OutOfMemory`]; it never retains a partially grown allocation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use alloc::vec::Vec;
use log::{trace, warn};

use crate::error::{Error, Result};
use crate::text::CodeUnit;

/// Growth parameters for output buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrowthPolicy {
    /// Initial capacity in bytes (default: 64). Rounded up to whole units.
    pub base_bytes: usize,
    /// Capacity multiplier applied on each batch growth (default: 2).
    pub factor: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            base_bytes: 64,
            factor: 2,
        }
    }
}

impl GrowthPolicy {
    /// Initial capacity in units of width `width`, at least one unit.
    #[inline]
    fn base_units(&self, width: usize) -> usize {
        ((self.base_bytes + width - 1) / width).max(1)
    }

    /// Effective multiplier; anything below 2 would never make progress.
    #[inline]
    fn effective_factor(&self) -> usize {
        self.factor.max(2)
    }
}

/// A heap buffer of code units that grows by policy.
///
/// Capacity is tracked in units of `U`, never in raw bytes. Every unit up to
/// the capacity is initialised (to zero) so that encoders can write into
/// [`as_mut_slice`](Self::as_mut_slice) at any index below the capacity.
#[derive(Debug)]
pub struct GrowBuffer<U: CodeUnit> {
    units: Vec<U>,
    policy: GrowthPolicy,
}

impl<U: CodeUnit> GrowBuffer<U> {
    /// Create an empty buffer. No allocation happens until the first growth.
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            units: Vec::new(),
            policy,
        }
    }

    /// Current capacity in units.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.units.len()
    }

    /// Current capacity in bytes.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.units.len() * U::WIDTH
    }

    /// The growth policy in use.
    #[inline]
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// All units up to the capacity.
    #[inline]
    pub fn as_slice(&self) -> &[U] {
        &self.units
    }

    /// All units up to the capacity, writable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [U] {
        &mut self.units
    }

    /// Make sure at least `min_units` units are available (batch growth).
    pub fn ensure_capacity(&mut self, min_units: usize) -> Result<()> {
        let current = self.capacity();
        if current >= min_units {
            return Ok(());
        }

        let factor = self.policy.effective_factor();
        let mut target = if current == 0 {
            self.policy.base_units(U::WIDTH)
        } else {
            current
        };
        while target < min_units {
            target = match target.checked_mul(factor) {
                Some(next) => next,
                None => return Err(self.release()),
            };
        }

        self.resize_to(target)
    }

    /// Grow by exactly one unit (exact growth).
    pub fn grow_one(&mut self) -> Result<()> {
        match self.capacity().checked_add(1) {
            Some(target) => self.resize_to(target),
            None => Err(self.release()),
        }
    }

    /// Consume the buffer, keeping the first `len` units.
    pub fn into_units(mut self, len: usize) -> Vec<U> {
        self.units.truncate(len);
        self.units
    }

    fn resize_to(&mut self, target: usize) -> Result<()> {
        let additional = target - self.units.len();
        let overflows = target.checked_mul(U::WIDTH).is_none();
        if overflows || self.units.try_reserve_exact(additional).is_err() {
            return Err(self.release());
        }

        trace!(
            "growing {}-byte unit buffer from {} to {} units",
            U::WIDTH,
            self.units.len(),
            target
        );
        self.units.resize(target, U::ZERO);
        Ok(())
    }

    fn release(&mut self) -> Error {
        warn!(
            "allocation failed growing a {}-byte unit buffer of {} units; releasing it",
            U::WIDTH,
            self.units.len()
        );
        self.units = Vec::new();
        Error::OutOfMemory
    }
}
