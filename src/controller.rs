//! PI control law for GNSS clock bias discipline
//!
//! The setpoint is zero clock bias. Bias (ms) is the process value; it is
//! converted to seconds of phase error and then to control word LSBs via
//! `FREQ_CONTROL_RESOLUTION`. The requested change is rate limited to
//! `max_step_ppb` before the gains are applied. The absolute range limit
//! is applied afterwards when the word is converted.

use crate::{config::*, constants::*, errors::*, register::*};


/// Bias (ms) expressed as control word LSBs, sign inverted
#[inline]
pub fn required_change_lsbs(bias_ms: f64) -> f64 {
    let error = (0.0 - bias_ms) / 1000.0;
    error / FREQ_CONTROL_RESOLUTION
}

/// Step ceiling in control word LSBs
#[inline]
pub fn max_change_lsbs(max_step_ppb: f64) -> f64 {
    max_step_ppb * 1.0e-9 / FREQ_CONTROL_RESOLUTION
}

/// Symmetric limit to `+/-max`.
/// A negative `max` is not sorted out, it just flips the limit.
fn limit(x: f64, max: f64) -> f64 {
    if x >= 0.0 {
        if x > max { max } else { x }
    } else if x < 0.0 - max {
        0.0 - max
    } else {
        x
    }
}


/// Result of one controller update
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub struct PiStep {
    /// Rate limited change request, LSBs
    pub required_lsbs: f64,
    /// Proportional term, LSBs
    pub proportional: f64,
    /// Contribution of this update to the integral, LSBs
    pub integral_delta: f64,
    /// Integral before this update
    pub integral_before: f64,
    /// Integral after this update
    pub integral: f64,
    /// Control word to write, already range limited
    pub word: ControlWord,
}


/// PI controller state.
///
/// Lives as long as the discipline loop. The integral is seeded lazily
/// from the control word current at the first update so the loop starts
/// at the present operating point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PiController {
    integral: f64,
    initialized: bool,
    policy: IntegralPolicy,
}

impl PiController {
    pub fn new(policy: IntegralPolicy) -> Self {
        PiController { integral: 0.0, initialized: false, policy }
    }

    pub fn policy(&self) -> IntegralPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: IntegralPolicy) {
        self.policy = policy;
    }

    /// Accumulated integral, `None` until the first update
    pub fn integral(&self) -> Option<f64> {
        if self.initialized { Some(self.integral) } else { None }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Restarts the loop at `w`, e.g. after a long GNSS outage
    pub fn reset_integral(&mut self, w: ControlWord) {
        self.integral = f64::from(w);
        self.initialized = true;
    }

    /// Forgets the integral; the next update reseeds it
    pub fn clear(&mut self) {
        self.integral = 0.0;
        self.initialized = false;
    }

    /// Runs one update of the control law and advances the integral.
    ///
    /// `current` is the control word presently in the oscillator, used
    /// only to seed the integral on the first update.
    pub fn update(
        self: &mut Self,
        current: ControlWord,
        bias_ms: f64,
        max_step_ppb: f64,
        gains: Gains,
    ) -> Result<PiStep, Error> {
        if !bias_ms.is_finite() {
            return Err(Error::InvalidBias);
        }

        if !self.initialized {
            self.reset_integral(current);
        }

        let required_lsbs = limit(required_change_lsbs(bias_ms), max_change_lsbs(max_step_ppb));

        let proportional = required_lsbs * gains.pk;
        let integral_delta = required_lsbs * gains.ik;
        let integral_before = self.integral;
        self.integral += integral_delta;

        Ok(PiStep {
            required_lsbs,
            proportional,
            integral_delta,
            integral_before,
            integral: self.integral,
            word: ControlWord::from_f64(proportional + self.integral),
        })
    }

    /// Undoes the integral advance of `step`
    pub fn rollback(&mut self, step: &PiStep) {
        self.integral = step.integral_before;
    }
}

impl Default for PiController {
    fn default() -> Self {
        Self::new(IntegralPolicy::default())
    }
}
