//! Session and discipline loop configuration

use crate::constants::*;


/// PI gains for [`set_frequency_by_bias_millis`](crate::device::Stp3593lf::set_frequency_by_bias_millis).
///
/// The defaults come from GNSS disciplining tests and suit a once per
/// second bias update. Tune them for anything else.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub struct Gains {
    /// Proportional gain
    pub pk: f64,
    /// Integral gain
    pub ik: f64,
}

impl Gains {
    pub fn new(pk: f64, ik: f64) -> Self {
        Gains { pk, ik }
    }
}

impl Default for Gains {
    fn default() -> Self {
        Gains { pk: PK_DEFAULT, ik: IK_DEFAULT }
    }
}


/// What happens to the integral term when the control word write fails.
///
/// With `Keep` the integral has already moved on even though the
/// oscillator did not, so the controller model drifts away from the
/// hardware until the next successful write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub enum IntegralPolicy {
    /// Leave the accumulated integral advanced
    Keep,
    /// Undo this update's contribution to the integral
    RollbackOnWriteFailure,
}

impl Default for IntegralPolicy {
    fn default() -> Self {
        IntegralPolicy::Keep
    }
}


/// Session configuration, applied when the startup sequence completes.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub struct Config {
    /// Largest frequency move a single bias update may request, ppb.
    /// Zero or negative values are accepted and simply remove control authority.
    pub max_step_ppb: f64,
    pub integral_policy: IntegralPolicy,
}

impl Config {
    pub fn max_step_ppb(mut self, ppb: f64) -> Self {
        self.max_step_ppb = ppb;
        self
    }

    pub fn integral_policy(mut self, policy: IntegralPolicy) -> Self {
        self.integral_policy = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_step_ppb: MAX_FREQUENCY_CHANGE_PPB_DEFAULT,
            integral_policy: IntegralPolicy::default(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gains() {
        let g = Gains::default();
        assert_eq!(g.pk, 0.16);
        assert!((g.ik - 0.16 / 150.0).abs() < 1e-15);
    }

    #[test]
    fn config_builder() {
        let c = Config::default()
            .max_step_ppb(50.0)
            .integral_policy(IntegralPolicy::RollbackOnWriteFailure);
        assert_eq!(c.max_step_ppb, 50.0);
        assert_eq!(c.integral_policy, IntegralPolicy::RollbackOnWriteFailure);
        assert_eq!(Config::default().max_step_ppb, 400.0);
        assert_eq!(Config::default().integral_policy, IntegralPolicy::Keep);
    }
}
