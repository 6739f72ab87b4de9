//! STP3593LF session and startup sequence

use crate::{config::*, constants::*, controller::*, errors::*, register::*, transport::*};


/// Reads the control register, all-or-nothing
fn read_control_word<B>(bus: &mut B) -> Result<ControlWord, Error>
where B: Transport,
{
    let mut buf = [0u8; FREQ_CONTROL_LEN];
    let n = bus
        .read_register_region(Register::ReadFrequencyControl.addr(), &mut buf)
        .map_err(|_| Error::BusRead)?;
    if n != FREQ_CONTROL_LEN {
        return Err(Error::ShortRead);
    }
    decode(&buf)
}


/// Startup sequence states
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-log", derive(defmt::Format))]
pub enum StartupState {
    /// Nothing sent yet
    Unstarted,
    /// Device acknowledged the probe
    Probing,
    /// First control register read done, value thrown away
    Priming,
    /// Second read done, control word is known
    Ready,
    /// A step failed, the sequence is over
    Failed,
}


/// Brings a device up.
///
/// After the probe the control register is read twice. The first read
/// only moves the register pointer of some emulators to `0x41`; its value
/// is discarded. The second read becomes the cached control word.
/// A [`Stp3593lf`] session can only be obtained from a `Ready` sequence.
pub struct Startup<B> {
    bus: B,
    config: Config,
    state: StartupState,
    word: Option<ControlWord>,
}

impl<B> Startup<B>
where B: Transport,
{
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, Config::default())
    }

    pub fn with_config(bus: B, config: Config) -> Self {
        Startup { bus, config, state: StartupState::Unstarted, word: None }
    }

    pub fn state(&self) -> StartupState {
        self.state
    }

    /// Performs the next transition.
    ///
    /// A failed probe reports `DeviceNotFound`, a failed read
    /// `InitReadFailed`. Stepping a failed sequence reports `NotReady`,
    /// stepping a ready one does nothing.
    pub fn step(self: &mut Self) -> Result<StartupState, Error> {
        let next = match self.state {
            StartupState::Unstarted => match self.bus.probe() {
                Ok(()) => Ok(StartupState::Probing),
                Err(_) => Err(Error::DeviceNotFound),
            },
            StartupState::Probing => match read_control_word(&mut self.bus) {
                Ok(_) => Ok(StartupState::Priming),
                Err(_e) => {
                    #[cfg(feature = "defmt-log")]
                    defmt::warn!("STP3593LF priming read failed: {}", _e);
                    Err(Error::InitReadFailed)
                }
            },
            StartupState::Priming => match read_control_word(&mut self.bus) {
                Ok(w) => {
                    self.word = Some(w);
                    Ok(StartupState::Ready)
                }
                Err(_e) => {
                    #[cfg(feature = "defmt-log")]
                    defmt::warn!("STP3593LF control word read failed: {}", _e);
                    Err(Error::InitReadFailed)
                }
            },
            StartupState::Ready => Ok(StartupState::Ready),
            StartupState::Failed => Err(Error::NotReady),
        };

        match next {
            Ok(s) => {
                #[cfg(feature = "defmt-log")]
                defmt::debug!("STP3593LF startup {} -> {}", self.state, s);
                self.state = s;
            }
            Err(Error::NotReady) => {}
            Err(_) => self.state = StartupState::Failed,
        }
        next
    }

    /// Steps until `Ready` or the first failure
    pub fn run(self: &mut Self) -> Result<(), Error> {
        while self.step()? != StartupState::Ready {}
        Ok(())
    }

    /// Hands out the session, `NotReady` unless the sequence completed
    pub fn finish(self) -> Result<Stp3593lf<B>, Error> {
        match (self.state, self.word) {
            (StartupState::Ready, Some(w)) => Ok(Stp3593lf {
                bus: self.bus,
                frequency_control: w,
                max_step_ppb: self.config.max_step_ppb,
                controller: PiController::new(self.config.integral_policy),
            }),
            _ => Err(Error::NotReady),
        }
    }

    /// Gives the transport back, e.g. after a failed startup
    pub fn release(self) -> B {
        self.bus
    }
}


/// STP3593LF OCXO session.
///
/// Caches the last control word known to be in the device. The cache only
/// changes on a confirmed read or write, a failed transfer leaves it alone.
///
/// Not synchronised: share it between contexts behind a single lock.
pub struct Stp3593lf<B> {
    bus: B,
    frequency_control: ControlWord,
    max_step_ppb: f64,
    controller: PiController,
}

impl<B> Stp3593lf<B>
where B: Transport,
{
    /// Runs the full startup sequence with default configuration.
    /// Pass `&mut bus` to keep ownership of the transport.
    pub fn begin(bus: B) -> Result<Self, Error> {
        Self::begin_with_config(bus, Config::default())
    }

    pub fn begin_with_config(bus: B, config: Config) -> Result<Self, Error> {
        let mut s = Startup::with_config(bus, config);
        s.run()?;
        s.finish()
    }

    /// Reads the control register and refreshes the cached word
    pub fn read_frequency_control_word(self: &mut Self) -> Result<ControlWord, Error> {
        let w = read_control_word(&mut self.bus)?;
        #[cfg(feature = "defmt-log")]
        defmt::trace!("STP3593LF control word read {}", w.value());
        self.frequency_control = w;
        Ok(w)
    }

    /// Cached control word, no bus access
    #[inline]
    pub fn frequency_control_word(&self) -> ControlWord {
        self.frequency_control
    }

    /// Writes the DAC, clamping `w` to `FREQ_CONTROL_MAX`.
    /// Returns the word actually written.
    pub fn set_frequency_control_word(self: &mut Self, w: u32) -> Result<ControlWord, Error> {
        let w = ControlWord::clamped(w);
        self.bus
            .write_register_region(Register::WriteDac.addr(), &encode(w.value()))
            .map_err(|_| Error::BusWrite)?;
        #[cfg(feature = "defmt-log")]
        defmt::trace!("STP3593LF control word set {}", w.value());
        self.frequency_control = w;
        Ok(w)
    }

    /// Saves the DAC value for reload at power-up, then reads it back
    /// since the part may adjust it slightly while saving.
    ///
    /// A failed command reports `BusWrite`, a failed read back reports
    /// the read error.
    pub fn save_frequency_control_value(self: &mut Self) -> Result<ControlWord, Error> {
        self.bus
            .write_command_byte(Register::SaveFrequency.addr())
            .map_err(|_| Error::BusWrite)?;
        self.read_frequency_control_word()
    }

    /// Per update frequency change limit, ppb
    pub fn max_frequency_change_ppb(&self) -> f64 {
        self.max_step_ppb
    }

    /// Not validated. Zero freezes the output; a negative limit reverses
    /// the direction of every correction.
    pub fn set_max_frequency_change_ppb(&mut self, ppb: f64) {
        self.max_step_ppb = ppb;
    }

    /// Steers the oscillator from a GNSS receiver clock bias (ms).
    ///
    /// The change is limited by `max_frequency_change_ppb` and by the
    /// pull range of the part. Returns the control word written.
    ///
    /// The integral advances before the write. If the write fails it stays
    /// advanced unless the session was configured with
    /// `IntegralPolicy::RollbackOnWriteFailure`.
    pub fn set_frequency_by_bias_millis(self: &mut Self, bias_ms: f64, gains: Gains) -> Result<ControlWord, Error> {
        let step = self.controller.update(self.frequency_control, bias_ms, self.max_step_ppb, gains)?;

        #[cfg(feature = "defmt-log")]
        defmt::debug!(
            "STP3593LF bias {} ms: P {} I {} -> {}",
            bias_ms,
            step.proportional,
            step.integral,
            step.word.value()
        );

        match self.set_frequency_control_word(step.word.value()) {
            Ok(w) => Ok(w),
            Err(e) => {
                if self.controller.policy() == IntegralPolicy::RollbackOnWriteFailure {
                    self.controller.rollback(&step);
                }
                #[cfg(feature = "defmt-log")]
                defmt::warn!("STP3593LF bias update not written: {}", e);
                Err(e)
            }
        }
    }

    /// Restarts the discipline loop with the integral at `w`
    pub fn reset_integral(&mut self, w: ControlWord) {
        self.controller.reset_integral(w);
    }

    pub fn controller(&self) -> &PiController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PiController {
        &mut self.controller
    }

    /// Current session configuration
    pub fn config(&self) -> Config {
        Config::default()
            .max_step_ppb(self.max_step_ppb)
            .integral_policy(self.controller.policy())
    }

    /// Gives the transport back
    pub fn release(self) -> B {
        self.bus
    }
}
