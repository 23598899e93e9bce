//! Session state and correction decisions
//!
//! [`Session`] is everything the governor knows about the current run: the
//! last powers seen on both sides, the transmitter's operating state, and
//! the active target window. The window is session state, not a global, so
//! two sessions can never leak band limits into each other.
//!
//! All transitions here are pure; the controller actor owns the only
//! instance, which is what makes the check-then-step correction atomic with
//! respect to the other stream. State lives here, policy glue lives in
//! [`crate::controller`].
//!
//! The correction itself is a discrete accumulating loop: one watt per
//! amplifier sample, toward the window, never further. Single-unit steps are
//! the whole mechanism: samples arrive fast relative to the transmitter's
//! command latency, and the transfer function between configured power and
//! amplifier output is unknown, so anything proportional would hunt.

use trim_proto::STATE_TRANSMITTING;

use crate::config::Config;

/// Target window for amplifier output power
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandLimits {
    /// Lowest acceptable amplifier output, in watts
    pub min: u32,
    /// Power ceiling for the active band, in watts
    pub max: u32,
}

impl BandLimits {
    /// Build a window from a ceiling and margin: `[ceiling - margin, ceiling]`.
    pub fn with_ceiling(ceiling: u32, margin: u32) -> Self {
        debug_assert!(margin > 0 && margin < ceiling);
        Self {
            min: ceiling - margin,
            max: ceiling,
        }
    }

    /// Whether an output power sample sits inside the window (inclusive).
    pub fn contains(&self, watts: u32) -> bool {
        self.min <= watts && watts <= self.max
    }
}

/// Shared power/state model for one connected run
///
/// Created empty when the connections come up, mutated only by the
/// controller actor, discarded on disconnect. Nothing persists.
#[derive(Debug)]
pub struct Session {
    /// Last power reported by, or speculatively commanded to, the transmitter
    pub radio_power: Option<u32>,
    /// Last output power reported by the amplifier
    pub amp_power: Option<u32>,
    /// Last operating state token from the transmitter
    pub radio_state: Option<String>,
    /// State observed immediately before the current one
    pub previous_radio_state: Option<String>,
    /// Active target window
    pub band: BandLimits,
}

impl Session {
    /// Create an empty session targeting the default band.
    pub fn new(config: &Config) -> Self {
        Self {
            radio_power: None,
            amp_power: None,
            radio_state: None,
            previous_radio_state: None,
            band: BandLimits::with_ceiling(config.default_ceiling, config.band_margin),
        }
    }

    /// Whether the transmitter is currently keyed.
    pub fn transmitting(&self) -> bool {
        self.radio_state.as_deref() == Some(STATE_TRANSMITTING)
    }

    /// Authoritative power report from the transmitter.
    ///
    /// Overwrites whatever was speculatively commanded; the transmitter may
    /// have clamped or rejected a correction, and this reconciles it.
    pub fn observe_rf_power(&mut self, watts: u32) {
        self.radio_power = Some(watts);
    }

    /// Frequency report from the transmitter.
    ///
    /// A frequency in the 50 MHz region (textually starting with `50`)
    /// selects the high-power window; anything else the default window.
    /// Returns the new window only when it actually changed.
    pub fn observe_frequency(&mut self, freq: &str, config: &Config) -> Option<BandLimits> {
        let ceiling = if freq.starts_with("50") {
            config.high_ceiling
        } else {
            config.default_ceiling
        };
        let band = BandLimits::with_ceiling(ceiling, config.band_margin);
        (band != self.band).then(|| {
            self.band = band;
            band
        })
    }

    /// Operating state report from the transmitter.
    ///
    /// Shifts the previous/current pair and, on the transmitting to
    /// not-transmitting edge, returns the decayed power to command. The
    /// transmitter creeps power upward as the amplifier's output falls off
    /// at the end of an over; stepping back down keeps the next over from
    /// starting hot.
    pub fn observe_state(&mut self, token: &str, config: &Config) -> Option<u32> {
        let was_transmitting = self.transmitting();
        self.previous_radio_state = self.radio_state.replace(token.to_string());

        if !was_transmitting || token == STATE_TRANSMITTING {
            return None;
        }

        let decayed = self
            .radio_power?
            .saturating_sub(config.decay_step)
            .max(config.decay_floor);
        self.radio_power = Some(decayed);
        Some(decayed)
    }

    /// Output power sample from the amplifier.
    ///
    /// Records the sample unconditionally. When the transmitter is keyed,
    /// its power is known, and the sample falls outside the window, steps
    /// the power by exactly one watt toward the window and returns the new
    /// value to command. This is the single out-of-band gate; callers must
    /// not re-check.
    pub fn observe_amp_power(&mut self, watts: u32) -> Option<u32> {
        self.amp_power = Some(watts);

        if !self.transmitting() {
            return None;
        }
        let power = self.radio_power?;

        let corrected = if watts < self.band.min {
            power + 1
        } else if watts > self.band.max {
            power.saturating_sub(1)
        } else {
            return None;
        };

        self.radio_power = Some(corrected);
        Some(corrected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, Config) {
        let config = Config::default();
        (Session::new(&config), config)
    }

    fn transmitting_session(power: u32) -> (Session, Config) {
        let (mut session, config) = session();
        session.observe_rf_power(power);
        assert_eq!(session.observe_state(STATE_TRANSMITTING, &config), None);
        (session, config)
    }

    #[test]
    fn starts_empty_on_default_band() {
        let (session, _) = session();
        assert_eq!(session.radio_power, None);
        assert_eq!(session.amp_power, None);
        assert_eq!(session.band, BandLimits { min: 330, max: 350 });
    }

    #[test]
    fn frequency_starting_50_selects_high_band() {
        let (mut session, config) = session();
        let band = session.observe_frequency("50313000", &config);
        assert_eq!(band, Some(BandLimits { min: 480, max: 500 }));
        assert_eq!(session.band, BandLimits { min: 480, max: 500 });
    }

    #[test]
    fn other_frequencies_select_default_band() {
        let (mut session, config) = session();
        session.observe_frequency("50313000", &config);
        let band = session.observe_frequency("14074000", &config);
        assert_eq!(band, Some(BandLimits { min: 330, max: 350 }));
    }

    #[test]
    fn unchanged_band_reports_nothing() {
        let (mut session, config) = session();
        assert_eq!(session.observe_frequency("14074000", &config), None);
        assert_eq!(session.observe_frequency("7074000", &config), None);
    }

    #[test]
    fn low_sample_steps_power_up_by_one() {
        let (mut session, _) = transmitting_session(340);
        assert_eq!(session.observe_amp_power(320), Some(341));
        assert_eq!(session.radio_power, Some(341));
        assert_eq!(session.amp_power, Some(320));
    }

    #[test]
    fn high_sample_steps_power_down_by_one() {
        let (mut session, _) = transmitting_session(345);
        assert_eq!(session.observe_amp_power(360), Some(344));
    }

    #[test]
    fn in_band_sample_is_recorded_but_not_corrected() {
        let (mut session, _) = transmitting_session(340);
        assert_eq!(session.observe_amp_power(342), None);
        assert_eq!(session.amp_power, Some(342));
        assert_eq!(session.radio_power, Some(340));
    }

    #[test]
    fn window_edges_are_in_band() {
        let (mut session, _) = transmitting_session(340);
        assert_eq!(session.observe_amp_power(330), None);
        assert_eq!(session.observe_amp_power(350), None);
    }

    #[test]
    fn no_correction_while_not_transmitting() {
        let (mut session, config) = session();
        session.observe_rf_power(340);
        session.observe_state("READY", &config);
        assert_eq!(session.observe_amp_power(100), None);
        assert_eq!(session.amp_power, Some(100));
    }

    #[test]
    fn no_correction_before_first_power_report() {
        let (mut session, config) = session();
        session.observe_state(STATE_TRANSMITTING, &config);
        assert_eq!(session.observe_amp_power(320), None);
    }

    #[test]
    fn rf_power_report_overrides_speculative_value() {
        let (mut session, _) = transmitting_session(340);
        session.observe_amp_power(320);
        assert_eq!(session.radio_power, Some(341));
        // The transmitter clamped the correction; its report wins.
        session.observe_rf_power(338);
        assert_eq!(session.radio_power, Some(338));
    }

    #[test]
    fn end_of_transmission_decays_power() {
        let (mut session, config) = transmitting_session(345);
        assert_eq!(session.observe_state("RECEIVE", &config), Some(341));
        assert_eq!(session.radio_power, Some(341));
        assert_eq!(session.previous_radio_state.as_deref(), Some("TRANSMITTING"));
        assert_eq!(session.radio_state.as_deref(), Some("RECEIVE"));
    }

    #[test]
    fn decay_is_floored() {
        let (mut session, config) = transmitting_session(12);
        assert_eq!(session.observe_state("READY", &config), Some(10));

        let (mut session, config) = transmitting_session(3);
        assert_eq!(session.observe_state("READY", &config), Some(10));
    }

    #[test]
    fn decay_fires_only_on_the_edge() {
        let (mut session, config) = transmitting_session(345);
        // Still keyed: no decay on a repeated transmitting report.
        assert_eq!(session.observe_state(STATE_TRANSMITTING, &config), None);
        assert_eq!(session.observe_state("RECEIVE", &config), Some(341));
        // Already unkeyed: further non-transmitting reports do nothing.
        assert_eq!(session.observe_state("READY", &config), None);
        assert_eq!(session.radio_power, Some(341));
    }

    #[test]
    fn decay_skipped_when_power_unknown() {
        let (mut session, config) = session();
        session.observe_state(STATE_TRANSMITTING, &config);
        assert_eq!(session.observe_state("RECEIVE", &config), None);
        assert_eq!(session.radio_power, None);
    }
}
