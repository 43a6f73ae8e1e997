//! Reveal choreography
//!
//! Idle → Preparing → Generating (helix) → Revealing (typewriter) → Complete
//! → Idle. The controller is advanced from the frame loop with the current
//! wall-clock time; every wait is measured against the previous deadline, so
//! the cadence does not depend on frame rate.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::password::{PasswordGenerator, RandomPicker};

/// First and count of printable ASCII used for glitch frames (`!`..=`~`)
const GLITCH_FIRST: u8 = 33;
const GLITCH_SPAN: u64 = 94;

/// Externally visible phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SequencePhase {
    #[default]
    Idle,
    Preparing,
    Generating,
    Revealing,
    Complete,
}

impl SequencePhase {
    /// State class on the password display
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            SequencePhase::Idle => None,
            SequencePhase::Preparing => Some("preparing"),
            SequencePhase::Generating => Some("generating"),
            SequencePhase::Revealing => Some("revealing"),
            SequencePhase::Complete => Some("complete"),
        }
    }
}

/// Receives one call per committed character
pub trait CharacterRevealSink {
    fn character_revealed(&mut self, index: usize, total: usize);
}

/// Presentation side of the sequence
pub trait SequenceView {
    fn phase_changed(&mut self, phase: SequencePhase);
    fn set_overlay(&mut self, active: bool);
    fn set_display(&mut self, text: &str);
    /// Draw the helix at `progress` in 0..=1
    fn draw_helix(&mut self, progress: f32);
    fn clear_helix(&mut self);
}

/// Things the owner needs to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    /// The final string was fixed
    Generated(String),
    /// Cleanup ran and the controller is idle again
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cursor {
    Idle,
    Preparing { until: f64 },
    Helix { started: f64 },
    Glitch { index: usize, frame: u32, at: f64 },
    Commit { index: usize, at: f64 },
    /// Final clean display after the last character's pause
    Settle { at: f64 },
    Hold { until: f64 },
}

/// Drives one reveal at a time
#[derive(Debug)]
pub struct SequenceController {
    cursor: Cursor,
    phase: SequencePhase,
    password: Vec<char>,
    revealed: String,
}

impl Default for SequenceController {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceController {
    pub fn new() -> Self {
        Self {
            cursor: Cursor::Idle,
            phase: SequencePhase::Idle,
            password: Vec::new(),
            revealed: String::new(),
        }
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.cursor == Cursor::Idle
    }

    /// The string being (or last) revealed
    pub fn password(&self) -> Option<String> {
        if self.password.is_empty() {
            None
        } else {
            Some(self.password.iter().collect())
        }
    }

    /// Start a sequence. Ignored while one is in flight.
    pub fn trigger(&mut self, now: f64, view: &mut dyn SequenceView) -> bool {
        if self.cursor != Cursor::Idle {
            log::debug!("Trigger ignored, sequence already {:?}", self.phase);
            return false;
        }

        self.password.clear();
        self.revealed.clear();
        self.cursor = Cursor::Preparing {
            until: now + PREPARE_MS,
        };
        self.set_phase(SequencePhase::Preparing, view);
        true
    }

    /// Advance through every step that is due at `now`.
    pub fn update<R: RandomPicker + ?Sized>(
        &mut self,
        now: f64,
        generator: &PasswordGenerator,
        rng: &mut R,
        view: &mut dyn SequenceView,
        sink: &mut dyn CharacterRevealSink,
    ) -> Result<Vec<SequenceEvent>> {
        let mut events = Vec::new();

        loop {
            match self.cursor {
                Cursor::Idle => break,
                Cursor::Preparing { until } => {
                    if now < until {
                        break;
                    }
                    events.push(self.begin_generating(until, generator, rng, view)?);
                }
                Cursor::Helix { started } => {
                    let progress = ((now - started) / HELIX_MS) as f32;
                    view.draw_helix(progress.min(1.0));
                    if progress < 1.0 {
                        break;
                    }
                    self.set_phase(SequencePhase::Revealing, view);
                    self.cursor = Cursor::Glitch {
                        index: 0,
                        frame: 0,
                        at: started + HELIX_MS,
                    };
                }
                Cursor::Glitch { index, frame, at } => {
                    if now < at {
                        break;
                    }
                    let glitch = (GLITCH_FIRST + rng.index_below(GLITCH_SPAN) as u8) as char;
                    let text = self.padded(Some(glitch), self.password.len() - index - 1);
                    view.set_display(&text);

                    self.cursor = if frame + 1 < GLITCH_FRAMES {
                        Cursor::Glitch {
                            index,
                            frame: frame + 1,
                            at: at + GLITCH_FRAME_MS,
                        }
                    } else {
                        Cursor::Commit {
                            index,
                            at: at + GLITCH_FRAME_MS,
                        }
                    };
                }
                Cursor::Commit { index, at } => {
                    if now < at {
                        break;
                    }
                    let total = self.password.len();
                    self.revealed.push(self.password[index]);
                    view.set_display(&self.padded(None, total - index - 1));
                    sink.character_revealed(index, total);

                    self.cursor = if index + 1 < total {
                        Cursor::Glitch {
                            index: index + 1,
                            frame: 0,
                            at: at + CHAR_DELAY_MS,
                        }
                    } else {
                        Cursor::Settle {
                            at: at + CHAR_DELAY_MS,
                        }
                    };
                }
                Cursor::Settle { at } => {
                    if now < at {
                        break;
                    }
                    self.complete(at, view);
                }
                Cursor::Hold { until } => {
                    if now < until {
                        break;
                    }
                    self.cleanup(view);
                    events.push(SequenceEvent::Finished);
                }
            }
        }

        Ok(events)
    }

    /// Jump an in-flight sequence to its settled display, skipping the
    /// remaining helix, glitch frames and bursts. Used when the page hides.
    pub fn settle<R: RandomPicker + ?Sized>(
        &mut self,
        now: f64,
        generator: &PasswordGenerator,
        rng: &mut R,
        view: &mut dyn SequenceView,
    ) -> Result<Vec<SequenceEvent>> {
        let mut events = Vec::new();
        if let Cursor::Preparing { .. } = self.cursor {
            events.push(self.begin_generating(now, generator, rng, view)?);
        }

        match self.cursor {
            Cursor::Helix { .. }
            | Cursor::Glitch { .. }
            | Cursor::Commit { .. }
            | Cursor::Settle { .. } => {
                if self.phase != SequencePhase::Revealing {
                    self.set_phase(SequencePhase::Revealing, view);
                }
                self.revealed = self.password.iter().collect();
                self.complete(now, view);
                log::info!("Sequence settled early");
            }
            Cursor::Idle | Cursor::Preparing { .. } | Cursor::Hold { .. } => {}
        }

        Ok(events)
    }

    fn begin_generating<R: RandomPicker + ?Sized>(
        &mut self,
        at: f64,
        generator: &PasswordGenerator,
        rng: &mut R,
        view: &mut dyn SequenceView,
    ) -> Result<SequenceEvent> {
        view.set_overlay(true);
        self.set_phase(SequencePhase::Generating, view);

        let password = match generator.generate(rng) {
            Ok(password) => password,
            Err(e) => {
                log::error!("Password generation failed: {e}");
                self.cleanup(view);
                return Err(e);
            }
        };
        log::info!(
            "Generated {} password ({} chars)",
            generator.tier().as_str(),
            password.len()
        );

        self.password = password.chars().collect();
        self.cursor = if self.password.is_empty() {
            Cursor::Settle { at }
        } else {
            Cursor::Helix { started: at }
        };
        Ok(SequenceEvent::Generated(password))
    }

    fn complete(&mut self, at: f64, view: &mut dyn SequenceView) {
        let text: String = self.password.iter().collect();
        view.set_display(&text);
        self.set_phase(SequencePhase::Complete, view);
        self.cursor = Cursor::Hold {
            until: at + COMPLETE_HOLD_MS,
        };
    }

    fn cleanup(&mut self, view: &mut dyn SequenceView) {
        view.set_overlay(false);
        view.clear_helix();
        self.cursor = Cursor::Idle;
        self.set_phase(SequencePhase::Idle, view);
    }

    /// Revealed prefix, optional glitch character, then placeholders
    fn padded(&self, glitch: Option<char>, remaining: usize) -> String {
        let mut text = String::with_capacity(self.password.len() + 1);
        text.push_str(&self.revealed);
        if let Some(c) = glitch {
            text.push(c);
        }
        text.extend(std::iter::repeat_n(PLACEHOLDER, remaining));
        text
    }

    fn set_phase(&mut self, phase: SequencePhase, view: &mut dyn SequenceView) {
        self.phase = phase;
        view.phase_changed(phase);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::password::picker::tests::ScriptedPicks;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingView {
        pub phases: Vec<SequencePhase>,
        pub overlay: Vec<bool>,
        pub displays: Vec<String>,
        pub helix: Vec<f32>,
        pub helix_clears: usize,
    }

    impl SequenceView for RecordingView {
        fn phase_changed(&mut self, phase: SequencePhase) {
            self.phases.push(phase);
        }
        fn set_overlay(&mut self, active: bool) {
            self.overlay.push(active);
        }
        fn set_display(&mut self, text: &str) {
            self.displays.push(text.to_string());
        }
        fn draw_helix(&mut self, progress: f32) {
            self.helix.push(progress);
        }
        fn clear_helix(&mut self) {
            self.helix_clears += 1;
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub bursts: Vec<(usize, usize)>,
    }

    impl CharacterRevealSink for RecordingSink {
        fn character_revealed(&mut self, index: usize, total: usize) {
            self.bursts.push((index, total));
        }
    }

    struct Harness {
        controller: SequenceController,
        generator: PasswordGenerator,
        picks: ScriptedPicks,
        view: RecordingView,
        sink: RecordingSink,
    }

    impl Harness {
        /// Chill generator scripted to produce "CatMoon37@"
        fn new() -> Self {
            Self {
                controller: SequenceController::new(),
                generator: PasswordGenerator::default(),
                picks: ScriptedPicks::new(&[0, 3, 2, 6, 1]),
                view: RecordingView::default(),
                sink: RecordingSink::default(),
            }
        }

        fn trigger(&mut self, now: f64) -> bool {
            self.controller.trigger(now, &mut self.view)
        }

        fn update(&mut self, now: f64) -> Vec<SequenceEvent> {
            self.controller
                .update(now, &self.generator, &mut self.picks, &mut self.view, &mut self.sink)
                .unwrap()
        }
    }

    // Reveal starts at 800 + 3000; each character takes 300 ms
    const REVEAL_START: f64 = PREPARE_MS + HELIX_MS;
    const LAST_COMMIT: f64 = REVEAL_START + 9.0 * 300.0 + 150.0;

    #[test]
    fn test_full_timeline() {
        let mut h = Harness::new();
        assert!(h.trigger(0.0));
        assert_eq!(h.controller.phase(), SequencePhase::Preparing);

        assert!(h.update(799.0).is_empty());
        assert_eq!(h.controller.phase(), SequencePhase::Preparing);

        let events = h.update(800.0);
        assert_eq!(events, vec![SequenceEvent::Generated("CatMoon37@".into())]);
        assert_eq!(h.controller.phase(), SequencePhase::Generating);
        assert_eq!(h.view.overlay, vec![true]);
        assert_eq!(h.view.helix, vec![0.0]);

        h.update(2300.0);
        assert_eq!(h.view.helix.last(), Some(&0.5));
        assert!(h.view.displays.is_empty());

        h.update(REVEAL_START);
        assert_eq!(h.controller.phase(), SequencePhase::Revealing);
        // First glitch frame: scripted picks are exhausted so the glitch is '!'
        assert_eq!(h.view.displays.last().unwrap(), "!_________");

        h.update(LAST_COMMIT);
        assert_eq!(h.view.displays.last().unwrap(), "CatMoon37@");
        assert_eq!(h.sink.bursts, (0..10).map(|i| (i, 10)).collect::<Vec<_>>());

        h.update(LAST_COMMIT + CHAR_DELAY_MS);
        assert_eq!(h.controller.phase(), SequencePhase::Complete);

        let events = h.update(LAST_COMMIT + CHAR_DELAY_MS + COMPLETE_HOLD_MS);
        assert_eq!(events, vec![SequenceEvent::Finished]);
        assert!(h.controller.is_idle());
        assert_eq!(h.view.overlay, vec![true, false]);
        assert_eq!(h.view.helix_clears, 1);
        assert_eq!(
            h.view.phases,
            vec![
                SequencePhase::Preparing,
                SequencePhase::Generating,
                SequencePhase::Revealing,
                SequencePhase::Complete,
                SequencePhase::Idle,
            ]
        );
    }

    #[test]
    fn test_typewriter_frames_for_first_character() {
        let mut h = Harness::new();
        h.trigger(0.0);
        h.update(REVEAL_START);
        h.update(REVEAL_START + 50.0);
        h.update(REVEAL_START + 100.0);
        h.update(REVEAL_START + 150.0);
        assert_eq!(
            h.view.displays,
            vec!["!_________", "!_________", "!_________", "C_________"]
        );
        assert_eq!(h.sink.bursts, vec![(0, 10)]);

        // Second character's glitch waits out the 150 ms pause
        h.update(REVEAL_START + 299.0);
        assert_eq!(h.view.displays.len(), 4);
        h.update(REVEAL_START + 300.0);
        assert_eq!(h.view.displays.last().unwrap(), "C!________");
    }

    #[test]
    fn test_retrigger_is_ignored() {
        let mut h = Harness::new();
        assert!(h.trigger(0.0));
        h.update(800.0);
        assert!(!h.trigger(900.0));
        assert!(!h.trigger(REVEAL_START + 10.0));

        h.update(LAST_COMMIT + CHAR_DELAY_MS);
        assert!(!h.trigger(LAST_COMMIT + 200.0));

        assert_eq!(h.controller.password().as_deref(), Some("CatMoon37@"));
        assert_eq!(h.view.helix.iter().filter(|p| **p == 0.0).count(), 1);
        assert_eq!(h.view.overlay, vec![true]);
        assert_eq!(h.sink.bursts.len(), 10);
        assert_eq!(
            h.view.phases.iter().filter(|p| **p == SequencePhase::Preparing).count(),
            1
        );
    }

    #[test]
    fn test_single_catch_up_update_runs_everything() {
        let mut h = Harness::new();
        h.trigger(0.0);
        let events = h.update(1_000_000.0);
        assert_eq!(events.len(), 2);
        assert!(h.controller.is_idle());
        assert_eq!(h.sink.bursts.len(), 10);
    }

    #[test]
    fn test_can_run_again_after_finish() {
        let mut h = Harness::new();
        h.trigger(0.0);
        h.update(1_000_000.0);
        h.picks = ScriptedPicks::new(&[1, 1, 0, 0, 0]);
        assert!(h.trigger(1_000_001.0));
        let events = h.update(1_000_801.0);
        assert_eq!(events, vec![SequenceEvent::Generated("DogDog11!".into())]);
    }

    #[test]
    fn test_settle_mid_reveal() {
        let mut h = Harness::new();
        h.trigger(0.0);
        h.update(REVEAL_START + 400.0);
        let bursts = h.sink.bursts.len();

        let events = h
            .controller
            .settle(5000.0, &h.generator, &mut h.picks, &mut h.view)
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(h.controller.phase(), SequencePhase::Complete);
        assert_eq!(h.view.displays.last().unwrap(), "CatMoon37@");

        // No more bursts after settling, hold runs from the settle time
        h.update(7999.0);
        assert_eq!(h.sink.bursts.len(), bursts);
        assert!(!h.controller.is_idle());
        h.update(8000.0);
        assert!(h.controller.is_idle());
    }

    #[test]
    fn test_settle_while_preparing_generates() {
        let mut h = Harness::new();
        h.trigger(0.0);
        let events = h
            .controller
            .settle(100.0, &h.generator, &mut h.picks, &mut h.view)
            .unwrap();
        assert_eq!(events, vec![SequenceEvent::Generated("CatMoon37@".into())]);
        assert_eq!(
            h.view.phases,
            vec![
                SequencePhase::Preparing,
                SequencePhase::Generating,
                SequencePhase::Revealing,
                SequencePhase::Complete,
            ]
        );
    }

    #[test]
    fn test_settle_when_idle_does_nothing() {
        let mut h = Harness::new();
        let events = h
            .controller
            .settle(0.0, &h.generator, &mut h.picks, &mut h.view)
            .unwrap();
        assert!(events.is_empty());
        assert!(h.view.phases.is_empty());
    }

    #[test]
    fn test_random_glitches_stay_printable() {
        let mut controller = SequenceController::new();
        let mut generator = PasswordGenerator::default();
        generator.set_tier(crate::password::ComplexityTier::Fire);
        let mut rng = Pcg32::seed_from_u64(31);
        let mut view = RecordingView::default();
        let mut sink = RecordingSink::default();

        controller.trigger(0.0, &mut view);
        let mut now = 0.0;
        while now < 20_000.0 {
            controller
                .update(now, &generator, &mut rng, &mut view, &mut sink)
                .unwrap();
            now += 16.0;
        }

        let password = controller.password().unwrap();
        assert!(controller.is_idle());
        assert_eq!(sink.bursts.len(), password.len());
        for text in &view.displays {
            assert_eq!(text.chars().count(), password.len());
            assert!(text.chars().all(|c| c.is_ascii_graphic()));
        }
        assert_eq!(view.displays.last().unwrap(), &password);
    }
}
