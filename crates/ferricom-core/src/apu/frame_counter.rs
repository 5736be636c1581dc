//! Frame sequencer driving envelopes, length counters, and sweeps.

/// Sequencer mode selected by `$4017` bit 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerMode {
    #[default]
    FourStep,
    FiveStep,
}

/// Events produced by one sequencer step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTick {
    pub quarter: bool,
    pub half: bool,
    pub frame_irq: bool,
}

/// CPU-cycle indices of the quarter/half frame events.
const STEP_1: u32 = 7457;
const STEP_2: u32 = 14913;
const STEP_3: u32 = 22371;
const STEP_4: u32 = 29829;
const STEP_5: u32 = 37281;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCounter {
    mode: SequencerMode,
    irq_inhibit: bool,
    cycle: u32,
}

impl FrameCounter {
    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    pub fn irq_inhibited(&self) -> bool {
        self.irq_inhibit
    }

    /// `$4017` write: selects the mode, restarts the sequence, and in
    /// five-step mode clocks quarter+half units immediately. Returns true
    /// when that immediate clock should fire.
    pub fn configure(&mut self, value: u8) -> bool {
        self.mode = if value & 0x80 != 0 {
            SequencerMode::FiveStep
        } else {
            SequencerMode::FourStep
        };
        self.irq_inhibit = value & 0x40 != 0;
        self.cycle = 0;
        self.mode == SequencerMode::FiveStep
    }

    /// Advances one CPU cycle and reports due frame events.
    ///
    /// Only the four-step sequence raises the frame IRQ; the five-step mode
    /// exists precisely to let games silence it.
    pub fn step(&mut self) -> FrameTick {
        self.cycle += 1;
        let mut tick = FrameTick::default();

        match (self.mode, self.cycle) {
            (_, STEP_1) | (_, STEP_3) => tick.quarter = true,
            (_, STEP_2) => {
                tick.quarter = true;
                tick.half = true;
            }
            (SequencerMode::FourStep, STEP_4) => {
                tick.quarter = true;
                tick.half = true;
                tick.frame_irq = !self.irq_inhibit;
                self.cycle = 0;
            }
            (SequencerMode::FiveStep, STEP_5) => {
                tick.quarter = true;
                tick.half = true;
                self.cycle = 0;
            }
            _ => {}
        }
        tick
    }
}
