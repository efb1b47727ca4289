//! Coherent-signal scanner (spec.md §4.6): locates a run of pulses whose
//! durations cluster into at most three classes per level, then hands each
//! such run to the dispatcher. Classification state (`ClassSlot`) is the
//! scanner's only scratch state per run; nothing here allocates.

use num_traits::Float;

use crate::{
    dispatcher::decode_signal,
    log::core_trace,
    ring_buffer::SampleBuffer,
    types::MessageInfo,
};

/// A run shorter than this many pulses is not "coherent" per spec.md §4.6 /
/// §8 ("fewer than 19 consecutive in-range, in-class pulses").
const MIN_COHERENT_PULSES: i64 = 19;

/// Pulses outside `[min_us, MAX_PULSE_DUR_US]` end a run immediately.
const MAX_PULSE_DUR_US: u32 = 4000;

/// A duration class is accepted within `mean/CLASS_TOLERANCE_DIVISOR` of its
/// running mean.
const CLASS_TOLERANCE_DIVISOR: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default)]
struct ClassSlot {
    mean_us: f32,
    count: u32,
}

impl ClassSlot {
    fn accepts(&self, dur: f32) -> bool {
        self.count > 0 && (dur - self.mean_us).abs() < self.mean_us / CLASS_TOLERANCE_DIVISOR
    }

    fn absorb(&mut self, dur: f32) {
        self.mean_us = (self.mean_us * self.count as f32 + dur) / (self.count as f32 + 1.0);
        self.count += 1;
    }
}

/// Per-level classification state: up to three duration classes.
#[derive(Clone, Copy, Default)]
struct LevelClasses([ClassSlot; 3]);

impl LevelClasses {
    /// Tries to absorb `dur` into an existing class, falling back to an
    /// empty slot. Returns `false` if neither exists (ends the run).
    fn classify(&mut self, dur: f32) -> bool {
        for slot in self.0.iter_mut() {
            if slot.accepts(dur) {
                slot.absorb(dur);
                return true;
            }
        }
        if let Some(empty) = self.0.iter_mut().find(|s| s.count == 0) {
            empty.mean_us = dur;
            empty.count = 1;
            return true;
        }
        core_trace!("scanner: class-slot overflow, dur_us={}", dur as u32);
        false
    }

    fn smallest_reliable_mean(&self) -> Option<f32> {
        self.0
            .iter()
            .filter(|s| s.count >= 3)
            .map(|s| s.mean_us)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f32| a.min(v))))
    }
}

/// Walks pulses from `start` classifying them; returns the run length (in
/// pulses) and, if at least one level settled a reliable class, the
/// estimated short-pulse duration.
fn classify_run<const CAP: usize>(
    buf: &SampleBuffer<CAP>,
    start: i64,
    min_us: u32,
) -> (i64, Option<u32>) {
    let mut classes = [LevelClasses::default(), LevelClasses::default()];
    let mut length: i64 = 0;

    // `buf.get` indexes modulo CAP and never signals "ran off the buffer",
    // so a run that happens to stay in-tolerance for the whole ring (a
    // legal, fully periodic signal, not malformed input) would otherwise
    // loop forever. CAP pulses is already more than the buffer holds.
    while length < CAP as i64 {
        let pulse = buf.get(start + length);
        if pulse.duration_us < min_us || pulse.duration_us > MAX_PULSE_DUR_US {
            break;
        }
        let level_classes = &mut classes[pulse.level as usize];
        if !level_classes.classify(pulse.duration_us as f32) {
            break;
        }
        length += 1;
    }

    // Class means are accepted anywhere in [min_us, MAX_PULSE_DUR_US], so a
    // class whose every sample lands exactly on a boundary can round there
    // too; clamp to the open interval the caller treats as "in range".
    let clamp_mean = |m: f32| -> u32 {
        m.round().clamp(min_us as f32 + 1.0, MAX_PULSE_DUR_US as f32 - 1.0) as u32
    };
    let short_pulse = match (classes[0].smallest_reliable_mean(), classes[1].smallest_reliable_mean()) {
        (Some(a), Some(b)) => Some(clamp_mean((a + b) / 2.0)),
        (Some(a), None) => Some(clamp_mean(a)),
        (None, Some(b)) => Some(clamp_mean(b)),
        (None, None) => None,
    };

    (length, short_pulse)
}

/// Telemetry the shell reads after each `scan_for_signal` call (spec.md
/// §4.6's "instrumentation counters"). Wraps on overflow — a session can run
/// indefinitely and these exist only for display, not accounting.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanStats {
    pub scan_count: u32,
    pub coherent_count: u32,
    pub decode_try_count: u32,
    pub decode_ok_count: u32,
}

/// Everything the shell keeps alive across calls to [`scan_for_signal`]: the
/// scanner's working copy of the sample buffer, the latched best candidate
/// (spec.md §5's "shared mutable state outside the buffer", owned
/// exclusively by the consumer), and telemetry.
pub struct ScannerState<const CAP: usize> {
    working: SampleBuffer<CAP>,
    pub detected_samples: SampleBuffer<CAP>,
    pub msg_info: MessageInfo,
    pub signal_bestlen: i64,
    pub signal_decoded: bool,
    pub stats: ScanStats,
}

impl<const CAP: usize> ScannerState<CAP> {
    pub const fn new() -> Self {
        Self {
            working: SampleBuffer::new(),
            detected_samples: SampleBuffer::new(),
            msg_info: MessageInfo::empty(),
            signal_bestlen: 0,
            signal_decoded: false,
            stats: ScanStats { scan_count: 0, coherent_count: 0, decode_try_count: 0, decode_ok_count: 0 },
        }
    }
}

/// Consumer-side entry point (spec.md §6): takes a snapshot of `source`,
/// walks it for coherent runs, and dispatches each one past 18 pulses to the
/// decoder registry. Replaces the latched candidate only if nothing decoded
/// so far and this run is either longer or itself decoded. Returns whether
/// the latched candidate is a successful decode after this call.
pub fn scan_for_signal<const CAP: usize>(
    state: &mut ScannerState<CAP>,
    source: &SampleBuffer<CAP>,
    min_us: u32,
) -> bool {
    state.working.copy_from(source);
    state.stats.scan_count = state.stats.scan_count.wrapping_add(1);

    let head = state.working.head();
    let total = CAP as i64;
    let mut i: i64 = 0;

    while i < total {
        let abs_index = head - total + i;
        let (run_length, short_pulse) = classify_run(&state.working, abs_index, min_us);

        if run_length > MIN_COHERENT_PULSES - 1 {
            state.stats.coherent_count = state.stats.coherent_count.wrapping_add(1);
            if let Some(short) = short_pulse {
                state.working.short_pulse_dur_us = short;
            }

            state.working.center(abs_index);
            let mut candidate_info = MessageInfo::empty();
            state.stats.decode_try_count = state.stats.decode_try_count.wrapping_add(1);
            let decoded = decode_signal(&state.working, run_length as usize, &mut candidate_info);
            if decoded {
                state.stats.decode_ok_count = state.stats.decode_ok_count.wrapping_add(1);
                core_trace!("scanner: decoded {} at run_length={}", candidate_info.decoder_name, run_length);
            }

            if !state.signal_decoded && (run_length > state.signal_bestlen || decoded) {
                state.msg_info = candidate_info;
                state.detected_samples.copy_from(&state.working);
                state.signal_bestlen = run_length;
                state.signal_decoded = decoded;
            }
        }

        i += run_length.max(1);
    }

    state.signal_decoded
}
