//! Ring sample buffer (spec.md §4.1): a bounded circular store of pulses,
//! written by an RF interrupt producer and read by a scanner running on a
//! separate consumer context (spec.md §5).
//!
//! Capacity is a compile-time const generic, the same way the donor
//! codebase sizes its fixed buffers (`PAYLOAD: [u16; 18 * NUM_MOTORS]`)
//! rather than reaching for an allocator that doesn't exist under
//! `no_std`. Must be a power of two — see [`SampleBuffer::new`].

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::types::Pulse;

/// Convenience alias matching spec.md's "typically 32768 entries".
pub type DefaultSampleBuffer = SampleBuffer<32768>;

pub struct SampleBuffer<const CAP: usize> {
    samples: [Pulse; CAP],
    /// Monotonic write cursor. Published with `Release` after the paired
    /// sample store in [`append`](Self::append), and read with `Acquire` by
    /// [`copy_from`](Self::copy_from) and [`head`](Self::head) — this is
    /// the lock-free producer/consumer handshake spec.md §5/§9 calls for:
    /// the hot interrupt path never blocks on a lock.
    head_index: AtomicUsize,
    /// Scratch field set by the scanner: the estimated symbol period of the
    /// best candidate currently represented by this buffer's contents.
    pub short_pulse_dur_us: u32,
}

impl<const CAP: usize> SampleBuffer<CAP> {
    /// `alloc(capacity)` from spec.md §4.1: capacity lives in the type, so
    /// this just builds a zeroed buffer. `CAP` must be a power of two —
    /// [`append`](Self::append) masks the write cursor with `CAP - 1`
    /// instead of computing a remainder on every interrupt-context write,
    /// which only agrees with the modular indexing [`get`](Self::get) uses
    /// once the cursor itself wraps past `usize::MAX`.
    pub const fn new() -> Self {
        assert!(CAP.is_power_of_two(), "SampleBuffer capacity must be a power of two");
        Self {
            samples: [Pulse { level: false, duration_us: 0 }; CAP],
            head_index: AtomicUsize::new(0),
            short_pulse_dur_us: 0,
        }
    }

    /// Zeroes contents and resets the write cursor.
    pub fn reset(&mut self) {
        self.samples = [Pulse { level: false, duration_us: 0 }; CAP];
        self.head_index.store(0, Ordering::Relaxed);
        self.short_pulse_dur_us = 0;
    }

    /// Called from interrupt context by the producer. Writes at the current
    /// head, then advances it.
    pub fn append(&mut self, level: bool, duration_us: u32) {
        let h = self.head_index.load(Ordering::Relaxed);
        let idx = h & (CAP - 1);
        self.samples[idx] = Pulse { level, duration_us };
        self.head_index.store(h.wrapping_add(1), Ordering::Release);
    }

    /// `i` is interpreted modulo `CAP`; negative and overflowing indices
    /// wrap. This is the "cheap and critical property" spec.md §4.1 calls
    /// out: `get(head() - k)` retrieves the `k`th most recent sample.
    pub fn get(&self, i: i64) -> Pulse {
        let idx = i.rem_euclid(CAP as i64) as usize;
        self.samples[idx]
    }

    /// The current write-cursor position (or, for a working copy that's had
    /// [`center`](Self::center) called on it, the origin other operations
    /// address relative offsets against).
    pub fn head(&self) -> i64 {
        self.head_index.load(Ordering::Acquire) as i64
    }

    /// `get(head() + rel)` — the relative-addressing mode used by
    /// [`crate::line_code::convert_signal_to_bits`] and the dispatcher, so
    /// a caller can say "32 samples before this run" without knowing the
    /// buffer's absolute coordinates.
    pub fn get_relative(&self, rel: i64) -> Pulse {
        self.get(self.head() + rel)
    }

    /// Snapshots `src` into `self`: contents, head, and
    /// `short_pulse_dur_us`. The consumer takes this snapshot *before*
    /// analysis, tolerating the producer overwriting the oldest samples
    /// mid-scan (spec.md §5) rather than taking a lock.
    pub fn copy_from(&mut self, src: &Self) {
        self.samples = src.samples;
        self.head_index.store(src.head_index.load(Ordering::Acquire), Ordering::Relaxed);
        self.short_pulse_dur_us = src.short_pulse_dur_us;
    }

    /// Sets `head` so that relative index 0 corresponds to original index
    /// `i - lookback`. `lookback` is small and fixed — see
    /// [`CENTER_LOOKBACK`] — so the dispatcher can widen its search window
    /// slightly behind a detected run without the caller doing the
    /// subtraction itself.
    pub fn center(&mut self, i: i64) {
        let new_head = i - CENTER_LOOKBACK;
        self.head_index.store(new_head.rem_euclid(CAP as i64) as usize, Ordering::Relaxed);
    }
}

/// How far before the scanner's run-start index `center` rewinds the
/// origin. Chosen to match the couple of pulses of slop
/// `convert_signal_to_bits`'s `-32` sample / `+100` tail widening already
/// assumes exists around a detected run (spec.md §4.8); this is the small,
/// fixed margin spec.md §4.1 describes without pinning a number.
pub const CENTER_LOOKBACK: i64 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_get_roundtrip() {
        let mut buf: SampleBuffer<8> = SampleBuffer::new();
        for i in 0..8u32 {
            buf.append(i % 2 == 0, 100 + i);
        }
        for i in 0..8i64 {
            let p = buf.get(i);
            assert_eq!(p.duration_us, 100 + i as u32);
        }
    }

    #[test]
    fn negative_and_overflowing_indices_wrap() {
        let mut buf: SampleBuffer<4> = SampleBuffer::new();
        buf.append(true, 10);
        buf.append(false, 20);
        buf.append(true, 30);
        buf.append(false, 40);

        assert_eq!(buf.get(-1).duration_us, buf.get(3).duration_us);
        assert_eq!(buf.get(4).duration_us, buf.get(0).duration_us);
        assert_eq!(buf.get(-4).duration_us, buf.get(0).duration_us);
    }

    #[test]
    fn get_head_minus_k_is_kth_most_recent() {
        let mut buf: SampleBuffer<16> = SampleBuffer::new();
        for i in 0..10u32 {
            buf.append(true, i);
        }
        // Most recently written sample is duration 9, at index head()-1.
        let head = buf.head();
        assert_eq!(buf.get(head - 1).duration_us, 9);
        assert_eq!(buf.get(head - 2).duration_us, 8);
    }

    #[test]
    fn append_overwrites_oldest_silently_once_full() {
        let mut buf: SampleBuffer<4> = SampleBuffer::new();
        for i in 0..6u32 {
            buf.append(true, i);
        }
        // Only the last 4 appends (2,3,4,5) should remain.
        let head = buf.head();
        assert_eq!(buf.get(head - 1).duration_us, 5);
        assert_eq!(buf.get(head - 4).duration_us, 2);
    }

    #[test]
    fn reset_zeroes_contents_and_head() {
        let mut buf: SampleBuffer<4> = SampleBuffer::new();
        buf.append(true, 123);
        buf.short_pulse_dur_us = 77;
        buf.reset();
        assert_eq!(buf.head(), 0);
        assert_eq!(buf.short_pulse_dur_us, 0);
        assert_eq!(buf.get(0).duration_us, 0);
    }

    #[test]
    fn copy_from_snapshots_head_and_scratch_field() {
        let mut src: SampleBuffer<8> = SampleBuffer::new();
        for i in 0..5u32 {
            src.append(i % 2 == 0, i * 10);
        }
        src.short_pulse_dur_us = 250;

        let mut dst: SampleBuffer<8> = SampleBuffer::new();
        dst.copy_from(&src);

        assert_eq!(dst.head(), src.head());
        assert_eq!(dst.short_pulse_dur_us, 250);
        for i in 0..5i64 {
            assert_eq!(dst.get(i), src.get(i));
        }
    }

    #[test]
    fn center_repositions_relative_origin() {
        let mut buf: SampleBuffer<16> = SampleBuffer::new();
        for i in 0..16u32 {
            buf.append(true, i);
        }
        let original = buf.get(10);
        buf.center(10);
        // relative index `CENTER_LOOKBACK` now reads what absolute index 10 held.
        assert_eq!(buf.get_relative(CENTER_LOOKBACK), original);
    }
}
