//! Gapless playback scheduling for streamed model audio.
//!
//! Model audio arrives as segments faster than real time. Each segment is
//! scheduled at a cursor that only moves forward: the next segment starts at
//! `max(cursor, now)`, so back-to-back segments are seamless and a late
//! segment after a pause starts immediately instead of in the past. The
//! cursor is also the speaking indicator: the companion is speaking exactly
//! while `now` is before the end of the last scheduled segment. Time is an
//! explicit parameter so scheduling stays deterministic under test.

#[derive(Debug, Default)]
pub struct PlaybackTimeline {
    /// End time of the last scheduled segment, seconds on the caller's clock.
    cursor: f64,
}

impl PlaybackTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a segment of `duration` seconds at time `now`. Returns the
    /// start time: the cursor when audio is still queued, `now` otherwise.
    pub fn schedule(&mut self, now: f64, duration: f64) -> f64 {
        let start = if self.cursor > now { self.cursor } else { now };
        self.cursor = start + duration;
        start
    }

    /// Drop all queued audio and reset the cursor to `now`. The next
    /// segment after an interruption starts fresh.
    pub fn interrupt(&mut self, now: f64) {
        self.cursor = now;
    }

    /// Whether scheduled audio is still pending or playing at `now`.
    /// Segments leave the window naturally once the clock passes the
    /// cursor; no explicit completion callback is needed.
    pub fn is_speaking(&self, now: f64) -> bool {
        self.cursor > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_to_back_segments_are_gapless() {
        let mut tl = PlaybackTimeline::new();
        // Two segments arrive at the same instant; the second starts exactly
        // where the first ends.
        let first = tl.schedule(10.0, 0.5);
        let second = tl.schedule(10.0, 0.25);
        assert_eq!(first, 10.0);
        assert_eq!(second, 10.5);
        assert!(tl.is_speaking(10.6));
    }

    #[test]
    fn late_segment_starts_now_not_in_the_past() {
        let mut tl = PlaybackTimeline::new();
        tl.schedule(10.0, 0.5); // ends at 10.5
        // Next segment arrives after a gap; it must not be scheduled at 10.5.
        let start = tl.schedule(12.0, 0.5);
        assert_eq!(start, 12.0);
    }

    #[test]
    fn cursor_never_moves_backward() {
        let mut tl = PlaybackTimeline::new();
        tl.schedule(10.0, 1.0);
        // An earlier "now" (clock jitter) still schedules at the cursor.
        let start = tl.schedule(9.0, 1.0);
        assert_eq!(start, 11.0);
    }

    #[test]
    fn interrupt_clears_queue_and_resets_cursor() {
        let mut tl = PlaybackTimeline::new();
        tl.schedule(10.0, 5.0);
        tl.schedule(10.0, 5.0);
        assert!(tl.is_speaking(10.0));

        tl.interrupt(11.0);
        assert!(!tl.is_speaking(11.0));

        // Post-interruption audio starts fresh at its own arrival time.
        let start = tl.schedule(11.5, 1.0);
        assert_eq!(start, 11.5);
    }

    #[test]
    fn speaking_clears_once_playback_window_passes() {
        let mut tl = PlaybackTimeline::new();
        tl.schedule(1.0, 0.1); // 100ms segment ending at 1.1
        assert!(tl.is_speaking(1.05));
        // Long after the segment ended, with no interruption in between,
        // the timeline must read as silent again.
        assert!(!tl.is_speaking(1.2));
        assert!(!tl.is_speaking(60.0));
    }
}
