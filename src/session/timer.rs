use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Ready,
    Running,
    Stopped,
}

/// Solve timer. Armed to zero by `arm`, started by the first move event,
/// stopped on the final checkpoint match. While running it collects
/// (cube timestamp, host elapsed) pairs so the final duration can be
/// reconciled against hardware clocks instead of raw wall time.
pub struct SolveTimer {
    state: TimerState,
    started_at: Option<Instant>,
    stopped_ms: u64,
    samples: Vec<(f64, f64)>,
}

impl SolveTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            started_at: None,
            stopped_ms: 0,
            samples: Vec::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Arm at zero; the next move starts the clock.
    pub fn arm(&mut self) {
        self.state = TimerState::Ready;
        self.started_at = None;
        self.stopped_ms = 0;
        self.samples.clear();
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.started_at = None;
        self.stopped_ms = 0;
        self.samples.clear();
    }

    /// Record a move event. Starts the clock when armed, and also when a
    /// new attempt begins straight after a stop without re-arming.
    pub fn note_move(&mut self, cube_timestamp_ms: Option<f64>) {
        match self.state {
            TimerState::Ready | TimerState::Stopped => {
                self.state = TimerState::Running;
                self.started_at = Some(Instant::now());
                self.samples.clear();
            }
            TimerState::Running => {}
            TimerState::Idle => return,
        }
        if let (Some(ts), Some(start)) = (cube_timestamp_ms, self.started_at) {
            self.samples
                .push((ts, start.elapsed().as_secs_f64() * 1000.0));
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.state {
            TimerState::Running => self
                .started_at
                .map(|s| s.elapsed().as_millis() as u64)
                .unwrap_or(0),
            TimerState::Stopped => self.stopped_ms,
            _ => 0,
        }
    }

    /// Stop and return the final duration. With enough hardware
    /// timestamps the duration comes from the drift-corrected fit;
    /// otherwise from the host clock.
    pub fn stop(&mut self) -> u64 {
        let wall = self
            .started_at
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let fitted = fitted_duration_ms(&self.samples);
        self.stopped_ms = fitted.unwrap_or(wall);
        self.state = TimerState::Stopped;
        self.stopped_ms
    }
}

impl Default for SolveTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Least-squares fit of host elapsed time against cube timestamps.
/// Hardware clocks tick at a slightly different rate than the host, so
/// the solve duration is the fitted span between first and last move
/// rather than the raw difference of either clock.
pub fn fitted_duration_ms(samples: &[(f64, f64)]) -> Option<u64> {
    let first = samples.first()?;
    let last = samples.last()?;
    let n = samples.len() as f64;
    if samples.len() < 2 {
        return None;
    }
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;
    let var: f64 = samples.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if var == 0.0 {
        return None;
    }
    let cov: f64 = samples
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let slope = cov / var;
    let span = slope * (last.0 - first.0);
    if span.is_finite() && span >= 0.0 {
        Some(span.round() as u64)
    } else {
        None
    }
}

/// `m:ss.mmm` display form; pure presentation.
pub fn format_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    if minutes > 0 {
        format!("{minutes}:{seconds:02}.{millis:03}")
    } else {
        format!("{seconds}.{millis:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_ignores_moves() {
        let mut timer = SolveTimer::new();
        timer.note_move(Some(100.0));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.elapsed_ms(), 0);
    }

    #[test]
    fn armed_timer_starts_on_first_move() {
        let mut timer = SolveTimer::new();
        timer.arm();
        assert_eq!(timer.state(), TimerState::Ready);
        timer.note_move(None);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn stopped_timer_restarts_on_next_move_without_rearming() {
        let mut timer = SolveTimer::new();
        timer.arm();
        timer.note_move(None);
        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
        timer.note_move(None);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn fit_corrects_a_fast_cube_clock() {
        // Cube clock runs 2x host speed: 1000 cube ms per 500 host ms.
        let samples: Vec<(f64, f64)> = (0..=10)
            .map(|i| (i as f64 * 1000.0, i as f64 * 500.0))
            .collect();
        assert_eq!(fitted_duration_ms(&samples), Some(5000));
    }

    #[test]
    fn fit_is_robust_to_jitter() {
        // True slope 1.0 with alternating ±8ms host jitter.
        let samples: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let jitter = if i % 2 == 0 { 8.0 } else { -8.0 };
                (i as f64 * 100.0, i as f64 * 100.0 + jitter)
            })
            .collect();
        let span = fitted_duration_ms(&samples).unwrap();
        assert!((1880..=1920).contains(&span), "span {span}");
    }

    #[test]
    fn fit_needs_two_distinct_samples() {
        assert_eq!(fitted_duration_ms(&[]), None);
        assert_eq!(fitted_duration_ms(&[(5.0, 5.0)]), None);
        assert_eq!(fitted_duration_ms(&[(5.0, 5.0), (5.0, 9.0)]), None);
    }

    #[test]
    fn stop_without_samples_falls_back_to_wall_clock() {
        let mut timer = SolveTimer::new();
        timer.arm();
        timer.note_move(None);
        std::thread::sleep(std::time::Duration::from_millis(15));
        let ms = timer.stop();
        assert!(ms >= 15);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_time(0), "0.000");
        assert_eq!(format_time(850), "0.850");
        assert_eq!(format_time(61_250), "1:01.250");
        assert_eq!(format_time(600_000), "10:00.000");
    }
}
