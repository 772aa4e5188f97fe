use std::time::Duration;

/// Addressable matrix rows.
pub const GRID_ROWS: usize = 32;
/// Addressable matrix columns.
pub const GRID_COLS: usize = 32;

/// Per-cell "last active" tracker used to drive fade-based rendering.
///
/// Each cell stores the monotonic clock reading of its most recent ON
/// event; rendering intensity is a pure function of elapsed time, so stale
/// cells simply render as inactive without sweeps or eviction. The clock is
/// caller-supplied: live consumers pass wall-clock elapsed time, offline
/// replay maps device ticks onto the same axis.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use aerscope_core::PresenceGrid;
///
/// let mut grid = PresenceGrid::new();
/// grid.record_active(2, 3, Duration::from_millis(10));
/// let intensity = grid.intensity(
///     2,
///     3,
///     Duration::from_millis(110),
///     Duration::from_millis(200),
/// );
/// assert!((intensity - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct PresenceGrid {
    last_active: [[Option<Duration>; GRID_COLS]; GRID_ROWS],
}

impl PresenceGrid {
    pub fn new() -> Self {
        Self {
            last_active: [[None; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Record an ON event at `now`. Out-of-range coordinates are silently
    /// dropped; the wire carries full bytes, the matrix is 32x32.
    pub fn record_active(&mut self, row: u8, col: u8, now: Duration) {
        let (row, col) = (row as usize, col as usize);
        if row < GRID_ROWS && col < GRID_COLS {
            self.last_active[row][col] = Some(now);
        }
    }

    /// Rendering intensity in `[0, 1]` at `now`.
    ///
    /// Never-active cells (and out-of-range coordinates) are 0. A zero
    /// `decay` means persistence mode: maximal forever once set. Otherwise
    /// intensity falls linearly from 1 at age zero to 0 at `age >= decay`.
    pub fn intensity(&self, row: u8, col: u8, now: Duration, decay: Duration) -> f32 {
        let (row, col) = (row as usize, col as usize);
        if row >= GRID_ROWS || col >= GRID_COLS {
            return 0.0;
        }
        let last = match self.last_active[row][col] {
            Some(last) => last,
            None => return 0.0,
        };
        if decay.is_zero() {
            return 1.0;
        }
        let age = now.saturating_sub(last);
        if age >= decay {
            0.0
        } else {
            1.0 - age.as_secs_f32() / decay.as_secs_f32()
        }
    }
}

impl Default for PresenceGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::PresenceGrid;

    const DECAY: Duration = Duration::from_millis(200);

    #[test]
    fn never_active_cell_has_zero_intensity() {
        let grid = PresenceGrid::new();
        assert_eq!(grid.intensity(0, 0, Duration::from_secs(1), DECAY), 0.0);
    }

    #[test]
    fn intensity_decays_linearly() {
        let mut grid = PresenceGrid::new();
        let t0 = Duration::from_millis(500);
        grid.record_active(4, 7, t0);

        assert_eq!(grid.intensity(4, 7, t0, DECAY), 1.0);
        let halfway = grid.intensity(4, 7, t0 + Duration::from_millis(100), DECAY);
        assert!((halfway - 0.5).abs() < 1e-6);
        assert_eq!(grid.intensity(4, 7, t0 + DECAY, DECAY), 0.0);
        assert_eq!(
            grid.intensity(4, 7, t0 + Duration::from_secs(10), DECAY),
            0.0
        );
    }

    #[test]
    fn zero_decay_means_persistence() {
        let mut grid = PresenceGrid::new();
        grid.record_active(0, 31, Duration::from_millis(1));
        let much_later = Duration::from_secs(3600);
        assert_eq!(grid.intensity(0, 31, much_later, Duration::ZERO), 1.0);
    }

    #[test]
    fn refresh_restarts_the_fade() {
        let mut grid = PresenceGrid::new();
        grid.record_active(1, 1, Duration::from_millis(0));
        grid.record_active(1, 1, Duration::from_millis(150));
        let intensity = grid.intensity(1, 1, Duration::from_millis(200), DECAY);
        assert!((intensity - 0.75).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_coordinates_are_dropped() {
        let mut grid = PresenceGrid::new();
        grid.record_active(32, 0, Duration::from_millis(1));
        grid.record_active(0, 255, Duration::from_millis(1));
        assert_eq!(grid.intensity(32, 0, Duration::from_millis(1), DECAY), 0.0);
        assert_eq!(
            grid.intensity(0, 255, Duration::from_millis(1), Duration::ZERO),
            0.0
        );
    }
}
