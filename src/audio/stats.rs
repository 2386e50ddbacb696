/// Session pitch summary, rounded to whole Hertz for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitchSummary {
    pub min_hz: u32,
    pub max_hz: u32,
    pub mean_hz: u32,
}

/// Reduce a session's pitch log to min/max/mean. An empty log is a normal
/// "no data" outcome, not an error.
pub fn summarize(log: &[f32]) -> Option<PitchSummary> {
    if log.is_empty() {
        return None;
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f32;
    for &pitch in log {
        min = min.min(pitch);
        max = max.max(pitch);
        sum += pitch;
    }

    Some(PitchSummary {
        min_hz: min.round() as u32,
        max_hz: max.round() as u32,
        mean_hz: (sum / log.len() as f32).round() as u32,
    })
}
