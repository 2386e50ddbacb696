/// Number of points handed to the external line-chart surface.
pub const DISPLAY_POINTS: usize = 128;

/// Reduce a time-domain window to `points` samples by fixed-stride picking.
/// No interpolation or filtering; aliasing is accepted as a visual-only
/// simplification.
pub fn downsample(time: &[u8], points: usize) -> Vec<u8> {
    assert!(points > 0, "display length must be positive");
    assert!(
        time.len() >= points,
        "window shorter than display length ({} < {})",
        time.len(),
        points
    );
    let step = time.len() / points;
    (0..points).map(|i| time[i * step]).collect()
}
