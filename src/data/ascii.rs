/// Intensity ramp, darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Renders a square feature vector (values in [0, 1]) as ASCII art, one text
/// line per image row. Vectors whose length is not a perfect square are laid
/// out as a single row.
pub fn to_ascii(features: &[f64]) -> String {
    let side = (features.len() as f64).sqrt().round() as usize;
    let width = if side * side == features.len() && side > 0 { side } else { features.len().max(1) };

    let mut out = String::with_capacity(features.len() + features.len() / width + 1);
    for row in features.chunks(width) {
        for &v in row {
            out.push(shade(v));
        }
        out.push('\n');
    }
    out
}

fn shade(v: f64) -> char {
    let top = (RAMP.len() - 1) as f64;
    let idx = (v.clamp(0.0, 1.0) * top).round() as usize;
    RAMP[idx] as char
}
