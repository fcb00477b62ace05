pub fn l2_norm(v: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for x in v {
        sum += x * x;
    }
    sum.sqrt()
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
    }
    dot
}

/// `dot(a, b) / (a_norm * b_norm)` with the norms supplied by the caller. A
/// zero norm yields NaN; it is not defaulted to 0. Slices of different
/// lengths are compared over the shorter one.
pub fn cosine_similarity(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    dot(a, b) / (a_norm * b_norm)
}
