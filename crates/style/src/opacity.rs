pub const DEFAULT_OPACITY: f32 = 1.0;

/// Returns `requested` when it is a finite value in `[0, 1]`, else `default`.
pub fn resolve_opacity(requested: Option<f32>, default: f32) -> f32 {
    match requested {
        Some(v) if v.is_finite() && (0.0..=1.0).contains(&v) => v,
        _ => default,
    }
}
