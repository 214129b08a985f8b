/// Resolves a caller-supplied `limit` against a default and an upper bound.
/// Negative values read as zero.
pub fn clamp_limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(0, max.max(0))
}
