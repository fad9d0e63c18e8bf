// src/utils/fixed_point.rs
use crate::error::{ChangeError, Result};

/// Nodata marker for int16 outputs
pub const FIXED_POINT_NODATA: i16 = -10000;

/// Change rasters live in [-2, 2]; anything beyond is clamped
const CHANGE_LIMIT: f64 = 2.0;

/// Scale factors must be positive; the stored SCALE metadata is `1 / scale_factor`
pub fn validate_scale_factor(scale_factor: i32) -> Result<()> {
    if scale_factor <= 0 {
        return Err(ChangeError::Config(format!(
            "scale_factor must be positive, got {}",
            scale_factor
        )));
    }
    Ok(())
}

/// Scale values to int16 (`round(value * scale_factor)`), clamping so the
/// largest change still fits. Non-finite values become `FIXED_POINT_NODATA`.
///
/// A non-positive `scale_factor` is treated as 1.
pub fn to_fixed_point(data: &[f64], scale_factor: i32) -> Vec<i16> {
    let scale = scale_factor.max(1) as f64;
    let limit = CHANGE_LIMIT.min((i16::MAX as f64 - 1.0) / scale);
    data.iter()
        .map(|&value| {
            if !value.is_finite() {
                FIXED_POINT_NODATA
            } else {
                (value.clamp(-limit, limit) * scale).round() as i16
            }
        })
        .collect()
}
