//! Distortion / Waveshaping
//!
//! A waveshaper applies a transfer function to each sample:
//!   output = f(input * drive)
//!
//! When drive is low the signal stays in the linear region of f() and passes
//! through mostly unchanged. As drive increases the signal hits the nonlinear
//! parts of f(), creating harmonics.
//!
//! Soft Clip (rational):
//!   f(x) = x / (1 + |x|)
//!   - Smooth, warm saturation, gradually compresses peaks

/// Soft clipping using the x / (1 + |x|) transfer function.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

/// Map a 0..1 drive control to a waveshaper pre-gain (1x to 40x).
#[inline]
pub fn drive_gain(amount: f32) -> f32 {
    let amount = amount.clamp(0.0, 1.0);
    1.0 + amount * amount * 39.0
}
