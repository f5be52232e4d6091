//! Output dimension math for each resize policy.

use crate::core::ResizePolicy;

/// Computes the output dimensions for an image of `width` x `height`.
///
/// Proportional sides are rounded half up using integer arithmetic, so the
/// result never depends on float precision. A proportional side that would
/// round to zero is kept at one pixel.
pub fn resolve_dimensions(width: u32, height: u32, policy: ResizePolicy) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    match policy {
        ResizePolicy::NoResize => (width, height),
        ResizePolicy::FixedWidth { width: target } => (target, scale(height, target, width)),
        ResizePolicy::FixedHeight { height: target } => (scale(width, target, height), target),
        ResizePolicy::FixedBoth { width, height } => (width, height),
    }
}

/// `round(side * target / reference)`, at least 1.
fn scale(side: u32, target: u32, reference: u32) -> u32 {
    let side = side as u128;
    let target = target as u128;
    let reference = reference as u128;
    let scaled = (side * target * 2 + reference) / (reference * 2);
    scaled.clamp(1, u32::MAX as u128) as u32
}
