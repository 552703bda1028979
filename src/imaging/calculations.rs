//! Pure calculation functions for the breakpoint ladder.
//!
//! All functions here are pure and testable without any I/O or images.

/// The subset of the ladder a source image actually gets.
///
/// Returns exactly the ladder widths that do not exceed the intrinsic
/// width — derivatives are never upscaled. A source narrower than every
/// ladder width gets no scaled derivatives at all.
///
/// # Examples
/// ```
/// # use respimg::imaging::ladder_widths;
/// assert_eq!(ladder_widths(1000, &[320, 640, 768, 1024]), vec![320, 640, 768]);
/// assert_eq!(ladder_widths(200, &[320, 640]), Vec::<u32>::new());
/// ```
pub fn ladder_widths(intrinsic_width: u32, ladder: &[u32]) -> Vec<u32> {
    ladder
        .iter()
        .copied()
        .filter(|&w| w <= intrinsic_width)
        .collect()
}

/// Aspect-preserving height for a width-constrained resize.
///
/// Rounded to the nearest pixel, never below 1.
pub fn scaled_height(original: (u32, u32), target_width: u32) -> u32 {
    let (orig_w, orig_h) = original;
    let ratio = target_width as f64 / orig_w as f64;
    ((orig_h as f64 * ratio).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_filters_widths_above_intrinsic() {
        let widths = ladder_widths(1000, &[320, 640, 768, 1024, 1280, 1536, 1920]);
        assert_eq!(widths, vec![320, 640, 768]);
    }

    #[test]
    fn ladder_includes_exact_match() {
        let widths = ladder_widths(1024, &[320, 640, 768, 1024, 1280]);
        assert_eq!(widths, vec![320, 640, 768, 1024]);
    }

    #[test]
    fn ladder_empty_when_source_narrower_than_all() {
        // Strict subset: no original-size substitute is generated.
        let widths = ladder_widths(200, &[320, 640, 768]);
        assert!(widths.is_empty());
    }

    #[test]
    fn ladder_preserves_order() {
        let widths = ladder_widths(5000, &[320, 640, 768]);
        assert_eq!(widths, vec![320, 640, 768]);
    }

    #[test]
    fn scaled_height_landscape() {
        // 2000x1500 at width 1000 → 750
        assert_eq!(scaled_height((2000, 1500), 1000), 750);
    }

    #[test]
    fn scaled_height_rounds() {
        // 1000x600 at width 320 → 192; at 768 → 460.8 → 461
        assert_eq!(scaled_height((1000, 600), 320), 192);
        assert_eq!(scaled_height((1000, 600), 768), 461);
    }

    #[test]
    fn scaled_height_never_zero() {
        assert_eq!(scaled_height((4000, 1), 320), 1);
    }
}
