/// Tests for post process sizing

use super::*;

fn params(size: PostProcessSize) -> SizingParams {
    SizingParams {
        size,
        needs_mipmaps: false,
        always_force_pot: false,
        adapt_scale_to_current_viewport: false,
        scale_mode: ScaleMode::Floor,
        owns_textures: true,
    }
}

// ============================================================================
// Tests: exponent_of_two
// ============================================================================

#[test]
fn test_exponent_of_two_floor() {
    assert_eq!(exponent_of_two(100, 4096, ScaleMode::Floor), 64);
    assert_eq!(exponent_of_two(128, 4096, ScaleMode::Floor), 128);
    assert_eq!(exponent_of_two(1, 4096, ScaleMode::Floor), 1);
}

#[test]
fn test_exponent_of_two_ceiling() {
    assert_eq!(exponent_of_two(100, 4096, ScaleMode::Ceiling), 128);
    assert_eq!(exponent_of_two(129, 4096, ScaleMode::Ceiling), 256);
}

#[test]
fn test_exponent_of_two_nearest() {
    assert_eq!(exponent_of_two(100, 4096, ScaleMode::Nearest), 128);
    assert_eq!(exponent_of_two(90, 4096, ScaleMode::Nearest), 64);
    // Tie goes to the ceiling
    assert_eq!(exponent_of_two(96, 4096, ScaleMode::Nearest), 128);
}

#[test]
fn test_exponent_of_two_capped_at_max() {
    assert_eq!(exponent_of_two(3000, 2048, ScaleMode::Ceiling), 2048);
}

#[test]
fn test_exponent_of_two_above_two_pow_31() {
    for mode in [ScaleMode::Floor, ScaleMode::Nearest, ScaleMode::Ceiling] {
        assert_eq!(exponent_of_two(u32::MAX, 16384, mode), 16384);
        assert_eq!(exponent_of_two(3_000_000_000, 16384, mode), 16384);
    }
    assert_eq!(exponent_of_two(3_000_000_000, u32::MAX, ScaleMode::Nearest), 1 << 31);
    assert_eq!(exponent_of_two(3_000_000_000, u32::MAX, ScaleMode::Floor), 1 << 31);
    assert_eq!(exponent_of_two(3_000_000_000, u32::MAX, ScaleMode::Ceiling), u32::MAX);
}

#[test]
fn test_exponent_of_two_zero_stays_zero() {
    for mode in [ScaleMode::Floor, ScaleMode::Nearest, ScaleMode::Ceiling] {
        assert_eq!(exponent_of_two(0, 4096, mode), 0);
    }
}

// ============================================================================
// Tests: compute_activation_size
// ============================================================================

#[test]
fn test_ratio_truncates() {
    let caps = DeviceCapabilities::default();
    let size = compute_activation_size(&params(PostProcessSize::ratio(0.5)), (801, 601), &caps, None);
    assert_eq!(size.required, (400, 300));
    assert_eq!(size.desired, (400, 300));
}

#[test]
fn test_fixed_size_overrides_required() {
    let caps = DeviceCapabilities::default();
    let size = compute_activation_size(&params(PostProcessSize::fixed(256, 64)), (800, 600), &caps, None);
    assert_eq!(size.required, (800, 600));
    assert_eq!(size.desired, (256, 64));
}

#[test]
fn test_viewport_scales_desired() {
    let caps = DeviceCapabilities::default();
    let mut p = params(PostProcessSize::ratio(1.0));
    p.adapt_scale_to_current_viewport = true;
    let viewport = Viewport { x: 0.5, y: 0.0, width: 0.5, height: 0.25 };

    let size = compute_activation_size(&p, (800, 600), &caps, Some(viewport));
    assert_eq!(size.desired, (400, 150));
    assert_eq!(size.required, (800, 600));
}

#[test]
fn test_force_pot_only_rounds_ratio_dimensions() {
    let caps = DeviceCapabilities::default();
    let mut p = params(PostProcessSize { ratio: 1.0, width: Some(300), height: None });
    p.always_force_pot = true;
    p.scale_mode = ScaleMode::Ceiling;

    let size = compute_activation_size(&p, (100, 100), &caps, None);
    assert_eq!(size.desired, (300, 128));
}

#[test]
fn test_mipmaps_round_only_when_device_needs_pot() {
    let mut caps = DeviceCapabilities::default();
    let mut p = params(PostProcessSize::ratio(1.0));
    p.needs_mipmaps = true;

    let size = compute_activation_size(&p, (100, 100), &caps, None);
    assert_eq!(size.desired, (100, 100));

    caps.needs_power_of_two_textures = true;
    let size = compute_activation_size(&p, (100, 100), &caps, None);
    assert_eq!(size.desired, (64, 64));
}

#[test]
fn test_non_owning_stage_ignores_viewport_and_pot() {
    let caps = DeviceCapabilities::default();
    let mut p = params(PostProcessSize::ratio(1.0));
    p.owns_textures = false;
    p.always_force_pot = true;
    p.adapt_scale_to_current_viewport = true;
    let viewport = Viewport { x: 0.0, y: 0.0, width: 0.5, height: 0.5 };

    let size = compute_activation_size(&p, (100, 100), &caps, Some(viewport));
    assert_eq!(size.desired, (100, 100));
}
