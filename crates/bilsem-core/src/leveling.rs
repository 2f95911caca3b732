//! Level and XP calculation.
//!
//! Each level step requires `floor(100 * 1.3^(n-1))` XP, so the cost of a
//! level grows exponentially: 100 XP to reach level 2, then 130 more for
//! level 3, 169 for level 4, and so on up to the level-100 cap. The
//! functions here are pure; experience totals come from the `profiles`
//! table.

use bilsem_types::LevelInfo;

/// XP required for the first level step (level 1 to level 2).
const BASE_XP: f64 = 100.0;

/// Multiplier applied to each subsequent level step.
const GROWTH_FACTOR: f64 = 1.3;

/// Maximum attainable level.
const MAX_LEVEL: u32 = 100;

/// XP required to complete a single level step.
///
/// Step `n` is the transition from level `n` to level `n + 1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn xp_for_step(step: u32) -> u64 {
    let exponent = i32::try_from(step.saturating_sub(1)).unwrap_or(i32::MAX);
    (BASE_XP * GROWTH_FACTOR.powi(exponent)).floor() as u64
}

/// Cumulative XP required to reach the given level from zero.
///
/// Level 1 (and below) requires 0 XP.
pub fn xp_required_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }

    let mut total: u64 = 0;
    for step in 1..level {
        total = total.saturating_add(xp_for_step(step));
    }
    total
}

/// Compute level and progress information for a total XP amount.
///
/// Negative XP clamps to zero. Totals beyond the level-100 threshold cap
/// at [`MAX_LEVEL`] with progress pinned to 100.
pub fn level_info(total_xp: i64) -> LevelInfo {
    let xp = u64::try_from(total_xp.max(0)).unwrap_or(0);

    let mut current_level = MAX_LEVEL;
    let mut xp_for_current = xp_required_for_level(MAX_LEVEL);
    for level in 1..=MAX_LEVEL {
        if xp < xp_required_for_level(level.saturating_add(1)) {
            current_level = level;
            xp_for_current = xp_required_for_level(level);
            break;
        }
    }

    let next_level_xp = xp_required_for_level(current_level.saturating_add(1));
    let earned_this_level = xp.saturating_sub(xp_for_current);
    let step_size = next_level_xp.saturating_sub(xp_for_current).max(1);
    let progress = earned_this_level
        .saturating_mul(100)
        .checked_div(step_size)
        .unwrap_or(0)
        .min(100);

    LevelInfo {
        current_level,
        level_progress: u32::try_from(progress).unwrap_or(100),
        current_xp: xp,
        next_level_xp,
        required_xp: next_level_xp.saturating_sub(xp),
    }
}

/// Badge emoji for a level.
pub const fn level_badge(level: u32) -> &'static str {
    match level {
        0..=4 => "\u{1f331}",   // seedling
        5..=9 => "\u{1f33f}",   // herb
        10..=14 => "\u{1f332}", // evergreen
        15..=19 => "\u{1f949}", // bronze
        20..=29 => "\u{1f948}", // silver
        30..=39 => "\u{1f947}", // gold
        40..=49 => "\u{1f48e}", // gem
        50..=69 => "\u{1f3c6}", // trophy
        70..=89 => "\u{1f451}", // crown
        _ => "\u{1f31f}",       // star
    }
}

/// Display title for a level.
pub const fn level_title(level: u32) -> &'static str {
    match level {
        0..=4 => "Caylak",
        5..=9 => "Acemi",
        10..=14 => "Ogrenci",
        15..=19 => "Bilgili",
        20..=29 => "Uzman",
        30..=39 => "Usta",
        40..=49 => "Ustat",
        50..=69 => "Efsane",
        70..=89 => "Bilge",
        _ => "Efendi",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_thresholds() {
        assert_eq!(xp_required_for_level(1), 0);
        assert_eq!(xp_required_for_level(2), 100);
        assert_eq!(xp_required_for_level(3), 230);
        assert_eq!(xp_required_for_level(4), 399);
        assert_eq!(xp_required_for_level(5), 618);
    }

    #[test]
    fn zero_xp_is_level_one() {
        let info = level_info(0);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.level_progress, 0);
        assert_eq!(info.next_level_xp, 100);
        assert_eq!(info.required_xp, 100);
    }

    #[test]
    fn negative_xp_clamps_to_zero() {
        let info = level_info(-500);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.current_xp, 0);
    }

    #[test]
    fn exact_threshold_advances_level() {
        let info = level_info(100);
        assert_eq!(info.current_level, 2);
        assert_eq!(info.level_progress, 0);
        assert_eq!(info.next_level_xp, 230);
        assert_eq!(info.required_xp, 130);
    }

    #[test]
    fn progress_is_bounded() {
        let info = level_info(165);
        assert_eq!(info.current_level, 2);
        assert_eq!(info.level_progress, 50);
        assert!(info.level_progress <= 100);
    }

    #[test]
    fn huge_xp_caps_at_max_level() {
        let info = level_info(i64::MAX);
        assert_eq!(info.current_level, 100);
        assert_eq!(info.level_progress, 100);
        assert_eq!(info.required_xp, 0);
    }

    #[test]
    fn badge_and_title_tiers() {
        assert_eq!(level_badge(1), "\u{1f331}");
        assert_eq!(level_badge(25), "\u{1f948}");
        assert_eq!(level_badge(95), "\u{1f31f}");
        assert_eq!(level_title(1), "Caylak");
        assert_eq!(level_title(45), "Ustat");
        assert_eq!(level_title(100), "Efendi");
    }
}
