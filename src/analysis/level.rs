use crate::models::level::{LevelTier, UserLevel};

pub const STREAK_MILESTONES: [u32; 3] = [7, 14, 30];

/// Resolve the evolution tier for cumulative XP.
///
/// `tiers` must be sorted ascending by `min_xp`. When no tier qualifies the
/// first one is used, so an empty table is the only degenerate input.
pub fn resolve_level(current_xp: u64, tiers: &[LevelTier]) -> UserLevel {
    let Some(first) = tiers.first() else {
        return UserLevel {
            current_xp,
            level_name: String::new(),
            visual_scale: 1.0,
            next_level_name: None,
            next_level_xp: None,
            progress_percent: 0.0,
        };
    };

    let index = tiers
        .iter()
        .rposition(|tier| tier.min_xp <= current_xp)
        .unwrap_or(0);
    let current = tiers.get(index).unwrap_or(first);
    let next = tiers.get(index + 1);

    UserLevel {
        current_xp,
        level_name: current.name.clone(),
        visual_scale: current.visual_scale,
        next_level_name: next.map(|t| t.name.clone()),
        next_level_xp: next.map(|t| t.min_xp),
        progress_percent: progress_percent(current_xp, current, next),
    }
}

fn progress_percent(current_xp: u64, current: &LevelTier, next: Option<&LevelTier>) -> f64 {
    let start = current.min_xp as f64;
    // Past the last tier the bar fills toward 1.5x its threshold.
    let end = match next {
        Some(tier) => tier.min_xp as f64,
        None => start * 1.5,
    };

    let span = end - start;
    if span <= 0.0 {
        return 100.0;
    }

    ((current_xp as f64 - start) / span * 100.0).clamp(0.0, 100.0)
}

pub fn is_streak_milestone(streak: u32) -> bool {
    STREAK_MILESTONES.contains(&streak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::level::default_tiers;

    fn tiers() -> Vec<LevelTier> {
        [(0, "A"), (100, "B"), (500, "C")]
            .into_iter()
            .map(|(min_xp, name)| LevelTier {
                name: name.to_string(),
                min_xp,
                visual_scale: 1.0,
            })
            .collect()
    }

    #[test]
    fn resolves_middle_tier_with_progress() {
        let level = resolve_level(250, &tiers());
        assert_eq!(level.level_name, "B");
        assert_eq!(level.next_level_name.as_deref(), Some("C"));
        assert_eq!(level.next_level_xp, Some(500));
        assert!((level.progress_percent - 37.5).abs() < 1e-9);
    }

    #[test]
    fn tier_thresholds_are_inclusive() {
        assert_eq!(resolve_level(99, &tiers()).level_name, "A");
        assert_eq!(resolve_level(100, &tiers()).level_name, "B");
        assert_eq!(resolve_level(100, &tiers()).progress_percent, 0.0);
    }

    #[test]
    fn max_tier_fills_toward_one_and_a_half_threshold() {
        let level = resolve_level(600, &tiers());
        assert_eq!(level.level_name, "C");
        assert_eq!(level.next_level_name, None);
        assert_eq!(level.next_level_xp, None);
        // (600 - 500) / (750 - 500)
        assert!((level.progress_percent - 40.0).abs() < 1e-9);

        assert_eq!(resolve_level(10_000, &tiers()).progress_percent, 100.0);
    }

    #[test]
    fn single_zero_tier_reports_full_bar() {
        let only = vec![LevelTier {
            name: "Solo".to_string(),
            min_xp: 0,
            visual_scale: 1.0,
        }];
        assert_eq!(resolve_level(42, &only).progress_percent, 100.0);
        assert_eq!(resolve_level(42, &[]).level_name, "");
    }

    #[test]
    fn default_table_starts_at_plankton() {
        let level = resolve_level(0, &default_tiers());
        assert_eq!(level.level_name, "Plankton");
        assert_eq!(level.next_level_xp, Some(200));
    }

    #[test]
    fn milestones_are_exact_days() {
        assert!(is_streak_milestone(7));
        assert!(is_streak_milestone(14));
        assert!(is_streak_milestone(30));
        assert!(!is_streak_milestone(8));
        assert!(!is_streak_milestone(31));
    }
}
