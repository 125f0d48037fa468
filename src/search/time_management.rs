//! Turns `go` limits into a depth cap and soft/hard deadlines.
//!
//! The soft limit stops new iterations from starting; the hard limit, a fixed
//! margin later, aborts the iteration in flight.

use std::time::Duration;

use crate::engines::engine_config::{max_search_depth, EngineConfig};
use crate::engines::engine_trait::GoParams;
use crate::game_state::chess_types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_depth: u8,
    pub soft_limit: Option<Duration>,
    pub hard_limit: Option<Duration>,
}

impl SearchBudget {
    /// Fixed depth, no clock.
    pub fn depth_only(depth: u8) -> Self {
        Self {
            max_depth: depth.clamp(1, max_search_depth()),
            soft_limit: None,
            hard_limit: None,
        }
    }

    /// Deadlines `millis` and `millis + margin_ms` from the start of search.
    pub fn timed(max_depth: u8, millis: u64, margin_ms: u64) -> Self {
        Self {
            max_depth: max_depth.clamp(1, max_search_depth()),
            soft_limit: Some(Duration::from_millis(millis)),
            hard_limit: Some(Duration::from_millis(millis.saturating_add(margin_ms))),
        }
    }
}

pub fn resolve_budget(side_to_move: Color, params: &GoParams, config: &EngineConfig) -> SearchBudget {
    let max_depth = params.depth.unwrap_or(config.max_depth);

    let (remaining, increment) = match side_to_move {
        Color::Light => (params.wtime_ms, params.winc_ms),
        Color::Dark => (params.btime_ms, params.binc_ms),
    };

    let budget_ms = if let Some(movetime) = params.movetime_ms {
        Some(movetime)
    } else if let Some(remaining) = remaining {
        let divisor = params
            .movestogo
            .map_or(config.time_divisor, |moves| u64::from(moves.max(1)));
        Some(remaining / divisor + increment.unwrap_or(0))
    } else if params.depth.is_some() {
        None
    } else {
        Some(config.default_movetime_ms)
    };

    match budget_ms {
        Some(ms) => SearchBudget::timed(max_depth, ms.max(1), config.hard_stop_margin_ms),
        None => SearchBudget::depth_only(max_depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_wins_over_clock() {
        let params = GoParams {
            movetime_ms: Some(300),
            wtime_ms: Some(60_000),
            ..GoParams::default()
        };
        let budget = resolve_budget(Color::Light, &params, &EngineConfig::default());
        assert_eq!(budget.soft_limit, Some(Duration::from_millis(300)));
        assert_eq!(budget.hard_limit, Some(Duration::from_millis(350)));
    }

    #[test]
    fn clock_uses_own_side_and_increment() {
        let params = GoParams {
            wtime_ms: Some(50_000),
            btime_ms: Some(10_000),
            winc_ms: Some(2_000),
            binc_ms: Some(100),
            ..GoParams::default()
        };
        let config = EngineConfig::default();
        let light = resolve_budget(Color::Light, &params, &config);
        assert_eq!(light.soft_limit, Some(Duration::from_millis(2_000 + 2_000)));
        let dark = resolve_budget(Color::Dark, &params, &config);
        assert_eq!(dark.soft_limit, Some(Duration::from_millis(400 + 100)));
        assert_eq!(dark.max_depth, config.max_depth);
    }

    #[test]
    fn movestogo_replaces_divisor() {
        let params = GoParams {
            btime_ms: Some(10_000),
            movestogo: Some(10),
            ..GoParams::default()
        };
        let budget = resolve_budget(Color::Dark, &params, &EngineConfig::default());
        assert_eq!(budget.soft_limit, Some(Duration::from_millis(1_000)));
    }

    #[test]
    fn depth_alone_has_no_deadline() {
        let params = GoParams {
            depth: Some(6),
            ..GoParams::default()
        };
        let budget = resolve_budget(Color::Light, &params, &EngineConfig::default());
        assert_eq!(budget, SearchBudget::depth_only(6));
        assert_eq!(budget.hard_limit, None);
    }

    #[test]
    fn nothing_given_uses_default_movetime() {
        let config = EngineConfig::default();
        let budget = resolve_budget(Color::Light, &GoParams::default(), &config);
        assert_eq!(budget.soft_limit, Some(Duration::from_millis(config.default_movetime_ms)));
        assert_eq!(
            budget.hard_limit,
            Some(Duration::from_millis(config.default_movetime_ms + config.hard_stop_margin_ms))
        );
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(SearchBudget::depth_only(0).max_depth, 1);
        assert_eq!(SearchBudget::depth_only(u8::MAX).max_depth, max_search_depth());
    }
}
