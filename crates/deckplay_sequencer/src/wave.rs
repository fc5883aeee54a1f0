// SPDX-License-Identifier: MIT OR Apache-2.0
//! Grouping of consecutive steps into concurrently running waves.

use deckplay_model::{AnimationStep, Trigger};
use serde::{Deserialize, Serialize};

/// How a wave is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveTrigger {
    /// Starts as soon as the previous wave resolves
    Auto,
    /// Waits for an explicit `next()` call
    Click,
}

/// One triggering step plus every `WithPrevious` step that immediately follows it
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// How the wave is started
    pub trigger: WaveTrigger,
    /// Steps in original order; they run concurrently
    pub steps: Vec<AnimationStep>,
}

impl Wave {
    fn open(step: AnimationStep) -> Self {
        let trigger = match step.trigger {
            Trigger::OnClick => WaveTrigger::Click,
            Trigger::OnLoad | Trigger::WithPrevious => WaveTrigger::Auto,
        };
        Self {
            trigger,
            steps: vec![step],
        }
    }

    /// Time until the slowest step of the wave reaches its resting state
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(AnimationStep::end_time).fold(0.0, f32::max)
    }
}

/// Partition an ordered step list into waves.
///
/// Concatenating the returned waves reproduces `steps` exactly. A leading
/// `WithPrevious` step has nothing to ride along with and opens its own
/// automatic wave.
pub fn partition_waves(steps: &[AnimationStep]) -> Vec<Wave> {
    let mut waves: Vec<Wave> = Vec::new();

    for step in steps {
        match (step.trigger, waves.last_mut()) {
            (Trigger::WithPrevious, Some(wave)) => wave.steps.push(step.clone()),
            (Trigger::WithPrevious, None) => {
                tracing::warn!(
                    "Animation step {:?} rides with a previous step but starts the sequence; treating it as on-load",
                    step.id
                );
                waves.push(Wave::open(step.clone()));
            }
            (Trigger::OnLoad | Trigger::OnClick, _) => waves.push(Wave::open(step.clone())),
        }
    }

    waves
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckplay_model::{Effect, ElementId};

    fn step(trigger: Trigger) -> AnimationStep {
        AnimationStep::build_in(ElementId::new(), Effect::Fade, trigger)
    }

    #[test]
    fn test_empty_sequence() {
        assert!(partition_waves(&[]).is_empty());
    }

    #[test]
    fn test_partition_groups_with_previous() {
        use Trigger::*;
        let steps = vec![
            step(OnLoad),
            step(WithPrevious),
            step(OnClick),
            step(OnClick),
            step(WithPrevious),
            step(WithPrevious),
            step(OnLoad),
        ];
        let waves = partition_waves(&steps);

        let sizes: Vec<usize> = waves.iter().map(|w| w.steps.len()).collect();
        assert_eq!(sizes, vec![2, 1, 3, 1]);
        let triggers: Vec<WaveTrigger> = waves.iter().map(|w| w.trigger).collect();
        assert_eq!(
            triggers,
            vec![WaveTrigger::Auto, WaveTrigger::Click, WaveTrigger::Click, WaveTrigger::Auto]
        );

        // Concatenation reproduces the input and no wave starts with a rider
        let flat: Vec<AnimationStep> = waves.iter().flat_map(|w| w.steps.clone()).collect();
        assert_eq!(flat, steps);
        assert!(waves.iter().skip(1).all(|w| w.steps[0].trigger != WithPrevious));
    }

    #[test]
    fn test_leading_with_previous_opens_auto_wave() {
        let steps = vec![step(Trigger::WithPrevious), step(Trigger::WithPrevious), step(Trigger::OnClick)];
        let waves = partition_waves(&steps);
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].trigger, WaveTrigger::Auto);
        assert_eq!(waves[0].steps.len(), 2);
        assert_eq!(waves[1].trigger, WaveTrigger::Click);
    }

    #[test]
    fn test_migrated_entrance_and_exit_run_in_separate_waves() {
        use deckplay_model::legacy::migrate;
        use deckplay_model::{Category, LegacyEffectFlags};

        let flags = LegacyEffectFlags::IN_FADE | LegacyEffectFlags::OUT_FADE;
        let waves = partition_waves(&migrate(flags, ElementId::new(), 1.0));

        assert_eq!(waves.len(), 2);
        assert!(waves.iter().all(|w| w.trigger == WaveTrigger::Auto));
        assert_eq!(waves[0].steps[0].category, Category::BuildIn);
        assert_eq!(waves[1].steps[0].category, Category::BuildOut);
    }

    #[test]
    fn test_wave_duration_uses_slowest_step() {
        let steps = vec![
            step(Trigger::OnLoad).with_timing(1.0, 0.0),
            step(Trigger::WithPrevious).with_timing(0.5, 1.0),
        ];
        let waves = partition_waves(&steps);
        assert_eq!(waves[0].duration(), 1.5);
    }
}
