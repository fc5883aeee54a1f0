// SPDX-License-Identifier: MIT OR Apache-2.0
//! Migration of legacy combined effect flags into normalized animation steps.
//!
//! Older decks stored one bit word per element describing every effect the
//! element had. The player only understands ordered [`AnimationStep`] lists,
//! so such words are decomposed here before a slide reaches the sequencer.
//! Migration is one-way: nothing converts steps back into flags.

use crate::animation::{AnimationStep, Category, Direction, Effect, Trigger};
use crate::element::{Element, ElementId};
use serde::{Deserialize, Serialize};

/// Combined legacy effect word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LegacyEffectFlags(pub u32);

impl LegacyEffectFlags {
    /// Fade in
    pub const IN_FADE: Self = Self(1 << 0);
    /// Fly in from the left
    pub const IN_FLY_LEFT: Self = Self(1 << 1);
    /// Fly in from the right
    pub const IN_FLY_RIGHT: Self = Self(1 << 2);
    /// Zoom in
    pub const IN_ZOOM: Self = Self(1 << 3);
    /// Fade out
    pub const OUT_FADE: Self = Self(1 << 4);
    /// Fly out to the left
    pub const OUT_FLY_LEFT: Self = Self(1 << 5);
    /// Fly out to the right
    pub const OUT_FLY_RIGHT: Self = Self(1 << 6);
    /// Zoom out
    pub const OUT_ZOOM: Self = Self(1 << 7);
    /// The first effect waits for a click instead of starting on load
    pub const ON_CLICK: Self = Self(1 << 8);

    /// Whether every bit of `other` is set
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no effect bits are set
    pub fn is_empty(self) -> bool {
        self.0 & !Self::ON_CLICK.0 == 0
    }
}

impl std::ops::BitOr for LegacyEffectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Transition length of migrated steps, in seconds
pub const LEGACY_EFFECT_DURATION: f32 = 0.5;

/// Effect bits in the order they are emitted
const EFFECT_BITS: [(LegacyEffectFlags, Category, Effect); 8] = [
    (LegacyEffectFlags::IN_FADE, Category::BuildIn, Effect::Fade),
    (LegacyEffectFlags::IN_FLY_LEFT, Category::BuildIn, Effect::Fly(Direction::Left)),
    (LegacyEffectFlags::IN_FLY_RIGHT, Category::BuildIn, Effect::Fly(Direction::Right)),
    (LegacyEffectFlags::IN_ZOOM, Category::BuildIn, Effect::Zoom),
    (LegacyEffectFlags::OUT_FADE, Category::BuildOut, Effect::Fade),
    (LegacyEffectFlags::OUT_FLY_LEFT, Category::BuildOut, Effect::Fly(Direction::Left)),
    (LegacyEffectFlags::OUT_FLY_RIGHT, Category::BuildOut, Effect::Fly(Direction::Right)),
    (LegacyEffectFlags::OUT_ZOOM, Category::BuildOut, Effect::Zoom),
];

/// Decompose a legacy effect word into individual steps for `target`.
///
/// Build-in effects come first, then build-out effects. Each category opens
/// its own wave: its first step is `OnClick` when
/// [`LegacyEffectFlags::ON_CLICK`] is set and `OnLoad` otherwise, and the
/// remaining steps of the same category ride along as `WithPrevious`. The
/// exit therefore always starts after the entrance has resolved.
pub fn migrate(flags: LegacyEffectFlags, target: ElementId, duration: f32) -> Vec<AnimationStep> {
    let opening = if flags.contains(LegacyEffectFlags::ON_CLICK) {
        Trigger::OnClick
    } else {
        Trigger::OnLoad
    };

    let mut open: Option<Category> = None;
    let mut steps = Vec::new();
    for (_, category, effect) in EFFECT_BITS.iter().filter(|(bit, _, _)| flags.contains(*bit)) {
        let trigger = if open == Some(*category) {
            Trigger::WithPrevious
        } else {
            open = Some(*category);
            opening
        };
        steps.push(AnimationStep::new(target, *effect, *category, trigger).with_timing(duration, 0.0));
    }
    steps
}

/// Take the legacy flags off `elements` and their descendants, appending the
/// migrated steps to `out` in depth-first order
pub(crate) fn migrate_elements(elements: &mut [Element], out: &mut Vec<AnimationStep>) {
    for element in elements {
        if let Some(flags) = element.legacy_effects.take() {
            out.extend(migrate(flags, element.id, LEGACY_EFFECT_DURATION));
        }
        migrate_elements(&mut element.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_empty() {
        assert!(migrate(LegacyEffectFlags::default(), ElementId::new(), 0.5).is_empty());
        assert!(migrate(LegacyEffectFlags::ON_CLICK, ElementId::new(), 0.5).is_empty());
    }

    #[test]
    fn test_migrate_orders_build_in_first() {
        let target = ElementId::new();
        let flags = LegacyEffectFlags::OUT_FADE | LegacyEffectFlags::IN_ZOOM | LegacyEffectFlags::ON_CLICK;
        let steps = migrate(flags, target, 1.0);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].category, Category::BuildIn);
        assert_eq!(steps[0].effect, Effect::Zoom);
        assert_eq!(steps[0].trigger, Trigger::OnClick);
        assert_eq!(steps[1].category, Category::BuildOut);
        assert_eq!(steps[1].trigger, Trigger::OnClick);
        assert!(steps.iter().all(|s| s.target == target && s.duration == 1.0));
    }

    #[test]
    fn test_migrate_exit_opens_its_own_wave() {
        let flags = LegacyEffectFlags::IN_FADE
            | LegacyEffectFlags::IN_ZOOM
            | LegacyEffectFlags::OUT_FADE
            | LegacyEffectFlags::OUT_FLY_LEFT;
        let steps = migrate(flags, ElementId::new(), 0.5);

        let shape: Vec<(Category, Trigger)> = steps.iter().map(|s| (s.category, s.trigger)).collect();
        assert_eq!(
            shape,
            vec![
                (Category::BuildIn, Trigger::OnLoad),
                (Category::BuildIn, Trigger::WithPrevious),
                (Category::BuildOut, Trigger::OnLoad),
                (Category::BuildOut, Trigger::WithPrevious),
            ]
        );
        assert_eq!(steps[3].effect, Effect::Fly(Direction::Left));
    }

    #[test]
    fn test_migrate_elements_clears_flags_in_nested_elements() {
        use crate::element::ElementKind;

        let mut child = Element::new("child", ElementKind::Text { content: "c".into() });
        child.legacy_effects = Some(LegacyEffectFlags::IN_FADE);
        let child_id = child.id;
        let mut group = Element::new("group", ElementKind::Group).with_child(child);
        group.legacy_effects = Some(LegacyEffectFlags::OUT_ZOOM);
        let group_id = group.id;
        let mut elements = vec![group];

        let mut steps = Vec::new();
        migrate_elements(&mut elements, &mut steps);

        let targets: Vec<ElementId> = steps.iter().map(|s| s.target).collect();
        assert_eq!(targets, vec![group_id, child_id]);
        assert!(steps.iter().all(|s| s.duration == LEGACY_EFFECT_DURATION));
        assert!(elements[0].walk().all(|e| e.legacy_effects.is_none()));
    }
}
