//! Scroll reveal: viewport visibility drives opacity/offset transitions on page
//! sections. Inputs are intersection signals from the host, never scroll polling.

use serde::{Deserialize, Serialize};

use crate::api::types::RevealId;
use crate::extensions::{Easing, Tween};

/// What happens when an element leaves the viewport after being revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Stay visible forever.
    Once,
    /// Hide again, and replay on the next entry.
    #[default]
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Visible,
}

/// A tracked element plus the elements it animates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTrigger {
    /// Element id observed for visibility.
    pub element: String,
    /// Element ids animated when the trigger fires. Empty means the trigger
    /// element itself.
    pub targets: Vec<String>,
    /// Pixels above the viewport bottom the element's top must pass
    /// (`"top bottom-=100"` is 100).
    pub start_offset_px: f32,
    pub policy: ReplayPolicy,
    pub duration: f32,
    /// Vertical offset in pixels while hidden.
    pub offset_y: f32,
    pub easing: Easing,
    /// Seconds between consecutive targets starting.
    pub stagger: f32,
}

impl Default for RevealTrigger {
    fn default() -> Self {
        Self {
            element: String::new(),
            targets: Vec::new(),
            start_offset_px: 100.0,
            policy: ReplayPolicy::Toggle,
            duration: 0.8,
            offset_y: 50.0,
            easing: Easing::QuadOut,
            stagger: 0.0,
        }
    }
}

impl RevealTrigger {
    /// Intersection-observer root margin for this trigger's start offset.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", -self.start_offset_px)
    }

    fn target_ids(&self) -> Vec<String> {
        if self.targets.is_empty() {
            vec![self.element.clone()]
        } else {
            self.targets.clone()
        }
    }
}

/// Style to write onto one target element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Pixels of downward translation.
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealUpdate {
    pub target: String,
    pub style: RevealStyle,
}

struct Tracked {
    id: RevealId,
    trigger: RevealTrigger,
    state: RevealState,
    targets: Vec<String>,
    /// Reveal progress per target in [0, 1].
    progress: Vec<Tween>,
    /// Styles not yet written to the host (initial hidden state).
    dirty: bool,
}

impl Tracked {
    fn style(&self, index: usize) -> RevealStyle {
        let p = self.progress[index].value();
        RevealStyle {
            opacity: p.clamp(0.0, 1.0),
            offset_y: self.trigger.offset_y * (1.0 - p),
        }
    }

    fn transition(&mut self, to: RevealState) {
        self.state = to;
        let target = if to == RevealState::Visible { 1.0 } else { 0.0 };
        let n = self.progress.len();
        let t = &self.trigger;
        for (i, tween) in self.progress.iter_mut().enumerate() {
            // Hiding reverses the stagger order.
            let slot = if to == RevealState::Visible { i } else { n - 1 - i };
            tween.retarget_delayed(target, t.duration, t.easing, slot as f32 * t.stagger.max(0.0));
        }
    }
}

/// Tracks every registered trigger for a mounted page.
pub struct RevealController {
    tracked: Vec<Tracked>,
    next_id: u32,
}

impl RevealController {
    pub fn new() -> Self {
        Self { tracked: Vec::new(), next_id: 1 }
    }

    /// Start tracking a trigger. Its targets begin hidden.
    pub fn register(&mut self, trigger: RevealTrigger) -> RevealId {
        let id = RevealId(self.next_id);
        self.next_id += 1;
        let targets = trigger.target_ids();
        let progress = vec![Tween::settled(0.0); targets.len()];
        self.tracked.push(Tracked {
            id,
            trigger,
            state: RevealState::Hidden,
            targets,
            progress,
            dirty: true,
        });
        id
    }

    /// Apply one visibility signal. Returns the new state when it changed.
    pub fn observe(&mut self, id: RevealId, visible: bool) -> Option<RevealState> {
        let tracked = self.tracked.iter_mut().find(|t| t.id == id)?;
        let next = match (tracked.state, visible, tracked.trigger.policy) {
            (RevealState::Hidden, true, _) => RevealState::Visible,
            (RevealState::Visible, false, ReplayPolicy::Toggle) => RevealState::Hidden,
            _ => return None,
        };
        log::debug!("reveal {:?} for {:?} -> {:?}", id, tracked.trigger.element, next);
        tracked.transition(next);
        Some(next)
    }

    /// Advance every transition by `dt` and collect the styles that changed.
    pub fn tick(&mut self, dt: f32) -> Vec<RevealUpdate> {
        let mut updates = Vec::new();
        for tracked in &mut self.tracked {
            let dirty = std::mem::take(&mut tracked.dirty);
            for i in 0..tracked.progress.len() {
                let moved = tracked.progress[i].advance(dt);
                if moved || dirty {
                    updates.push(RevealUpdate {
                        target: tracked.targets[i].clone(),
                        style: tracked.style(i),
                    });
                }
            }
        }
        updates
    }

    pub fn state(&self, id: RevealId) -> Option<RevealState> {
        self.tracked.iter().find(|t| t.id == id).map(|t| t.state)
    }

    pub fn trigger(&self, id: RevealId) -> Option<&RevealTrigger> {
        self.tracked.iter().find(|t| t.id == id).map(|t| &t.trigger)
    }

    /// Current style of target `index` of trigger `id`.
    pub fn style(&self, id: RevealId, index: usize) -> Option<RevealStyle> {
        let tracked = self.tracked.iter().find(|t| t.id == id)?;
        (index < tracked.progress.len()).then(|| tracked.style(index))
    }

    /// Stop tracking a trigger. Returns false if it was not registered.
    pub fn remove(&mut self, id: RevealId) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|t| t.id != id);
        self.tracked.len() != before
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracked.clear();
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(policy: ReplayPolicy) -> RevealTrigger {
        RevealTrigger {
            element: "services-heading".into(),
            policy,
            ..RevealTrigger::default()
        }
    }

    fn settle(ctl: &mut RevealController) -> Vec<RevealUpdate> {
        let mut last = Vec::new();
        for _ in 0..120 {
            let updates = ctl.tick(1.0 / 60.0);
            if !updates.is_empty() {
                last = updates;
            }
        }
        last
    }

    #[test]
    fn once_stays_visible_after_leaving() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Once));
        assert_eq!(ctl.observe(id, true), Some(RevealState::Visible));
        assert_eq!(ctl.observe(id, false), None);
        assert_eq!(ctl.state(id), Some(RevealState::Visible));
    }

    #[test]
    fn toggle_hides_after_leaving() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Toggle));
        ctl.observe(id, true);
        assert_eq!(ctl.observe(id, false), Some(RevealState::Hidden));
        assert_eq!(ctl.state(id), Some(RevealState::Hidden));
    }

    #[test]
    fn registered_targets_start_hidden() {
        let mut ctl = RevealController::new();
        ctl.register(trigger(ReplayPolicy::Once));
        let updates = ctl.tick(0.0);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].target, "services-heading");
        assert_eq!(updates[0].style, RevealStyle { opacity: 0.0, offset_y: 50.0 });
        assert!(ctl.tick(0.016).is_empty());
    }

    #[test]
    fn reveal_tweens_to_rest() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Toggle));
        ctl.observe(id, true);
        ctl.tick(0.4);
        let mid = ctl.style(id, 0).unwrap();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.offset_y > 0.0 && mid.offset_y < 50.0);
        let last = settle(&mut ctl);
        assert_eq!(last[0].style, RevealStyle { opacity: 1.0, offset_y: 0.0 });
    }

    #[test]
    fn reversal_starts_from_current_value() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Toggle));
        ctl.observe(id, true);
        ctl.tick(0.4);
        let mid = ctl.style(id, 0).unwrap().opacity;
        ctl.observe(id, false);
        ctl.tick(0.0);
        let after = ctl.style(id, 0).unwrap().opacity;
        assert!((after - mid).abs() < 1e-5);
    }

    #[test]
    fn stagger_delays_later_targets() {
        let mut ctl = RevealController::new();
        let id = ctl.register(RevealTrigger {
            element: "service-cards".into(),
            targets: vec!["card-0".into(), "card-1".into(), "card-2".into()],
            stagger: 0.2,
            offset_y: 100.0,
            ..RevealTrigger::default()
        });
        ctl.observe(id, true);
        ctl.tick(0.3);
        let first = ctl.style(id, 0).unwrap().opacity;
        let second = ctl.style(id, 1).unwrap().opacity;
        let third = ctl.style(id, 2).unwrap().opacity;
        assert!(first > second && second > 0.0);
        assert_eq!(third, 0.0);
    }

    #[test]
    fn toggle_replays_on_reentry() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Toggle));
        ctl.observe(id, true);
        settle(&mut ctl);
        ctl.observe(id, false);
        let hidden = settle(&mut ctl);
        assert_eq!(hidden[0].style, RevealStyle { opacity: 0.0, offset_y: 50.0 });

        assert_eq!(ctl.observe(id, true), Some(RevealState::Visible));
        ctl.tick(0.4);
        let mid = ctl.style(id, 0).unwrap().opacity;
        assert!(mid > 0.0 && mid < 1.0);
        let shown = settle(&mut ctl);
        assert_eq!(shown[0].style, RevealStyle { opacity: 1.0, offset_y: 0.0 });
    }

    #[test]
    fn hiding_staggers_in_reverse() {
        let mut ctl = RevealController::new();
        let id = ctl.register(RevealTrigger {
            element: "service-cards".into(),
            targets: vec!["card-0".into(), "card-1".into(), "card-2".into()],
            stagger: 0.2,
            ..RevealTrigger::default()
        });
        ctl.observe(id, true);
        settle(&mut ctl);
        ctl.observe(id, false);
        ctl.tick(0.3);
        let first = ctl.style(id, 0).unwrap().opacity;
        let second = ctl.style(id, 1).unwrap().opacity;
        let third = ctl.style(id, 2).unwrap().opacity;
        assert_eq!(first, 1.0);
        assert!(third < second && second < first);
        assert!(third > 0.0);
    }

    #[test]
    fn root_margin_shrinks_bottom() {
        assert_eq!(trigger(ReplayPolicy::Once).root_margin(), "0px 0px -100px 0px");
    }

    #[test]
    fn remove_forgets_trigger() {
        let mut ctl = RevealController::new();
        let id = ctl.register(trigger(ReplayPolicy::Once));
        assert!(ctl.remove(id));
        assert!(!ctl.remove(id));
        assert_eq!(ctl.observe(id, true), None);
    }
}
