#![forbid(unsafe_code)]

//! Input adapters that turn raw host input into [`PlacementRequest`]s.
//!
//! Three input modes share one outcome type:
//!
//! - [`DragMachine`]: mouse/pen drag-and-drop.
//! - [`TouchAdapter`]: touch drag, mapped onto a [`DragMachine`].
//! - [`ClickToPlace`]: select a subject, then click where it should go.
//!
//! None of these mutate the layout. Callers pass the request they produce to
//! [`PlacementEngine::apply`](crate::PlacementEngine::apply).
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle (commit)
//!    \------> Idle (release before threshold, cancel)
//! ```

use gardenkit_core::event::{
    InputEvent, KeyCode, KeyInput, PointerInput, PointerPhase, TouchInput, TouchPhase,
};
use gardenkit_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::layout::GardenLayout;
use crate::placement::{CanvasGeometry, PlacementRequest, PlacementSubject, PlacementTarget};

/// Default pointer travel, in pixels, before a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 4.0;

/// Resolves what is under a pointer.
pub trait HitTest {
    /// The draggable thing under `point`, if any.
    fn subject_at(&self, point: Point) -> Option<PlacementSubject>;
    /// Where something released at `point` would land.
    fn target_at(&self, point: Point) -> PlacementTarget;
}

/// Hit testing against a [`GardenLayout`] as rendered on a canvas.
#[derive(Debug, Clone, Copy)]
pub struct LayoutHitTest<'a> {
    layout: &'a GardenLayout,
    geometry: &'a CanvasGeometry,
    removal_zone: Option<Rect>,
}

impl<'a> LayoutHitTest<'a> {
    #[must_use]
    pub fn new(layout: &'a GardenLayout, geometry: &'a CanvasGeometry) -> Self {
        Self {
            layout,
            geometry,
            removal_zone: None,
        }
    }

    /// Page rectangle of the "drop here to unplace" zone.
    #[must_use]
    pub fn with_removal_zone(mut self, zone: Rect) -> Self {
        self.removal_zone = Some(zone);
        self
    }

    fn plant_marker_at(&self, point: Point) -> Option<PlacementSubject> {
        let radius = self.geometry.config.marker_radius_px;
        self.layout
            .positions()
            .positions()
            .iter()
            .rev()
            .find(|pos| {
                self.layout
                    .beds()
                    .get(&pos.bed_id)
                    .and_then(|bed| self.geometry.marker_point(bed, pos))
                    .is_some_and(|marker| marker.distance(point) <= radius)
            })
            .map(|pos| PlacementSubject::Plant(pos.plant_id.clone()))
    }
}

impl HitTest for LayoutHitTest<'_> {
    fn subject_at(&self, point: Point) -> Option<PlacementSubject> {
        self.plant_marker_at(point).or_else(|| {
            self.layout
                .bed_at(point, self.geometry)
                .map(|id| PlacementSubject::Bed(id.clone()))
        })
    }

    fn target_at(&self, point: Point) -> PlacementTarget {
        if self.removal_zone.is_some_and(|zone| zone.contains(point)) {
            return PlacementTarget::RemovalZone;
        }
        self.layout.target_at(point, self.geometry)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drag machine
// ─────────────────────────────────────────────────────────────────────────────

/// Drag lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Armed {
        subject: PlacementSubject,
        pointer_id: u32,
        origin: Point,
        current: Point,
    },
    Dragging {
        subject: PlacementSubject,
        pointer_id: u32,
        origin: Point,
        current: Point,
    },
}

/// Why an input left the machine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    ThresholdNotReached,
    NothingUnderPointer,
    /// Pointer id `0` is reserved for "no pointer".
    ZeroPointerId,
}

/// Why an active gesture ended without a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    /// Host cancelled the pointer (pointercancel / touchcancel).
    PointerCancel,
    /// Released before moving past the threshold.
    ReleasedBeforeThreshold,
    EscapeKey,
    FocusLost,
    Programmatic,
}

/// Effect of one drag step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Armed {
        subject: PlacementSubject,
        pointer_id: u32,
        origin: Point,
    },
    DragStarted {
        subject: PlacementSubject,
        origin: Point,
        current: Point,
    },
    DragUpdated {
        subject: PlacementSubject,
        previous: Point,
        current: Point,
    },
    Committed {
        request: PlacementRequest,
    },
    Canceled {
        subject: Option<PlacementSubject>,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

impl DragEffect {
    /// The request to apply, if this step completed a drop.
    #[must_use]
    pub fn into_request(self) -> Option<PlacementRequest> {
        match self {
            Self::Committed { request } => Some(request),
            _ => None,
        }
    }
}

/// Pointer drag-and-drop lifecycle.
///
/// The machine only tracks the gesture. An abandoned gesture (cancel,
/// escape, focus loss) never yields a request, so prior state is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DragMachine {
    state: DragState,
    threshold_px: f64,
    transitions: u64,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD_PX)
    }
}

impl DragMachine {
    /// Negative or non-finite thresholds fall back to the default.
    #[must_use]
    pub fn new(threshold_px: f64) -> Self {
        let threshold_px = if threshold_px.is_finite() && threshold_px >= 0.0 {
            threshold_px
        } else {
            DEFAULT_DRAG_THRESHOLD_PX
        };
        Self {
            state: DragState::Idle,
            threshold_px,
            transitions: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin a gesture on `subject`.
    ///
    /// Hosts dragging from outside the canvas (the unplaced plant list)
    /// call this directly instead of going through a [`HitTest`].
    pub fn press(
        &mut self,
        subject: PlacementSubject,
        pointer_id: u32,
        position: Point,
    ) -> DragEffect {
        if pointer_id == 0 {
            return self.noop(DragNoopReason::ZeroPointerId);
        }
        if !matches!(self.state, DragState::Idle) {
            return self.noop(DragNoopReason::ActiveDragAlreadyInProgress);
        }
        self.state = DragState::Armed {
            subject: subject.clone(),
            pointer_id,
            origin: position,
            current: position,
        };
        self.record(DragEffect::Armed {
            subject,
            pointer_id,
            origin: position,
        })
    }

    /// Track pointer movement.
    pub fn move_to(&mut self, pointer_id: u32, position: Point) -> DragEffect {
        match &self.state {
            DragState::Idle => self.noop(DragNoopReason::IdleWithoutActiveDrag),
            DragState::Armed {
                subject,
                pointer_id: active,
                origin,
                ..
            } => {
                if *active != pointer_id {
                    return self.noop(DragNoopReason::PointerMismatch);
                }
                let (subject, origin, active) = (subject.clone(), *origin, *active);
                if origin.distance(position) < self.threshold_px {
                    self.state = DragState::Armed {
                        subject,
                        pointer_id: active,
                        origin,
                        current: position,
                    };
                    return self.noop(DragNoopReason::ThresholdNotReached);
                }
                self.state = DragState::Dragging {
                    subject: subject.clone(),
                    pointer_id: active,
                    origin,
                    current: position,
                };
                self.record(DragEffect::DragStarted {
                    subject,
                    origin,
                    current: position,
                })
            }
            DragState::Dragging {
                subject,
                pointer_id: active,
                origin,
                current,
            } => {
                if *active != pointer_id {
                    return self.noop(DragNoopReason::PointerMismatch);
                }
                let (subject, origin, previous, active) =
                    (subject.clone(), *origin, *current, *active);
                self.state = DragState::Dragging {
                    subject: subject.clone(),
                    pointer_id: active,
                    origin,
                    current: position,
                };
                self.record(DragEffect::DragUpdated {
                    subject,
                    previous,
                    current: position,
                })
            }
        }
    }

    /// Finish the gesture over `target`.
    ///
    /// Only a gesture that crossed the threshold commits; a release while
    /// still armed is a plain click and cancels.
    pub fn release(
        &mut self,
        pointer_id: u32,
        position: Point,
        target: PlacementTarget,
    ) -> DragEffect {
        match &self.state {
            DragState::Idle => self.noop(DragNoopReason::IdleWithoutActiveDrag),
            DragState::Armed {
                pointer_id: active, ..
            }
            | DragState::Dragging {
                pointer_id: active, ..
            } if *active != pointer_id => self.noop(DragNoopReason::PointerMismatch),
            DragState::Armed { .. } => self.cancel(DragCancelReason::ReleasedBeforeThreshold),
            DragState::Dragging { subject, .. } => {
                let request = PlacementRequest {
                    subject: subject.clone(),
                    target,
                    pointer: position,
                };
                self.state = DragState::Idle;
                self.record(DragEffect::Committed { request })
            }
        }
    }

    /// Abandon any active gesture.
    pub fn cancel(&mut self, reason: DragCancelReason) -> DragEffect {
        let subject = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => return self.noop(DragNoopReason::IdleWithoutActiveDrag),
            DragState::Armed { subject, .. } | DragState::Dragging { subject, .. } => subject,
        };
        self.record(DragEffect::Canceled {
            subject: Some(subject),
            reason,
        })
    }

    /// Feed one pointer event, resolving subjects and targets with `hit`.
    pub fn handle_pointer(&mut self, input: &PointerInput, hit: &impl HitTest) -> DragEffect {
        match input.phase {
            PointerPhase::Down => match hit.subject_at(input.position) {
                Some(subject) => self.press(subject, input.pointer_id, input.position),
                None => self.noop(DragNoopReason::NothingUnderPointer),
            },
            PointerPhase::Move => self.move_to(input.pointer_id, input.position),
            PointerPhase::Up => {
                let target = hit.target_at(input.position);
                self.release(input.pointer_id, input.position, target)
            }
            PointerPhase::Cancel => self.cancel(DragCancelReason::PointerCancel),
        }
    }

    /// Feed any host event. Touch input is ignored here; see [`TouchAdapter`].
    pub fn handle_event(&mut self, event: &InputEvent, hit: &impl HitTest) -> DragEffect {
        match event {
            InputEvent::Pointer(input) => self.handle_pointer(input, hit),
            InputEvent::Key(KeyInput {
                code: KeyCode::Escape,
                ..
            }) => self.cancel(DragCancelReason::EscapeKey),
            InputEvent::Focus { focused: false } => self.cancel(DragCancelReason::FocusLost),
            InputEvent::Touch(_) | InputEvent::Key(_) | InputEvent::Focus { .. } => {
                self.noop(DragNoopReason::IdleWithoutActiveDrag)
            }
        }
    }

    fn noop(&self, reason: DragNoopReason) -> DragEffect {
        tracing::trace!(?reason, "drag input ignored");
        DragEffect::Noop { reason }
    }

    fn record(&mut self, effect: DragEffect) -> DragEffect {
        self.transitions = self.transitions.saturating_add(1);
        tracing::trace!(transition = self.transitions, ?effect, "drag transition");
        effect
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Touch
// ─────────────────────────────────────────────────────────────────────────────

/// Touch drag, following the first contact of a gesture.
///
/// Touch ids start at `0` on most hosts, so they are shifted by one before
/// reaching the [`DragMachine`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchAdapter {
    machine: DragMachine,
    active_touch: Option<u32>,
}

impl TouchAdapter {
    #[must_use]
    pub fn new(machine: DragMachine) -> Self {
        Self {
            machine,
            active_touch: None,
        }
    }

    #[must_use]
    pub const fn machine(&self) -> &DragMachine {
        &self.machine
    }

    /// Begin dragging `subject` with the first contact of `input`.
    pub fn start_with(&mut self, subject: PlacementSubject, input: &TouchInput) -> DragEffect {
        if self.active_touch.is_some() {
            return DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            };
        }
        let Some(touch) = input.primary() else {
            return DragEffect::Noop {
                reason: DragNoopReason::NothingUnderPointer,
            };
        };
        let effect = self.machine.press(subject, pointer_id(touch.id), touch.position);
        if matches!(effect, DragEffect::Armed { .. }) {
            self.active_touch = Some(touch.id);
        }
        effect
    }

    pub fn handle(&mut self, input: &TouchInput, hit: &impl HitTest) -> DragEffect {
        match input.phase {
            TouchPhase::Start => {
                let subject = input.primary().and_then(|t| hit.subject_at(t.position));
                match subject {
                    Some(subject) if self.active_touch.is_none() => self.start_with(subject, input),
                    Some(_) => DragEffect::Noop {
                        reason: DragNoopReason::ActiveDragAlreadyInProgress,
                    },
                    None => DragEffect::Noop {
                        reason: DragNoopReason::NothingUnderPointer,
                    },
                }
            }
            TouchPhase::Move => match self.tracked(input) {
                Some(position) => self.machine.move_to(self.active_pointer(), position),
                None => DragEffect::Noop {
                    reason: DragNoopReason::PointerMismatch,
                },
            },
            TouchPhase::End => match self.tracked(input) {
                Some(position) => {
                    let effect =
                        self.machine
                            .release(self.active_pointer(), position, hit.target_at(position));
                    self.active_touch = None;
                    effect
                }
                None => DragEffect::Noop {
                    reason: DragNoopReason::PointerMismatch,
                },
            },
            TouchPhase::Cancel => {
                self.active_touch = None;
                self.machine.cancel(DragCancelReason::PointerCancel)
            }
        }
    }

    fn tracked(&self, input: &TouchInput) -> Option<Point> {
        let active = self.active_touch?;
        input
            .touches
            .iter()
            .find(|t| t.id == active)
            .map(|t| t.position)
    }

    fn active_pointer(&self) -> u32 {
        self.active_touch.map_or(0, pointer_id)
    }
}

fn pointer_id(touch_id: u32) -> u32 {
    touch_id.saturating_add(1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Click to place
// ─────────────────────────────────────────────────────────────────────────────

/// Result of one click-to-place step.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Selected(PlacementSubject),
    Cleared,
    Place(PlacementRequest),
    Ignored,
}

/// Select a subject, then click a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickToPlace {
    selected: Option<PlacementSubject>,
}

impl ClickToPlace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&PlacementSubject> {
        self.selected.as_ref()
    }

    /// Select `subject`. Selecting the current selection again clears it.
    pub fn select(&mut self, subject: PlacementSubject) -> ClickOutcome {
        if self.selected.as_ref() == Some(&subject) {
            self.selected = None;
            return ClickOutcome::Cleared;
        }
        self.selected = Some(subject.clone());
        ClickOutcome::Selected(subject)
    }

    pub fn clear(&mut self) -> ClickOutcome {
        match self.selected.take() {
            Some(_) => ClickOutcome::Cleared,
            None => ClickOutcome::Ignored,
        }
    }

    /// Click at `point`.
    ///
    /// With a selection this produces a request and clears the selection.
    /// Without one, the subject under the pointer (if any) is selected.
    pub fn click(&mut self, point: Point, hit: &impl HitTest) -> ClickOutcome {
        match self.selected.take() {
            Some(subject) => ClickOutcome::Place(PlacementRequest {
                subject,
                target: hit.target_at(point),
                pointer: point,
            }),
            None => match hit.subject_at(point) {
                Some(subject) => self.select(subject),
                None => ClickOutcome::Ignored,
            },
        }
    }

    /// Escape clears the selection; other keys are ignored.
    pub fn key(&mut self, key: &KeyInput) -> ClickOutcome {
        match key.code {
            KeyCode::Escape => self.clear(),
            _ => ClickOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::BedRegistry;
    use crate::boundary::GardenBoundary;
    use crate::placement::{PlacementConfig, PlacementEngine, PlacementOutcome};
    use crate::position::PositionStore;
    use gardenkit_core::event::{Modifiers, TouchPoint};
    use gardenkit_core::id::{BedId, PlantId};

    fn layout() -> GardenLayout {
        GardenLayout::new(
            BedRegistry::with_example_beds(),
            PositionStore::new(),
            GardenBoundary::default(),
        )
    }

    fn geometry() -> CanvasGeometry {
        CanvasGeometry::new(Rect::new(0.0, 0.0, 800.0, 600.0), PlacementConfig::default())
    }

    fn pointer(phase: PointerPhase, id: u32, x: f64, y: f64) -> PointerInput {
        PointerInput {
            phase,
            pointer_id: id,
            position: Point::new(x, y),
            mods: Modifiers::empty(),
        }
    }

    fn touch(phase: TouchPhase, id: u32, x: f64, y: f64) -> TouchInput {
        TouchInput {
            phase,
            touches: vec![TouchPoint {
                id,
                position: Point::new(x, y),
            }],
            mods: Modifiers::empty(),
        }
    }

    #[test]
    fn drag_bed_commits_request() {
        let layout = layout();
        let g = geometry();
        let hit = LayoutHitTest::new(&layout, &g);
        let mut drag = DragMachine::default();

        let armed = drag.handle_pointer(&pointer(PointerPhase::Down, 1, 20.0, 20.0), &hit);
        assert!(matches!(
            armed,
            DragEffect::Armed { subject: PlacementSubject::Bed(ref id), .. } if id.as_str() == "bed-1"
        ));
        assert_eq!(
            drag.handle_pointer(&pointer(PointerPhase::Move, 1, 21.0, 21.0), &hit),
            DragEffect::Noop {
                reason: DragNoopReason::ThresholdNotReached
            }
        );
        assert!(matches!(
            drag.handle_pointer(&pointer(PointerPhase::Move, 1, 120.0, 200.0), &hit),
            DragEffect::DragStarted { .. }
        ));
        let request = drag
            .handle_pointer(&pointer(PointerPhase::Up, 1, 130.0, 210.0), &hit)
            .into_request()
            .unwrap();
        assert_eq!(request.subject, PlacementSubject::Bed(BedId::new("bed-1")));
        assert_eq!(request.target, PlacementTarget::Canvas);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn release_before_threshold_cancels() {
        let mut drag = DragMachine::new(10.0);
        let subject = PlacementSubject::Plant(PlantId::new("p1"));
        drag.press(subject.clone(), 3, Point::new(0.0, 0.0));
        let effect = drag.release(3, Point::new(2.0, 2.0), PlacementTarget::Canvas);
        assert_eq!(
            effect,
            DragEffect::Canceled {
                subject: Some(subject),
                reason: DragCancelReason::ReleasedBeforeThreshold
            }
        );
    }

    #[test]
    fn mismatched_pointer_and_zero_id_are_noops() {
        let mut drag = DragMachine::default();
        let subject = PlacementSubject::Plant(PlantId::new("p1"));
        assert_eq!(
            drag.press(subject.clone(), 0, Point::new(0.0, 0.0)),
            DragEffect::Noop {
                reason: DragNoopReason::ZeroPointerId
            }
        );
        drag.press(subject.clone(), 1, Point::new(0.0, 0.0));
        assert_eq!(
            drag.move_to(2, Point::new(50.0, 50.0)),
            DragEffect::Noop {
                reason: DragNoopReason::PointerMismatch
            }
        );
        assert_eq!(
            drag.press(subject, 2, Point::new(0.0, 0.0)),
            DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            }
        );
    }

    #[test]
    fn escape_and_focus_loss_abandon_drag() {
        let layout = layout();
        let g = geometry();
        let hit = LayoutHitTest::new(&layout, &g);
        let mut drag = DragMachine::default();
        drag.press(PlacementSubject::Plant(PlantId::new("p1")), 1, Point::new(0.0, 0.0));
        drag.move_to(1, Point::new(100.0, 100.0));
        let effect = drag.handle_event(&InputEvent::Key(KeyInput::new(KeyCode::Escape)), &hit);
        assert!(matches!(effect, DragEffect::Canceled { reason: DragCancelReason::EscapeKey, .. }));

        drag.press(PlacementSubject::Plant(PlantId::new("p1")), 1, Point::new(0.0, 0.0));
        let effect = drag.handle_event(&InputEvent::Focus { focused: false }, &hit);
        assert!(matches!(effect, DragEffect::Canceled { reason: DragCancelReason::FocusLost, .. }));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn plant_marker_wins_over_bed_and_removal_zone_targets() {
        let mut layout = layout();
        let bed = BedId::new("bed-1");
        layout.place_plant(PlantId::new("p1"), &bed, 0.5, 0.5);
        let g = geometry();
        // Bed 1 spans (8,8)-(168,88); marker at (88,48).
        let hit = LayoutHitTest::new(&layout, &g)
            .with_removal_zone(Rect::new(700.0, 0.0, 100.0, 100.0));
        assert_eq!(
            hit.subject_at(Point::new(90.0, 50.0)),
            Some(PlacementSubject::Plant(PlantId::new("p1")))
        );
        assert_eq!(hit.subject_at(Point::new(20.0, 20.0)), Some(PlacementSubject::Bed(bed)));
        assert_eq!(hit.target_at(Point::new(750.0, 50.0)), PlacementTarget::RemovalZone);
    }

    #[test]
    fn touch_drag_moves_plant_between_beds() {
        let mut layout = layout();
        layout.place_plant(PlantId::new("p1"), &BedId::new("bed-1"), 0.5, 0.5);
        let g = geometry();
        let engine = PlacementEngine::new(g);
        let mut touch_adapter = TouchAdapter::default();

        let request = {
            let hit = LayoutHitTest::new(&layout, &g);
            assert!(matches!(
                touch_adapter.handle(&touch(TouchPhase::Start, 0, 88.0, 48.0), &hit),
                DragEffect::Armed { pointer_id: 1, .. }
            ));
            touch_adapter.handle(&touch(TouchPhase::Move, 0, 200.0, 40.0), &hit);
            // Herb planter spans (208,8)-(288,88).
            touch_adapter
                .handle(&touch(TouchPhase::End, 0, 248.0, 48.0), &hit)
                .into_request()
                .unwrap()
        };
        let outcome = engine.apply(&mut layout, &request);
        let PlacementOutcome::PlantPlaced { position } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert_eq!(position.bed_id, BedId::new("bed-2"));
        assert_eq!((position.x, position.y), (0.5, 0.5));
    }

    #[test]
    fn touch_cancel_leaves_layout_untouched() {
        let layout = layout();
        let g = geometry();
        let hit = LayoutHitTest::new(&layout, &g);
        let mut adapter = TouchAdapter::default();
        adapter.handle(&touch(TouchPhase::Start, 4, 20.0, 20.0), &hit);
        adapter.handle(&touch(TouchPhase::Move, 4, 200.0, 200.0), &hit);
        let effect = adapter.handle(&touch(TouchPhase::Cancel, 4, 200.0, 200.0), &hit);
        assert!(matches!(effect, DragEffect::Canceled { .. }));
        assert_eq!(adapter.machine().state(), &DragState::Idle);
    }

    #[test]
    fn click_to_place_selects_then_places() {
        let layout = layout();
        let g = geometry();
        let hit = LayoutHitTest::new(&layout, &g);
        let mut click = ClickToPlace::new();
        let plant = PlacementSubject::Plant(PlantId::new("p9"));

        assert_eq!(click.select(plant.clone()), ClickOutcome::Selected(plant.clone()));
        let ClickOutcome::Place(request) = click.click(Point::new(20.0, 20.0), &hit) else {
            panic!("expected a placement request");
        };
        assert_eq!(request.subject, plant);
        assert!(matches!(
            request.target,
            PlacementTarget::Bed { ref id, .. } if id.as_str() == "bed-1"
        ));
        assert_eq!(click.selected(), None);
    }

    #[test]
    fn click_to_place_clears_on_escape_and_reselect() {
        let mut click = ClickToPlace::new();
        let plant = PlacementSubject::Plant(PlantId::new("p1"));
        click.select(plant.clone());
        assert_eq!(click.select(plant.clone()), ClickOutcome::Cleared);
        click.select(plant);
        assert_eq!(click.key(&KeyInput::new(KeyCode::Char('a'))), ClickOutcome::Ignored);
        assert_eq!(click.key(&KeyInput::new(KeyCode::Escape)), ClickOutcome::Cleared);
        assert_eq!(click.selected(), None);
    }
}
