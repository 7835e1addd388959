// File: crates/barline-core/src/event.rs
// Summary: Typed chart events, enter/leave tracking, and listener dispatch.

use crate::data::XValue;
use crate::geometry::{RectF, ScreenPoint};

/// A data point under the pointer on a line chart.
#[derive(Clone, Debug, PartialEq)]
pub struct PointHit {
    /// Index into the chart's processed data.
    pub index: usize,
    pub group: String,
    pub x: XValue,
    pub y: f64,
    pub screen: ScreenPoint,
}

/// A bar under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct BarHit {
    pub index: usize,
    pub group: String,
    pub category: String,
    pub value: f64,
    pub y0: f64,
    pub y1: f64,
    pub rect: RectF,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HitTarget {
    Point(PointHit),
    Bar(BarHit),
}

impl HitTarget {
    /// Identity used for enter/leave tracking.
    fn key(&self) -> (usize, &str) {
        match self {
            HitTarget::Point(p) => (p.index, p.group.as_str()),
            HitTarget::Bar(b) => (b.index, b.group.as_str()),
        }
    }

    pub fn group(&self) -> &str {
        self.key().1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    Hover { target: HitTarget, pointer: ScreenPoint },
    Click { target: HitTarget, pointer: ScreenPoint },
    Enter { target: HitTarget },
    Leave { target: HitTarget },
    LegendToggle { group: String, visible: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Hover,
    Click,
    Enter,
    Leave,
    LegendToggle,
}

impl ChartEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChartEvent::Hover { .. } => EventKind::Hover,
            ChartEvent::Click { .. } => EventKind::Click,
            ChartEvent::Enter { .. } => EventKind::Enter,
            ChartEvent::Leave { .. } => EventKind::Leave,
            ChartEvent::LegendToggle { .. } => EventKind::LegendToggle,
        }
    }
}

/// Turns a stream of hit-test results into enter/hover/leave events.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    current: Option<HitTarget>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&HitTarget> {
        self.current.as_ref()
    }

    /// Events for a pointer move that hit `hit`.
    pub fn pointer_move(&mut self, hit: Option<HitTarget>, pointer: ScreenPoint) -> Vec<ChartEvent> {
        let mut out = Vec::new();
        let same = match (&self.current, &hit) {
            (Some(a), Some(b)) => a.key() == b.key(),
            _ => false,
        };
        if !same {
            if let Some(prev) = self.current.take() {
                out.push(ChartEvent::Leave { target: prev });
            }
            if let Some(next) = &hit {
                out.push(ChartEvent::Enter { target: next.clone() });
            }
        }
        if let Some(next) = &hit {
            out.push(ChartEvent::Hover { target: next.clone(), pointer });
        }
        self.current = hit;
        out
    }

    /// Pointer left the chart entirely.
    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        self.current.take().map(|target| ChartEvent::Leave { target })
    }
}

pub type Listener = Box<dyn FnMut(&ChartEvent)>;

/// Listener registry. A listener registered with `None` receives every event.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(Option<EventKind>, Listener)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: Option<EventKind>, listener: impl FnMut(&ChartEvent) + 'static) {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn dispatch(&mut self, event: &ChartEvent) {
        let kind = event.kind();
        for (filter, listener) in self.listeners.iter_mut() {
            if filter.map_or(true, |k| k == kind) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher").field("listeners", &self.listeners.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(index: usize) -> HitTarget {
        HitTarget::Point(PointHit {
            index,
            group: "a".into(),
            x: XValue::Number(index as f64),
            y: 1.0,
            screen: ScreenPoint::new(0.0, 0.0),
        })
    }

    #[test]
    fn enter_hover_leave_sequence() {
        let p = ScreenPoint::new(1.0, 1.0);
        let mut t = PointerTracker::new();
        let kinds = |v: Vec<ChartEvent>| v.iter().map(ChartEvent::kind).collect::<Vec<_>>();
        assert_eq!(kinds(t.pointer_move(Some(hit(0)), p)), [EventKind::Enter, EventKind::Hover]);
        assert_eq!(kinds(t.pointer_move(Some(hit(0)), p)), [EventKind::Hover]);
        assert_eq!(kinds(t.pointer_move(Some(hit(1)), p)), [EventKind::Leave, EventKind::Enter, EventKind::Hover]);
        assert_eq!(kinds(t.pointer_move(None, p)), [EventKind::Leave]);
        assert!(t.pointer_leave().is_none());
    }
}
