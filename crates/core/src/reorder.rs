//! Drag/drop reordering controller.
//!
//! Turns pointer gestures into [`DragIntent`]s without touching
//! persistence. A gesture moves through three phases:
//!
//! ```text
//! Idle --pointer_down--> Pressed --pointer_move past threshold--> Dragging
//!   ^                       |                                        |
//!   +--- drop_on / cancel --+----------- drop_on / cancel ------------+
//! ```
//!
//! Only a drop from `Dragging` can produce an intent; releasing while
//! `Pressed` is a plain click.

use crate::types::DbId;
use crate::widget::{PositionUpdate, Widget, WidgetType};

/// Pointer travel (in px) required before a press becomes a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItem {
    /// A sidebar entry that is not on the dashboard yet.
    Available(WidgetType),
    /// A widget already on the dashboard.
    Enabled(DbId),
}

/// Where the item was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Over an enabled widget on the dashboard.
    Widget(DbId),
    /// Over empty dashboard space.
    DashboardArea,
}

/// Interaction style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Sidebar drops append; dashboard widgets can be reordered.
    #[default]
    Sortable,
    /// Pointer-only fallback: sidebar drops append, no reordering.
    AppendOnly,
}

/// Result of a completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragIntent {
    /// Append a new widget of this type.
    Add(WidgetType),
    /// Move the widget at index `from` to index `to` in the rendered order.
    Move {
        widget_id: DbId,
        from: usize,
        to: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    Pressed { item: DragItem, origin: Point },
    Dragging { item: DragItem },
}

/// Per-gesture state machine for dashboard drag and drop.
#[derive(Debug, Clone)]
pub struct DragController {
    mode: InteractionMode,
    activation_distance: f64,
    phase: DragPhase,
}

impl DragController {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            phase: DragPhase::Idle,
        }
    }

    pub fn with_activation_distance(mut self, distance: f64) -> Self {
        self.activation_distance = distance.max(0.0);
        self
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// The item under the pointer once the drag is active.
    pub fn dragged_item(&self) -> Option<DragItem> {
        match self.phase {
            DragPhase::Dragging { item } => Some(item),
            _ => None,
        }
    }

    /// Press on an item. Ignored while a gesture is in progress, and for
    /// dashboard widgets in [`InteractionMode::AppendOnly`].
    pub fn pointer_down(&mut self, item: DragItem, at: Point) {
        if self.phase != DragPhase::Idle {
            return;
        }
        if self.mode == InteractionMode::AppendOnly && matches!(item, DragItem::Enabled(_)) {
            return;
        }
        self.phase = DragPhase::Pressed { item, origin: at };
        if self.activation_distance == 0.0 {
            self.phase = DragPhase::Dragging { item };
        }
    }

    /// Pointer movement. Returns whether a drag is active afterwards.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        if let DragPhase::Pressed { item, origin } = self.phase {
            if origin.distance_to(at) >= self.activation_distance {
                self.phase = DragPhase::Dragging { item };
            }
        }
        self.is_dragging()
    }

    /// Release the pointer and resolve the gesture.
    ///
    /// `enabled_order` is the ids of the rendered panels in display order;
    /// it is used to turn a widget target into an index. The
    /// controller always returns to idle.
    pub fn drop_on(
        &mut self,
        target: Option<DropTarget>,
        enabled_order: &[DbId],
    ) -> Option<DragIntent> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let DragPhase::Dragging { item } = phase else {
            return None;
        };
        let target = target?;

        match (item, self.mode) {
            // New widgets always append, whatever they were dropped over.
            (DragItem::Available(widget_type), _) => Some(DragIntent::Add(widget_type)),
            (DragItem::Enabled(_), InteractionMode::AppendOnly) => None,
            (DragItem::Enabled(widget_id), InteractionMode::Sortable) => {
                let DropTarget::Widget(over_id) = target else {
                    return None;
                };
                let from = enabled_order.iter().position(|&id| id == widget_id)?;
                let to = enabled_order.iter().position(|&id| id == over_id)?;
                if from == to {
                    return None;
                }
                Some(DragIntent::Move {
                    widget_id,
                    from,
                    to,
                })
            }
        }
    }

    /// Abort the current gesture.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

/// Remove the element at `from` and insert it at `to`.
///
/// Elements between the two indices shift by one. Out-of-range indices
/// leave the list unchanged.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Position writes needed to persist `new_order`.
///
/// Each widget's target position is its index; widgets already at that
/// position are omitted.
pub fn position_updates(new_order: &[Widget]) -> Vec<PositionUpdate> {
    new_order
        .iter()
        .enumerate()
        .filter(|(index, w)| w.position != *index as i32)
        .map(|(index, w)| PositionUpdate {
            id: w.id,
            position: index as i32,
        })
        .collect()
}
