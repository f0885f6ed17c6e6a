//! Pointer and nested-scroll event model
//!
//! Hosts convert their platform's motion events and nested-scroll callbacks
//! into these types before handing them to the refresh controller. Nothing in
//! here knows about windows or view trees.

use smallvec::SmallVec;

/// Pointer identifier (for multi-touch)
pub type PointerId = i32;

/// Touch pointer state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPointer {
    /// Pointer ID, stable for the lifetime of one touch
    pub id: PointerId,
    /// X coordinate in container space
    pub x: f32,
    /// Y coordinate in container space
    pub y: f32,
}

impl TouchPointer {
    pub const fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Every pointer currently on the surface, in platform order
pub type Pointers = SmallVec<[TouchPointer; 4]>;

/// Touch event types
#[derive(Debug, Clone, PartialEq)]
pub enum TouchEvent {
    /// First pointer touched down; starts a gesture
    Down { pointer: TouchPointer },
    /// An additional pointer touched down
    PointerDown {
        pointer: TouchPointer,
        pointers: Pointers,
    },
    /// One or more pointers moved
    Move { pointers: Pointers },
    /// A non-final pointer lifted. `pointers` still contains it.
    PointerUp {
        pointer: TouchPointer,
        pointers: Pointers,
    },
    /// Last pointer lifted; ends the gesture
    Up { pointer: TouchPointer },
    /// Gesture cancelled (e.g., taken over by an ancestor or the system)
    Cancel,
}

impl TouchEvent {
    /// Convenience constructor for a single-pointer down
    pub fn down(id: PointerId, y: f32) -> Self {
        TouchEvent::Down {
            pointer: TouchPointer::new(id, 0.0, y),
        }
    }

    /// Convenience constructor for a single-pointer move
    pub fn move_to(id: PointerId, y: f32) -> Self {
        TouchEvent::Move {
            pointers: SmallVec::from_slice(&[TouchPointer::new(id, 0.0, y)]),
        }
    }

    /// Convenience constructor for a single-pointer up
    pub fn up(id: PointerId, y: f32) -> Self {
        TouchEvent::Up {
            pointer: TouchPointer::new(id, 0.0, y),
        }
    }

    /// Y coordinate of the pointer with `id`, if it is part of this event
    pub fn pointer_y(&self, id: PointerId) -> Option<f32> {
        match self {
            TouchEvent::Down { pointer } | TouchEvent::Up { pointer } => {
                (pointer.id == id).then_some(pointer.y)
            }
            TouchEvent::PointerDown { pointers, .. }
            | TouchEvent::Move { pointers }
            | TouchEvent::PointerUp { pointers, .. } => {
                pointers.iter().find(|p| p.id == id).map(|p| p.y)
            }
            TouchEvent::Cancel => None,
        }
    }

    /// Whether this event ends the gesture
    pub fn is_terminal(&self) -> bool {
        matches!(self, TouchEvent::Up { .. } | TouchEvent::Cancel)
    }
}

/// Scroll axes covered by a nested scroll session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollAxes {
    bits: u8,
}

impl ScrollAxes {
    pub const NONE: ScrollAxes = ScrollAxes { bits: 0 };
    pub const HORIZONTAL: ScrollAxes = ScrollAxes { bits: 0b01 };
    pub const VERTICAL: ScrollAxes = ScrollAxes { bits: 0b10 };

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Combine two axis sets
    pub const fn union(self, other: ScrollAxes) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Keep only the vertical component
    pub const fn vertical_only(self) -> Self {
        Self {
            bits: self.bits & Self::VERTICAL.bits,
        }
    }

    /// Check if the vertical axis is included
    pub const fn vertical(&self) -> bool {
        self.bits & Self::VERTICAL.bits != 0
    }

    /// Check if the horizontal axis is included
    pub const fn horizontal(&self) -> bool {
        self.bits & Self::HORIZONTAL.bits != 0
    }
}

/// A pair of scroll amounts, used both for deltas and for consumed portions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollDelta {
    pub x: f32,
    pub y: f32,
}

impl ScrollDelta {
    pub const ZERO: ScrollDelta = ScrollDelta { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_lookup() {
        let event = TouchEvent::Move {
            pointers: SmallVec::from_slice(&[
                TouchPointer::new(0, 0.0, 10.0),
                TouchPointer::new(3, 0.0, 42.0),
            ]),
        };

        assert_eq!(event.pointer_y(3), Some(42.0));
        assert_eq!(event.pointer_y(7), None);
        assert_eq!(TouchEvent::Cancel.pointer_y(0), None);
    }

    #[test]
    fn test_terminal_events() {
        assert!(TouchEvent::up(0, 1.0).is_terminal());
        assert!(TouchEvent::Cancel.is_terminal());
        assert!(!TouchEvent::down(0, 1.0).is_terminal());
        assert!(!TouchEvent::move_to(0, 1.0).is_terminal());
    }

    #[test]
    fn test_scroll_axes() {
        let both = ScrollAxes::VERTICAL.union(ScrollAxes::HORIZONTAL);
        assert!(both.vertical());
        assert!(both.horizontal());
        assert_eq!(both.vertical_only(), ScrollAxes::VERTICAL);
        assert!(!ScrollAxes::NONE.vertical());
        assert!(!ScrollAxes::HORIZONTAL.vertical());
    }
}
