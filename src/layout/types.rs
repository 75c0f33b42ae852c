//! Core geometry types for the layout engine

use std::fmt;

/// One of the four sides of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    /// All sides in top, right, bottom, left order (the order used by the text format)
    pub const CLOCKWISE: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Sides in the order the layout pass evaluates them
    pub const EVALUATION_ORDER: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// The side facing this one on the same axis
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Side::Top | Side::Bottom => Axis::Vertical,
            Side::Left | Side::Right => Axis::Horizontal,
        }
    }

    /// True for top and left, the sides measured from the container origin
    pub fn is_leading(self) -> bool {
        matches!(self, Side::Top | Side::Left)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Left => "left",
            Side::Bottom => "bottom",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The (leading, trailing) sides on this axis
    pub fn sides(self) -> (Side, Side) {
        match self {
            Axis::Horizontal => (Side::Left, Side::Right),
            Axis::Vertical => (Side::Top, Side::Bottom),
        }
    }
}

/// A value for each of the four sides
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges<T> {
    pub top: T,
    pub left: T,
    pub bottom: T,
    pub right: T,
}

impl<T> Edges<T> {
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Top => &self.top,
            Side::Left => &self.left,
            Side::Bottom => &self.bottom,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Top => &mut self.top,
            Side::Left => &mut self.left,
            Side::Bottom => &mut self.bottom,
            Side::Right => &mut self.right,
        }
    }

    /// Build from a function evaluated once per side
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            top: f(Side::Top),
            left: f(Side::Left),
            bottom: f(Side::Bottom),
            right: f(Side::Right),
        }
    }

    /// Iterate over `(side, value)` pairs in top, right, bottom, left order
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::CLOCKWISE.into_iter().map(move |side| (side, self.get(side)))
    }
}

impl<T: Clone> Edges<T> {
    pub fn all(value: T) -> Self {
        Self::new(value.clone(), value.clone(), value.clone(), value)
    }
}

impl Edges<i32> {
    /// Left + right
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Top + bottom
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Sum of both sides on an axis
    pub fn on_axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Leading horizontal value, taken from the right side for right-to-left containers
    pub fn leading(&self, rtl: bool) -> i32 {
        if rtl {
            self.right
        } else {
            self.left
        }
    }

    /// Trailing horizontal value, taken from the left side for right-to-left containers
    pub fn trailing(&self, rtl: bool) -> i32 {
        if rtl {
            self.left
        } else {
            self.right
        }
    }
}

/// A width/height pair in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn on_axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// An axis-aligned rectangle in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Grow the rectangle outward by the given amounts
    pub fn expand(&self, by: &Edges<i32>) -> Rect {
        Rect::new(
            self.x - by.left,
            self.y - by.top,
            self.width + by.horizontal(),
            self.height + by.vertical(),
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}
