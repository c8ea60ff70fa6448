use std::{convert, fmt, str::FromStr};

use bitflags::bitflags;

use crate::{SubtlextError, SubtlextResult};

/// X11 window id as used by clients, trays and the root window
pub type WindowId = u32;

/// Kind identifies the different remote entities subtle knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Client,
    Gravity,
    Screen,
    Sublet,
    Tag,
    Tray,
    View,
}

impl Kind {
    /// Static lowercase name used in messages and errors
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Client => "client",
            Kind::Gravity => "gravity",
            Kind::Screen => "screen",
            Kind::Sublet => "sublet",
            Kind::Tag => "tag",
            Kind::Tray => "tray",
            Kind::View => "view",
        }
    }
}

// Implement format! support
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keyword selectors that short-circuit to a bulk accessor of the entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    All,
    Visible,
    Current,
}

// Implement format! support
impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

// Convert from &str to Keyword
impl convert::TryFrom<&str> for Keyword {
    type Error = SubtlextError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "all" => Ok(Keyword::All),
            "visible" => Ok(Keyword::Visible),
            "current" => Ok(Keyword::Current),
            _ => Err(SubtlextError::InvalidArgument(format!("unknown keyword {}", val))),
        }
    }
}

/// RestackDetail is the stacking direction of a restack request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestackDetail {
    Above,
    Below,
}

impl From<RestackDetail> for i32 {
    fn from(val: RestackDetail) -> Self {
        match val {
            RestackDetail::Above => 0,
            RestackDetail::Below => 1,
        }
    }
}

/// Tiling mode of a gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tiling {
    None,
    Horizontal,
    Vertical,
}

// Implement format! support
impl fmt::Display for Tiling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

// Convert from &str to Tiling
impl convert::TryFrom<&str> for Tiling {
    type Error = SubtlextError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val.to_lowercase().as_ref() {
            "none" => Ok(Tiling::None),
            "horz" | "horizontal" => Ok(Tiling::Horizontal),
            "vert" | "vertical" => Ok(Tiling::Vertical),
            _ => Err(SubtlextError::InvalidArgument(format!("unknown tiling mode {}", val))),
        }
    }
}

impl From<Tiling> for i32 {
    fn from(val: Tiling) -> Self {
        match val {
            Tiling::None => 0,
            Tiling::Horizontal => 1 << 11,
            Tiling::Vertical => 1 << 12,
        }
    }
}

bitflags! {
    /// Client mode flags as stored in `SUBTLE_CLIENT_FLAGS`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClientFlags: u32 {
        const FULL = 1 << 0;
        const FLOAT = 1 << 1;
        const STICK = 1 << 2;
        const RESIZE = 1 << 3;
        const URGENT = 1 << 4;
        const ZAPHOD = 1 << 5;
        const FIXED = 1 << 6;
        const CENTER = 1 << 7;
        const BORDERLESS = 1 << 8;
    }
}

// Implement format! support
impl fmt::Display for ClientFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<String> = self.iter_names().map(|(name, _)| name.to_lowercase()).collect();
        write!(f, "{}", names.join(","))
    }
}

// Convert from &str to a single client flag
impl convert::TryFrom<&str> for ClientFlags {
    type Error = SubtlextError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        ClientFlags::from_name(&val.to_uppercase())
            .ok_or_else(|| SubtlextError::InvalidArgument(format!("unknown client flag {}", val)))
    }
}

bitflags! {
    /// Window properties a pattern can be matched against
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MatchFlags: u32 {
        const NAME = 1 << 0;
        const INSTANCE = 1 << 1;
        const CLASS = 1 << 2;
        const GRAVITY = 1 << 3;
        const ROLE = 1 << 4;
        const PID = 1 << 5;
    }
}

impl Default for MatchFlags {
    fn default() -> Self {
        MatchFlags::INSTANCE | MatchFlags::CLASS
    }
}

impl MatchFlags {
    /// Map a criteria key to its flag, unknown keys yield `None`
    pub fn from_key(key: &str) -> Option<MatchFlags> {
        match key {
            "name" => Some(MatchFlags::NAME),
            "instance" => Some(MatchFlags::INSTANCE),
            "class" => Some(MatchFlags::CLASS),
            "gravity" => Some(MatchFlags::GRAVITY),
            "role" => Some(MatchFlags::ROLE),
            "pid" => Some(MatchFlags::PID),
            _ => None,
        }
    }
}

/// Geometry is a rectangle on the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the given point lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        let (left, top) = (self.x as i64, self.y as i64);
        x >= left && x < left + self.width as i64 && y >= top && y < top + self.height as i64
    }
}

// Textual form is `WxH+X+Y`, width and height first
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for Geometry {
    type Err = SubtlextError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let invalid = || SubtlextError::InvalidArgument(format!("malformed geometry {}", val));
        let (size, pos) = val.split_once('+').ok_or_else(invalid)?;
        let (w, h) = size.split_once('x').ok_or_else(invalid)?;
        let (x, y) = pos.split_once('+').ok_or_else(invalid)?;

        // Values are shorts on the wire
        let coord = |s: &str| s.trim().parse::<i16>().map(i32::from).map_err(|_| invalid());
        let dim = |s: &str| s.trim().parse::<u16>().map(u32::from).map_err(|_| invalid());
        Ok(Geometry::new(coord(x)?, coord(y)?, dim(w)?, dim(h)?))
    }
}

/// GeometryEntry is a single record of a geometry-tagged list like `SUBTLE_GRAVITY_LIST`
/// of the form `WxH+X+Y#name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryEntry {
    pub geometry: Geometry,
    pub name: String,
}

impl GeometryEntry {
    pub fn new<T: Into<String>>(geometry: Geometry, name: T) -> Self {
        Self { geometry, name: name.into() }
    }
}

impl fmt::Display for GeometryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}#{}", self.geometry, self.name)
    }
}

impl FromStr for GeometryEntry {
    type Err = SubtlextError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let (geometry, name) = val
            .split_once('#')
            .ok_or_else(|| SubtlextError::InvalidArgument(format!("malformed list entry {}", val)))?;
        Ok(GeometryEntry::new(geometry.parse()?, name))
    }
}

/// Lifecycle of an entity handle. Handles start out `Detached` when constructed locally, become
/// `Resolved` once they carry a remote id and turn `Frozen` after a kill or close was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle<I> {
    Detached,
    Resolved(I),
    Frozen(I),
}

impl<I: Copy> Lifecycle<I> {
    /// Remote id if there ever was one
    pub fn id(&self) -> Option<I> {
        match *self {
            Lifecycle::Detached => None,
            Lifecycle::Resolved(id) | Lifecycle::Frozen(id) => Some(id),
        }
    }

    /// Remote id of a handle that may still be mutated
    pub fn live(&self, kind: Kind) -> SubtlextResult<I> {
        match *self {
            Lifecycle::Resolved(id) => Ok(id),
            Lifecycle::Detached => Err(SubtlextError::Unsaved(kind.name()).into()),
            Lifecycle::Frozen(_) => Err(SubtlextError::StaleHandle(kind.name()).into()),
        }
    }

    /// Fail with `StaleHandle` if the handle is frozen
    pub fn check(&self, kind: Kind) -> SubtlextResult<()> {
        match *self {
            Lifecycle::Frozen(_) => Err(SubtlextError::StaleHandle(kind.name()).into()),
            _ => Ok(()),
        }
    }

    pub fn freeze(&mut self) {
        if let Lifecycle::Resolved(id) = *self {
            *self = Lifecycle::Frozen(id);
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Lifecycle::Frozen(_))
    }
}
