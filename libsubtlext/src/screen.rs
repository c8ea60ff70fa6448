use std::fmt;

use tracing::{debug, trace};

use crate::{
    atoms::names,
    command::Command,
    model::*,
    remote::Remote,
    resolver::{self, Entity, ListSource, Record, Resolution},
    selector::Selector,
    view::View,
    SubtlextError, SubtlextResult,
};

/// Screen is a physical output, identified by its position in `_NET_WORKAREA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    handle: Lifecycle<usize>,

    /// Workarea of the screen, panels excluded
    pub geometry: Geometry,
}

impl Screen {
    pub fn id(&self) -> Option<usize> {
        self.handle.id()
    }

    /// Screen under the pointer. The panels above and below the workarea count as part of the
    /// screen.
    pub fn current(remote: &dyn Remote) -> SubtlextResult<Option<Screen>> {
        let (x, y) = remote.pointer()?;
        let panels = remote.root_cardinals(names::SUBTLE_SCREEN_PANELS)?.unwrap_or_default();
        let screens: Vec<Screen> = resolver::every(remote)?;
        for (i, screen) in screens.into_iter().enumerate() {
            let top = panels.get(i * 2).copied().unwrap_or(0);
            let bottom = panels.get(i * 2 + 1).copied().unwrap_or(0);
            let geom = screen.geometry;
            let area = Geometry::new(geom.x, geom.y - top as i32, geom.width, geom.height + top + bottom);
            trace!("current: screen: {}, area: {}, pointer: {}x{}", i, area, x, y);
            if area.contains(x, y) {
                return Ok(Some(screen));
            }
        }
        Ok(None)
    }

    /// View shown on the screen
    pub fn view(&self, remote: &dyn Remote) -> SubtlextResult<Option<View>> {
        let id = self.handle.live(Kind::Screen)?;
        match remote.root_cardinals(names::SUBTLE_SCREEN_VIEWS)?.and_then(|x| x.get(id).copied()) {
            Some(view) => View::find(remote, view as usize),
            None => Ok(None),
        }
    }

    /// Show the given view on this screen
    pub fn set_view(&self, remote: &dyn Remote, view: Selector<View>) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Screen)?;
        let view = View::find(remote, view)?
            .and_then(|x| x.id())
            .ok_or_else(|| SubtlextError::NotFound("view".to_owned()))?;
        remote.send(&Command::jump_view(view, Some(id)))?;
        debug!("set_view: screen: {}, view: {}", id, view);
        Ok(())
    }

    /// Move the focus to this screen
    pub fn jump(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Screen)?;
        remote.send(&Command::jump_screen(id))?;
        debug!("jump: screen: {}", id);
        Ok(())
    }
}

impl Entity for Screen {
    const KIND: Kind = Kind::Screen;
    const LIST: &'static str = names::_NET_WORKAREA;
    const SOURCE: ListSource = ListSource::Workareas;
    const KEYWORDS: &'static [Keyword] = &[Keyword::All, Keyword::Current];

    fn from_record(index: usize, record: Record) -> Option<Self> {
        match record {
            Record::Area(geometry) => Some(Self { handle: Lifecycle::Resolved(index), geometry }),
            _ => None,
        }
    }

    fn bulk(remote: &dyn Remote, keyword: Keyword) -> SubtlextResult<Resolution<Self>> {
        match keyword {
            Keyword::Current => Ok(Screen::current(remote)?.into_iter().collect()),
            _ => Ok(Resolution::Many(resolver::every(remote)?)),
        }
    }
}

// Implement format! support
impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{} {}", id, self.geometry),
            None => write!(f, "{}", self.geometry),
        }
    }
}
