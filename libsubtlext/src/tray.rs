use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    command::Command,
    model::*,
    remote::Remote,
    resolver::{Entity, ListSource, Record},
    SubtlextResult,
};

/// Tray is a system tray icon embedded in the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tray {
    handle: Lifecycle<WindowId>,
    pub win: WindowId,
    pub name: String,
    pub instance: String,
    pub class: String,
}

impl Tray {
    pub fn new(win: WindowId) -> Self {
        Self {
            handle: Lifecycle::Resolved(win),
            win,
            name: Default::default(),
            instance: Default::default(),
            class: Default::default(),
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Re-read name and class of the icon window
    pub fn update(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let (instance, class) = remote.window_class(self.win)?;
        self.instance = instance.unwrap_or_default();
        self.class = class.unwrap_or_default();
        self.name = remote.window_name(self.win)?.unwrap_or_else(|| self.class.clone());
        Ok(())
    }

    /// Ask the icon to close, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Tray)?;
        remote.send(&Command::close(win))?;
        self.handle.freeze();
        debug!("kill: tray: {:#x}", win);
        Ok(())
    }
}

impl Entity for Tray {
    const KIND: Kind = Kind::Tray;
    const LIST: &'static str = names::SUBTLE_TRAY_LIST;
    const SOURCE: ListSource = ListSource::Windows;

    fn from_record(_index: usize, record: Record) -> Option<Self> {
        record.window().map(Tray::new)
    }

    fn refresh(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.update(remote)
    }
}

// Implement format! support
impl fmt::Display for Tray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x} {} ({})", self.win, self.instance, self.class)
    }
}
