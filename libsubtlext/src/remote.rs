//! `Remote` is the seam between the resolution engine and the X server. Everything the library
//! knows about subtle is read from window properties through it, and every change is requested
//! by sending a [`Command`] through it.
use tracing::trace;

use crate::{atoms::names, command::Command, model::*, SubtlextResult};

pub trait Remote {
    /// Root window of the screen subtle manages
    fn root(&self) -> WindowId;

    /// Display string the connection was opened for
    fn display_name(&self) -> String;

    /// Read a CARDINAL/32 list property, `None` if the property is missing
    fn cardinals(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<u32>>>;

    /// Read a WINDOW/32 list property, `None` if the property is missing
    fn windows(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<WindowId>>>;

    /// Read a NUL separated text property, `None` if the property is missing
    fn strings(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<String>>>;

    /// Replace a text property with the given NUL separated strings
    fn set_strings(&self, win: WindowId, name: &str, values: &[String]) -> SubtlextResult<()>;

    fn delete_property(&self, win: WindowId, name: &str) -> SubtlextResult<()>;

    /// Send a command, fire-and-forget
    fn send(&self, command: &Command) -> SubtlextResult<()>;

    /// Let the user click a window, `None` if nothing usable was picked
    fn select_window(&self) -> SubtlextResult<Option<WindowId>>;

    /// Pointer position relative to the root window
    fn pointer(&self) -> SubtlextResult<(i32, i32)>;

    /// Geometry of a window in root coordinates, `None` if the window doesn't exist
    fn geometry(&self, win: WindowId) -> SubtlextResult<Option<Geometry>>;

    /// First string of a text property
    fn string(&self, win: WindowId, name: &str) -> SubtlextResult<Option<String>> {
        Ok(self.strings(win, name)?.and_then(|x| x.into_iter().next()))
    }

    /// First value of a cardinal property
    fn cardinal(&self, win: WindowId, name: &str) -> SubtlextResult<Option<u32>> {
        Ok(self.cardinals(win, name)?.and_then(|x| x.into_iter().next()))
    }

    fn root_cardinals(&self, name: &str) -> SubtlextResult<Option<Vec<u32>>> {
        self.cardinals(self.root(), name)
    }

    fn root_windows(&self, name: &str) -> SubtlextResult<Option<Vec<WindowId>>> {
        self.windows(self.root(), name)
    }

    fn root_strings(&self, name: &str) -> SubtlextResult<Option<Vec<String>>> {
        self.strings(self.root(), name)
    }

    /// Window title from `_NET_WM_NAME` falling back on `WM_NAME`
    fn window_name(&self, win: WindowId) -> SubtlextResult<Option<String>> {
        for prop in [names::_NET_WM_NAME, "WM_NAME"] {
            if let Some(name) = self.string(win, prop)?.filter(|x| !x.is_empty()) {
                trace!("window_name: using {} for: {}", prop, name);
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// Instance and class from `WM_CLASS`
    fn window_class(&self, win: WindowId) -> SubtlextResult<(Option<String>, Option<String>)> {
        let mut values = self.strings(win, "WM_CLASS")?.unwrap_or_default().into_iter();
        Ok((values.next(), values.next()))
    }

    fn window_role(&self, win: WindowId) -> SubtlextResult<Option<String>> {
        self.string(win, names::WM_WINDOW_ROLE)
    }

    fn window_pid(&self, win: WindowId) -> SubtlextResult<Option<u32>> {
        self.cardinal(win, names::_NET_WM_PID)
    }

    /// Check if the window still exists
    fn is_alive(&self, win: WindowId) -> SubtlextResult<bool> {
        Ok(self.geometry(win)?.is_some())
    }
}
