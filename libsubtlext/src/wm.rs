//! `Subtle` is the connection to the X server subtle manages. It implements [`Remote`] with x11rb
//! so every entity kind reads its state from the root window properties subtle maintains and
//! sends its changes as ClientMessages to the root window.
//!
//! Commands are fire-and-forget: subtle answers by updating its properties, not by replying.
use std::{cell::RefCell, collections::HashMap};

use tracing::{debug, trace};
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::{
        xproto::{
            self, Allow, Atom, AtomEnum, ClientMessageEvent, ConnectionExt as _, EventMask, GrabMode, GrabStatus,
            PropMode,
        },
        ErrorKind, Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    CURRENT_TIME, NONE,
};

use crate::{
    atoms::AtomCollection,
    command::{Command, Payload, Recipient, Word},
    model::*,
    remote::Remote,
    select::{self, PointerEvent, PointerSelection},
    ErrorWrapper, SubtlextError, SubtlextResult,
};

// Glyph of the crosshair in the X cursor font
const XC_CROSSHAIR: u16 = 34;

/// Subtle is an open connection to the display subtle runs on
pub struct Subtle {
    conn: RustConnection,                  // x11 connection
    pub atoms: AtomCollection,             // pre-interned atoms
    extra: RefCell<HashMap<String, Atom>>, // atoms interned on demand
    display: String,                       // display string
    screen: usize,                         // screen number
    root: WindowId,                        // root window id
}

impl Subtle {
    /// Connect to the given display or the one named by `DISPLAY`
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(Some(":1")).unwrap();
    /// ```
    pub fn connect(display: Option<&str>) -> SubtlextResult<Self> {
        let (conn, screen) = x11rb::connect(display)?;
        let root = conn.setup().roots[screen].root;

        // Intern all known atoms in one round trip
        let atoms = AtomCollection::new(&conn)?.reply()?;

        let name = display.map(String::from).or_else(|| std::env::var("DISPLAY").ok()).unwrap_or_default();
        let subtle = Subtle { conn, atoms, extra: RefCell::new(HashMap::new()), display: name, screen, root };
        debug!("connect: display: {}, screen: {}, root: {:#x}", subtle.display, subtle.screen(), subtle.root);
        Ok(subtle)
    }

    /// Get the default screen number
    pub fn screen(&self) -> usize {
        self.screen
    }

    /// Atom for the given name, interned and cached on first use when it isn't a known one
    pub fn atom(&self, name: &str) -> SubtlextResult<Atom> {
        if let Some(atom) = self.atoms.lookup(name) {
            return Ok(atom);
        }
        if let Some(atom) = self.extra.borrow().get(name) {
            return Ok(*atom);
        }
        let atom = self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom;
        trace!("atom: interned {} as {}", name, atom);
        self.extra.borrow_mut().insert(name.to_owned(), atom);
        Ok(atom)
    }

    // Raw property value, `None` if the property doesn't exist. A destroyed window fails with
    // `WindowGone` so scans can tell it apart from a broken connection.
    fn property(&self, win: WindowId, name: &str) -> SubtlextResult<Option<xproto::GetPropertyReply>> {
        let atom = self.atom(name)?;
        let reply = match self.conn.get_property(false, win, atom, AtomEnum::ANY, 0, u32::MAX)?.reply() {
            Ok(reply) => reply,
            Err(ReplyError::X11Error(err)) if err.error_kind == ErrorKind::Window => {
                trace!("property: id: {:#x}, name: {}, gone", win, name);
                return Err(SubtlextError::WindowGone(win).into());
            }
            Err(err) => return Err(err.into()),
        };
        trace!("property: id: {:#x}, name: {}, format: {}, len: {}", win, name, reply.format, reply.value_len);
        if reply.type_ == NONE {
            return Ok(None);
        }
        Ok(Some(reply))
    }

    // 32 bit values of a property, other formats count as missing
    fn values32(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<u32>>> {
        let reply = match self.property(win, name)? {
            Some(reply) => reply,
            None => return Ok(None),
        };
        let values = reply.value32().map(|x| x.collect());
        Ok(values)
    }

    fn has_wm_state(&self, win: WindowId) -> SubtlextResult<bool> {
        let reply = self.conn.get_property(false, win, self.atoms.WM_STATE, AtomEnum::ANY, 0, 0)?.reply()?;
        Ok(reply.type_ == self.atoms.WM_STATE)
    }

    fn word(&self, word: Word) -> SubtlextResult<u32> {
        match word {
            Word::Long(val) => Ok(val as u32),
            Word::Atom(name) => self.atom(name),
        }
    }

    // Next button event on the root window while the pointer is grabbed
    fn next_pointer_event(&self) -> SubtlextResult<PointerEvent> {
        loop {
            self.conn.allow_events(Allow::SYNC_POINTER, CURRENT_TIME)?;
            self.conn.flush()?;
            match self.conn.wait_for_event()? {
                Event::ButtonPress(event) => {
                    let child = Some(event.child).filter(|x| *x != NONE);
                    return Ok(PointerEvent::Press { child });
                }
                Event::ButtonRelease(_) => return Ok(PointerEvent::Release),
                event => trace!("select: ignoring {:?}", event),
            }
        }
    }

    // Grab the pointer with a crosshair cursor and run the selection loop
    fn grab_and_select(&self) -> SubtlextResult<Option<WindowId>> {
        let font = self.conn.generate_id()?;
        let cursor = self.conn.generate_id()?;
        self.conn.open_font(font, b"cursor")?;
        self.conn.create_glyph_cursor(
            cursor,
            font,
            font,
            XC_CROSSHAIR,
            XC_CROSSHAIR + 1,
            0,
            0,
            0,
            u16::MAX,
            u16::MAX,
            u16::MAX,
        )?;
        self.conn.close_font(font)?;

        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;
        let grab = self
            .conn
            .grab_pointer(false, self.root, mask, GrabMode::SYNC, GrabMode::ASYNC, self.root, cursor, CURRENT_TIME)?
            .reply()?;
        if grab.status != GrabStatus::SUCCESS {
            debug!("select_window: grab failed: {:?}", grab.status);
            self.conn.free_cursor(cursor)?;
            self.conn.flush()?;
            return Ok(None);
        }

        let mut selection = PointerSelection::new(self.root);
        let events = std::iter::from_fn(|| Some(self.next_pointer_event()));
        let picked = select::run_loop(events, |x| selection.handle(x)).into_option();

        self.conn.ungrab_pointer(CURRENT_TIME)?;
        self.conn.free_cursor(cursor)?;
        self.conn.flush()?;
        Ok(picked)
    }
}

// NUL separated with an optional trailing NUL, legacy Latin-1 text is decoded lossily
fn split_strings(value: &[u8]) -> Vec<String> {
    let value = value.strip_suffix(&[0u8]).unwrap_or(value);
    if value.is_empty() {
        return vec![];
    }
    value.split(|x| *x == 0).map(|raw| String::from_utf8_lossy(raw).into_owned()).collect()
}

impl Remote for Subtle {
    fn root(&self) -> WindowId {
        self.root
    }

    fn display_name(&self) -> String {
        self.display.clone()
    }

    fn cardinals(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<u32>>> {
        self.values32(win, name)
    }

    fn windows(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<WindowId>>> {
        self.values32(win, name)
    }

    fn strings(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<String>>> {
        let reply = match self.property(win, name)? {
            Some(reply) => reply,
            None => return Ok(None),
        };

        Ok(Some(split_strings(&reply.value)))
    }

    fn set_strings(&self, win: WindowId, name: &str, values: &[String]) -> SubtlextResult<()> {
        let mut data = vec![];
        for value in values {
            data.extend_from_slice(value.as_bytes());
            data.push(0);
        }
        let atom = self.atom(name)?;
        self.conn.change_property8(PropMode::REPLACE, win, atom, self.atoms.UTF8_STRING, &data)?.check()?;
        self.conn.flush()?;
        debug!("set_strings: id: {:#x}, name: {}, len: {}", win, name, data.len());
        Ok(())
    }

    fn delete_property(&self, win: WindowId, name: &str) -> SubtlextResult<()> {
        let atom = self.atom(name)?;
        self.conn.delete_property(win, atom)?.check()?;
        self.conn.flush()?;
        Ok(())
    }

    /// Send the command as a ClientMessage to the root window and flush
    fn send(&self, command: &Command) -> SubtlextResult<()> {
        let win = match command.recipient {
            Recipient::Root => self.root,
            Recipient::Window(win) => win,
        };
        let atom = self.atom(command.opcode.name())?;
        let format = command.opcode.format();
        let msg = match command.payload {
            Payload::Words(ref words) => {
                let mut data = [0u32; 5];
                for (slot, word) in data.iter_mut().zip(words.iter()) {
                    *slot = self.word(*word)?;
                }
                ClientMessageEvent::new(format, win, atom, data)
            }
            Payload::Packed(_) => {
                let data = command.payload.packed_bytes().unwrap_or([0u8; 20]);
                ClientMessageEvent::new(format, win, atom, data)
            }
        };

        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY;
        self.conn.send_event(false, self.root, mask, msg)?.check()?;
        self.conn.flush()?;
        debug!("send: opcode: {}, win: {:#x}, payload: {:?}", command.opcode, win, command.payload);
        Ok(())
    }

    fn select_window(&self) -> SubtlextResult<Option<WindowId>> {
        let picked = match self.grab_and_select()? {
            Some(win) => win,
            None => return Ok(None),
        };

        // The pointer reports the frame, the client is the first window below it with WM_STATE
        let children = |win: WindowId| -> SubtlextResult<Vec<WindowId>> { Ok(self.conn.query_tree(win)?.reply()?.children) };
        let win = select::find_client(picked, children, |x| self.has_wm_state(x))?;
        debug!("select_window: picked: {:#x}, client: {:#x}", picked, win);
        Ok(Some(win))
    }

    fn pointer(&self) -> SubtlextResult<(i32, i32)> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok((reply.root_x as i32, reply.root_y as i32))
    }

    fn geometry(&self, win: WindowId) -> SubtlextResult<Option<Geometry>> {
        // The location is relative to the parent so it gets translated into root coordinates
        let g = match self.conn.get_geometry(win)?.reply() {
            Ok(g) => g,
            Err(ReplyError::X11Error(err)) => {
                trace!("geometry: id: {:#x}, gone: {:?}", win, err.error_kind);
                return Ok(None);
            }
            Err(err) => return Err(ErrorWrapper::from(err)),
        };
        let t = match self.conn.translate_coordinates(win, self.root, 0, 0)?.reply() {
            Ok(t) => t,
            Err(ReplyError::X11Error(_)) => return Ok(None),
            Err(err) => return Err(ErrorWrapper::from(err)),
        };
        Ok(Some(Geometry::new(t.dst_x as i32, t.dst_y as i32, g.width as u32, g.height as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_strings() {
        assert_eq!(split_strings(b"xterm\0XTerm\0"), vec!["xterm", "XTerm"]);
        assert_eq!(split_strings(b"one"), vec!["one"]);
        assert_eq!(split_strings(b"a\0\0b"), vec!["a", "", "b"]);
        assert!(split_strings(b"").is_empty());
        assert!(split_strings(b"\0").is_empty());
    }

    #[test]
    fn test_split_strings_latin1() {
        assert_eq!(split_strings(b"Caf\xe9\0ok\0"), vec!["Caf\u{fffd}", "ok"]);
    }
}
