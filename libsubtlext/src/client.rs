//! Client is a window managed by subtle. Its attributes are read from the properties subtle and
//! the application set on the window, every change is a command sent through the root window.
use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    command::{Command, TagOwner},
    gravity::Gravity,
    mask::{self, MaskAction, TagMask},
    model::*,
    remote::Remote,
    resolver::{self, Entity, ListSource, Record, Resolution},
    selector::Selector,
    tag::Tag,
    view::View,
    SubtlextError, SubtlextResult,
};

/// Client window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    handle: Lifecycle<WindowId>,
    pub win: WindowId,
    pub name: String,
    pub instance: String,
    pub class: String,
    pub role: Option<String>,
    pub gravity: Option<usize>,
    pub flags: ClientFlags,
    pub tags: TagMask,
    pub pid: Option<u32>,
    pub geometry: Geometry,
}

impl Client {
    /// Create a handle for the given window, call `update` to fetch its attributes
    pub fn new(win: WindowId) -> Self {
        Self {
            handle: Lifecycle::Resolved(win),
            win,
            name: Default::default(),
            instance: Default::default(),
            class: Default::default(),
            role: Default::default(),
            gravity: Default::default(),
            flags: Default::default(),
            tags: Default::default(),
            pid: Default::default(),
            geometry: Default::default(),
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Clients on the visible views
    pub fn visible(remote: &dyn Remote) -> SubtlextResult<Vec<Client>> {
        let visible = TagMask::from_bits(remote.cardinal(remote.root(), names::SUBTLE_VISIBLE_TAGS)?.unwrap_or(0));
        Ok(Client::list(remote)?.into_iter().filter(|x| x.tags.intersects(visible)).collect())
    }

    /// Client that has the focus
    pub fn current(remote: &dyn Remote) -> SubtlextResult<Client> {
        let win = remote
            .root_windows(names::_NET_ACTIVE_WINDOW)?
            .and_then(|x| x.first().copied())
            .ok_or_else(|| SubtlextError::NotFound("active window".to_owned()))?;
        let mut client = Client::new(win);
        client.update(remote)?;
        Ok(client)
    }

    /// Recently focused clients, most recent first
    pub fn recent(remote: &dyn Remote) -> SubtlextResult<Vec<Client>> {
        let mut clients = vec![];
        for win in remote.root_windows(names::_NET_ACTIVE_WINDOW)?.unwrap_or_default() {
            let mut client = Client::new(win);
            client.update(remote)?;
            clients.push(client);
        }
        Ok(clients)
    }

    /// Re-read every attribute of the window
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let mut client = Client::new(0x1a00004);
    /// client.update(&subtle).unwrap();
    /// ```
    pub fn update(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let win = self.win;
        let (instance, class) = remote.window_class(win)?;
        self.instance = instance.unwrap_or_default();
        self.class = class.unwrap_or_default();
        self.name = remote.window_name(win)?.unwrap_or_else(|| self.class.clone());
        self.role = remote.window_role(win)?;
        self.gravity = remote.cardinal(win, names::SUBTLE_CLIENT_GRAVITY)?.map(|x| x as usize);
        self.flags = ClientFlags::from_bits_truncate(remote.cardinal(win, names::SUBTLE_CLIENT_FLAGS)?.unwrap_or(0));
        self.tags = mask::current_mask(remote, TagOwner::Client(win))?;
        self.pid = remote.window_pid(win)?;
        self.geometry = remote.geometry(win)?.unwrap_or_default();
        Ok(())
    }

    pub fn raise(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.restack(remote, RestackDetail::Above)
    }

    pub fn lower(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.restack(remote, RestackDetail::Below)
    }

    fn restack(&self, remote: &dyn Remote, detail: RestackDetail) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::restack(win, detail))?;
        debug!("restack: id: {}, detail: {:?}", win, detail);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.flags.contains(ClientFlags::FULL)
    }

    pub fn is_float(&self) -> bool {
        self.flags.contains(ClientFlags::FLOAT)
    }

    pub fn is_stick(&self) -> bool {
        self.flags.contains(ClientFlags::STICK)
    }

    pub fn is_resize(&self) -> bool {
        self.flags.contains(ClientFlags::RESIZE)
    }

    pub fn is_urgent(&self) -> bool {
        self.flags.contains(ClientFlags::URGENT)
    }

    pub fn is_zaphod(&self) -> bool {
        self.flags.contains(ClientFlags::ZAPHOD)
    }

    pub fn is_fixed(&self) -> bool {
        self.flags.contains(ClientFlags::FIXED)
    }

    pub fn is_borderless(&self) -> bool {
        self.flags.contains(ClientFlags::BORDERLESS)
    }

    /// Toggle the given flags. Fullscreen, float and stick go through the EWMH window state, the
    /// rest is written as a new flag set.
    ///
    /// ### Arguments
    /// * `remote` - connection to subtle
    /// * `flags` - flags to flip
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let mut client = Client::current(&subtle).unwrap();
    /// client.toggle(&subtle, ClientFlags::FULL).unwrap();
    /// ```
    pub fn toggle(&mut self, remote: &dyn Remote, flags: ClientFlags) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        let states = [
            (ClientFlags::FULL, names::_NET_WM_STATE_FULLSCREEN),
            (ClientFlags::FLOAT, names::_NET_WM_STATE_ABOVE),
            (ClientFlags::STICK, names::_NET_WM_STATE_STICKY),
        ];
        for (flag, state) in states {
            if flags.contains(flag) {
                remote.send(&Command::toggle_state(win, state))?;
            }
        }

        let rest = flags - (ClientFlags::FULL | ClientFlags::FLOAT | ClientFlags::STICK);
        if !rest.is_empty() {
            let current = ClientFlags::from_bits_truncate(remote.cardinal(win, names::SUBTLE_CLIENT_FLAGS)?.unwrap_or(0));
            remote.send(&Command::set_flags(win, current ^ rest))?;
        }
        self.flags ^= flags;
        debug!("toggle: id: {}, flags: {}", win, flags);
        Ok(())
    }

    /// Replace the whole flag set
    pub fn set_flags(&mut self, remote: &dyn Remote, flags: ClientFlags) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::set_flags(win, flags))?;
        self.flags = flags;
        debug!("set_flags: id: {}, flags: {}", win, flags);
        Ok(())
    }

    pub fn focus(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::focus(win))?;
        debug!("focus: id: {}", win);
        Ok(())
    }

    /// Set the gravity of the client, either everywhere or only on the given view. Nothing is
    /// sent unless both resolve.
    pub fn set_gravity(
        &mut self, remote: &dyn Remote, gravity: Selector<Gravity>, view: Option<Selector<View>>,
    ) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        let gravity = Gravity::find(remote, gravity)?
            .and_then(|x| x.id())
            .ok_or_else(|| SubtlextError::NotFound("gravity".to_owned()))?;
        let view = match view {
            Some(view) => Some(
                View::find(remote, view)?.and_then(|x| x.id()).ok_or_else(|| SubtlextError::NotFound("view".to_owned()))?,
            ),
            None => None,
        };
        remote.send(&Command::set_gravity(win, gravity, view))?;
        self.gravity = Some(gravity);
        debug!("set_gravity: id: {}, gravity: {}, view: {:?}", win, gravity, view);
        Ok(())
    }

    /// Move and resize the client
    pub fn move_resize(&mut self, remote: &dyn Remote, geom: Geometry) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::move_resize(win, geom))?;
        self.geometry = geom;
        debug!("move_resize: id: {}, geometry: {}", win, geom);
        Ok(())
    }

    /// Let subtle apply its tagging rules again
    pub fn retag(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::retag(win))?;
        debug!("retag: id: {}", win);
        Ok(())
    }

    pub fn tags(&self, remote: &dyn Remote) -> SubtlextResult<Vec<Tag>> {
        mask::tags_of(remote, TagOwner::Client(self.win))
    }

    /// Replace all tags of the client
    pub fn set_tags(&mut self, remote: &dyn Remote, tags: Vec<Selector<Tag>>) -> SubtlextResult<()> {
        self.update_tags(remote, tags, MaskAction::Replace)
    }

    pub fn tag(&mut self, remote: &dyn Remote, tags: Vec<Selector<Tag>>) -> SubtlextResult<()> {
        self.update_tags(remote, tags, MaskAction::Add)
    }

    pub fn untag(&mut self, remote: &dyn Remote, tags: Vec<Selector<Tag>>) -> SubtlextResult<()> {
        self.update_tags(remote, tags, MaskAction::Remove)
    }

    fn update_tags(&mut self, remote: &dyn Remote, tags: Vec<Selector<Tag>>, action: MaskAction) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        self.tags = mask::update_tags(remote, TagOwner::Client(win), tags, action)?;
        Ok(())
    }

    /// Views the client is shown on
    pub fn views(&self, remote: &dyn Remote) -> SubtlextResult<Vec<View>> {
        let tags = mask::current_mask(remote, TagOwner::Client(self.win))?;
        let flags = ClientFlags::from_bits_truncate(remote.cardinal(self.win, names::SUBTLE_CLIENT_FLAGS)?.unwrap_or(0));
        Ok(View::list(remote)?
            .into_iter()
            .filter(|x| x.tags.intersects(tags) || flags.contains(ClientFlags::STICK))
            .collect())
    }

    /// Check if the client is on a visible view
    pub fn is_visible(&self, remote: &dyn Remote) -> SubtlextResult<bool> {
        let visible = TagMask::from_bits(remote.cardinal(remote.root(), names::SUBTLE_VISIBLE_TAGS)?.unwrap_or(0));
        Ok(mask::current_mask(remote, TagOwner::Client(self.win))?.intersects(visible))
    }

    /// Check if the window still exists, the handle is frozen when it doesn't
    pub fn is_alive(&mut self, remote: &dyn Remote) -> SubtlextResult<bool> {
        if self.handle.is_frozen() {
            return Ok(false);
        }
        let alive = remote.is_alive(self.win)?;
        if !alive {
            self.handle.freeze();
        }
        Ok(alive)
    }

    /// Ask the client to close, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let win = self.handle.live(Kind::Client)?;
        remote.send(&Command::close(win))?;
        self.handle.freeze();
        debug!("kill: id: {}", win);
        Ok(())
    }
}

impl Entity for Client {
    const KIND: Kind = Kind::Client;
    const LIST: &'static str = names::_NET_CLIENT_LIST;
    const SOURCE: ListSource = ListSource::Windows;
    const KEYWORDS: &'static [Keyword] = &[Keyword::All, Keyword::Visible, Keyword::Current];
    const CRITERIA: bool = true;

    fn from_record(_index: usize, record: Record) -> Option<Self> {
        record.window().map(Client::new)
    }

    fn bulk(remote: &dyn Remote, keyword: Keyword) -> SubtlextResult<Resolution<Self>> {
        match keyword {
            Keyword::All => Ok(Resolution::Many(resolver::every(remote)?)),
            Keyword::Visible => Ok(Resolution::Many(Client::visible(remote)?)),
            Keyword::Current => Ok(Resolution::One(Client::current(remote)?)),
        }
    }

    fn refresh(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.update(remote)
    }
}

// Implement format! support
impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#x} {} ({})", self.win, self.instance, self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::Word, mock::*};

    fn remote() -> MockRemote {
        MockRemote::new()
            .with_strings(ROOT, "SUBTLE_TAG_LIST", &["default", "www", "dev"])
            .with_strings(ROOT, "_NET_DESKTOP_NAMES", &["terms", "www", "dev"])
            .with_cardinals(ROOT, "SUBTLE_VIEW_TAGS", &[0b10, 0b100, 0b1000])
            .with_cardinals(ROOT, "SUBTLE_VISIBLE_TAGS", &[0b10])
            .with_strings(ROOT, "SUBTLE_GRAVITY_LIST", &["100x100+0+0#full", "50x50+25+25#center"])
            .with_windows(ROOT, "_NET_ACTIVE_WINDOW", &[11, 10])
            .with_client(10, "irb", "xterm", "XTerm")
            .with_cardinals(10, "SUBTLE_CLIENT_TAGS", &[0b10])
            .with_cardinals(10, "_NET_WM_PID", &[4242])
            .with_client(11, "Mozilla Firefox", "Navigator", "Firefox")
            .with_cardinals(11, "SUBTLE_CLIENT_TAGS", &[0b100])
            .with_cardinals(11, "SUBTLE_CLIENT_GRAVITY", &[1])
            .with_strings(11, "WM_WINDOW_ROLE", &["browser"])
            .with_client(12, "xterm", "urxvt", "URxvt")
            .with_cardinals(12, "SUBTLE_CLIENT_FLAGS", &[ClientFlags::STICK.bits() | ClientFlags::FIXED.bits()])
    }

    fn wins(clients: &[Client]) -> Vec<WindowId> {
        clients.iter().map(|x| x.win).collect()
    }

    #[test]
    fn test_find_by_pattern_uses_instance_and_class() {
        let remote = remote();
        let found = Client::find_all(&remote, "xterm").unwrap();
        assert_eq!(wins(&found), vec![10]);
        assert_eq!(found[0].name, "irb");
        assert_eq!(found[0].tags, TagMask::from_bits(0b10));
        assert_eq!(found[0].pid, Some(4242));
    }

    #[test]
    fn test_find_by_index_and_window_id() {
        let remote = remote();
        assert_eq!(Client::find(&remote, 1usize).unwrap().unwrap().win, 11);
        assert_eq!(Client::find(&remote, "12").unwrap().unwrap().win, 12);
        assert_eq!(Client::find(&remote, "0xb").unwrap().unwrap().win, 11);
        assert_eq!(Client::find(&remote, "2").unwrap().unwrap().win, 12);
    }

    #[test]
    fn test_vanished_windows_are_skipped() {
        // 11 is destroyed before the scan, 12 while its properties are read
        let remote = remote().with_gone(11).with_vanishing(12, "SUBTLE_CLIENT_TAGS");
        assert_eq!(wins(&Client::list(&remote).unwrap()), vec![10]);
        assert_eq!(wins(&Client::find_all(&remote, "xterm|urxvt|Navigator").unwrap()), vec![10]);
        assert!(Client::find(&remote, 2usize).unwrap().is_none());
        assert_eq!(wins(&Client::visible(&remote).unwrap()), vec![10]);
    }

    #[test]
    fn test_find_first_moves_past_vanished_window() {
        let remote = remote().with_vanishing(10, "_NET_WM_PID");
        assert_eq!(Client::find(&remote, "xterm|urxvt").unwrap().unwrap().win, 12);
    }

    #[test]
    fn test_criteria_first_key_wins() {
        let remote = remote();

        // Both keys would match window 10
        let sel = Selector::criteria([("instance", Some("xterm")), ("class", Some("XTerm"))]);
        assert_eq!(wins(&Client::find_all(&remote, sel).unwrap()), vec![10]);

        // Class alone would match window 12, instance doesn't
        let sel = Selector::criteria([("instance", Some("^xterm$")), ("class", Some("URxvt"))]);
        assert_eq!(wins(&Client::find_all(&remote, sel).unwrap()), vec![10]);
        let sel = Selector::criteria([("instance", Some("nothing")), ("class", Some("URxvt"))]);
        assert!(Client::find_all(&remote, sel).unwrap().is_empty());
    }

    #[test]
    fn test_criteria_name_role_gravity_pid() {
        let remote = remote();
        let find = |key: &str, value: &str| wins(&Client::find_all(&remote, Selector::criteria([(key, Some(value))])).unwrap());
        assert_eq!(find("name", "^xterm$"), vec![12]);
        assert_eq!(find("role", "browser"), vec![11]);
        assert_eq!(find("gravity", "center"), vec![11]);
        assert_eq!(find("pid", "4242"), vec![10]);
    }

    #[test]
    fn test_exact_symbol() {
        let remote = remote();
        assert!(Client::find(&remote, Selector::symbol("xter")).unwrap().is_none());
        assert_eq!(Client::find(&remote, Selector::symbol("URxvt")).unwrap().unwrap().win, 12);
    }

    #[test]
    fn test_keywords() {
        let remote = remote();
        assert_eq!(wins(&Client::find_all(&remote, Selector::all()).unwrap()), vec![10, 11, 12]);
        assert_eq!(wins(&Client::find_all(&remote, Selector::visible()).unwrap()), vec![10]);
        assert_eq!(Client::find(&remote, Selector::current()).unwrap().unwrap().win, 11);
        assert_eq!(wins(&Client::recent(&remote).unwrap()), vec![11, 10]);
    }

    #[test]
    fn test_current_without_active_window() {
        let remote = MockRemote::new().with_client(10, "irb", "xterm", "XTerm");
        let err = Client::current(&remote).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::NotFound(_))));
    }

    #[test]
    fn test_interactive_selection() {
        let remote = remote().with_selection(12);
        assert_eq!(Client::find(&remote, "#").unwrap().unwrap().win, 12);

        let remote = MockRemote::new().with_client(10, "irb", "xterm", "XTerm");
        let err = Client::find(&remote, "#").unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::InteractiveSelectionFailed));
    }

    #[test]
    fn test_toggle() {
        let remote = remote();
        let mut client = Client::find(&remote, "urxvt").unwrap().unwrap();
        client.toggle(&remote, ClientFlags::FULL | ClientFlags::FIXED).unwrap();

        let sent = remote.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].word_list().unwrap()[1], Word::Atom("_NET_WM_STATE_FULLSCREEN"));
        assert_eq!(sent[1], Command::set_flags(12, ClientFlags::STICK));
        assert!(client.is_full());
        assert!(!client.is_fixed());
    }

    #[test]
    fn test_set_gravity() {
        let remote = remote();
        let mut client = Client::find(&remote, "xterm").unwrap().unwrap();
        client.set_gravity(&remote, Selector::symbol("center"), Some(Selector::symbol("www"))).unwrap();
        assert_eq!(client.gravity, Some(1));
        assert_eq!(remote.sent(), vec![Command::set_gravity(10, 1, Some(1))]);

        let err = client.set_gravity(&remote, Selector::symbol("nope"), None).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::NotFound(_))));
        let err = client.set_gravity(&remote, Selector::symbol("full"), Some(Selector::symbol("nope"))).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::NotFound(_))));
        assert_eq!(remote.sent().len(), 1);
    }

    #[test]
    fn test_tags_and_views() {
        let remote = remote();
        let mut client = Client::find(&remote, "Navigator").unwrap().unwrap();
        assert_eq!(client.tags(&remote).unwrap().iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["www"]);
        assert_eq!(client.views(&remote).unwrap().iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["www"]);
        assert!(!client.is_visible(&remote).unwrap());

        client.tag(&remote, vec![Selector::from("dev")]).unwrap();
        assert_eq!(remote.sent(), vec![Command::set_tags(TagOwner::Client(11), TagMask::from_bits(0b1100))]);

        // Sticky clients are on every view
        let sticky = Client::find(&remote, "urxvt").unwrap().unwrap();
        assert_eq!(sticky.views(&remote).unwrap().len(), 3);
    }

    #[test]
    fn test_set_tags_unknown_tag() {
        let remote = remote();
        let mut client = Client::new(5);
        let err = client.set_tags(&remote, vec![Selector::from("www"), Selector::from("missing")]).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::TagNotFound("missing".to_owned())));
        assert!(remote.sent().is_empty());
    }

    #[test]
    fn test_kill_and_alive() {
        let remote = remote();
        let mut client = Client::find(&remote, "xterm").unwrap().unwrap();
        assert!(client.is_alive(&remote).unwrap());
        client.kill(&remote).unwrap();
        assert!(client.is_frozen());
        assert_eq!(remote.sent(), vec![Command::close(10)]);

        let err = client.raise(&remote).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::StaleHandle("client")));

        let mut gone = Client::new(99);
        assert!(!gone.is_alive(&remote).unwrap());
        assert!(gone.is_frozen());
        assert!(gone.focus(&remote).is_err());
    }

    #[test]
    fn test_restack_move_retag() {
        let remote = remote();
        let mut client = Client::new(10);
        client.raise(&remote).unwrap();
        client.lower(&remote).unwrap();
        client.move_resize(&remote, Geometry::new(1, 2, 3, 4)).unwrap();
        client.retag(&remote).unwrap();
        assert_eq!(remote.sent(), vec![
            Command::restack(10, RestackDetail::Above),
            Command::restack(10, RestackDetail::Below),
            Command::move_resize(10, Geometry::new(1, 2, 3, 4)),
            Command::retag(10),
        ]);
    }
}
