//! Command encoder for the ClientMessage protocol subtle listens to. Every mutating operation maps
//! to exactly one message with a fixed word layout. Messages are fire-and-forget: subtle never
//! acknowledges them, so the effect has to be observed by re-reading the state afterwards.
use std::fmt;

use tracing::warn;

use crate::{atoms::names, model::*, mask::TagMask};

/// Claim to be a pager when restacking or closing windows
pub const SOURCE_PAGER: i32 = 2;

/// Sublet visibility flags
pub const SUBLET_VISIBLE: i32 = 1 << 9;
pub const SUBLET_HIDDEN: i32 = 1 << 10;

/// Maximum number of bytes a packed string can carry, the last one of the 20 is the terminator
pub const PACKED_MAX: usize = 19;

/// Opcode names a command and decides its format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Restack,
    SetFlags,
    ToggleState,
    SetGravity,
    MoveResize,
    Retag,
    SetClientTags,
    SetViewTags,
    Close,
    Focus,
    JumpView,
    JumpScreen,
    NewTag,
    NewView,
    NewGravity,
    KillTag,
    KillView,
    KillGravity,
    KillSublet,
    UpdateSublet,
    SubletData,
    SubletFlags,
    GravityFlags,
    ViewStyle,
    SubletStyle,
    Reload,
    Restart,
    Quit,
    Render,
}

impl Opcode {
    /// Message type atom name
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Restack => names::_NET_RESTACK_WINDOW,
            Opcode::SetFlags => names::SUBTLE_CLIENT_FLAGS,
            Opcode::ToggleState => names::_NET_WM_STATE,
            Opcode::SetGravity => names::SUBTLE_CLIENT_GRAVITY,
            Opcode::MoveResize => names::_NET_MOVERESIZE_WINDOW,
            Opcode::Retag => names::SUBTLE_CLIENT_RETAG,
            Opcode::SetClientTags => names::SUBTLE_CLIENT_TAGS,
            Opcode::SetViewTags => names::SUBTLE_VIEW_TAGS,
            Opcode::Close => names::_NET_CLOSE_WINDOW,
            Opcode::Focus => names::_NET_ACTIVE_WINDOW,
            Opcode::JumpView => names::_NET_CURRENT_DESKTOP,
            Opcode::JumpScreen => names::SUBTLE_SCREEN_JUMP,
            Opcode::NewTag => names::SUBTLE_TAG_NEW,
            Opcode::NewView => names::SUBTLE_VIEW_NEW,
            Opcode::NewGravity => names::SUBTLE_GRAVITY_NEW,
            Opcode::KillTag => names::SUBTLE_TAG_KILL,
            Opcode::KillView => names::SUBTLE_VIEW_KILL,
            Opcode::KillGravity => names::SUBTLE_GRAVITY_KILL,
            Opcode::KillSublet => names::SUBTLE_SUBLET_KILL,
            Opcode::UpdateSublet => names::SUBTLE_SUBLET_UPDATE,
            Opcode::SubletData => names::SUBTLE_SUBLET_DATA,
            Opcode::SubletFlags => names::SUBTLE_SUBLET_FLAGS,
            Opcode::GravityFlags => names::SUBTLE_GRAVITY_FLAGS,
            Opcode::ViewStyle => names::SUBTLE_VIEW_STYLE,
            Opcode::SubletStyle => names::SUBTLE_SUBLET_STYLE,
            Opcode::Reload => names::SUBTLE_RELOAD,
            Opcode::Restart => names::SUBTLE_RESTART,
            Opcode::Quit => names::SUBTLE_QUIT,
            Opcode::Render => names::SUBTLE_RENDER,
        }
    }

    /// ClientMessage format, 8 for packed strings and 32 for words
    pub fn format(&self) -> u8 {
        match self {
            Opcode::NewTag | Opcode::NewView | Opcode::NewGravity | Opcode::ViewStyle | Opcode::SubletStyle => 8,
            _ => 32,
        }
    }
}

// Implement format! support
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Word of a 32 bit message, atoms are resolved by the connection when the message is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    Long(i32),
    Atom(&'static str),
}

impl Default for Word {
    fn default() -> Self {
        Word::Long(0)
    }
}

impl From<i32> for Word {
    fn from(val: i32) -> Self {
        Word::Long(val)
    }
}

/// Payload of a command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    Words([Word; 5]),
    Packed(String),
}

impl Payload {
    /// Packed string as the 20 byte message body, NUL padded
    pub fn packed_bytes(&self) -> Option<[u8; 20]> {
        match self {
            Payload::Packed(text) => {
                let mut data = [0u8; 20];
                let len = text.len().min(PACKED_MAX);
                data[..len].copy_from_slice(&text.as_bytes()[..len]);
                Some(data)
            }
            Payload::Words(_) => None,
        }
    }
}

/// Window the message is about, the event itself is always delivered through the root window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Root,
    Window(WindowId),
}

/// Owner of a tag mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagOwner {
    Client(WindowId),
    View(usize),
}

/// Command is a single ClientMessage ready to be sent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub opcode: Opcode,
    pub recipient: Recipient,
    pub payload: Payload,
}

impl Command {
    fn words(opcode: Opcode, recipient: Recipient, words: &[Word]) -> Self {
        let mut data = [Word::default(); 5];
        for (slot, word) in data.iter_mut().zip(words) {
            *slot = *word;
        }
        Self { opcode, recipient, payload: Payload::Words(data) }
    }

    fn longs(opcode: Opcode, recipient: Recipient, longs: &[i32]) -> Self {
        let words: Vec<Word> = longs.iter().map(|x| Word::Long(*x)).collect();
        Self::words(opcode, recipient, &words)
    }

    fn packed(opcode: Opcode, text: &str) -> Self {
        Self { opcode, recipient: Recipient::Root, payload: Payload::Packed(pack(text)) }
    }

    /// Raise or lower a window
    pub fn restack(win: WindowId, detail: RestackDetail) -> Self {
        Self::longs(Opcode::Restack, Recipient::Root, &[SOURCE_PAGER, win as i32, detail.into()])
    }

    /// Replace the whole flag set of a client
    pub fn set_flags(win: WindowId, flags: ClientFlags) -> Self {
        Self::longs(Opcode::SetFlags, Recipient::Root, &[win as i32, flags.bits() as i32])
    }

    /// Toggle an EWMH window state like `_NET_WM_STATE_FULLSCREEN`
    pub fn toggle_state(win: WindowId, state: &'static str) -> Self {
        Self::words(
            Opcode::ToggleState,
            Recipient::Window(win),
            &[Word::Atom(names::_NET_WM_STATE_TOGGLE), Word::Atom(state)],
        )
    }

    /// Set the gravity of a client, optionally only for the given view
    pub fn set_gravity(win: WindowId, gravity: usize, view: Option<usize>) -> Self {
        let view = view.map_or(-1, |x| x as i32);
        Self::longs(Opcode::SetGravity, Recipient::Root, &[win as i32, gravity as i32, view])
    }

    pub fn move_resize(win: WindowId, geom: Geometry) -> Self {
        Self::longs(
            Opcode::MoveResize,
            Recipient::Window(win),
            &[0, geom.x, geom.y, geom.width as i32, geom.height as i32],
        )
    }

    /// Ask subtle to recompute the tags of a client
    pub fn retag(win: WindowId) -> Self {
        Self::longs(Opcode::Retag, Recipient::Root, &[win as i32])
    }

    pub fn set_tags(owner: TagOwner, mask: TagMask) -> Self {
        match owner {
            TagOwner::Client(win) => {
                Self::longs(Opcode::SetClientTags, Recipient::Root, &[win as i32, mask.bits() as i32])
            }
            TagOwner::View(id) => Self::longs(Opcode::SetViewTags, Recipient::Root, &[id as i32, mask.bits() as i32]),
        }
    }

    pub fn close(win: WindowId) -> Self {
        Self::longs(Opcode::Close, Recipient::Window(win), &[0, SOURCE_PAGER])
    }

    pub fn focus(win: WindowId) -> Self {
        Self::longs(Opcode::Focus, Recipient::Root, &[win as i32])
    }

    /// Jump to a view, on the given screen or the current one
    pub fn jump_view(view: usize, screen: Option<usize>) -> Self {
        let screen = screen.map_or(-1, |x| x as i32);
        Self::longs(Opcode::JumpView, Recipient::Root, &[view as i32, 0, screen])
    }

    pub fn jump_screen(screen: usize) -> Self {
        Self::longs(Opcode::JumpScreen, Recipient::Root, &[screen as i32])
    }

    pub fn new_tag(name: &str) -> Self {
        Self::packed(Opcode::NewTag, name)
    }

    pub fn new_view(name: &str) -> Self {
        Self::packed(Opcode::NewView, name)
    }

    pub fn new_gravity(entry: &GeometryEntry) -> Self {
        Self::packed(Opcode::NewGravity, &entry.to_string())
    }

    /// Kill a tag, view, gravity or sublet by id
    pub fn kill(kind: Kind, id: usize) -> Option<Self> {
        let opcode = match kind {
            Kind::Tag => Opcode::KillTag,
            Kind::View => Opcode::KillView,
            Kind::Gravity => Opcode::KillGravity,
            Kind::Sublet => Opcode::KillSublet,
            _ => return None,
        };
        Some(Self::longs(opcode, Recipient::Root, &[id as i32]))
    }

    pub fn update_sublet(id: usize) -> Self {
        Self::longs(Opcode::UpdateSublet, Recipient::Root, &[id as i32])
    }

    /// Tell a sublet that new data waits in `SUBTLE_DATA`
    pub fn sublet_data(id: usize) -> Self {
        Self::longs(Opcode::SubletData, Recipient::Root, &[id as i32])
    }

    pub fn sublet_visibility(id: usize, visible: bool) -> Self {
        let flag = if visible { SUBLET_VISIBLE } else { SUBLET_HIDDEN };
        Self::longs(Opcode::SubletFlags, Recipient::Root, &[id as i32, flag])
    }

    pub fn gravity_tiling(id: usize, tiling: Tiling) -> Self {
        Self::longs(Opcode::GravityFlags, Recipient::Root, &[id as i32, tiling.into()])
    }

    /// Select a style for a view or sublet, `None` resets it
    pub fn style(kind: Kind, id: usize, style: Option<&str>) -> Option<Self> {
        let opcode = match kind {
            Kind::View => Opcode::ViewStyle,
            Kind::Sublet => Opcode::SubletStyle,
            _ => return None,
        };
        Some(Self::packed(opcode, &format!("{}#{}", id, style.unwrap_or(""))))
    }

    pub fn reload() -> Self {
        Self::longs(Opcode::Reload, Recipient::Root, &[])
    }

    pub fn restart() -> Self {
        Self::longs(Opcode::Restart, Recipient::Root, &[])
    }

    pub fn quit() -> Self {
        Self::longs(Opcode::Quit, Recipient::Root, &[])
    }

    pub fn render() -> Self {
        Self::longs(Opcode::Render, Recipient::Root, &[])
    }

    /// Plain words of the message, atoms included by name
    pub fn word_list(&self) -> Option<&[Word; 5]> {
        match self.payload {
            Payload::Words(ref words) => Some(words),
            Payload::Packed(_) => None,
        }
    }
}

// Packed strings are cut on a char boundary to fit the message
fn pack(text: &str) -> String {
    if text.len() <= PACKED_MAX {
        return text.to_owned();
    }
    let mut end = PACKED_MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    warn!("pack: truncating {:?} to {} bytes", text, end);
    text[..end].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longs(cmd: &Command) -> Vec<i32> {
        cmd.word_list()
            .unwrap()
            .iter()
            .map(|w| match w {
                Word::Long(x) => *x,
                Word::Atom(_) => panic!("unexpected atom"),
            })
            .collect()
    }

    #[test]
    fn test_restack_claims_pager() {
        let cmd = Command::restack(0x1a00004, RestackDetail::Below);
        assert_eq!(cmd.opcode.name(), "_NET_RESTACK_WINDOW");
        assert_eq!(cmd.recipient, Recipient::Root);
        assert_eq!(longs(&cmd), vec![2, 0x1a00004, 1, 0, 0]);
    }

    #[test]
    fn test_toggle_state() {
        let cmd = Command::toggle_state(42, names::_NET_WM_STATE_FULLSCREEN);
        assert_eq!(cmd.opcode.name(), "_NET_WM_STATE");
        assert_eq!(cmd.recipient, Recipient::Window(42));
        let words = cmd.word_list().unwrap();
        assert_eq!(words[0], Word::Atom("_NET_WM_STATE_TOGGLE"));
        assert_eq!(words[1], Word::Atom("_NET_WM_STATE_FULLSCREEN"));
        assert_eq!(&words[2..], &[Word::Long(0); 3]);
    }

    #[test]
    fn test_set_gravity_unset_view() {
        assert_eq!(longs(&Command::set_gravity(7, 3, None)), vec![7, 3, -1, 0, 0]);
        assert_eq!(longs(&Command::set_gravity(7, 3, Some(1))), vec![7, 3, 1, 0, 0]);
    }

    #[test]
    fn test_move_resize_layout() {
        let cmd = Command::move_resize(9, Geometry::new(10, 20, 300, 400));
        assert_eq!(cmd.recipient, Recipient::Window(9));
        assert_eq!(longs(&cmd), vec![0, 10, 20, 300, 400]);
    }

    #[test]
    fn test_set_tags_owner() {
        let cmd = Command::set_tags(TagOwner::Client(5), TagMask::from_bits(0b110));
        assert_eq!(cmd.opcode, Opcode::SetClientTags);
        assert_eq!(longs(&cmd), vec![5, 0b110, 0, 0, 0]);

        let cmd = Command::set_tags(TagOwner::View(2), TagMask::from_bits(0b10));
        assert_eq!(cmd.opcode.name(), "SUBTLE_VIEW_TAGS");
        assert_eq!(longs(&cmd), vec![2, 0b10, 0, 0, 0]);
    }

    #[test]
    fn test_close_and_jump() {
        let cmd = Command::close(11);
        assert_eq!(cmd.recipient, Recipient::Window(11));
        assert_eq!(longs(&cmd), vec![0, 2, 0, 0, 0]);
        assert_eq!(longs(&Command::jump_view(4, None)), vec![4, 0, -1, 0, 0]);
        assert_eq!(longs(&Command::jump_view(4, Some(1))), vec![4, 0, 1, 0, 0]);
    }

    #[test]
    fn test_packed_creation() {
        let cmd = Command::new_gravity(&GeometryEntry::new(Geometry::new(1, 2, 10, 20), "center"));
        assert_eq!(cmd.opcode.format(), 8);
        assert_eq!(cmd.payload, Payload::Packed("10x20+1+2#center".to_owned()));

        let bytes = cmd.payload.packed_bytes().unwrap();
        assert_eq!(&bytes[..16], b"10x20+1+2#center");
        assert!(bytes[16..].iter().all(|b| *b == 0));
        assert!(cmd.word_list().is_none());
    }

    #[test]
    fn test_packed_truncation() {
        let cmd = Command::new_tag("a-very-long-tag-name-indeed");
        assert_eq!(cmd.payload, Payload::Packed("a-very-long-tag-nam".to_owned()));
        assert_eq!(cmd.payload.packed_bytes().unwrap()[19], 0);

        // Never split a multibyte char
        let cmd = Command::new_view("ääääääääää");
        assert_eq!(cmd.payload, Payload::Packed("ääääääääää"[..18].to_owned()));
    }

    #[test]
    fn test_kill_only_for_id_kinds() {
        assert_eq!(Command::kill(Kind::Tag, 3).unwrap().opcode.name(), "SUBTLE_TAG_KILL");
        assert_eq!(Command::kill(Kind::Sublet, 1).unwrap().opcode, Opcode::KillSublet);
        assert!(Command::kill(Kind::Client, 1).is_none());
    }

    #[test]
    fn test_style_and_controls() {
        let cmd = Command::style(Kind::View, 2, Some("urgent")).unwrap();
        assert_eq!(cmd.payload, Payload::Packed("2#urgent".to_owned()));
        let cmd = Command::style(Kind::Sublet, 0, None).unwrap();
        assert_eq!(cmd.payload, Payload::Packed("0#".to_owned()));

        assert_eq!(longs(&Command::quit()), vec![0; 5]);
        assert_eq!(Command::reload().opcode.name(), "SUBTLE_RELOAD");
        assert_eq!(longs(&Command::sublet_visibility(1, false)), vec![1, 1 << 10, 0, 0, 0]);
    }
}
