//! Atoms used by subtle and the EWMH properties it maintains. All of them are interned in a single
//! round trip when connecting; anything else gets interned on demand by the connection.
use x11rb::{atom_manager, protocol::xproto::Atom};

macro_rules! atoms {
    ($($name:ident,)*) => {
        atom_manager! {
            pub AtomCollection: AtomCollectionCookie {
                $($name,)*
            }
        }

        impl AtomCollection {
            /// Look up a pre-interned atom by its name
            pub fn lookup(&self, name: &str) -> Option<Atom> {
                $(
                    if name == stringify!($name) {
                        return Some(self.$name);
                    }
                )*
                None
            }
        }

        /// Property and message names known up front
        pub mod names {
            $(pub const $name: &str = stringify!($name);)*
        }
    };
}

atoms! {
    UTF8_STRING,
    WM_STATE,
    WM_WINDOW_ROLE,
    _NET_ACTIVE_WINDOW,
    _NET_CLIENT_LIST,
    _NET_CLOSE_WINDOW,
    _NET_CURRENT_DESKTOP,
    _NET_DESKTOP_NAMES,
    _NET_MOVERESIZE_WINDOW,
    _NET_RESTACK_WINDOW,
    _NET_SUPPORTING_WM_CHECK,
    _NET_WM_NAME,
    _NET_WM_PID,
    _NET_WM_STATE,
    _NET_WM_STATE_ABOVE,
    _NET_WM_STATE_FULLSCREEN,
    _NET_WM_STATE_STICKY,
    _NET_WM_STATE_TOGGLE,
    _NET_WORKAREA,
    SUBTLE_CLIENT_FLAGS,
    SUBTLE_CLIENT_GRAVITY,
    SUBTLE_CLIENT_RETAG,
    SUBTLE_CLIENT_TAGS,
    SUBTLE_DATA,
    SUBTLE_GRAVITY_FLAGS,
    SUBTLE_GRAVITY_KILL,
    SUBTLE_GRAVITY_LIST,
    SUBTLE_GRAVITY_NEW,
    SUBTLE_QUIT,
    SUBTLE_RELOAD,
    SUBTLE_RENDER,
    SUBTLE_RESTART,
    SUBTLE_SCREEN_JUMP,
    SUBTLE_SCREEN_PANELS,
    SUBTLE_SCREEN_VIEWS,
    SUBTLE_SUBLET_DATA,
    SUBTLE_SUBLET_FLAGS,
    SUBTLE_SUBLET_KILL,
    SUBTLE_SUBLET_LIST,
    SUBTLE_SUBLET_STYLE,
    SUBTLE_SUBLET_UPDATE,
    SUBTLE_TAG_KILL,
    SUBTLE_TAG_LIST,
    SUBTLE_TAG_NEW,
    SUBTLE_TRAY_LIST,
    SUBTLE_VERSION,
    SUBTLE_VIEW_KILL,
    SUBTLE_VIEW_NEW,
    SUBTLE_VIEW_STYLE,
    SUBTLE_VIEW_TAGS,
    SUBTLE_VISIBLE_TAGS,
    SUBTLE_VISIBLE_VIEWS,
}
