//! `libsubtlext` is a client library for the [subtle](https://subtle.subforge.org) window manager.
//! subtle publishes its state as properties on the root window and accepts changes as
//! ClientMessages; `libsubtlext` reads those properties and sends those messages so that clients,
//! tags, views, gravities, sublets, trays and screens can be found and manipulated from outside.
//!
//! Every entity kind is found through the same engine: a [`Selector`] is normalized into a
//! [`MatchSpec`](selector::MatchSpec), the remote list backing the kind is scanned and every entry
//! is tested with the [`Matcher`](matcher::Matcher). Changes are encoded as [`Command`]s and sent
//! through a [`Remote`], which is the X connection in [`Subtle`] or an in-memory table in tests.
//!
//! ### Examples
//! ```ignore
//! use libsubtlext::prelude::*;
//! let subtle = Subtle::connect(None).unwrap();
//! for mut client in Client::find_all(&subtle, "xterm").unwrap() {
//!     client.tag(&subtle, vec![Selector::from("terms")]).unwrap();
//! }
//! ```
mod atoms;
mod error;
mod model;
pub mod client;
pub mod command;
pub mod control;
pub mod gravity;
pub mod mask;
pub mod matcher;
pub mod remote;
pub mod resolver;
pub mod screen;
pub mod select;
pub mod selector;
pub mod sublet;
pub mod tag;
pub mod tray;
pub mod view;
mod wm;

#[cfg(test)]
mod mock;

pub use atoms::{names, AtomCollection};
pub use client::Client;
pub use command::{Command, TagOwner};
pub use error::*;
pub use gravity::Gravity;
pub use mask::{MaskAction, TagMask};
pub use model::*;
pub use remote::Remote;
pub use resolver::{Entity, Mode, Resolution};
pub use screen::Screen;
pub use selector::Selector;
pub use sublet::Sublet;
pub use tag::Tag;
pub use tray::Tray;
pub use view::View;
pub use wm::Subtle;

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libsubtlext::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}
