use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    client::Client,
    command::Command,
    model::*,
    remote::Remote,
    resolver::{self, Entity, ListSource, Record},
    SubtlextError, SubtlextResult,
};

/// Gravity is a named placement in percent of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gravity {
    handle: Lifecycle<usize>,
    pub name: String,
    pub geometry: Option<Geometry>,
}

impl Gravity {
    /// Create a local gravity, a geometry is required to save it unless it already exists
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let mut gravity = Gravity::new("half", Some(Geometry::new(0, 0, 50, 100)));
    /// gravity.save(&subtle).unwrap();
    /// ```
    pub fn new<T: Into<String>>(name: T, geometry: Option<Geometry>) -> Self {
        Self { handle: Lifecycle::Detached, name: name.into(), geometry }
    }

    pub fn id(&self) -> Option<usize> {
        self.handle.id()
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Create the gravity in subtle unless it already exists
    pub fn save(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.handle.check(Kind::Gravity)?;
        if let Some(id) = resolver::find_exact(remote, Self::LIST, Self::SOURCE, &self.name)? {
            self.handle = Lifecycle::Resolved(id);
            return Ok(());
        }

        let geom = self
            .geometry
            .ok_or_else(|| SubtlextError::InvalidArgument(format!("gravity {} needs a geometry", self.name)))?;
        let entry = GeometryEntry::new(geom, self.name.clone());
        let id = resolver::save_named(remote, Self::LIST, Self::SOURCE, &self.name, &Command::new_gravity(&entry))?;
        debug!("save: gravity: {}, id: {}", entry, id);
        self.handle = Lifecycle::Resolved(id);
        Ok(())
    }

    /// Scale the gravity to pixels of the given screen area
    pub fn geometry_for(&self, screen: Geometry) -> Option<Geometry> {
        let geom = self.geometry?;
        let scale = |size: u32, percent: i64| (size as i64 * percent / 100) as i32;
        Some(Geometry::new(
            screen.x + scale(screen.width, geom.x as i64),
            screen.y + scale(screen.height, geom.y as i64),
            scale(screen.width, geom.width as i64) as u32,
            scale(screen.height, geom.height as i64) as u32,
        ))
    }

    /// Set the tiling mode of the gravity
    pub fn tiling(&self, remote: &dyn Remote, tiling: Tiling) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Gravity)?;
        remote.send(&Command::gravity_tiling(id, tiling))?;
        debug!("tiling: gravity: {}, mode: {}", self.name, tiling);
        Ok(())
    }

    /// Clients that currently have this gravity
    pub fn clients(&self, remote: &dyn Remote) -> SubtlextResult<Vec<Client>> {
        let id = self.handle.live(Kind::Gravity)?;
        Ok(Client::list(remote)?.into_iter().filter(|x| x.gravity == Some(id)).collect())
    }

    /// Remove the gravity from subtle, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Gravity)?;
        if let Some(cmd) = Command::kill(Kind::Gravity, id) {
            remote.send(&cmd)?;
        }
        self.handle.freeze();
        debug!("kill: gravity: {}, id: {}", self.name, id);
        Ok(())
    }
}

impl Entity for Gravity {
    const KIND: Kind = Kind::Gravity;
    const LIST: &'static str = names::SUBTLE_GRAVITY_LIST;
    const SOURCE: ListSource = ListSource::Geometries;

    fn from_record(index: usize, record: Record) -> Option<Self> {
        match record {
            Record::Entry(entry) => Some(Self {
                handle: Lifecycle::Resolved(index),
                name: entry.name,
                geometry: Some(entry.geometry),
            }),
            _ => None,
        }
    }
}

// Implement format! support
impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.geometry {
            Some(geom) => write!(f, "{}#{}", geom, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock::*, selector::Selector};

    fn remote() -> MockRemote {
        MockRemote::new()
            .with_strings(ROOT, "SUBTLE_GRAVITY_LIST", &["100x100+0+0#full", "broken", "50x50+25+25#center"])
            .with_client(10, "irb", "xterm", "XTerm")
            .with_cardinals(10, "SUBTLE_CLIENT_GRAVITY", &[2])
            .with_client(11, "firefox", "Navigator", "Firefox")
            .with_cardinals(11, "SUBTLE_CLIENT_GRAVITY", &[0])
    }

    #[test]
    fn test_find_skips_malformed_entries() {
        let remote = remote();
        let all = Gravity::list(&remote).unwrap();
        assert_eq!(all.iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["full", "center"]);
        assert_eq!(all[1].id(), Some(2));
        assert_eq!(all[1].to_string(), "50x50+25+25#center");

        assert!(Gravity::find(&remote, Selector::symbol("broken")).unwrap().is_none());
        assert!(Gravity::find(&remote, 1usize).unwrap().is_none());
    }

    #[test]
    fn test_geometry_for_screen() {
        let gravity = Gravity::new("center", Some(Geometry::new(25, 25, 50, 50)));
        let screen = Geometry::new(1280, 20, 800, 600);
        assert_eq!(gravity.geometry_for(screen), Some(Geometry::new(1480, 170, 400, 300)));
        assert_eq!(Gravity::new("none", None).geometry_for(screen), None);
    }

    #[test]
    fn test_save() {
        let remote = remote();

        // Existing gravities don't need a geometry
        let mut gravity = Gravity::new("center", None);
        gravity.save(&remote).unwrap();
        assert_eq!(gravity.id(), Some(2));
        assert!(remote.sent().is_empty());

        let mut gravity = Gravity::new("left", None);
        let err = gravity.save(&remote).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::InvalidArgument(_))));

        let geom = Geometry::new(0, 0, 50, 100);
        let mut gravity = Gravity::new("left", Some(geom));
        gravity.save(&remote).unwrap();
        assert_eq!(remote.sent(), vec![Command::new_gravity(&GeometryEntry::new(geom, "left"))]);
        assert_eq!(gravity.id(), Some(3));
    }

    #[test]
    fn test_clients_tiling_kill() {
        let remote = remote();
        let mut gravity = Gravity::find(&remote, Selector::symbol("center")).unwrap().unwrap();
        let clients = gravity.clients(&remote).unwrap();
        assert_eq!(clients.iter().map(|x| x.win).collect::<Vec<_>>(), vec![10]);

        gravity.tiling(&remote, Tiling::Vertical).unwrap();
        gravity.kill(&remote).unwrap();
        assert!(gravity.tiling(&remote, Tiling::None).is_err());
        assert_eq!(remote.sent(), vec![
            Command::gravity_tiling(2, Tiling::Vertical),
            Command::kill(Kind::Gravity, 2).unwrap(),
        ]);
    }
}
