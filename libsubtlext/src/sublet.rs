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

/// Sublet is a panel item driven by a script inside subtle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sublet {
    handle: Lifecycle<usize>,
    pub name: String,

    /// Area on the panel in pixels
    pub geometry: Geometry,
}

impl Sublet {
    pub fn id(&self) -> Option<usize> {
        self.handle.id()
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Ask subtle to run the update handler of the sublet
    pub fn update(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Sublet)?;
        remote.send(&Command::update_sublet(id))?;
        debug!("update: sublet: {}, id: {}", self.name, id);
        Ok(())
    }

    /// Hand text to the data handler of the sublet. The text is stored in `SUBTLE_DATA` on the
    /// root window before the sublet is notified.
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let clock = Sublet::find(&subtle, "clock").unwrap().unwrap();
    /// clock.send_data(&subtle, "tick").unwrap();
    /// ```
    pub fn send_data(&self, remote: &dyn Remote, data: &str) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Sublet)?;
        remote.set_strings(remote.root(), names::SUBTLE_DATA, &[data.to_owned()])?;
        remote.send(&Command::sublet_data(id))?;
        debug!("send_data: sublet: {}, id: {}, len: {}", self.name, id, data.len());
        Ok(())
    }

    pub fn show(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.visibility(remote, true)
    }

    pub fn hide(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.visibility(remote, false)
    }

    fn visibility(&self, remote: &dyn Remote, visible: bool) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Sublet)?;
        remote.send(&Command::sublet_visibility(id, visible))?;
        debug!("visibility: sublet: {}, visible: {}", self.name, visible);
        Ok(())
    }

    /// Select a style for the sublet or reset it with `None`
    pub fn style(&self, remote: &dyn Remote, style: Option<&str>) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Sublet)?;
        if let Some(cmd) = Command::style(Kind::Sublet, id, style) {
            remote.send(&cmd)?;
        }
        Ok(())
    }

    /// Unload the sublet, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Sublet)?;
        if let Some(cmd) = Command::kill(Kind::Sublet, id) {
            remote.send(&cmd)?;
        }
        self.handle.freeze();
        debug!("kill: sublet: {}, id: {}", self.name, id);
        Ok(())
    }
}

impl Entity for Sublet {
    const KIND: Kind = Kind::Sublet;
    const LIST: &'static str = names::SUBTLE_SUBLET_LIST;
    const SOURCE: ListSource = ListSource::Geometries;

    fn from_record(index: usize, record: Record) -> Option<Self> {
        match record {
            Record::Entry(entry) => {
                Some(Self { handle: Lifecycle::Resolved(index), name: entry.name, geometry: entry.geometry })
            }
            _ => None,
        }
    }
}

// Implement format! support
impl fmt::Display for Sublet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock::*, selector::Selector, SubtlextError};

    fn remote() -> MockRemote {
        MockRemote::new().with_strings(ROOT, "SUBTLE_SUBLET_LIST", &["60x18+0+0#clock", "40x18+60+0#battery"])
    }

    #[test]
    fn test_find() {
        let remote = remote();
        let sublet = Sublet::find(&remote, Selector::symbol("battery")).unwrap().unwrap();
        assert_eq!(sublet.id(), Some(1));
        assert_eq!(sublet.geometry, Geometry::new(60, 0, 40, 18));
        assert_eq!(Sublet::find_all(&remote, "c").unwrap().len(), 1);
    }

    #[test]
    fn test_send_data() {
        let remote = remote();
        let sublet = Sublet::find(&remote, "clock").unwrap().unwrap();
        sublet.send_data(&remote, "tick").unwrap();
        assert_eq!(remote.string(ROOT, "SUBTLE_DATA").unwrap().as_deref(), Some("tick"));
        assert_eq!(remote.sent(), vec![Command::sublet_data(0)]);
    }

    #[test]
    fn test_commands() {
        let remote = remote();
        let mut sublet = Sublet::find(&remote, "battery").unwrap().unwrap();
        sublet.update(&remote).unwrap();
        sublet.show(&remote).unwrap();
        sublet.hide(&remote).unwrap();
        sublet.style(&remote, Some("warn")).unwrap();
        sublet.kill(&remote).unwrap();
        assert_eq!(remote.sent(), vec![
            Command::update_sublet(1),
            Command::sublet_visibility(1, true),
            Command::sublet_visibility(1, false),
            Command::style(Kind::Sublet, 1, Some("warn")).unwrap(),
            Command::kill(Kind::Sublet, 1).unwrap(),
        ]);

        let err = sublet.update(&remote).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::StaleHandle("sublet")));
    }
}
