use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    client::Client,
    command::Command,
    mask::TagMask,
    model::*,
    remote::Remote,
    resolver::{self, Entity, ListSource, Record, Resolution},
    view::View,
    SubtlextResult,
};

/// Tag is a label subtle uses to place clients on views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    handle: Lifecycle<usize>,
    pub name: String,
}

impl Tag {
    /// Create a local tag, it has no id until it is saved
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let mut tag = Tag::new("mail");
    /// tag.save(&subtle).unwrap();
    /// ```
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { handle: Lifecycle::Detached, name: name.into() }
    }

    pub(crate) fn resolved(id: usize, name: String) -> Self {
        Self { handle: Lifecycle::Resolved(id), name }
    }

    pub fn id(&self) -> Option<usize> {
        self.handle.id()
    }

    /// Id of a tag that can still be used
    pub(crate) fn live_id(&self) -> Option<usize> {
        self.handle.live(Kind::Tag).ok()
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Tags of the visible views
    pub fn visible(remote: &dyn Remote) -> SubtlextResult<Vec<Tag>> {
        let mask = TagMask::from_bits(remote.root_cardinals(names::SUBTLE_VISIBLE_TAGS)?.and_then(|x| x.first().copied()).unwrap_or(0));
        let names = remote.root_strings(Self::LIST)?.unwrap_or_default();
        Ok(crate::mask::tags_for_mask(&names, mask))
    }

    /// Create the tag in subtle unless it already exists
    pub fn save(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.handle.check(Kind::Tag)?;
        let id = resolver::save_named(remote, Self::LIST, Self::SOURCE, &self.name, &Command::new_tag(&self.name))?;
        debug!("save: tag: {}, id: {}", self.name, id);
        self.handle = Lifecycle::Resolved(id);
        Ok(())
    }

    /// Clients having this tag
    pub fn clients(&self, remote: &dyn Remote) -> SubtlextResult<Vec<Client>> {
        let id = self.handle.live(Kind::Tag)?;
        Ok(Client::list(remote)?.into_iter().filter(|x| x.tags.contains(id)).collect())
    }

    /// Views having this tag
    pub fn views(&self, remote: &dyn Remote) -> SubtlextResult<Vec<View>> {
        let id = self.handle.live(Kind::Tag)?;
        Ok(View::list(remote)?.into_iter().filter(|x| x.tags.contains(id)).collect())
    }

    /// Remove the tag from subtle, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::Tag)?;
        if let Some(cmd) = Command::kill(Kind::Tag, id) {
            remote.send(&cmd)?;
        }
        self.handle.freeze();
        debug!("kill: tag: {}, id: {}", self.name, id);
        Ok(())
    }
}

impl Entity for Tag {
    const KIND: Kind = Kind::Tag;
    const LIST: &'static str = names::SUBTLE_TAG_LIST;
    const SOURCE: ListSource = ListSource::Names;
    const KEYWORDS: &'static [Keyword] = &[Keyword::All, Keyword::Visible];

    fn from_record(index: usize, record: Record) -> Option<Self> {
        match record {
            Record::Name(name) => Some(Tag::resolved(index, name)),
            _ => None,
        }
    }

    fn bulk(remote: &dyn Remote, keyword: Keyword) -> SubtlextResult<Resolution<Self>> {
        match keyword {
            Keyword::Visible => Ok(Resolution::Many(Tag::visible(remote)?)),
            _ => Ok(Resolution::Many(resolver::every(remote)?)),
        }
    }
}

// Implement format! support
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
