use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    client::Client,
    command::{Command, TagOwner},
    mask::{self, MaskAction, TagMask},
    model::*,
    remote::Remote,
    resolver::{self, Entity, ListSource, Record, Resolution},
    selector::Selector,
    tag::Tag,
    SubtlextResult,
};

/// View is a virtual desktop showing every client that shares a tag with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    handle: Lifecycle<usize>,
    pub name: String,
    pub tags: TagMask,
}

impl View {
    /// Create a local view, it has no id until it is saved
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { handle: Lifecycle::Detached, name: name.into(), tags: TagMask::EMPTY }
    }

    pub(crate) fn resolved(id: usize, name: String) -> Self {
        Self { handle: Lifecycle::Resolved(id), name, tags: TagMask::EMPTY }
    }

    pub fn id(&self) -> Option<usize> {
        self.handle.id()
    }

    pub fn is_frozen(&self) -> bool {
        self.handle.is_frozen()
    }

    /// Views currently shown on any screen
    pub fn visible(remote: &dyn Remote) -> SubtlextResult<Vec<View>> {
        let visible = TagMask::from_bits(remote.cardinal(remote.root(), names::SUBTLE_VISIBLE_VIEWS)?.unwrap_or(0));
        Ok(resolver::every::<View>(remote)?
            .into_iter()
            .filter(|x| x.id().map_or(false, |id| visible.contains(id)))
            .collect())
    }

    /// View shown on the current screen
    pub fn current(remote: &dyn Remote) -> SubtlextResult<Option<View>> {
        let id = match remote.cardinal(remote.root(), names::_NET_CURRENT_DESKTOP)? {
            Some(id) => id as usize,
            None => return Ok(None),
        };
        View::find(remote, id)
    }

    /// Create the view in subtle unless it already exists
    pub fn save(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        self.handle.check(Kind::View)?;
        let id = resolver::save_named(remote, Self::LIST, Self::SOURCE, &self.name, &Command::new_view(&self.name))?;
        debug!("save: view: {}, id: {}", self.name, id);
        self.handle = Lifecycle::Resolved(id);
        Ok(())
    }

    /// Show the view on the current screen
    pub fn jump(&self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::View)?;
        remote.send(&Command::jump_view(id, None))?;
        debug!("jump: view: {}, id: {}", self.name, id);
        Ok(())
    }

    /// Next view in the list, the list doesn't wrap around
    pub fn next(&self, remote: &dyn Remote) -> SubtlextResult<Option<View>> {
        let id = self.handle.live(Kind::View)?;
        View::find(remote, id + 1)
    }

    /// Previous view in the list, the list doesn't wrap around
    pub fn prev(&self, remote: &dyn Remote) -> SubtlextResult<Option<View>> {
        let id = self.handle.live(Kind::View)?;
        match id.checked_sub(1) {
            Some(id) => View::find(remote, id),
            None => Ok(None),
        }
    }

    pub fn is_current(&self, remote: &dyn Remote) -> SubtlextResult<bool> {
        let current = remote.cardinal(remote.root(), names::_NET_CURRENT_DESKTOP)?;
        Ok(self.id().is_some() && current.map(|x| x as usize) == self.id())
    }

    pub fn is_visible(&self, remote: &dyn Remote) -> SubtlextResult<bool> {
        let visible = TagMask::from_bits(remote.cardinal(remote.root(), names::SUBTLE_VISIBLE_VIEWS)?.unwrap_or(0));
        Ok(self.id().map_or(false, |id| visible.contains(id)))
    }

    /// Clients shown on this view, sticky clients included
    pub fn clients(&self, remote: &dyn Remote) -> SubtlextResult<Vec<Client>> {
        let id = self.handle.live(Kind::View)?;
        let tags = mask::current_mask(remote, TagOwner::View(id))?;
        Ok(Client::list(remote)?
            .into_iter()
            .filter(|x| x.tags.intersects(tags) || x.flags.contains(ClientFlags::STICK))
            .collect())
    }

    pub fn tags(&self, remote: &dyn Remote) -> SubtlextResult<Vec<Tag>> {
        mask::tags_of(remote, TagOwner::View(self.handle.live(Kind::View)?))
    }

    /// Replace all tags of the view
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
        let id = self.handle.live(Kind::View)?;
        self.tags = mask::update_tags(remote, TagOwner::View(id), tags, action)?;
        Ok(())
    }

    /// Select a style for the view or reset it with `None`
    pub fn style(&self, remote: &dyn Remote, style: Option<&str>) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::View)?;
        if let Some(cmd) = Command::style(Kind::View, id, style) {
            remote.send(&cmd)?;
        }
        Ok(())
    }

    /// Remove the view from subtle, the handle is frozen afterwards
    pub fn kill(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        let id = self.handle.live(Kind::View)?;
        if let Some(cmd) = Command::kill(Kind::View, id) {
            remote.send(&cmd)?;
        }
        self.handle.freeze();
        debug!("kill: view: {}, id: {}", self.name, id);
        Ok(())
    }
}

impl Entity for View {
    const KIND: Kind = Kind::View;
    const LIST: &'static str = names::_NET_DESKTOP_NAMES;
    const SOURCE: ListSource = ListSource::Names;
    const KEYWORDS: &'static [Keyword] = &[Keyword::All, Keyword::Visible, Keyword::Current];

    fn from_record(index: usize, record: Record) -> Option<Self> {
        match record {
            Record::Name(name) => Some(View::resolved(index, name)),
            _ => None,
        }
    }

    fn bulk(remote: &dyn Remote, keyword: Keyword) -> SubtlextResult<Resolution<Self>> {
        match keyword {
            Keyword::All => Ok(Resolution::Many(resolver::every(remote)?)),
            Keyword::Visible => Ok(Resolution::Many(View::visible(remote)?)),
            Keyword::Current => Ok(View::current(remote)?.into_iter().collect()),
        }
    }

    fn refresh(&mut self, remote: &dyn Remote) -> SubtlextResult<()> {
        if let Some(id) = self.id() {
            self.tags = mask::current_mask(remote, TagOwner::View(id))?;
        }
        Ok(())
    }
}

// Implement format! support
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
