//! Collection resolver driving a scan over a remote list. Lists are fetched fresh on every call and
//! their order defines the index of every entry. Matching entries are refreshed before they are
//! handed back.
use std::cell::OnceCell;

use tracing::{debug, trace, warn};

use crate::{
    command::Command,
    matcher::{self, Matcher, WindowCandidate},
    model::*,
    remote::Remote,
    selector::{self, Parsed, Selector, Target},
    SubtlextError, SubtlextResult,
};

/// Shape of the remote list backing an entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// NUL separated names like `SUBTLE_TAG_LIST`
    Names,

    /// Window ids like `_NET_CLIENT_LIST`
    Windows,

    /// Geometry-tagged names like `SUBTLE_GRAVITY_LIST`
    Geometries,

    /// Four cardinals per entry like `_NET_WORKAREA`
    Workareas,
}

/// Record is one entry of a fetched list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Name(String),
    Window(WindowId),
    Entry(GeometryEntry),
    Area(Geometry),
}

impl Record {
    /// Text patterns are matched against, windows have none
    pub fn label(&self) -> Option<String> {
        match self {
            Record::Name(name) => Some(name.clone()),
            Record::Entry(entry) => Some(entry.name.clone()),
            Record::Area(geom) => Some(geom.to_string()),
            Record::Window(_) => None,
        }
    }

    pub fn window(&self) -> Option<WindowId> {
        match *self {
            Record::Window(win) => Some(win),
            _ => None,
        }
    }
}

/// Aggregation policy of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    First,
    All,
}

/// Resolution is the result of resolving a selector
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for Resolution<T> {
    fn default() -> Self {
        Resolution::None
    }
}

impl<T> Resolution<T> {
    /// Collapse collected matches according to the mode. `First` yields none or one and `All`
    /// always yields a collection, even an empty one.
    pub fn collapse(mut items: Vec<T>, mode: Mode) -> Self {
        match mode {
            Mode::First if items.is_empty() => Resolution::None,
            Mode::First => Resolution::One(items.swap_remove(0)),
            Mode::All => Resolution::Many(items),
        }
    }

    /// Merge another value, promoting a single value to a collection
    pub fn push(self, item: T) -> Self {
        match self {
            Resolution::None => Resolution::One(item),
            Resolution::One(first) => Resolution::Many(vec![first, item]),
            Resolution::Many(mut items) => {
                items.push(item);
                Resolution::Many(items)
            }
        }
    }

    pub fn first(self) -> Option<T> {
        self.into_iter().next()
    }

    pub fn len(&self) -> usize {
        match self {
            Resolution::None => 0,
            Resolution::One(_) => 1,
            Resolution::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T> IntoIterator for Resolution<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Resolution::None => vec![].into_iter(),
            Resolution::One(item) => vec![item].into_iter(),
            Resolution::Many(items) => items.into_iter(),
        }
    }
}

impl<T> FromIterator<T> for Resolution<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Resolution::None, Resolution::push)
    }
}

/// Entity is implemented by every kind of remote object the resolver can find
pub trait Entity: Sized {
    const KIND: Kind;

    /// Property holding the list on the root window
    const LIST: &'static str;
    const SOURCE: ListSource;

    /// Keywords this kind has a bulk accessor for
    const KEYWORDS: &'static [Keyword] = &[Keyword::All];

    /// Whether criteria maps can be used to find this kind
    const CRITERIA: bool = false;

    /// Build a handle from a list entry, `None` if the entry doesn't describe this kind
    fn from_record(index: usize, record: Record) -> Option<Self>;

    /// Bulk accessor for a supported keyword
    fn bulk(remote: &dyn Remote, keyword: Keyword) -> SubtlextResult<Resolution<Self>> {
        debug_assert!(keyword == Keyword::All);
        Ok(Resolution::Many(every(remote)?))
    }

    /// Re-fetch the attributes of the entity
    fn refresh(&mut self, _remote: &dyn Remote) -> SubtlextResult<()> {
        Ok(())
    }

    /// Resolve a selector under the given mode
    fn resolve(remote: &dyn Remote, selector: Selector<Self>, mode: Mode) -> SubtlextResult<Resolution<Self>> {
        resolve(remote, selector, mode)
    }

    /// First entity matching the selector
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let subtle = Subtle::connect(None).unwrap();
    /// let term = Client::find(&subtle, "xterm").unwrap();
    /// ```
    fn find<S: Into<Selector<Self>>>(remote: &dyn Remote, selector: S) -> SubtlextResult<Option<Self>> {
        Ok(resolve(remote, selector.into(), Mode::First)?.first())
    }

    /// Every entity matching the selector
    fn find_all<S: Into<Selector<Self>>>(remote: &dyn Remote, selector: S) -> SubtlextResult<Vec<Self>> {
        Ok(resolve(remote, selector.into(), Mode::All)?.into_vec())
    }

    /// Every entity of this kind
    fn list(remote: &dyn Remote) -> SubtlextResult<Vec<Self>> {
        every(remote)
    }
}

/// Resolve a selector against the list of the entity kind
pub fn resolve<E: Entity>(remote: &dyn Remote, selector: Selector<E>, mode: Mode) -> SubtlextResult<Resolution<E>> {
    let spec = match selector::parse(selector, E::CRITERIA)? {
        Parsed::Entity(entity) => return Ok(Resolution::One(entity)),
        Parsed::Spec(spec) => spec,
    };

    // Keywords go straight to the bulk accessor
    if let Target::Keyword(keyword) = spec.target {
        if !E::KEYWORDS.contains(&keyword) {
            return Err(SubtlextError::InvalidArgument(format!("{} has no notion of {}", E::KIND, keyword)).into());
        }
        return E::bulk(remote, keyword);
    }

    let selected = match spec.target {
        Target::Interactive if E::SOURCE != ListSource::Windows => {
            return Err(SubtlextError::InvalidArgument(format!("{} can't be selected with the pointer", E::KIND)).into());
        }
        Target::Interactive => Some(remote.select_window()?.ok_or(SubtlextError::InteractiveSelectionFailed)?),
        _ => None,
    };
    let matcher = match spec.target {
        Target::Pattern => Some(Matcher::compile(&spec)?),
        _ => None,
    };

    let records = fetch_records(remote, E::LIST, E::SOURCE)?;
    let gravities = OnceCell::new();
    let mut found = vec![];
    for (index, record) in records.into_iter().enumerate() {
        let hit = match spec.target {
            Target::Index(id) => index == id,
            Target::Id(id) => index == id || record.window() == Some(id as WindowId),
            Target::Window(win) => record.window() == Some(win),
            Target::Interactive => record.window() == selected,
            Target::Pattern => match (&matcher, &record) {
                (Some(matcher), Record::Window(win)) => {
                    matcher::matches(matcher, spec.criteria, &WindowCandidate::new(remote, *win, &gravities))
                }
                (Some(matcher), record) => record.label().map_or(false, |x| matcher.is_match(&x)),
                (None, _) => false,
            },
            Target::Keyword(_) => false,
        };
        trace!("resolve: {}: index: {}, record: {:?}, hit: {}", E::KIND, index, record, hit);
        if !hit {
            continue;
        }
        let entity = match E::from_record(index, record) {
            Some(entity) => entity,
            None => continue,
        };
        if let Some(entity) = refreshed(remote, entity)? {
            found.push(entity);
            if mode == Mode::First {
                break;
            }
        }
    }
    debug!("resolve: {}: target: {:?}, pattern: {:?}, found: {}", E::KIND, spec.target, spec.pattern, found.len());
    Ok(Resolution::collapse(found, mode))
}

/// Every entity of a kind in list order, refreshed
pub fn every<E: Entity>(remote: &dyn Remote) -> SubtlextResult<Vec<E>> {
    let mut entities = vec![];
    for (index, record) in fetch_records(remote, E::LIST, E::SOURCE)?.into_iter().enumerate() {
        if let Some(entity) = E::from_record(index, record) {
            entities.extend(refreshed(remote, entity)?);
        }
    }
    Ok(entities)
}

// Refresh an entity, `None` when its window was destroyed after the list was fetched
fn refreshed<E: Entity>(remote: &dyn Remote, mut entity: E) -> SubtlextResult<Option<E>> {
    match entity.refresh(remote) {
        Ok(()) => Ok(Some(entity)),
        Err(err) if err.is_window_gone() => {
            trace!("refresh: {}: skipping, {}", E::KIND, err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Fetch a list from the root window. Missing window lists are empty since subtle only sets them
/// once there is something to list, any other missing list fails with `NotFound`.
pub fn fetch_records(remote: &dyn Remote, list: &str, source: ListSource) -> SubtlextResult<Vec<Record>> {
    let not_found = || SubtlextError::NotFound(format!("property list {}", list));
    let records = match source {
        ListSource::Windows => {
            remote.root_windows(list)?.unwrap_or_default().into_iter().map(Record::Window).collect()
        }
        ListSource::Names => remote.root_strings(list)?.ok_or_else(not_found)?.into_iter().map(Record::Name).collect(),
        ListSource::Geometries => remote
            .root_strings(list)?
            .ok_or_else(not_found)?
            .into_iter()
            .map(|raw| match raw.parse::<GeometryEntry>() {
                Ok(entry) => Record::Entry(entry),
                Err(err) => {
                    warn!("fetch_records: {}: {}", list, err);
                    Record::Name(raw)
                }
            })
            .collect(),
        ListSource::Workareas => remote
            .root_cardinals(list)?
            .ok_or_else(not_found)?
            .chunks_exact(4)
            .map(|x| Record::Area(Geometry::new(x[0] as i32, x[1] as i32, x[2], x[3])))
            .collect(),
    };
    Ok(records)
}

/// Index of the entry whose name is exactly `name`
pub fn find_exact(remote: &dyn Remote, list: &str, source: ListSource, name: &str) -> SubtlextResult<Option<usize>> {
    let records = match fetch_records(remote, list, source) {
        Ok(records) => records,
        Err(err) if matches!(err.subtlext(), Some(SubtlextError::NotFound(_))) => vec![],
        Err(err) => return Err(err),
    };
    Ok(records.iter().position(|x| x.label().as_deref() == Some(name)))
}

/// Find a named entry or ask subtle to create it. When the new entry doesn't show up right away
/// its id is guessed to be the end of the list.
pub fn save_named(
    remote: &dyn Remote, list: &str, source: ListSource, name: &str, create: &Command,
) -> SubtlextResult<usize> {
    if let Some(id) = find_exact(remote, list, source, name)? {
        return Ok(id);
    }
    remote.send(create)?;
    if let Some(id) = find_exact(remote, list, source, name)? {
        return Ok(id);
    }
    let guess = match fetch_records(remote, list, source) {
        Ok(records) => records.len(),
        Err(_) => 0,
    };
    debug!("save_named: {}: guessing id {} for {}", list, guess, name);
    Ok(guess)
}
