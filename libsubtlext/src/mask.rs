//! Tag mask codec. Clients and views carry a bitmask of the tags they have where tag index `i`
//! is bit `i + 1`, bit 0 is never used. Masks are always re-read from subtle before they are
//! changed and the whole mask is sent back, never a delta.
use std::fmt;

use tracing::debug;

use crate::{
    atoms::names,
    command::{Command, TagOwner},
    remote::Remote,
    resolver::{self, Entity, Mode, Resolution},
    selector::Selector,
    tag::Tag,
    SubtlextError, SubtlextResult,
};

/// TagMask is a set of tag indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagMask(u32);

impl TagMask {
    pub const EMPTY: TagMask = TagMask(0);

    pub fn from_bits(bits: u32) -> Self {
        TagMask(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Mask with only the given tag index set, `None` if the index doesn't fit
    pub fn for_index(index: usize) -> Option<Self> {
        let shift = u32::try_from(index).ok()?.checked_add(1)?;
        1u32.checked_shl(shift).map(TagMask)
    }

    pub fn contains(self, index: usize) -> bool {
        TagMask::for_index(index).map_or(false, |x| self.intersects(x))
    }

    pub fn intersects(self, other: TagMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: TagMask) -> Self {
        TagMask(self.0 | other.0)
    }

    pub fn difference(self, other: TagMask) -> Self {
        TagMask(self.0 & !other.0)
    }

    /// Tag indices set in the mask in ascending order
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..31).filter(move |x| self.contains(*x))
    }
}

impl fmt::Display for TagMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

/// How requested tags are combined with the existing mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskAction {
    Replace,
    Add,
    Remove,
}

/// Combine the existing mask with the requested one
pub fn compute_mask(existing: TagMask, requested: TagMask, action: MaskAction) -> TagMask {
    match action {
        MaskAction::Replace => requested,
        MaskAction::Add => existing.union(requested),
        MaskAction::Remove => existing.difference(requested),
    }
}

/// Resolve every tag to its bit. Names are matched exactly and digits pick the tag at that index,
/// a single unknown tag fails the whole lot with `TagNotFound`.
pub fn tag_bits(remote: &dyn Remote, tags: Vec<Selector<Tag>>) -> SubtlextResult<TagMask> {
    let mut mask = TagMask::EMPTY;
    for selector in tags {
        let (label, selector) = match selector {
            Selector::Pattern(name) | Selector::Symbol(name) => (name.clone(), Selector::Symbol(name)),
            Selector::Index(index) => (index.to_string(), Selector::Index(index)),
            Selector::Entity(tag) => (tag.name.clone(), Selector::Entity(tag)),
            Selector::Criteria(_) => {
                return Err(SubtlextError::InvalidArgument("tags can't be given as criteria map".to_owned()).into())
            }
        };
        let found = match resolver::resolve::<Tag>(remote, selector, Mode::First) {
            Ok(found) => found,
            Err(err) if matches!(err.subtlext(), Some(SubtlextError::NotFound(_))) => Resolution::None,
            Err(err) => return Err(err),
        };
        if found.is_empty() {
            return Err(SubtlextError::TagNotFound(label).into());
        }
        for tag in found {
            let bit = tag.live_id().and_then(TagMask::for_index).ok_or_else(|| SubtlextError::TagNotFound(label.clone()))?;
            mask = mask.union(bit);
        }
    }
    Ok(mask)
}

/// Current mask of the owner as subtle sees it
pub fn current_mask(remote: &dyn Remote, owner: TagOwner) -> SubtlextResult<TagMask> {
    let bits = match owner {
        TagOwner::Client(win) => remote.cardinal(win, names::SUBTLE_CLIENT_TAGS)?,
        TagOwner::View(id) => remote.root_cardinals(names::SUBTLE_VIEW_TAGS)?.and_then(|x| x.get(id).copied()),
    };
    Ok(TagMask::from_bits(bits.unwrap_or(0)))
}

/// Tags for the set bits of a mask, in list order
pub fn tags_for_mask(names: &[String], mask: TagMask) -> Vec<Tag> {
    mask.indices().filter_map(|i| names.get(i).map(|name| Tag::resolved(i, name.clone()))).collect()
}

/// Tags the owner currently has
pub fn tags_of(remote: &dyn Remote, owner: TagOwner) -> SubtlextResult<Vec<Tag>> {
    let mask = current_mask(remote, owner)?;
    let names = remote.root_strings(Tag::LIST)?.unwrap_or_default();
    Ok(tags_for_mask(&names, mask))
}

/// Resolve the tags, combine them with the owner's mask and send the result
pub fn update_tags(
    remote: &dyn Remote, owner: TagOwner, tags: Vec<Selector<Tag>>, action: MaskAction,
) -> SubtlextResult<TagMask> {
    let requested = tag_bits(remote, tags)?;
    let existing = match action {
        MaskAction::Replace => TagMask::EMPTY,
        _ => current_mask(remote, owner)?,
    };
    let mask = compute_mask(existing, requested, action);
    remote.send(&Command::set_tags(owner, mask))?;
    debug!("update_tags: owner: {:?}, action: {:?}, old: {}, new: {}", owner, action, existing, mask);
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;

    fn remote() -> MockRemote {
        MockRemote::new()
            .with_strings(ROOT, "SUBTLE_TAG_LIST", &["work", "web", "term"])
            .with_cardinals(5, "SUBTLE_CLIENT_TAGS", &[0b1010])
            .with_cardinals(ROOT, "SUBTLE_VIEW_TAGS", &[0b10, 0b110])
    }

    #[test]
    fn test_bit_convention() {
        assert_eq!(TagMask::for_index(0), Some(TagMask::from_bits(0b10)));
        assert_eq!(TagMask::for_index(2), Some(TagMask::from_bits(0b1000)));
        assert_eq!(TagMask::for_index(30), Some(TagMask::from_bits(1 << 31)));
        assert_eq!(TagMask::for_index(31), None);
        assert_eq!(TagMask::from_bits(0b1010).indices().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!TagMask::from_bits(0b1).contains(0));
    }

    #[test]
    fn test_add_remove_round_trip() {
        for bits in [0u32, 0b10, 0b1010, 0b11110, 0xfffffffe, 0b100000] {
            for index in 0..31 {
                let m = TagMask::from_bits(bits);
                let t = TagMask::for_index(index).unwrap();
                if m.intersects(t) {
                    continue;
                }
                let added = compute_mask(m, t, MaskAction::Add);
                assert_eq!(compute_mask(added, t, MaskAction::Remove), m);
            }
        }
    }

    #[test]
    fn test_replace_ignores_existing() {
        let existing = TagMask::from_bits(0b1110);
        assert_eq!(compute_mask(existing, TagMask::from_bits(0b10), MaskAction::Replace), TagMask::from_bits(0b10));
        assert_eq!(compute_mask(existing, TagMask::EMPTY, MaskAction::Replace), TagMask::EMPTY);
    }

    #[test]
    fn test_tags_for_mask() {
        let names: Vec<String> = ["work", "web", "term"].iter().map(|x| x.to_string()).collect();
        let tags = tags_for_mask(&names, TagMask::from_bits(0b1010));
        assert_eq!(tags.iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["work", "term"]);
        assert_eq!(tags[1].id(), Some(2));
    }

    #[test]
    fn test_unknown_tag_sends_nothing() {
        let remote = remote();
        let tags = vec![Selector::from("web"), Selector::from("nope")];
        let err = update_tags(&remote, TagOwner::Client(5), tags, MaskAction::Replace).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::TagNotFound("nope".to_owned())));
        assert!(remote.sent().is_empty());
    }

    #[test]
    fn test_tag_names_are_exact() {
        let remote = remote();
        let err = tag_bits(&remote, vec![Selector::from("wor")]).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::TagNotFound(_))));

        let err = tag_bits(&remote, vec![Selector::Entity(Tag::new("work"))]).unwrap_err();
        assert!(matches!(err.subtlext(), Some(SubtlextError::TagNotFound(_))));

        let mask = tag_bits(&remote, vec![Selector::symbol("term"), Selector::Index(1)]).unwrap();
        assert_eq!(mask, TagMask::from_bits(0b1100));
    }

    #[test]
    fn test_digit_tag_names_are_indices() {
        let remote = remote();
        assert_eq!(tag_bits(&remote, vec![Selector::symbol("2")]).unwrap(), TagMask::from_bits(0b1000));
        assert_eq!(tag_bits(&remote, vec![Selector::from("0")]).unwrap(), TagMask::from_bits(0b10));
        let err = tag_bits(&remote, vec![Selector::symbol("7")]).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::TagNotFound("7".to_owned())));
    }

    #[test]
    fn test_tag_entities_and_missing_list() {
        let remote = remote();
        let term = Tag::find(&remote, "term").unwrap().unwrap();
        assert_eq!(tag_bits(&remote, vec![Selector::Entity(term)]).unwrap(), TagMask::from_bits(0b1000));
        let err = tag_bits(&MockRemote::new(), vec![Selector::from("term")]).unwrap_err();
        assert_eq!(err.subtlext(), Some(&SubtlextError::TagNotFound("term".to_owned())));
    }

    #[test]
    fn test_add_uses_remote_mask() {
        let remote = remote();
        let mask = update_tags(&remote, TagOwner::Client(5), vec![Selector::from("web")], MaskAction::Add).unwrap();
        assert_eq!(mask, TagMask::from_bits(0b1110));
        assert_eq!(remote.sent(), vec![Command::set_tags(TagOwner::Client(5), TagMask::from_bits(0b1110))]);

        let mask = update_tags(&remote, TagOwner::View(1), vec![Selector::from("web")], MaskAction::Remove).unwrap();
        assert_eq!(mask, TagMask::from_bits(0b10));
    }

    #[test]
    fn test_replace_with_nothing_clears() {
        let remote = remote();
        let mask = update_tags(&remote, TagOwner::Client(5), vec![], MaskAction::Replace).unwrap();
        assert_eq!(mask, TagMask::EMPTY);
        assert_eq!(remote.sent().len(), 1);
    }

    #[test]
    fn test_tags_of() {
        let remote = remote();
        let tags = tags_of(&remote, TagOwner::Client(5)).unwrap();
        assert_eq!(tags.iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["work", "term"]);
        let tags = tags_of(&remote, TagOwner::View(0)).unwrap();
        assert_eq!(tags.iter().map(|x| x.name.as_str()).collect::<Vec<_>>(), vec!["work"]);
        assert!(tags_of(&remote, TagOwner::Client(99)).unwrap().is_empty());
    }
}
