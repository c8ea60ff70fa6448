//! Selector parser turning the different ways of naming an entity into a canonical [`MatchSpec`].
//!
//! A selector is one of
//! * an index into the entity list,
//! * a pattern that is matched as a regular expression,
//! * a symbol that is matched exactly or names one of the keywords `all`, `visible` or `current`,
//! * a criteria map where the first known key with a value picks the property to match against,
//! * an already resolved entity.
//!
//! Text that starts with a digit is taken as an index (and as a window id for window lists)
//! rather than as a pattern, so a name starting with a digit can't be matched by pattern.
use std::{convert::TryFrom, str::FromStr};

use crate::{model::*, SubtlextError, SubtlextResult};

/// Token that asks for interactive window selection
pub const INTERACTIVE: &str = "#";

/// Selector is the user facing way to name one or more entities
#[derive(Debug, Clone, PartialEq)]
pub enum Selector<E> {
    Index(usize),
    Pattern(String),
    Symbol(String),
    Criteria(Vec<(String, Option<String>)>),
    Entity(E),
}

impl<E> Selector<E> {
    /// Exact name or one of the keywords
    pub fn symbol<T: Into<String>>(name: T) -> Self {
        Selector::Symbol(name.into())
    }

    /// Criteria map, pairs keep their order
    ///
    /// ### Examples
    /// ```ignore
    /// use libsubtlext::prelude::*;
    /// let sel: Selector<Client> = Selector::criteria([("instance", Some("xterm"))]);
    /// ```
    pub fn criteria<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        Selector::Criteria(pairs.into_iter().map(|(k, v)| (k.into(), v.map(Into::into))).collect())
    }

    pub fn all() -> Self {
        Selector::symbol("all")
    }

    pub fn visible() -> Self {
        Selector::symbol("visible")
    }

    pub fn current() -> Self {
        Selector::symbol("current")
    }
}

impl<E> From<usize> for Selector<E> {
    fn from(val: usize) -> Self {
        Selector::Index(val)
    }
}

impl<E> From<&str> for Selector<E> {
    fn from(val: &str) -> Self {
        Selector::Pattern(val.to_owned())
    }
}

impl<E> From<String> for Selector<E> {
    fn from(val: String) -> Self {
        Selector::Pattern(val)
    }
}

/// Parse command line text: `42` is an index, `:name` a symbol, `key=value` a criteria map with a
/// known key, anything else a pattern
impl<E> FromStr for Selector<E> {
    type Err = SubtlextError;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        if val.is_empty() {
            return Err(SubtlextError::InvalidArgument("empty selector".to_owned()));
        }
        if let Some(symbol) = val.strip_prefix(':') {
            return Ok(Selector::symbol(symbol));
        }
        if val.bytes().all(|x| x.is_ascii_digit()) {
            if let Ok(index) = val.parse::<usize>() {
                return Ok(Selector::Index(index));
            }
        }
        if let Some((key, value)) = val.split_once('=') {
            if MatchFlags::from_key(key).is_some() {
                return Ok(Selector::criteria([(key, Some(value))]));
            }
        }
        Ok(Selector::Pattern(val.to_owned()))
    }
}

/// Target is how the resolver picks entries from the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Position in the list
    Index(usize),

    /// Digit prefixed text, position in the list or window id
    Id(usize),

    /// Window id given as hex text
    Window(WindowId),

    /// Window picked by the user with the pointer
    Interactive,

    /// Pattern match against the entry
    Pattern,

    /// Bulk accessor of the entity kind
    Keyword(Keyword),
}

/// MatchSpec is the normalized form of a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpec {
    pub exact: bool,
    pub criteria: MatchFlags,
    pub pattern: Option<String>,
    pub target: Target,
}

impl MatchSpec {
    fn new(exact: bool, criteria: MatchFlags, pattern: Option<String>, target: Target) -> Self {
        Self { exact, criteria, pattern, target }
    }
}

/// Outcome of parsing a selector
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<E> {
    Spec(MatchSpec),
    Entity(E),
}

/// Normalize a selector, criteria maps are only accepted when `allow_criteria` is set
pub fn parse<E>(selector: Selector<E>, allow_criteria: bool) -> SubtlextResult<Parsed<E>> {
    let spec = match selector {
        Selector::Entity(entity) => return Ok(Parsed::Entity(entity)),
        Selector::Index(index) => MatchSpec::new(false, MatchFlags::default(), None, Target::Index(index)),
        Selector::Pattern(pattern) => {
            let target = text_target(&pattern);
            MatchSpec::new(false, MatchFlags::default(), Some(pattern), target)
        }
        Selector::Symbol(symbol) => match Keyword::try_from(symbol.as_str()) {
            Ok(keyword) => MatchSpec::new(true, MatchFlags::default(), None, Target::Keyword(keyword)),
            Err(_) => {
                let target = text_target(&symbol);
                MatchSpec::new(true, MatchFlags::default(), Some(symbol), target)
            }
        },
        Selector::Criteria(pairs) => {
            if !allow_criteria {
                return Err(SubtlextError::InvalidArgument("criteria map is not supported here".to_owned()).into());
            }

            // First known key with a value wins, everything after it is ignored
            let (criteria, pattern) = pairs
                .into_iter()
                .find_map(|(key, value)| Some((MatchFlags::from_key(&key)?, value?)))
                .ok_or_else(|| SubtlextError::InvalidArgument("criteria map has no known key".to_owned()))?;
            MatchSpec::new(false, criteria, Some(pattern), Target::Pattern)
        }
    };
    Ok(Parsed::Spec(spec))
}

// Decide how text picks entries
fn text_target(text: &str) -> Target {
    if text == INTERACTIVE {
        return Target::Interactive;
    }
    if let Some(hex) = text.strip_prefix("0x") {
        if let Ok(win) = WindowId::from_str_radix(hex, 16) {
            return Target::Window(win);
        }
    }
    let digits: String = text.chars().take_while(|x| x.is_ascii_digit()).collect();
    match digits.parse::<usize>() {
        Ok(id) => Target::Id(id),
        Err(_) => Target::Pattern,
    }
}
