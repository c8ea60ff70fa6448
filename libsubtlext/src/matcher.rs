//! Match evaluator deciding whether a single candidate satisfies a [`MatchSpec`]
use std::cell::OnceCell;

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::{atoms::names, model::*, remote::Remote, selector::MatchSpec, SubtlextResult};

/// Matcher is the compiled pattern of a match spec, built once per resolution
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Regex(Regex),
}

impl Matcher {
    /// Compile the pattern of the match spec, regular expressions ignore case
    pub fn compile(spec: &MatchSpec) -> SubtlextResult<Self> {
        let pattern = spec.pattern.clone().unwrap_or_default();
        if spec.exact {
            return Ok(Matcher::Exact(pattern));
        }
        Ok(Matcher::Regex(RegexBuilder::new(&pattern).case_insensitive(true).build()?))
    }

    pub fn is_match(&self, field: &str) -> bool {
        match self {
            Matcher::Exact(pattern) => pattern == field,
            Matcher::Regex(regex) => regex.is_match(field),
        }
    }
}

/// Candidate exposes the properties a window can be matched against. Every accessor returns
/// `None` when the property is missing which simply fails that criterion.
pub trait Candidate {
    fn name(&self) -> Option<String>;

    /// Instance and class, fetched together
    fn class_hint(&self) -> (Option<String>, Option<String>);

    fn role(&self) -> Option<String>;

    /// Name of the gravity the window has
    fn gravity(&self) -> Option<String>;

    fn pid(&self) -> Option<u32>;
}

/// Check the criteria in fixed order, the first matching one wins
pub fn matches(matcher: &Matcher, criteria: MatchFlags, candidate: &dyn Candidate) -> bool {
    let hit = |field: Option<String>| field.map_or(false, |x| matcher.is_match(&x));

    if criteria.contains(MatchFlags::NAME) && hit(candidate.name()) {
        return true;
    }
    if criteria.intersects(MatchFlags::INSTANCE | MatchFlags::CLASS) {
        let (instance, class) = candidate.class_hint();
        if criteria.contains(MatchFlags::INSTANCE) && hit(instance) {
            return true;
        }
        if criteria.contains(MatchFlags::CLASS) && hit(class) {
            return true;
        }
    }
    if criteria.contains(MatchFlags::ROLE) && hit(candidate.role()) {
        return true;
    }
    if criteria.contains(MatchFlags::GRAVITY) && hit(candidate.gravity()) {
        return true;
    }
    criteria.contains(MatchFlags::PID) && hit(candidate.pid().map(|x| x.to_string()))
}

/// WindowCandidate reads the properties of a live window lazily
pub struct WindowCandidate<'a> {
    remote: &'a dyn Remote,
    win: WindowId,
    gravities: &'a OnceCell<Vec<String>>,
}

impl<'a> WindowCandidate<'a> {
    /// `gravities` caches the gravity names for the whole scan
    pub fn new(remote: &'a dyn Remote, win: WindowId, gravities: &'a OnceCell<Vec<String>>) -> Self {
        Self { remote, win, gravities }
    }

    // Property errors like a vanished window count as a missing property
    fn fetch<T>(&self, what: &str, res: SubtlextResult<Option<T>>) -> Option<T> {
        res.unwrap_or_else(|err| {
            trace!("candidate: id: {}, {} unavailable: {}", self.win, what, err);
            None
        })
    }
}

impl Candidate for WindowCandidate<'_> {
    fn name(&self) -> Option<String> {
        self.fetch("name", self.remote.window_name(self.win))
    }

    fn class_hint(&self) -> (Option<String>, Option<String>) {
        self.remote.window_class(self.win).unwrap_or_else(|err| {
            trace!("candidate: id: {}, class unavailable: {}", self.win, err);
            (None, None)
        })
    }

    fn role(&self) -> Option<String> {
        self.fetch("role", self.remote.window_role(self.win))
    }

    fn gravity(&self) -> Option<String> {
        let id = self.fetch("gravity", self.remote.cardinal(self.win, names::SUBTLE_CLIENT_GRAVITY))?;
        let gravities = self.gravities.get_or_init(|| {
            self.fetch("gravity list", self.remote.root_strings(names::SUBTLE_GRAVITY_LIST))
                .unwrap_or_default()
                .iter()
                .map(|x| x.parse::<GeometryEntry>().map(|e| e.name).unwrap_or_default())
                .collect()
        });
        gravities.get(id as usize).cloned()
    }

    fn pid(&self) -> Option<u32> {
        self.fetch("pid", self.remote.window_pid(self.win))
    }
}
