//! In-memory remote used by the unit tests
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use crate::{command::Command, model::*, remote::Remote, SubtlextError, SubtlextResult};

pub const ROOT: WindowId = 1;

#[derive(Debug, Clone)]
enum Prop {
    Cardinals(Vec<u32>),
    Windows(Vec<WindowId>),
    Strings(Vec<String>),
}

#[derive(Default)]
pub struct MockRemote {
    props: RefCell<HashMap<(WindowId, String), Prop>>,
    sent: RefCell<Vec<Command>>,
    selection: Option<WindowId>,
    pointer: (i32, i32),
    geometries: HashMap<WindowId, Geometry>,
    gone: HashSet<(WindowId, Option<String>)>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, win: WindowId, name: &str, prop: Prop) {
        self.props.borrow_mut().insert((win, name.to_owned()), prop);
    }

    pub fn with_strings(self, win: WindowId, name: &str, values: &[&str]) -> Self {
        self.set(win, name, Prop::Strings(values.iter().map(|x| x.to_string()).collect()));
        self
    }

    pub fn with_cardinals(self, win: WindowId, name: &str, values: &[u32]) -> Self {
        self.set(win, name, Prop::Cardinals(values.to_vec()));
        self
    }

    pub fn with_windows(self, win: WindowId, name: &str, values: &[WindowId]) -> Self {
        self.set(win, name, Prop::Windows(values.to_vec()));
        self
    }

    pub fn with_geometry(mut self, win: WindowId, geom: Geometry) -> Self {
        self.geometries.insert(win, geom);
        self
    }

    pub fn with_selection(mut self, win: WindowId) -> Self {
        self.selection = Some(win);
        self
    }

    pub fn with_pointer(mut self, x: i32, y: i32) -> Self {
        self.pointer = (x, y);
        self
    }

    /// Destroy the window, every property read on it fails like on a real server
    pub fn with_gone(mut self, win: WindowId) -> Self {
        self.gone.insert((win, None));
        self.geometries.remove(&win);
        self
    }

    /// Let the window disappear right before the given property is read
    pub fn with_vanishing(mut self, win: WindowId, name: &str) -> Self {
        self.gone.insert((win, Some(name.to_owned())));
        self
    }

    fn check(&self, win: WindowId, name: &str) -> SubtlextResult<()> {
        if self.gone.contains(&(win, None)) || self.gone.contains(&(win, Some(name.to_owned()))) {
            return Err(SubtlextError::WindowGone(win).into());
        }
        Ok(())
    }

    /// Add a client window with `WM_CLASS` and a name and append it to `_NET_CLIENT_LIST`
    pub fn with_client(self, win: WindowId, name: &str, instance: &str, class: &str) -> Self {
        let mut clients = self.windows(ROOT, "_NET_CLIENT_LIST").unwrap_or_default().unwrap_or_default();
        clients.push(win);
        self.with_windows(ROOT, "_NET_CLIENT_LIST", &clients)
            .with_strings(win, "_NET_WM_NAME", &[name])
            .with_strings(win, "WM_CLASS", &[instance, class])
            .with_geometry(win, Geometry::new(0, 0, 100, 100))
    }

    /// Every command sent so far
    pub fn sent(&self) -> Vec<Command> {
        self.sent.borrow().clone()
    }
}

impl Remote for MockRemote {
    fn root(&self) -> WindowId {
        ROOT
    }

    fn display_name(&self) -> String {
        ":mock".to_owned()
    }

    fn cardinals(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<u32>>> {
        self.check(win, name)?;
        Ok(match self.props.borrow().get(&(win, name.to_owned())) {
            Some(Prop::Cardinals(values)) => Some(values.clone()),
            _ => None,
        })
    }

    fn windows(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<WindowId>>> {
        self.check(win, name)?;
        Ok(match self.props.borrow().get(&(win, name.to_owned())) {
            Some(Prop::Windows(values)) => Some(values.clone()),
            _ => None,
        })
    }

    fn strings(&self, win: WindowId, name: &str) -> SubtlextResult<Option<Vec<String>>> {
        self.check(win, name)?;
        Ok(match self.props.borrow().get(&(win, name.to_owned())) {
            Some(Prop::Strings(values)) => Some(values.clone()),
            _ => None,
        })
    }

    fn set_strings(&self, win: WindowId, name: &str, values: &[String]) -> SubtlextResult<()> {
        self.set(win, name, Prop::Strings(values.to_vec()));
        Ok(())
    }

    fn delete_property(&self, win: WindowId, name: &str) -> SubtlextResult<()> {
        self.props.borrow_mut().remove(&(win, name.to_owned()));
        Ok(())
    }

    fn send(&self, command: &Command) -> SubtlextResult<()> {
        self.sent.borrow_mut().push(command.clone());
        Ok(())
    }

    fn select_window(&self) -> SubtlextResult<Option<WindowId>> {
        Ok(self.selection)
    }

    fn pointer(&self) -> SubtlextResult<(i32, i32)> {
        Ok(self.pointer)
    }

    fn geometry(&self, win: WindowId) -> SubtlextResult<Option<Geometry>> {
        Ok(self.geometries.get(&win).copied())
    }
}
