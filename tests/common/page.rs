//! In-memory page: host, document and navigator in one recorder

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use minihack::telegram::host::{Document, ElementId, HostEnvironment, Navigator, Popup, PopupHost};
use minihack::telegram::navigation::Route;
use minihack::InitData;

#[derive(Default)]
pub struct FakePage {
    pub init_data: Option<InitData>,
    pub supports_popup: bool,
    pub controls: HashSet<String>,
    pub popups: Mutex<Vec<Popup>>,
    pub alerts: Mutex<Vec<String>>,
    pub redirects: Mutex<Vec<Route>>,
    /// Attached elements: id -> (anchor, text)
    pub elements: Mutex<HashMap<u64, (String, String)>>,
    /// Every element ever attached, in order
    pub attached_log: Mutex<Vec<String>>,
    next_id: Mutex<u64>,
}

impl FakePage {
    pub fn new(init_data: Option<InitData>) -> Self {
        Self {
            init_data,
            supports_popup: true,
            ..Default::default()
        }
    }

    pub fn with_controls(mut self, controls: &[&str]) -> Self {
        self.controls.extend(controls.iter().map(|c| c.to_string()));
        self
    }

    pub fn without_popup(mut self) -> Self {
        self.supports_popup = false;
        self
    }

    pub fn live_elements(&self) -> usize {
        self.elements.lock().unwrap().len()
    }

    pub fn redirects(&self) -> Vec<Route> {
        self.redirects.lock().unwrap().clone()
    }

    pub fn popups(&self) -> Vec<Popup> {
        self.popups.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl PopupHost for FakePage {
    fn show_popup(&self, popup: &Popup) {
        self.popups.lock().unwrap().push(popup.clone());
    }
}

impl HostEnvironment for FakePage {
    fn init_data(&self) -> Option<InitData> {
        self.init_data.clone()
    }

    fn popup(&self) -> Option<&dyn PopupHost> {
        if self.supports_popup {
            Some(self)
        } else {
            None
        }
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

impl Document for FakePage {
    fn has_control(&self, id: &str) -> bool {
        self.controls.contains(id)
    }

    fn attach_text(&self, after: &str, text: &str) -> ElementId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        self.elements
            .lock()
            .unwrap()
            .insert(*next, (after.to_string(), text.to_string()));
        self.attached_log.lock().unwrap().push(text.to_string());
        ElementId(*next)
    }

    fn remove(&self, element: ElementId) {
        self.elements.lock().unwrap().remove(&element.0);
    }
}

impl Navigator for FakePage {
    fn redirect(&self, route: Route) {
        self.redirects.lock().unwrap().push(route);
    }
}
