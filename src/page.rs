//! Page model - the rendered wallet page the poll loops patch
//!
//! Elements are addressed the way the server's templates address them: by
//! class (many elements) or by id (one element). The loops never own the page;
//! they lock it, patch it and release it between requests.

use crate::constants::*;
use crate::types::{FormSubmission, Screen};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, MutexGuard};

pub type SharedPage = Arc<Mutex<Page>>;

/// Lock the shared page, recovering from a poisoned lock.
pub fn lock(page: &SharedPage) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Button,
    /// Carries state in its class name, never drawn
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub class_name: String,
    pub label: &'static str,
    pub kind: ElementKind,
    pub text: String,
    pub value: String,
}

impl Element {
    fn new(kind: ElementKind, label: &'static str, class_name: &str) -> Self {
        Self {
            id: None,
            class_name: class_name.to_string(),
            label,
            kind,
            text: String::new(),
            value: String::new(),
        }
    }

    pub fn text(label: &'static str, class_name: &str) -> Self {
        Self::new(ElementKind::Text, label, class_name)
    }

    pub fn button(label: &'static str, class_name: &str) -> Self {
        Self::new(ElementKind::Button, label, class_name)
    }

    pub fn marker(class_name: &str) -> Self {
        Self::new(ElementKind::Marker, "", class_name)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    /// Classes after the first one, e.g. the color tag of `status blue`.
    pub fn modifiers(&self) -> impl Iterator<Item = &str> {
        self.class_name.split_whitespace().skip(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub name: String,
    pub action: String,
}

impl Form {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            action: "/".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Page {
    pub screen: Option<Screen>,
    pub elements: Vec<Element>,
    pub forms: Vec<Form>,
    pub shutdown: bool,
    pub last_updated: Option<DateTime<Local>>,
    submissions: Vec<FormSubmission>,
}

impl Page {
    /// Build the layout the server renders for `screen`.
    pub fn for_screen(screen: Screen) -> Self {
        let mut page = Self::default();
        page.load(screen);
        page
    }

    /// Replace the layout with a fresh template, as a reload would.
    /// A shut down page stays shut down.
    pub fn load(&mut self, screen: Screen) {
        if self.shutdown {
            return;
        }
        self.screen = Some(screen);
        self.forms.clear();
        self.elements = match screen {
            Screen::Bootstrapper => {
                self.forms.push(Form::new(FORM_REFRESH_BOOTSTRAPPER));
                vec![Element::text("Bootstrapping consensus", CLASS_BOOTSTRAPPER_PROGRESS)]
            }
            Screen::ConsensusBuilder => {
                self.forms.push(Form::new(FORM_REFRESH_CONSENSUS_BUILDER));
                vec![Element::text(
                    "Building consensus",
                    CLASS_CONSENSUS_BUILDER_PROGRESS,
                )]
            }
            Screen::Wallet { last_page } => {
                self.forms.push(Form::new(FORM_REFRESH));
                self.forms.push(Form::new(FORM_REFRESH_TRANSACTIONS));
                vec![
                    Element::text("Block height", CLASS_BLOCK_HEIGHT),
                    Element::text("Status", CLASS_STATUS),
                    Element::marker("").with_id(ID_BALANCE),
                    Element::text("Confirmed SCP", CLASS_CONFIRMED),
                    Element::text("Unconfirmed SCP", CLASS_UNCONFIRMED),
                    Element::text("SPF funds", CLASS_SPF_FUNDS),
                    Element::text("", "").with_id(ID_WHALE_SIZE),
                    Element::button("", "").with_id(ID_WHALE_SIZE_BUTTON),
                    Element::marker(if last_page { "true" } else { "false" })
                        .with_id(ID_IS_LAST_PAGE),
                ]
            }
        };
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.elements.iter().any(|e| e.has_class(class))
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn elements_by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    pub fn set_text_by_class(&mut self, class: &str, text: &str) {
        for element in self.elements.iter_mut().filter(|e| e.has_class(class)) {
            element.text = text.to_string();
        }
    }

    /// Overwrite the whole class name of every element carrying `class`.
    pub fn set_class_name_by_class(&mut self, class: &str, class_name: &str) {
        for element in self.elements.iter_mut().filter(|e| e.has_class(class)) {
            element.class_name = class_name.to_string();
        }
    }

    pub fn set_text_by_id(&mut self, id: &str, text: &str) {
        if let Some(element) = self.element_by_id_mut(id) {
            element.text = text.to_string();
        }
    }

    pub fn set_value_by_id(&mut self, id: &str, value: &str) {
        if let Some(element) = self.element_by_id_mut(id) {
            element.value = value.to_string();
        }
    }

    /// The transaction history shows its last page when the marker says so.
    pub fn is_last_page(&self) -> bool {
        self.element_by_id(ID_IS_LAST_PAGE)
            .is_some_and(|e| e.class_name == "true")
    }

    /// Queue a form submission. Returns false when the form is not on the page.
    pub fn submit_form(&mut self, name: &str) -> bool {
        let Some(form) = self.forms.iter().find(|f| f.name == name) else {
            return false;
        };
        self.submissions.push(FormSubmission {
            form: form.name.clone(),
            action: form.action.clone(),
        });
        true
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.submissions)
    }

    /// Replace the body with the shutdown notice. Terminal.
    pub fn render_shutdown_notice(&mut self) {
        self.shutdown = true;
        self.elements.clear();
        self.forms.clear();
        self.submissions.clear();
    }

    pub fn touch(&mut self) {
        self.last_updated = Some(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(last_page: bool) -> Page {
        Page::for_screen(Screen::Wallet { last_page })
    }

    #[test]
    fn wallet_template_carries_balance_selectors() {
        let page = wallet(true);
        assert!(page.has_class(CLASS_BLOCK_HEIGHT));
        assert!(page.has_class(CLASS_UNCONFIRMED));
        assert!(page.element_by_id(ID_BALANCE).is_some());
        assert!(page.element_by_id(ID_WHALE_SIZE_BUTTON).is_some());
        assert!(!page.has_class(CLASS_BOOTSTRAPPER_PROGRESS));
        assert!(page.is_last_page());
        assert!(!wallet(false).is_last_page());
    }

    #[test]
    fn class_name_swap_keeps_class_addressable() {
        let mut page = wallet(true);
        page.set_class_name_by_class(CLASS_STATUS, "status blue");
        page.set_class_name_by_class(CLASS_STATUS, "status yellow");
        let status: Vec<_> = page.elements_by_class(CLASS_STATUS).collect();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].modifiers().collect::<Vec<_>>(), vec!["yellow"]);
    }

    #[test]
    fn submit_requires_form_on_page() {
        let mut page = Page::for_screen(Screen::Bootstrapper);
        assert!(!page.submit_form(FORM_REFRESH));
        assert!(page.submit_form(FORM_REFRESH_BOOTSTRAPPER));
        let queued = page.take_submissions();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].form, FORM_REFRESH_BOOTSTRAPPER);
        assert_eq!(queued[0].action, "/");
        assert!(page.take_submissions().is_empty());
    }

    #[test]
    fn shutdown_clears_body_and_survives_reload() {
        let mut page = wallet(true);
        page.submit_form(FORM_REFRESH);
        page.render_shutdown_notice();
        assert!(page.shutdown);
        assert!(page.elements.is_empty());
        assert!(page.take_submissions().is_empty());

        page.load(Screen::Bootstrapper);
        assert!(page.elements.is_empty());
        assert!(!page.has_class(CLASS_BOOTSTRAPPER_PROGRESS));
    }
}
