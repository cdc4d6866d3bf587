//! List/select/edit/delete state machine shared by every entity.
//!
//! ```text
//! Idle ──select──▶ Selected ──begin_edit──▶ Editing(Edit)
//!  │                  │                        │
//!  └──begin_new──▶ Editing(New) ◀──────────────┘
//!                     │ submit ok: refetch, select saved id
//!                     │ submit err: stay, keep error
//!                     └ cancel ──▶ Idle
//! ```
//!
//! Every successful write is followed by a full refetch so server-computed
//! fields (totals, VAT, derived ids) are always current.

use tracing::info;

use crate::error::ObraError;
use crate::models::{Identified, Validate};

/// One backend collection the screen can list and edit.
pub trait Resource {
    type Record: Identified + Clone;
    type Draft: Validate;

    /// Singular noun for messages, e.g. "Contractor".
    const LABEL: &'static str;

    fn list(&self) -> Result<Vec<Self::Record>, ObraError>;
    fn create(&self, draft: &Self::Draft) -> Result<Self::Record, ObraError>;
    fn update(&self, id: i64, draft: &Self::Draft) -> Result<Self::Record, ObraError>;
    fn delete(&self, id: i64) -> Result<(), ObraError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    New,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Selected(i64),
    Editing(EditMode),
}

pub struct CrudScreen<R: Resource> {
    resource: R,
    records: Vec<R::Record>,
    state: ScreenState,
    last_error: Option<String>,
}

impl<R: Resource> CrudScreen<R> {
    /// Load the list and start Idle.
    pub fn open(resource: R) -> Result<Self, ObraError> {
        let records = resource.list()?;
        Ok(Self {
            resource,
            records,
            state: ScreenState::Idle,
            last_error: None,
        })
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R::Record> {
        self.records
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn refresh(&mut self) -> Result<(), ObraError> {
        self.records = self.resource.list()?;
        Ok(())
    }

    pub fn find(&self, id: i64) -> Option<&R::Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn select(&mut self, id: i64) -> Result<&R::Record, ObraError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| ObraError::not_found(R::LABEL, id))?;
        self.state = ScreenState::Selected(id);
        Ok(&self.records[index])
    }

    pub fn selected(&self) -> Option<&R::Record> {
        match self.state {
            ScreenState::Selected(id) | ScreenState::Editing(EditMode::Edit(id)) => self.find(id),
            _ => None,
        }
    }

    pub fn begin_new(&mut self) {
        self.last_error = None;
        self.state = ScreenState::Editing(EditMode::New);
    }

    /// Open the editor on the current selection.
    pub fn begin_edit(&mut self) -> Result<&R::Record, ObraError> {
        let ScreenState::Selected(id) = self.state else {
            return Err(ObraError::validation(format!(
                "Select a {} before editing",
                R::LABEL.to_lowercase()
            )));
        };
        self.last_error = None;
        self.state = ScreenState::Editing(EditMode::Edit(id));
        self.find(id).ok_or_else(|| ObraError::not_found(R::LABEL, id))
    }

    pub fn cancel(&mut self) {
        self.state = ScreenState::Idle;
    }

    /// Validate, write once, refetch. The saved record ends up selected.
    pub fn submit(&mut self, draft: &R::Draft) -> Result<R::Record, ObraError> {
        let ScreenState::Editing(mode) = self.state else {
            return Err(ObraError::validation("Nothing is being edited"));
        };
        match self.write(mode, draft) {
            Ok(saved) => {
                self.last_error = None;
                self.refresh()?;
                self.state = ScreenState::Selected(saved.id());
                info!(id = saved.id(), "{} saved", R::LABEL);
                Ok(self.find(saved.id()).cloned().unwrap_or(saved))
            }
            Err(e) => {
                self.last_error = Some(e.message.clone());
                Err(e)
            }
        }
    }

    fn write(&self, mode: EditMode, draft: &R::Draft) -> Result<R::Record, ObraError> {
        draft.validate()?;
        match mode {
            EditMode::New => self.resource.create(draft),
            EditMode::Edit(id) => self.resource.update(id, draft),
        }
    }

    /// Delete the selected record once `confirm` agrees.
    pub fn delete_selected<F>(&mut self, confirm: F) -> Result<i64, ObraError>
    where
        F: FnOnce(&R::Record) -> bool,
    {
        let record = self
            .selected()
            .cloned()
            .ok_or_else(|| ObraError::validation(format!("Select a {} to delete", R::LABEL.to_lowercase())))?;
        if !confirm(&record) {
            return Err(ObraError::cancelled());
        }
        let id = record.id();
        if let Err(e) = self.resource.delete(id) {
            self.last_error = Some(e.message.clone());
            return Err(e);
        }
        self.refresh()?;
        self.state = ScreenState::Idle;
        self.last_error = None;
        info!(id, "{} deleted", R::LABEL);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::ErrorCode;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: String,
    }

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.id
        }
    }

    struct Name(String);

    impl Validate for Name {
        fn validate(&self) -> Result<(), ObraError> {
            if self.0.is_empty() {
                return Err(ObraError::validation("Name is required"));
            }
            Ok(())
        }
    }

    /// In-memory backend counting calls.
    #[derive(Default)]
    struct Fake {
        rows: RefCell<Vec<Row>>,
        calls: RefCell<Vec<&'static str>>,
        reject_delete: Option<String>,
    }

    impl Resource for &Fake {
        type Record = Row;
        type Draft = Name;
        const LABEL: &'static str = "Row";

        fn list(&self) -> Result<Vec<Row>, ObraError> {
            self.calls.borrow_mut().push("list");
            Ok(self.rows.borrow().clone())
        }

        fn create(&self, draft: &Name) -> Result<Row, ObraError> {
            self.calls.borrow_mut().push("create");
            let row = Row {
                id: self.rows.borrow().len() as i64 + 1,
                name: draft.0.clone(),
            };
            self.rows.borrow_mut().push(row.clone());
            Ok(row)
        }

        fn update(&self, id: i64, draft: &Name) -> Result<Row, ObraError> {
            self.calls.borrow_mut().push("update");
            let mut rows = self.rows.borrow_mut();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| ObraError::not_found("Row", id))?;
            // The server decorates names; the screen must show its version.
            row.name = format!("{} (srv)", draft.0);
            Ok(Row {
                id,
                name: draft.0.clone(),
            })
        }

        fn delete(&self, id: i64) -> Result<(), ObraError> {
            self.calls.borrow_mut().push("delete");
            if let Some(detail) = &self.reject_delete {
                return Err(ObraError::rejected(400, detail.clone()));
            }
            self.rows.borrow_mut().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn seeded() -> Fake {
        let fake = Fake::default();
        fake.rows.borrow_mut().push(Row {
            id: 1,
            name: "uno".into(),
        });
        fake
    }

    #[test]
    fn test_create_refetches_and_selects() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.begin_new();
        let saved = screen.submit(&Name("dos".into())).unwrap();
        assert_eq!(saved.id, 2);
        assert_eq!(screen.state(), ScreenState::Selected(2));
        assert_eq!(screen.records().len(), 2);
        assert_eq!(*fake.calls.borrow(), vec!["list", "create", "list"]);
    }

    #[test]
    fn test_update_shows_refetched_record() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.select(1).unwrap();
        screen.begin_edit().unwrap();
        let saved = screen.submit(&Name("nuevo".into())).unwrap();
        assert_eq!(saved.name, "nuevo (srv)");
        assert_eq!(screen.selected().unwrap().name, "nuevo (srv)");
    }

    #[test]
    fn test_invalid_draft_makes_no_call() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.begin_new();
        let err = screen.submit(&Name(String::new())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(screen.state(), ScreenState::Editing(EditMode::New));
        assert_eq!(screen.last_error(), Some("Name is required"));
        assert_eq!(*fake.calls.borrow(), vec!["list"]);
    }

    #[test]
    fn test_edit_requires_selection() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        assert!(screen.begin_edit().is_err());
        assert_eq!(screen.select(9).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_declined_delete_is_cancelled() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.select(1).unwrap();
        let err = screen.delete_selected(|_| false).unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
        assert_eq!(screen.state(), ScreenState::Selected(1));
        assert!(!fake.calls.borrow().contains(&"delete"));
    }

    #[test]
    fn test_delete_refetches_and_goes_idle() {
        let fake = seeded();
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.select(1).unwrap();
        assert_eq!(screen.delete_selected(|_| true).unwrap(), 1);
        assert!(screen.records().is_empty());
        assert_eq!(screen.state(), ScreenState::Idle);
    }

    #[test]
    fn test_rejected_delete_keeps_detail() {
        let mut fake = seeded();
        fake.reject_delete = Some("En uso por un contrato".into());
        let mut screen = CrudScreen::open(&fake).unwrap();
        screen.select(1).unwrap();
        let err = screen.delete_selected(|_| true).unwrap_err();
        assert_eq!(err.message, "En uso por un contrato");
        assert_eq!(screen.last_error(), Some("En uso por un contrato"));
        assert_eq!(screen.records().len(), 1);
    }
}
