//! Paged browsing and editing of a user's travel history.

use tracing::{debug, info, warn};

use crate::domain::UserId;
use crate::planner::{Notice, NoticeLevel, RequestFailed};
use crate::session::SessionContext;

use super::entry::{HistoryEntry, HistoryLeg, HistoryUpdate};
use super::error::HistoryError;
use super::service::HistoryService;

/// Entries per page. A shorter page is the last one.
pub const PAGE_SIZE: usize = 5;

const MAX_RATING: u8 = 5;

/// The entry being inspected, with its legs and unsaved edits.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySelection {
    pub entry: HistoryEntry,
    pub legs: Vec<HistoryLeg>,
    /// Draft notes, saved only by `HistoryBrowser::save`
    pub notes: String,
    /// Draft rating in 0..=5
    pub rating: u8,
}

/// State behind the history page of one browser session.
#[derive(Debug)]
pub struct HistoryBrowser {
    session: SessionContext,
    page: u32,
    entries: Vec<HistoryEntry>,
    is_last_page: bool,
    selection: Option<HistorySelection>,
    notice: Option<Notice>,
}

impl HistoryBrowser {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            page: 1,
            entries: Vec::new(),
            is_last_page: false,
            selection: None,
            notice: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn is_first_page(&self) -> bool {
        self.page <= 1
    }

    pub fn selection(&self) -> Option<&HistorySelection> {
        self.selection.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn user(&self) -> Result<UserId, HistoryError> {
        self.session.user().ok_or(HistoryError::NotLoggedIn)
    }

    /// Fetch a page of history. Page numbers below 1 load page 1.
    ///
    /// A selected entry stays selected across page changes; if it appears
    /// on the fetched page its stored notes and rating are refreshed, but
    /// unsaved drafts are kept.
    pub async fn load_page(
        &mut self,
        service: &dyn HistoryService,
        page: u32,
    ) -> Result<(), HistoryError> {
        let user = self.user()?;
        let page = page.max(1);

        let entries = service.list_history(&user, page).await?;
        debug!(page, count = entries.len(), "history page loaded");

        self.is_last_page = entries.len() < PAGE_SIZE;
        self.page = page;
        if let Some(selection) = &mut self.selection
            && let Some(fresh) = entries
                .iter()
                .find(|e| e.history_id == selection.entry.history_id)
        {
            selection.entry = fresh.clone();
        }
        self.entries = entries;
        Ok(())
    }

    /// Reload the page currently shown.
    pub async fn refresh(&mut self, service: &dyn HistoryService) -> Result<(), HistoryError> {
        self.load_page(service, self.page).await
    }

    pub async fn next_page(&mut self, service: &dyn HistoryService) -> Result<(), HistoryError> {
        if self.is_last_page {
            return Err(HistoryError::LastPage);
        }
        self.load_page(service, self.page + 1).await
    }

    /// Go back one page; stays on page 1.
    pub async fn previous_page(
        &mut self,
        service: &dyn HistoryService,
    ) -> Result<(), HistoryError> {
        self.load_page(service, self.page.saturating_sub(1)).await
    }

    /// Select an entry from the current page and load its legs.
    ///
    /// The drafts are seeded from the stored entry. If the legs cannot be
    /// fetched the entry stays selected with an empty leg table.
    pub async fn select(
        &mut self,
        service: &dyn HistoryService,
        history_id: i64,
    ) -> Result<(), HistoryError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.history_id == history_id)
            .cloned()
            .ok_or(HistoryError::NoSuchEntry(history_id))?;

        self.notice = None;
        self.selection = Some(HistorySelection {
            notes: entry.notes.clone().unwrap_or_default(),
            rating: entry.stars(),
            entry,
            legs: Vec::new(),
        });

        let legs = service.history_legs(history_id).await?;
        if let Some(selection) = &mut self.selection
            && selection.entry.history_id == history_id
        {
            selection.legs = legs;
        }
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), HistoryError> {
        let selection = self.selection.as_mut().ok_or(HistoryError::NothingSelected)?;
        selection.notes = notes.into();
        Ok(())
    }

    pub fn set_rating(&mut self, rating: u8) -> Result<(), HistoryError> {
        if rating > MAX_RATING {
            return Err(HistoryError::InvalidRating(rating));
        }
        let selection = self.selection.as_mut().ok_or(HistoryError::NothingSelected)?;
        selection.rating = rating;
        Ok(())
    }

    fn fail(&mut self, failure: RequestFailed, fallback: &str) -> HistoryError {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: match &failure.message {
                Some(message) => format!("Error: {message}"),
                None => fallback.to_string(),
            },
        });
        HistoryError::Request(failure)
    }

    /// Store the drafts of the selected entry, then reload the page.
    pub async fn save(&mut self, service: &dyn HistoryService) -> Result<(), HistoryError> {
        let selection = self.selection.as_ref().ok_or(HistoryError::NothingSelected)?;
        let history_id = selection.entry.history_id;
        let update = HistoryUpdate {
            notes: selection.notes.clone(),
            rating: selection.rating,
        };

        if let Err(failure) = service.update_history(history_id, &update).await {
            warn!(history_id, %failure, "history update failed");
            return Err(self.fail(failure, "Error saving changes."));
        }
        info!(history_id, rating = update.rating, "history entry updated");
        self.notice = Some(Notice {
            level: NoticeLevel::Success,
            text: "Trip updated!".to_string(),
        });
        self.refresh(service).await
    }

    /// Delete the selected entry, clear the selection and reload the page.
    pub async fn delete(&mut self, service: &dyn HistoryService) -> Result<(), HistoryError> {
        let history_id = self
            .selection
            .as_ref()
            .ok_or(HistoryError::NothingSelected)?
            .entry
            .history_id;

        if let Err(failure) = service.delete_history(history_id).await {
            warn!(history_id, %failure, "history delete failed");
            return Err(self.fail(failure, "Error deleting trip."));
        }
        info!(history_id, "history entry deleted");
        self.selection = None;
        self.notice = Some(Notice {
            level: NoticeLevel::Success,
            text: "Trip deleted!".to_string(),
        });
        self.refresh(service).await
    }

    /// Forget everything shown, e.g. after logout.
    pub fn clear(&mut self) {
        self.page = 1;
        self.entries.clear();
        self.is_last_page = false;
        self.selection = None;
        self.notice = None;
    }
}
