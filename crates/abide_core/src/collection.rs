//! Generic controller over one store-backed collection.
//!
//! A [`CollectionController`] owns a [`Binding`] of a collection key plus the
//! view state a list page needs: search text, status filter, sort order,
//! multi-select and a staged deletion.
//!
//! ```text
//! save / confirm_delete → new Vec<T> → Binding::try_set → Store::write
//!                                   ↘ DerivedState hook (tracker, points, ...)
//! ```
//!
//! The key is read through [`RecordList`]: stored items that no longer
//! deserialize as `T` are left out of the records but written back untouched.
//!
//! The view ([`CollectionController::view`]) is recomputed from the raw
//! collection on every call and never touches stored data.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::bridge::{Binding, BindingOptions};
use crate::date::is_iso_date;
use crate::error::{AbideError, Result};
use crate::model::{Comment, Commentable, InsertPolicy, Likeable, Record, RecordList};
use crate::store::{Store, StoreKey};

/// Per-collection side effects of saving and deleting records.
///
/// Every method has a no-op default.
pub trait DerivedState<T: Record>: Send + Sync {
    /// Adjust a record before it is stored.
    fn before_save(&self, record: T) -> T {
        record
    }

    /// Called after `saved` was stored. `previous` is the replaced version, if
    /// any; `records` is the full collection after the save.
    fn after_save(
        &self,
        _store: &Store,
        _previous: Option<&T>,
        _saved: &T,
        _records: &[T],
    ) -> Result<()> {
        Ok(())
    }

    /// Called after `deleted` were removed; `remaining` is what is left.
    fn after_delete(&self, _store: &Store, _deleted: &[T], _remaining: &[T]) -> Result<()> {
        Ok(())
    }
}

/// Collections with no derived state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDerivedState;

impl<T: Record> DerivedState<T> for NoDerivedState {}

/// Date sort direction of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Desc,
    /// Oldest first.
    Asc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Desc => Self::Asc,
            Self::Asc => Self::Desc,
        }
    }
}

/// Search text, status filter and sort order of a list view.
#[derive(Debug, Clone, Default)]
pub struct ViewState<F> {
    /// Case-insensitive search text; empty matches everything.
    pub search: String,
    /// Status filter.
    pub filter: F,
    /// Date sort direction.
    pub sort: SortOrder,
}

/// Filter and sort `records` for display.
///
/// Dates are compared as strings, which orders zero-padded `YYYY-MM-DD`
/// dates chronologically. Records with equal dates keep their stored order.
pub fn derive_view<T: Record>(records: &[T], state: &ViewState<T::Filter>) -> Vec<T> {
    let needle = state.search.trim().to_lowercase();
    let mut view: Vec<T> = records
        .iter()
        .filter(|r| r.matches_filter(&state.filter))
        .filter(|r| needle.is_empty() || r.matches_search(&needle))
        .cloned()
        .collect();
    match state.sort {
        SortOrder::Desc => view.sort_by(|a, b| b.sort_date().cmp(a.sort_date())),
        SortOrder::Asc => view.sort_by(|a, b| a.sort_date().cmp(b.sort_date())),
    }
    view
}

/// Insert or replace `record` in `records` according to its insert policy.
///
/// Returns the replaced record, if any.
pub fn upsert<T: Record>(records: &mut Vec<T>, record: T) -> Option<T> {
    if let Some(existing) = records.iter_mut().find(|r| r.id() == record.id()) {
        return Some(std::mem::replace(existing, record));
    }
    match T::INSERT_POLICY {
        InsertPolicy::Append | InsertPolicy::AppendSorted => records.push(record),
        InsertPolicy::Prepend | InsertPolicy::PrependSorted => records.insert(0, record),
    }
    if T::INSERT_POLICY.resorts() {
        records.sort_by(|a, b| b.sort_date().cmp(a.sort_date()));
    }
    None
}

/// List controller over one collection key.
pub struct CollectionController<T: Record, H: DerivedState<T> = NoDerivedState> {
    records: Binding<RecordList<T>>,
    hook: H,
    view: ViewState<T::Filter>,
    select_mode: bool,
    selected: IndexSet<String>,
    pending_delete: IndexSet<String>,
}

impl<T: Record> CollectionController<T> {
    /// Open a controller with no derived state.
    pub fn open(store: &Store, key: StoreKey<Vec<T>>, options: BindingOptions) -> Self {
        Self::with_hook(store, key, options, NoDerivedState)
    }
}

impl<T: Record, H: DerivedState<T>> CollectionController<T, H> {
    /// Open a controller whose saves and deletes run `hook`.
    pub fn with_hook(
        store: &Store,
        key: StoreKey<Vec<T>>,
        options: BindingOptions,
        hook: H,
    ) -> Self {
        Self {
            records: Binding::open_with(
                store,
                RecordList::key(key),
                RecordList::default(),
                options,
            ),
            hook,
            view: ViewState::default(),
            select_mode: false,
            selected: IndexSet::new(),
            pending_delete: IndexSet::new(),
        }
    }

    /// The stored collection, in stored order.
    pub fn records(&self) -> Vec<T> {
        self.records.with(|list| list.records().to_vec())
    }

    /// Number of readable stored records.
    pub fn len(&self) -> usize {
        self.records.with(|list| list.records().len())
    }

    /// Number of stored items that could not be read as records.
    pub fn unreadable_count(&self) -> usize {
        self.records.with(|list| list.unreadable().len())
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<T> {
        self.records
            .with(|list| list.records().iter().find(|r| r.id() == id).cloned())
    }

    /// The store the collection lives in.
    pub fn store(&self) -> &Store {
        self.records.store()
    }

    /// The derived-state hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }

    fn not_found(&self, id: &str) -> AbideError {
        AbideError::NotFound {
            key: self.records.key().name().to_string(),
            id: id.to_string(),
        }
    }

    /// Write `records` back, keeping the unreadable items.
    fn store_records(&self, records: Vec<T>) -> Result<()> {
        let list = self.records.with(|list| list.with_records(records));
        self.records.try_set(list)
    }

    /// Replace the record with the same id, or insert it per the record's
    /// insert policy, then run the derived-state hook.
    ///
    /// A non-empty date must be `YYYY-MM-DD`.
    pub fn save(&mut self, record: T) -> Result<()> {
        let record = self.hook.before_save(record);
        let date = record.sort_date();
        if !date.is_empty() && !is_iso_date(date) {
            return Err(AbideError::InvalidDate(date.to_string()));
        }
        let mut records = self.records();
        let previous = upsert(&mut records, record.clone());
        self.store_records(records.clone())?;
        self.hook
            .after_save(self.records.store(), previous.as_ref(), &record, &records)
    }

    /// Apply `f` to a copy of the record with `id` and [`save`](Self::save) it.
    pub fn update_record(&mut self, id: &str, f: impl FnOnce(&mut T)) -> Result<T> {
        let mut record = self.get(id).ok_or_else(|| self.not_found(id))?;
        f(&mut record);
        self.save(record.clone())?;
        Ok(record)
    }

    /// Change a record in place without running the derived-state hook.
    fn modify<R>(&mut self, id: &str, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let mut records = self.records();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        let out = f(record)?;
        self.store_records(records)?;
        Ok(out)
    }

    /// Stage `ids` for deletion. An empty set is ignored.
    ///
    /// Returns whether anything was staged.
    pub fn request_delete<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: IndexSet<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return false;
        }
        self.pending_delete = ids;
        true
    }

    /// Stage the current selection for deletion.
    pub fn request_delete_selected(&mut self) -> bool {
        let ids = self.selected.clone();
        self.request_delete(ids)
    }

    /// The ids staged for deletion.
    pub fn pending_delete(&self) -> &IndexSet<String> {
        &self.pending_delete
    }

    /// Remove every staged record in one write and retract their derived state.
    ///
    /// Clears the selection and leaves select mode. Returns the number of
    /// records removed.
    pub fn confirm_delete(&mut self) -> Result<usize> {
        if self.pending_delete.is_empty() {
            return Ok(0);
        }
        let (deleted, remaining): (Vec<T>, Vec<T>) = self
            .records()
            .into_iter()
            .partition(|r| self.pending_delete.contains(r.id()));

        self.store_records(remaining.clone())?;
        self.hook
            .after_delete(self.records.store(), &deleted, &remaining)?;

        log::debug!(
            "Deleted {} record(s) from \"{}\"",
            deleted.len(),
            self.records.key()
        );
        self.pending_delete.clear();
        self.exit_select_mode();
        Ok(deleted.len())
    }

    /// Discard the staged deletion.
    pub fn cancel_delete(&mut self) {
        self.pending_delete.clear();
    }

    /// The current view state.
    pub fn view_state(&self) -> &ViewState<T::Filter> {
        &self.view
    }

    /// Set the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.search = search.into();
    }

    /// Set the status filter.
    pub fn set_filter(&mut self, filter: T::Filter) {
        self.view.filter = filter;
    }

    /// Set the sort order.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.view.sort = sort;
    }

    /// Flip the sort order and return the new one.
    pub fn toggle_sort(&mut self) -> SortOrder {
        self.view.sort = self.view.sort.toggled();
        self.view.sort
    }

    /// The filtered, sorted records to display.
    pub fn view(&self) -> Vec<T> {
        self.records
            .with(|list| derive_view(list.records(), &self.view))
    }

    /// Enter multi-select mode with nothing selected.
    pub fn enter_select_mode(&mut self) {
        self.select_mode = true;
        self.selected.clear();
    }

    /// Leave multi-select mode and clear the selection.
    pub fn exit_select_mode(&mut self) {
        self.select_mode = false;
        self.selected.clear();
    }

    /// Whether multi-select mode is active.
    pub fn is_select_mode(&self) -> bool {
        self.select_mode
    }

    /// Select `id` if unselected, otherwise unselect it.
    ///
    /// Returns whether `id` is now selected.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.selected.shift_remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// The selected ids, in selection order.
    pub fn selected(&self) -> &IndexSet<String> {
        &self.selected
    }
}

impl<T: Record + Commentable, H: DerivedState<T>> CollectionController<T, H> {
    /// Append a comment to a record. Blank text is rejected.
    pub fn add_comment(&mut self, id: &str, text: &str) -> Result<Comment> {
        let comment = Comment::new(text)?;
        self.modify(id, |record| {
            record.comments_mut().push(comment.clone());
            Ok(comment)
        })
    }

    /// Replace a comment's text, keeping its id, timestamp and position.
    pub fn update_comment(&mut self, id: &str, comment_id: &str, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AbideError::EmptyComment);
        }
        let missing = self.not_found(comment_id);
        self.modify(id, |record| {
            let comment = record
                .comments_mut()
                .iter_mut()
                .find(|c| c.id == comment_id)
                .ok_or(missing)?;
            comment.text = text.to_string();
            Ok(())
        })
    }

    /// Remove a comment. Removing an unknown comment id is a no-op.
    pub fn delete_comment(&mut self, id: &str, comment_id: &str) -> Result<()> {
        self.modify(id, |record| {
            record.comments_mut().retain(|c| c.id != comment_id);
            Ok(())
        })
    }
}

impl<T: Record + Likeable, H: DerivedState<T>> CollectionController<T, H> {
    /// Toggle the like flag of a record. Returns the new like count.
    pub fn toggle_like(&mut self, id: &str) -> Result<i64> {
        self.modify(id, |record| {
            record.toggle_like();
            Ok(*record.like_state().1)
        })
    }
}
