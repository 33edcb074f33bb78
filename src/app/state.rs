use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::validation::Validation;
use super::working::WorkingSession;
use crate::api::{TodoBackend, WireTodo, to_backend, to_backend_over, to_frontend};
use crate::criteria::{Criteria, FilterContext, SortCriteria};
use crate::sidebar::{self, GroupModel, GroupingIndex};
use crate::storage::local_state::{KeyValueStore, SEARCH_KEY, SORTING_KEY};
use crate::todo::{Todo, seconds_to_human};

/// Identifies one list read; only the newest read may replace the todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// State behind the todo views: the todos mirrored from the backend plus the
/// view selection (filter, sorting, search) and the running working session.
pub struct TodoListController<S: KeyValueStore> {
    todos: Vec<Todo>,
    /// The records as the backend last returned them, index aligned with `todos`.
    records: Vec<WireTodo>,
    current_filter: Criteria,
    sorting: SortCriteria,
    search: String,
    working: WorkingSession,
    sidebar: GroupingIndex,
    validation: Validation,
    last_error: Option<String>,
    read_generation: u64,
    clock: fn() -> DateTime<Utc>,
    store: S,
}

impl<S: KeyValueStore> TodoListController<S> {
    /// Create the controller, restoring search, sorting and working session from `store`.
    pub fn load(store: S) -> Self {
        let search = store.get(SEARCH_KEY).unwrap_or_default();
        let sorting = store
            .get(SORTING_KEY)
            .and_then(|name| name.parse().ok())
            .unwrap_or_default();
        let working = WorkingSession::load(&store);

        debug!(%sorting, active = working.is_active(), "restored view state");

        Self {
            todos: Vec::new(),
            records: Vec::new(),
            current_filter: Criteria::NotCompleted,
            sorting,
            search,
            working,
            sidebar: GroupingIndex::new(),
            validation: Validation::new(),
            last_error: None,
            read_generation: 0,
            clock: Utc::now,
            store,
        }
    }

    /// Replace the time source (tests use fixed clocks).
    pub fn set_clock(&mut self, clock: fn() -> DateTime<Utc>) {
        self.clock = clock;
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == Some(id))
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sorting(&self) -> SortCriteria {
        self.sorting
    }

    pub fn current_filter(&self) -> &Criteria {
        &self.current_filter
    }

    pub fn working(&self) -> WorkingSession {
        self.working
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    pub fn validation_mut(&mut self) -> &mut Validation {
        &mut self.validation
    }

    /// The last backend failure, cleared by the next successful request.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> Result<()> {
        self.search = search.into();
        self.store.set(SEARCH_KEY, &self.search)
    }

    pub fn set_sorting(&mut self, sorting: SortCriteria) -> Result<()> {
        self.sorting = sorting;
        self.store.set(SORTING_KEY, &sorting.to_string())
    }

    /// Switch to another filter; the search text is reset.
    pub fn change_to_filter(&mut self, criteria: Criteria) -> Result<()> {
        self.set_search("")?;
        self.current_filter = criteria;
        Ok(())
    }

    pub fn filter_context(&self) -> FilterContext {
        FilterContext::with_today(
            self.search.clone(),
            (self.clock)().with_timezone(&chrono::Local).date_naive(),
        )
    }

    /// The todos passing the current filter, in the current order.
    pub fn filtered_todos(&self) -> Vec<&Todo> {
        let ctx = self.filter_context();
        let mut visible: Vec<&Todo> = self
            .todos
            .iter()
            .filter(|todo| self.current_filter.matches(todo, &ctx, true))
            .collect();
        visible.sort_by(|a, b| self.sorting.compare(a, b));
        visible
    }

    /// Number of todos matching `criteria`, ignoring the search text.
    pub fn count(&self, criteria: &Criteria) -> usize {
        let ctx = self.filter_context();
        self.todos
            .iter()
            .filter(|todo| criteria.matches(todo, &ctx, false))
            .count()
    }

    pub fn sidebar(&mut self) -> &[GroupModel] {
        self.sidebar.build_sidebar(&self.todos)
    }

    pub fn toggle_group(&mut self, name: &str) -> bool {
        self.sidebar.toggle_group(name)
    }

    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        sidebar::tag_counts(&self.todos)
    }

    pub fn project_counts(&self) -> BTreeMap<String, usize> {
        sidebar::project_counts(&self.todos)
    }

    /// A blank todo for the create dialog.
    pub fn new_todo() -> Todo {
        Todo::default()
    }

    /// A scratch copy of a todo for editing; the list itself stays untouched.
    pub fn edit_copy(&self, id: i64) -> Option<Todo> {
        self.find(id).cloned()
    }

    pub fn begin_read(&mut self) -> RequestTicket {
        self.read_generation += 1;
        RequestTicket(self.read_generation)
    }

    /// Apply the response of a list read. Responses of reads that were
    /// superseded by a newer [`Self::begin_read`] are dropped.
    pub fn apply_read(&mut self, ticket: RequestTicket, todos: Vec<WireTodo>) -> bool {
        if ticket.0 != self.read_generation {
            debug!(
                ticket = ticket.0,
                current = self.read_generation,
                "dropping stale todo list"
            );
            return false;
        }
        self.todos = todos.iter().map(to_frontend).collect();
        self.records = todos;
        true
    }

    pub fn read_todos(&mut self, backend: &impl TodoBackend) -> Result<()> {
        let ticket = self.begin_read();
        let todos = self.track(backend.list_todos().context("Failed to read todos"))?;
        info!("read {} todos", todos.len());
        self.apply_read(ticket, todos);
        Ok(())
    }

    /// Create `todo` in the backend and append the saved version.
    pub fn create_todo(&mut self, backend: &impl TodoBackend, todo: &Todo) -> Result<Todo> {
        self.validation.validate_todo(todo)?;
        let wire = to_backend(todo)?;

        info!("trying to create new todo \"{}\"", wire.title);
        let saved = self.submit(backend, &wire)?;
        info!("successfully created new todo \"{}\"", saved.title);
        Ok(saved)
    }

    /// Send an edited copy to the backend and replace the list entry with the response.
    pub fn update_todo(&mut self, backend: &impl TodoBackend, todo: &Todo) -> Result<Todo> {
        let last = todo.id.and_then(|id| self.find(id)).cloned();
        self.validation.validate_changes(todo, last.as_ref())?;
        let wire = match todo.id.and_then(|id| self.record(id)) {
            Some(record) => to_backend_over(todo, record)?,
            None => to_backend(todo)?,
        };

        info!("trying to update todo \"{}\"", wire.title);
        let saved = self.submit(backend, &wire)?;
        info!("successfully updated todo \"{}\"", saved.title);
        Ok(saved)
    }

    /// Delete a todo; it leaves the list only after the backend confirmed.
    /// A running session on it ends without booking the time.
    pub fn delete_todo(&mut self, backend: &impl TodoBackend, id: i64) -> Result<()> {
        let title = self
            .find(id)
            .map(|todo| todo.title.clone())
            .ok_or_else(|| anyhow!("No todo with id {}", id))?;
        info!("trying to delete \"{}\"", title);

        self.track(
            backend
                .delete_todo(id)
                .with_context(|| format!("Failed to delete \"{}\"", title)),
        )?;
        self.todos.retain(|todo| todo.id != Some(id));
        self.records.retain(|record| record.id != Some(id));

        if self.working.is_working_on(Some(id)) {
            self.set_working(WorkingSession::default())?;
        }
        info!("successfully deleted \"{}\"", title);
        Ok(())
    }

    /// Flip completion. Completing the todo being timed books the elapsed
    /// time and ends the session.
    pub fn toggle_completion(&mut self, backend: &impl TodoBackend, id: i64) -> Result<Todo> {
        let mut wire = self
            .record(id)
            .cloned()
            .ok_or_else(|| anyhow!("No todo with id {}", id))?;

        let booking = !wire.completed && self.working.is_working_on(Some(id));
        if booking {
            wire.working_time += self.working.elapsed_seconds((self.clock)());
        }
        wire.completed = !wire.completed;

        let saved = self.submit(backend, &wire)?;
        if booking {
            self.set_working(WorkingSession::default())?;
        }
        Ok(saved)
    }

    /// Start timing `id`. A session running for another todo is stopped and
    /// booked first.
    pub fn start_working(&mut self, backend: &impl TodoBackend, id: i64) -> Result<()> {
        if self.find(id).is_none() {
            return Err(anyhow!("No todo with id {}", id));
        }
        if self.working.is_working_on(Some(id)) {
            return Ok(());
        }
        if self.working.is_active() {
            self.stop_working(backend)?;
        }

        info!("start working on todo {}", id);
        self.set_working(WorkingSession::started(id, (self.clock)()))
    }

    /// Stop the running session and add the elapsed time to the todo.
    pub fn stop_working(&mut self, backend: &impl TodoBackend) -> Result<Option<Todo>> {
        let Some(id) = self.working.id else {
            return Ok(None);
        };
        let elapsed = self.working.elapsed_seconds((self.clock)());

        let Some(mut wire) = self.record(id).cloned() else {
            warn!("working session referred to unknown todo {}", id);
            self.set_working(WorkingSession::default())?;
            return Ok(None);
        };

        wire.working_time += elapsed;
        info!("booking {}s on \"{}\"", elapsed, wire.title);
        let saved = self.submit(backend, &wire)?;
        self.set_working(WorkingSession::default())?;
        Ok(Some(saved))
    }

    /// Seconds of the running session.
    pub fn working_time(&self) -> u64 {
        self.working.elapsed_seconds((self.clock)())
    }

    pub fn working_time_human(&self) -> String {
        seconds_to_human(self.working_time())
    }

    fn record(&self, id: i64) -> Option<&WireTodo> {
        self.records.iter().find(|record| record.id == Some(id))
    }

    fn set_working(&mut self, working: WorkingSession) -> Result<()> {
        self.working = working;
        working.save(&mut self.store)
    }

    fn submit(&mut self, backend: &impl TodoBackend, wire: &WireTodo) -> Result<Todo> {
        let saved = self.track(
            backend
                .save_todo(wire)
                .with_context(|| format!("Failed to save \"{}\"", wire.title)),
        )?;
        let todo = to_frontend(&saved);
        self.replace_or_push(todo.clone(), saved);
        Ok(todo)
    }

    fn replace_or_push(&mut self, todo: Todo, record: WireTodo) {
        match self
            .todos
            .iter()
            .position(|entry| entry.id.is_some() && entry.id == todo.id)
        {
            Some(pos) => {
                self.todos[pos] = todo;
                self.records[pos] = record;
            }
            None => {
                self.todos.push(todo);
                self.records.push(record);
            }
        }
    }

    /// Remember backend failures so the view can show them.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!("{:#}", e);
                self.last_error = Some(format!("{:#}", e));
            }
        }
        result
    }
}
