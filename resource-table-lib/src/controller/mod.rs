//! Table controller.
//!
//! Owns the current [`Table`] snapshot and funnels every mutation through the
//! address: a change is encoded into parameters, written with a fresh
//! snapshot token, and the table is reloaded from the address. Nothing
//! outside this module mutates a snapshot.

mod clock;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;
use log::debug;
use log::error;
use log::info;
use log::warn;
use tokio::sync::watch;

use self::clock::SnapshotClock;
use crate::address::AddressStore;
use crate::api::TableApi;
use crate::channel::Notice;
use crate::channel::Presenter;
use crate::error::Error;
use crate::error::FetchError;
use crate::error::TableError;
use crate::model::Column;
use crate::model::ColumnLayout;
use crate::model::PageToken;
use crate::model::PathMove;
use crate::model::ResourceItem;
use crate::model::ResourceName;
use crate::model::Row;
use crate::model::Table;
use crate::model::TableField;
use crate::model::TablePhase;
use crate::query;
use crate::query::ParamPatch;
use crate::query::TableConfig;

type PageFetch = Shared<BoxFuture<'static, Result<(), Error>>>;

/// Drives one browsed table.
///
/// The controller is cheap to clone (uses `Arc` internally); clones share
/// the same snapshot.
///
/// # Example
///
/// ```ignore
/// use resource_table_lib::TableController;
/// use resource_table_lib::address::InMemoryAddress;
/// use resource_table_lib::api::HttpTableApi;
/// use resource_table_lib::model::ResourceName;
///
/// let api = HttpTableApi::builder().url("http://localhost:3000").build()?;
/// let controller = TableController::new(ResourceName::new("users"), api, InMemoryAddress::new());
///
/// controller.navigate().await?;
/// controller.load_all().await?;
/// for row in controller.rows().borrow().iter() {
///     println!("{:?}", row.resource_id());
/// }
/// ```
pub struct TableController<A, S> {
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S> {
    resource: ResourceName,
    api: A,
    address: S,
    alerts: Option<Arc<dyn Presenter>>,
    /// Bumped by every `load_table`; identifies snapshots.
    generation: AtomicU64,
    snapshot: Mutex<Option<Snapshot>>,
    /// One shared fetch per (generation, token).
    inflight: DashMap<(u64, PageToken), PageFetch>,
    rows: watch::Sender<Vec<Row>>,
    phase: watch::Sender<TablePhase>,
    clock: SnapshotClock,
}

struct Snapshot {
    generation: u64,
    table: Table,
}

impl<A, S> Clone for TableController<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S> TableController<A, S>
where
    A: TableApi + 'static,
    S: AddressStore + 'static,
{
    /// Creates a controller with no snapshot loaded.
    pub fn new(resource: ResourceName, api: A, address: S) -> Self {
        Self::builder(resource, api, address).build()
    }

    /// Creates a builder for a controller with optional collaborators.
    pub fn builder(resource: ResourceName, api: A, address: S) -> TableControllerBuilder<A, S> {
        TableControllerBuilder {
            resource,
            api,
            address,
            alerts: None,
        }
    }

    /// Returns the browsed resource.
    pub fn resource(&self) -> &ResourceName {
        &self.inner.resource
    }

    /// Returns the address store.
    pub fn address(&self) -> &S {
        &self.inner.address
    }

    /// Returns a copy of the current snapshot.
    pub fn table(&self) -> Option<Table> {
        self.inner
            .lock_snapshot()
            .as_ref()
            .map(|snapshot| snapshot.table.clone())
    }

    /// Subscribes to the derived row list.
    ///
    /// Updated after every snapshot replacement and every page resolution.
    pub fn rows(&self) -> watch::Receiver<Vec<Row>> {
        self.inner.rows.subscribe()
    }

    /// Returns the lifecycle phase of the current snapshot.
    pub fn phase(&self) -> TablePhase {
        *self.inner.phase.borrow()
    }

    /// Subscribes to phase changes.
    pub fn subscribe_phase(&self) -> watch::Receiver<TablePhase> {
        self.inner.phase.subscribe()
    }

    /// Returns the pending pages currently shown as placeholders.
    pub fn frontier(&self) -> Vec<PageToken> {
        self.inner
            .lock_snapshot()
            .as_ref()
            .map(|snapshot| snapshot.table.pages().frontier())
            .unwrap_or_default()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Reads the address and loads the table it describes.
    pub async fn navigate(&self) -> Result<(), Error> {
        let params = self.inner.address.read().await?;
        self.load_table(query::decode(&params)).await
    }

    /// Fetches the header and first page for `config` and replaces the
    /// snapshot wholesale.
    ///
    /// If an overlapping call started later, this one's result is dropped.
    /// When the server reports a content hash different from the one in
    /// `config`, the hash is written back to the address without another
    /// reload.
    pub async fn load_table(&self, config: TableConfig) -> Result<(), Error> {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.phase.send_replace(TablePhase::Initializing);

        let params = query::encode(&config);
        let header = match inner.api.fetch_table(&inner.resource, &params).await {
            Ok(header) => header,
            Err(err) => {
                inner.restore_if_current(generation);
                inner.alert(&err).await;
                return Err(err.into());
            }
        };

        let table = match Table::from_header(header) {
            Ok(table) => table,
            Err(err) => {
                error!("rejecting table header for {}: {err}", inner.resource);
                inner.restore_if_current(generation);
                return Err(err.into());
            }
        };
        let hash = table.hash().map(str::to_string);

        {
            let mut snapshot = inner.lock_snapshot();
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!("discarding stale table header (generation {generation})");
                return Ok(());
            }
            inner.inflight.clear();
            *snapshot = Some(Snapshot { generation, table });
            inner.publish(snapshot.as_ref());
        }
        info!("loaded {} table (generation {generation})", inner.resource);

        if let Some(hash) = hash.filter(|hash| config.hash.as_ref() != Some(hash)) {
            inner
                .address
                .write(ParamPatch::new().set(query::HASH, hash), true)
                .await?;
        }
        Ok(())
    }

    /// Fetches and resolves one page.
    ///
    /// Concurrent calls for the same token share a single request. Resolved
    /// pages return immediately. Results arriving after the snapshot was
    /// replaced are dropped.
    pub async fn load_page(&self, token: &PageToken) -> Result<(), Error> {
        let fetch = {
            let snapshot = self.inner.lock_snapshot();
            let current = snapshot.as_ref().ok_or(TableError::NoSnapshot)?;
            match current.table.pages().get(token) {
                Some(page) if !page.is_pending() => return Ok(()),
                Some(_) => Some(
                    self.inner
                        .inflight
                        .entry((current.generation, token.clone()))
                        .or_insert_with(|| {
                            Inner::page_fetch(&self.inner, current.generation, token.clone())
                        })
                        .clone(),
                ),
                None => None,
            }
        };

        match fetch {
            Some(fetch) => fetch.await,
            None => {
                let err = FetchError::UnknownPage(token.clone());
                self.inner.alert(&err).await;
                Err(err.into())
            }
        }
    }

    /// Loads every page currently on the frontier, concurrently.
    ///
    /// Returns how many pages were requested.
    pub async fn load_frontier(&self) -> Result<usize, Error> {
        let (frontier, pending) = self
            .inner
            .lock_snapshot()
            .as_ref()
            .map(|snapshot| {
                let pages = snapshot.table.pages();
                (pages.frontier(), pages.pending_count())
            })
            .unwrap_or_default();
        if !frontier.is_empty() {
            debug!("loading {} of {pending} pending pages", frontier.len());
        }
        let results =
            futures::future::join_all(frontier.iter().map(|token| self.load_page(token))).await;
        results.into_iter().collect::<Result<Vec<()>, Error>>()?;
        Ok(frontier.len())
    }

    /// Walks the frontier until no placeholder is left.
    pub async fn load_all(&self) -> Result<(), Error> {
        while self.load_frontier().await? > 0 {}
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Moves a path within or between the primary and secondary lists,
    /// then persists the layout and reloads.
    pub async fn reorder_paths(&self, mv: PathMove) -> Result<(), Error> {
        let mut layout = self.layout()?;
        layout.move_path(mv)?;
        self.commit_layout(&layout).await
    }

    /// Cycles a path: not sorted, ascending, descending, not sorted.
    pub async fn toggle_path(&self, path: &str) -> Result<(), Error> {
        query::validate_path(path)?;
        let mut layout = self.layout()?;
        layout.toggle_path(path)?;
        self.commit_layout(&layout).await
    }

    /// Applies an edited copy of the columns (visibility and filters).
    pub async fn update_columns(&self, columns: &[Column]) -> Result<(), Error> {
        for column in columns {
            query::validate_path(&column.path)?;
            if let Some(filter) = column.filter.as_deref() {
                query::validate_filter(&column.path, filter)?;
            }
        }
        let mut layout = self.layout()?;
        layout.update_columns(columns)?;
        self.commit_layout(&layout).await
    }

    /// Sets or clears one column's filter.
    ///
    /// The filter must compile as a regular expression.
    pub async fn set_column_filter(&self, path: &str, filter: Option<String>) -> Result<(), Error> {
        query::validate_path(path)?;
        if let Some(filter) = filter.as_deref() {
            query::validate_filter(path, filter)?;
        }
        let mut layout = self.layout()?;
        layout.set_filter(path, filter)?;
        self.commit_layout(&layout).await
    }

    /// Sends a field edit, then selects the edited resource and reloads.
    ///
    /// Rows are never patched locally; the reload brings the server's state.
    pub async fn patch_field(&self, field: TableField) -> Result<ResourceItem, Error> {
        let item = match self.inner.api.patch_field(&self.inner.resource, &field).await {
            Ok(item) => item,
            Err(err) => {
                self.inner.alert(&err).await;
                return Err(err.into());
            }
        };
        self.commit(ParamPatch::new().set(query::RESOURCE_ID, field.resource_id()))
            .await?;
        Ok(item)
    }

    /// Selects or deselects a row, toggling unless `force` is given.
    ///
    /// Selection lives only in the address. Returns the new state.
    pub async fn toggle_selection(&self, row: &Row, force: Option<bool>) -> Result<bool, Error> {
        let id = match row {
            Row::Item(item) => item.id.as_str(),
            Row::Placeholder(token) => return Err(TableError::InvalidRow(token.clone()).into()),
        };

        let selected = self.selected_id().await?.as_deref() == Some(id);
        let select = force.unwrap_or(!selected);
        if select != selected {
            let patch = ParamPatch::new().set_or_remove(query::RESOURCE_ID, select.then_some(id));
            self.inner.address.write(patch, true).await?;
        }
        Ok(select)
    }

    /// Returns the id of the selected resource.
    pub async fn selected_id(&self) -> Result<Option<String>, Error> {
        let params = self.inner.address.read().await?;
        Ok(query::decode(&params).resource_id)
    }

    fn layout(&self) -> Result<ColumnLayout, Error> {
        self.inner
            .lock_snapshot()
            .as_ref()
            .map(|snapshot| snapshot.table.layout().clone())
            .ok_or_else(|| TableError::NoSnapshot.into())
    }

    async fn commit_layout(&self, layout: &ColumnLayout) -> Result<(), Error> {
        let paths = query::encode_columns(&query::column_specs(layout));
        self.commit(ParamPatch::new().set(query::PATHS, paths)).await
    }

    /// Writes `patch` with a fresh snapshot token and reloads.
    async fn commit(&self, patch: ParamPatch) -> Result<(), Error> {
        let patch = patch.set(query::SNAPSHOT_ID, self.inner.clock.next().to_string());
        self.inner.address.write(patch, true).await?;
        self.navigate().await
    }
}

impl<A, S> Inner<A, S>
where
    A: TableApi + 'static,
    S: AddressStore + 'static,
{
    fn lock_snapshot(&self) -> MutexGuard<'_, Option<Snapshot>> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, snapshot: Option<&Snapshot>) {
        match snapshot {
            Some(snapshot) => {
                self.rows.send_replace(snapshot.table.rows());
                self.phase.send_replace(snapshot.table.phase());
            }
            None => {
                self.rows.send_replace(Vec::new());
                self.phase.send_replace(TablePhase::Initializing);
            }
        }
    }

    /// Re-publishes the kept snapshot after a failed reload.
    fn restore_if_current(&self, generation: u64) {
        let snapshot = self.lock_snapshot();
        if self.generation.load(Ordering::SeqCst) == generation {
            self.publish(snapshot.as_ref());
        }
    }

    async fn alert(&self, err: &FetchError) {
        match err.status_code() {
            Some(status) => warn!("{} request failed with HTTP {status}", self.resource),
            None => warn!("{} request failed: {err}", self.resource),
        }
        if let Some(alerts) = &self.alerts {
            alerts.present(Notice::error(err.to_string())).await;
        }
    }

    fn page_fetch(inner: &Arc<Self>, generation: u64, token: PageToken) -> PageFetch {
        let inner = Arc::clone(inner);
        async move {
            debug!("fetching page {token} (generation {generation})");
            match inner.api.fetch_page(&inner.resource, &token).await {
                Ok(items) => inner.apply_page(generation, &token, items),
                Err(err) => {
                    {
                        let _snapshot = inner.lock_snapshot();
                        inner.inflight.remove(&(generation, token.clone()));
                    }
                    inner.alert(&err).await;
                    Err(err.into())
                }
            }
        }
        .boxed()
        .shared()
    }

    fn apply_page(
        &self,
        generation: u64,
        token: &PageToken,
        items: Vec<ResourceItem>,
    ) -> Result<(), Error> {
        let mut snapshot = self.lock_snapshot();
        self.inflight.remove(&(generation, token.clone()));

        let current = match snapshot.as_mut() {
            Some(current) if current.generation == generation => current,
            _ => {
                debug!("discarding page {token} of stale generation {generation}");
                return Ok(());
            }
        };

        if let Err(err) = current.table.pages_mut().resolve(token, items) {
            error!("discarding snapshot {generation}: {err}");
            *snapshot = None;
            self.publish(None);
            return Err(err.into());
        }
        self.publish(snapshot.as_ref());
        Ok(())
    }
}

/// Builder for a [`TableController`].
pub struct TableControllerBuilder<A, S> {
    resource: ResourceName,
    api: A,
    address: S,
    alerts: Option<Arc<dyn Presenter>>,
}

impl<A, S> TableControllerBuilder<A, S>
where
    A: TableApi + 'static,
    S: AddressStore + 'static,
{
    /// Presents every fetch failure as a blocking alert before the failing
    /// operation returns.
    pub fn alerts(mut self, presenter: impl Presenter + 'static) -> Self {
        self.alerts = Some(Arc::new(presenter));
        self
    }

    /// Builds the controller.
    pub fn build(self) -> TableController<A, S> {
        TableController {
            inner: Arc::new(Inner {
                resource: self.resource,
                api: self.api,
                address: self.address,
                alerts: self.alerts,
                generation: AtomicU64::new(0),
                snapshot: Mutex::new(None),
                inflight: DashMap::new(),
                rows: watch::Sender::new(Vec::new()),
                phase: watch::Sender::new(TablePhase::Initializing),
                clock: SnapshotClock::new(),
            }),
        }
    }
}
