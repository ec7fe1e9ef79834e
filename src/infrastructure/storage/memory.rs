//! In-memory storage implementation
//!
//! Snapshot-isolated: every unit of work operates on a private copy of the
//! state. Readers never wait; writers are serialized by an owned mutex
//! guard held for the lifetime of the unit and publish their copy on
//! commit. A unit dropped without commit leaves the shared state untouched.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::{
    AccessMode, DomainError, DomainResult, Role, RoleStore, TransactionManager, UnitOfWork, User,
    UserStore, ROLE_ADMIN, ROLE_USER,
};
use crate::shared::{Page, PageRequest, Sort, SortDirection, SortField};

#[derive(Debug, Clone)]
struct State {
    users: BTreeMap<i64, User>,
    roles: Vec<Role>,
    next_user_id: i64,
}

/// In-memory store for development and testing
pub struct InMemoryTransactionManager {
    shared: Arc<RwLock<State>>,
    writer: Arc<AsyncMutex<()>>,
    committed_writes: Arc<AtomicU64>,
}

impl InMemoryTransactionManager {
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            shared: Arc::new(RwLock::new(State {
                users: BTreeMap::new(),
                roles,
                next_user_id: 1,
            })),
            writer: Arc::new(AsyncMutex::new(())),
            committed_writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Seeded with `ROLE_USER` (id 1) and `ROLE_ADMIN` (id 2), like the migrations.
    pub fn with_default_roles() -> Self {
        Self::new(vec![Role::new(1, ROLE_USER), Role::new(2, ROLE_ADMIN)])
    }

    /// Number of committed units that changed something.
    pub fn committed_writes(&self) -> u64 {
        self.committed_writes.load(Ordering::SeqCst)
    }

    /// Committed users in id order.
    pub fn users_snapshot(&self) -> DomainResult<Vec<User>> {
        let state = self.shared.read().map_err(|_| poisoned())?;
        Ok(state.users.values().cloned().collect())
    }

    fn snapshot(&self) -> DomainResult<State> {
        let state = self.shared.read().map_err(|_| poisoned())?;
        Ok(state.clone())
    }
}

impl Default for InMemoryTransactionManager {
    fn default() -> Self {
        Self::with_default_roles()
    }
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    type Unit = InMemoryUnitOfWork;

    async fn begin(&self, mode: AccessMode) -> DomainResult<InMemoryUnitOfWork> {
        let writer_guard = match mode {
            AccessMode::ReadOnly => None,
            AccessMode::ReadWrite => Some(self.writer.clone().lock_owned().await),
        };

        // Snapshot after acquiring the writer lock so the copy includes
        // everything the previous writer published.
        let working = self.snapshot()?;

        Ok(InMemoryUnitOfWork {
            mode,
            working: Mutex::new(working),
            dirty: AtomicU64::new(0),
            shared: self.shared.clone(),
            committed_writes: self.committed_writes.clone(),
            _writer_guard: writer_guard,
        })
    }
}

pub struct InMemoryUnitOfWork {
    mode: AccessMode,
    working: Mutex<State>,
    dirty: AtomicU64,
    shared: Arc<RwLock<State>>,
    committed_writes: Arc<AtomicU64>,
    _writer_guard: Option<OwnedMutexGuard<()>>,
}

impl InMemoryUnitOfWork {
    fn state(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.working.lock().map_err(|_| poisoned())
    }

    fn ensure_writable(&self) -> DomainResult<()> {
        match self.mode {
            AccessMode::ReadWrite => Ok(()),
            AccessMode::ReadOnly => Err(DomainError::Storage(
                "cannot write in a read-only transaction".to_string(),
            )),
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> &dyn UserStore {
        self
    }

    fn roles(&self) -> &dyn RoleStore {
        self
    }

    async fn commit(self) -> DomainResult<()> {
        if self.mode == AccessMode::ReadOnly || self.dirty.load(Ordering::SeqCst) == 0 {
            return Ok(());
        }

        let working = self.working.into_inner().map_err(|_| poisoned())?;
        let mut shared = self.shared.write().map_err(|_| poisoned())?;
        *shared = working;
        self.committed_writes.fetch_add(1, Ordering::SeqCst);
        debug!("In-memory transaction committed");
        Ok(())
    }

    async fn rollback(self) -> DomainResult<()> {
        debug!(
            writes = self.dirty.load(Ordering::SeqCst),
            "In-memory transaction rolled back"
        );
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUnitOfWork {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let state = self.state()?;
        Ok(state.users.values().cloned().collect())
    }

    async fn find_page(&self, request: &PageRequest) -> DomainResult<Page<User>> {
        let state = self.state()?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        if let Some(sort) = request.sort {
            users.sort_by(|a, b| compare(a, b, sort));
        }

        let total = users.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let content = users.into_iter().skip(offset).take(size).collect();

        Ok(Page::new(content, request, total))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let state = self.state()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn save(&self, mut user: User) -> DomainResult<User> {
        self.ensure_writable()?;
        let mut state = self.state()?;

        let duplicate = state.users.values().find(|existing| {
            existing.id != user.id
                && (existing.username == user.username || existing.email == user.email)
        });
        if let Some(existing) = duplicate {
            let field = if existing.username == user.username {
                "username"
            } else {
                "email"
            };
            return Err(DomainError::Conflict(format!("User {} already exists", field)));
        }

        let id = match user.id {
            Some(id) if !state.users.contains_key(&id) => {
                return Err(DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: id.to_string(),
                });
            }
            Some(id) => id,
            None => {
                let id = state.next_user_id;
                state.next_user_id += 1;
                id
            }
        };
        user.id = Some(id);
        state.users.insert(id, user.clone());
        self.dirty.fetch_add(1, Ordering::SeqCst);

        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        self.ensure_writable()?;
        let mut state = self.state()?;
        if state.users.remove(&id).is_some() {
            self.dirty.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for InMemoryUnitOfWork {
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let state = self.state()?;
        Ok(state.roles.iter().find(|r| r.name == name).cloned())
    }
}

fn compare(a: &User, b: &User, sort: Sort) -> CmpOrdering {
    let ordering = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Lastname => a.lastname.cmp(&b.lastname),
        SortField::Username => a.username.cmp(&b.username),
        SortField::Email => a.email.cmp(&b.email),
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn poisoned() -> DomainError {
    DomainError::Storage("in-memory state lock poisoned".to_string())
}
