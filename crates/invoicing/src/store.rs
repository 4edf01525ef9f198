//! Entity storage used by the default collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use shopdesk_core::{CustomerId, Entity};

use crate::customer::Customer;
use crate::invoice::Invoice;

/// Key/value store abstraction keyed by entity id.
pub trait Store<E: Entity>: Send + Sync {
    fn get(&self, id: &E::Id) -> Option<E>;
    fn upsert(&self, entity: E);
    fn list(&self) -> Vec<E>;
    /// All records matching `predicate`.
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Vec<E>;
}

impl<E, S> Store<E> for Arc<S>
where
    E: Entity,
    S: Store<E> + ?Sized,
{
    fn get(&self, id: &E::Id) -> Option<E> {
        (**self).get(id)
    }

    fn upsert(&self, entity: E) {
        (**self).upsert(entity)
    }

    fn list(&self) -> Vec<E> {
        (**self).list()
    }

    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Vec<E> {
        (**self).find(predicate)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Store<E> for InMemoryStore<E>
where
    E: Entity + Clone + Send + Sync + 'static,
    E::Id: Send + Sync,
{
    fn get(&self, id: &E::Id) -> Option<E> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn upsert(&self, entity: E) {
        match self.inner.write() {
            Ok(mut map) => {
                map.insert(entity.id(), entity);
            }
            Err(_) => tracing::warn!(id = ?entity.id(), "store lock poisoned; write dropped"),
        }
    }

    fn list(&self) -> Vec<E> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Vec<E> {
        match self.inner.read() {
            Ok(map) => map.values().filter(|e| predicate(*e)).cloned().collect(),
            Err(_) => vec![],
        }
    }
}

/// Customer and invoice stores shared by the default collaborators.
///
/// Reads go straight to the stores. Read-modify-write sequences must run
/// inside [`InvoiceBook::exclusive`] so that email uniqueness and invoice
/// revisions hold across concurrent requests.
#[derive(Clone)]
pub struct InvoiceBook {
    customers: Arc<dyn Store<Customer>>,
    invoices: Arc<dyn Store<Invoice>>,
    writes: Arc<Mutex<()>>,
}

impl InvoiceBook {
    pub fn new(customers: Arc<dyn Store<Customer>>, invoices: Arc<dyn Store<Invoice>>) -> Self {
        Self {
            customers,
            invoices,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::<Customer>::new()),
            Arc::new(InMemoryStore::<Invoice>::new()),
        )
    }

    pub fn customers(&self) -> &dyn Store<Customer> {
        self.customers.as_ref()
    }

    pub fn invoices(&self) -> &dyn Store<Invoice> {
        self.invoices.as_ref()
    }

    /// Run `f` while holding the book's write lock.
    ///
    /// Only one `exclusive` section runs at a time across every clone of
    /// this book. The guard protects no data of its own, so a poisoned lock
    /// is recovered.
    pub fn exclusive<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        let _guard = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        f(self)
    }

    /// Customer whose normalized email matches `email`.
    pub fn customer_by_email(&self, email: &str) -> Option<Customer> {
        self.customers()
            .find(&|c: &Customer| c.has_email(email))
            .into_iter()
            .next()
    }

    /// Invoices of one customer, oldest first.
    pub fn invoices_for(&self, customer_id: CustomerId) -> Vec<Invoice> {
        let mut invoices = self
            .invoices()
            .find(&|i: &Invoice| i.customer_id() == customer_id);
        invoices.sort_by_key(|i| (i.issued_at(), i.id()));
        invoices
    }
}
