use std::future::Future;

use tokio::sync::OnceCell;

/// Whether a deferred module has been loaded yet.
#[derive(Debug)]
pub enum LoadState<'a, T> {
    Pending,
    Ready(&'a T),
}

impl<T> LoadState<'_, T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

/// One-shot initialization of a module that only makes sense in an
/// environment where its required capability exists.
///
/// The value stays `Pending` until the first successful load and never
/// reverts afterwards. Loading without the capability fails with the
/// caller-supplied error and leaves the state untouched, so a later call in
/// a capable environment can still succeed.
pub struct DeferredModule<T> {
    cell: OnceCell<T>,
}

impl<T> DeferredModule<T> {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn state(&self) -> LoadState<'_, T> {
        match self.cell.get() {
            Some(value) => LoadState::Ready(value),
            None => LoadState::Pending,
        }
    }

    /// Load the module if `available` holds, reusing a previous load.
    ///
    /// `on_missing` produces the error for the capability-absent case;
    /// `load` runs at most once across all callers.
    pub async fn load_if<E, F, Fut>(
        &self,
        available: bool,
        on_missing: impl FnOnce() -> E,
        load: F,
    ) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !available {
            // A value loaded earlier stays usable even if the capability
            // snapshot says otherwise; the cell is the source of truth.
            if let Some(value) = self.cell.get() {
                return Ok(value);
            }
            return Err(on_missing());
        }
        self.cell.get_or_try_init(load).await
    }
}

impl<T> Default for DeferredModule<T> {
    fn default() -> Self {
        Self::new()
    }
}
