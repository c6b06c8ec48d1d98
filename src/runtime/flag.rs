use tokio::sync::watch;

/// A live-updating boolean condition that can be observed.
///
/// Implementors publish the current value synchronously and hand out a
/// `watch` receiver for change events.
pub trait FlagSource: Send + Sync {
    fn current(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Tracks a boolean condition for as long as the watcher is alive.
///
/// Built from an optional [`FlagSource`]: with no source the value is `false`
/// and stays `false`. With a source, the initial value is read synchronously
/// at subscribe time and every change event updates it. Dropping the watcher
/// releases the subscription; no updates are delivered afterwards.
pub struct FlagWatcher {
    value: bool,
    rx: Option<watch::Receiver<bool>>,
}

impl FlagWatcher {
    pub fn new(source: Option<&dyn FlagSource>) -> Self {
        match source {
            Some(source) => {
                let rx = source.subscribe();
                let value = *rx.borrow();
                Self { value, rx: Some(rx) }
            }
            None => Self { value: false, rx: None },
        }
    }

    /// Last observed value.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Pick up any change event that has already fired, without waiting.
    pub fn refresh(&mut self) -> bool {
        if let Some(rx) = &mut self.rx {
            if rx.has_changed().unwrap_or(false) {
                self.value = *rx.borrow_and_update();
            }
        }
        self.value
    }

    /// Wait for the next change event and return the new value.
    ///
    /// Returns `None` when there is no source or the source went away.
    pub async fn changed(&mut self) -> Option<bool> {
        let rx = self.rx.as_mut()?;
        if rx.changed().await.is_err() {
            return None;
        }
        self.value = *rx.borrow_and_update();
        Some(self.value)
    }
}
