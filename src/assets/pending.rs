use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::LoadError;

/// Producer half of a [`PendingLoad`], held by the loader.
pub struct LoadSender<T> {
    tx: Sender<Result<T, LoadError>>,
}

impl<T> Clone for LoadSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> LoadSender<T> {
    /// Deliver the load result. A result sent after the receiving
    /// [`PendingLoad`] was dropped is discarded.
    pub fn send(&self, result: Result<T, LoadError>) {
        let _ = self.tx.send(result);
    }
}

/// Handle to an in-flight load, resolved by polling from the render loop.
pub struct PendingLoad<T> {
    source: String,
    rx: Option<Receiver<Result<T, LoadError>>>,
}

/// Create a connected sender / pending-load pair for `source`.
pub fn load_channel<T>(source: &str) -> (LoadSender<T>, PendingLoad<T>) {
    let (tx, rx) = mpsc::channel();
    (
        LoadSender { tx },
        PendingLoad {
            source: source.to_owned(),
            rx: Some(rx),
        },
    )
}

impl<T> PendingLoad<T> {
    /// Path or URL being loaded.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check for a result without blocking.
    ///
    /// Yields `Some` exactly once: with the loader's result, or with
    /// [`LoadError::Disconnected`] if the loader vanished without sending.
    /// Every later call returns `None`.
    pub fn poll(&mut self) -> Option<Result<T, LoadError>> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Disconnected),
        };
        self.rx = None;
        Some(result)
    }

    /// Whether [`poll`](Self::poll) has already yielded the result.
    pub fn is_resolved(&self) -> bool {
        self.rx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_until_sent() {
        let (tx, mut pending) = load_channel::<u32>("a.glb");
        assert_eq!(pending.source(), "a.glb");
        assert!(pending.poll().is_none());
        assert!(!pending.is_resolved());
        tx.send(Ok(7));
        assert_eq!(pending.poll().unwrap().unwrap(), 7);
        assert!(pending.is_resolved());
    }

    #[test]
    fn resolves_only_once() {
        let (tx, mut pending) = load_channel::<u32>("a.glb");
        tx.send(Ok(1));
        tx.send(Ok(2));
        assert!(pending.poll().is_some());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn dropped_sender_reports_disconnect() {
        let (tx, mut pending) = load_channel::<u32>("a.glb");
        drop(tx);
        assert!(matches!(pending.poll(), Some(Err(LoadError::Disconnected))));
        assert!(pending.poll().is_none());
    }

    #[test]
    fn errors_pass_through() {
        let (tx, mut pending) = load_channel::<u32>("a.glb");
        tx.send(Err(LoadError::MissingGeometry));
        assert!(matches!(pending.poll(), Some(Err(LoadError::MissingGeometry))));
    }
}
