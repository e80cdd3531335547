use tokio::sync::mpsc::{error::TryRecvError, Receiver, Sender};

/// Both ends of an mpsc channel in one place. The sender side is cloned
/// into background tasks, the receiver side is drained from the egui
/// update loop without ever blocking it.
pub struct Channel<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Channel<T> {
    pub fn new(buffer: usize) -> Self {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        Self { tx, rx }
    }

    pub fn clone_tx(&self) -> Sender<T> {
        self.tx.clone()
    }

    pub fn try_recv(&mut self) -> Result<T, TryRecvError> {
        self.rx.try_recv()
    }
}
