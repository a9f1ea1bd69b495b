//! Presentation of notices to the user.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

use super::Notice;

/// Shows notices to the user.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Shows `notice` in a blocking modal and resolves once it is dismissed.
    async fn present(&self, notice: Notice);

    /// Shows a persistent, dismissable banner. Does not wait.
    fn banner(&self, message: &str);
}

#[async_trait]
impl<T: Presenter + ?Sized> Presenter for Arc<T> {
    async fn present(&self, notice: Notice) {
        (**self).present(notice).await
    }

    fn banner(&self, message: &str) {
        (**self).banner(message)
    }
}

/// Something the view layer has to render.
#[derive(Debug)]
pub enum Presentation {
    /// A modal that blocks its sender until dismissed.
    Modal(PendingModal),
    /// A persistent banner.
    Banner(String),
}

/// An open modal waiting for the user.
///
/// Dropping it without calling [`dismiss`](Self::dismiss) also releases the
/// sender.
#[derive(Debug)]
pub struct PendingModal {
    notice: Notice,
    dismissed: oneshot::Sender<()>,
}

impl PendingModal {
    /// Returns the notice to show.
    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Closes the modal.
    pub fn dismiss(self) {
        let _ = self.dismissed.send(());
    }
}

/// A [`Presenter`] that hands modals to the view layer over a channel.
///
/// Each `present` call sends one [`PendingModal`] and waits on its
/// dismissal, so a caller presenting in a loop never has two modals open.
#[derive(Debug, Clone)]
pub struct ModalPresenter {
    tx: mpsc::UnboundedSender<Presentation>,
}

/// Receiving half of a [`ModalPresenter`].
#[derive(Debug)]
pub struct PresentationReceiver {
    rx: mpsc::UnboundedReceiver<Presentation>,
}

impl ModalPresenter {
    /// Creates a presenter and the receiver the view layer reads from.
    pub fn channel() -> (Self, PresentationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, PresentationReceiver { rx })
    }
}

#[async_trait]
impl Presenter for ModalPresenter {
    async fn present(&self, notice: Notice) {
        let (dismissed, on_dismiss) = oneshot::channel();
        if self
            .tx
            .send(Presentation::Modal(PendingModal { notice, dismissed }))
            .is_err()
        {
            log::warn!("no view attached, dropping notice");
            return;
        }
        // A dropped modal counts as dismissed.
        let _ = on_dismiss.await;
    }

    fn banner(&self, message: &str) {
        if self.tx.send(Presentation::Banner(message.to_string())).is_err() {
            log::warn!("no view attached, dropping banner: {message}");
        }
    }
}

impl PresentationReceiver {
    /// Waits for the next presentation.
    ///
    /// Returns `None` once every presenter is gone.
    pub async fn next(&mut self) -> Option<Presentation> {
        self.rx.recv().await
    }

    /// Returns a presentation if one is already queued.
    pub fn try_next(&mut self) -> Option<Presentation> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_present_waits_for_dismissal() {
        let (presenter, mut view) = ModalPresenter::channel();
        let task = tokio::spawn(async move { presenter.present(Notice::error("boom")).await });

        let Some(Presentation::Modal(modal)) = view.next().await else {
            panic!("expected a modal");
        };
        assert_eq!(modal.notice(), &Notice::error("boom"));
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        modal.dismiss();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_present_without_view_returns() {
        let (presenter, view) = ModalPresenter::channel();
        drop(view);
        presenter.present(Notice::info("nobody")).await;
    }
}
