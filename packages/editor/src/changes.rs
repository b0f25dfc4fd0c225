//! DOM change notifications
//!
//! The host forwards what its mutation observer saw through a
//! [`DomChangeSender`]; the editor drains the paired [`DomChangeFeed`] and
//! re-tags regions when something structural happened.

use crate::classifier::REGION_ATTRIBUTE;
use quickedit_common::NodeId;
use std::sync::mpsc::{self, Receiver, Sender};

/// Attributes whose change can alter region or candidate classification
const CLASSIFYING_ATTRIBUTES: [&str; 4] = ["class", "role", "id", REGION_ATTRIBUTE];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomChange {
    /// Children were added under `target`
    ChildList { target: NodeId, added: usize },
    Attributes { target: NodeId, name: String },
    /// A scheduled re-tag after initial load
    RetryTick { attempt: usize },
}

impl DomChange {
    pub fn needs_retag(&self) -> bool {
        match self {
            DomChange::ChildList { added, .. } => *added > 0,
            DomChange::Attributes { name, .. } => CLASSIFYING_ATTRIBUTES.contains(&name.as_str()),
            DomChange::RetryTick { .. } => true,
        }
    }
}

/// Create a connected sender/feed pair
pub fn change_channel() -> (DomChangeSender, DomChangeFeed) {
    let (sender, receiver) = mpsc::channel();
    (DomChangeSender { sender }, DomChangeFeed { receiver })
}

#[derive(Debug, Clone)]
pub struct DomChangeSender {
    sender: Sender<DomChange>,
}

impl DomChangeSender {
    /// Returns `false` once the feed has been dropped
    pub fn notify(&self, change: DomChange) -> bool {
        self.sender.send(change).is_ok()
    }
}

#[derive(Debug)]
pub struct DomChangeFeed {
    receiver: Receiver<DomChange>,
}

impl DomChangeFeed {
    pub fn try_next(&self) -> Option<DomChange> {
        self.receiver.try_recv().ok()
    }

    /// Everything queued so far, without blocking
    pub fn drain(&self) -> Vec<DomChange> {
        self.receiver.try_iter().collect()
    }
}

/// Send a [`DomChange::RetryTick`] after each delay, in order
#[cfg(feature = "tokio")]
pub fn spawn_retag_retries(
    sender: DomChangeSender,
    delays: Vec<std::time::Duration>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for (attempt, delay) in delays.into_iter().enumerate() {
            tokio::time::sleep(delay).await;
            if !sender.notify(DomChange::RetryTick { attempt }) {
                tracing::debug!(attempt, "Change feed closed, stopping retag retries");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_retag() {
        let node = NodeId(3);
        assert!(DomChange::ChildList { target: node, added: 2 }.needs_retag());
        assert!(!DomChange::ChildList { target: node, added: 0 }.needs_retag());
        assert!(DomChange::Attributes { target: node, name: "class".to_string() }.needs_retag());
        assert!(!DomChange::Attributes { target: node, name: "style".to_string() }.needs_retag());
        assert!(!DomChange::Attributes { target: node, name: "data-qe-id".to_string() }.needs_retag());
    }

    #[test]
    fn test_drain_and_closed_feed() {
        let (sender, feed) = change_channel();
        sender.notify(DomChange::RetryTick { attempt: 0 });
        sender.clone().notify(DomChange::RetryTick { attempt: 1 });

        assert_eq!(feed.drain().len(), 2);
        assert_eq!(feed.try_next(), None);

        drop(feed);
        assert!(!sender.notify(DomChange::RetryTick { attempt: 2 }));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_retag_retries_fire_in_order() {
        let (sender, feed) = change_channel();
        let delays = vec![
            std::time::Duration::from_millis(250),
            std::time::Duration::from_millis(1000),
        ];

        spawn_retag_retries(sender, delays).await.unwrap();

        assert_eq!(
            feed.drain(),
            vec![DomChange::RetryTick { attempt: 0 }, DomChange::RetryTick { attempt: 1 }]
        );
    }
}
