use std::collections::BTreeSet;

/// Identifies one resize subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Registry of listeners interested in the host's size changes
#[derive(Debug, Default)]
pub struct ResizeNotifier {
    next_id: u64,
    subscribers: BTreeSet<SubscriptionId>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id);
        id
    }

    /// Returns false if the subscription was already released
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id)
    }

    #[cfg(test)]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.contains(&id)
    }

    /// Subscribers to notify of a size change
    pub fn notify(&self) -> Vec<SubscriptionId> {
        self.subscribers.iter().copied().collect()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_notify() {
        let mut notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        let b = notifier.subscribe();
        assert_ne!(a, b);
        assert_eq!(notifier.notify(), vec![a, b]);
    }

    #[test]
    fn test_unsubscribe_once() {
        let mut notifier = ResizeNotifier::new();
        let a = notifier.subscribe();
        assert!(notifier.unsubscribe(a));
        assert!(!notifier.unsubscribe(a));
        assert!(!notifier.is_subscribed(a));
        assert!(notifier.notify().is_empty());
    }
}
