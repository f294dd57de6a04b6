use crate::models::OrderStatus;

/// The allowed status transitions:
/// Pending -> Processing -> Shipped -> Delivered, with Cancelled reachable
/// from Pending or Processing only.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Processing)
            | (Processing, Shipped)
            | (Shipped, Delivered)
            | (Pending, Cancelled)
            | (Processing, Cancelled)
    )
}

pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Delivered | OrderStatus::Cancelled)
}

/// Cancellation has its own gate because it also restores stock.
pub fn is_cancellable(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Processing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_chain_allowed() {
        assert!(can_transition(Pending, Processing));
        assert!(can_transition(Processing, Shipped));
        assert!(can_transition(Shipped, Delivered));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!can_transition(Pending, Shipped));
        assert!(!can_transition(Shipped, Processing));
        assert!(!can_transition(Delivered, Pending));
    }

    #[test]
    fn test_cancel_only_early() {
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Processing, Cancelled));
        assert!(!can_transition(Shipped, Cancelled));
        assert!(!can_transition(Delivered, Cancelled));
        assert!(!can_transition(Cancelled, Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal(Delivered));
        assert!(is_terminal(Cancelled));
        assert!(!is_terminal(Shipped));
    }
}
