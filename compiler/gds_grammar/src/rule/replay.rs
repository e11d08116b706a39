//! Pending-token queue shared by the composite rules.
//!
//! A composite keeps the tokens it has been offered but not yet handed to
//! a child in a `ReplayQueue`. Tokens a child returns for replay go back on
//! the front, ahead of anything still waiting, so the next child sees them
//! in their original input order.

use std::collections::VecDeque;

use gds_ir::Token;

use crate::outcome::TokenQueue;

#[derive(Debug)]
pub(crate) struct ReplayQueue<P>(VecDeque<Token<P>>);

impl<P> Default for ReplayQueue<P> {
    fn default() -> Self {
        ReplayQueue(VecDeque::new())
    }
}

impl<P> ReplayQueue<P> {
    /// Enqueue a token offered from outside.
    #[inline]
    pub(crate) fn push_back(&mut self, token: Token<P>) {
        self.0.push_back(token);
    }

    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<Token<P>> {
        self.0.pop_front()
    }

    /// Put `tokens` back on the front, keeping their relative order.
    pub(crate) fn requeue_front<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token<P>>,
        I::IntoIter: DoubleEndedIterator,
    {
        for token in tokens.into_iter().rev() {
            self.0.push_front(token);
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empty the queue into an outcome queue, front first.
    pub(crate) fn take_all(&mut self) -> TokenQueue<P> {
        self.0.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gds_ir::Kind;
    use pretty_assertions::assert_eq;

    fn tok(id: u32) -> Token<u32> {
        Token::new(Kind::new(0), id)
    }

    fn ids(queue: &mut ReplayQueue<u32>) -> Vec<u32> {
        queue.take_all().into_iter().map(Token::into_payload).collect()
    }

    #[test]
    fn requeue_front_preserves_order_ahead_of_waiting_tokens() {
        let mut queue = ReplayQueue::default();
        queue.push_back(tok(4));
        queue.push_back(tok(5));
        queue.requeue_front(vec![tok(1), tok(2), tok(3)]);
        assert_eq!(ids(&mut queue), vec![1, 2, 3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_front_drains_in_order() {
        let mut queue = ReplayQueue::default();
        queue.push_back(tok(1));
        queue.requeue_front([tok(0)]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front().map(Token::into_payload), Some(0));
        assert_eq!(queue.pop_front().map(Token::into_payload), Some(1));
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn requeue_of_nothing_is_noop() {
        let mut queue = ReplayQueue::default();
        queue.push_back(tok(7));
        queue.requeue_front(Vec::new());
        assert_eq!(ids(&mut queue), vec![7]);
    }
}
