//! Collection side-channel buffers.
//!
//! Data gathered during an attempt sits in `attempt` until the attempt
//! concludes. On success it moves to `ready`, where it waits for the parent
//! (or the driver) to drain it; on failure it is dropped. Keeping the two
//! apart lets a rule reset its evaluation state the moment it finishes
//! without losing what it collected.

use std::mem;

use gds_ir::Collected;

use super::{Rule, RuleShape};

#[derive(Debug)]
pub(crate) struct CollectBuffer<P> {
    enabled: bool,
    attempt: Vec<Collected<P>>,
    ready: Vec<Collected<P>>,
}

impl<P> Default for CollectBuffer<P> {
    fn default() -> Self {
        CollectBuffer {
            enabled: false,
            attempt: Vec::new(),
            ready: Vec::new(),
        }
    }
}

impl<P> CollectBuffer<P> {
    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning collection off drops anything buffered.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Record one entry for the current attempt.
    #[inline]
    pub(crate) fn record(&mut self, entry: Collected<P>) {
        if self.enabled {
            self.attempt.push(entry);
        }
    }

    /// Drain a finished child and record what it contributes.
    ///
    /// A leaf contributes its payload directly; any composite contributes
    /// its whole list as one group.
    pub(crate) fn record_child(&mut self, child: &mut dyn Rule<P>) {
        if !self.enabled {
            return;
        }
        let drained = child.collect();
        if child.shape() == RuleShape::Leaf {
            self.attempt.extend(drained);
        } else {
            self.attempt.push(Collected::Group(drained));
        }
    }

    /// The attempt succeeded: publish its data.
    pub(crate) fn conclude(&mut self) {
        if self.ready.is_empty() {
            self.ready = mem::take(&mut self.attempt);
        } else {
            self.ready.append(&mut self.attempt);
        }
    }

    /// The attempt failed: drop its data.
    #[inline]
    pub(crate) fn discard(&mut self) {
        self.attempt.clear();
    }

    pub(crate) fn clear(&mut self) {
        self.attempt.clear();
        self.ready.clear();
    }

    pub(crate) fn drain(&mut self) -> Vec<Collected<P>> {
        mem::take(&mut self.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn disabled_buffer_records_nothing() {
        let mut buffer: CollectBuffer<u32> = CollectBuffer::default();
        buffer.record(Collected::Item(1));
        buffer.conclude();
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn conclude_publishes_and_discard_drops() {
        let mut buffer = CollectBuffer::default();
        buffer.set_enabled(true);

        buffer.record(Collected::Item(1));
        buffer.conclude();
        buffer.record(Collected::Item(2));
        buffer.discard();
        buffer.record(Collected::Item(3));
        buffer.conclude();

        assert_eq!(buffer.drain(), vec![Collected::Item(1), Collected::Item(3)]);
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn disabling_clears_buffered_data() {
        let mut buffer = CollectBuffer::default();
        buffer.set_enabled(true);
        buffer.record(Collected::Item(1));
        buffer.conclude();
        buffer.set_enabled(false);
        buffer.set_enabled(true);
        assert!(buffer.drain().is_empty());
    }
}
