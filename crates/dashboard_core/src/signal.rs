/// Token that changes on every successful upload so the dashboard embed reloads.
///
/// `Unset` sorts before every stamp; stamps only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RefreshSignal {
    #[default]
    Unset,
    /// Milliseconds since the Unix epoch, bumped when the clock does not move forward.
    Stamp(u64),
}

impl RefreshSignal {
    pub fn stamp(&self) -> Option<u64> {
        match self {
            RefreshSignal::Unset => None,
            RefreshSignal::Stamp(stamp) => Some(*stamp),
        }
    }

    /// Next signal value given the time an upload completed.
    ///
    /// Always strictly greater than `self`, even if `observed_ms` is stale.
    pub fn advance(self, observed_ms: u64) -> Self {
        let floor = match self {
            RefreshSignal::Unset => 0,
            RefreshSignal::Stamp(previous) => previous.saturating_add(1),
        };
        RefreshSignal::Stamp(observed_ms.max(floor))
    }
}
