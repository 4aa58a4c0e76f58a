use crate::types::{Hit, ReportPolicy};
use crate::MAX_HITS;

/// Hits left to report once a sequence has been scanned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedHits {
    pub hits: Vec<Hit>,
    /// Hits refused because the collect-all buffer was full
    pub dropped: usize,
}

/// Applies a [`ReportPolicy`] to the hits of one sequence at a time.
///
/// Call [`offer`](HitCollector::offer) for each hit in scan order, then
/// [`finish`](HitCollector::finish) at the end of the sequence, which also
/// clears the state for the next one.
#[derive(Debug, Clone)]
pub struct HitCollector {
    policy: ReportPolicy,
    capacity: usize,
    buffer: Vec<Hit>,
    best: Option<Hit>,
    dropped: usize,
}

impl HitCollector {
    pub fn new(policy: ReportPolicy) -> Self {
        Self::with_capacity(policy, MAX_HITS)
    }

    /// Collector whose collect-all buffer holds at most `capacity` hits
    pub fn with_capacity(policy: ReportPolicy, capacity: usize) -> Self {
        HitCollector {
            policy,
            capacity,
            buffer: Vec::new(),
            best: None,
            dropped: 0,
        }
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// Takes one hit. Returns it back when it should be reported right away.
    pub fn offer(&mut self, hit: Hit) -> Option<Hit> {
        match self.policy {
            ReportPolicy::EmitEachHit => Some(hit),
            ReportPolicy::CollectAll => {
                if self.buffer.len() < self.capacity {
                    self.buffer.push(hit);
                } else {
                    self.dropped += 1;
                }
                None
            }
            ReportPolicy::BestOnly => {
                // ties keep the earlier hit
                match self.best {
                    Some(best) if hit.score <= best.score => {}
                    _ => self.best = Some(hit),
                }
                None
            }
        }
    }

    /// Hits to report at the end of the sequence
    pub fn finish(&mut self) -> CollectedHits {
        let hits = match self.policy {
            ReportPolicy::EmitEachHit => Vec::new(),
            ReportPolicy::CollectAll => std::mem::take(&mut self.buffer),
            ReportPolicy::BestOnly => self.best.take().into_iter().collect(),
        };
        CollectedHits {
            hits,
            dropped: std::mem::take(&mut self.dropped),
        }
    }
}
