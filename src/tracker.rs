use crate::observer::{ObserverOptions, Span, Viewport};

/// One-shot reveal flags. Once a region is revealed it stays revealed.
#[derive(Clone, Debug)]
pub struct RevealSet {
    options: ObserverOptions,
    revealed: Vec<bool>,
}

impl RevealSet {
    pub fn new(len: usize, options: ObserverOptions) -> Self {
        Self {
            options,
            revealed: vec![false; len],
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Returns the indices revealed by this pass only. Spans beyond the tracked
    /// count are ignored; missing spans (`None`) never reveal.
    pub fn evaluate(&mut self, spans: &[Option<Span>], viewport: Viewport) -> Vec<usize> {
        let mut newly_revealed = Vec::new();

        for (index, span) in spans.iter().enumerate().take(self.revealed.len()) {
            let Some(span) = span else {
                continue;
            };
            if self.is_revealed(index) || !self.options.is_satisfied(*span, viewport) {
                continue;
            }

            self.revealed[index] = true;
            newly_revealed.push(index);
        }

        newly_revealed
    }
}

#[derive(Clone, Debug)]
struct ObservedRegion {
    id: Option<String>,
    span: Option<Span>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerPass {
    /// Regions revealed for the first time during this pass.
    pub revealed: Vec<usize>,
    /// Regions that met the centered condition, in source order.
    pub candidates: Vec<usize>,
    /// Selection after the pass. Unchanged from the previous pass when there
    /// were no candidates.
    pub current: Option<usize>,
}

impl TrackerPass {
    pub fn selection_ran(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Tracks page sections against the viewport: which ones have been revealed
/// and which single one is current.
#[derive(Clone, Debug)]
pub struct ViewportTracker {
    regions: Vec<ObservedRegion>,
    reveal: RevealSet,
    centered: ObserverOptions,
    current: Option<usize>,
}

impl ViewportTracker {
    pub fn new(
        ids: Vec<Option<String>>,
        reveal: ObserverOptions,
        centered: ObserverOptions,
    ) -> Self {
        let reveal = RevealSet::new(ids.len(), reveal);
        let regions = ids
            .into_iter()
            .map(|id| ObservedRegion { id, span: None })
            .collect();

        Self {
            regions,
            reveal,
            centered,
            current: None,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current
            .and_then(|index| self.regions.get(index))
            .and_then(|region| region.id.as_deref())
    }

    /// Re-reads every region's span; regions the callback cannot measure are
    /// skipped by later passes.
    pub fn refresh_geometry(&mut self, mut measure: impl FnMut(usize) -> Option<Span>) {
        for (index, region) in self.regions.iter_mut().enumerate() {
            region.span = measure(index);
        }
    }

    pub fn evaluate(&mut self, viewport: Viewport) -> TrackerPass {
        let spans = self
            .regions
            .iter()
            .map(|region| region.span)
            .collect::<Vec<_>>();
        let revealed = self.reveal.evaluate(&spans, viewport);

        let mut candidates = Vec::new();
        for (index, span) in spans.iter().enumerate() {
            let Some(span) = span else {
                continue;
            };
            if self.centered.is_satisfied(*span, viewport) {
                candidates.push(index);
                self.current = Some(index);
            }
        }

        TrackerPass {
            revealed,
            candidates,
            current: self.current,
        }
    }
}

/// Nav href that marks `id` as active, e.g. `#contact`.
pub fn indicator_href(id: &str) -> String {
    format!("#{id}")
}
