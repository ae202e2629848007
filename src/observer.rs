//! Intersection math for sections measured in document coordinates.
//!
//! Mirrors what an `IntersectionObserver` rooted at the viewport reports: the
//! viewport band is grown or shrunk by a root margin, and a target's ratio is
//! the share of its own height that falls inside that band.

/// Vertical extent of an element in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    pub fn contains(self, offset: f64) -> bool {
        offset >= self.top && offset <= self.bottom()
    }
}

/// The visible window: scroll offset plus viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self {
            scroll_y,
            height: height.max(0.0),
        }
    }

    pub fn center(self) -> f64 {
        self.scroll_y + self.height / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginValue {
    Px(f64),
    Percent(f64),
}

impl MarginValue {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(value) => value,
            Self::Percent(value) => basis * value / 100.0,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(value) = raw.strip_suffix("px") {
            return value.trim().parse::<f64>().ok().map(Self::Px);
        }
        if let Some(value) = raw.strip_suffix('%') {
            return value.trim().parse::<f64>().ok().map(Self::Percent);
        }
        match raw.parse::<f64>() {
            Ok(value) if value == 0.0 => Some(Self::Px(0.0)),
            _ => None,
        }
    }
}

/// CSS `rootMargin`. Positive values grow the band, negative values shrink it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: MarginValue::Px(0.0),
        right: MarginValue::Px(0.0),
        bottom: MarginValue::Px(0.0),
        left: MarginValue::Px(0.0),
    };

    /// Parses the 1 to 4 value shorthand, e.g. `"-20% 0px -20% 0px"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let values = raw
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<Option<Vec<_>>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return None,
        };

        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Document-space band the targets are tested against.
    pub fn band(&self, viewport: Viewport) -> Span {
        let top = viewport.scroll_y - self.top.resolve(viewport.height);
        let bottom =
            viewport.scroll_y + viewport.height + self.bottom.resolve(viewport.height);
        Span::new(top, bottom - top)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    /// Reveal-on-scroll: a tenth of the element visible, ignoring the bottom 50px.
    pub const REVEAL: Self = Self {
        threshold: 0.1,
        root_margin: RootMargin {
            bottom: MarginValue::Px(-50.0),
            ..RootMargin::ZERO
        },
    };

    /// Active-section tracking: half the element inside the middle 60% of the viewport.
    pub const CENTERED: Self = Self {
        threshold: 0.5,
        root_margin: RootMargin {
            top: MarginValue::Percent(-20.0),
            bottom: MarginValue::Percent(-20.0),
            ..RootMargin::ZERO
        },
    };

    pub fn is_satisfied(&self, target: Span, viewport: Viewport) -> bool {
        let band = self.root_margin.band(viewport);
        intersects(target, band) && intersection_ratio(target, band) >= self.threshold
    }
}

fn intersects(target: Span, band: Span) -> bool {
    if target.height == 0.0 {
        return band.contains(target.top);
    }
    target.top < band.bottom() && target.bottom() > band.top
}

pub fn intersection_ratio(target: Span, band: Span) -> f64 {
    if target.height == 0.0 {
        return if band.contains(target.top) { 1.0 } else { 0.0 };
    }

    let overlap = target.bottom().min(band.bottom()) - target.top.max(band.top);
    (overlap.max(0.0) / target.height).clamp(0.0, 1.0)
}
