//! Mergeable summary of numeric observations

/// Sum, max, min and count over a set of observations.
///
/// The average is derived from `sum / count` on read and never stored.
/// An aggregate with `count == 0` is the identity under [`Aggregate::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub sum: f64,
    pub max: f64,
    pub min: f64,
    pub count: u64,
}

impl Aggregate {
    /// The empty aggregate. All fields are zero.
    pub const fn identity() -> Self {
        Self {
            sum: 0.0,
            max: 0.0,
            min: 0.0,
            count: 0,
        }
    }

    /// Aggregate of exactly one observation.
    pub const fn single(value: f64) -> Self {
        Self {
            sum: value,
            max: value,
            min: value,
            count: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Combine two aggregates. Associative and commutative.
    ///
    /// An empty side contributes nothing, so its zeroed min/max are never
    /// compared against real observations.
    pub fn merge(self, other: Aggregate) -> Aggregate {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        Aggregate {
            sum: self.sum + other.sum,
            max: nan_or(self.max, other.max, f64::max),
            min: nan_or(self.min, other.min, f64::min),
            count: self.count + other.count,
        }
    }

    /// Fold the observation `value` into this aggregate.
    pub fn observe(self, value: f64) -> Aggregate {
        self.merge(Aggregate::single(value))
    }

    pub fn merge_all<I>(aggregates: I) -> Aggregate
    where
        I: IntoIterator<Item = Aggregate>,
    {
        aggregates
            .into_iter()
            .fold(Aggregate::identity(), Aggregate::merge)
    }
}

/// `f64::max`/`f64::min` return the non-NaN operand; extremes must carry NaN.
fn nan_or(a: f64, b: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        pick(a, b)
    }
}
