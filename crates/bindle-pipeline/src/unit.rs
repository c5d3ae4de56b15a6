//! The processing unit interface.

use async_trait::async_trait;

/// An opaque transform over a stream of items.
///
/// Units receive items one at a time and may emit zero or more items each
/// (filter, expand, convert, sink-and-passthrough). Once the input is
/// exhausted, [`Unit::flush`] is called exactly once per run so buffering
/// units can emit whatever they accumulated.
///
/// # Re-runnability
///
/// A pipeline may be driven multiple times (watch mode re-runs the same unit
/// set against each fresh input snapshot). Units must therefore drain any
/// internal state in `flush` so the next run starts clean.
#[async_trait]
pub trait Unit<T: Send + 'static>: Send {
    /// Short name used in error reports and logs.
    fn name(&self) -> &str {
        "unit"
    }

    /// Process one item, producing zero or more output items.
    async fn process(&mut self, item: T) -> anyhow::Result<Vec<T>>;

    /// Called after the last input item; emits any buffered tail.
    async fn flush(&mut self) -> anyhow::Result<Vec<T>> {
        Ok(Vec::new())
    }
}

/// A unit backed by a plain closure.
///
/// Handy for small inline transforms and for tests. The closure maps one
/// item to its outputs; `FnUnit` has no buffered state, so flush is a no-op.
pub struct FnUnit<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<T, F> Unit<T> for FnUnit<F>
where
    T: Send + 'static,
    F: FnMut(T) -> anyhow::Result<Vec<T>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&mut self, item: T) -> anyhow::Result<Vec<T>> {
        (self.f)(item)
    }
}

/// Wrap a closure as a named [`Unit`].
pub fn unit_fn<T, F>(name: impl Into<String>, f: F) -> FnUnit<F>
where
    T: Send + 'static,
    F: FnMut(T) -> anyhow::Result<Vec<T>> + Send,
{
    FnUnit {
        name: name.into(),
        f,
    }
}
