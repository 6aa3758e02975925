use std::num::NonZeroUsize;

use super::color::{color_sample, ColorSample, DampingSeries};

/// Default color-attachment budget per pass.
///
/// The device limit may be higher; `DeviceInit::max_targets_per_pass` clamps
/// the configured value against the adapter.
pub const MAX_TARGETS_PER_PASS: usize = 4;

/// One target inside a batch, with its position in the full target list and
/// the color it is cleared to this frame.
#[derive(Debug)]
pub struct BatchEntry<'t, T> {
    pub index: usize,
    pub target: &'t T,
    pub color: ColorSample,
}

impl<T> Clone for BatchEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BatchEntry<'_, T> {}

/// Ordered, non-empty group of at most `max_per_pass` targets.
///
/// Built and consumed inside one frame; holds borrows into that frame's
/// target list.
#[derive(Debug)]
pub struct Batch<'t, T> {
    entries: Vec<BatchEntry<'t, T>>,
}

impl<'t, T> Batch<'t, T> {
    #[inline]
    pub fn entries(&self) -> &[BatchEntry<'t, T>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for batches produced by [`partition`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &'t T> + '_ {
        self.entries.iter().map(|e| e.target)
    }

    /// Index range this batch covers in the full target list.
    pub fn span(&self) -> std::ops::Range<usize> {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }
}

/// Receives each batch as soon as it is closed.
///
/// The GPU implementation records one render pass per call, with one cleared
/// color attachment per entry.
pub trait BatchSink<T> {
    fn emit(&mut self, batch: &Batch<'_, T>);
}

impl<T, F> BatchSink<T> for F
where
    F: FnMut(&Batch<'_, T>),
{
    fn emit(&mut self, batch: &Batch<'_, T>) {
        self(batch)
    }
}

/// Splits `targets` into contiguous batches of at most `max_per_pass`,
/// assigning each target its color for time `elapsed`.
///
/// The damping factor advances once per target across batch boundaries.
/// A trailing group smaller than the limit is still returned, so every target
/// is serviced every frame.
pub fn partition<T>(targets: &[T], elapsed: f64, max_per_pass: NonZeroUsize) -> Vec<Batch<'_, T>> {
    let max = max_per_pass.get();
    let mut batches = Vec::with_capacity(targets.len().div_ceil(max));
    let mut open: Vec<BatchEntry<'_, T>> = Vec::with_capacity(max);

    for ((index, target), damping) in targets.iter().enumerate().zip(DampingSeries::new()) {
        open.push(BatchEntry {
            index,
            target,
            color: color_sample(elapsed, damping),
        });

        if open.len() == max {
            batches.push(Batch {
                entries: std::mem::replace(&mut open, Vec::with_capacity(max)),
            });
        }
    }

    if !open.is_empty() {
        batches.push(Batch { entries: open });
    }

    batches
}

/// Partitions `targets` and hands every batch to `sink`, in order.
///
/// Returns the number of batches emitted (`ceil(targets.len() / max_per_pass)`).
pub fn partition_and_emit<T, S>(
    targets: &[T],
    elapsed: f64,
    max_per_pass: NonZeroUsize,
    sink: &mut S,
) -> usize
where
    S: BatchSink<T> + ?Sized,
{
    let batches = partition(targets, elapsed, max_per_pass);
    for batch in &batches {
        sink.emit(batch);
    }
    batches.len()
}
