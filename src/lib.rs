#![no_std]

#[cfg(test)]
extern crate alloc;

use core::fmt;
use core::ops::Range;

use log::{debug, trace};
use once_cell::unsync::OnceCell;
use thiserror::Error;

/// Trim a sequence: the direct form of the adaptor.
///
/// Equivalent to `TrimView::new(sequence.into_iter(), predicate)`. No element is inspected until
/// the view is first asked for its bounds or iterated.
pub fn trim<S, P>(sequence: S, predicate: P) -> TrimView<S::IntoIter, P>
where
    S: IntoIterator,
    P: Fn(&S::Item) -> bool,
{
    TrimView::new(sequence.into_iter(), predicate)
}

/// Trait which allows one to create a trimmed view directly from an existing iterator.
pub trait CreateTrimView: Iterator + Sized {
    /// Create a view over this iterator without the leading and trailing elements for which
    /// `predicate` holds.
    fn trim_view<P>(self, predicate: P) -> TrimView<Self, P>
    where
        P: Fn(&Self::Item) -> bool;

    /// Apply a previously built [`Trimmer`] to this iterator.
    fn trim_with<P>(self, trimmer: &Trimmer<P>) -> TrimView<Self, P>
    where
        P: Fn(&Self::Item) -> bool + Clone;
}

impl<I: Iterator> CreateTrimView for I {
    fn trim_view<P>(self, predicate: P) -> TrimView<I, P>
    where
        P: Fn(&I::Item) -> bool,
    {
        TrimView::new(self, predicate)
    }

    fn trim_with<P>(self, trimmer: &Trimmer<P>) -> TrimView<I, P>
    where
        P: Fn(&I::Item) -> bool + Clone,
    {
        trimmer.apply(self)
    }
}

/// A trimming rule which is not yet bound to a sequence.
///
/// The rule can be applied to any number of sequences; each application copies the predicate
/// into the resulting view.
#[derive(Debug, Clone, Copy)]
pub struct Trimmer<P> {
    predicate: P,
}

impl<P> Trimmer<P> {
    pub fn new(predicate: P) -> Self {
        Trimmer { predicate }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Bind this rule to a sequence.
    pub fn apply<S>(&self, sequence: S) -> TrimView<S::IntoIter, P>
    where
        S: IntoIterator,
        P: Fn(&S::Item) -> bool + Clone,
    {
        trim(sequence, self.predicate.clone())
    }

    /// Bind this rule to a sequence, rejecting sequences which claim to be unbounded.
    /// See [`TrimView::try_new`].
    pub fn try_apply<S>(&self, sequence: S) -> Result<TrimView<S::IntoIter, P>, TrimError>
    where
        S: IntoIterator,
        P: Fn(&S::Item) -> bool + Clone,
    {
        TrimView::try_new(sequence.into_iter(), self.predicate.clone())
    }
}

/// Errors raised by the checked constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TrimError {
    /// The base iterator reports a size hint of `(usize::MAX, None)`. The leading scan over such
    /// an iterator may never terminate.
    #[error("cannot trim an unbounded sequence")]
    Unbounded,
}

/// How many elements were removed from either end of the base sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TrimBounds {
    pub leading: usize,
    pub trailing: usize,
}

/// Result of the one-time scan: the base iterator with both ends moved inwards.
#[derive(Debug, Clone)]
struct Trimmed<I> {
    iter: I,
    bounds: TrimBounds,
    empty: bool,
}

/// A lazy view over a sequence without its leading and trailing elements which satisfy a
/// predicate.
///
/// The view is cheap to create. The trimmed bounds are computed on the first call to
/// [`bounds`](TrimView::bounds), [`iter`](TrimView::iter), [`len`](TrimView::len) or any other
/// accessor which needs them, and are cached afterwards. Only the trimmed runs (plus one element
/// at each end) are ever inspected.
///
/// The base iterator is used as a cursor: it is cloned to probe elements without consuming them,
/// so a clone must yield the same elements as the original. The predicate must be a pure function
/// of the element; a predicate whose answer changes between calls gives unspecified bounds.
///
/// The cache is not synchronised; a `TrimView` is not `Sync`.
#[derive(Clone)]
pub struct TrimView<I, P> {
    /// Full, untrimmed sequence. Never advanced by the view itself.
    base: I,

    predicate: P,

    /// Empty until the view is evaluated.
    trimmed: OnceCell<Trimmed<I>>,
}

impl<I, P> TrimView<I, P>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
{
    pub fn new(base: I, predicate: P) -> Self {
        TrimView {
            base,
            predicate,
            trimmed: OnceCell::new(),
        }
    }

    /// Like [`TrimView::new`], but rejects a base which reports itself as unbounded through its
    /// size hint, such as `0..` or `core::iter::repeat(x)`.
    ///
    /// Iterators which are infinite but report a finite-looking size hint are not detected.
    pub fn try_new(base: I, predicate: P) -> Result<Self, TrimError> {
        match base.size_hint() {
            (usize::MAX, None) => {
                debug!("refusing to trim a sequence with an unbounded size hint");
                Err(TrimError::Unbounded)
            }
            _ => Ok(Self::new(base, predicate)),
        }
    }
}

impl<I, P> TrimView<I, P> {
    /// A copy of the base sequence, including the elements which are trimmed in this view.
    pub fn base(&self) -> I
    where
        I: Clone,
    {
        self.base.clone()
    }

    /// Consume the view and return the base sequence.
    pub fn into_base(self) -> I {
        self.base
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Whether the bounds have been computed already. Does not trigger the computation.
    pub fn is_evaluated(&self) -> bool {
        self.trimmed.get().is_some()
    }
}

impl<I, P> TrimView<I, P>
where
    I: DoubleEndedIterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    fn trimmed(&self) -> &Trimmed<I> {
        self.trimmed
            .get_or_init(|| scan(self.base.clone(), &self.predicate))
    }

    /// The number of elements trimmed from the front and from the back.
    pub fn bounds(&self) -> TrimBounds {
        self.trimmed().bounds
    }

    /// An iterator over the elements which remain after trimming.
    ///
    /// Every call returns a fresh iterator starting at the trimmed front; only the first call
    /// scans the base.
    pub fn iter(&self) -> I {
        self.trimmed().iter.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().empty
    }
}

impl<I, P> TrimView<I, P>
where
    I: ExactSizeIterator + DoubleEndedIterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    /// Number of elements in view.
    pub fn len(&self) -> usize {
        self.trimmed().iter.len()
    }

    /// Index of the first element in view, relative to the start of the base.
    pub fn start(&self) -> usize {
        self.bounds().leading
    }

    /// Index one past the last element in view, relative to the start of the base.
    pub fn end(&self) -> usize {
        self.base.len() - self.bounds().trailing
    }

    /// The trimmed bounds as a range of indices into the base.
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Move the front of `iter` past the leading run, then the back past the trailing run.
///
/// The trailing phase works on the iterator left by the leading phase, so it can never move
/// past the trimmed front.
fn scan<I, P>(mut iter: I, predicate: &P) -> Trimmed<I>
where
    I: DoubleEndedIterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    let mut leading = 0;
    loop {
        let mut probe = iter.clone();
        match probe.next() {
            Some(ref item) if predicate(item) => {
                iter = probe;
                leading += 1;
            }
            _ => break,
        }
    }

    let mut trailing = 0;
    let empty = loop {
        let mut probe = iter.clone();
        match probe.next_back() {
            Some(ref item) if predicate(item) => {
                iter = probe;
                trailing += 1;
            }
            Some(_) => break false,
            None => break true,
        }
    };

    trace!(
        "trimmed {} leading and {} trailing elements",
        leading,
        trailing
    );

    Trimmed {
        iter,
        bounds: TrimBounds { leading, trailing },
        empty,
    }
}

impl<I, P> IntoIterator for TrimView<I, P>
where
    I: DoubleEndedIterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        let TrimView {
            base,
            predicate,
            trimmed,
        } = self;

        match trimmed.into_inner() {
            Some(trimmed) => trimmed.iter,
            None => scan(base, &predicate).iter,
        }
    }
}

impl<'a, I, P> IntoIterator for &'a TrimView<I, P>
where
    I: DoubleEndedIterator + Clone,
    P: Fn(&I::Item) -> bool,
{
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.iter()
    }
}

impl<I: fmt::Debug, P> fmt::Debug for TrimView<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrimView")
            .field("base", &self.base)
            .field("bounds", &self.trimmed.get().map(|t| t.bounds))
            .finish_non_exhaustive()
    }
}
