use std::borrow::Borrow;
use std::convert::Infallible;
use std::marker::PhantomData;

/// Computes the next state from the current state and an action.
///
/// Implementations must be deterministic and free of side effects. Actions a
/// reducer does not handle should return a clone of the current state rather
/// than an error.
///
/// Plain closures `Fn(&S, &A) -> S` are reducers that cannot fail. Use
/// [`fallible`] to wrap a closure that returns `Result`.
pub trait Reducer<S, A> {
    type Error;

    fn reduce(&self, state: &S, action: &A) -> Result<S, Self::Error>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S,
{
    type Error = Infallible;

    fn reduce(&self, state: &S, action: &A) -> Result<S, Infallible> {
        Ok(self(state, action))
    }
}

/// A reducer built from a closure returning `Result`. See [`fallible`].
pub struct Fallible<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

impl<S, A, E, F> Reducer<S, A> for Fallible<F, E>
where
    F: Fn(&S, &A) -> Result<S, E>,
{
    type Error = E;

    fn reduce(&self, state: &S, action: &A) -> Result<S, E> {
        (self.f)(state, action)
    }
}

/// Wrap a closure that may reject a transition.
///
/// # Example
///
/// ```
/// use reservoir::{fallible, Reducer};
///
/// let checked = fallible(|n: &u8, by: &u8| n.checked_add(*by).ok_or("overflow"));
/// assert_eq!(checked.reduce(&250, &5), Ok(255));
/// assert_eq!(checked.reduce(&250, &6), Err("overflow"));
/// ```
pub fn fallible<S, A, E, F>(f: F) -> Fallible<F, E>
where
    F: Fn(&S, &A) -> Result<S, E>,
{
    Fallible {
        f,
        _error: PhantomData,
    }
}

/// Fold `actions` over `initial` with `reducer`, stopping at the first error.
///
/// A store that starts from `initial` and is dispatched the same actions in
/// the same order ends in the state this returns.
pub fn replay<S, A, R, I>(initial: S, reducer: &R, actions: I) -> Result<S, R::Error>
where
    R: Reducer<S, A> + ?Sized,
    I: IntoIterator,
    I::Item: Borrow<A>,
{
    actions
        .into_iter()
        .try_fold(initial, |state, action| reducer.reduce(&state, action.borrow()))
}
