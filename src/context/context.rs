use crate::error::ContextError;
use std::any::{Any, TypeId};
use std::cell::RefCell;

struct Provided {
    type_id: TypeId,
    value: Box<dyn Any>,
}

// Thread-local stack of provided values; innermost last.
thread_local! {
    static PROVIDED: RefCell<Vec<Provided>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame pushed by `provide`, also on unwind.
struct Frame;

impl Drop for Frame {
    fn drop(&mut self) {
        PROVIDED.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Make `value` available to [`use_context`] calls made on this thread while
/// `f` runs.
///
/// A nested `provide` of the same type shadows the outer value until it
/// returns.
///
/// # Examples
///
/// ```
/// use reservoir::context::{provide, use_context};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Theme(&'static str);
///
/// fn button_label() -> String {
///     let theme = use_context::<Theme>().unwrap();
///     format!("[{}]", theme.0)
/// }
///
/// let label = provide(Theme("dark"), button_label);
/// assert_eq!(label, "[dark]");
/// assert!(use_context::<Theme>().is_err());
/// ```
pub fn provide<T, F, R>(value: T, f: F) -> R
where
    T: Clone + 'static,
    F: FnOnce() -> R,
{
    PROVIDED.with(|stack| {
        stack.borrow_mut().push(Provided {
            type_id: TypeId::of::<T>(),
            value: Box::new(value),
        });
    });
    let _frame = Frame;

    f()
}

/// The innermost value of type `T` provided on this thread, if any.
pub fn try_use_context<T>() -> Option<T>
where
    T: Clone + 'static,
{
    PROVIDED.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .find(|provided| provided.type_id == TypeId::of::<T>())
            .and_then(|provided| provided.value.downcast_ref::<T>())
            .cloned()
    })
}

/// Like [`try_use_context`], but a missing provider is an error.
pub fn use_context<T>() -> Result<T, ContextError>
where
    T: Clone + 'static,
{
    try_use_context::<T>().ok_or(ContextError::Missing {
        type_name: std::any::type_name::<T>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Store};

    #[derive(Clone, Debug, PartialEq)]
    struct Locale(&'static str);

    #[derive(Clone, Debug, PartialEq)]
    struct Depth(u8);

    #[test]
    fn inner_provider_shadows_outer() {
        provide(Locale("en"), || {
            assert_eq!(use_context::<Locale>(), Ok(Locale("en")));
            provide(Locale("fr"), || {
                assert_eq!(use_context::<Locale>(), Ok(Locale("fr")));
            });
            assert_eq!(use_context::<Locale>(), Ok(Locale("en")));
        });
        assert_eq!(try_use_context::<Locale>(), None);
    }

    #[test]
    fn providers_are_keyed_by_type() {
        provide(Locale("de"), || {
            provide(Depth(2), || {
                assert_eq!(use_context::<Locale>(), Ok(Locale("de")));
                assert_eq!(use_context::<Depth>(), Ok(Depth(2)));
            });
        });
    }

    #[test]
    fn missing_context_names_the_type() {
        let err = use_context::<Depth>().unwrap_err();
        assert!(err.to_string().contains("Depth"));
    }

    #[test]
    fn provider_frame_popped_on_panic() {
        let outcome = std::panic::catch_unwind(|| {
            provide(Depth(9), || panic!("render failed"));
        });
        assert!(outcome.is_err());
        assert_eq!(try_use_context::<Depth>(), None);
    }

    #[test]
    fn context_not_visible_on_other_threads() {
        provide(Depth(1), || {
            let seen = std::thread::spawn(try_use_context::<Depth>).join().unwrap();
            assert_eq!(seen, None);
        });
    }

    #[test]
    fn provided_store_is_shared() {
        #[derive(Debug)]
        struct Bump;

        impl Action for Bump {
            fn kind(&self) -> &str {
                "BUMP"
            }
        }

        let store = Store::new(0u32, |n: &u32, _: &Bump| n + 1);

        provide(store.clone(), || {
            let nested = use_context::<Store<u32, Bump>>().unwrap();
            nested.dispatch(Bump).unwrap();
        });

        assert_eq!(*store.get_state(), 1);
    }
}
