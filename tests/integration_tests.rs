//! Integration tests for Reservoir

use parking_lot::Mutex;
use reservoir::context::{provide, use_context};
use reservoir::{
    fallible, replay, Action, DispatchError, LoggingMiddleware, NotifyPolicy, ReentrancyPolicy,
    StateCell, Store, StoreConfig, TaggedAction,
};
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn counter_reducer(state: &i64, action: &TaggedAction) -> i64 {
    match action.kind() {
        "INCREMENT" => state + 1,
        _ => *state,
    }
}

fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl Fn() + Send + Sync {
    let log = log.clone();
    move || log.lock().push(name)
}

#[test]
fn counter_walkthrough() {
    let store = Store::new(0, counter_reducer);

    // Scenario 1: a handled action advances the state.
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(*store.get_state(), 1);

    // Scenario 2: an unhandled action is an identity transition.
    store.dispatch(TaggedAction::new("DECREMENT")).unwrap();
    assert_eq!(*store.get_state(), 1);

    // Scenario 3: a subscriber sees exactly one call per dispatch.
    let log = Arc::new(Mutex::new(Vec::new()));
    let l1 = store.subscribe(recorder(&log, "L1"));
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(*log.lock(), vec!["L1"]);
    assert_eq!(*store.get_state(), 2);

    // Scenario 4: after unsubscribing, nothing more arrives.
    assert!(l1.unsubscribe());
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(*log.lock(), vec!["L1"]);
    assert_eq!(*store.get_state(), 3);
}

#[test]
fn subscribers_run_in_registration_order() {
    let store = Store::new(0, counter_reducer);
    let log = Arc::new(Mutex::new(Vec::new()));
    let _l1 = store.subscribe(recorder(&log, "L1"));
    let _l2 = store.subscribe(recorder(&log, "L2"));

    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();

    assert_eq!(*log.lock(), vec!["L1", "L2"]);
}

#[test]
fn same_listener_twice_is_two_subscriptions() {
    let store = Store::new(0, counter_reducer);
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = {
        let calls = calls.clone();
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };

    let first = store.subscribe({
        let listener = listener.clone();
        move || listener()
    });
    let _second = store.subscribe(move || listener());
    assert_eq!(store.subscriber_count(), 2);

    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    first.unsubscribe();
    // Unsubscribing again is a no-op.
    assert!(!first.unsubscribe());
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn unsubscribe_from_inside_a_listener() {
    let store = Store::new(0, counter_reducer);
    let log = Arc::new(Mutex::new(Vec::new()));
    let slot: Arc<Mutex<Option<reservoir::Subscription>>> = Arc::new(Mutex::new(None));

    let once = {
        let log = log.clone();
        let slot = slot.clone();
        store.subscribe(move || {
            log.lock().push("once");
            if let Some(subscription) = slot.lock().take() {
                subscription.unsubscribe();
            }
        })
    };
    *slot.lock() = Some(once);

    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();

    assert_eq!(*log.lock(), vec!["once"]);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn guard_scopes_a_subscription() {
    let store = Store::new(0, counter_reducer);
    let calls = Arc::new(AtomicUsize::new(0));

    {
        let calls = calls.clone();
        let _guard = store
            .subscribe(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .into_guard();
        store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    }
    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_reducer_notifies_nobody() {
    type Value = serde_json::Value;

    let add_item = |state: &Value, action: &TaggedAction| -> Result<Value, String> {
        match action.kind() {
            "ADD_ITEM" => {
                let item = action
                    .payload_field("item")
                    .cloned()
                    .ok_or_else(|| "ADD_ITEM needs an item".to_string())?;
                let mut next = state.clone();
                if let Some(items) = next["items"].as_array_mut() {
                    items.push(item);
                }
                Ok(next)
            }
            _ => Ok(state.clone()),
        }
    };
    let store = Store::with_reducer(json!({ "items": [] }), fallible(add_item));
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    store.subscribe(move || {
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    store
        .dispatch(TaggedAction::new("ADD_ITEM").with_payload(json!({ "item": "milk" })))
        .unwrap();
    let err = store.dispatch(TaggedAction::new("ADD_ITEM")).unwrap_err();

    assert_eq!(
        err.into_reducer_error(),
        Some("ADD_ITEM needs an item".to_string())
    );
    assert_eq!(*store.get_state(), json!({ "items": ["milk"] }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn store_matches_replay() {
    let actions: Vec<TaggedAction> = ["INCREMENT", "RESET", "INCREMENT", "INCREMENT", "NOPE"]
        .into_iter()
        .map(TaggedAction::new)
        .collect();
    let reducer = |state: &i64, action: &TaggedAction| match action.kind() {
        "INCREMENT" => state + 1,
        "RESET" => 0,
        _ => *state,
    };

    let store = Store::new(5, reducer);
    for action in actions.iter().cloned() {
        store.dispatch(action).unwrap();
    }

    assert_eq!(
        replay::<_, TaggedAction, _, _>(5, &reducer, &actions),
        Ok(*store.get_state())
    );
    assert_eq!(*store.get_state(), 2);
}

#[test]
fn configured_store_from_toml() {
    let config = StoreConfig::from_toml_str(
        r#"
        notify = "on-change"
        reentrancy = "queue"
        "#,
    )
    .unwrap();
    let store = Store::builder(0, counter_reducer)
        .config(config)
        .middleware(LoggingMiddleware::new("audit"))
        .build();
    assert_eq!(store.config().notify, NotifyPolicy::OnChange);
    assert_eq!(store.config().reentrancy, ReentrancyPolicy::Queue);

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let handle = store.clone();
    store.subscribe(move || {
        if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
            handle.dispatch(TaggedAction::new("INCREMENT")).unwrap();
        }
    });

    store.dispatch(TaggedAction::new("UNKNOWN")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();
    assert_eq!(*store.get_state(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn reentrant_dispatch_rejected_by_default() {
    let store = Store::new(0, counter_reducer);
    let nested = Arc::new(Mutex::new(Vec::new()));

    let handle = store.clone();
    let nested_clone = nested.clone();
    store.subscribe(move || {
        nested_clone
            .lock()
            .push(handle.dispatch(TaggedAction::new("INCREMENT")));
    });

    store.dispatch(TaggedAction::new("INCREMENT")).unwrap();

    assert_eq!(
        *nested.lock(),
        vec![Err(DispatchError::Reentrant {
            kind: "INCREMENT".to_string()
        })]
    );
    assert_eq!(*store.get_state(), 1);
}

#[test]
fn context_carries_store_to_nested_callers() {
    #[derive(Debug)]
    enum Todo {
        Add(&'static str),
    }

    impl Action for Todo {
        fn kind(&self) -> &str {
            "ADD_TODO"
        }
    }

    fn leaf() {
        let store = use_context::<Store<Vec<&'static str>, Todo>>().unwrap();
        store.dispatch(Todo::Add("write tests")).unwrap();
    }

    fn middle() {
        leaf();
    }

    let store = Store::new(Vec::new(), |todos: &Vec<&'static str>, action: &Todo| {
        let Todo::Add(title) = action;
        let mut next = todos.clone();
        next.push(*title);
        next
    });

    provide(store.clone(), middle);

    assert_eq!(*store.get_state(), vec!["write tests"]);
}

#[test]
fn state_cell_as_local_state() {
    let count = StateCell::new(0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let reader = count.clone();
    count.subscribe(move || seen_clone.lock().push(reader.get()));

    count.set(count.get() + 1);
    count.update(|n| n + 1);

    assert_eq!(count.get(), 2);
    assert_eq!(*seen.lock(), vec![1, 2]);
}
