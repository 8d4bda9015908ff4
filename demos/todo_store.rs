//! Demonstration of a Store managing a todo list through actions.

use reservoir::{fallible, Action, Store, TaggedAction};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum TodoFilter {
    All,
    Active,
    Completed,
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: TodoFilter,
}

impl AppState {
    fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: TodoFilter::All,
        }
    }

    fn filtered_todos(&self) -> Vec<&TodoItem> {
        match self.filter {
            TodoFilter::All => self.todos.iter().collect(),
            TodoFilter::Active => self.todos.iter().filter(|t| !t.completed).collect(),
            TodoFilter::Completed => self.todos.iter().filter(|t| t.completed).collect(),
        }
    }

    fn stats(&self) -> (usize, usize, usize) {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        let active = total - completed;
        (total, active, completed)
    }
}

// Actions arrive untyped, the way they would from a UI event bridge.
fn todo_reducer(state: &AppState, action: &TaggedAction) -> Result<AppState, String> {
    let mut next = state.clone();
    match action.kind() {
        "ADD_TODO" => {
            let title = action
                .payload_field("title")
                .and_then(|v| v.as_str())
                .ok_or("ADD_TODO needs a title")?;
            next.todos.push(TodoItem {
                id: next.todos.len(),
                title: title.to_string(),
                completed: false,
            });
        }
        "TOGGLE_TODO" => {
            let id = action
                .payload_field("id")
                .and_then(|v| v.as_u64())
                .ok_or("TOGGLE_TODO needs an id")? as usize;
            let todo = next
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| format!("no todo with id {id}"))?;
            todo.completed = !todo.completed;
        }
        "SET_FILTER" => {
            next.filter = match action.payload_field("filter").and_then(|v| v.as_str()) {
                Some("active") => TodoFilter::Active,
                Some("completed") => TodoFilter::Completed,
                _ => TodoFilter::All,
            };
        }
        _ => {}
    }
    Ok(next)
}

fn print_todos(store: &Store<AppState, TaggedAction, String>) {
    store.read(|state| {
        for todo in state.filtered_todos() {
            let status = if todo.completed { "✓" } else { " " };
            println!("   [{}] {}", status, todo.title);
        }
    });
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Store Example: Todo App ===\n");

    let store = Store::with_reducer(AppState::new(), fallible(todo_reducer));

    println!("1. Setting up subscriber for statistics");
    let _stats = store.select(
        |state: &AppState| state.stats(),
        |(total, active, completed)| {
            println!(
                "   [Store Update] Total: {}, Active: {}, Completed: {}",
                total, active, completed
            );
        },
    );

    let dispatch = |action: TaggedAction| {
        if let Err(err) = store.dispatch(action) {
            println!("   [Dispatch Failed] {err}");
        }
    };

    println!("\n2. Adding todos");
    for title in ["Learn Rust", "Build reactive library", "Write documentation"] {
        dispatch(TaggedAction::new("ADD_TODO").with_payload(json!({ "title": title })));
    }

    println!("\n3. Current todos:");
    print_todos(&store);

    println!("\n4. Completing the first two todos");
    dispatch(TaggedAction::new("TOGGLE_TODO").with_payload(json!({ "id": 0 })));
    dispatch(TaggedAction::new("TOGGLE_TODO").with_payload(json!({ "id": 1 })));

    println!("\n5. Toggling a todo that does not exist");
    dispatch(TaggedAction::new("TOGGLE_TODO").with_payload(json!({ "id": 42 })));

    println!("\n6. Active todos:");
    dispatch(TaggedAction::new("SET_FILTER").with_payload(json!({ "filter": "active" })));
    print_todos(&store);

    println!("\n7. Completed todos:");
    dispatch(TaggedAction::new("SET_FILTER").with_payload(json!({ "filter": "completed" })));
    print_todos(&store);

    let (total, active, completed) = store.read(|state| state.stats());
    println!("\n8. Final statistics:");
    println!("   Total: {}", total);
    println!("   Active: {}", active);
    println!("   Completed: {}", completed);

    println!("\n✓ Example complete!");
}
