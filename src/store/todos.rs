use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::StoreError;
use crate::models::{TodoInput, TodoItem, TodoPatch};

/// One user's todos in creation order.
#[derive(Debug, Default)]
struct TodoList {
    /// Next id to hand out. Ids are never reused, even after deletes.
    next_id: u64,
    items: Vec<TodoItem>,
}

impl TodoList {
    fn position(&self, id: u64) -> Result<usize, StoreError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::TodoNotFound(id))
    }
}

/// Todo lists keyed by owner username.
///
/// A list is created by the first `create` for a user. Reads before that fail
/// with `NoTodoList` rather than returning an empty list.
pub struct TodoStore {
    lists: RwLock<HashMap<String, TodoList>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a todo to the user's list and returns it with its assigned id.
    pub fn create(&self, username: &str, input: TodoInput) -> TodoItem {
        let mut lists = self.write();
        let list = lists.entry(username.to_owned()).or_default();
        list.next_id += 1;

        let item = TodoItem {
            id: list.next_id,
            text: input.todo,
            completed: input.completed,
        };
        list.items.push(item.clone());
        item
    }

    pub fn list(&self, username: &str) -> Result<Vec<TodoItem>, StoreError> {
        self.read()
            .get(username)
            .map(|list| list.items.clone())
            .ok_or_else(|| StoreError::NoTodoList(username.to_owned()))
    }

    pub fn get(&self, username: &str, id: u64) -> Result<TodoItem, StoreError> {
        let lists = self.read();
        let list = lists
            .get(username)
            .ok_or_else(|| StoreError::NoTodoList(username.to_owned()))?;
        let index = list.position(id)?;
        Ok(list.items[index].clone())
    }

    /// Applies `patch` to one todo. See [`TodoPatch`] for which values count.
    pub fn update(&self, username: &str, id: u64, patch: TodoPatch) -> Result<TodoItem, StoreError> {
        let mut lists = self.write();
        let list = lists
            .get_mut(username)
            .ok_or_else(|| StoreError::NoTodoList(username.to_owned()))?;
        let index = list.position(id)?;

        let item = &mut list.items[index];
        patch.apply_to(item);
        Ok(item.clone())
    }

    /// Removes one todo, keeping the remaining items in order.
    pub fn delete(&self, username: &str, id: u64) -> Result<(), StoreError> {
        let mut lists = self.write();
        let list = lists
            .get_mut(username)
            .ok_or_else(|| StoreError::NoTodoList(username.to_owned()))?;
        let index = list.position(id)?;
        list.items.remove(index);
        Ok(())
    }

    /// Drops the user's whole list. Returns whether one existed.
    pub fn remove_list(&self, username: &str) -> bool {
        self.write().remove(username).is_some()
    }

    /// Moves a list to a new owner key after a username change.
    ///
    /// `to` must be a name no user holds. Anything still stored under it has
    /// no owner and is discarded, never merged into the moved list.
    pub fn rename_owner(&self, from: &str, to: &str) {
        let mut lists = self.write();
        match lists.remove(from) {
            Some(list) => {
                lists.insert(to.to_owned(), list);
            }
            None => {
                lists.remove(to);
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, TodoList>> {
        self.lists.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, TodoList>> {
        self.lists.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn input(text: &str) -> TodoInput {
        TodoInput {
            todo: text.to_string(),
            completed: false,
        }
    }

    fn texts(items: &[TodoItem]) -> Vec<&str> {
        items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn test_list_before_first_create_is_an_error() {
        let store = TodoStore::new();
        assert_eq!(
            store.list("bob"),
            Err(StoreError::NoTodoList("bob".to_string()))
        );
        assert_eq!(
            store.get("bob", 1),
            Err(StoreError::NoTodoList("bob".to_string()))
        );
        // Reads must not create the list as a side effect.
        assert!(store.list("bob").is_err());
    }

    #[test]
    fn test_create_then_list() {
        let store = TodoStore::new();
        let created = store.create("bob", input("buy milk"));

        assert_eq!(store.list("bob").unwrap(), vec![created.clone()]);
        assert_eq!(store.get("bob", created.id).unwrap(), created);
    }

    #[test]
    fn test_delete_preserves_order_of_siblings() {
        let store = TodoStore::new();
        store.create("bob", input("one"));
        let two = store.create("bob", input("two"));
        store.create("bob", input("three"));
        store.create("bob", input("four"));

        store.delete("bob", two.id).unwrap();

        let remaining = store.list("bob").unwrap();
        assert_eq!(texts(&remaining), vec!["one", "three", "four"]);
        assert_eq!(
            store.get("bob", two.id),
            Err(StoreError::TodoNotFound(two.id))
        );
        assert_eq!(
            store.delete("bob", two.id),
            Err(StoreError::TodoNotFound(two.id))
        );
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = TodoStore::new();
        let first = store.create("bob", input("one"));
        store.delete("bob", first.id).unwrap();
        let second = store.create("bob", input("two"));

        assert_ne!(first.id, second.id);
        // An emptied list still exists.
        assert_eq!(store.list("bob").unwrap().len(), 1);
    }

    #[test]
    fn test_ids_are_scoped_per_user() {
        let store = TodoStore::new();
        let bobs = store.create("bob", input("bob's"));
        let alices = store.create("alice", input("alice's"));

        assert_eq!(bobs.id, alices.id);
        store.delete("bob", bobs.id).unwrap();
        assert_eq!(store.get("alice", alices.id).unwrap(), alices);
    }

    #[test]
    fn test_partial_updates() {
        let store = TodoStore::new();
        let todo = store.create("bob", input("water the plants"));

        let completed = store
            .update(
                "bob",
                todo.id,
                TodoPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(completed.completed);
        assert_eq!(completed.text, "water the plants");

        let renamed = store
            .update(
                "bob",
                todo.id,
                TodoPatch {
                    todo: Some("water the garden".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.text, "water the garden");
        assert!(renamed.completed);

        assert_eq!(store.get("bob", todo.id).unwrap(), renamed);
        assert_eq!(
            store.update("bob", 999, TodoPatch::default()),
            Err(StoreError::TodoNotFound(999))
        );
    }

    #[test]
    fn test_remove_and_rename_list() {
        let store = TodoStore::new();
        let todo = store.create("bob", input("pack"));

        store.rename_owner("bob", "robert");
        assert!(store.list("bob").is_err());
        assert_eq!(store.get("robert", todo.id).unwrap(), todo);

        assert!(store.remove_list("robert"));
        assert!(!store.remove_list("robert"));
        assert!(store.list("robert").is_err());
    }

    #[test]
    fn test_rename_owner_discards_ownerless_list() {
        let store = TodoStore::new();
        store.create("ghost", input("left behind"));
        let mine = store.create("bob", input("mine"));

        store.rename_owner("bob", "ghost");
        assert_eq!(store.list("ghost").unwrap(), vec![mine]);

        store.create("phantom", input("left behind"));
        store.rename_owner("nobody", "phantom");
        assert!(store.list("phantom").is_err());
    }

    #[test]
    fn test_concurrent_creation_loses_no_updates() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let store = TodoStore::new();
        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let store = &store;
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        store.create("bob", input(&format!("todo {}-{}", t, i)));
                    }
                });
            }
        });

        let items = store.list("bob").unwrap();
        assert_eq!(items.len(), THREADS * PER_THREAD);
        let ids: HashSet<u64> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids.len(), THREADS * PER_THREAD);
    }
}
