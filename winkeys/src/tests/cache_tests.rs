use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cache::{ControlCache, DEFAULT_CAPACITY};
use crate::element::{ControlHandle, WindowHandle};
use crate::tests::mock::{MockControl, MockWindow};

fn window(title: &str) -> WindowHandle {
    WindowHandle::new(Arc::new(MockWindow::new(title)))
}

fn bare_window(title: &str) -> WindowHandle {
    WindowHandle::new(Arc::new(MockWindow::new(title).without_native_handle()))
}

fn control(locator: &str) -> ControlHandle {
    ControlHandle::new(Arc::new(MockControl::new(locator)), locator.to_string())
}

const TTL: Duration = Duration::from_secs(60);

#[test]
fn hit_returns_the_stored_handle() {
    let cache = ControlCache::new();
    let win = window("Main");
    cache.set(&win, "name:OK", control("name:OK"), TTL);

    let hit = cache.get(&win, "name:OK").unwrap();
    assert_eq!(hit.locator(), "name:OK");
    assert!(cache.get(&win, "name:Cancel").is_none());
}

#[test]
fn entries_are_scoped_to_the_window_identity() {
    let cache = ControlCache::new();
    let first = window("First");
    let second = window("Second");
    cache.set(&first, "name:OK", control("name:OK"), TTL);

    assert!(cache.get(&first, "name:OK").is_some());
    assert!(cache.get(&second, "name:OK").is_none());
}

#[test]
fn expired_entry_reads_as_a_miss_and_is_removed() {
    let cache = ControlCache::new();
    let win = window("Main");
    cache.set(&win, "name:OK", control("name:OK"), Duration::from_millis(30));
    assert_eq!(cache.len(), 1);

    thread::sleep(Duration::from_millis(60));
    assert!(cache.get(&win, "name:OK").is_none());
    assert!(cache.is_empty());
}

#[test]
fn eviction_is_insertion_ordered_not_recency_ordered() {
    let cache = ControlCache::with_capacity(3);
    let win = window("Main");
    for locator in ["name:A", "name:B", "name:C"] {
        cache.set(&win, locator, control(locator), TTL);
    }
    // Touching A (read and overwrite) must not move it off the front.
    assert!(cache.get(&win, "name:A").is_some());
    cache.set(&win, "name:A", control("name:A"), TTL);

    cache.set(&win, "name:D", control("name:D"), TTL);
    assert_eq!(cache.len(), 3);
    assert!(cache.get(&win, "name:A").is_none(), "oldest insert survives");
    assert!(cache.get(&win, "name:B").is_some());
    assert!(cache.get(&win, "name:D").is_some());
}

#[test]
fn capacity_defaults_to_one_hundred_entries() {
    let cache = ControlCache::new();
    let win = window("Main");
    for i in 0..=DEFAULT_CAPACITY {
        let locator = format!("id:{i}");
        cache.set(&win, &locator, control(&locator), TTL);
    }
    assert_eq!(cache.len(), DEFAULT_CAPACITY);
    assert!(cache.get(&win, "id:0").is_none());
    assert!(cache.get(&win, &format!("id:{DEFAULT_CAPACITY}")).is_some());
}

#[test]
fn clear_for_one_window_leaves_the_other_alone() {
    let cache = ControlCache::new();
    let first = window("First");
    let second = window("Second");
    cache.set(&first, "name:OK", control("name:OK"), TTL);
    cache.set(&second, "name:OK", control("name:OK"), TTL);

    cache.clear(Some(&first));
    assert!(cache.get(&first, "name:OK").is_none());
    assert!(cache.get(&second, "name:OK").is_some());

    cache.clear(None);
    assert!(cache.is_empty());
}

#[test]
fn windows_without_native_handles_do_not_collide() {
    let cache = ControlCache::new();
    let first = bare_window("Same Title");
    let second = bare_window("Same Title");
    cache.set(&first, "name:OK", control("name:OK"), TTL);

    assert!(cache.get(&first, "name:OK").is_some());
    assert!(cache.get(&second, "name:OK").is_none());
}
