//! Watch command: follow writes made by other processes

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use abide_core::Abide;
use abide_core::bridge::{Binding, StoreEvent};
use abide_core::keys::GRACE_POINTS;

/// Poll the data directory forever, printing every external change.
pub fn handle_watch(app: &Abide, interval: Duration) -> bool {
    if !app.options().sync_across_contexts {
        println!("Note: sync_across_contexts is off; open lists will not follow these changes.");
    }

    let registry = app.store().registry().clone();
    let id = registry.subscribe_all(Arc::new(|event: &StoreEvent| {
        if let StoreEvent::ExternalChange { key, new_value } = event {
            match new_value {
                Some(raw) => println!("~ {} changed ({} bytes)", key, raw.len()),
                None => println!("- {} removed", key),
            }
        }
    }));
    log::debug!("Watch subscription {}", id);

    let points = Binding::open_with(app.store(), GRACE_POINTS, 0, app.options());
    let mut last_points = points.get();

    println!("Watching for changes (Ctrl+C to stop)");
    loop {
        let changed = app.poll_external();
        if changed > 0 {
            let current = points.get();
            if current != last_points {
                println!("  grace points: {} -> {}", last_points, current);
                last_points = current;
            }
        }
        thread::sleep(interval);
    }
}
