use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// The item file changed on disk.
    ItemsChanged,
}

/// Watches the `things/` directory for changes to items.json.
pub struct ItemsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl ItemsWatcher {
    /// Start watching the given `things/` directory.
    /// Call `poll()` each tick.
    pub fn start(things_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let items_path: PathBuf = things_dir.join("items.json");

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic saves show up as a rename onto items.json
                if event.paths.iter().any(|p| p.file_name() == items_path.file_name()) {
                    let _ = tx.send(FileEvent::ItemsChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(things_dir, RecursiveMode::NonRecursive)?;
        Ok(ItemsWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: true if the item file changed since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::ItemsChanged) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}
