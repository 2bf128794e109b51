//! Filesystem move tracking.
//!
//! The directories holding tracked files are watched non-recursively. notify
//! delivers raw events on its own thread, where a [`MoveDetector`] turns them
//! into [`WatchEvent`]s that are sent down a channel. The UI thread drains the
//! channel and applies moves to the store with [`apply_watch_event`], so the
//! store never crosses threads.

use crate::error::FavError;
use crate::favorites::{FavoritesStore, MoveOutcome};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Moved { from: PathBuf, to: PathBuf },
    /// Something was created or removed; only the status display is stale.
    Changed(PathBuf),
    Error(String),
}

/// Translates raw notify events into [`WatchEvent`]s.
///
/// Backends report renames differently. inotify emits both halves tagged with
/// a cookie followed by a combined `Both` event, so tagged halves only refresh
/// status. Windows emits untagged `From`/`To` halves back to back, which are
/// paired here. FSEvents emits `Any` for both paths, paired by whether the
/// path still exists.
#[derive(Debug, Default)]
pub struct MoveDetector {
    pending_from: Option<PathBuf>,
}

impl MoveDetector {
    pub fn process(&mut self, event: &Event) -> Vec<WatchEvent> {
        let mut out = Vec::new();
        match &event.kind {
            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::Both => {
                    self.flush(&mut out);
                    if let [from, to, ..] = event.paths.as_slice() {
                        out.push(WatchEvent::Moved {
                            from: from.clone(),
                            to: to.clone(),
                        });
                    }
                }
                RenameMode::From if event.tracker().is_none() => {
                    self.flush(&mut out);
                    self.pending_from = event.paths.first().cloned();
                }
                RenameMode::To if event.tracker().is_none() => {
                    if let Some(to) = event.paths.first() {
                        self.pair_with(to, &mut out);
                    }
                }
                RenameMode::From | RenameMode::To => {
                    out.extend(event.paths.iter().cloned().map(WatchEvent::Changed));
                }
                _ => {
                    for path in &event.paths {
                        if path.exists() {
                            self.pair_with(path, &mut out);
                        } else {
                            self.flush(&mut out);
                            self.pending_from = Some(path.clone());
                        }
                    }
                }
            },
            EventKind::Create(_) | EventKind::Remove(_) => {
                self.flush(&mut out);
                out.extend(event.paths.iter().cloned().map(WatchEvent::Changed));
            }
            _ => {}
        }
        out
    }

    fn pair_with(&mut self, to: &Path, out: &mut Vec<WatchEvent>) {
        match self.pending_from.take() {
            Some(from) => out.push(WatchEvent::Moved {
                from,
                to: to.to_path_buf(),
            }),
            None => out.push(WatchEvent::Changed(to.to_path_buf())),
        }
    }

    /// An unpaired source half means the file left the watched directories.
    fn flush(&mut self, out: &mut Vec<WatchEvent>) {
        if let Some(from) = self.pending_from.take() {
            out.push(WatchEvent::Changed(from));
        }
    }
}

/// Watches the parent directories of tracked files.
pub struct MoveWatcher {
    watcher: RecommendedWatcher,
    watched: BTreeSet<PathBuf>,
    errors: HashMap<PathBuf, String>,
}

impl MoveWatcher {
    pub fn new() -> Result<(Self, Receiver<WatchEvent>), FavError> {
        Self::with_waker(|| {})
    }

    /// Like [`MoveWatcher::new`], calling `wake` on the watcher thread after
    /// each batch of events is queued. The GUI uses it to request a repaint.
    pub fn with_waker<W>(wake: W) -> Result<(Self, Receiver<WatchEvent>), FavError>
    where
        W: Fn() + Send + 'static,
    {
        let (tx, rx) = channel();
        let watcher = RecommendedWatcher::new(event_handler(tx, wake), Config::default())?;
        Ok((
            Self {
                watcher,
                watched: BTreeSet::new(),
                errors: HashMap::new(),
            },
            rx,
        ))
    }

    /// Watch exactly the directories containing `paths`.
    ///
    /// Directories that cannot be watched are remembered and retried on the
    /// next call; they never fail the call itself.
    pub fn sync<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let wanted: BTreeSet<PathBuf> = paths
            .into_iter()
            .filter_map(|p| p.parent())
            .filter(|d| !d.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();

        let stale: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|d| !wanted.contains(*d) || !d.is_dir())
            .cloned()
            .collect();
        for dir in stale {
            if let Err(e) = self.watcher.unwatch(&dir) {
                tracing::debug!("unwatch {}: {e}", dir.display());
            }
            self.watched.remove(&dir);
        }
        self.errors.retain(|d, _| wanted.contains(d));

        for dir in wanted {
            if self.watched.contains(&dir) {
                continue;
            }
            match self.watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    tracing::debug!("watching {}", dir.display());
                    self.errors.remove(&dir);
                    self.watched.insert(dir);
                }
                Err(e) => {
                    tracing::warn!("cannot watch {}: {e}", dir.display());
                    self.errors.insert(dir, e.to_string());
                }
            }
        }
    }

    /// The setup failure recorded for the directory containing `path`.
    pub fn watch_error(&self, path: &Path) -> Option<&str> {
        let dir = path.parent()?;
        self.errors.get(dir).map(String::as_str)
    }

    pub fn watched_dirs(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }
}

fn event_handler<W>(tx: Sender<WatchEvent>, wake: W) -> impl notify::EventHandler
where
    W: Fn() + Send + 'static,
{
    let mut detector = MoveDetector::default();
    move |res: notify::Result<Event>| {
        let events = match res {
            Ok(ev) => detector.process(&ev),
            Err(e) => {
                tracing::error!("watch error: {e:?}");
                vec![WatchEvent::Error(e.to_string())]
            }
        };
        if events.is_empty() {
            return;
        }
        for ev in events {
            let _ = tx.send(ev);
        }
        wake();
    }
}

/// Apply `event` to `store`. Only moves change the store; other events yield
/// an empty outcome.
pub fn apply_watch_event(
    store: &mut FavoritesStore,
    event: &WatchEvent,
) -> Result<MoveOutcome, FavError> {
    match event {
        WatchEvent::Moved { from, to } => store.apply_move(from, to),
        WatchEvent::Changed(_) | WatchEvent::Error(_) => Ok(MoveOutcome::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind};

    fn rename(mode: RenameMode, paths: &[&str]) -> Event {
        paths.iter().fold(
            Event::new(EventKind::Modify(ModifyKind::Name(mode))),
            |ev, p| ev.add_path(PathBuf::from(p)),
        )
    }

    fn moved(from: &str, to: &str) -> WatchEvent {
        WatchEvent::Moved {
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn both_event_is_a_move() {
        let mut d = MoveDetector::default();
        let out = d.process(&rename(RenameMode::Both, &["/d/a", "/d/b"]));
        assert_eq!(out, vec![moved("/d/a", "/d/b")]);
    }

    #[test]
    fn untracked_halves_are_paired() {
        let mut d = MoveDetector::default();
        assert!(d.process(&rename(RenameMode::From, &["/d/a"])).is_empty());
        let out = d.process(&rename(RenameMode::To, &["/d/b"]));
        assert_eq!(out, vec![moved("/d/a", "/d/b")]);
    }

    #[test]
    fn tracked_halves_only_refresh() {
        let mut d = MoveDetector::default();
        let from = rename(RenameMode::From, &["/d/a"]).set_tracker(7);
        let to = rename(RenameMode::To, &["/d/b"]).set_tracker(7);
        assert_eq!(d.process(&from), vec![WatchEvent::Changed("/d/a".into())]);
        assert_eq!(d.process(&to), vec![WatchEvent::Changed("/d/b".into())]);
        let both = rename(RenameMode::Both, &["/d/a", "/d/b"]).set_tracker(7);
        assert_eq!(d.process(&both), vec![moved("/d/a", "/d/b")]);
    }

    #[test]
    fn unpaired_from_becomes_change() {
        let mut d = MoveDetector::default();
        d.process(&rename(RenameMode::From, &["/d/a"]));
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path("/d/c".into());
        assert_eq!(
            d.process(&created),
            vec![
                WatchEvent::Changed("/d/a".into()),
                WatchEvent::Changed("/d/c".into())
            ]
        );
    }

    #[test]
    fn lone_to_is_a_change() {
        let mut d = MoveDetector::default();
        let out = d.process(&rename(RenameMode::To, &["/d/b"]));
        assert_eq!(out, vec![WatchEvent::Changed("/d/b".into())]);
    }

    #[test]
    fn any_mode_pairs_by_existence() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("old.txt");
        let here = dir.path().join("new.txt");
        std::fs::write(&here, "x").unwrap();
        let mut d = MoveDetector::default();
        let ev = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
            .add_path(gone.clone())
            .add_path(here.clone());
        assert_eq!(
            d.process(&ev),
            vec![WatchEvent::Moved { from: gone, to: here }]
        );
    }

    #[test]
    fn data_changes_are_ignored() {
        let mut d = MoveDetector::default();
        let ev = Event::new(EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content,
        )))
        .add_path("/d/a".into());
        assert!(d.process(&ev).is_empty());
        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path("/d/a".into());
        assert_eq!(d.process(&removed), vec![WatchEvent::Changed("/d/a".into())]);
    }
}
