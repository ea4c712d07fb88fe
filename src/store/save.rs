//! Library write system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use super::files::write_library;
use super::resources::{PhotoStore, WriteLibraryTask, WriteResult};
use crate::config::AppSettings;
use crate::i18n::{Text, tr};
use crate::ui::Notify;

/// Starts a background write when the library changed and no write is running.
///
/// Changes made while a write is in flight are picked up by the next write
/// once the current one finishes.
pub fn start_library_write(mut commands: Commands, mut store: ResMut<PhotoStore>) {
    if !store.needs_write() {
        return;
    }

    let snapshot = store.library.clone();
    let path = store.path.clone();
    let revision = store.begin_write();

    let task = IoTaskPool::get().spawn(async move {
        let error = write_library(&path, &snapshot, revision).err();
        WriteResult { revision, error }
    });
    commands.spawn(WriteLibraryTask(task));
}

/// Polls write tasks and handles completion
pub fn poll_write_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut WriteLibraryTask)>,
    mut store: ResMut<PhotoStore>,
    settings: Res<AppSettings>,
    mut notify: MessageWriter<Notify>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result.error {
            None => {
                debug!("Library revision {} written", result.revision);
                store.finish_write(true);
            }
            Some(e) => {
                error!("Failed to write library: {}", e);
                store.finish_write(false);
                notify.write(Notify::error(format!(
                    "{}: {}",
                    tr(settings.locale(), Text::SaveFailed),
                    e
                )));
            }
        }
    }
}

/// Write synchronously when the app is closing with changes not on disk.
///
/// An in-flight write is awaited first so the two never race on the file.
pub fn flush_library_on_exit(
    mut commands: Commands,
    mut exit_events: MessageReader<AppExit>,
    mut tasks: Query<(Entity, &mut WriteLibraryTask)>,
    mut store: ResMut<PhotoStore>,
) {
    if exit_events.read().next().is_none() {
        return;
    }

    for (entity, mut task) in tasks.iter_mut() {
        let result = future::block_on(&mut task.0);
        commands.entity(entity).despawn();
        store.finish_write(result.error.is_none());
    }

    if !store.has_unsaved_changes() {
        return;
    }

    let revision = store.begin_write();
    match write_library(&store.path, &store.library, revision) {
        Ok(()) => {
            info!("Library flushed on exit");
            store.finish_write(true);
        }
        Err(e) => {
            error!("Failed to write library on exit: {}", e);
            store.finish_write(false);
        }
    }
}
