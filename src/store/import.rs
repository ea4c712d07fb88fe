//! Photo import and deletion systems.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use super::files::{import_photo_file, remove_photo_file};
use super::messages::{DeletePhotoRequest, ImportPhotoRequest, PhotoDeleted, PhotoImported};
use super::resources::{ImportPhotoTask, ImportResult, PhotoStore};
use crate::config::AppSettings;
use crate::i18n::{Text, tr};
use crate::ui::Notify;

/// Spawns one copy task per import request
pub fn start_photo_imports(mut commands: Commands, mut events: MessageReader<ImportPhotoRequest>) {
    for event in events.read() {
        let source = event.source.clone();
        let photos_dir = crate::paths::photos_dir();
        info!("Importing photo {:?}", source);

        let task = IoTaskPool::get().spawn(async move {
            let now = chrono::Local::now();
            let outcome = import_photo_file(&source, &photos_dir, now);
            ImportResult {
                source,
                created_at: now.timestamp_millis(),
                outcome,
            }
        });
        commands.spawn(ImportPhotoTask(task));
    }
}

/// Polls import tasks and registers finished copies in the library
pub fn poll_import_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ImportPhotoTask)>,
    mut store: ResMut<PhotoStore>,
    settings: Res<AppSettings>,
    mut imported: MessageWriter<PhotoImported>,
    mut notify: MessageWriter<Notify>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result.outcome {
            Ok(path) => {
                let photo_id = store.library.insert_photo(path.clone(), result.created_at);
                store.mark_changed();
                info!("Imported {:?} as photo {} at {:?}", result.source, photo_id, path);
                imported.write(PhotoImported { photo_id });
            }
            Err(e) => {
                warn!("Import of {:?} failed: {}", result.source, e);
                notify.write(Notify::error(format!(
                    "{}: {}",
                    tr(settings.locale(), Text::ImportFailed),
                    e
                )));
            }
        }
    }
}

/// Removes photos, their annotations and managed files
pub fn delete_photo_system(
    mut events: MessageReader<DeletePhotoRequest>,
    mut store: ResMut<PhotoStore>,
    mut deleted: MessageWriter<PhotoDeleted>,
) {
    for event in events.read() {
        match store.library.delete_photo(event.photo_id) {
            Ok(photo) => {
                store.mark_changed();
                match remove_photo_file(&photo.path) {
                    Ok(true) => debug!("Deleted photo file {:?}", photo.path),
                    Ok(false) => {}
                    Err(e) => warn!("Could not delete photo file: {}", e),
                }
                info!("Deleted photo {}", photo.id);
                deleted.write(PhotoDeleted { photo_id: photo.id });
            }
            Err(e) => warn!("Delete photo failed: {}", e),
        }
    }
}
