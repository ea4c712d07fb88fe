//! Exporting annotated photos and rendering list thumbnails.
//!
//! ## Module Structure
//!
//! - [`compose`] - full-resolution compositing and JPEG output
//! - [`thumbnails`] - annotated thumbnails for the photo list

pub mod compose;
pub mod thumbnails;

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::config::AppSettings;
use crate::i18n::{Text, tr};
use crate::model::PhotoId;
use crate::render::RenderError;
use crate::store::PhotoStore;
use crate::ui::Notify;
use compose::{ExportJob, ExportOutcome, run_export};
pub use thumbnails::ThumbnailCache;

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Photo {0} not found")]
    PhotoNotFound(PhotoId),

    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Request to export a photo with its annotations as JPEG
#[derive(Message)]
pub struct ExportPhotoRequest {
    pub photo_id: PhotoId,
}

/// Background export in flight
#[derive(Component)]
pub struct ExportTask(Task<Result<ExportOutcome, ExportError>>);

/// Snapshot the photo's annotations and settings, then export off-thread
pub fn start_exports(
    mut commands: Commands,
    mut events: MessageReader<ExportPhotoRequest>,
    store: Res<PhotoStore>,
    settings: Res<AppSettings>,
    mut notify: MessageWriter<Notify>,
) {
    for event in events.read() {
        let Some(photo) = store.library.photo(event.photo_id) else {
            let e = ExportError::PhotoNotFound(event.photo_id);
            warn!("{}", e);
            notify.write(Notify::error(format!(
                "{}: {}",
                tr(settings.locale(), Text::ExportFailed),
                e
            )));
            continue;
        };

        let job = ExportJob {
            photo_path: photo.path.clone(),
            annotations: store.library.annotations_for(photo.id),
            style: settings.data.endpoint_style,
            max_scale: settings.data.max_export_scale,
            locale: settings.locale(),
            label_font: settings.data.label_font.clone(),
            export_dir: crate::paths::export_dir(),
            now: chrono::Local::now(),
        };
        info!(
            "Exporting photo {} with {} annotations",
            photo.id,
            job.annotations.len()
        );

        let task = IoTaskPool::get().spawn(async move { run_export(job) });
        commands.spawn(ExportTask(task));
    }
}

/// Report finished exports
pub fn poll_export_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ExportTask)>,
    settings: Res<AppSettings>,
    mut notify: MessageWriter<Notify>,
) {
    let locale = settings.locale();
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(outcome) => {
                info!("Exported to {:?}", outcome.path);
                if outcome.skipped_labels > 0 {
                    warn!(
                        "No label font found, {} labels left out of the export",
                        outcome.skipped_labels
                    );
                    notify.write(Notify::error(tr(locale, Text::NoLabelFont)));
                }
                notify.write(
                    Notify::info(format!(
                        "{}: {}",
                        tr(locale, Text::ExportSaved),
                        outcome.path.display()
                    ))
                    .with_path(outcome.path),
                );
            }
            Err(e) => {
                error!("Export failed: {}", e);
                notify.write(Notify::error(format!("{}: {}", tr(locale, Text::ExportFailed), e)));
            }
        }
    }
}

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ThumbnailCache>()
            .add_message::<ExportPhotoRequest>()
            .add_systems(
                Update,
                (
                    start_exports,
                    poll_export_tasks,
                    thumbnails::request_thumbnails,
                    thumbnails::poll_thumbnail_tasks,
                ),
            );
    }
}
