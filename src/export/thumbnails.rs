//! Annotated thumbnails for the photo list.
//!
//! Each photo gets a small downscaled copy with its lines drawn on top. A
//! fingerprint of the annotations and endpoint style decides when a
//! thumbnail is stale; stale ones are re-rendered on the IO task pool and
//! swapped into the same image asset, so the egui texture id stays valid.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use bevy_egui::{EguiTextureHandle, EguiUserTextures, egui};
use futures_lite::future;
use image::RgbaImage;

use crate::config::AppSettings;
use crate::constants::{MAX_THUMBNAILS_PER_FRAME, STANDARD_SCREEN_WIDTH, THUMBNAIL_SIZE};
use crate::geometry::DisplayRect;
use crate::i18n::Locale;
use crate::model::{Annotation, EndpointStyle, PhotoId};
use crate::render::raster::{draw_scene, pixmap_from_rgba, rgba_from_pixmap};
use crate::render::{AnnotationScene, Primitive, SceneOptions};
use crate::store::PhotoStore;
use crate::store::files::decode_photo;

struct Thumbnail {
    fingerprint: u64,
    handle: Handle<Image>,
    texture: egui::TextureId,
}

/// Rendered thumbnails and the work in flight
#[derive(Resource, Default)]
pub struct ThumbnailCache {
    ready: HashMap<PhotoId, Thumbnail>,
    /// Downscaled photos without annotations, reused on re-render
    bases: HashMap<PhotoId, Arc<RgbaImage>>,
    /// Fingerprint being rendered per photo
    pending: HashMap<PhotoId, u64>,
    /// Fingerprint whose render failed; not retried until it changes
    failed: HashMap<PhotoId, u64>,
}

impl ThumbnailCache {
    /// egui texture for a photo, once its first thumbnail finished
    pub fn texture(&self, photo_id: PhotoId) -> Option<egui::TextureId> {
        self.ready.get(&photo_id).map(|t| t.texture)
    }

    pub fn has_failed(&self, photo_id: PhotoId) -> bool {
        self.failed.contains_key(&photo_id)
    }

    fn is_current(&self, photo_id: PhotoId, fingerprint: u64) -> bool {
        self.ready.get(&photo_id).is_some_and(|t| t.fingerprint == fingerprint)
            || self.pending.get(&photo_id) == Some(&fingerprint)
            || self.failed.get(&photo_id) == Some(&fingerprint)
    }
}

struct ThumbnailResult {
    photo_id: PhotoId,
    fingerprint: u64,
    outcome: Result<(Arc<RgbaImage>, RgbaImage), String>,
}

#[derive(Component)]
pub struct ThumbnailTask(Task<ThumbnailResult>);

/// Hash of everything that changes how a thumbnail looks
pub fn thumbnail_fingerprint(annotations: &[Annotation], style: EndpointStyle) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.hash(&mut hasher);
    for a in annotations {
        a.id.hash(&mut hasher);
        for v in [a.start.x, a.start.y, a.end.x, a.end.y, a.width] {
            v.to_bits().hash(&mut hasher);
        }
        a.color.0.hash(&mut hasher);
    }
    hasher.finish()
}

/// Downscale a photo so its longer side is at most [`THUMBNAIL_SIZE`]
pub fn thumbnail_base(photo: &image::DynamicImage) -> RgbaImage {
    photo.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgba8()
}

/// Draw the lines of `annotations` onto a thumbnail base. Labels are too
/// small to read at this size and are left out.
pub fn render_thumbnail(
    base: &RgbaImage,
    annotations: &[Annotation],
    style: EndpointStyle,
) -> Result<RgbaImage, String> {
    let (width, height) = base.dimensions();
    let scale = (width as f32 / STANDARD_SCREEN_WIDTH).min(1.0);
    let rect = DisplayRect::from_size(width as f32, height as f32);
    let mut scene = AnnotationScene::build(annotations, &rect, style, &SceneOptions::export(scale, Locale::En));
    scene
        .primitives
        .retain(|primitive| !matches!(primitive, Primitive::Label(_)));

    let mut pixmap = pixmap_from_rgba(base).map_err(|e| e.to_string())?;
    draw_scene(&mut pixmap, &scene, None);
    Ok(rgba_from_pixmap(&pixmap))
}

fn build_thumbnail(
    path: &std::path::Path,
    base: Option<Arc<RgbaImage>>,
    annotations: &[Annotation],
    style: EndpointStyle,
) -> Result<(Arc<RgbaImage>, RgbaImage), String> {
    let base = match base {
        Some(base) => base,
        None => Arc::new(thumbnail_base(&decode_photo(path).map_err(|e| e.to_string())?)),
    };
    let rendered = render_thumbnail(&base, annotations, style)?;
    Ok((base, rendered))
}

fn to_bevy_image(thumbnail: RgbaImage) -> Image {
    Image::from_dynamic(
        image::DynamicImage::ImageRgba8(thumbnail),
        true,
        RenderAssetUsages::RENDER_WORLD,
    )
}

/// Start renders for photos whose thumbnail is missing or stale
pub fn request_thumbnails(
    mut commands: Commands,
    store: Res<PhotoStore>,
    settings: Res<AppSettings>,
    mut cache: ResMut<ThumbnailCache>,
) {
    let style = settings.data.endpoint_style;

    // Forget photos that left the library
    let known: Vec<PhotoId> = cache.ready.keys().chain(cache.bases.keys()).copied().collect();
    for photo_id in known {
        if store.library.photo(photo_id).is_none() {
            cache.ready.remove(&photo_id);
            cache.bases.remove(&photo_id);
            cache.failed.remove(&photo_id);
        }
    }

    // Limit new renders per frame to avoid stuttering
    let mut started = 0;
    for photo in store.library.photos_newest_first() {
        if started >= MAX_THUMBNAILS_PER_FRAME {
            break;
        }
        let annotations = store.library.annotations_for(photo.id);
        let fingerprint = thumbnail_fingerprint(&annotations, style);
        if cache.is_current(photo.id, fingerprint) {
            continue;
        }

        let photo_id = photo.id;
        let path: PathBuf = photo.path.clone();
        let base = cache.bases.get(&photo_id).cloned();
        cache.pending.insert(photo_id, fingerprint);
        started += 1;

        let task = IoTaskPool::get().spawn(async move {
            let outcome = build_thumbnail(&path, base, &annotations, style);
            ThumbnailResult {
                photo_id,
                fingerprint,
                outcome,
            }
        });
        commands.spawn(ThumbnailTask(task));
    }
}

/// Upload finished thumbnails and register them with egui
pub fn poll_thumbnail_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ThumbnailTask)>,
    mut cache: ResMut<ThumbnailCache>,
    mut images: ResMut<Assets<Image>>,
    mut egui_textures: ResMut<EguiUserTextures>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        if cache.pending.get(&result.photo_id) == Some(&result.fingerprint) {
            cache.pending.remove(&result.photo_id);
        }

        match result.outcome {
            Ok((base, rendered)) => {
                cache.failed.remove(&result.photo_id);
                cache.bases.insert(result.photo_id, base);
                let image = to_bevy_image(rendered);

                if let Some(existing) = cache.ready.get_mut(&result.photo_id) {
                    let _ = images.insert(existing.handle.id(), image);
                    existing.fingerprint = result.fingerprint;
                } else {
                    let handle = images.add(image);
                    let texture = egui_textures.add_image(EguiTextureHandle::Weak(handle.id()));
                    cache.ready.insert(
                        result.photo_id,
                        Thumbnail {
                            fingerprint: result.fingerprint,
                            handle,
                            texture,
                        },
                    );
                }
            }
            Err(e) => {
                warn!("Thumbnail for photo {} failed: {}", result.photo_id, e);
                cache.failed.insert(result.photo_id, result.fingerprint);
            }
        }
    }
}
