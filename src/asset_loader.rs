use bevy::asset::LoadState;
use bevy::asset::RenderAssetUsages;
use bevy::dev_tools::states::log_transitions;
use bevy::prelude::*;
use bevy::render::render_resource::Extent3d;
use bevy::render::render_resource::TextureDimension;
use bevy::render::render_resource::TextureFormat;
use bevy::render::render_resource::TextureViewDescriptor;
use bevy::render::render_resource::TextureViewDimension;

use crate::portal::PortalDefinition;

/// Faces in a cubemap
const CUBE_FACES: u32 = 6;
/// Edge length of a generated stand-in face
const FALLBACK_FACE_SIZE: u32 = 16;
const FALLBACK_FACE_PIXELS: usize = 16 * 16;
/// Lightness per face (+X, -X, +Y, -Y, +Z, -Z) so the stand-in reads as a room
const FALLBACK_FACE_LIGHTNESS: [f32; 6] = [0.45, 0.45, 0.75, 0.2, 0.5, 0.4];
const FALLBACK_SATURATION: f32 = 0.55;

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AssetsState>() // necessary to tell if they've finished loading
            .init_resource::<EnvironmentTextures>()
            .add_systems(PreStartup, load_assets)
            .add_systems(
                Update,
                (replace_failed_textures, prepare_cubemaps, check_asset_loading)
                    .chain()
                    .run_if(in_state(AssetsState::Loading)),
            )
            .add_systems(Update, log_transitions::<AssetsState>);
    }
}

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AssetsState {
    #[default]
    Loading,
    Loaded,
}

/// Environment cubemaps, in `PortalDefinition::all()` order
///
/// Portals are spawned from these once `AssetsState::Loaded` is reached, so a
/// texture that failed to load has been swapped for its generated stand-in by then.
#[derive(Resource, Clone, Debug, Default)]
pub struct EnvironmentTextures {
    handles: Vec<Handle<Image>>,
}

impl EnvironmentTextures {
    pub fn iter(&self) -> impl Iterator<Item = &Handle<Image>> { self.handles.iter() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CubemapStatus {
    /// Single layer holding six square faces stacked top to bottom
    Stacked,
    /// Six layers, usable as a cube texture
    Ready,
    /// Anything else - cannot be sampled as a cube
    WrongShape,
}

fn cubemap_status(image: &Image) -> CubemapStatus {
    match image.texture_descriptor.array_layer_count() {
        CUBE_FACES => CubemapStatus::Ready,
        1 if image.height() == image.width() * CUBE_FACES => CubemapStatus::Stacked,
        _ => CubemapStatus::WrongShape,
    }
}

fn view_as_cube(image: &mut Image) {
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
}

/// Six flat-shaded faces in the portal's hue, used when its texture is unusable
pub fn fallback_cubemap(hue: f32) -> Image {
    let data = FALLBACK_FACE_LIGHTNESS
        .iter()
        .flat_map(|&lightness| {
            let texel = Color::hsl(hue, FALLBACK_SATURATION, lightness)
                .to_srgba()
                .to_u8_array();
            std::iter::repeat_n(texel, FALLBACK_FACE_PIXELS).flatten()
        })
        .collect();

    let mut image = Image::new(
        Extent3d {
            width:                 FALLBACK_FACE_SIZE,
            height:                FALLBACK_FACE_SIZE,
            depth_or_array_layers: CUBE_FACES,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    view_as_cube(&mut image);
    image
}

pub fn load_assets(mut textures: ResMut<EnvironmentTextures>, asset_server: Res<AssetServer>) {
    *textures = EnvironmentTextures {
        handles: PortalDefinition::all()
            .iter()
            .map(|definition| asset_server.load(definition.texture))
            .collect(),
    };
}

fn replace_failed_textures(
    asset_server: Res<AssetServer>,
    mut textures: ResMut<EnvironmentTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    for (handle, definition) in textures.handles.iter_mut().zip(PortalDefinition::all()) {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
            error!(
                "failed to load portal texture {}: {err} - using a generated stand-in",
                definition.texture
            );
            *handle = images.add(fallback_cubemap(definition.fallback_hue));
        }
    }
}

/// Stacked 2d images come off disk as a single layer - view them as cubes
fn prepare_cubemaps(textures: Res<EnvironmentTextures>, mut images: ResMut<Assets<Image>>) {
    for handle in textures.iter() {
        if !images
            .get(handle)
            .is_some_and(|image| cubemap_status(image) == CubemapStatus::Stacked)
        {
            continue;
        }

        if let Some(mut image) = images.get_mut(handle) {
            if let Err(err) = image.reinterpret_stacked_2d_as_array(CUBE_FACES) {
                warn!("could not reinterpret {:?} as a cubemap: {err:?}", handle.path());
                continue;
            }
            view_as_cube(&mut image);
            debug!("prepared cubemap {:?}", handle.path());
        }
    }
}

pub fn check_asset_loading(
    mut next_state: ResMut<NextState<AssetsState>>,
    mut textures: ResMut<EnvironmentTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    for (handle, definition) in textures.handles.iter_mut().zip(PortalDefinition::all()) {
        let Some(image) = images.get(&*handle) else {
            continue;
        };
        // stacked images have already been through `prepare_cubemaps` this frame
        if cubemap_status(image) == CubemapStatus::Ready {
            continue;
        }

        warn!(
            "portal texture {} is {}x{} with {} layer(s), expected six stacked square faces - using a generated stand-in",
            definition.texture,
            image.width(),
            image.height(),
            image.texture_descriptor.array_layer_count()
        );
        *handle = images.add(fallback_cubemap(definition.fallback_hue));
    }

    let all_cubemaps_ready = textures.iter().all(|handle| {
        images
            .get(handle)
            .is_some_and(|image| cubemap_status(image) == CubemapStatus::Ready)
    });

    // Transition to the Loaded state if all assets are loaded
    if all_cubemaps_ready {
        info!("All portal cubemaps loaded!");
        next_state.set(AssetsState::Loaded);
    }
}
