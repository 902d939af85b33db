use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use super::types::{Palette, Room, Sprite, World, WorldDimensions};

#[derive(Debug, Error)]
pub enum WorldLoadError {
    #[error("failed to read world file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse world document {origin}: {message}")]
    Parse { origin: String, message: String },
    #[error("world dimension {field} must be positive, got {value}")]
    InvalidDimension { field: &'static str, value: i32 },
}

#[derive(Debug, Deserialize)]
struct WorldDocument {
    #[serde(flatten)]
    dimensions: WorldDimensions,
    #[serde(rename = "spriteList", default)]
    sprites: Vec<Sprite>,
    #[serde(rename = "paletteList", default)]
    palettes: Vec<Palette>,
    #[serde(rename = "roomList", default)]
    rooms: Vec<Room>,
}

#[derive(Debug, Clone)]
pub struct LoadedWorld {
    pub world: World,
    pub digest_sha256_hex: String,
}

pub fn load_world_file(path: &Path) -> Result<LoadedWorld, WorldLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| WorldLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_world_document(&raw, &path.display().to_string())
}

pub fn parse_world_json(raw: &str) -> Result<LoadedWorld, WorldLoadError> {
    parse_world_document(raw, "<inline>")
}

fn parse_world_document(raw: &str, origin: &str) -> Result<LoadedWorld, WorldLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let document = serde_path_to_error::deserialize::<_, WorldDocument>(&mut deserializer)
        .map_err(|error| {
            let path = error.path().to_string();
            let source = error.into_inner();
            let message = if path.is_empty() || path == "." {
                source.to_string()
            } else {
                format!("at {path}: {source}")
            };
            WorldLoadError::Parse {
                origin: origin.to_string(),
                message,
            }
        })?;
    validate_dimensions(&document.dimensions)?;

    let digest_sha256_hex = digest_hex(raw.as_bytes());
    let world = World::new(
        document.dimensions,
        document.sprites,
        document.palettes,
        document.rooms,
    );
    info!(
        origin,
        rooms = world.rooms.len(),
        sprites = world.sprites.len(),
        palettes = world.palettes.len(),
        tiles = world.tile_count(),
        digest = %digest_sha256_hex,
        "world_loaded"
    );
    Ok(LoadedWorld {
        world,
        digest_sha256_hex,
    })
}

fn validate_dimensions(dimensions: &WorldDimensions) -> Result<(), WorldLoadError> {
    for (field, value) in [
        ("roomWidth", dimensions.room_width),
        ("roomHeight", dimensions.room_height),
        ("worldWidth", dimensions.world_width),
        ("worldHeight", dimensions.world_height),
    ] {
        if value <= 0 {
            return Err(WorldLoadError::InvalidDimension { field, value });
        }
    }
    Ok(())
}

fn digest_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
