//! One-shot, idempotent collision-mesh catalog.
//!
//! Arena geometry in this crate is built from plane primitives, so arenas
//! work without the catalog; `init` loads and hash-validates the dumped
//! mesh files so mesh-capable physics backends can consume them, and so
//! a bad mesh directory is reported at startup rather than mid-rollout.

use std::io::{Cursor, Read};
use std::num::Wrapping;
use std::path::Path;
use std::sync::{Mutex, RwLock};
use std::{fs, io};

use ahash::AHashMap;
use byteorder::{LittleEndian, ReadBytesExt};
use log::info;

use crate::sim::GameMode;

pub const COLLISION_MESH_BASE_PATH: &str = "./collision_meshes/";
pub const COLLISION_MESH_FILE_EXTENSION: &str = "cmf";

/// One parsed mesh file: triangle indices and vertex positions, kept as
/// loaded for downstream engine consumers.
pub(crate) struct CollisionMeshFile {
    pub indices: Vec<usize>,
    pub vertices: Vec<[f32; 3]>,
    pub hash: u32,
}

impl CollisionMeshFile {
    /// From: <https://stackoverflow.com/a/72073933>
    fn calculate_hash(indices: &[usize], vertices: &[[f32; 3]]) -> u32 {
        const HASH_VAL_MUELLER: Wrapping<u32> = Wrapping(0x45D9_F3B);
        const HASH_VAL_SHIFT: Wrapping<u32> = Wrapping(0x9E37_79B9);

        let mut hash = Wrapping((vertices.len() + (indices.len() / 3 * vertices.len())) as u32);

        for &vert_index in indices {
            for pos in vertices[vert_index] {
                let mut cur_val = Wrapping(pos as i32 as u32);
                cur_val = ((cur_val >> 16) ^ cur_val) * HASH_VAL_MUELLER;
                cur_val = ((cur_val >> 16) ^ cur_val) * HASH_VAL_MUELLER;
                cur_val = (cur_val >> 16) ^ cur_val;
                hash ^= cur_val + HASH_VAL_SHIFT + (hash << 6) + (hash >> 2);
            }
        }

        hash.0
    }

    pub fn read_from_bytes(bytes: &[u8]) -> io::Result<Self> {
        const MAX_VERT_OR_TRI_COUNT: usize = 1000 * 1000;

        let mut cursor = Cursor::new(bytes);

        let num_tris = cursor.read_i32::<LittleEndian>()? as usize;
        let num_vertices = cursor.read_i32::<LittleEndian>()? as usize;
        let num_indices = num_tris * 3;

        if num_tris.min(num_vertices) == 0 || num_tris.max(num_vertices) > MAX_VERT_OR_TRI_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bad triangle/vertex count: [{num_tris}, {num_vertices}]"),
            ));
        }

        let mut indices = Vec::with_capacity(num_indices);
        for _ in 0..num_indices {
            let index = cursor.read_i32::<LittleEndian>()? as usize;
            if index >= num_vertices {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "triangle vertex index out of range",
                ));
            }
            indices.push(index);
        }

        let mut vertices = Vec::with_capacity(num_vertices);
        for _ in 0..num_vertices {
            let mut vert = [0.0f32; 3];
            cursor.read_f32_into::<LittleEndian>(&mut vert)?;
            vertices.push(vert);
        }

        let hash = Self::calculate_hash(&indices, &vertices);

        Ok(Self {
            indices,
            vertices,
            hash,
        })
    }
}

type MeshCatalog = AHashMap<GameMode, Vec<CollisionMeshFile>>;

static MESH_CATALOG: RwLock<Option<MeshCatalog>> = RwLock::new(None);
/// Serializes concurrent first calls to `init`.
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Whether the catalog has been loaded.
#[must_use]
pub fn is_initialized() -> bool {
    MESH_CATALOG
        .read()
        .expect("mesh catalog lock poisoned")
        .is_some()
}

/// `init` with the conventional `./collision_meshes/` path.
pub fn init_from_default() -> crate::Result<()> {
    init(COLLISION_MESH_BASE_PATH)
}

/// Load the collision-mesh catalog from a directory with one
/// subdirectory per game mode (`soccar/`, `hoops/`, `dropshot/`).
/// Idempotent: after the first successful call, later calls are no-ops.
/// Concurrent first calls serialize.
pub fn init<P: AsRef<Path>>(collision_meshes_folder: P) -> crate::Result<()> {
    let _guard = INIT_LOCK.lock().expect("init lock poisoned");

    if is_initialized() {
        return Ok(());
    }

    let _ = crate::logging::try_init();

    let folder = collision_meshes_folder.as_ref();
    if !folder.is_dir() {
        return Err(crate::ArenaError::MeshInit(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", folder.display()),
        )));
    }

    const MODES_WITH_UNIQUE_MESHES: [GameMode; 3] =
        [GameMode::Soccar, GameMode::Hoops, GameMode::Dropshot];

    let mut catalog = MeshCatalog::new();

    for game_mode in MODES_WITH_UNIQUE_MESHES {
        let mode_folder = folder.join(game_mode.name());
        if !mode_folder.exists() {
            continue;
        }

        let mut meshes = Vec::new();
        for entry in fs::read_dir(&mode_folder)?.flatten() {
            let path = entry.path();
            if !path.is_file()
                || path
                    .extension()
                    .is_none_or(|ext| ext != COLLISION_MESH_FILE_EXTENSION)
            {
                continue;
            }

            let mut bytes = Vec::new();
            fs::File::open(&path)?.read_to_end(&mut bytes)?;
            let mesh = CollisionMeshFile::read_from_bytes(&bytes)?;
            info!(
                "loaded {} mesh {} ({} tris, hash {:#x})",
                game_mode.name(),
                path.display(),
                mesh.indices.len() / 3,
                mesh.hash
            );
            meshes.push(mesh);
        }

        info!("{}: {} arena meshes", game_mode.name(), meshes.len());
        catalog.insert(game_mode, meshes);
    }

    *MESH_CATALOG.write().expect("mesh catalog lock poisoned") = Some(catalog);

    Ok(())
}
