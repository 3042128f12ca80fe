use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::{
    channel::oneshot,
    future::{BoxFuture, FutureExt},
};

use crate::{
    animation::AnimationClip,
    error::AssetLoadError,
    gfx::{
        geometry::GeometryData,
        scene::Node,
        shape::{Color, Shape, StandardMaterial},
    },
};

/// A loaded model: a detached node tree and the clips that animate it
#[derive(Debug, Clone)]
pub struct Asset {
    pub root: Node,
    pub clips: Vec<AnimationClip>,
}

/// Source of model assets
pub trait AssetLoader: Send + Sync {
    fn load(&self, path: &Path) -> BoxFuture<'static, Result<Asset, AssetLoadError>>;
}

/// Wavefront OBJ loader with optional MTL materials
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl AssetLoader for ObjLoader {
    fn load(&self, path: &Path) -> BoxFuture<'static, Result<Asset, AssetLoadError>> {
        let path = path.to_path_buf();
        async move { load_obj_file(&path) }.boxed()
    }
}

fn load_obj_file(path: &Path) -> Result<Asset, AssetLoadError> {
    let is_obj = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
    if !is_obj {
        return Err(AssetLoadError::UnsupportedFormat(path.to_path_buf()));
    }

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|err| AssetLoadError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No usable MTL for {}: {err}", path.display());
        Vec::new()
    });

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("model");
    let mut root = Node::group(name);

    for (index, model) in models.iter().enumerate() {
        let mesh = &model.mesh;
        if mesh.indices.is_empty() {
            continue;
        }
        let geometry =
            GeometryData::from_flat(&mesh.positions, &mesh.normals, mesh.indices.clone());
        let material = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(material_from_mtl)
            .unwrap_or_default();
        let mesh_name = if model.name.is_empty() {
            format!("mesh-{index}")
        } else {
            model.name.clone()
        };
        log::debug!(
            "{}: mesh `{}` with {} triangles",
            path.display(),
            mesh_name,
            geometry.triangle_count()
        );
        root.add_child(Node::mesh(mesh_name, Shape::from_geometry(geometry, material)));
    }

    if root.children.is_empty() {
        return Err(AssetLoadError::Empty(path.to_path_buf()));
    }
    log::info!(
        "Loaded {} ({} meshes)",
        path.display(),
        root.children.len()
    );

    Ok(Asset {
        root,
        clips: Vec::new(),
    })
}

fn material_from_mtl(material: &tobj::Material) -> StandardMaterial {
    let defaults = StandardMaterial::default();
    let color = material
        .diffuse
        .map(|[r, g, b]| Color::rgb(r, g, b))
        .unwrap_or(defaults.color);
    let roughness = material
        .shininess
        .map(shininess_to_roughness)
        .unwrap_or(defaults.roughness);
    StandardMaterial::new(color, roughness, 0.0)
}

/// Blinn-Phong exponent to an equivalent roughness
fn shininess_to_roughness(shininess: f32) -> f32 {
    (2.0 / (shininess.max(0.0) + 2.0)).sqrt()
}

/// An asset load running on a worker thread
pub struct AssetRequest {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<Asset, AssetLoadError>>,
    finished: bool,
}

impl AssetRequest {
    pub fn spawn(loader: Arc<dyn AssetLoader>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let future = loader.load(&path);

        let spawned = std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let result = pollster::block_on(future);
                // The receiver is gone when the view detached mid-load
                let _ = sender.send(result);
            });
        if let Err(err) = spawned {
            log::error!("Failed to spawn asset worker for {}: {err}", path.display());
        } else {
            log::debug!("Loading {} in the background", path.display());
        }

        Self {
            path,
            receiver,
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking; yields the result exactly once
    pub fn poll(&mut self) -> Option<Result<Asset, AssetLoadError>> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(Some(result)) => {
                self.finished = true;
                Some(result)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.finished = true;
                Some(Err(AssetLoadError::Canceled))
            }
        }
    }

    /// Blocks until the worker delivers
    pub fn wait(self) -> Result<Asset, AssetLoadError> {
        pollster::block_on(self.receiver).unwrap_or(Err(AssetLoadError::Canceled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "diorama_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    const TRIANGLE_OBJ: &str = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_loads_triangle_and_computes_normals() {
        let dir = temp_dir("obj_triangle");
        let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);

        let asset = pollster::block_on(ObjLoader.load(&path)).unwrap();
        assert_eq!(asset.root.name, "triangle");
        assert_eq!(asset.root.children.len(), 1);
        assert!(asset.clips.is_empty());

        let shape = asset.root.children[0].shape().unwrap();
        assert_eq!(shape.geometry().triangle_count(), 1);
        let normal = shape.geometry().normals[0];
        assert!((normal[2] - 1.0).abs() < 1e-6);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_mtl_diffuse_and_shininess() {
        let dir = temp_dir("obj_mtl");
        write(&dir, "paint.mtl", "newmtl red\nKd 1 0 0\nNs 98\n");
        let obj = "mtllib paint.mtl\no tri\nusemtl red\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let path = write(&dir, "painted.obj", obj);

        let asset = pollster::block_on(ObjLoader.load(&path)).unwrap();
        let material = asset.root.children[0].shape().unwrap().material;
        assert_eq!(material.color, Color::rgb(1.0, 0.0, 0.0));
        assert!((material.roughness - 0.02f32.sqrt()).abs() < 1e-6);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unsupported_extension() {
        let result = pollster::block_on(ObjLoader.load(Path::new("robot.glb")));
        assert!(matches!(result, Err(AssetLoadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let path = temp_dir("obj_missing").join("nothing.obj");
        let result = pollster::block_on(ObjLoader.load(&path));
        assert!(matches!(result, Err(AssetLoadError::Read { .. })));
    }

    #[test]
    fn test_request_polls_until_done() {
        let dir = temp_dir("obj_request");
        let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);

        let mut request = AssetRequest::spawn(Arc::new(ObjLoader), &path);
        let deadline = Instant::now() + Duration::from_secs(10);
        let result = loop {
            if let Some(result) = request.poll() {
                break result;
            }
            assert!(Instant::now() < deadline, "asset worker timed out");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert!(result.is_ok());
        assert!(request.is_finished());
        assert!(request.poll().is_none());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_request_wait_reports_failure() {
        let request = AssetRequest::spawn(Arc::new(ObjLoader), "scene.fbx");
        assert!(matches!(
            request.wait(),
            Err(AssetLoadError::UnsupportedFormat(_))
        ));
    }
}
