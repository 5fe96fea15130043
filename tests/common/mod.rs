//! Shared fixtures: recording collaborators and context builders.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use tracegen::emit::{
    CameraEmitter, Collaborators, DeviceEmitter, LightEmitter, MaterialEmitter, ShadingTree,
    TechniqueEmitter,
};
use tracegen::errors::Result;
use tracegen::loader::LoaderContext;
use tracegen::scene::{Scene, SceneDatabase};
use tracegen::settings::LoaderOptions;
use tracegen::target::Target;
use tracegen::technique::{CallbackType, TechniqueInfo, TechniqueVariantInfo, VariantFeatures};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One collaborator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Header { ray_generation: bool },
    Technique,
    Callback(CallbackType),
    Lights { restricted: bool },
    Camera,
    Material(usize),
    Device,
    Database,
}

/// Implements every collaborator trait with fixed, recognizable text and
/// records each call.
#[derive(Default)]
pub struct MockEmitters {
    pub info: TechniqueInfo,
    calls: Mutex<Vec<Recorded>>,
}

impl MockEmitters {
    pub fn new(info: TechniqueInfo) -> Self {
        Self {
            info,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            technique: self,
            camera: self,
            light: self,
            material: self,
            device: self,
        }
    }

    /// Drains the recorded calls.
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub fn count(&self, call: Recorded) -> usize {
        self.calls.lock().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: Recorded) {
        self.calls.lock().push(call);
    }
}

impl TechniqueEmitter for MockEmitters {
    fn info(&self, _technique_type: &str, _scene: &Scene) -> Result<TechniqueInfo> {
        Ok(self.info.clone())
    }

    fn generate_header(&self, _ctx: &LoaderContext, is_ray_generation: bool) -> Result<String> {
        self.record(Recorded::Header {
            ray_generation: is_ray_generation,
        });
        Ok(if is_ray_generation {
            "// mock header\nfn init_raypayload() = mock_payload();".to_string()
        } else {
            "// mock header".to_string()
        })
    }

    fn generate(&self, _ctx: &LoaderContext) -> Result<String> {
        self.record(Recorded::Technique);
        Ok("  let technique = mock_technique();".to_string())
    }

    fn generate_callback(&self, _ctx: &LoaderContext, callback: CallbackType) -> Result<String> {
        self.record(Recorded::Callback(callback));
        Ok(format!("  let callback = mock_callback({});", callback.index()))
    }
}

impl LightEmitter for MockEmitters {
    fn generate(&self, _tree: &ShadingTree<'_>, restrict_to_current_hit: bool) -> Result<String> {
        self.record(Recorded::Lights {
            restricted: restrict_to_current_hit,
        });
        Ok(format!("  let lights = mock_lights({restrict_to_current_hit});"))
    }
}

impl CameraEmitter for MockEmitters {
    fn generate(&self, _ctx: &LoaderContext) -> Result<String> {
        self.record(Recorded::Camera);
        Ok("  let camera = mock_camera();".to_string())
    }
}

impl MaterialEmitter for MockEmitters {
    fn generate(&self, _tree: &ShadingTree<'_>, hit_group: usize) -> Result<String> {
        self.record(Recorded::Material(hit_group));
        Ok(format!("  let shader = mock_material({hit_group});"))
    }
}

impl DeviceEmitter for MockEmitters {
    fn construct_device(&self, _target: &Target) -> String {
        self.record(Recorded::Device);
        "let device = mock_device();".to_string()
    }

    fn generate_database(&self) -> String {
        self.record(Recorded::Database);
        "  let dtb = mock_database();".to_string()
    }
}

pub fn variant(features: VariantFeatures) -> TechniqueVariantInfo {
    TechniqueVariantInfo::new(features)
}

/// Context over `scene` with a finalized (empty) database.
pub fn context_with_scene(scene: Scene, info: TechniqueInfo, options: LoaderOptions) -> LoaderContext {
    let mut ctx = LoaderContext::new(scene, info, options).unwrap();
    ctx.set_database(Arc::new(SceneDatabase::new(0, 0)));
    ctx
}

pub fn context(info: TechniqueInfo) -> LoaderContext {
    context_with_scene(Scene::new(), info, LoaderOptions::default())
}

pub fn single(features: VariantFeatures) -> LoaderContext {
    context(TechniqueInfo::single(variant(features)))
}
