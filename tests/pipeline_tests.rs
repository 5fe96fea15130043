//! Pipeline Tests
//!
//! Tests for:
//! - Required entry points per variant layout
//! - Variant congruence between source text and compiled handles
//! - Whole-compile abort on the first failure
//! - Parallel generation matching sequential output
//! - Compilation cache deduplication

mod common;

use std::sync::Arc;

use common::{MockEmitters, Recorded, context, context_with_scene, variant};

use tracegen::compile::{ShaderCache, ShaderToolchain};
use tracegen::emit::Collaborators;
use tracegen::emit::builtin::TemplateTechnique;
use tracegen::errors::{CodegenError, Result};
use tracegen::loader::LoaderContext;
use tracegen::pipeline::ShaderPipeline;
use tracegen::scene::{Object, Scene, SceneDatabase};
use tracegen::settings::LoaderOptions;
use tracegen::technique::{
    CallbackType, ShaderHandle, ShaderKind, ShadowHandlingMode, TechniqueInfo, VariantFeatures,
};

/// Toolchain that hands out sequential handles and remembers what it saw.
#[derive(Default)]
struct RecordingToolchain {
    compiled: Vec<(ShaderKind, usize)>,
}

impl ShaderToolchain for RecordingToolchain {
    fn compile(&mut self, kind: ShaderKind, source: &str) -> Result<ShaderHandle> {
        self.compiled.push((kind, source.len()));
        Ok(ShaderHandle(self.compiled.len() as u64))
    }
}

fn mixed_info() -> TechniqueInfo {
    TechniqueInfo {
        variants: vec![
            variant(VariantFeatures::USES_LIGHTS),
            variant(VariantFeatures::USES_LIGHTS | VariantFeatures::BEFORE_ITERATION_CALLBACK)
                .with_shadow_handling(ShadowHandlingMode::Advanced),
            variant(VariantFeatures::LOCK_FRAMEBUFFER | VariantFeatures::AFTER_ITERATION_CALLBACK),
        ],
        enabled_aovs: Vec::new(),
    }
}

fn scene_with_materials(count: usize) -> Scene {
    let mut scene = Scene::new();
    for i in 0..count {
        scene.add_bsdf(&format!("material_{i}"), Object::new("diffuse"));
    }
    scene
}

// ============================================================================
// Variant Layout
// ============================================================================

#[test]
fn variants_contain_exactly_required_entry_points() {
    let mocks = MockEmitters::default();
    let mut ctx = context_with_scene(scene_with_materials(2), mixed_info(), LoaderOptions::default());
    let pipeline = ShaderPipeline::new(mocks.collaborators());

    let variants = pipeline.generate(&mut ctx).unwrap();
    assert_eq!(variants.len(), 3);

    for v in &variants {
        assert_eq!(v.hit_shaders.len(), 2);
    }

    assert!(variants[0].advanced_shadow_hit_shader.is_none());
    assert!(variants[0].callback_shaders.iter().all(Option::is_none));
    assert_eq!(variants[0].shader_count(), 4);

    assert!(variants[1].advanced_shadow_hit_shader.is_some());
    assert!(variants[1].advanced_shadow_miss_shader.is_some());
    assert!(variants[1].callback(CallbackType::BeforeIteration).is_some());
    assert!(variants[1].callback(CallbackType::AfterIteration).is_none());
    assert_eq!(variants[1].shader_count(), 7);

    assert!(variants[2].callback(CallbackType::AfterIteration).is_some());
    assert!(variants[2].miss_shader.contains("let use_framebuffer = false;"));

    assert_eq!(mocks.count(Recorded::Material(0)), 3);
    assert_eq!(mocks.count(Recorded::Material(1)), 3);
}

#[test]
fn compiled_sets_are_congruent() {
    let mocks = MockEmitters::default();
    let mut ctx = context_with_scene(scene_with_materials(3), mixed_info(), LoaderOptions::default());
    let variants = ShaderPipeline::new(mocks.collaborators()).generate(&mut ctx).unwrap();

    let mut cache = ShaderCache::new(RecordingToolchain::default());
    let sets = cache.compile_all(&variants).unwrap();

    for (source, compiled) in variants.iter().zip(&sets) {
        assert!(source.is_congruent_with(compiled));
        assert!(compiled.is_congruent_with(source));
        assert_eq!(source.shader_count(), compiled.shader_count());

        let kinds: Vec<ShaderKind> = source.iter().map(|(k, _)| k).collect();
        let compiled_kinds: Vec<ShaderKind> = compiled.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, compiled_kinds);
    }
}

#[test]
fn cache_compiles_identical_programs_once() {
    let mocks = MockEmitters::default();
    // Two identical variants
    let info = TechniqueInfo {
        variants: vec![variant(VariantFeatures::USES_LIGHTS), variant(VariantFeatures::USES_LIGHTS)],
        enabled_aovs: Vec::new(),
    };
    let mut ctx = context_with_scene(scene_with_materials(2), info, LoaderOptions::default());
    let variants = ShaderPipeline::new(mocks.collaborators()).generate(&mut ctx).unwrap();
    assert_eq!(variants[0], variants[1]);

    let mut cache = ShaderCache::new(RecordingToolchain::default());
    let sets = cache.compile_all(&variants).unwrap();

    // ray generation, miss, and two hit groups
    assert_eq!(cache.module_count(), 4);
    assert_eq!(cache.toolchain().compiled.len(), 4);
    assert_eq!(sets[0], sets[1]);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn missing_database_aborts_whole_compile() {
    let mocks = MockEmitters::default();
    let mut ctx = LoaderContext::new(Scene::new(), mixed_info(), LoaderOptions::default()).unwrap();

    let result = ShaderPipeline::new(mocks.collaborators()).generate(&mut ctx);
    assert!(matches!(result, Err(CodegenError::DatabaseMissing)));
    assert!(mocks.take().is_empty());
}

#[test]
fn collaborator_error_propagates_unchanged() {
    let mocks = MockEmitters::default();
    let mut scene = Scene::new();
    scene.add_bsdf("fur", Object::new("hair"));
    let mut ctx = context_with_scene(scene, mixed_info(), LoaderOptions::default());
    ctx.select_technique_variant(2);

    // Real material emitter, mocked everything else
    let emitters = Collaborators {
        material: &tracegen::emit::builtin::TemplateMaterials,
        ..mocks.collaborators()
    };
    let result = ShaderPipeline::new(emitters).generate(&mut ctx);

    assert!(matches!(
        result,
        Err(CodegenError::UnsupportedPlugin { category: "bsdf", .. })
    ));
    // Selection restored after the aborted run
    assert_eq!(ctx.current_technique_variant(), 2);
}

// ============================================================================
// Parallel Generation
// ============================================================================

#[test]
fn parallel_matches_sequential_with_mocks() {
    let mocks = MockEmitters::default();
    let mut ctx = context_with_scene(scene_with_materials(4), mixed_info(), LoaderOptions::default());
    let pipeline = ShaderPipeline::new(mocks.collaborators());

    let parallel = pipeline.generate_parallel(&ctx).unwrap();
    let sequential = pipeline.generate(&mut ctx).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn parallel_matches_sequential_with_builtins() {
    common::init_logger();

    let mut scene = scene_with_materials(2);
    scene.add_light("sun", Object::new("directional"));
    scene.add_entity("lamp_mesh", Object::new("entity"));
    scene.add_light("lamp", Object::new("area").with_property("entity", "lamp_mesh"));

    let options = LoaderOptions {
        technique_type: Some("ppm".into()),
        ..Default::default()
    };
    let mut ctx = LoaderContext::load(scene, options, &TemplateTechnique).unwrap();
    ctx.set_database(Arc::new(SceneDatabase::new(1, 0)));

    let pipeline = ShaderPipeline::builtin();
    let parallel = pipeline.generate_parallel(&ctx).unwrap();
    let sequential = pipeline.generate(&mut ctx).unwrap();

    assert_eq!(parallel.len(), 2);
    assert_eq!(parallel, sequential);
    assert_eq!(ctx.current_technique_variant(), 0);
}

#[test]
fn parallel_propagates_errors() {
    let mocks = MockEmitters::default();
    let ctx = LoaderContext::new(Scene::new(), mixed_info(), LoaderOptions::default()).unwrap();

    let result = ShaderPipeline::new(mocks.collaborators()).generate_parallel(&ctx);
    assert!(matches!(result, Err(CodegenError::DatabaseMissing)));
}

#[test]
fn empty_technique_generates_nothing() {
    let mocks = MockEmitters::default();
    let mut ctx = context(TechniqueInfo::default());

    let variants = ShaderPipeline::new(mocks.collaborators()).generate(&mut ctx).unwrap();
    assert!(variants.is_empty());
}
