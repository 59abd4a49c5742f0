use std::{
    path::Path,
    sync::{
        mpsc::{self, channel},
        Arc, RwLock,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::*, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::{
    naga::{
        self,
        back::wgsl::WriterFlags,
        valid::{Capabilities, ValidationFlags},
    },
    PollType, RenderPipeline,
};

const SHADER_FOLDER: &str = "assets/shaders";
const SHARED_SHADER_MODULES_FOLDER: &str = "assets/shaders/shared";

pub type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub struct ShaderDefinition {
    pub name: &'static str,
    pub path: &'static str,
}

pub struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub type PipelineId = Id<PipelineCacheEntry>;

#[derive(Default)]
pub struct PipelineCacheEntry(Option<wgpu::RenderPipeline>);

pub struct PipelineCacheBuilder {
    shaders: Arena<ShaderEntry>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self {
            shaders: Arena::new(),
            pipelines: Arena::new(),
        }
    }

    pub fn add_shader(&mut self, def: ShaderDefinition, factory: PipelineFactory) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineCacheEntry::default());
        self.shaders.alloc(ShaderEntry {
            pipeline_id,
            def,
            factory,
        });
        pipeline_id
    }

    fn build(self) -> PipelineCache {
        PipelineCache {
            shaders: Arc::new(self.shaders),
            pipelines: self.pipelines,
        }
    }
}

pub struct PipelineCache {
    shaders: Arc<Arena<ShaderEntry>>,
    pipelines: Arena<PipelineCacheEntry>,
}

impl PipelineCache {
    /// `None` only if the pipeline never compiled, which `ShaderLoader::new`
    /// rules out.
    pub fn get(&self, id: PipelineId) -> Option<&RenderPipeline> {
        self.pipelines.get(id).and_then(|entry| entry.0.as_ref())
    }
}

/// Compiles shaders into pipelines, and recompiles them on a watcher thread
/// whenever a file under the shader folder changes.
pub struct ShaderLoader {
    pub cache: PipelineCache,
    device: wgpu::Device,
    receiver: mpsc::Receiver<(&'static str, PipelineId, wgpu::RenderPipeline)>,
    composer: Arc<RwLock<Composer>>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ShaderLoader {
    pub fn new(device: wgpu::Device, cache_builder: PipelineCacheBuilder) -> anyhow::Result<Self> {
        let cache = cache_builder.build();
        let (send_new_pipelines, recv_new_pipelines) = channel();

        let composer = Arc::new(RwLock::new(
            create_composer().context("Failed to create shader composer")?,
        ));

        let shaders = cache.shaders.clone();
        let watcher_device = device.clone();
        let watcher_composer = composer.clone();
        let mut debouncer = new_debouncer_opt(
            notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
            move |res: DebounceEventResult| match res {
                Ok(events) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any {
                            continue;
                        }

                        let Some(entry) = shaders
                            .iter()
                            .map(|(_, entry)| entry)
                            .find(|entry| event.path.ends_with(entry.def.path))
                        else {
                            continue;
                        };

                        match compile_file(&watcher_device, entry, &watcher_composer) {
                            Ok(pipeline) => {
                                if send_new_pipelines
                                    .send((entry.def.name, entry.pipeline_id, pipeline))
                                    .is_err()
                                {
                                    log::debug!("Shader loader gone, dropping {}", entry.def.name);
                                }
                            }
                            Err(e) => log::warn!("Failed to reload shader: {:#}", e),
                        }
                    }
                }
                Err(e) => log::warn!("Error debouncing shader changes: {}", e),
            },
        )
        .context("Failed to create shader watcher")?;

        let absolute_shader_folder = Path::new(SHADER_FOLDER)
            .canonicalize()
            .with_context(|| format!("Shader folder {} not found", SHADER_FOLDER))?;

        debouncer
            .watcher()
            .watch(&absolute_shader_folder, RecursiveMode::Recursive)
            .context("Failed to watch shader folder")?;

        let mut shader_loader = Self {
            device,
            cache,
            receiver: recv_new_pipelines,
            composer,
            _debouncer: debouncer,
        };

        shader_loader.create_all_pipelines()?;

        Ok(shader_loader)
    }

    fn create_all_pipelines(&mut self) -> anyhow::Result<()> {
        let shaders = self.cache.shaders.clone();
        for (_, shader) in shaders.iter() {
            let pipeline = compile_file(&self.device, shader, &self.composer)
                .with_context(|| format!("Failed to compile shader: {}", shader.def.name))?;

            if let Some(entry) = self.cache.pipelines.get_mut(shader.pipeline_id) {
                entry.0 = Some(pipeline);
            }
        }
        Ok(())
    }

    /// Swaps in pipelines rebuilt by the watcher since the last call.
    pub fn load_pending_shaders(&mut self) {
        while let Ok((name, pipeline_id, pipeline)) = self.receiver.try_recv() {
            if let Some(entry) = self.cache.pipelines.get_mut(pipeline_id) {
                log::info!("Shader reloaded: {}", name);
                entry.0 = Some(pipeline);
            }
        }
    }
}

fn compile_file(
    device: &wgpu::Device,
    shader: &ShaderEntry,
    composer: &RwLock<Composer>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = Path::new(SHADER_FOLDER).join(shader.def.path);
    let shader_code = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;

    let file_path = path.to_string_lossy().to_string();

    let module = {
        let mut composer = composer
            .write()
            .map_err(|_| anyhow::anyhow!("Shader composer lock poisoned"))?;

        composer
            .make_naga_module(NagaModuleDescriptor {
                file_path: &file_path,
                source: &shader_code,
                ..Default::default()
            })
            .with_context(|| format!("Failed to compose {}", file_path))?
    };

    // wgpu validates again when the module is created.
    let info = naga::valid::Validator::new(ValidationFlags::empty(), Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    let shader_code = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to convert Naga module to WGSL string")?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = (shader.factory)(device, &shader.def, &shader_code);

    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(anyhow::anyhow!(
            "Shader compilation failed for {}: {}",
            shader.def.name,
            error
        ));
    }

    pipeline
}

fn create_composer() -> anyhow::Result<Composer> {
    let shared_files = std::fs::read_dir(SHARED_SHADER_MODULES_FOLDER)
        .with_context(|| format!("Failed to read {}", SHARED_SHADER_MODULES_FOLDER))?;
    let mut composer = Composer::default();

    for entry in shared_files {
        let path = entry?.path();

        if !path.is_file() || path.extension().map_or(true, |ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_path = path.to_string_lossy().to_string();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .with_context(|| format!("Failed to add shared shader module: {}", file_path))?;

        log::debug!("Added shared shader module {}", file_path);
    }

    Ok(composer)
}
