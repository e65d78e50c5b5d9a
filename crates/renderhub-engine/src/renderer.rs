//! Template renderer — Tera execution wrapped in the hook pipeline.
//!
//! Templates come from a base directory, loaded lazily on first use, or from
//! sources embedded at build time. Inline template text is compiled once per
//! distinct source and cached. Every render builds a fresh
//! [`HookContext`] and runs it through [`RenderPipeline`] against the
//! renderer's own [`PriorityHookRegistry`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tera::{Context, Filter, Function, Tera, Value};
use tracing::{debug, info};

use renderhub_core::config::renderer::{RendererConfig, default_extension};
use renderhub_core::error::{AppError, ErrorKind};
use renderhub_core::result::AppResult;
use renderhub_hooks::{
    DataMap, HookChain, HookContext, PostHook, PreHook, Priority, PriorityHookRegistry,
    RenderPipeline,
};

use crate::convert::{overlay, to_data_map};
use crate::detect::is_template_source;
use crate::error::engine_error;
use crate::filters::{self, TERA_FILTERS, TERA_FUNCTIONS};

const INLINE_PREFIX: &str = "__inline_";

/// Filter kept by the renderer so it can be registered again on reload.
#[derive(Clone)]
struct SharedFilter(Arc<dyn Filter>);

impl Filter for SharedFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.filter(value, args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

/// Function kept by the renderer so it can be registered again on reload.
#[derive(Clone)]
struct SharedFunction(Arc<dyn Function>);

impl Function for SharedFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        self.0.call(args)
    }

    fn is_safe(&self) -> bool {
        self.0.is_safe()
    }
}

/// Compiled templates and the names they were registered under.
struct EngineState {
    tera: Tera,
    /// Embedded and file templates.
    loaded: HashSet<String>,
    /// Inline source text → generated template name.
    inline: HashMap<String, String>,
}

impl EngineState {
    fn compiled(&self) -> usize {
        self.loaded.len() + self.inline.len()
    }
}

/// Thread-safe template renderer.
///
/// Create one with [`Renderer::builder`]. All operations take `&self`, so a
/// renderer can be shared between threads behind an `Arc`.
pub struct Renderer {
    base_dir: Option<PathBuf>,
    extension: String,
    autoescape: bool,
    embedded: BTreeMap<String, String>,
    engine: RwLock<EngineState>,
    globals: RwLock<DataMap>,
    filters: RwLock<BTreeMap<String, SharedFilter>>,
    functions: RwLock<BTreeMap<String, SharedFunction>>,
    hooks: PriorityHookRegistry,
}

impl Renderer {
    /// Starts building a renderer.
    pub fn builder() -> RendererBuilder {
        RendererBuilder::default()
    }

    /// Renders `input`, treating it as inline source when it contains
    /// template syntax and as a template name otherwise.
    pub fn render<T: Serialize + ?Sized>(&self, input: &str, data: &T) -> AppResult<String> {
        if is_template_source(input) {
            self.render_string(input, data)
        } else {
            self.render_template(input, data)
        }
    }

    /// Renders the named template. The configured extension is appended
    /// unless `name` already ends with it.
    pub fn render_template<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
    ) -> AppResult<String> {
        let ctx = HookContext::new(name, to_data_map(data)?);
        RenderPipeline::new(&self.hooks).run(ctx, |ctx| {
            let file = self.resolve_name(&ctx.template_name);
            self.render_file(&file, &ctx.data)
        })
    }

    /// Renders inline template text.
    pub fn render_string<T: Serialize + ?Sized>(
        &self,
        source: &str,
        data: &T,
    ) -> AppResult<String> {
        let ctx = HookContext::inline(source, to_data_map(data)?);
        RenderPipeline::new(&self.hooks).run(ctx, |ctx| {
            let source = ctx.template_source.as_deref().unwrap_or_default();
            self.render_inline(source, &ctx.data)
        })
    }

    /// Renders like [`render`](Self::render) and writes the output to every
    /// writer in order.
    pub fn render_to<T: Serialize + ?Sized>(
        &self,
        input: &str,
        data: &T,
        writers: &mut [&mut dyn Write],
    ) -> AppResult<()> {
        let output = self.render(input, data)?;
        for writer in writers.iter_mut() {
            writer.write_all(output.as_bytes())?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Merges `data` into the global table. Existing keys are overwritten.
    pub fn global_context<T: Serialize + ?Sized>(&self, data: &T) -> AppResult<()> {
        let data = to_data_map(data)?;
        let mut globals = self.globals.write().unwrap_or_else(PoisonError::into_inner);
        debug!(keys = data.len(), "Merging global data");
        globals.extend(data);
        Ok(())
    }

    /// Returns a copy of the global table.
    pub fn globals(&self) -> DataMap {
        self.globals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registers a custom filter.
    ///
    /// Fails when a filter with the same name already exists, including the
    /// builtins.
    pub fn register_filter<F: Filter + 'static>(&self, name: &str, filter: F) -> AppResult<()> {
        let mut filters = self.filters.write().unwrap_or_else(PoisonError::into_inner);
        if filters.contains_key(name) || TERA_FILTERS.contains(&name) {
            return Err(AppError::validation(format!("filter {name} already exists")));
        }

        let filter = SharedFilter(Arc::new(filter));
        self.engine
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tera
            .register_filter(name, filter.clone());
        filters.insert(name.to_string(), filter);

        debug!(filter = name, "Filter registered");
        Ok(())
    }

    /// Registers a custom function callable from templates.
    ///
    /// Fails when a function with the same name already exists, including
    /// the builtins.
    pub fn register_function<F: Function + 'static>(
        &self,
        name: &str,
        function: F,
    ) -> AppResult<()> {
        let mut functions = self.functions.write().unwrap_or_else(PoisonError::into_inner);
        if functions.contains_key(name) || TERA_FUNCTIONS.contains(&name) {
            return Err(AppError::validation(format!("function {name} already exists")));
        }

        let function = SharedFunction(Arc::new(function));
        self.engine
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tera
            .register_function(name, function.clone());
        functions.insert(name.to_string(), function);

        debug!(function = name, "Function registered");
        Ok(())
    }

    /// Registers a pre-hook with the renderer's registry.
    pub fn register_pre_hook(&self, hook: PreHook, priority: impl Into<Priority>) {
        self.hooks.add_pre_hook(hook, priority);
    }

    /// Registers a post-hook with the renderer's registry.
    pub fn register_post_hook(&self, hook: PostHook, priority: impl Into<Priority>) {
        self.hooks.add_post_hook(hook, priority);
    }

    /// Registers both sides of `chain` as single hooks at `priority`.
    ///
    /// The chain is captured as it is now. An empty side registers nothing.
    pub fn register_chain(&self, chain: &HookChain, priority: impl Into<Priority>) {
        let priority = priority.into();
        if !chain.pre_hooks().is_empty() {
            self.hooks.add_pre_hook(chain.as_pre_hook(), priority);
        }
        if !chain.post_hooks().is_empty() {
            self.hooks.add_post_hook(chain.as_post_hook(), priority);
        }
    }

    /// Drops every compiled template so files are read again on next use.
    ///
    /// Filters, functions and global data are kept.
    pub fn reload(&self) -> AppResult<()> {
        let filters = self.filters.read().unwrap_or_else(PoisonError::into_inner);
        let functions = self.functions.read().unwrap_or_else(PoisonError::into_inner);
        let fresh = build_engine(self.autoescape, &self.embedded, &filters, &functions)?;

        let mut engine = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = engine.compiled();
        *engine = fresh;

        info!(dropped, "Templates reloaded");
        Ok(())
    }

    /// Returns the renderer's hook registry.
    pub fn hooks(&self) -> &PriorityHookRegistry {
        &self.hooks
    }

    /// Returns the template directory, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Returns the template extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Number of templates currently compiled, inline ones included.
    pub fn compiled_count(&self) -> usize {
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .compiled()
    }

    fn resolve_name(&self, name: &str) -> String {
        resolve_name(name, &self.extension)
    }

    fn read_template(&self, file: &str) -> AppResult<String> {
        let Some(base_dir) = &self.base_dir else {
            return Err(AppError::not_found(format!(
                "failed to load template {file}: no template directory configured"
            )));
        };

        let escapes = Path::new(file).components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return Err(AppError::validation(format!(
                "failed to load template {file}: path escapes the template directory"
            )));
        }

        let path = base_dir.join(file);
        fs::read_to_string(&path).map_err(|e| {
            let kind = match e.kind() {
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::Io,
            };
            AppError::with_source(
                kind,
                format!("failed to load template {}: {e}", path.display()),
                e,
            )
        })
    }

    /// Renders a file template, loading it first if needed. Lookup, load
    /// and render happen under one guard.
    fn render_file(&self, file: &str, data: &DataMap) -> AppResult<String> {
        let context = self.context(data)?;
        {
            let engine = self.engine.read().unwrap_or_else(PoisonError::into_inner);
            if engine.loaded.contains(file) {
                return engine.tera.render(file, &context).map_err(engine_error);
            }
        }

        let mut engine = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        if !engine.loaded.contains(file) {
            let source = self.read_template(file)?;
            engine
                .tera
                .add_raw_template(file, &source)
                .map_err(engine_error)?;
            engine.loaded.insert(file.to_string());
            debug!(template = file, "Template loaded");
        }
        engine.tera.render(file, &context).map_err(engine_error)
    }

    /// Renders inline source, compiling it once per distinct text.
    fn render_inline(&self, source: &str, data: &DataMap) -> AppResult<String> {
        let context = self.context(data)?;
        {
            let engine = self.engine.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(name) = engine.inline.get(source) {
                return engine.tera.render(name, &context).map_err(engine_error);
            }
        }

        let mut engine = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        let name = match engine.inline.get(source).cloned() {
            Some(name) => name,
            None => {
                let name = format!("{INLINE_PREFIX}{}", engine.inline.len());
                engine
                    .tera
                    .add_raw_template(&name, source)
                    .map_err(engine_error)?;
                engine.inline.insert(source.to_string(), name.clone());
                debug!(template = %name, "Inline template compiled");
                name
            }
        };
        engine.tera.render(&name, &context).map_err(engine_error)
    }

    fn context(&self, data: &DataMap) -> AppResult<Context> {
        let globals = self.globals.read().unwrap_or_else(PoisonError::into_inner);
        let merged = overlay(&globals, data.clone());
        Context::from_serialize(&merged).map_err(engine_error)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("base_dir", &self.base_dir)
            .field("extension", &self.extension)
            .field("autoescape", &self.autoescape)
            .field("embedded", &self.embedded.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Builds a Tera instance holding the embedded templates, `filters` and
/// `functions`.
fn build_engine(
    autoescape: bool,
    embedded: &BTreeMap<String, String>,
    filters: &BTreeMap<String, SharedFilter>,
    functions: &BTreeMap<String, SharedFunction>,
) -> AppResult<EngineState> {
    let mut tera = Tera::default();
    if !autoescape {
        tera.autoescape_on(vec![]);
    }
    for (name, filter) in filters {
        tera.register_filter(name, filter.clone());
    }
    for (name, function) in functions {
        tera.register_function(name, function.clone());
    }

    tera.add_raw_templates(embedded.iter())
        .map_err(engine_error)?;

    Ok(EngineState {
        tera,
        loaded: embedded.keys().cloned().collect(),
        inline: HashMap::new(),
    })
}

fn resolve_name(name: &str, extension: &str) -> String {
    if extension.is_empty() || name.ends_with(extension) {
        name.to_string()
    } else {
        format!("{name}{extension}")
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Builder for [`Renderer`].
#[derive(Default)]
pub struct RendererBuilder {
    base_dir: Option<PathBuf>,
    templates: Vec<(String, String)>,
    extension: Option<String>,
    autoescape: bool,
    globals: DataMap,
    filters: Vec<(String, SharedFilter)>,
    functions: Vec<(String, SharedFunction)>,
    error: Option<AppError>,
}

impl RendererBuilder {
    /// Loads templates from `dir`.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Embeds a template. `name` follows the same extension rule as
    /// [`Renderer::render_template`].
    pub fn template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.push((name.into(), source.into()));
        self
    }

    /// Sets the template extension. A leading dot is added when missing.
    pub fn extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = Some(normalize_extension(extension.as_ref()));
        self
    }

    /// Enables HTML auto-escaping for `.html`, `.htm` and `.xml` templates.
    pub fn autoescape(mut self, enabled: bool) -> Self {
        self.autoescape = enabled;
        self
    }

    /// Seeds the global table. Conversion errors are reported by `build`.
    pub fn global_data<T: Serialize + ?Sized>(mut self, data: &T) -> Self {
        match to_data_map(data) {
            Ok(map) => self.globals.extend(map),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Adds a custom filter.
    pub fn filter<F: Filter + 'static>(mut self, name: impl Into<String>, filter: F) -> Self {
        self.filters
            .push((name.into(), SharedFilter(Arc::new(filter))));
        self
    }

    /// Adds a custom function.
    pub fn function<F: Function + 'static>(
        mut self,
        name: impl Into<String>,
        function: F,
    ) -> Self {
        self.functions
            .push((name.into(), SharedFunction(Arc::new(function))));
        self
    }

    /// Applies the `[renderer]` configuration section.
    pub fn from_config(mut self, config: &RendererConfig) -> Self {
        if let Some(dir) = &config.base_dir {
            self.base_dir = Some(PathBuf::from(dir));
        }
        self.extension = Some(normalize_extension(&config.extension));
        self.autoescape = config.autoescape;
        self
    }

    /// Builds the renderer.
    pub fn build(self) -> AppResult<Renderer> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.base_dir.is_none() && self.templates.is_empty() {
            return Err(AppError::configuration(
                "renderer needs a template directory or embedded templates",
            ));
        }
        if let Some(dir) = &self.base_dir {
            if !dir.is_dir() {
                return Err(AppError::configuration(format!(
                    "template directory {} does not exist",
                    dir.display()
                )));
            }
        }

        let mut filter_store = BTreeMap::new();
        filter_store.insert("trim".to_string(), SharedFilter(Arc::new(filters::trim)));
        filter_store.insert(
            "lowerfirst".to_string(),
            SharedFilter(Arc::new(filters::lowerfirst)),
        );
        for (name, filter) in self.filters {
            if filter_store.contains_key(&name) || TERA_FILTERS.contains(&name.as_str()) {
                return Err(AppError::validation(format!("filter {name} already exists")));
            }
            filter_store.insert(name, filter);
        }

        let mut function_store = BTreeMap::new();
        for (name, function) in self.functions {
            if function_store.contains_key(&name) || TERA_FUNCTIONS.contains(&name.as_str()) {
                return Err(AppError::validation(format!(
                    "function {name} already exists"
                )));
            }
            function_store.insert(name, function);
        }

        let extension = self.extension.unwrap_or_else(default_extension);
        let embedded: BTreeMap<String, String> = self
            .templates
            .into_iter()
            .map(|(name, source)| (resolve_name(&name, &extension), source))
            .collect();
        let engine = build_engine(self.autoescape, &embedded, &filter_store, &function_store)?;

        let renderer = Renderer {
            base_dir: self.base_dir,
            extension,
            autoescape: self.autoescape,
            embedded,
            engine: RwLock::new(engine),
            globals: RwLock::new(self.globals),
            filters: RwLock::new(filter_store),
            functions: RwLock::new(function_store),
            hooks: PriorityHookRegistry::new(),
        };

        info!(
            base_dir = ?renderer.base_dir,
            extension = %renderer.extension,
            embedded = renderer.embedded.len(),
            "Renderer ready"
        );
        Ok(renderer)
    }
}

impl fmt::Debug for RendererBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererBuilder")
            .field("base_dir", &self.base_dir)
            .field("templates", &self.templates.len())
            .field("extension", &self.extension)
            .field("autoescape", &self.autoescape)
            .finish_non_exhaustive()
    }
}
