//! Resolve/load integration tests
//!
//! Drives [`Hooks`] through mock host continuations and a recording engine.

use async_trait::async_trait;
use parking_lot::Mutex;
use spacey_hooks::legacy::{FormatContext, Formatted, TransformSourceContext, Transformed};
use spacey_hooks::{
    GetFormat, HookError, Hooks, Load, LoadContext, Loaded, ModuleFormat, ProjectConfig, Resolve,
    ResolveContext, Resolved, Result, Source, SourceMapOptions, SourceMapsFlag, TransformEngine,
    TransformOptions, TransformOutput, TransformSource, Variant,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{TempDir, tempdir};
use url::Url;

const JSX_SOURCE: &str = "export const el = <div className=\"x\" />;\n";

/// Engine returning a fixed rendering of its input and recording every call
#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<(String, TransformOptions)>>,
}

impl RecordingEngine {
    fn output_for(source: &str, options: &TransformOptions) -> String {
        format!("/* {} */\n{}", options.variant, source.replace('<', "h("))
    }

    fn calls(&self) -> Vec<(String, TransformOptions)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TransformEngine for RecordingEngine {
    async fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput> {
        self.calls.lock().push((source.to_string(), options.clone()));
        Ok(TransformOutput {
            code: Self::output_for(source, options),
        })
    }
}

/// Engine rejecting every input like a parser would
struct FailingEngine;

#[async_trait]
impl TransformEngine for FailingEngine {
    async fn transform(&self, _source: &str, _options: &TransformOptions) -> Result<TransformOutput> {
        Err(HookError::Transform(
            "<stdin>:1:9: ERROR: Expected \";\" but found \"}\"".to_string(),
        ))
    }
}

/// Host resolver returning a fixed result
struct DefaultResolve {
    calls: AtomicUsize,
}

impl DefaultResolve {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn resolved() -> Resolved {
        Resolved {
            url: String::new(),
            short_circuit: false,
        }
    }
}

#[async_trait]
impl Resolve for DefaultResolve {
    async fn resolve(&self, _specifier: &str, _context: &ResolveContext, _next: &dyn Resolve) -> Result<Resolved> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::resolved())
    }
}

/// Host loader echoing the URL as its source
struct DefaultLoad;

#[async_trait]
impl Load for DefaultLoad {
    async fn load(&self, url: &str, context: &LoadContext, _next: &dyn Load) -> Result<Loaded> {
        Ok(Loaded {
            source: Source::Text(url.to_string()),
            format: context.format.unwrap_or(ModuleFormat::CommonJs),
            short_circuit: false,
        })
    }
}

/// Middle layer that must see itself as the continuation's fallback
struct ChainProbe {
    saw_self: AtomicUsize,
}

#[async_trait]
impl Resolve for ChainProbe {
    async fn resolve(&self, specifier: &str, _context: &ResolveContext, next: &dyn Resolve) -> Result<Resolved> {
        let me = self as *const Self as *const ();
        let fallback = next as *const _ as *const ();
        if me == fallback {
            self.saw_self.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Resolved {
            url: format!("host:{}", specifier),
            short_circuit: false,
        })
    }
}

struct Fixture {
    dir: TempDir,
    hooks: Hooks<Arc<RecordingEngine>>,
    engine: Arc<RecordingEngine>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fixtures")).unwrap();
        std::fs::write(dir.path().join("fixtures/in.jsx"), JSX_SOURCE).unwrap();
        std::fs::write(dir.path().join("LICENSE.md"), "MIT\n").unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/@aduth/fixtures")).unwrap();
        std::fs::write(dir.path().join("node_modules/@aduth/fixtures/in.jsx"), JSX_SOURCE).unwrap();

        let engine = Arc::new(RecordingEngine::default());
        let hooks = Hooks::new(
            Arc::clone(&engine),
            ProjectConfig::new(dir.path().join("tsconfig.json")),
            SourceMapsFlag::default(),
        );
        Self { dir, hooks, engine }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn url(&self, rel: &str) -> String {
        Url::from_file_path(self.path().join(rel)).unwrap().to_string()
    }

    fn context(&self) -> ResolveContext {
        ResolveContext::with_parent(self.url("hooks.test.js"))
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_resolves_url_for_supported_file() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    let actual = fx.hooks.resolve("./fixtures/in.jsx", &fx.context(), &host).await.unwrap();

    assert_eq!(actual, Resolved::short_circuit(fx.url("fixtures/in.jsx")));
    assert_eq!(host.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolves_url_for_extensionless_file() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    let actual = fx.hooks.resolve("./fixtures/in", &fx.context(), &host).await.unwrap();

    assert_eq!(actual, Resolved::short_circuit(fx.url("fixtures/in.jsx")));
}

#[tokio::test]
async fn test_extensionless_prefers_declared_order() {
    let fx = Fixture::new();
    std::fs::write(fx.path().join("fixtures/in.ts"), "export {}").unwrap();
    std::fs::write(fx.path().join("fixtures/in.tsx"), "export {}").unwrap();
    let host = DefaultResolve::new();

    let actual = fx.hooks.resolve("./fixtures/in", &fx.context(), &host).await.unwrap();

    assert_eq!(actual.url, fx.url("fixtures/in.ts"));
}

#[tokio::test]
async fn test_defers_for_missing_extensionless_file() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    let actual = fx.hooks.resolve("./fixtures/nothing", &fx.context(), &host).await.unwrap();

    assert_eq!(actual, DefaultResolve::resolved());
    assert_eq!(host.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_defers_for_unsupported_file() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    let actual = fx.hooks.resolve("./LICENSE.md", &fx.context(), &host).await.unwrap();

    assert_eq!(actual, DefaultResolve::resolved());
}

#[tokio::test]
async fn test_defers_for_ignored_file() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    for specifier in [
        "./node_modules/@aduth/fixtures/in.jsx",
        "./node_modules/@aduth/fixtures/in",
    ] {
        let actual = fx.hooks.resolve(specifier, &fx.context(), &host).await.unwrap();
        assert_eq!(actual, DefaultResolve::resolved());
    }
    assert_eq!(host.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_defers_for_bare_and_builtin_imports() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    for specifier in ["esbuild-esm-loader", "node:fs", "data:text/javascript,export{}"] {
        let actual = fx.hooks.resolve(specifier, &fx.context(), &host).await.unwrap();
        assert_eq!(actual, DefaultResolve::resolved());
    }
}

#[tokio::test]
async fn test_continuation_receives_itself_as_fallback() {
    let fx = Fixture::new();
    let probe = ChainProbe {
        saw_self: AtomicUsize::new(0),
    };

    let actual = fx.hooks.resolve("lodash", &fx.context(), &probe).await.unwrap();

    assert_eq!(actual.url, "host:lodash");
    assert_eq!(probe.saw_self.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_relative_specifier_without_parent_is_an_error() {
    let fx = Fixture::new();
    let host = DefaultResolve::new();

    let err = fx
        .hooks
        .resolve("./fixtures/in.jsx", &ResolveContext::default(), &host)
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::InvalidUrl { .. }));
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

fn module_context() -> LoadContext {
    LoadContext {
        format: Some(ModuleFormat::Module),
        conditions: Vec::new(),
    }
}

#[tokio::test]
async fn test_transforms_source_for_supported_file() {
    let fx = Fixture::new();
    let url = fx.url("fixtures/in.jsx");

    let actual = fx.hooks.load(&url, &module_context(), &DefaultLoad).await.unwrap();

    let expected_options = TransformOptions::new(Variant::Jsx);
    assert_eq!(
        actual,
        Loaded {
            source: Source::Text(RecordingEngine::output_for(JSX_SOURCE, &expected_options)),
            format: ModuleFormat::Module,
            short_circuit: true,
        }
    );
    assert_eq!(fx.engine.calls(), vec![(JSX_SOURCE.to_string(), expected_options)]);
}

#[tokio::test]
async fn test_load_defers_for_unsupported_file() {
    let fx = Fixture::new();
    let url = fx.url("LICENSE.md");

    let actual = fx.hooks.load(&url, &module_context(), &DefaultLoad).await.unwrap();

    assert_eq!(actual.source, Source::Text(url));
    assert!(!actual.short_circuit);
    assert!(fx.engine.calls().is_empty());
}

#[tokio::test]
async fn test_load_defers_for_ignored_file() {
    let fx = Fixture::new();
    let url = fx.url("node_modules/@aduth/fixtures/in.jsx");

    let actual = fx.hooks.load(&url, &LoadContext::default(), &DefaultLoad).await.unwrap();

    assert_eq!(actual.source, Source::Text(url));
    assert_eq!(actual.format, ModuleFormat::CommonJs);
    assert!(fx.engine.calls().is_empty());
}

#[tokio::test]
async fn test_load_passes_project_config() {
    let fx = Fixture::new();
    let raw = "{ \"compilerOptions\": { \"jsxFactory\": \"h\" } }";
    std::fs::write(fx.path().join("tsconfig.json"), raw).unwrap();

    fx.hooks.load(&fx.url("fixtures/in.jsx"), &module_context(), &DefaultLoad).await.unwrap();

    let calls = fx.engine.calls();
    assert_eq!(calls[0].1.project_config.as_deref(), Some(raw));
}

#[tokio::test]
async fn test_load_source_map_follows_flag() {
    let fx = Fixture::new();
    let url = fx.url("fixtures/in.jsx");

    fx.hooks.load(&url, &module_context(), &DefaultLoad).await.unwrap();
    fx.hooks.source_maps().set(true);
    fx.hooks.load(&url, &module_context(), &DefaultLoad).await.unwrap();
    fx.hooks.source_maps().set(false);
    fx.hooks.load(&url, &module_context(), &DefaultLoad).await.unwrap();

    let maps: Vec<_> = fx.engine.calls().into_iter().map(|(_, o)| o.source_map).collect();
    assert_eq!(
        maps,
        vec![None, Some(SourceMapOptions::inline("in.jsx")), None]
    );
}

#[tokio::test]
async fn test_transform_failure_is_fatal() {
    let fx = Fixture::new();
    let hooks = Hooks::new(
        FailingEngine,
        ProjectConfig::new(fx.path().join("tsconfig.json")),
        SourceMapsFlag::default(),
    );

    let err = hooks
        .load(&fx.url("fixtures/in.jsx"), &module_context(), &DefaultLoad)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "<stdin>:1:9: ERROR: Expected \";\" but found \"}\"");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loads_share_config() {
    let fx = Fixture::new();
    std::fs::write(fx.path().join("tsconfig.json"), "{}").unwrap();
    for i in 0..8 {
        std::fs::write(fx.path().join(format!("fixtures/m{}.ts", i)), "export {}").unwrap();
    }
    let urls: Vec<String> = (0..8).map(|i| fx.url(&format!("fixtures/m{}.ts", i))).collect();

    let ctx = LoadContext::default();
    let host = DefaultLoad;
    let loads = urls.iter().map(|url| fx.hooks.load(url, &ctx, &host));
    let results = futures::future::join_all(loads).await;

    assert!(results.iter().all(|r| r.as_ref().unwrap().short_circuit));
    let calls = fx.engine.calls();
    let first = calls[0].1.project_config.clone().unwrap();
    assert!(
        calls
            .iter()
            .all(|(_, o)| Arc::ptr_eq(o.project_config.as_ref().unwrap(), &first))
    );
}

// ---------------------------------------------------------------------------
// three-phase protocol
// ---------------------------------------------------------------------------

struct DefaultFormat;

#[async_trait]
impl GetFormat for DefaultFormat {
    async fn get_format(&self, _url: &str, _context: &FormatContext, _next: &dyn GetFormat) -> Result<Formatted> {
        Ok(Formatted {
            format: ModuleFormat::CommonJs,
        })
    }
}

struct DefaultTransformSource;

#[async_trait]
impl TransformSource for DefaultTransformSource {
    async fn transform_source(
        &self,
        source: Source,
        _context: &TransformSourceContext,
        _next: &dyn TransformSource,
    ) -> Result<Transformed> {
        Ok(Transformed { source })
    }
}

#[tokio::test]
async fn test_get_format() {
    let fx = Fixture::new();
    let ctx = FormatContext::default();

    let supported = fx.hooks.get_format(&fx.url("fixtures/in.jsx"), &ctx, &DefaultFormat).await.unwrap();
    let unsupported = fx.hooks.get_format(&fx.url("fixtures/in.txt"), &ctx, &DefaultFormat).await.unwrap();
    let ignored = fx
        .hooks
        .get_format(&fx.url("node_modules/@aduth/fixtures/in.jsx"), &ctx, &DefaultFormat)
        .await
        .unwrap();

    assert_eq!(supported.format, ModuleFormat::Module);
    assert_eq!(unsupported.format, ModuleFormat::CommonJs);
    assert_eq!(ignored.format, ModuleFormat::CommonJs);
}

#[tokio::test]
async fn test_transform_source() {
    let fx = Fixture::new();
    let ctx = TransformSourceContext {
        url: fx.url("fixtures/in.jsx"),
        format: ModuleFormat::Module,
    };

    let actual = fx
        .hooks
        .transform_source(Source::Bytes(JSX_SOURCE.as_bytes().to_vec()), &ctx, &DefaultTransformSource)
        .await
        .unwrap();

    let expected = RecordingEngine::output_for(JSX_SOURCE, &TransformOptions::new(Variant::Jsx));
    assert_eq!(actual.source, Source::Text(expected));
}

#[tokio::test]
async fn test_transform_source_defers() {
    let fx = Fixture::new();

    for url in [fx.url("example.txt"), fx.url("node_modules/@aduth/fixtures/in.jsx")] {
        let ctx = TransformSourceContext {
            url,
            format: ModuleFormat::Module,
        };
        let actual = fx
            .hooks
            .transform_source(Source::Text("hello world".to_string()), &ctx, &DefaultTransformSource)
            .await
            .unwrap();
        assert_eq!(actual.source, Source::Text("hello world".to_string()));
    }
    assert!(fx.engine.calls().is_empty());
}
