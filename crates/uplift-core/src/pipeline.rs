//! The fixed, ordered migration pipeline.
//!
//! Steps are independent: they share read access to the old settings through
//! [`StepContext`] but never depend on each other's side effects beyond the
//! workspace's accumulated file state. New steps append; old ones are never
//! revisited. Cross-cutting concerns (logging, timing) wrap step execution as
//! an explicit ordered middleware list run by a small interpreter loop.

use crate::context::TemplateContext;
use crate::error::Result;
use crate::infra::InfraDocument;
use crate::paths;
use crate::settings::{GeneratedSettings, OldProjectSettings};
use crate::template;
use crate::workspace::MigrationWorkspace;
use std::time::Instant;

// ---------------------------------------------------------------------------
// StepContext
// ---------------------------------------------------------------------------

/// Shared state threaded through the pipeline — never a process-wide global.
pub struct StepContext {
    pub workspace: MigrationWorkspace,
    old_settings: Option<OldProjectSettings>,
}

impl StepContext {
    pub fn new(workspace: MigrationWorkspace) -> Self {
        Self {
            workspace,
            old_settings: None,
        }
    }

    /// The v2 settings snapshot, loaded on first access and never mutated.
    pub fn old_settings(&mut self) -> Result<&OldProjectSettings> {
        let settings = match self.old_settings.take() {
            Some(s) => s,
            None => OldProjectSettings::load(self.workspace.root())?,
        };
        Ok(self.old_settings.insert(settings))
    }
}

// ---------------------------------------------------------------------------
// MigrationStep
// ---------------------------------------------------------------------------

pub trait MigrationStep {
    fn name(&self) -> &'static str;
    fn run(&self, cx: &mut StepContext) -> Result<()>;
}

/// Snapshot the entire legacy config tree before anything mutates.
pub struct BackupLegacyConfig;

impl MigrationStep for BackupLegacyConfig {
    fn name(&self) -> &'static str {
        "backup-legacy-config"
    }

    fn run(&self, cx: &mut StepContext) -> Result<()> {
        let backed_up = cx.workspace.backup(paths::LEGACY_DIR)?;
        tracing::debug!(backed_up, "legacy config backup");
        Ok(())
    }
}

/// Write the v3 `settings.json`, carrying identity over from the v2 project.
pub struct RegenerateSettings;

impl MigrationStep for RegenerateSettings {
    fn name(&self) -> &'static str {
        "regenerate-settings"
    }

    fn run(&self, cx: &mut StepContext) -> Result<()> {
        let old = cx.old_settings()?.clone();
        let generated = GeneratedSettings::regenerate(&old);
        let json = generated.to_json()?;
        cx.workspace.write_file(paths::SETTINGS_FILE, json.as_bytes())
    }
}

/// Render and write the v3 `app.yml` from the old settings and infra document.
pub struct RegeneratePipelineDefinition;

impl MigrationStep for RegeneratePipelineDefinition {
    fn name(&self) -> &'static str {
        "regenerate-pipeline-definition"
    }

    fn run(&self, cx: &mut StepContext) -> Result<()> {
        let old = cx.old_settings()?.clone();
        let infra = InfraDocument::load(cx.workspace.root())?;
        let render_cx = TemplateContext::assemble(&old, &infra);
        let id = template::select_template(old.host_type, old.programming_language)?;
        let yml = template::render(id, &render_cx)?;
        cx.workspace.write_file(paths::APP_YML_FILE, yml.as_bytes())
    }
}

/// The pipeline, in its one fixed order.
pub fn default_steps() -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(BackupLegacyConfig),
        Box::new(RegenerateSettings),
        Box::new(RegeneratePipelineDefinition),
    ]
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// One layer wrapped around step execution: call `next` to continue the
/// chain, or short-circuit with an error.
pub type Middleware = fn(&dyn MigrationStep, &mut StepContext, Next<'_>) -> Result<()>;

/// Continuation handed to each middleware.
pub struct Next<'a> {
    rest: &'a [Middleware],
}

impl Next<'_> {
    pub fn call(self, step: &dyn MigrationStep, cx: &mut StepContext) -> Result<()> {
        run_step(self.rest, step, cx)
    }
}

/// Interpreter loop: peel one middleware off the list, or hit the step itself.
pub fn run_step(
    middlewares: &[Middleware],
    step: &dyn MigrationStep,
    cx: &mut StepContext,
) -> Result<()> {
    match middlewares.split_first() {
        Some((mw, rest)) => mw(step, cx, Next { rest }),
        None => step.run(cx),
    }
}

fn log_step(step: &dyn MigrationStep, cx: &mut StepContext, next: Next<'_>) -> Result<()> {
    tracing::info!(step = step.name(), "running migration step");
    let result = next.call(step, cx);
    if let Err(e) = &result {
        tracing::warn!(step = step.name(), error = %e, "migration step failed");
    }
    result
}

fn time_step(step: &dyn MigrationStep, cx: &mut StepContext, next: Next<'_>) -> Result<()> {
    let started = Instant::now();
    let result = next.call(step, cx);
    tracing::debug!(step = step.name(), elapsed_ms = started.elapsed().as_millis() as u64);
    result
}

pub fn default_middleware() -> &'static [Middleware] {
    &[log_step, time_step]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
