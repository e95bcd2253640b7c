//! Render-context assembly.
//!
//! Templates consume a statically-typed context; building that context from
//! the old settings and the infra document lives here so template changes
//! never touch assembly code and vice versa.

use crate::infra::InfraDocument;
use crate::settings::{Language, OldProjectSettings};

// Plugin names as they appear in v2 `activePlugins`.
pub const PLUGIN_FRONTEND_HOSTING: &str = "frontend-hosting";
pub const PLUGIN_BOT: &str = "bot";
pub const PLUGIN_AAD: &str = "aad";
pub const PLUGIN_FUNCTION: &str = "function";
pub const PLUGIN_SPFX: &str = "spfx";

// Logical output names resolved against the infra document.
pub const OUTPUT_FRONTEND_STORAGE: &str = "frontendHostingStorageResourceId";
pub const OUTPUT_BOT_WEB_APP: &str = "botWebAppResourceId";
pub const OUTPUT_FUNCTION_APP: &str = "functionAppResourceId";

/// Everything a pipeline-definition template may refer to.
///
/// Placeholder fields are `None` when the infra document does not declare the
/// corresponding output; the actions that need them are then emitted without
/// the argument (or not at all) instead of failing the render.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub app_name: String,
    pub language: Language,
    pub has_tab: bool,
    pub has_bot: bool,
    pub has_sso: bool,
    pub has_function: bool,
    pub is_spfx: bool,
    pub frontend_storage_resource_id: Option<String>,
    pub bot_web_app_resource_id: Option<String>,
    pub function_app_resource_id: Option<String>,
}

impl TemplateContext {
    /// Derive feature flags from the active plugin set and resolve known
    /// placeholders against the infra document.
    pub fn assemble(old: &OldProjectSettings, infra: &InfraDocument) -> Self {
        Self {
            app_name: old.app_name.clone(),
            language: old.programming_language,
            has_tab: old.has_plugin(PLUGIN_FRONTEND_HOSTING),
            has_bot: old.has_plugin(PLUGIN_BOT),
            has_sso: old.has_plugin(PLUGIN_AAD),
            has_function: old.has_plugin(PLUGIN_FUNCTION),
            is_spfx: old.has_plugin(PLUGIN_SPFX),
            frontend_storage_resource_id: infra
                .resolve(OUTPUT_FRONTEND_STORAGE)
                .map(str::to_string),
            bot_web_app_resource_id: infra.resolve(OUTPUT_BOT_WEB_APP).map(str::to_string),
            function_app_resource_id: infra.resolve(OUTPUT_FUNCTION_APP).map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HostType;

    fn old_with_plugins(plugins: &[&str]) -> OldProjectSettings {
        OldProjectSettings {
            app_name: "my-app".into(),
            project_id: None,
            version: Some("2.1.0".into()),
            programming_language: Language::Typescript,
            host_type: HostType::Azure,
            active_plugins: plugins.iter().map(|s| s.to_string()).collect(),
            capabilities: vec![],
        }
    }

    #[test]
    fn flags_follow_plugins() {
        let old = old_with_plugins(&["frontend-hosting", "aad"]);
        let cx = TemplateContext::assemble(&old, &InfraDocument::default());
        assert!(cx.has_tab);
        assert!(cx.has_sso);
        assert!(!cx.has_bot);
        assert!(!cx.has_function);
        assert!(!cx.is_spfx);
    }

    #[test]
    fn placeholders_resolve_from_infra() {
        let old = old_with_plugins(&["frontend-hosting"]);
        let infra = InfraDocument::parse("frontendHostingStorageResourceId = \"/sub/x\"\n");
        let cx = TemplateContext::assemble(&old, &infra);
        assert_eq!(cx.frontend_storage_resource_id.as_deref(), Some("/sub/x"));
        assert_eq!(cx.bot_web_app_resource_id, None);
    }

    #[test]
    fn unresolved_placeholder_is_omitted_not_fatal() {
        let old = old_with_plugins(&["bot"]);
        let cx = TemplateContext::assemble(&old, &InfraDocument::default());
        assert!(cx.has_bot);
        assert_eq!(cx.bot_web_app_resource_id, None);
    }
}
