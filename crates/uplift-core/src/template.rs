//! Pipeline-definition templates.
//!
//! One declarative template exists per supported (host type, language)
//! combination. Rendering is pure: the same template id and context always
//! produce the same text. Which actions appear is driven entirely by the
//! context's feature flags and resolved placeholders.

use crate::context::TemplateContext;
use crate::error::{Result, UpliftError};
use crate::settings::{HostType, Language};
use serde::Serialize;
use serde_yaml::Mapping;

// ---------------------------------------------------------------------------
// PipelineDefinition
// ---------------------------------------------------------------------------

/// One named action within a lifecycle stage.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub uses: String,
    #[serde(rename = "with", skip_serializing_if = "Mapping::is_empty")]
    pub args: Mapping,
}

impl Action {
    fn new(uses: &str) -> Self {
        Self {
            uses: uses.to_string(),
            args: Mapping::new(),
        }
    }

    fn arg(mut self, key: &str, value: &str) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Add the argument only when the value resolved; unresolved placeholders
    /// degrade the artifact instead of failing the render.
    fn arg_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.arg(key, v),
            None => self,
        }
    }
}

/// The generated `app.yml`: lifecycle stages mapped to ordered action lists.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDefinition {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub register_app: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provision: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configure_app: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deploy: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publish: Vec<Action>,
}

// ---------------------------------------------------------------------------
// Template selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    /// Azure-hosted tab/bot/function app, npm toolchain.
    AzureApp,
    /// SharePoint-hosted app, TypeScript only.
    SpfxApp,
}

/// Deterministic template choice for a (host type, language) pair.
pub fn select_template(hosting: HostType, language: Language) -> Result<TemplateId> {
    match (hosting, language) {
        (HostType::Azure, Language::Javascript | Language::Typescript) => Ok(TemplateId::AzureApp),
        (HostType::Spfx, Language::Typescript) => Ok(TemplateId::SpfxApp),
        _ => Err(UpliftError::UnsupportedTarget {
            hosting: hosting.to_string(),
            language: language.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the pipeline definition for `id` against `cx`.
pub fn render(id: TemplateId, cx: &TemplateContext) -> Result<String> {
    let definition = match id {
        TemplateId::AzureApp => azure_app(cx),
        TemplateId::SpfxApp => spfx_app(cx),
    };
    Ok(serde_yaml::to_string(&definition)?)
}

fn azure_app(cx: &TemplateContext) -> PipelineDefinition {
    let mut def = PipelineDefinition::default();

    if cx.has_sso {
        def.register_app
            .push(Action::new("aadApp/create").arg("name", &format!("{}-aad", cx.app_name)));
    }
    def.register_app
        .push(Action::new("appRegistry/create").arg("name", &cx.app_name));

    if cx.has_tab {
        def.provision.push(
            Action::new("azureStorage/enableStaticWebsite")
                .arg_opt("storageResourceId", cx.frontend_storage_resource_id.as_deref())
                .arg("indexPage", "index.html"),
        );
    }
    if cx.has_bot {
        def.provision
            .push(Action::new("botFramework/create").arg("name", &format!("{}-bot", cx.app_name)));
    }

    if cx.has_sso {
        def.configure_app
            .push(Action::new("aadApp/update").arg("manifestPath", "./aad.manifest.json"));
    }
    def.configure_app
        .push(Action::new("appRegistry/update").arg("manifestPath", "./appManifest/manifest.json"));

    if cx.has_tab {
        def.deploy.push(
            Action::new("npm/command")
                .arg("args", "install")
                .arg("workingDirectory", "tabs"),
        );
        def.deploy.push(
            Action::new("npm/command")
                .arg("args", "run build")
                .arg("workingDirectory", "tabs"),
        );
        def.deploy.push(
            Action::new("azureStorage/deploy")
                .arg("distributionPath", "tabs/build")
                .arg_opt("resourceId", cx.frontend_storage_resource_id.as_deref()),
        );
    }
    if cx.has_bot {
        def.deploy.push(
            Action::new("npm/command")
                .arg("args", "install")
                .arg("workingDirectory", "bot"),
        );
        def.deploy.push(
            Action::new("azureAppService/deploy")
                .arg("workingDirectory", "bot")
                .arg_opt("resourceId", cx.bot_web_app_resource_id.as_deref()),
        );
    }
    if cx.has_function {
        def.deploy.push(
            Action::new("npm/command")
                .arg("args", "install")
                .arg("workingDirectory", "api"),
        );
        def.deploy.push(
            Action::new("azureFunctions/deploy")
                .arg("workingDirectory", "api")
                .arg_opt("resourceId", cx.function_app_resource_id.as_deref()),
        );
    }

    def.publish
        .push(Action::new("appRegistry/publish").arg("appPackagePath", "./appPackage.zip"));

    def
}

fn spfx_app(cx: &TemplateContext) -> PipelineDefinition {
    let mut def = PipelineDefinition::default();

    def.register_app
        .push(Action::new("appRegistry/create").arg("name", &cx.app_name));

    def.deploy.push(
        Action::new("npm/command")
            .arg("args", "install")
            .arg("workingDirectory", "spfx"),
    );
    def.deploy.push(
        Action::new("npm/command")
            .arg("args", "run build")
            .arg("workingDirectory", "spfx"),
    );
    def.deploy
        .push(Action::new("spfx/deploy").arg("packagePath", "./spfx/sharepoint/solution"));

    def.publish
        .push(Action::new("appRegistry/publish").arg("appPackagePath", "./appPackage.zip"));

    def
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
