use crate::config::PluginConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client provider component mounted by the host admin shell
pub const PROVIDER_PATH: &str = "cmdmenu/client#CommandMenuProvider";

/// The slice of host configuration the palette touches. Every other key is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    #[serde(default)]
    pub admin: HostAdmin,

    /// Plugin options, readable by the client provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_menu: Option<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostAdmin {
    #[serde(default)]
    pub components: HostComponents,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostComponents {
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Register the palette with a host configuration.
///
/// Stores `options` under `commandMenu` and mounts the provider component.
/// A disabled plugin leaves the config as it was. Registering twice does not
/// mount the provider twice.
///
/// # Errors
///
/// Returns an error if `options` cannot be serialized.
pub fn with_command_menu(
    mut config: HostConfig,
    options: &PluginConfig,
) -> crate::Result<HostConfig> {
    if options.disabled {
        return Ok(config);
    }

    config.command_menu = Some(serde_json::to_value(options)?);

    let providers = &mut config.admin.components.providers;
    if !providers.iter().any(|p| p == PROVIDER_PATH) {
        providers.push(PROVIDER_PATH.to_string());
    }

    Ok(config)
}
