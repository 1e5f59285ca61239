//! Builds transformer chains from declarative configuration.
//!
//! Unknown `type` tags are already terminal at config-parse time (the tagged
//! union is closed); this module handles per-stage construction failures.
//! Under [`ChainPolicy::Strict`] any failing stage rejects the whole chain;
//! under [`ChainPolicy::Partial`] the offending stage is logged and omitted
//! so the rest of the world keeps working.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resources::rawinput::{SharedInputHub, input_accessor};
use crate::transformers::Transformer;
use crate::transformers::airplane::AirplaneTransformer;
use crate::transformers::animal::AnimalTransformer;
use crate::transformers::butterfly::ButterflyTransformer;
use crate::transformers::car::CarTransformer;
use crate::transformers::chain::TransformerChain;
use crate::transformers::character::CharacterTransformer;
use crate::transformers::config::TransformerConfig;
#[cfg(feature = "lua")]
use crate::transformers::custom::CustomTransformer;
use crate::transformers::input::InputTransformer;

/// Configuration-time failure building a chain or one of its stages.
#[derive(Debug, Error)]
pub enum ChainBuildError {
    #[error("transformer `{kind}` is missing required parameter `{param}`")]
    MissingParameter {
        kind: &'static str,
        param: &'static str,
    },
    #[error("invalid transformer configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[cfg(feature = "lua")]
    #[error("custom transformer script error: {0}")]
    Script(#[from] mlua::Error),
    #[error("custom transformers require the `lua` feature")]
    ScriptingDisabled,
}

/// What to do when one stage of a chain fails to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// Reject the whole chain on the first failing stage.
    Strict,
    /// Log the failing stage, omit it, keep the rest of the chain.
    #[default]
    Partial,
}

/// Collaborators a chain needs at construction time.
pub struct ChainDeps {
    /// Hub the input stage's snapshot accessor is derived from.
    pub raw_input: SharedInputHub,
}

/// Parse a JSON array of transformer configurations.
///
/// An unknown `type` tag or unknown parameter field is a terminal
/// configuration error here, before any stage is constructed.
pub fn parse_configs(json: &str) -> Result<Vec<TransformerConfig>, ChainBuildError> {
    Ok(serde_json::from_str(json)?)
}

/// Construct one stage from its configuration.
#[cfg_attr(not(feature = "lua"), allow(unused_variables))]
pub fn build_stage(
    entity_id: &str,
    config: &TransformerConfig,
    deps: &ChainDeps,
) -> Result<Box<dyn Transformer>, ChainBuildError> {
    let stage: Box<dyn Transformer> = match config {
        TransformerConfig::Input(params) => Box::new(InputTransformer::new(
            params,
            input_accessor(&deps.raw_input),
        )),
        TransformerConfig::Airplane(params) => {
            Box::new(AirplaneTransformer::new(params.clone()))
        }
        TransformerConfig::Character(params) => {
            Box::new(CharacterTransformer::new(params.clone()))
        }
        TransformerConfig::Car(params) => Box::new(CarTransformer::new(params.clone())),
        TransformerConfig::Animal(params) => Box::new(AnimalTransformer::new(params.clone())),
        TransformerConfig::Butterfly(params) => {
            Box::new(ButterflyTransformer::new(params.clone()))
        }
        #[cfg(feature = "lua")]
        TransformerConfig::Custom(params) => Box::new(CustomTransformer::new(entity_id, params)?),
        #[cfg(not(feature = "lua"))]
        TransformerConfig::Custom(_) => return Err(ChainBuildError::ScriptingDisabled),
    };
    Ok(stage)
}

/// Build the full chain for one entity from its ordered stage configurations.
pub fn build_chain(
    entity_id: &str,
    configs: &[TransformerConfig],
    deps: &ChainDeps,
    policy: ChainPolicy,
) -> Result<TransformerChain, ChainBuildError> {
    let mut chain = TransformerChain::new();
    for config in configs {
        match build_stage(entity_id, config, deps) {
            Ok(stage) => chain.add(stage),
            Err(e) => match policy {
                ChainPolicy::Strict => return Err(e),
                ChainPolicy::Partial => {
                    log::warn!(
                        "skipping `{}` stage for entity '{entity_id}': {e}",
                        config.kind()
                    );
                }
            },
        }
    }
    Ok(chain)
}
