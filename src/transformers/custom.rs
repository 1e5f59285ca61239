//! Lua-scripted behavior stage.
//!
//! Author-supplied source is compiled once at construction into a dedicated
//! Lua VM per stage, which is the isolation boundary: a script sees only its
//! own globals plus a small `engine` logging table, and nothing from any
//! other stage or entity.
//!
//! The script must define a global `transform(input)` function. `input` is a
//! table mirroring the per-tick transform input:
//!
//! ```lua
//! function transform(input)
//!     if (input.actions.thrust or 0) > 0 then
//!         return { force = { x = 0, y = 0, z = -input.dt * 600 } }
//!     end
//!     return {}
//! end
//! ```
//!
//! The return value may carry `force`, `impulse`, `torque` (tables with
//! `x`/`y`/`z`) and `early_exit`. A runtime error in the script is caught at
//! the call boundary, logged, and treated as a no-op output for this stage.
//! It never aborts the chain.

use glam::Vec3;
use mlua::prelude::*;

use crate::transformers::config::CustomParams;
use crate::transformers::factory::ChainBuildError;
use crate::transformers::{TransformInput, TransformOutput, Transformer};

pub struct CustomTransformer {
    priority: i32,
    enabled: bool,
    lua: Lua,
    func: LuaFunction,
    entity_id: String,
}

impl CustomTransformer {
    /// Compile the script and resolve its `transform` function.
    ///
    /// Fails when the source is empty, does not compile, or does not define
    /// a global `transform` function.
    pub fn new(entity_id: &str, params: &CustomParams) -> Result<Self, ChainBuildError> {
        if params.code.trim().is_empty() {
            return Err(ChainBuildError::MissingParameter {
                kind: "custom",
                param: "code",
            });
        }

        let lua = Lua::new();
        register_engine_api(&lua, entity_id)?;
        lua.load(&params.code)
            .set_name(format!("custom:{entity_id}"))
            .exec()?;
        let func: LuaFunction = lua.globals().get("transform").map_err(|_| {
            ChainBuildError::MissingParameter {
                kind: "custom",
                param: "transform function",
            }
        })?;

        Ok(Self {
            priority: params.priority,
            enabled: params.enabled,
            lua,
            func,
            entity_id: entity_id.to_string(),
        })
    }

    fn call(&self, input: &TransformInput, dt: f32) -> LuaResult<TransformOutput> {
        let table = self.lua.create_table()?;
        table.set("entity", input.entity_id.as_str())?;
        table.set("dt", dt)?;
        table.set("grounded", input.environment.grounded)?;
        table.set("velocity", vec3_table(&self.lua, input.velocity)?)?;
        table.set("angular_velocity", vec3_table(&self.lua, input.angular_velocity)?)?;

        let rotation = self.lua.create_table()?;
        rotation.set("x", input.rotation.x)?;
        rotation.set("y", input.rotation.y)?;
        rotation.set("z", input.rotation.z)?;
        rotation.set("w", input.rotation.w)?;
        table.set("rotation", rotation)?;

        let actions = self.lua.create_table()?;
        for (name, value) in &input.actions {
            actions.set(name.as_str(), *value)?;
        }
        table.set("actions", actions)?;

        let result: Option<LuaTable> = self.func.call(table)?;
        let Some(result) = result else {
            return Ok(TransformOutput::none());
        };
        Ok(TransformOutput {
            force: read_vec3(&result, "force")?,
            impulse: read_vec3(&result, "impulse")?,
            torque: read_vec3(&result, "torque")?,
            early_exit: result.get::<Option<bool>>("early_exit")?.unwrap_or(false),
        })
    }
}

impl Transformer for CustomTransformer {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn transform(&mut self, input: &mut TransformInput, dt: f32) -> TransformOutput {
        match self.call(input, dt) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("custom transformer for '{}' failed: {e}", self.entity_id);
                TransformOutput::none()
            }
        }
    }
}

/// Minimal `engine` table scripts can log through.
fn register_engine_api(lua: &Lua, entity_id: &str) -> LuaResult<()> {
    let engine = lua.create_table()?;
    let id = entity_id.to_string();
    engine.set(
        "log",
        lua.create_function(move |_, msg: String| {
            log::info!("[lua:{id}] {msg}");
            Ok(())
        })?,
    )?;
    lua.globals().set("engine", engine)
}

fn vec3_table(lua: &Lua, v: Vec3) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    table.set("x", v.x)?;
    table.set("y", v.y)?;
    table.set("z", v.z)?;
    Ok(table)
}

fn read_vec3(table: &LuaTable, field: &str) -> LuaResult<Option<Vec3>> {
    let Some(v) = table.get::<Option<LuaTable>>(field)? else {
        return Ok(None);
    };
    Ok(Some(Vec3::new(
        v.get::<Option<f32>>("x")?.unwrap_or(0.0),
        v.get::<Option<f32>>("y")?.unwrap_or(0.0),
        v.get::<Option<f32>>("z")?.unwrap_or(0.0),
    )))
}
