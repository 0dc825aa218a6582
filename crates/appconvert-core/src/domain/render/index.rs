use std::collections::HashSet;

use super::{Platform, assemble};
use crate::domain::{
    definition::{AppDefinition, StepCategory, step_file_stem},
    error::DomainError,
    extract::ExtractionContext,
    literal::{Key, Literal, ObjectLiteral},
    naming::{to_binding_name, to_camel_case},
};

const AUTHENTICATION: &str = "authentication";
const HYDRATORS: &str = "hydrators";
const SCRIPTING_SOURCE: &str = "scriptingSource";

/// Render `index.js`: the app's entry module.
///
/// Steps, authentication and hydrators are replaced by `require` bindings of
/// their own modules; the step registries are keyed by `[binding.key]` so a
/// step's key lives in exactly one place. Whatever embedded source is left
/// at the top level is extracted in place.
pub fn render_index(definition: &AppDefinition, platform: &Platform) -> Result<String, DomainError> {
    let mut imports = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    let has_auth = definition.authentication().is_some();
    if has_auth {
        imports.push(format!("const {AUTHENTICATION} = require('./{AUTHENTICATION}');"));
        taken.insert(AUTHENTICATION.into());
    }

    let mut registries = Vec::with_capacity(StepCategory::ALL.len());
    for category in StepCategory::ALL {
        let mut registry = ObjectLiteral::new();
        for (key, _) in definition.steps(category) {
            let binding = unique(&taken, step_binding(key, category));
            imports.push(format!(
                "const {binding} = require('./{}/{}.js');",
                category.section(),
                step_file_stem(key)
            ));
            registry.set(
                Key::computed(format!("{binding}.key")),
                Literal::code(binding.as_str()),
            );
            taken.insert(binding);
        }
        registries.push((category.section(), registry));
    }

    let has_hydrators = definition.hydrators().is_some();
    if has_hydrators {
        imports.push(format!("const {HYDRATORS} = require('./{HYDRATORS}');"));
        taken.insert(HYDRATORS.into());
    }

    let has_scripting = definition.scripting_source().is_some();
    if has_scripting {
        imports.push(String::new());
        imports.push("const fs = require('fs');".into());
        imports.push("const path = require('path');".into());
        imports.push(format!(
            "const {SCRIPTING_SOURCE} = fs.readFileSync(path.join(__dirname, 'scripting.js'), {{ encoding: 'utf8' }});"
        ));
        taken.extend(["fs", "path", SCRIPTING_SOURCE].map(String::from));
    }

    let mut ctx = ExtractionContext::with_reserved(taken);
    let mut exported = ObjectLiteral::new();

    for (field, value) in definition.entries() {
        let lowered = match field {
            AUTHENTICATION if has_auth => Literal::code(AUTHENTICATION),
            HYDRATORS if has_hydrators => Literal::code(HYDRATORS),
            "legacy" if has_scripting => {
                let mut legacy = ctx.lower(value, &[field.to_string()])?;
                if let Some(obj) = legacy.as_object_mut() {
                    obj.set(Key::name(SCRIPTING_SOURCE), Literal::code(SCRIPTING_SOURCE));
                }
                legacy
            }
            section => match registries.iter_mut().find(|(name, _)| *name == section) {
                Some((_, registry)) => Literal::Object(std::mem::take(registry)),
                None => ctx.lower(value, &[field.to_string()])?,
            },
        };
        exported.set(Key::name(field), lowered);
    }

    // Versions always resolve at load time, even when the definition omits them.
    exported.set(
        Key::name("version"),
        Literal::code("require('./package.json').version"),
    );
    exported.set(
        Key::name("platformVersion"),
        Literal::code(format!("require('{}').version", platform.core_package)),
    );

    assemble(&imports, &ctx, &Literal::Object(exported))
}

fn step_binding(key: &str, category: StepCategory) -> String {
    to_binding_name(&format!("{}{}", to_camel_case(key), category.binding_suffix()))
}

fn unique(taken: &HashSet<String>, base: String) -> String {
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}
