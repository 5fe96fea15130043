//! Template Environment
//!
//! A process-wide minijinja environment over the embedded `.art` templates.
//! Statement blocks use `{$ ... $}` and line statements start with `$$`, which
//! keeps `{ }` free for Artic blocks.

use std::borrow::Cow;
use std::sync::OnceLock;

use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, Error, ErrorKind};
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::errors::Result;

pub static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATE_DIR: &str = "src/emit/templates";

#[derive(RustEmbed)]
#[folder = "src/emit/templates"]
struct TemplateAssets;

pub fn get_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();

        let syntax = SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .line_statement_prefix("$$")
            .build()
            .expect("Failed to configure template syntax");

        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);
        env.set_loader(template_loader);

        env
    })
}

fn template_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("art"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.art"))
    };

    #[cfg(debug_assertions)]
    {
        let path = std::path::Path::new(TEMPLATE_DIR).join(filename.as_ref());
        if path.exists() {
            return std::fs::read_to_string(&path).map(Some).map_err(|e| {
                Error::new(ErrorKind::TemplateNotFound, format!("Failed to read {}: {e}", path.display()))
            });
        }
    }

    if let Some(file) = TemplateAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

/// Renders `name` and strips the trailing newline, yielding a fragment.
pub fn render(name: &str, ctx: impl Serialize) -> Result<String> {
    let template = get_env().get_template(name)?;
    let mut text = template.render(ctx)?;
    text.truncate(text.trim_end().len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let env = get_env();
        for name in TemplateAssets::iter() {
            assert!(env.get_template(&name).is_ok(), "template {name} failed to load");
        }
    }

    #[test]
    fn test_missing_template() {
        assert!(render("does/not/exist", ()).is_err());
    }
}
