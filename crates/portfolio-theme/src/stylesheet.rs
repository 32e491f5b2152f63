//! Static stylesheet export.
//!
//! Stylesheets authored outside the UI framework, including ones loaded before
//! it mounts, can rely on the rendered rules instead of waiting for the
//! controller to write variables:
//!
//! ```css
//! :root { --color-primary: #2563eb; ... }
//! :root[data-theme="light"] { ... }
//! :root[data-theme="dark"] { ... }
//! ```

use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ThemeError;
use crate::mode::ThemeMode;
use crate::sink::THEME_ATTRIBUTE;
use crate::tokens::ThemeTokens;

const TEMPLATE_NAME: &str = "stylesheet.css";

const TEMPLATE: &str = r#"/* portfolio theme tokens, default mode: {{ default_mode }} */
:root {
{%- for decl in default_vars %}
  {{ decl.name }}: {{ decl.value }};
{%- endfor %}
}
{%- for block in modes %}

:root[{{ attribute }}="{{ block.mode }}"] {
{%- for decl in block.vars %}
  {{ decl.name }}: {{ decl.value }};
{%- endfor %}
}
{%- endfor %}
"#;

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)
        .expect("embedded stylesheet template is valid");
    env
});

#[derive(Serialize)]
struct Declaration {
    name: String,
    value: &'static str,
}

#[derive(Serialize)]
struct ModeBlock {
    mode: &'static str,
    vars: Vec<Declaration>,
}

fn declarations(mode: ThemeMode) -> Vec<Declaration> {
    ThemeTokens::for_mode(mode)
        .css_variables()
        .into_iter()
        .map(|(name, value)| Declaration { name, value })
        .collect()
}

/// Renders the token stylesheet with `default_mode` as the unmarked `:root` block.
pub fn render_stylesheet(default_mode: ThemeMode) -> Result<String, ThemeError> {
    let modes: Vec<ModeBlock> = ThemeMode::ALL
        .into_iter()
        .map(|mode| ModeBlock {
            mode: mode.as_str(),
            vars: declarations(mode),
        })
        .collect();

    let template = ENV.get_template(TEMPLATE_NAME)?;
    let css = template.render(context! {
        default_mode => default_mode.as_str(),
        default_vars => declarations(default_mode),
        attribute => THEME_ATTRIBUTE,
        modes => modes,
    })?;
    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{DARK, LIGHT};

    fn block<'a>(css: &'a str, selector: &str) -> &'a str {
        let start = css.find(selector).expect("selector present");
        let rest = &css[start..];
        let end = rest.find('}').expect("block closed");
        &rest[..end]
    }

    #[test]
    fn test_stylesheet_has_all_blocks() {
        let css = render_stylesheet(ThemeMode::Light).unwrap();
        assert!(css.contains(":root {"));
        assert!(css.contains(r#":root[data-theme="light"] {"#));
        assert!(css.contains(r#":root[data-theme="dark"] {"#));
    }

    #[test]
    fn test_default_block_uses_default_mode() {
        let css = render_stylesheet(ThemeMode::Dark).unwrap();
        let root = block(&css, ":root {");
        assert!(root.contains(&format!("--color-background: {};", DARK.colors.background)));
        assert!(!root.contains(LIGHT.colors.background));
    }

    #[test]
    fn test_mode_blocks_carry_every_token() {
        let css = render_stylesheet(ThemeMode::Light).unwrap();
        let dark = block(&css, r#":root[data-theme="dark"]"#);
        for (name, value) in DARK.css_variables() {
            assert!(dark.contains(&format!("{}: {};", name, value)), "{name}");
        }
        let light = block(&css, r#":root[data-theme="light"]"#);
        assert!(light.contains("--color-textSecondary: #64748b;"));
    }
}
