//! Render a built-in template from the command line arguments
//!
//! ```text
//! RUST_LOG=debug cargo run -p prompt-kit --example render_prompt -- Rust "fn main() {}"
//! ```

use prompt_kit::{RegistryConfig, TemplateRegistry};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    prompt_kit_utils::init_tracing();

    let mut args = std::env::args().skip(1);
    let language = args.next().unwrap_or_else(|| "Rust".to_string());
    let code = args
        .next()
        .unwrap_or_else(|| "fn add(a: i32, b: i32) -> i32 { a + b }".to_string());

    let config = RegistryConfig::from_env()?;
    let mut registry = TemplateRegistry::with_config(config);
    for template in TemplateRegistry::with_defaults().templates() {
        registry.add(template.clone())?;
    }

    let params = json!({ "language": language, "code": code });
    let params = params
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("parameters must be an object"))?;

    let prompt = registry.render_template("code_reviewer", params)?;
    println!("--- system ---\n{}\n--- user ---\n{}", prompt.system, prompt.user);

    Ok(())
}
