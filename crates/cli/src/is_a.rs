use schemascope_api::{Index, IndexView, TypeRef};
use schemascope_core::is_subtype;
use schemascope_runtime::RuntimeConfig;
use std::path::Path;
use tracing::info;

pub fn run(
    config: &RuntimeConfig,
    index_path: &Path,
    subject: &str,
    target: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = Index::from_json_file(index_path)?;
    info!("Loaded {} indexed classes from {}", index.len(), index_path.display());

    let runtime = schemascope_runtime::build_default_runtime(config);

    let subject: TypeRef = subject.parse()?;
    let target: TypeRef = target.parse()?;
    let answer = is_subtype(&index, runtime.as_ref(), &subject, &target);
    println!("{}", answer);
    Ok(())
}
