use schemascope_api::TypeRef;
use schemascope_core::FormatTable;

pub fn run(ty: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ty: TypeRef = ty.parse()?;
    let classified = FormatTable::global().classify(&ty);
    tracing::debug!("{} -> {}", ty, classified);
    println!("{}", serde_json::to_string_pretty(&classified)?);
    Ok(())
}

pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    for (name, format) in FormatTable::global().iter() {
        println!("{:<28} {}", name.as_str(), format);
    }
    Ok(())
}
