use schemascope_api::IndexFile;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schemars::schema_for!(IndexFile);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
