//! Print the remote control's OpenAPI document

use anyhow::Result;
use twine_remote::routes::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
